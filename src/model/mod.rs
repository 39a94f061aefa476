//! Records produced by the probes.
//!
//! Every record is a plain value built once per invocation and handed to
//! the renderer. Textual fields are empty when the source did not provide
//! them; numeric fields default to zero.
//!
//! - [`cpu`]: processor identity, load, frequency scaling and topology
//! - [`memory`]: RAM/swap accounting and per-process resident memory
//! - [`disk`]: block devices, mounted filesystems and I/O counters
//! - [`os`]: kernel, distribution, user and environment identity

mod cpu;
mod disk;
mod memory;
mod os;

pub use cpu::{CpuFrequency, CpuIdentity, CpuLoad, CpuTimes, CpuTopology};
pub use disk::{BlockDevice, DiskIoStats, DiskKind, Mount};
pub use memory::{MemorySummary, ProcessMemory};
pub use os::{DistroIdentity, EnvironmentIdentity, KernelIdentity, UserIdentity};

/// Returns `part / total * 100`, clamped to `[0, 100]`, or 0 when `total` is 0.
pub(crate) fn percent(part: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (part as f64 / total as f64 * 100.0).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_bounds() {
        assert_eq!(percent(0, 0), 0.0);
        assert_eq!(percent(6000, 8000), 75.0);
        assert_eq!(percent(9, 3), 100.0);
    }
}
