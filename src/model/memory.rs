//! Memory records.

use super::percent;

/// RAM and swap accounting.
///
/// Source: `/proc/meminfo`
///
/// All values are in kibibytes.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct MemorySummary {
    /// Source: `MemTotal`
    pub total_kib: u64,
    /// Source: `MemAvailable`
    pub available_kib: u64,
    /// Source: `MemFree`
    pub free_kib: u64,
    /// Source: `Buffers`
    pub buffers_kib: u64,
    /// Source: `Cached`
    pub cached_kib: u64,
    /// Source: `Shmem`
    pub shared_kib: u64,
    /// Source: `SReclaimable`
    pub slab_reclaimable_kib: u64,
    /// Source: `SUnreclaim`
    pub slab_unreclaimable_kib: u64,
    /// Source: `SwapTotal`
    pub swap_total_kib: u64,
    /// Source: `SwapFree`
    pub swap_free_kib: u64,
    /// Source: `SwapCached`
    pub swap_cached_kib: u64,
}

impl MemorySummary {
    /// `MemTotal - MemAvailable`.
    pub fn used_kib(&self) -> u64 {
        self.total_kib.saturating_sub(self.available_kib)
    }

    pub fn used_percent(&self) -> f64 {
        percent(self.used_kib(), self.total_kib)
    }

    pub fn swap_used_kib(&self) -> u64 {
        self.swap_total_kib.saturating_sub(self.swap_free_kib)
    }

    pub fn swap_used_percent(&self) -> f64 {
        percent(self.swap_used_kib(), self.swap_total_kib)
    }

    pub fn has_swap(&self) -> bool {
        self.swap_total_kib > 0
    }
}

/// Resident memory of one process.
///
/// Source: `/proc/[pid]/status`, `/proc/[pid]/cmdline`
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct ProcessMemory {
    pub pid: u32,
    /// Source: `Name`
    pub name: String,
    /// Resident set size in kibibytes.
    /// Source: `VmRSS`
    pub rss_kib: u64,
    /// Command line with NULs replaced by spaces, at most 40 characters.
    pub cmdline: String,
}
