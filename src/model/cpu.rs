//! Processor records.

use std::collections::BTreeMap;

use super::percent;

/// Processor identification from the per-processor info file.
///
/// Source: `/proc/cpuinfo`
///
/// Singleton fields hold the first non-empty value seen in the file.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct CpuIdentity {
    /// Source: `model name`
    pub model_name: String,
    /// Source: `vendor_id`
    pub vendor: String,
    /// Source: `cpu family`
    pub family: String,
    /// Source: `model`
    pub model: String,
    /// Source: `stepping`
    pub stepping: String,
    /// Source: `microcode`
    pub microcode: String,
    /// Source: `cache size` (kept verbatim, e.g. `"8192 KB"`)
    pub cache_size: String,
    /// Feature flags in source order.
    /// Source: `flags`
    pub flags: Vec<String>,
    /// Base frequency in MHz.
    /// Source: `cpu MHz`
    pub base_mhz: f64,
    /// Number of `processor` rows.
    pub logical_cores: u32,
    /// Number of distinct `core id` values, or `logical_cores` when absent.
    pub physical_cores: u32,
    /// Source: `siblings` (first occurrence)
    pub siblings: u32,
    /// `core id` value to the number of processor rows that carry it.
    pub core_ids: BTreeMap<String, u32>,
}

impl CpuIdentity {
    /// Returns true if the processor advertises the given feature flag.
    pub fn has_flag(&self, flag: &str) -> bool {
        self.flags.iter().any(|f| f == flag)
    }
}

/// Cumulative time counters of the aggregate `cpu` row (jiffies).
///
/// Source: `/proc/stat` columns 1..7
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct CpuTimes {
    pub user: u64,
    pub nice: u64,
    pub system: u64,
    pub idle: u64,
    pub iowait: u64,
    pub irq: u64,
    pub softirq: u64,
}

impl CpuTimes {
    /// Sum of all seven counters.
    pub fn total(&self) -> u64 {
        self.user
            .saturating_add(self.nice)
            .saturating_add(self.system)
            .saturating_add(self.idle)
            .saturating_add(self.iowait)
            .saturating_add(self.irq)
            .saturating_add(self.softirq)
    }

    /// Time not spent idle or waiting for I/O.
    pub fn busy(&self) -> u64 {
        self.total()
            .saturating_sub(self.idle)
            .saturating_sub(self.iowait)
    }

    /// Busy share of the total since boot, in percent.
    pub fn usage_percent(&self) -> f64 {
        percent(self.busy(), self.total())
    }
}

/// Load averages and a one-shot usage sample.
///
/// Source: `/proc/loadavg`, `/proc/stat`
#[derive(Clone, Debug, PartialEq, Default)]
pub struct CpuLoad {
    pub load1: f64,
    pub load5: f64,
    pub load15: f64,
    /// `busy / total * 100` over the counters since boot.
    pub usage_percent: f64,
    pub times: CpuTimes,
}

/// Frequency scaling state of one CPU.
///
/// Source: `/sys/devices/system/cpu/cpuN/cpufreq/`
///
/// Slots stay `None` when the matching attribute is missing.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct CpuFrequency {
    pub cpu: u32,
    /// Source: `scaling_cur_freq` (kHz / 1000)
    pub current_mhz: Option<f64>,
    /// Source: `scaling_min_freq` (kHz / 1000)
    pub min_mhz: Option<f64>,
    /// Source: `scaling_max_freq` (kHz / 1000)
    pub max_mhz: Option<f64>,
    /// Source: `scaling_governor`
    pub governor: Option<String>,
    /// Source: `scaling_driver`
    pub driver: Option<String>,
}

/// Socket and core layout of the online CPUs.
///
/// Source: `/sys/devices/system/cpu/cpuN/topology/{physical_package_id,core_id}`
#[derive(Clone, Debug, PartialEq, Default)]
pub struct CpuTopology {
    /// Physical package id to cpu numbers, in discovery order.
    pub sockets: BTreeMap<u32, Vec<u32>>,
    /// Core id to cpu numbers, in discovery order.
    pub cores: BTreeMap<u32, Vec<u32>>,
}

impl CpuTopology {
    pub fn socket_count(&self) -> usize {
        self.sockets.len()
    }

    /// Distinct core ids divided by the socket count (at least 1).
    pub fn cores_per_socket(&self) -> usize {
        self.cores.len() / self.sockets.len().max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cpu_times_usage() {
        let times = CpuTimes {
            user: 10000,
            nice: 500,
            system: 3000,
            idle: 80000,
            iowait: 1000,
            irq: 200,
            softirq: 100,
        };
        assert_eq!(times.total(), 94800);
        assert_eq!(times.busy(), 13800);
        assert!((times.usage_percent() - 14.556962).abs() < 1e-4);
    }

    #[test]
    fn test_cpu_times_zero_total() {
        assert_eq!(CpuTimes::default().usage_percent(), 0.0);
    }

    #[test]
    fn test_topology_cores_per_socket() {
        let mut topo = CpuTopology::default();
        assert_eq!(topo.cores_per_socket(), 0);

        topo.sockets.insert(0, vec![0, 1, 2, 3]);
        topo.cores.insert(0, vec![0, 2]);
        topo.cores.insert(1, vec![1, 3]);
        assert_eq!(topo.socket_count(), 1);
        assert_eq!(topo.cores_per_socket(), 2);
    }

    #[test]
    fn test_has_flag() {
        let cpu = CpuIdentity {
            flags: vec!["fpu".into(), "sse2".into()],
            ..Default::default()
        };
        assert!(cpu.has_flag("sse2"));
        assert!(!cpu.has_flag("avx512f"));
    }
}
