//! Processor probes: identity, load, frequency scaling and topology.

use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::collector::SourcePaths;
use crate::collector::error::CollectError;
use crate::collector::parser::{
    parse_cpu_dir, parse_cpu_list, parse_cpu_stat, parse_cpuinfo, parse_loadavg,
};
use crate::collector::reader::{KvPairs, entry_name, list_dir, read_line, read_scalar, read_source};
use crate::collector::traits::FileSystem;
use crate::model::{CpuFrequency, CpuIdentity, CpuLoad, CpuTopology};

/// Collects processor information from `/proc` and `/sys/devices/system/cpu`.
pub struct CpuCollector<F: FileSystem> {
    fs: F,
    paths: SourcePaths,
}

impl<F: FileSystem> CpuCollector<F> {
    /// Creates a new cpu collector.
    ///
    /// # Arguments
    /// * `fs` - Filesystem implementation (real or mock)
    /// * `paths` - Roots of `/proc` and `/sys`
    pub fn new(fs: F, paths: SourcePaths) -> Self {
        Self { fs, paths }
    }

    fn cpu_root(&self) -> PathBuf {
        self.paths.sys.join("devices/system/cpu")
    }

    /// Lists `cpuN` directories ordered by cpu number.
    fn cpu_dirs(&self) -> Vec<(u32, PathBuf)> {
        let mut cpus: Vec<(u32, PathBuf)> =
            list_dir(&self.fs, &self.cpu_root(), |name| parse_cpu_dir(name).is_some())
                .into_iter()
                .filter_map(|path| Some((parse_cpu_dir(entry_name(&path)?)?, path)))
                .collect();
        cpus.sort_by_key(|(cpu, _)| *cpu);
        cpus
    }

    /// Collects processor identity from `/proc/cpuinfo`.
    ///
    /// When the file lists no `processor` rows the logical count falls back
    /// to `/sys/devices/system/cpu/online`, then to the number of `core id`
    /// rows. Physical cores never exceed logical cores.
    pub fn collect_identity(&self) -> Result<CpuIdentity, CollectError> {
        let path = self.paths.proc.join("cpuinfo");
        let content = read_source(&self.fs, &path)?;
        let mut cpu = parse_cpuinfo(KvPairs::new(content, ':'));

        if cpu.logical_cores == 0 {
            match self.online_cpus() {
                Ok(online) if !online.is_empty() => {
                    debug!(count = online.len(), "no processor rows, using online cpu list");
                    cpu.logical_cores = online.len() as u32;
                    if cpu.core_ids.is_empty() {
                        cpu.physical_cores = cpu.logical_cores;
                    }
                }
                Ok(_) => {}
                Err(e) => debug!(error = %e, "online cpu list unavailable"),
            }
        }
        if cpu.logical_cores == 0 {
            cpu.logical_cores = cpu.core_ids.values().sum();
        }
        cpu.physical_cores = cpu.physical_cores.min(cpu.logical_cores);

        Ok(cpu)
    }

    /// Collects load averages from `/proc/loadavg` and the aggregate row of
    /// `/proc/stat`.
    ///
    /// Fails only when both files are unreadable.
    pub fn collect_load(&self) -> Result<CpuLoad, CollectError> {
        let loadavg_path = self.paths.proc.join("loadavg");
        let stat_path = self.paths.proc.join("stat");
        let (loadavg, stat) = match (
            read_source(&self.fs, &loadavg_path),
            read_source(&self.fs, &stat_path),
        ) {
            (Err(e), Err(_)) => {
                debug!(error = %e, "cpu load sources unavailable");
                return Err(e);
            }
            pair => pair,
        };

        let mut load = CpuLoad::default();
        if let Ok(content) = loadavg {
            match parse_loadavg(&content) {
                Ok((l1, l5, l15)) => {
                    load.load1 = l1;
                    load.load5 = l5;
                    load.load15 = l15;
                }
                Err(e) => trace!(error = %e, "ignoring loadavg"),
            }
        }
        if let Ok(content) = stat {
            match parse_cpu_stat(&content) {
                Ok(times) => {
                    load.usage_percent = times.usage_percent();
                    load.times = times;
                }
                Err(e) => trace!(error = %e, "ignoring stat"),
            }
        }

        Ok(load)
    }

    fn read_frequency(&self, cpu: u32, freq_dir: &Path) -> CpuFrequency {
        let mhz = |file: &str| {
            read_scalar::<f64, _>(&self.fs, &freq_dir.join(file)).map(|khz| khz / 1000.0)
        };
        let text = |file: &str| {
            read_line(&self.fs, &freq_dir.join(file)).filter(|s| !s.is_empty())
        };

        CpuFrequency {
            cpu,
            current_mhz: mhz("scaling_cur_freq"),
            min_mhz: mhz("scaling_min_freq"),
            max_mhz: mhz("scaling_max_freq"),
            governor: text("scaling_governor"),
            driver: text("scaling_driver"),
        }
    }

    /// Collects frequency scaling state of the first cpu exposing `cpufreq`.
    ///
    /// Returns exactly one record on success.
    pub fn collect_frequencies(&self) -> Result<Vec<CpuFrequency>, CollectError> {
        let first = self
            .cpu_dirs()
            .into_iter()
            .map(|(cpu, dir)| (cpu, dir.join("cpufreq")))
            .find(|(_, freq_dir)| self.fs.exists(freq_dir));

        match first {
            Some((cpu, freq_dir)) => Ok(vec![self.read_frequency(cpu, &freq_dir)]),
            None => {
                debug!(root = %self.cpu_root().display(), "no cpufreq subtree");
                Err(CollectError::unavailable("CPU frequency information"))
            }
        }
    }

    /// Collects frequency scaling state of every cpu exposing `cpufreq`,
    /// ordered by cpu number.
    pub fn collect_frequencies_all(&self) -> Result<Vec<CpuFrequency>, CollectError> {
        let freqs: Vec<CpuFrequency> = self
            .cpu_dirs()
            .into_iter()
            .filter_map(|(cpu, dir)| {
                let freq_dir = dir.join("cpufreq");
                if self.fs.exists(&freq_dir) {
                    Some(self.read_frequency(cpu, &freq_dir))
                } else {
                    trace!(cpu, "no cpufreq directory");
                    None
                }
            })
            .collect();

        if freqs.is_empty() {
            debug!(root = %self.cpu_root().display(), "no cpufreq subtree");
            return Err(CollectError::unavailable("CPU frequency information"));
        }
        Ok(freqs)
    }

    /// Collects socket and core layout from `cpuN/topology`.
    pub fn collect_topology(&self) -> Result<CpuTopology, CollectError> {
        let cpus = self.cpu_dirs();
        if cpus.is_empty() {
            debug!(root = %self.cpu_root().display(), "no per-cpu directories");
            return Err(CollectError::unavailable("CPU topology information"));
        }

        let mut topology = CpuTopology::default();
        for (cpu, dir) in cpus {
            let package = read_scalar::<u32, _>(&self.fs, &dir.join("topology/physical_package_id"));
            let core = read_scalar::<u32, _>(&self.fs, &dir.join("topology/core_id"));

            if let Some(package) = package {
                topology.sockets.entry(package).or_default().push(cpu);
            }
            if let Some(core) = core {
                topology.cores.entry(core).or_default().push(cpu);
            }
            if package.is_none() && core.is_none() {
                trace!(cpu, "no topology information");
            }
        }

        Ok(topology)
    }

    /// Parses `/sys/devices/system/cpu/online` into cpu numbers.
    pub fn online_cpus(&self) -> Result<Vec<u32>, CollectError> {
        let path = self.cpu_root().join("online");
        let content = read_source(&self.fs, &path)?;
        parse_cpu_list(&content).map_err(|e| CollectError::parse(&path, e.message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::mock::MockFs;

    fn collector(fs: MockFs) -> CpuCollector<MockFs> {
        CpuCollector::new(fs, SourcePaths::default())
    }

    #[test]
    fn test_identity_typical() {
        let cpu = collector(MockFs::typical_system()).collect_identity().unwrap();
        assert_eq!(cpu.model_name, "Intel(R) Core(TM) i5-8250U CPU @ 1.60GHz");
        assert_eq!(cpu.vendor, "GenuineIntel");
        assert_eq!(cpu.family, "6");
        assert_eq!(cpu.model, "142");
        assert_eq!(cpu.stepping, "10");
        assert_eq!(cpu.microcode, "0xf4");
        assert_eq!(cpu.cache_size, "6144 KB");
        assert_eq!(cpu.base_mhz, 1800.0);
        assert_eq!(cpu.logical_cores, 4);
        assert_eq!(cpu.physical_cores, 2);
        assert_eq!(cpu.siblings, 4);
        assert!(cpu.has_flag("avx2"));
        assert_eq!(cpu.flags.first().map(String::as_str), Some("fpu"));
    }

    #[test]
    fn test_identity_shared_core() {
        let cpu = collector(MockFs::shared_core()).collect_identity().unwrap();
        assert_eq!(cpu.logical_cores, 2);
        assert_eq!(cpu.physical_cores, 1);
    }

    #[test]
    fn test_identity_falls_back_to_online_list() {
        let mut fs = MockFs::new();
        fs.add_file("/proc/cpuinfo", "Hardware\t: BCM2835\nmodel name\t: ARMv7\n");
        fs.add_file("/sys/devices/system/cpu/online", "0-3\n");

        let cpu = collector(fs).collect_identity().unwrap();
        assert_eq!(cpu.logical_cores, 4);
        assert_eq!(cpu.physical_cores, 4);
    }

    #[test]
    fn test_identity_counts_core_id_rows_without_processor_rows() {
        let mut fs = MockFs::new();
        fs.add_file("/proc/cpuinfo", "core id\t: 0\ncore id\t: 1\n");

        let cpu = collector(fs).collect_identity().unwrap();
        assert_eq!(cpu.logical_cores, 2);
        assert_eq!(cpu.physical_cores, 2);
        assert!(cpu.physical_cores <= cpu.logical_cores);
    }

    #[test]
    fn test_identity_missing_file() {
        let err = collector(MockFs::new()).collect_identity().unwrap_err();
        assert!(matches!(err, CollectError::Io { .. }));
    }

    #[test]
    fn test_load_typical() {
        let load = collector(MockFs::typical_system()).collect_load().unwrap();
        assert_eq!(load.load1, 0.15);
        assert_eq!(load.load15, 0.05);
        assert_eq!(load.times.total(), 94800);
        assert!((load.usage_percent - 14.556962).abs() < 1e-4);
    }

    #[test]
    fn test_load_partial_sources() {
        let mut fs = MockFs::new();
        fs.add_file("/proc/loadavg", "1.00 2.00 3.00 1/1 1\n");
        let load = collector(fs).collect_load().unwrap();
        assert_eq!(load.load5, 2.0);
        assert_eq!(load.usage_percent, 0.0);

        assert!(collector(MockFs::new()).collect_load().is_err());
    }

    #[test]
    fn test_frequencies_first_cpu_only() {
        let freqs = collector(MockFs::typical_system())
            .collect_frequencies()
            .unwrap();
        assert_eq!(freqs.len(), 1);
        let f = &freqs[0];
        assert_eq!(f.cpu, 0);
        assert_eq!(f.current_mhz, Some(1800.0));
        assert_eq!(f.min_mhz, Some(400.0));
        assert_eq!(f.max_mhz, Some(3400.0));
        assert_eq!(f.governor.as_deref(), Some("powersave"));
        assert_eq!(f.driver.as_deref(), Some("intel_pstate"));
    }

    #[test]
    fn test_frequencies_all_ordered() {
        let mut fs = MockFs::typical_system();
        fs.add_cpu(10, 0, 2, Some((2_000_000, 400_000, 3_400_000)));
        let freqs = collector(fs).collect_frequencies_all().unwrap();
        let cpus: Vec<u32> = freqs.iter().map(|f| f.cpu).collect();
        assert_eq!(cpus, vec![0, 1, 2, 3, 10]);
        assert_eq!(freqs[1].current_mhz, Some(1900.0));
    }

    #[test]
    fn test_frequencies_missing_slots() {
        let mut fs = MockFs::new();
        fs.add_file("/sys/devices/system/cpu/cpu0/cpufreq/scaling_cur_freq", "1200000\n");
        let freqs = collector(fs).collect_frequencies().unwrap();
        assert_eq!(freqs[0].current_mhz, Some(1200.0));
        assert_eq!(freqs[0].min_mhz, None);
        assert_eq!(freqs[0].governor, None);
    }

    #[test]
    fn test_frequencies_unavailable() {
        let err = collector(MockFs::no_cpufreq())
            .collect_frequencies()
            .unwrap_err();
        assert_eq!(err.to_string(), "CPU frequency information not available");
        assert!(collector(MockFs::new()).collect_frequencies_all().is_err());
    }

    #[test]
    fn test_topology_typical() {
        let topo = collector(MockFs::typical_system())
            .collect_topology()
            .unwrap();
        assert_eq!(topo.socket_count(), 1);
        assert_eq!(topo.sockets.get(&0), Some(&vec![0, 1, 2, 3]));
        assert_eq!(topo.cores.get(&0), Some(&vec![0, 2]));
        assert_eq!(topo.cores_per_socket(), 2);
    }

    #[test]
    fn test_topology_unavailable() {
        assert!(collector(MockFs::new()).collect_topology().is_err());
    }

    #[test]
    fn test_online_cpus() {
        let c = collector(MockFs::typical_system());
        assert_eq!(c.online_cpus().unwrap(), vec![0, 1, 2, 3]);

        let mut fs = MockFs::new();
        fs.add_file("/sys/devices/system/cpu/online", "garbage\n");
        let err = collector(fs).online_cpus().unwrap_err();
        assert!(matches!(err, CollectError::Parse { .. }));
    }
}
