//! Memory probes: RAM/swap summary and per-process resident memory.

use std::path::Path;

use tracing::trace;

use crate::collector::SourcePaths;
use crate::collector::error::CollectError;
use crate::collector::parser::{parse_cmdline, parse_meminfo, parse_proc_status};
use crate::collector::reader::{KvPairs, entry_name, read_source};
use crate::collector::traits::FileSystem;
use crate::model::{MemorySummary, ProcessMemory};

/// Number of processes shown when no limit is given.
pub const DEFAULT_TOP_PROCESSES: usize = 15;

fn is_pid_dir(name: &str) -> bool {
    !name.is_empty() && name.bytes().all(|b| b.is_ascii_digit())
}

/// Collects memory accounting from `/proc`.
pub struct MemoryCollector<F: FileSystem> {
    fs: F,
    paths: SourcePaths,
}

impl<F: FileSystem> MemoryCollector<F> {
    /// Creates a new memory collector.
    pub fn new(fs: F, paths: SourcePaths) -> Self {
        Self { fs, paths }
    }

    /// Collects RAM and swap totals from `/proc/meminfo`.
    pub fn collect_summary(&self) -> Result<MemorySummary, CollectError> {
        let path = self.paths.proc.join("meminfo");
        let content = read_source(&self.fs, &path)?;
        Ok(parse_meminfo(KvPairs::new(content, ':')))
    }

    fn collect_process(&self, pid: u32, dir: &Path) -> Option<ProcessMemory> {
        let status = self.fs.read_to_string(&dir.join("status")).ok()?;
        let status = parse_proc_status(&status);
        if status.name.is_empty() || status.vm_rss_kib == 0 {
            return None;
        }

        let cmdline = self
            .fs
            .read_to_string(&dir.join("cmdline"))
            .map(|raw| parse_cmdline(&raw))
            .unwrap_or_default();

        Some(ProcessMemory {
            pid,
            name: status.name,
            rss_kib: status.vm_rss_kib,
            cmdline,
        })
    }

    /// Collects every process with a name and a positive resident set,
    /// largest first. Ties are ordered by pid.
    ///
    /// Processes that vanish or cannot be read are skipped.
    pub fn collect_processes(&self) -> Result<Vec<ProcessMemory>, CollectError> {
        let entries = self
            .fs
            .read_dir(&self.paths.proc)
            .map_err(|e| CollectError::io(&self.paths.proc, e))?;

        let mut processes: Vec<ProcessMemory> = entries
            .iter()
            .filter_map(|dir| {
                let name = entry_name(dir).filter(|n| is_pid_dir(n))?;
                let pid: u32 = name.parse().ok()?;
                let process = self.collect_process(pid, dir);
                if process.is_none() {
                    trace!(pid, "skipping process");
                }
                process
            })
            .collect();

        processes.sort_by(|a, b| b.rss_kib.cmp(&a.rss_kib).then(a.pid.cmp(&b.pid)));
        Ok(processes)
    }

    /// Returns the `limit` processes with the largest resident set.
    pub fn top_processes(&self, limit: usize) -> Result<Vec<ProcessMemory>, CollectError> {
        let mut processes = self.collect_processes()?;
        processes.truncate(limit);
        Ok(processes)
    }
}
