//! In-memory mock filesystem for testing probes without a real `/proc`.
//!
//! `MockFs` simulates `/proc`, `/sys` and `/etc` in memory so tests run
//! the same on any host, including CI containers with a trimmed `/sys`.

use crate::collector::traits::FileSystem;
use std::collections::{HashMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};

/// In-memory filesystem for testing.
#[derive(Debug, Clone, Default)]
pub struct MockFs {
    /// Map from path to file contents.
    files: HashMap<PathBuf, String>,
    /// Set of directories (for read_dir support).
    directories: HashSet<PathBuf>,
}

impl MockFs {
    /// Creates a new empty mock filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file with the given content.
    ///
    /// Parent directories are automatically created.
    pub fn add_file(&mut self, path: impl AsRef<Path>, content: impl Into<String>) {
        let path = path.as_ref().to_path_buf();
        self.add_parents(&path);
        self.files.insert(path, content.into());
    }

    /// Adds an empty directory, creating its parents.
    pub fn add_dir(&mut self, path: impl AsRef<Path>) {
        let path = path.as_ref().to_path_buf();
        self.add_parents(&path);
        self.directories.insert(path);
    }

    /// Removes a file, keeping its directory.
    pub fn remove_file(&mut self, path: impl AsRef<Path>) {
        self.files.remove(path.as_ref());
    }

    fn add_parents(&mut self, path: &Path) {
        let mut parent = path.parent();
        while let Some(p) = parent {
            if !p.as_os_str().is_empty() {
                self.directories.insert(p.to_path_buf());
            }
            parent = p.parent();
        }
    }

    /// Adds a process with its `status` and `cmdline` files.
    ///
    /// `rss_kib` of `None` omits the `VmRSS:` line, as for kernel threads.
    pub fn add_process(&mut self, pid: u32, name: &str, rss_kib: Option<u64>, cmdline: &str) {
        let base = PathBuf::from(format!("/proc/{}", pid));
        let mut status = format!("Name:\t{}\nState:\tS (sleeping)\nPid:\t{}\n", name, pid);
        if let Some(rss) = rss_kib {
            status.push_str(&format!("VmRSS:\t{:>8} kB\n", rss));
        }
        self.add_file(base.join("status"), status);
        self.add_file(base.join("cmdline"), cmdline);
    }

    /// Adds `/sys/devices/system/cpu/cpuN` with topology and optional cpufreq.
    ///
    /// Frequencies are given in kHz, as the kernel reports them.
    pub fn add_cpu(&mut self, cpu: u32, package: u32, core: u32, freq_khz: Option<(u64, u64, u64)>) {
        let base = PathBuf::from(format!("/sys/devices/system/cpu/cpu{}", cpu));
        self.add_file(base.join("topology/physical_package_id"), format!("{}\n", package));
        self.add_file(base.join("topology/core_id"), format!("{}\n", core));
        if let Some((cur, min, max)) = freq_khz {
            let freq = base.join("cpufreq");
            self.add_file(freq.join("scaling_cur_freq"), format!("{}\n", cur));
            self.add_file(freq.join("scaling_min_freq"), format!("{}\n", min));
            self.add_file(freq.join("scaling_max_freq"), format!("{}\n", max));
            self.add_file(freq.join("scaling_governor"), "powersave\n");
            self.add_file(freq.join("scaling_driver"), "intel_pstate\n");
        }
    }

    /// Adds `/sys/block/<name>` with the usual attributes.
    pub fn add_block_device(&mut self, name: &str, sectors: u64, rotational: bool) {
        let base = PathBuf::from(format!("/sys/block/{}", name));
        self.add_file(base.join("size"), format!("{}\n", sectors));
        self.add_file(base.join("removable"), "0\n");
        self.add_file(
            base.join("queue/rotational"),
            if rotational { "1\n" } else { "0\n" },
        );
    }

    /// Loads a mock filesystem from an on-disk tree mounted at `virtual_root`.
    ///
    /// Useful for regression tests with captured `/proc` or `/sys` snapshots.
    pub fn from_snapshot(dir: &Path, virtual_root: &Path) -> io::Result<Self> {
        let mut fs = Self::new();
        load_directory_recursive(&mut fs, dir, virtual_root)?;
        Ok(fs)
    }
}

fn load_directory_recursive(
    fs: &mut MockFs,
    real_path: &Path,
    virtual_path: &Path,
) -> io::Result<()> {
    fs.add_dir(virtual_path);

    for entry in std::fs::read_dir(real_path)? {
        let entry = entry?;
        let file_type = entry.file_type()?;
        let real_child = entry.path();
        let virtual_child = virtual_path.join(entry.file_name());

        if file_type.is_dir() {
            load_directory_recursive(fs, &real_child, &virtual_child)?;
        } else if file_type.is_file()
            && let Ok(content) = std::fs::read_to_string(&real_child)
        {
            fs.add_file(&virtual_child, content);
        }
    }
    Ok(())
}

impl FileSystem for MockFs {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.files.get(path).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("file not found: {:?}", path),
            )
        })
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.contains_key(path) || self.directories.contains(path)
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        if !self.directories.contains(path) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("directory not found: {:?}", path),
            ));
        }

        let mut entries = HashSet::new();

        for file_path in self.files.keys() {
            if file_path.parent().is_some_and(|parent| parent == path) {
                entries.insert(file_path.clone());
            }
        }

        for dir_path in &self.directories {
            if dir_path.parent().is_some_and(|parent| parent == path) && dir_path != path {
                entries.insert(dir_path.clone());
            }
        }

        Ok(entries.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_fs_add_file() {
        let mut fs = MockFs::new();
        fs.add_file("/proc/meminfo", "MemTotal: 16384 kB\n");

        assert!(fs.exists(Path::new("/proc/meminfo")));
        assert!(fs.exists(Path::new("/proc")));

        let content = fs.read_to_string(Path::new("/proc/meminfo")).unwrap();
        assert_eq!(content, "MemTotal: 16384 kB\n");
    }

    #[test]
    fn test_mock_fs_read_dir() {
        let mut fs = MockFs::new();
        fs.add_process(1, "init", Some(1024), "/sbin/init\0");
        fs.add_process(2, "kthreadd", None, "");

        let proc_entries = fs.read_dir(Path::new("/proc")).unwrap();
        assert_eq!(proc_entries.len(), 2);

        let proc1_entries = fs.read_dir(Path::new("/proc/1")).unwrap();
        assert_eq!(proc1_entries.len(), 2); // status and cmdline

        assert!(fs.read_dir(Path::new("/proc/3")).is_err());
    }

    #[test]
    fn test_mock_fs_remove_file() {
        let mut fs = MockFs::new();
        fs.add_block_device("sda", 2048, true);
        fs.remove_file("/sys/block/sda/queue/rotational");

        assert!(!fs.exists(Path::new("/sys/block/sda/queue/rotational")));
        assert!(fs.exists(Path::new("/sys/block/sda/queue")));
    }

    #[test]
    fn test_mock_fs_from_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("block/sda")).unwrap();
        std::fs::write(dir.path().join("block/sda/size"), "2048\n").unwrap();

        let fs = MockFs::from_snapshot(dir.path(), Path::new("/sys")).unwrap();
        assert_eq!(
            fs.read_to_string(Path::new("/sys/block/sda/size")).unwrap(),
            "2048\n"
        );
        assert!(fs.exists(Path::new("/sys/block")));
    }
}
