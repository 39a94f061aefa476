//! Storage probes: block device inventory, mount usage and I/O counters.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::{debug, trace};

use crate::collector::SourcePaths;
use crate::collector::error::CollectError;
use crate::collector::parser::{MountEntry, parse_bracketed, parse_diskstats, parse_mounts};
use crate::collector::reader::{entry_name, list_dir, read_line, read_scalar, read_source};
use crate::collector::traits::{FileSystem, SystemApi};
use crate::fmt::format_bytes;
use crate::model::{BlockDevice, DiskIoStats, DiskKind, Mount, percent};

/// Sector size the kernel uses for `/sys/block/*/size`.
const SECTOR_SIZE: u64 = 512;

fn device_name(device: &str) -> &str {
    device.rsplit('/').next().unwrap_or(device)
}

fn is_virtual_device(name: &str) -> bool {
    name.starts_with("loop") || name.starts_with("ram")
}

/// Collects storage information from `/sys/block`, `/proc/mounts` and
/// `/proc/diskstats`.
pub struct DiskCollector<F: FileSystem, S: SystemApi> {
    fs: F,
    sys: S,
    paths: SourcePaths,
}

impl<F: FileSystem, S: SystemApi> DiskCollector<F, S> {
    /// Creates a new disk collector.
    ///
    /// # Arguments
    /// * `fs` - Filesystem implementation (real or mock)
    /// * `sys` - System call implementation, used for `statvfs`
    /// * `paths` - Roots of `/proc` and `/sys`
    pub fn new(fs: F, sys: S, paths: SourcePaths) -> Self {
        Self { fs, sys, paths }
    }

    fn read_device(&self, name: &str, dir: &Path) -> BlockDevice {
        let text = |file: &str| {
            read_line(&self.fs, &dir.join(file))
                .map(|s| s.trim_end().to_string())
                .unwrap_or_default()
        };
        let flag = |file: &str| read_scalar::<u8, _>(&self.fs, &dir.join(file)).map(|v| v == 1);

        let sectors: u64 = read_scalar(&self.fs, &dir.join("size")).unwrap_or(0);
        let size_bytes = sectors.saturating_mul(SECTOR_SIZE);
        let rotational = flag("queue/rotational").unwrap_or(true);

        let scheduler = read_line(&self.fs, &dir.join("queue/scheduler"))
            .and_then(|line| parse_bracketed(&line).map(str::to_string))
            .unwrap_or_default();

        let partitions = list_dir(&self.fs, dir, |child| {
            child != name && child.starts_with(name)
        })
        .iter()
        .filter_map(|path| entry_name(path).map(|n| format!("/dev/{}", n)))
        .collect();

        BlockDevice {
            device: format!("/dev/{}", name),
            model: text("device/model"),
            vendor: text("device/vendor"),
            kind: DiskKind::classify(name, rotational),
            size_bytes,
            size_human: format_bytes(size_bytes),
            removable: flag("removable").unwrap_or(false),
            rotational,
            scheduler,
            queue_depth: read_scalar(&self.fs, &dir.join("queue/nr_requests")).unwrap_or(0),
            partitions,
        }
    }

    /// Collects whole block devices from `/sys/block`, skipping `loop*`
    /// and `ram*` devices.
    pub fn collect_block_devices(&self) -> Result<Vec<BlockDevice>, CollectError> {
        let root = self.paths.sys.join("block");
        if !self.fs.exists(&root) {
            debug!(root = %root.display(), "no block device subtree");
            return Err(CollectError::unavailable("block device information"));
        }

        Ok(list_dir(&self.fs, &root, |name| !is_virtual_device(name))
            .iter()
            .filter_map(|dir| Some(self.read_device(entry_name(dir)?, dir)))
            .collect())
    }

    fn measure(&self, entry: MountEntry) -> Option<Mount> {
        let stats = match self.sys.statvfs(Path::new(&entry.mountpoint)) {
            Ok(stats) => stats,
            Err(e) => {
                trace!(mountpoint = %entry.mountpoint, error = %e, "statvfs failed");
                return None;
            }
        };

        let frsize = stats.fragment_size;
        let total_bytes = stats.blocks.saturating_mul(frsize);
        let used_bytes = stats
            .blocks
            .saturating_sub(stats.blocks_free)
            .saturating_mul(frsize);

        Some(Mount {
            device: entry.device,
            mountpoint: entry.mountpoint,
            fs_type: entry.fs_type,
            total_bytes,
            used_bytes,
            available_bytes: stats.blocks_available.saturating_mul(frsize),
            usage_percent: percent(used_bytes, total_bytes),
            options: entry.options,
        })
    }

    /// Collects block-backed mounts from `/proc/mounts` with their usage.
    ///
    /// Mounts whose `statvfs` fails are skipped.
    pub fn collect_mounts(&self) -> Result<Vec<Mount>, CollectError> {
        let path = self.paths.proc.join("mounts");
        let content = read_source(&self.fs, &path)?;

        Ok(parse_mounts(&content)
            .into_iter()
            .filter(MountEntry::is_block_backed)
            .filter_map(|entry| self.measure(entry))
            .collect())
    }

    /// Collects cumulative I/O counters from `/proc/diskstats`.
    pub fn collect_diskstats(&self) -> Result<Vec<DiskIoStats>, CollectError> {
        let path = self.paths.proc.join("diskstats");
        let content = read_source(&self.fs, &path)?;
        parse_diskstats(&content).map_err(|e| CollectError::parse(&path, e.message))
    }
}

/// Devices grouped by kind and mounted devices grouped by filesystem type.
///
/// Both maps hold kernel device names (`sda`, `nvme0n1p2`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiskTypes {
    /// Kind to device names, in inventory order.
    pub by_kind: BTreeMap<DiskKind, Vec<String>>,
    /// Filesystem type to device names, in mount order.
    pub by_fs_type: BTreeMap<String, Vec<String>>,
}

impl DiskTypes {
    pub fn group(devices: &[BlockDevice], mounts: &[Mount]) -> Self {
        let mut types = Self::default();
        for dev in devices {
            types
                .by_kind
                .entry(dev.kind)
                .or_default()
                .push(dev.name().to_string());
        }
        for mount in mounts {
            types
                .by_fs_type
                .entry(mount.fs_type.clone())
                .or_default()
                .push(device_name(&mount.device).to_string());
        }
        types
    }
}
