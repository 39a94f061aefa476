//! Storage records.

use std::fmt;

/// Coarse classification of a block device.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum DiskKind {
    #[default]
    Hdd,
    Ssd,
    Nvme,
}

impl DiskKind {
    /// `NVMe` by device name, otherwise `SSD` when not rotational.
    pub fn classify(name: &str, rotational: bool) -> Self {
        if name.starts_with("nvme") {
            DiskKind::Nvme
        } else if !rotational {
            DiskKind::Ssd
        } else {
            DiskKind::Hdd
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DiskKind::Hdd => "HDD",
            DiskKind::Ssd => "SSD",
            DiskKind::Nvme => "NVMe",
        }
    }
}

impl fmt::Display for DiskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A whole block device.
///
/// Source: `/sys/block/<name>/`
#[derive(Clone, Debug, PartialEq, Default)]
pub struct BlockDevice {
    /// `/dev/<name>`
    pub device: String,
    /// Source: `device/model`, trailing whitespace stripped
    pub model: String,
    /// Source: `device/vendor`, trailing whitespace stripped
    pub vendor: String,
    pub kind: DiskKind,
    /// `size` (512-byte sectors) * 512.
    pub size_bytes: u64,
    /// `size_bytes` in binary units, e.g. `"1.0 KiB"`.
    pub size_human: String,
    /// Source: `removable`
    pub removable: bool,
    /// Source: `queue/rotational`; assumed rotational when unreadable.
    pub rotational: bool,
    /// Active entry of `queue/scheduler`, empty if none is marked.
    pub scheduler: String,
    /// Source: `queue/nr_requests`
    pub queue_depth: u32,
    /// `/dev/<partition>` for each partition directory, sorted.
    pub partitions: Vec<String>,
}

impl BlockDevice {
    /// Kernel name of the device (`sda` for `/dev/sda`).
    pub fn name(&self) -> &str {
        self.device.rsplit('/').next().unwrap_or(&self.device)
    }
}

/// A mounted block-backed filesystem and its space usage.
///
/// Source: `/proc/mounts`, `statvfs(3)` on the mountpoint
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Mount {
    pub device: String,
    pub mountpoint: String,
    pub fs_type: String,
    /// `f_blocks * f_frsize`
    pub total_bytes: u64,
    /// `(f_blocks - f_bfree) * f_frsize`
    pub used_bytes: u64,
    /// `f_bavail * f_frsize`
    pub available_bytes: u64,
    /// `used / total * 100`, 0 when total is 0.
    pub usage_percent: f64,
    /// Raw comma-separated option string.
    pub options: String,
}

/// Cumulative I/O counters of one block device.
///
/// Source: `/proc/diskstats`
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct DiskIoStats {
    pub major: u32,
    pub minor: u32,
    pub device: String,
    pub reads_completed: u64,
    pub reads_merged: u64,
    pub sectors_read: u64,
    /// Milliseconds spent reading.
    pub time_reading: u64,
    pub writes_completed: u64,
    pub writes_merged: u64,
    pub sectors_written: u64,
    /// Milliseconds spent writing.
    pub time_writing: u64,
    pub io_in_progress: u64,
    /// Milliseconds spent doing I/O.
    pub time_io: u64,
    /// Weighted milliseconds spent doing I/O.
    pub weighted_time_io: u64,
}
