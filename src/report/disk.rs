//! `diskls` report.

use std::collections::BTreeMap;
use std::io::{self, Write};

use crate::collector::{CollectError, DiskCollector, DiskTypes, FileSystem, SystemApi};
use crate::fmt::format_bytes;
use crate::model::{BlockDevice, DiskIoStats, Mount};
use crate::report::Report;

/// Sections selected on the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiskView {
    pub detailed: bool,
    pub usage: bool,
    pub mounts: bool,
    pub types: bool,
}

/// Renders the device inventory and every selected section.
pub fn render<F: FileSystem, S: SystemApi, W: Write>(
    report: &mut Report<W>,
    collector: &DiskCollector<F, S>,
    view: &DiskView,
) -> io::Result<()> {
    let devices = collector.collect_block_devices();
    let io_stats: BTreeMap<String, DiskIoStats> = if view.detailed {
        collector
            .collect_diskstats()
            .unwrap_or_default()
            .into_iter()
            .map(|s| (s.device.clone(), s))
            .collect()
    } else {
        BTreeMap::new()
    };
    render_devices(report, &devices, &io_stats, view.detailed)?;

    if !(view.usage || view.mounts || view.types) {
        return Ok(());
    }
    let mounts = collector.collect_mounts();

    if view.usage {
        render_usage(report, &mounts)?;
    }
    if view.mounts {
        render_mounts(report, &mounts, view.detailed)?;
    }
    if view.types {
        render_types(report, &devices, &mounts)?;
    }
    Ok(())
}

fn partition_names(device: &BlockDevice) -> String {
    device
        .partitions
        .iter()
        .map(|p| p.rsplit('/').next().unwrap_or(p))
        .collect::<Vec<_>>()
        .join(", ")
}

fn render_devices<W: Write>(
    report: &mut Report<W>,
    devices: &Result<Vec<BlockDevice>, CollectError>,
    io_stats: &BTreeMap<String, DiskIoStats>,
    detailed: bool,
) -> io::Result<()> {
    report.section("Disk Information")?;

    let devices = match devices {
        Ok(devices) if devices.is_empty() => return report.line("No disks found"),
        Ok(devices) => devices,
        Err(e) => return report.warning(e),
    };

    for dev in devices {
        report.heading(&dev.device)?;
        if !dev.model.is_empty() {
            report.sub_field("Model:", &dev.model)?;
        }
        if !dev.vendor.is_empty() {
            report.sub_field("Vendor:", &dev.vendor)?;
        }
        report.sub_field("Type:", dev.kind)?;

        let size = if detailed {
            let bytes = format!(" ({} bytes)", dev.size_bytes);
            format!("{}{}", dev.size_human, report.palette().dim(&bytes))
        } else {
            dev.size_human.clone()
        };
        report.sub_field("Size:", size)?;

        if dev.removable {
            report.sub_field("Removable:", "Yes")?;
        }

        if detailed {
            if !dev.scheduler.is_empty() {
                report.sub_field("Scheduler:", &dev.scheduler)?;
            }
            if dev.queue_depth > 0 {
                report.sub_field("Queue depth:", dev.queue_depth)?;
            }
            if !dev.partitions.is_empty() {
                report.sub_field("Partitions:", partition_names(dev))?;
            }
            if let Some(stats) = io_stats.get(dev.name()) {
                report.sub_field("I/O read:", format!("{} sectors", stats.sectors_read))?;
                report.sub_field("I/O written:", format!("{} sectors", stats.sectors_written))?;
            }
        }
        report.blank()?;
    }
    Ok(())
}

fn render_usage<W: Write>(
    report: &mut Report<W>,
    mounts: &Result<Vec<Mount>, CollectError>,
) -> io::Result<()> {
    report.section("Disk Usage")?;

    let mounts = match mounts {
        Ok(mounts) if mounts.is_empty() => return report.line("No mounted partitions found"),
        Ok(mounts) => mounts,
        Err(e) => return report.warning(e),
    };

    report.line(format!(
        "{:<20}{:<15}{:<15}{:<15}{:<8}MOUNTED ON",
        "DEVICE", "SIZE", "USED", "AVAILABLE", "USE%"
    ))?;
    report.separator()?;

    for mount in mounts {
        report.line(format!(
            "{:<20}{:<15}{:<15}{:<15}{:<7}%{}",
            truncate_device(&mount.device),
            format_bytes(mount.total_bytes),
            format_bytes(mount.used_bytes),
            format_bytes(mount.available_bytes),
            format!("{:.0}", mount.usage_percent),
            mount.mountpoint
        ))?;
    }
    Ok(())
}

/// Device column is 20 wide; keep at least one space of separation.
fn truncate_device(device: &str) -> String {
    device.chars().take(19).collect()
}

fn render_mounts<W: Write>(
    report: &mut Report<W>,
    mounts: &Result<Vec<Mount>, CollectError>,
    detailed: bool,
) -> io::Result<()> {
    report.section("Mount Information")?;

    let mounts = match mounts {
        Ok(mounts) => mounts,
        Err(e) => return report.warning(e),
    };

    for mount in mounts {
        report.heading(&mount.device)?;
        report.sub_field("Mount point:", &mount.mountpoint)?;
        report.sub_field("Filesystem:", &mount.fs_type)?;
        if detailed {
            report.sub_field("Mount options:", &mount.options)?;
        }
        report.blank()?;
    }
    Ok(())
}

fn render_group<W: Write, K: std::fmt::Display>(
    report: &mut Report<W>,
    title: &str,
    groups: &BTreeMap<K, Vec<String>>,
) -> io::Result<()> {
    report.heading(title)?;
    for (key, names) in groups {
        report.line(format!("  {}:", key))?;
        report.line(format!("    {}", names.join(", ")))?;
    }
    Ok(())
}

fn render_types<W: Write>(
    report: &mut Report<W>,
    devices: &Result<Vec<BlockDevice>, CollectError>,
    mounts: &Result<Vec<Mount>, CollectError>,
) -> io::Result<()> {
    report.section("Disk Types and Filesystems")?;

    let devices = devices.as_deref().unwrap_or_default();
    let mounts = mounts.as_deref().unwrap_or_default();
    let types = DiskTypes::group(devices, mounts);

    render_group(report, "Disk Types:", &types.by_kind)?;
    report.blank()?;
    render_group(report, "Filesystems:", &types.by_fs_type)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::{MockFs, MockSystem, SourcePaths};
    use crate::report::{Palette, render_to_string};

    fn all() -> DiskView {
        DiskView {
            detailed: true,
            usage: true,
            mounts: true,
            types: true,
        }
    }

    fn render_view(fs: MockFs, sys: MockSystem, view: DiskView, palette: Palette) -> String {
        let collector = DiskCollector::new(fs, sys, SourcePaths::default());
        render_to_string(palette, |r| render(r, &collector, &view))
    }

    #[test]
    fn test_inventory_basic() {
        let out = render_view(
            MockFs::disk_inventory(),
            MockSystem::new(),
            DiskView::default(),
            Palette::plain(),
        );
        assert!(out.contains("/dev/nvme0n1\n  Type:           NVMe\n  Size:           2.0 MiB\n"));
        assert!(out.contains("/dev/sda\n  Type:           HDD\n  Size:           1.0 MiB\n"));
        assert!(!out.contains("loop0"));
        assert!(!out.contains("Disk Usage"));
    }

    #[test]
    fn test_inventory_detailed() {
        let view = DiskView {
            detailed: true,
            ..Default::default()
        };
        let out = render_view(
            MockFs::typical_system(),
            MockSystem::new(),
            view,
            Palette::plain(),
        );
        assert!(out.contains("  Model:          WDC WD5000AAKX\n"));
        assert!(out.contains("  Size:           465.8 GiB (500107862016 bytes)\n"));
        assert!(out.contains("  Scheduler:      mq-deadline\n"));
        assert!(out.contains("  Partitions:     nvme0n1p1, nvme0n1p2\n"));
        assert!(out.contains("  I/O read:       987654 sectors\n"));
    }

    #[test]
    fn test_no_disks() {
        let mut fs = MockFs::new();
        fs.add_dir("/sys/block");
        let out = render_view(fs, MockSystem::new(), DiskView::default(), Palette::plain());
        assert!(out.contains("No disks found\n"));

        let out = render_view(
            MockFs::new(),
            MockSystem::new(),
            DiskView::default(),
            Palette::plain(),
        );
        assert!(out.contains("Warning: block device information not available\n"));
    }

    #[test]
    fn test_usage_table() {
        let out = render_view(
            MockFs::typical_system(),
            MockSystem::typical(),
            all(),
            Palette::plain(),
        );
        assert!(out.contains(
            "DEVICE              SIZE           USED           AVAILABLE      USE%    MOUNTED ON\n"
        ));
        assert!(out.contains(
            "/dev/nvme0n1p2      3.9 MiB        2.3 MiB        1.4 MiB        60     %/\n"
        ));
    }

    #[test]
    fn test_mounts_and_types() {
        let out = render_view(
            MockFs::typical_system(),
            MockSystem::typical(),
            all(),
            Palette::plain(),
        );
        assert!(out.contains("/dev/sda1\n  Mount point:    /home\n  Filesystem:     xfs\n"));
        assert!(out.contains("  Mount options:  rw,relatime,attr2,inode64\n"));
        assert!(out.contains("Disk Types:\n  HDD:\n    sda\n  NVMe:\n    nvme0n1\n"));
        assert!(out.contains("Filesystems:\n  ext4:\n    nvme0n1p2\n  xfs:\n    sda1\n"));
    }

    #[test]
    fn test_no_mounts() {
        let mut fs = MockFs::disk_inventory();
        fs.add_file("/proc/mounts", "proc /proc proc rw 0 0\n");
        let view = DiskView {
            usage: true,
            ..Default::default()
        };
        let out = render_view(fs, MockSystem::new(), view, Palette::plain());
        assert!(out.contains("No mounted partitions found\n"));
    }

    #[test]
    fn test_no_escapes_without_color() {
        let out = render_view(
            MockFs::typical_system(),
            MockSystem::typical(),
            all(),
            Palette::plain(),
        );
        assert!(!out.contains("\x1b["));
    }
}
