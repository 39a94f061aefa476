//! `cpuinfo` report.

use std::io::{self, Write};

use crate::collector::{CollectError, CpuCollector, FileSystem};
use crate::fmt::{format_frequency, format_percent};
use crate::model::{CpuFrequency, CpuIdentity};
use crate::report::Report;

const FLAG_COLUMNS: usize = 4;
const FLAG_WIDTH: usize = 15;

/// Sections selected on the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CpuView {
    pub detailed: bool,
    pub load: bool,
    pub frequencies: bool,
    pub topology: bool,
}

/// Renders the identity section and every selected section.
pub fn render<F: FileSystem, W: Write>(
    report: &mut Report<W>,
    collector: &CpuCollector<F>,
    view: &CpuView,
) -> io::Result<()> {
    render_identity(report, collector.collect_identity(), view.detailed)?;

    if view.load {
        render_load(report, collector, view.detailed)?;
    }
    if view.frequencies {
        render_frequencies(report, collector, view.detailed)?;
    }
    if view.topology {
        render_topology(report, collector, view.detailed)?;
    }
    Ok(())
}

fn render_identity<W: Write>(
    report: &mut Report<W>,
    identity: Result<CpuIdentity, CollectError>,
    detailed: bool,
) -> io::Result<()> {
    report.section("CPU Information")?;

    let cpu = match identity {
        Ok(cpu) => cpu,
        Err(e) => return report.warning(e),
    };

    if !cpu.model_name.is_empty() {
        report.field("Model:", &cpu.model_name)?;
    }
    if !cpu.vendor.is_empty() {
        report.field("Vendor:", &cpu.vendor)?;
    }
    if cpu.logical_cores > 0 {
        report.field("Logical cores:", cpu.logical_cores)?;
    }
    if cpu.physical_cores > 0 && cpu.physical_cores != cpu.logical_cores {
        report.field("Physical cores:", cpu.physical_cores)?;
    }
    if cpu.base_mhz > 0.0 {
        report.field("Base frequency:", format_frequency(cpu.base_mhz))?;
    }
    if !cpu.cache_size.is_empty() {
        report.field("Cache size:", &cpu.cache_size)?;
    }

    if !detailed {
        return Ok(());
    }

    for (label, value) in [
        ("CPU family:", &cpu.family),
        ("Model number:", &cpu.model),
        ("Stepping:", &cpu.stepping),
        ("Microcode:", &cpu.microcode),
    ] {
        if !value.is_empty() {
            report.field(label, value)?;
        }
    }
    if cpu.siblings > 0 {
        report.field("Siblings:", cpu.siblings)?;
    }

    if !cpu.flags.is_empty() {
        report.line("Features:")?;
        for row in cpu.flags.chunks(FLAG_COLUMNS) {
            let cells: String = row
                .iter()
                .map(|flag| format!("{:<width$}", flag, width = FLAG_WIDTH))
                .collect();
            report.line(format!("  {}", cells))?;
        }
    }
    Ok(())
}

fn render_load<F: FileSystem, W: Write>(
    report: &mut Report<W>,
    collector: &CpuCollector<F>,
    detailed: bool,
) -> io::Result<()> {
    report.section("CPU Load")?;

    let load = match collector.collect_load() {
        Ok(load) => load,
        Err(e) => return report.warning(e),
    };

    report.field(
        "Load average:",
        format!("{:.2}, {:.2}, {:.2}", load.load1, load.load5, load.load15),
    )?;
    report.field("CPU usage:", format_percent(load.usage_percent))?;

    if detailed {
        let jiffies = |n: u64| format!("{} jiffies", n);
        report.field("User time:", jiffies(load.times.user))?;
        report.field("System time:", jiffies(load.times.system))?;
        report.field("Idle time:", jiffies(load.times.idle))?;
        report.field("I/O wait time:", jiffies(load.times.iowait))?;
    }
    Ok(())
}

fn render_frequency<W: Write>(report: &mut Report<W>, freq: &CpuFrequency) -> io::Result<()> {
    for (label, mhz) in [
        ("Current:", freq.current_mhz),
        ("Minimum:", freq.min_mhz),
        ("Maximum:", freq.max_mhz),
    ] {
        if let Some(mhz) = mhz.filter(|m| *m > 0.0) {
            report.field(label, format_frequency(mhz))?;
        }
    }
    if let Some(governor) = &freq.governor {
        report.field("Governor:", governor)?;
    }
    if let Some(driver) = &freq.driver {
        report.field("Driver:", driver)?;
    }
    Ok(())
}

fn render_frequencies<F: FileSystem, W: Write>(
    report: &mut Report<W>,
    collector: &CpuCollector<F>,
    detailed: bool,
) -> io::Result<()> {
    report.section("CPU Frequency")?;

    let freqs = match collector.collect_frequencies() {
        Ok(freqs) => freqs,
        Err(_) => {
            report.warning("CPU frequency information not available")?;
            return report.line("This may require cpufreq driver support or root privileges");
        }
    };
    if let Some(first) = freqs.first() {
        render_frequency(report, first)?;
    }

    if detailed
        && let Ok(all) = collector.collect_frequencies_all()
        && all.len() > 1
    {
        report.line("Per-CPU current:")?;
        for freq in &all {
            let current = freq
                .current_mhz
                .map(format_frequency)
                .unwrap_or_else(|| "-".to_string());
            report.sub_field(&format!("cpu{}:", freq.cpu), current)?;
        }
    }
    Ok(())
}

fn render_topology<F: FileSystem, W: Write>(
    report: &mut Report<W>,
    collector: &CpuCollector<F>,
    detailed: bool,
) -> io::Result<()> {
    report.section("CPU Topology")?;

    let topology = match collector.collect_topology() {
        Ok(topology) => topology,
        Err(_) => return report.warning("Could not read topology information"),
    };

    report.field("Sockets:", topology.socket_count())?;
    report.field("Cores per socket:", topology.cores_per_socket())?;

    if detailed {
        for (socket, cpus) in &topology.sockets {
            let list: Vec<String> = cpus.iter().map(u32::to_string).collect();
            report.line(format!("Socket {}: CPUs {}", socket, list.join(", ")))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::{MockFs, SourcePaths};
    use crate::report::{Palette, render_to_string};

    fn render_view(fs: MockFs, view: CpuView, palette: Palette) -> String {
        let collector = CpuCollector::new(fs, SourcePaths::default());
        render_to_string(palette, |r| render(r, &collector, &view))
    }

    #[test]
    fn test_basic_identity() {
        let out = render_view(MockFs::typical_system(), CpuView::default(), Palette::plain());
        assert!(out.starts_with("CPU Information\n===============\n"));
        assert!(out.contains("Model:            Intel(R) Core(TM) i5-8250U CPU @ 1.60GHz\n"));
        assert!(out.contains("Logical cores:    4\n"));
        assert!(out.contains("Physical cores:   2\n"));
        assert!(out.contains("Base frequency:   1.8 GHz\n"));
        assert!(!out.contains("Features:"));
        assert!(!out.contains("CPU Load"));
    }

    #[test]
    fn test_detailed_flags_in_columns() {
        let view = CpuView {
            detailed: true,
            ..Default::default()
        };
        let out = render_view(MockFs::typical_system(), view, Palette::plain());
        assert!(out.contains("Features:\n"));
        assert!(out.contains(
            "  fpu            vme            de             pse            \n"
        ));
        assert!(out.contains("Microcode:        0xf4\n"));
    }

    #[test]
    fn test_all_sections() {
        let view = CpuView {
            detailed: true,
            load: true,
            frequencies: true,
            topology: true,
        };
        let out = render_view(MockFs::typical_system(), view, Palette::plain());
        assert!(out.contains("\nCPU Load\n========\n"));
        assert!(out.contains("Load average:     0.15, 0.10, 0.05\n"));
        assert!(out.contains("CPU usage:        14.6%\n"));
        assert!(out.contains("I/O wait time:    1000 jiffies\n"));
        assert!(out.contains("Current:          1.8 GHz\n"));
        assert!(out.contains("Governor:         powersave\n"));
        assert!(out.contains("  cpu3:           2.1 GHz\n"));
        assert!(out.contains("Sockets:          1\n"));
        assert!(out.contains("Cores per socket: 2\n"));
        assert!(out.contains("Socket 0: CPUs 0, 1, 2, 3\n"));
    }

    #[test]
    fn test_missing_frequency_warns() {
        let mut fs = MockFs::no_cpufreq();
        fs.add_file("/proc/cpuinfo", "processor : 0\n");
        let view = CpuView {
            frequencies: true,
            ..Default::default()
        };
        let out = render_view(fs, view, Palette::plain());
        assert!(out.contains("Warning: CPU frequency information not available\n"));
        assert!(out.contains("This may require cpufreq driver support or root privileges\n"));
    }

    #[test]
    fn test_missing_sources_degrade() {
        let view = CpuView {
            load: true,
            topology: true,
            ..Default::default()
        };
        let out = render_view(MockFs::new(), view, Palette::plain());
        assert!(out.contains("Warning: cannot read /proc/cpuinfo"));
        assert!(out.contains("Warning: Could not read topology information\n"));
    }

    #[test]
    fn test_color_only_when_enabled() {
        let view = CpuView {
            load: true,
            ..Default::default()
        };
        let plain = render_view(MockFs::typical_system(), view, Palette::plain());
        assert!(!plain.contains("\x1b["));

        let colored = render_view(MockFs::typical_system(), view, Palette::new(true));
        assert!(colored.contains("\x1b["));
    }
}
