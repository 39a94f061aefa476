//! `meminfo` report.

use std::io::{self, Write};

use crate::collector::{FileSystem, MemoryCollector};
use crate::fmt::format_kib;
use crate::model::MemorySummary;
use crate::report::Report;

/// Sections selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryView {
    pub detailed: bool,
    pub processes: bool,
    pub swap: bool,
    /// Number of rows in the process table.
    pub top: usize,
}

/// Renders the summary, the swap section when swap exists or is requested,
/// and the process table when requested.
pub fn render<F: FileSystem, W: Write>(
    report: &mut Report<W>,
    collector: &MemoryCollector<F>,
    view: &MemoryView,
) -> io::Result<()> {
    report.section("Memory Information")?;
    match collector.collect_summary() {
        Ok(mem) => {
            render_summary(report, &mem, view.detailed)?;
            if mem.has_swap() || view.swap {
                render_swap(report, &mem)?;
            }
        }
        Err(e) => report.warning(e)?,
    }

    if view.processes {
        render_processes(report, collector, view.top)?;
    }
    Ok(())
}

/// Writes `label  <human size><dim (N kB[, extra])>`.
fn kib_field<W: Write>(
    report: &mut Report<W>,
    label: &str,
    kib: u64,
    extra: Option<String>,
) -> io::Result<()> {
    let raw = match extra {
        Some(extra) => format!("({} kB, {})", kib, extra),
        None => format!("({} kB)", kib),
    };
    let value = format!("{:<12}{}", format_kib(kib), report.palette().dim(&raw));
    report.field(label, value)
}

fn render_summary<W: Write>(
    report: &mut Report<W>,
    mem: &MemorySummary,
    detailed: bool,
) -> io::Result<()> {
    let used_percent = format!("{}%", mem.used_percent() as u64);

    kib_field(report, "Total:", mem.total_kib, None)?;
    kib_field(report, "Available:", mem.available_kib, None)?;
    kib_field(report, "Used:", mem.used_kib(), Some(used_percent))?;
    kib_field(report, "Free:", mem.free_kib, None)?;

    if detailed {
        kib_field(report, "Buffers:", mem.buffers_kib, None)?;
        kib_field(report, "Cached:", mem.cached_kib, None)?;
        if mem.shared_kib > 0 {
            kib_field(report, "Shared:", mem.shared_kib, None)?;
        }
        if mem.slab_reclaimable_kib > 0 || mem.slab_unreclaimable_kib > 0 {
            kib_field(report, "Slab reclaimable:", mem.slab_reclaimable_kib, None)?;
            kib_field(report, "Slab unreclaimable:", mem.slab_unreclaimable_kib, None)?;
        }
    }
    Ok(())
}

fn render_swap<W: Write>(report: &mut Report<W>, mem: &MemorySummary) -> io::Result<()> {
    report.section("Swap Information")?;

    if !mem.has_swap() {
        return report.line("No swap space configured");
    }

    let used_percent = format!("{}%", mem.swap_used_percent() as u64);
    kib_field(report, "Total:", mem.swap_total_kib, None)?;
    kib_field(report, "Free:", mem.swap_free_kib, None)?;
    kib_field(report, "Used:", mem.swap_used_kib(), Some(used_percent))?;
    if mem.swap_cached_kib > 0 {
        kib_field(report, "Cached:", mem.swap_cached_kib, None)?;
    }
    Ok(())
}

fn render_processes<F: FileSystem, W: Write>(
    report: &mut Report<W>,
    collector: &MemoryCollector<F>,
    top: usize,
) -> io::Result<()> {
    report.section("Top Memory Consumers")?;

    let processes = match collector.top_processes(top) {
        Ok(processes) => processes,
        Err(e) => return report.warning(e),
    };

    report.line(format!(
        "{:<8}{:<16}{:<12}CMDLINE",
        "PID", "COMMAND", "MEMORY"
    ))?;
    report.separator()?;

    for process in &processes {
        let name: String = process.name.chars().take(15).collect();
        report.line(format!(
            "{:<8}{:<16}{:<12}{}",
            process.pid,
            name,
            format_kib(process.rss_kib),
            process.cmdline
        ))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::{DEFAULT_TOP_PROCESSES, MockFs, SourcePaths};
    use crate::report::{Palette, render_to_string};

    fn view() -> MemoryView {
        MemoryView {
            detailed: false,
            processes: false,
            swap: false,
            top: DEFAULT_TOP_PROCESSES,
        }
    }

    fn render_view(fs: MockFs, view: MemoryView, palette: Palette) -> String {
        let collector = MemoryCollector::new(fs, SourcePaths::default());
        render_to_string(palette, |r| render(r, &collector, &view))
    }

    #[test]
    fn test_summary_used_percent() {
        let out = render_view(MockFs::memory_pressure(), view(), Palette::plain());
        assert!(out.contains("Total:            7.8 MiB     (8000 kB)\n"));
        assert!(out.contains("Used:             5.9 MiB     (6000 kB, 75%)\n"));
        assert!(!out.contains("Swap Information"));
    }

    #[test]
    fn test_swap_section_on_request() {
        let v = MemoryView { swap: true, ..view() };
        let out = render_view(MockFs::memory_pressure(), v, Palette::plain());
        assert!(out.contains("\nSwap Information\n================\nNo swap space configured\n"));
    }

    #[test]
    fn test_swap_section_when_present() {
        let out = render_view(MockFs::typical_system(), view(), Palette::plain());
        assert!(out.contains("Swap Information"));
        assert!(out.contains("(1024000 kB, 25%)"));
        assert!(out.contains("Cached:           1.0 MiB     (1024 kB)\n"));
    }

    #[test]
    fn test_detailed_breakdown() {
        let v = MemoryView {
            detailed: true,
            ..view()
        };
        let out = render_view(MockFs::typical_system(), v, Palette::plain());
        assert!(out.contains("Buffers:"));
        assert!(out.contains("Shared:"));
        assert!(out.contains("Slab unreclaimable:250.0 MiB   (256000 kB)\n"));
    }

    #[test]
    fn test_process_table() {
        let v = MemoryView {
            processes: true,
            ..view()
        };
        let out = render_view(MockFs::many_processes(), v, Palette::plain());
        assert!(out.contains("PID     COMMAND         MEMORY      CMDLINE\n"));
        let table = out.split(&"-".repeat(70)).nth(1).unwrap();
        assert_eq!(table.trim().lines().count(), 15);
    }

    #[test]
    fn test_process_table_custom_limit() {
        let v = MemoryView {
            processes: true,
            top: 3,
            ..view()
        };
        let out = render_view(MockFs::typical_system(), v, Palette::plain());
        assert!(out.contains("4242    firefox         1.4 GiB     /usr/lib/firefox/firefox\n"));
        assert!(!out.contains("bash"));
    }

    #[test]
    fn test_missing_meminfo_warns() {
        let out = render_view(MockFs::new(), view(), Palette::plain());
        assert!(out.contains("Warning: cannot read /proc/meminfo"));
    }

    #[test]
    fn test_no_escapes_without_color() {
        let v = MemoryView {
            detailed: true,
            processes: true,
            swap: true,
            ..view()
        };
        let out = render_view(MockFs::typical_system(), v, Palette::plain());
        assert!(!out.contains("\x1b["));
    }
}
