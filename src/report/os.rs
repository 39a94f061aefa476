//! `osinfo` report.

use std::io::{self, Write};

use crate::collector::{FileSystem, OsCollector, SystemApi};
use crate::fmt::format_uptime;
use crate::model::{DistroIdentity, EnvironmentIdentity, KernelIdentity, UserIdentity};
use crate::report::Report;

const BOOT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Sections selected on the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OsView {
    pub detailed: bool,
    pub distro: bool,
    pub users: bool,
    pub environment: bool,
}

/// Renders the system section and every selected section.
pub fn render<F: FileSystem, S: SystemApi, W: Write>(
    report: &mut Report<W>,
    collector: &OsCollector<F, S>,
    view: &OsView,
) -> io::Result<()> {
    let distro = collector.collect_distro();

    report.section("System Information")?;
    match collector.collect_kernel() {
        Ok(kernel) => {
            let distro = distro.as_ref().ok();
            render_system(report, &kernel, distro, view.detailed)?;
        }
        Err(e) => report.warning(e)?,
    }

    if view.distro {
        report.section("Distribution Information")?;
        match &distro {
            Ok(distro) => render_distro(report, distro, view.detailed)?,
            Err(e) => report.warning(e)?,
        }
    }
    if view.users {
        report.section("User Information")?;
        render_user(report, &collector.collect_user())?;
    }
    if view.environment {
        report.section("Environment Information")?;
        render_environment(report, &collector.collect_environment(), view.detailed)?;
    }
    Ok(())
}

fn field_if<W: Write>(report: &mut Report<W>, label: &str, value: &str) -> io::Result<()> {
    if value.is_empty() {
        return Ok(());
    }
    report.field(label, value)
}

fn render_system<W: Write>(
    report: &mut Report<W>,
    kernel: &KernelIdentity,
    distro: Option<&DistroIdentity>,
    detailed: bool,
) -> io::Result<()> {
    if let Some(distro) = distro {
        field_if(report, "Operating System:", &distro.display_name())?;
    }
    if !kernel.sysname.is_empty() && !kernel.release.is_empty() {
        report.field("Kernel:", format!("{} {}", kernel.sysname, kernel.release))?;
    }
    field_if(report, "Architecture:", &kernel.machine)?;
    if !kernel.nodename.is_empty() {
        report.field("Hostname:", kernel.fqdn())?;
    }
    if kernel.uptime_secs > 0 {
        report.field("Uptime:", format_uptime(kernel.uptime_secs))?;
    }

    if !detailed {
        return Ok(());
    }

    field_if(report, "Kernel version:", &kernel.version)?;
    if let Some(boot) = kernel.boot_time {
        report.field("Boot time:", boot.format(BOOT_TIME_FORMAT))?;
    }
    field_if(report, "Timezone:", &kernel.timezone)?;
    field_if(report, "Kernel info:", &kernel.banner)
}

fn render_distro<W: Write>(
    report: &mut Report<W>,
    distro: &DistroIdentity,
    detailed: bool,
) -> io::Result<()> {
    field_if(report, "Name:", &distro.name)?;
    field_if(report, "Version:", &distro.version)?;
    field_if(report, "ID:", &distro.id)?;
    field_if(report, "Codename:", &distro.codename)?;

    if !detailed {
        return Ok(());
    }

    field_if(report, "Based on:", &distro.id_like)?;
    field_if(report, "Version ID:", &distro.version_id)?;
    field_if(report, "Home URL:", &distro.home_url)?;
    field_if(report, "Support URL:", &distro.support_url)?;
    field_if(report, "Bug report URL:", &distro.bug_report_url)
}

fn render_user<W: Write>(report: &mut Report<W>, user: &UserIdentity) -> io::Result<()> {
    field_if(report, "Current user:", &user.user)?;
    field_if(report, "Primary group:", &user.group)?;
    field_if(report, "Home directory:", &user.home)?;
    field_if(report, "Shell:", &user.shell)?;
    if user.user_count > 0 {
        report.field("Total users:", user.user_count)?;
    }
    if user.group_count > 0 {
        report.field("Total groups:", user.group_count)?;
    }
    Ok(())
}

fn render_environment<W: Write>(
    report: &mut Report<W>,
    env: &EnvironmentIdentity,
    detailed: bool,
) -> io::Result<()> {
    let pairs = [
        ("Language:", &env.lang),
        ("Desktop session:", &env.desktop_session),
        ("Desktop environment:", &env.window_manager),
        ("Display manager:", &env.display_manager),
        ("Default editor:", &env.editor),
        ("Default shell:", &env.shell),
    ];
    for (label, value) in pairs {
        if let Some(value) = value {
            report.field(label, value)?;
        }
    }

    if !detailed {
        return Ok(());
    }

    if let Some(pager) = &env.pager {
        report.field("Pager:", pager)?;
    }
    if let Some(browser) = &env.browser {
        report.field("Browser:", browser)?;
    }
    if env.path.as_deref().is_some_and(|p| !p.is_empty()) {
        report.line("PATH:")?;
        for entry in env.path_entries() {
            report.line(format!("  {}", entry))?;
        }
    }
    Ok(())
}
