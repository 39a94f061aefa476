//! Operating system records.

use chrono::{DateTime, Local};

/// Kernel and host identity.
///
/// Source: `uname(2)`, `sysinfo(2)`, `/etc/timezone` or `TZ`, `/proc/version`
#[derive(Clone, Debug, PartialEq, Default)]
pub struct KernelIdentity {
    pub sysname: String,
    pub release: String,
    pub version: String,
    pub machine: String,
    pub nodename: String,
    /// NIS domain; the kernel reports `(none)` when unset.
    pub domainname: String,
    pub uptime_secs: u64,
    /// Wall-clock boot time derived from the uptime.
    pub boot_time: Option<DateTime<Local>>,
    pub timezone: String,
    /// First line of `/proc/version`, at most 80 characters.
    pub banner: String,
}

impl KernelIdentity {
    /// Node name joined with the domain, unless the domain is unset.
    pub fn fqdn(&self) -> String {
        if self.domainname.is_empty() || self.domainname == "(none)" {
            self.nodename.clone()
        } else {
            format!("{}.{}", self.nodename, self.domainname)
        }
    }
}

/// Distribution identity.
///
/// Source: `/etc/os-release`
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct DistroIdentity {
    /// Source: `NAME`
    pub name: String,
    /// Source: `VERSION`
    pub version: String,
    /// Source: `ID`
    pub id: String,
    /// Source: `ID_LIKE`
    pub id_like: String,
    /// Source: `VERSION_CODENAME`
    pub codename: String,
    /// Source: `VERSION_ID`
    pub version_id: String,
    /// Source: `PRETTY_NAME`
    pub pretty_name: String,
    /// Source: `HOME_URL`
    pub home_url: String,
    /// Source: `SUPPORT_URL`
    pub support_url: String,
    /// Source: `BUG_REPORT_URL`
    pub bug_report_url: String,
}

impl DistroIdentity {
    /// `PRETTY_NAME`, falling back to `NAME VERSION`.
    pub fn display_name(&self) -> String {
        if !self.pretty_name.is_empty() {
            self.pretty_name.clone()
        } else if self.version.is_empty() {
            self.name.clone()
        } else {
            format!("{} {}", self.name, self.version)
        }
    }
}

/// Identity of the invoking user.
///
/// Source: password and group databases
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct UserIdentity {
    pub user: String,
    pub group: String,
    pub home: String,
    pub shell: String,
    pub user_count: usize,
    pub group_count: usize,
}

/// Selected environment variables. Unset variables stay `None`.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct EnvironmentIdentity {
    pub path: Option<String>,
    pub lang: Option<String>,
    pub editor: Option<String>,
    pub pager: Option<String>,
    pub browser: Option<String>,
    pub shell: Option<String>,
    pub desktop_session: Option<String>,
    pub display_manager: Option<String>,
    /// `XDG_CURRENT_DESKTOP`, else `WINDOWMANAGER`.
    pub window_manager: Option<String>,
}

impl EnvironmentIdentity {
    /// `PATH` split into its components.
    pub fn path_entries(&self) -> Vec<&str> {
        self.path
            .as_deref()
            .map(|p| p.split(':').collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fqdn_skips_unset_domain() {
        let mut kernel = KernelIdentity {
            nodename: "box".to_string(),
            domainname: "(none)".to_string(),
            ..Default::default()
        };
        assert_eq!(kernel.fqdn(), "box");

        kernel.domainname = "lan".to_string();
        assert_eq!(kernel.fqdn(), "box.lan");
    }

    #[test]
    fn test_distro_display_name() {
        let mut distro = DistroIdentity {
            name: "Debian GNU/Linux".to_string(),
            version: "12 (bookworm)".to_string(),
            ..Default::default()
        };
        assert_eq!(distro.display_name(), "Debian GNU/Linux 12 (bookworm)");

        distro.pretty_name = "Debian GNU/Linux 12".to_string();
        assert_eq!(distro.display_name(), "Debian GNU/Linux 12");
    }

    #[test]
    fn test_path_entries() {
        let env = EnvironmentIdentity {
            path: Some("/usr/bin:/bin".to_string()),
            ..Default::default()
        };
        assert_eq!(env.path_entries(), vec!["/usr/bin", "/bin"]);
        assert!(EnvironmentIdentity::default().path_entries().is_empty());
    }
}
