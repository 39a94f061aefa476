//! Operating system probes: kernel, distribution, user and environment.

use chrono::{Local, TimeDelta};
use tracing::debug;

use crate::collector::SourcePaths;
use crate::collector::error::CollectError;
use crate::collector::parser::parse_os_release;
use crate::collector::reader::{KvPairs, read_line, read_source};
use crate::collector::traits::{FileSystem, SystemApi};
use crate::fmt::truncate_chars;
use crate::model::{DistroIdentity, EnvironmentIdentity, KernelIdentity, UserIdentity};

/// Maximum length of the `/proc/version` banner.
const BANNER_MAX: usize = 80;

/// Collects operating system identity from system calls, `/etc`, `/proc`
/// and the process environment.
pub struct OsCollector<F: FileSystem, S: SystemApi> {
    fs: F,
    sys: S,
    paths: SourcePaths,
}

impl<F: FileSystem, S: SystemApi> OsCollector<F, S> {
    /// Creates a new OS collector.
    pub fn new(fs: F, sys: S, paths: SourcePaths) -> Self {
        Self { fs, sys, paths }
    }

    fn timezone(&self) -> String {
        read_line(&self.fs, &self.paths.etc.join("timezone"))
            .map(|tz| tz.trim().to_string())
            .filter(|tz| !tz.is_empty())
            .or_else(|| self.sys.env_var("TZ").filter(|tz| !tz.is_empty()))
            .unwrap_or_default()
    }

    /// Collects kernel and host identity.
    ///
    /// Fails only when `uname(2)` fails; uptime, timezone and banner are
    /// optional.
    pub fn collect_kernel(&self) -> Result<KernelIdentity, CollectError> {
        let uts = self
            .sys
            .uname()
            .map_err(|source| CollectError::Sys {
                call: "uname",
                source,
            })?;

        let uptime_secs = match self.sys.uptime_secs() {
            Ok(secs) => Some(secs),
            Err(e) => {
                debug!(error = %e, "sysinfo failed");
                None
            }
        };
        let boot_time = uptime_secs
            .and_then(|secs| TimeDelta::try_seconds(i64::try_from(secs).ok()?))
            .and_then(|up| Local::now().checked_sub_signed(up));

        let banner = read_line(&self.fs, &self.paths.proc.join("version"))
            .map(|line| truncate_chars(line.trim_end(), BANNER_MAX))
            .unwrap_or_default();

        Ok(KernelIdentity {
            sysname: uts.sysname,
            release: uts.release,
            version: uts.version,
            machine: uts.machine,
            nodename: uts.nodename,
            domainname: uts.domainname,
            uptime_secs: uptime_secs.unwrap_or(0),
            boot_time,
            timezone: self.timezone(),
            banner,
        })
    }

    /// Collects distribution identity from `/etc/os-release`.
    pub fn collect_distro(&self) -> Result<DistroIdentity, CollectError> {
        let path = self.paths.etc.join("os-release");
        let content = read_source(&self.fs, &path)?;
        Ok(parse_os_release(KvPairs::new(content, '=')))
    }

    /// Collects the invoking user's identity and database sizes.
    pub fn collect_user(&self) -> UserIdentity {
        let (uid, gid) = self.sys.real_ids();
        let account = self.sys.user_by_uid(uid).unwrap_or_else(|| {
            debug!(uid, "no password entry");
            Default::default()
        });

        UserIdentity {
            user: account.name,
            group: self.sys.group_name(gid).unwrap_or_default(),
            home: account.home,
            shell: account.shell,
            user_count: self.sys.count_users(),
            group_count: self.sys.count_groups(),
        }
    }

    /// Collects `PATH`, `LANG`, `EDITOR`, `PAGER`, `BROWSER`, `SHELL`,
    /// `DESKTOP_SESSION` and the desktop name.
    pub fn collect_environment(&self) -> EnvironmentIdentity {
        let var = |name: &str| self.sys.env_var(name);

        EnvironmentIdentity {
            path: var("PATH"),
            lang: var("LANG"),
            editor: var("EDITOR"),
            pager: var("PAGER"),
            browser: var("BROWSER"),
            shell: var("SHELL"),
            desktop_session: var("DESKTOP_SESSION"),
            // no variable in the read set names it
            display_manager: None,
            window_manager: var("XDG_CURRENT_DESKTOP").or_else(|| var("WINDOWMANAGER")),
        }
    }
}
