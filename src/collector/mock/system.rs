//! Fake system-call layer for testing the OS and mount probes.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use crate::collector::traits::{Account, FsStats, SystemApi, Uname};

/// `SystemApi` answering from in-memory tables.
///
/// Calls without a configured answer fail with `NotFound`, like a host
/// where the call is unsupported.
#[derive(Debug, Clone, Default)]
pub struct MockSystem {
    uname: Option<Uname>,
    uptime_secs: Option<u64>,
    fs_stats: HashMap<PathBuf, FsStats>,
    uid: u32,
    gid: u32,
    users: HashMap<u32, Account>,
    groups: HashMap<u32, String>,
    env: HashMap<String, String>,
}

fn not_found(what: &str) -> io::Error {
    io::Error::new(io::ErrorKind::NotFound, format!("{} not configured", what))
}

impl MockSystem {
    /// Creates a system where every call fails and the environment is empty.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_uname(mut self, uname: Uname) -> Self {
        self.uname = Some(uname);
        self
    }

    pub fn with_uptime(mut self, secs: u64) -> Self {
        self.uptime_secs = Some(secs);
        self
    }

    /// Registers `statvfs` counters for a mountpoint.
    pub fn with_fs_stats(mut self, mountpoint: impl Into<PathBuf>, stats: FsStats) -> Self {
        self.fs_stats.insert(mountpoint.into(), stats);
        self
    }

    /// Sets the real uid/gid of the simulated process.
    pub fn with_ids(mut self, uid: u32, gid: u32) -> Self {
        self.uid = uid;
        self.gid = gid;
        self
    }

    pub fn with_user(mut self, uid: u32, name: &str, home: &str, shell: &str) -> Self {
        self.users.insert(
            uid,
            Account {
                name: name.to_string(),
                home: home.to_string(),
                shell: shell.to_string(),
            },
        );
        self
    }

    pub fn with_group(mut self, gid: u32, name: &str) -> Self {
        self.groups.insert(gid, name.to_string());
        self
    }

    pub fn with_env(mut self, name: &str, value: &str) -> Self {
        self.env.insert(name.to_string(), value.to_string());
        self
    }

    /// A small desktop host: one user, a few groups, two mounted filesystems.
    pub fn typical() -> Self {
        Self::new()
            .with_uname(Uname {
                sysname: "Linux".to_string(),
                nodename: "testhost".to_string(),
                release: "6.5.0-test".to_string(),
                version: "#1 SMP PREEMPT_DYNAMIC".to_string(),
                machine: "x86_64".to_string(),
                domainname: "(none)".to_string(),
            })
            .with_uptime(93_784)
            .with_fs_stats(
                "/",
                FsStats {
                    blocks: 1000,
                    blocks_free: 400,
                    blocks_available: 350,
                    fragment_size: 4096,
                },
            )
            .with_fs_stats(
                "/home",
                FsStats {
                    blocks: 2000,
                    blocks_free: 1500,
                    blocks_available: 1500,
                    fragment_size: 4096,
                },
            )
            .with_ids(1000, 1000)
            .with_user(0, "root", "/root", "/bin/bash")
            .with_user(1000, "alice", "/home/alice", "/bin/zsh")
            .with_group(0, "root")
            .with_group(27, "sudo")
            .with_group(1000, "alice")
            .with_env("PATH", "/usr/local/bin:/usr/bin:/bin")
            .with_env("LANG", "en_US.UTF-8")
            .with_env("EDITOR", "vim")
            .with_env("SHELL", "/bin/zsh")
            .with_env("XDG_CURRENT_DESKTOP", "GNOME")
            .with_env("WINDOWMANAGER", "mutter")
            .with_env("DESKTOP_SESSION", "ubuntu")
    }
}

impl SystemApi for MockSystem {
    fn uname(&self) -> io::Result<Uname> {
        self.uname.clone().ok_or_else(|| not_found("uname"))
    }

    fn uptime_secs(&self) -> io::Result<u64> {
        self.uptime_secs.ok_or_else(|| not_found("sysinfo"))
    }

    fn statvfs(&self, path: &Path) -> io::Result<FsStats> {
        self.fs_stats
            .get(path)
            .copied()
            .ok_or_else(|| not_found(&format!("statvfs for {}", path.display())))
    }

    fn real_ids(&self) -> (u32, u32) {
        (self.uid, self.gid)
    }

    fn user_by_uid(&self, uid: u32) -> Option<Account> {
        self.users.get(&uid).cloned()
    }

    fn group_name(&self, gid: u32) -> Option<String> {
        self.groups.get(&gid).cloned()
    }

    fn count_users(&self) -> usize {
        self.users.len()
    }

    fn count_groups(&self) -> usize {
        self.groups.len()
    }

    fn env_var(&self, name: &str) -> Option<String> {
        self.env.get(name).cloned()
    }
}
