//! Abstractions over the host so probes can run against fixtures.
//!
//! `FileSystem` covers the pseudo-filesystems (`/proc`, `/sys`, `/etc`),
//! `SystemApi` covers the handful of system calls and process-environment
//! lookups. Production code uses `RealFs` and `RealSystem`; tests use
//! `MockFs` and `MockSystem` from [`crate::collector::mock`].

use std::ffi::OsStr;
use std::io;
use std::path::{Path, PathBuf};

use nix::sys::{statvfs, sysinfo, utsname};
use nix::unistd::{Gid, Group, Uid, User, getgid, getuid};

/// Abstraction for filesystem operations.
///
/// This trait allows collectors to read from the real filesystem or from
/// a mock implementation for testing purposes.
pub trait FileSystem {
    /// Reads the entire contents of a file as a string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Checks if a path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Lists entries in a directory.
    ///
    /// Returns full paths of the direct children, in no particular order.
    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>>;
}

/// Real filesystem implementation that delegates to `std::fs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealFs;

impl RealFs {
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for RealFs {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        // cmdline and a few sysfs attributes may carry non UTF-8 bytes
        let bytes = std::fs::read(path)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        let entries = std::fs::read_dir(path)?;
        let mut paths = Vec::new();
        for entry in entries {
            paths.push(entry?.path());
        }
        Ok(paths)
    }
}

/// Kernel identity as returned by `uname(2)`, plus the NIS domain.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Uname {
    pub sysname: String,
    pub nodename: String,
    pub release: String,
    pub version: String,
    pub machine: String,
    pub domainname: String,
}

/// Raw `statvfs(3)` counters for one mounted filesystem.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FsStats {
    pub blocks: u64,
    pub blocks_free: u64,
    pub blocks_available: u64,
    pub fragment_size: u64,
}

/// One entry of the password database.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Account {
    pub name: String,
    pub home: String,
    pub shell: String,
}

/// Abstraction for the system calls and environment the probes consume.
pub trait SystemApi {
    /// Kernel name, release, version, machine, node and NIS domain.
    fn uname(&self) -> io::Result<Uname>;

    /// Seconds since boot, from `sysinfo(2)`.
    fn uptime_secs(&self) -> io::Result<u64>;

    /// Filesystem counters for the filesystem holding `path`.
    fn statvfs(&self, path: &Path) -> io::Result<FsStats>;

    /// Real user id and real group id of the current process.
    fn real_ids(&self) -> (u32, u32);

    /// Looks up a user by id in the password database.
    fn user_by_uid(&self, uid: u32) -> Option<Account>;

    /// Looks up a group name by id in the group database.
    fn group_name(&self, gid: u32) -> Option<String>;

    /// Number of entries yielded by a full password database scan.
    fn count_users(&self) -> usize;

    /// Number of entries yielded by a full group database scan.
    fn count_groups(&self) -> usize;

    /// Reads an environment variable; non-Unicode values count as unset.
    fn env_var(&self, name: &str) -> Option<String>;
}

/// `SystemApi` backed by the running kernel.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealSystem;

impl RealSystem {
    pub fn new() -> Self {
        Self
    }
}

fn lossy(s: &OsStr) -> String {
    s.to_string_lossy().into_owned()
}

impl SystemApi for RealSystem {
    fn uname(&self) -> io::Result<Uname> {
        let uts = utsname::uname().map_err(io::Error::from)?;
        Ok(Uname {
            sysname: lossy(uts.sysname()),
            nodename: lossy(uts.nodename()),
            release: lossy(uts.release()),
            version: lossy(uts.version()),
            machine: lossy(uts.machine()),
            domainname: lossy(uts.domainname()),
        })
    }

    fn uptime_secs(&self) -> io::Result<u64> {
        let info = sysinfo::sysinfo().map_err(io::Error::from)?;
        Ok(info.uptime().as_secs())
    }

    fn statvfs(&self, path: &Path) -> io::Result<FsStats> {
        let st = statvfs::statvfs(path).map_err(io::Error::from)?;
        Ok(FsStats {
            blocks: st.blocks() as u64,
            blocks_free: st.blocks_free() as u64,
            blocks_available: st.blocks_available() as u64,
            fragment_size: st.fragment_size() as u64,
        })
    }

    fn real_ids(&self) -> (u32, u32) {
        (getuid().as_raw(), getgid().as_raw())
    }

    fn user_by_uid(&self, uid: u32) -> Option<Account> {
        let user = User::from_uid(Uid::from_raw(uid)).ok().flatten()?;
        Some(Account {
            name: user.name,
            home: user.dir.to_string_lossy().into_owned(),
            shell: user.shell.to_string_lossy().into_owned(),
        })
    }

    fn group_name(&self, gid: u32) -> Option<String> {
        Group::from_gid(Gid::from_raw(gid))
            .ok()
            .flatten()
            .map(|g| g.name)
    }

    fn count_users(&self) -> usize {
        let mut count = 0;
        // SAFETY: single-threaded scan; the returned pointers are never
        // dereferenced and the database is closed before returning.
        unsafe {
            libc::setpwent();
            while !libc::getpwent().is_null() {
                count += 1;
            }
            libc::endpwent();
        }
        count
    }

    fn count_groups(&self) -> usize {
        let mut count = 0;
        // SAFETY: see `count_users`.
        unsafe {
            libc::setgrent();
            while !libc::getgrent().is_null() {
                count += 1;
            }
            libc::endgrent();
        }
        count
    }

    fn env_var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}
