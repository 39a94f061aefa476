//! Host information collector for Linux.
//!
//! This module turns kernel pseudo-files and a few system calls into the
//! typed records of [`crate::model`], with support for mocking in tests.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                           Probes                               │
//! │  ┌──────────────┐ ┌───────────────┐ ┌─────────────┐ ┌────────┐ │
//! │  │ CpuCollector │ │MemoryCollector│ │DiskCollector│ │  Os    │ │
//! │  │ cpuinfo/stat │ │ meminfo/[pid] │ │ sys/block   │ │Collect.│ │
//! │  └──────┬───────┘ └──────┬────────┘ └──┬───────┬──┘ └─┬────┬─┘ │
//! │         └────────┬───────┴─────────────┘       └──┬───┘    │   │
//! │           ┌──────▼──────┐                  ┌──────▼──────┐ │   │
//! │           │ reader +    │                  │  SystemApi  │ │   │
//! │           │ parser      │◄─────────────────┼─────────────┼─┘   │
//! │           └──────┬──────┘                  └──────┬──────┘     │
//! │           ┌──────▼──────┐                         │            │
//! │           │  FileSystem │ (trait)                 │ (trait)    │
//! └───────────┴──────┬──────┴─────────────────────────┴────────────┘
//!              ┌─────┴──────┐                  ┌──────┴──────┐
//!       ┌──────▼─────┐ ┌────▼─────┐     ┌──────▼─────┐ ┌─────▼──────┐
//!       │   RealFs   │ │  MockFs  │     │ RealSystem │ │ MockSystem │
//!       └────────────┘ └──────────┘     └────────────┘ └────────────┘
//! ```
//!
//! # Usage
//!
//! ```
//! use infoutils::collector::{CpuCollector, MockFs, SourcePaths};
//!
//! let collector = CpuCollector::new(MockFs::typical_system(), SourcePaths::default());
//! let cpu = collector.collect_identity().unwrap();
//! assert_eq!(cpu.logical_cores, 4);
//! ```
//!
//! Probes return `Err` only when their root source is missing; individual
//! fields that cannot be read are left at their defaults.

mod cpu;
mod disk;
mod error;
pub mod mock;
mod memory;
mod os;
pub mod parser;
pub mod reader;
mod traits;

use std::path::PathBuf;

pub use cpu::CpuCollector;
pub use disk::{DiskCollector, DiskTypes};
pub use error::CollectError;
pub use memory::{DEFAULT_TOP_PROCESSES, MemoryCollector};
pub use mock::{MockFs, MockSystem};
pub use os::OsCollector;
pub use traits::{Account, FileSystem, FsStats, RealFs, RealSystem, SystemApi, Uname};

/// Roots of the pseudo-filesystems the probes read.
///
/// Defaults to the live host; tests and chroot inspection point them
/// elsewhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePaths {
    pub proc: PathBuf,
    pub sys: PathBuf,
    pub etc: PathBuf,
}

impl Default for SourcePaths {
    fn default() -> Self {
        Self {
            proc: PathBuf::from("/proc"),
            sys: PathBuf::from("/sys"),
            etc: PathBuf::from("/etc"),
        }
    }
}
