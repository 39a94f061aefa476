//! infoutils - Linux system information tools.
//!
//! This library provides the functionality shared by the binaries:
//! - `cpuinfo` - processor identity, load, frequency and topology
//! - `meminfo` - memory and swap usage, top memory consumers
//! - `diskls` - block devices, mount usage and filesystem types
//! - `osinfo` - kernel, distribution, user and environment identity
//!
//! Data is read from procfs, sysfs, `/etc` and a few system calls by the
//! [`collector`] module and printed by [`report`].

pub mod cli;
pub mod collector;
pub mod fmt;
pub mod logging;
pub mod model;
pub mod report;
