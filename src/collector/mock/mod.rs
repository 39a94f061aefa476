//! Mock implementations for testing.
//!
//! This module provides `MockFs`, `MockSystem` and pre-built scenarios for
//! testing probes without access to the host's `/proc`, `/sys` or `/etc`.

mod filesystem;
mod scenarios;
mod system;

pub use filesystem::MockFs;
pub use system::MockSystem;
