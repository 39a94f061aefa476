//! Errors produced by collectors.
//!
//! Probes absorb missing fields and unreadable entries themselves; a
//! `CollectError` only leaves a probe when its root source is gone.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Error type for collection failures.
#[derive(Debug, Error)]
pub enum CollectError {
    /// The root source of a probe could not be read.
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The root source was read but has no usable content.
    #[error("cannot parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    /// The probe's subtree does not exist on this host.
    #[error("{0} not available")]
    Unavailable(String),

    /// A system call failed.
    #[error("{call} failed: {source}")]
    Sys {
        call: &'static str,
        #[source]
        source: io::Error,
    },
}

impl CollectError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn unavailable(what: impl Into<String>) -> Self {
        Self::Unavailable(what.into())
    }
}
