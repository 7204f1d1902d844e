// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error type for the fallible core of the shared log.
//!
//! None of these errors cross the [`Log`](crate::Log) write surface; they are
//! returned by [`FileLogger::write_line`](crate::FileLogger::write_line) and friends
//! and swallowed (with a console note) by the [`Logger`](crate::Logger) impls.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The log file could not be opened or created.
    #[error("cannot open log file {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The lock attempt failed for a reason other than contention.
    #[error("cannot lock log file: {0}")]
    Lock(#[source] io::Error),

    /// Reading the tail or truncating failed; the file may now be empty.
    #[error("log rotation failed: {0}")]
    Rotate(#[source] io::Error),

    #[error("cannot write log file: {0}")]
    Write(#[source] io::Error),

    #[error("invalid rotation limits: keep {keep} bytes of at most {max}")]
    InvalidLimits { max: u64, keep: u64 },
}
