// SPDX-License-Identifier: MIT OR Apache-2.0

//! Where the shared log lives and how large it may grow.
//!
//! The path is a deployment decision. Builds can bake one in with the
//! `SHAREDLOG_FILE` environment variable at compile time, and
//! [`LogConfig::from_env`] lets the same variable override it at run time.

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// Variable consulted at build time and by [`LogConfig::from_env`].
pub const LOG_FILE_ENV: &str = "SHAREDLOG_FILE";

/// Fallback path when nothing else is configured.
pub const DEFAULT_LOG_FILE: &str = match option_env!("SHAREDLOG_FILE") {
    Some(path) => path,
    None => "/home/pi/i2c/i2c.log",
};

/// Rotate once the file is larger than this many bytes.
pub const MAX_LOG_FILE_SIZE: u64 = 65535;
/// Bytes of most recent history kept by a rotation.
pub const KEEP_LAST_LOG_SIZE: u64 = 32767;

/// The two thresholds of the rotator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RotationLimits {
    max: u64,
    keep: u64,
}

impl RotationLimits {
    /// `keep` must be non-zero and no larger than `max`.
    pub fn new(max: u64, keep: u64) -> Result<Self> {
        if keep == 0 || keep > max {
            return Err(Error::InvalidLimits { max, keep });
        }
        Ok(Self { max, keep })
    }

    pub fn max(&self) -> u64 {
        self.max
    }

    pub fn keep(&self) -> u64 {
        self.keep
    }
}

impl Default for RotationLimits {
    fn default() -> Self {
        Self {
            max: MAX_LOG_FILE_SIZE,
            keep: KEEP_LAST_LOG_SIZE,
        }
    }
}

/// Configuration of a [`FileLogger`](crate::FileLogger).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    path: PathBuf,
    limits: RotationLimits,
    echo_to_console: bool,
}

impl LogConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            limits: RotationLimits::default(),
            echo_to_console: true,
        }
    }

    /// Defaults, with the path taken from `SHAREDLOG_FILE` when it is set.
    pub fn from_env() -> Self {
        match std::env::var_os(LOG_FILE_ENV) {
            Some(path) if !path.is_empty() => Self::new(path),
            _ => Self::default(),
        }
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = path.into();
        self
    }

    pub fn with_limits(mut self, limits: RotationLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Whether lines are also shown on stdout/stderr as they are logged.
    pub fn with_console_echo(mut self, echo: bool) -> Self {
        self.echo_to_console = echo;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn limits(&self) -> RotationLimits {
        self.limits
    }

    pub fn echo_to_console(&self) -> bool {
        self.echo_to_console
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_FILE)
    }
}
