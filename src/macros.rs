// SPDX-License-Identifier: MIT OR Apache-2.0

//! Call-site macros for the shared log.
//!
//! ```rust
//! use sharedlog::{InMemoryLogger, Log};
//! use std::sync::Arc;
//!
//! let logger = Arc::new(InMemoryLogger::new());
//! let log = Log::new("I2C", logger.clone());
//! sharedlog::log_info!(log, "bus {} opened", 1);
//! sharedlog::log_error!(log, "read of register {:#04x} failed", 0x1e);
//!
//! let logs = logger.drain_logs();
//! assert!(logs.contains("bus 1 opened"));
//! assert!(logs.contains("<E> I2C: 002 "));
//! ```

/// The `file:line: ` location tag of the invocation.
#[macro_export]
macro_rules! at {
    () => {
        concat!(file!(), ":", line!(), ": ")
    };
}

/// Formats its arguments and logs an info line on `$log`.
#[macro_export]
macro_rules! log_info {
    ($log:expr, $($arg:tt)+) => {
        $log.log_info(format!($($arg)+))
    };
}

/// Formats its arguments and logs an error line tagged with [`at!`].
#[macro_export]
macro_rules! log_error {
    ($log:expr, $($arg:tt)+) => {
        $log.log_error($crate::at!(), format!($($arg)+))
    };
}
