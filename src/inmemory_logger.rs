// SPDX-License-Identifier: MIT OR Apache-2.0

//! # In-Memory Logger
//!
//! A [`Logger`] that keeps rendered lines in memory instead of writing the
//! shared file. Useful for:
//!
//! - Unit testing code that logs through a [`Log`](crate::Log)
//! - Capturing lines where no writable log file exists
//!
//! Lines are stored exactly as they would appear on disk, `\r\n` included.

use crate::log_record::LogRecord;
use crate::logger::Logger;
use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;

/// An in-memory logger that stores rendered lines in a `Vec<String>`.
///
/// # Example
///
/// ```rust
/// use sharedlog::{InMemoryLogger, Log};
/// use std::sync::Arc;
///
/// let logger = Arc::new(InMemoryLogger::new());
/// let log = Log::new("test", logger.clone());
/// log.log_info("Test message 42");
///
/// let logs = logger.drain_logs();
/// assert!(logs.contains("Test message 42"));
/// ```
#[derive(Debug)]
pub struct InMemoryLogger {
    logs: Mutex<Vec<String>>,
}

// ============================================================================
// BOILERPLATE TRAIT IMPLEMENTATIONS
// ============================================================================
//
// - Debug: Derived, required by Logger trait
// - Default: Implemented with obvious zero-value (empty log buffer)
// - Clone: NOT implemented - callers share one instance through Arc
// - PartialEq/Eq/Hash: NOT implemented - comparing mutex contents is racy
// - Send/Sync: Automatically implemented due to Mutex usage

impl Default for InMemoryLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryLogger {
    pub fn new() -> Self {
        Self {
            logs: Mutex::new(Vec::new()),
        }
    }

    /// All stored lines concatenated, clearing the buffer.
    pub fn drain_logs(&self) -> String {
        self.drain_lines().concat()
    }

    /// All stored lines, clearing the buffer.
    pub fn drain_lines(&self) -> Vec<String> {
        let mut logs = self.logs.lock().unwrap_or_else(|p| p.into_inner());
        std::mem::take(&mut *logs)
    }
}

impl Logger for InMemoryLogger {
    fn finish_log_record(&self, record: LogRecord) {
        let log_string = record.to_string();
        let mut logs = self.logs.lock().unwrap_or_else(|p| p.into_inner());
        logs.push(log_string);
    }

    fn finish_log_record_async<'s>(
        &'s self,
        record: LogRecord,
    ) -> Pin<Box<dyn Future<Output = ()> + Send + 's>> {
        Box::pin(async move {
            self.finish_log_record(record);
        })
    }

    fn prepare_to_die(&self) {
        // No-op since we're storing in memory, no flushing needed
    }
}
