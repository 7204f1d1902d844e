// SPDX-License-Identifier: MIT OR Apache-2.0

//! The shared log file sink.
//!
//! Every write is one short cycle: open, try to lock, rotate, drain the
//! pending lines, write, unlock, close. The lock is never waited for. When
//! another writer (a thread here, or another process) holds it, the line goes
//! into the [`PendingQueue`] and the call returns at once.
//!
//! # Ordering
//!
//! Parked lines are written before the line of the writer that next wins the
//! lock, so a deferred line always precedes the line that flushed it. There is
//! no total order across processes: lines parked in another process wait for
//! a writer of that process.
//!
//! # Example
//!
//! ```no_run
//! use sharedlog::{FileLogger, Log, LogConfig};
//! use std::sync::Arc;
//!
//! let sink = Arc::new(FileLogger::new(LogConfig::new("/var/log/sensors.log")));
//! let battery = Log::new("BatteryChecker", sink.clone());
//! let diagnostics = Log::new("Diagnostics", sink);
//!
//! battery.log_info("Starting BatteryCheckerThreadProc...");
//! diagnostics.error("Can't open shared memory.. aborting");
//! ```

use crate::config::LogConfig;
use crate::error::{Error, Result};
use crate::lock::LockedFile;
use crate::log_record::LogRecord;
use crate::logger::Logger;
use crate::pending::PendingQueue;
use crate::rotate::{self, Rotation};
use std::future::Future;
use std::io::Write;
use std::pin::Pin;
use std::sync::Arc;

/// Result of one write cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The line was written after `drained` parked lines.
    Written { drained: usize, rotation: Rotation },
    /// The file was locked; the line was parked.
    Deferred,
}

/// A [`Logger`] appending to a file shared with other threads and processes.
#[derive(Debug)]
pub struct FileLogger {
    config: LogConfig,
    pending: Arc<PendingQueue>,
}

impl FileLogger {
    /// A sink with a queue of its own.
    pub fn new(config: LogConfig) -> Self {
        Self::with_pending(config, Arc::new(PendingQueue::new()))
    }

    /// A sink sharing `pending` with other sinks of this process.
    pub fn with_pending(config: LogConfig, pending: Arc<PendingQueue>) -> Self {
        Self { config, pending }
    }

    pub fn config(&self) -> &LogConfig {
        &self.config
    }

    pub fn pending(&self) -> &Arc<PendingQueue> {
        &self.pending
    }

    /**
    Runs one write cycle for an already-rendered line.

    A file that cannot be opened drops the line: queueing against a sink that
    may never come back would grow without bound. A failed rotation is
    reported on the console and the cycle goes on writing. A failed write does
    not stop the lines after it; the first such error is returned once all
    were tried.
    */
    pub fn write_line(&self, line: &str) -> Result<WriteOutcome> {
        let Some(mut locked) = LockedFile::try_acquire(self.config.path())? else {
            self.pending.defer(line);
            return Ok(WriteOutcome::Deferred);
        };
        let rotation = self.rotate(&mut locked);
        let pending = self.pending.drain();
        write_each(
            locked.file_mut(),
            pending.iter().map(String::as_str).chain(Some(line)),
        )?;
        Ok(WriteOutcome::Written {
            drained: pending.len(),
            rotation,
        })
    }

    /**
    Writes parked lines if the lock is free right now.

    Returns how many were written, or `None` if the file was locked.
    */
    pub fn flush_pending(&self) -> Result<Option<usize>> {
        if self.pending.is_empty() {
            return Ok(Some(0));
        }
        let Some(mut locked) = LockedFile::try_acquire(self.config.path())? else {
            return Ok(None);
        };
        self.rotate(&mut locked);
        let pending = self.pending.drain();
        write_each(locked.file_mut(), pending.iter().map(String::as_str))?;
        Ok(Some(pending.len()))
    }

    fn rotate(&self, locked: &mut LockedFile) -> Rotation {
        match rotate::maybe_rotate(locked.file_mut(), self.config.limits()) {
            Ok(rotation) => rotation,
            Err(e) => {
                crate::console::narrate(&e.to_string());
                rotate::after_failure(locked.file_mut())
            }
        }
    }
}

/// Writes every line, going on past failures; returns the first error.
fn write_each<'a>(out: &mut impl Write, lines: impl IntoIterator<Item = &'a str>) -> Result<()> {
    let mut first_error = None;
    for line in lines {
        if let Err(e) = out.write_all(line.as_bytes()) {
            first_error.get_or_insert(Error::Write(e));
        }
    }
    first_error.map_or(Ok(()), Err)
}

impl Logger for FileLogger {
    fn finish_log_record(&self, record: LogRecord) {
        if let Err(e) = self.write_line(&record.to_string()) {
            crate::console::narrate(&e.to_string());
        }
    }

    fn finish_log_record_async<'s>(
        &'s self,
        record: LogRecord,
    ) -> Pin<Box<dyn Future<Output = ()> + Send + 's>> {
        // the cycle never waits on the lock, so there is nothing to await
        Box::pin(async move { self.finish_log_record(record) })
    }

    fn prepare_to_die(&self) {
        match self.flush_pending() {
            Ok(Some(_)) => {}
            Ok(None) => crate::console::narrate(&format!(
                "log file busy at exit, {} deferred lines lost",
                self.pending.len()
            )),
            Err(e) => crate::console::narrate(&e.to_string()),
        }
    }

    fn echoes_to_console(&self) -> bool {
        self.config.echo_to_console()
    }
}
