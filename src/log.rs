// SPDX-License-Identifier: MIT OR Apache-2.0

//! The per-caller writer.
//!
//! Each thread or component owns a [`Log`] named after itself. The writer
//! numbers its lines, stamps them and passes them to the shared [`Logger`].
//! Sequence numbers run 001..=999 and then start over at 001; they are private
//! to the instance, so two writers in one process count independently.
//!
//! None of the methods report failure. A log that cannot be written must never
//! take its caller down with it.

use crate::color::InfoColor;
use crate::log_record::{LogRecord, Severity};
use crate::logger::Logger;
use std::io;
use std::panic::Location;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, AtomicU16, Ordering};

/// Last sequence number before wrapping back to 1.
pub const MAX_SEQUENCE: u16 = 999;

/// Line framing a [`Log::log_header`] block.
pub const HEADER_SEPARATOR: &str =
    "--------------------------------------------------------------------------";

fn advance(sequence: u16) -> u16 {
    if sequence >= MAX_SEQUENCE {
        1
    } else {
        sequence + 1
    }
}

/// A named writer to a shared [`Logger`].
#[derive(Debug)]
pub struct Log {
    owner: String,
    sequence: AtomicU16,
    info_color: AtomicU8,
    logger: Arc<dyn Logger>,
}

impl Log {
    pub fn new(owner: impl Into<String>, logger: Arc<dyn Logger>) -> Self {
        Self {
            owner: owner.into(),
            sequence: AtomicU16::new(0),
            info_color: AtomicU8::new(InfoColor::default() as u8),
            logger,
        }
    }

    /// A writer whose lines carry no owner name.
    pub fn unnamed(logger: Arc<dyn Logger>) -> Self {
        Self::new(String::new(), logger)
    }

    pub fn set_owner(&mut self, owner: impl Into<String>) {
        self.owner = owner.into();
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn logger(&self) -> &Arc<dyn Logger> {
        &self.logger
    }

    /// Color of info lines on the console.
    pub fn info_color(&self) -> InfoColor {
        InfoColor::from_u8(self.info_color.load(Ordering::Relaxed))
    }

    fn next_sequence(&self) -> u16 {
        match self
            .sequence
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |s| Some(advance(s)))
        {
            Ok(previous) | Err(previous) => advance(previous),
        }
    }

    fn info_record(&self, message: &str) -> LogRecord {
        if self.logger.echoes_to_console() {
            crate::console::echo_info(self.info_color(), message);
        }
        LogRecord::new(
            &self.owner,
            self.next_sequence(),
            Severity::Info,
            message.to_string(),
        )
    }

    fn error_record(&self, at: &str, message: &str) -> LogRecord {
        if self.logger.echoes_to_console() {
            crate::console::echo_error(message);
        }
        LogRecord::new(
            &self.owner,
            self.next_sequence(),
            Severity::Error {
                location: at.to_string(),
            },
            message.to_string(),
        )
    }

    pub fn log_info(&self, message: impl AsRef<str>) {
        let record = self.info_record(message.as_ref());
        self.logger.finish_log_record(record);
    }

    /**
    Logs an error line tagged with `at`, a `file:line: ` location.

    Only the part after the last `/` of `at` is kept. See [`at!`](crate::at).
    */
    pub fn log_error(&self, at: &str, message: impl AsRef<str>) {
        let record = self.error_record(at, message.as_ref());
        self.logger.finish_log_record(record);
    }

    /// Logs an error line tagged with the caller's location.
    #[track_caller]
    pub fn error(&self, message: impl AsRef<str>) {
        let location = Location::caller();
        let at = format!("{}:{}: ", location.file(), location.line());
        self.log_error(&at, message);
    }

    /// Logs `"<message>: <os error>"`, or the OS error alone when `message` is empty.
    pub fn log_os_error(&self, at: &str, message: &str, err: &io::Error) {
        if message.is_empty() {
            self.log_error(at, err.to_string());
        } else {
            self.log_error(at, format!("{message}: {err}"));
        }
    }

    pub async fn log_info_async(&self, message: impl AsRef<str>) {
        let record = self.info_record(message.as_ref());
        self.logger.finish_log_record_async(record).await;
    }

    pub async fn log_error_async(&self, at: &str, message: impl AsRef<str>) {
        let record = self.error_record(at, message.as_ref());
        self.logger.finish_log_record_async(record).await;
    }

    /**
    Opens a visually distinct block: switches the info color, then logs the
    separator and `text`.

    The color is console-only display state of this writer.
    */
    pub fn log_header(&self, text: impl AsRef<str>, color: InfoColor) {
        self.info_color.store(color as u8, Ordering::Relaxed);
        self.log_info(HEADER_SEPARATOR);
        self.log_info(text);
    }

    /// Closes a block opened by [`Self::log_header`] and restores the default color.
    pub fn log_end_header(&self) {
        self.log_info(HEADER_SEPARATOR);
        self.info_color
            .store(InfoColor::default() as u8, Ordering::Relaxed);
    }

    /// Renders the caller's stack, see [`capture_trace`](crate::capture_trace).
    #[inline(never)]
    pub fn stack_trace(&self, label: &str) -> String {
        crate::stack_trace::trace_of_caller(label)
    }

    /// Forwards to [`Logger::prepare_to_die`].
    pub fn prepare_to_die(&self) {
        self.logger.prepare_to_die();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InMemoryLogger;

    fn writer(owner: &str) -> (Log, Arc<InMemoryLogger>) {
        let logger = Arc::new(InMemoryLogger::new());
        (Log::new(owner, logger.clone()), logger)
    }

    fn sequence_of(line: &str) -> &str {
        // "<I> owner: 001 PID: ..."
        let rest = line.split_once(": ").unwrap().1;
        &rest[..3]
    }

    #[test]
    fn advance_wraps() {
        assert_eq!(advance(0), 1);
        assert_eq!(advance(998), 999);
        assert_eq!(advance(999), 1);
    }

    #[test]
    fn sequence_wraps_after_999() {
        let (log, logger) = writer("seq");
        for _ in 0..1000 {
            log.log_info("x");
        }
        let lines = logger.drain_lines();
        assert_eq!(sequence_of(&lines[0]), "001");
        assert_eq!(sequence_of(&lines[998]), "999");
        assert_eq!(sequence_of(&lines[999]), "001");
        assert!(lines.iter().all(|l| sequence_of(l) != "000"));
    }

    #[test]
    fn writers_count_independently() {
        let logger = Arc::new(InMemoryLogger::new());
        let a = Log::new("a", logger.clone());
        let b = Log::new("b", logger.clone());
        a.log_info("1");
        a.log_info("2");
        b.log_info("1");
        let lines = logger.drain_lines();
        assert!(lines[1].starts_with("<I> a: 002 "));
        assert!(lines[2].starts_with("<I> b: 001 "));
    }

    #[test]
    fn error_takes_caller_location() {
        let (log, logger) = writer("loc");
        log.error("boom");
        let line = logger.drain_logs();
        assert!(line.starts_with("<E> loc: 001 "));
        assert!(line.contains(": log.rs:"), "got {line}");
        assert!(line.ends_with(": boom\r\n"));
    }

    #[test]
    fn os_error_text() {
        let (log, logger) = writer("os");
        let err = io::Error::from_raw_os_error(2);
        log.log_os_error("f.rs:1: ", "Can't open battery capacity", &err);
        log.log_os_error("f.rs:2: ", "", &err);
        let lines = logger.drain_lines();
        assert!(lines[0].contains(&format!("f.rs:1: Can't open battery capacity: {err}\r\n")));
        assert!(lines[1].contains(&format!("f.rs:2: {err}\r\n")));
    }

    #[test]
    fn header_block_switches_color() {
        let (log, logger) = writer("hdr");
        assert_eq!(log.info_color(), InfoColor::Yellow);
        log.log_header("Connecting:", InfoColor::Green);
        assert_eq!(log.info_color(), InfoColor::Green);
        log.log_info("inside");
        log.log_end_header();
        assert_eq!(log.info_color(), InfoColor::Yellow);

        let lines = logger.drain_lines();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].ends_with(&format!("{HEADER_SEPARATOR}\r\n")));
        assert!(lines[1].ends_with(": Connecting:\r\n"));
        assert!(lines[3].ends_with(&format!("{HEADER_SEPARATOR}\r\n")));
    }

    #[test]
    fn unnamed_writer() {
        let logger = Arc::new(InMemoryLogger::new());
        let mut log = Log::unnamed(logger.clone());
        log.log_info("anon");
        log.set_owner("named");
        log.log_info("again");
        let lines = logger.drain_lines();
        assert!(lines[0].starts_with("<I> 001 PID: "));
        assert!(lines[1].starts_with("<I> named: 002 PID: "));
    }

    #[test]
    fn stack_trace_starts_at_the_caller() {
        let (log, _) = writer("t");
        let trace = log.stack_trace("writer");
        assert!(trace.starts_with("Stack Trace from writer:\r\n"));
        let first = trace.lines().nth(1).unwrap();
        assert!(first.contains("stack_trace_starts_at_the_caller"), "got {trace}");
        assert!(!first.contains("Log::stack_trace"), "got {trace}");
    }

    #[test_executors::async_test]
    async fn async_path_reaches_logger() {
        let (log, logger) = writer("async");
        log.log_info_async("later").await;
        log.log_error_async("x.rs:9: ", "bad").await;
        let lines = logger.drain_lines();
        assert!(lines[0].ends_with(": later\r\n"));
        assert!(lines[1].ends_with(": x.rs:9: bad\r\n"));
    }
}
