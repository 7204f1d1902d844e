// SPDX-License-Identifier: MIT OR Apache-2.0

//! Log record type for the shared log.
//!
//! A [`LogRecord`] lives only long enough to be rendered and written. It is
//! built by [`Log`](crate::Log), which stamps the sequence number, process ids
//! and time, and then handed to a [`Logger`](crate::Logger).
//!
//! # Line shapes
//!
//! ```text
//! <I> owner: 001 PID: 812 PPID: 1 03/05/24 07:08:09.0012: message\r\n
//! <E> owner: 002 PID: 812 PPID: 1 03/05/24 07:08:09.0013: main.rs:42: message\r\n
//! ```
//!
//! An error line splices the shortened location tag between the timestamp and
//! the message. Both shapes come out of the single [`Display`] impl.

use std::fmt::{Display, Formatter};

/// What kind of line a record renders as.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Severity {
    Info,
    /// `location` is a `file:line: ` tag, usually from [`at!`](crate::at).
    Error { location: String },
}

/**
A log record.

The sequence number is local to one [`Log`](crate::Log) instance: it gives
ordering evidence between that writer's lines, nothing more.
*/
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LogRecord {
    owner: String,
    sequence: u16,
    pid: u32,
    ppid: u32,
    timestamp: String,
    severity: Severity,
    message: String,
}

impl LogRecord {
    /**
    Creates a record stamped with the current process ids and time.
    */
    pub fn new(owner: &str, sequence: u16, severity: Severity, message: String) -> Self {
        Self {
            owner: owner.to_string(),
            sequence,
            pid: crate::sys::pid(),
            ppid: crate::sys::ppid(),
            timestamp: crate::clock::timestamp_now(),
            severity,
            message,
        }
    }

    /// Replaces the timestamp, for records built ahead of time or in tests.
    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = timestamp.into();
        self
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn sequence(&self) -> u16 {
        self.sequence
    }

    pub fn severity(&self) -> &Severity {
        &self.severity
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_error(&self) -> bool {
        matches!(self.severity, Severity::Error { .. })
    }
}

/**
Drops everything up to and including the last `/`.

Full build paths make lines wrap and eat into the file's size budget, so only
`file.rs:123: ` survives.
*/
pub fn short_location(location: &str) -> &str {
    match location.rfind('/') {
        Some(pos) => &location[pos + 1..],
        None => location,
    }
}

impl Display for LogRecord {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.severity {
            Severity::Info => f.write_str("<I> ")?,
            Severity::Error { .. } => f.write_str("<E> ")?,
        }
        if !self.owner.is_empty() {
            write!(f, "{}: ", self.owner)?;
        }
        write!(
            f,
            "{:03} PID: {} PPID: {} {}: ",
            self.sequence, self.pid, self.ppid, self.timestamp
        )?;
        if let Severity::Error { location } = &self.severity {
            f.write_str(short_location(location))?;
        }
        write!(f, "{}\r\n", self.message)
    }
}
/*
Boilerplate notes for LogRecord:

IMPLEMENTED:
- Debug, Clone, PartialEq/Eq, Hash: derived, all fields are plain data
- Display: the on-disk line, terminator included

NOT IMPLEMENTED:
- Default: a record without an owner's sequence number is meaningless
- Ord/PartialOrd: sequence numbers wrap and are per-writer, so no total order
- Copy: owns strings
*/

#[cfg(test)]
mod tests {
    use super::*;

    fn record(owner: &str, severity: Severity, message: &str) -> LogRecord {
        let mut r = LogRecord::new(owner, 7, severity, message.to_string())
            .with_timestamp("03/05/24 07:08:09.0012");
        r.pid = 812;
        r.ppid = 1;
        r
    }

    #[test]
    fn info_shape() {
        let r = record("battery", Severity::Info, "Starting...");
        assert_eq!(
            r.to_string(),
            "<I> battery: 007 PID: 812 PPID: 1 03/05/24 07:08:09.0012: Starting...\r\n"
        );
    }

    #[test]
    fn error_shape_uses_basename() {
        let r = record(
            "battery",
            Severity::Error {
                location: "/home/build/src/checker/BatteryChecker.rs:51: ".to_string(),
            },
            "Can't open battery capacity",
        );
        assert_eq!(
            r.to_string(),
            "<E> battery: 007 PID: 812 PPID: 1 03/05/24 07:08:09.0012: BatteryChecker.rs:51: Can't open battery capacity\r\n"
        );
        assert!(r.is_error());
    }

    #[test]
    fn unnamed_owner_has_no_prefix() {
        let r = record("", Severity::Info, "x");
        assert!(r.to_string().starts_with("<I> 007 PID: "));
    }

    #[test]
    fn short_location_without_slash() {
        assert_eq!(short_location("main.rs:3: "), "main.rs:3: ");
        assert_eq!(short_location("a/b/"), "");
    }
}
