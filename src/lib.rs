//SPDX-License-Identifier: MIT OR Apache-2.0
/*!
# sharedlog

sharedlog is a best-effort log file shared by every thread of a process and by
any number of processes pointed at the same path.

# The problem

A small device runs several independent programs, each with several threads
polling sensors. They all want to append to one log file that someone can
`tail` or pull off the device. Nothing coordinates them except the filesystem,
the storage is small, and a logger that blocks or panics must never take a
sensor loop down with it.

# The write cycle

Each call to [`Log::log_info`] or [`Log::log_error`] formats one line and then:

1. opens the file for append, creating it if needed;
2. tries to take an exclusive advisory lock, **without waiting**;
3. if the lock is taken by someone else, parks the line in the process's
   [`PendingQueue`] (marked with a leading `" * "`) and returns;
4. otherwise rotates the file if it has grown past 65535 bytes, keeping the
   last 32767;
5. writes every parked line, in arrival order, then its own;
6. unlocks and closes.

Failures are swallowed and narrated on stderr.

# Line format

```text
<I> owner: 001 PID: 812 PPID: 1 03/05/24 07:08:09.0012: message
<E> owner: 002 PID: 812 PPID: 1 03/05/24 07:08:09.0013: main.rs:42: message
 * <I> owner: 003 PID: 812 PPID: 1 03/05/24 07:08:09.0014: written late
```

Lines end in `\r\n`. Sequence numbers count per [`Log`] instance and wrap from
999 to 1.

# The API

```rust
use sharedlog::{FileLogger, InfoColor, Log, LogConfig};
use std::sync::Arc;

# let dir = tempfile::tempdir().unwrap();
# let path = dir.path().join("i2c.log");
let sink = Arc::new(FileLogger::new(LogConfig::new(&path).with_console_echo(false)));
let log = Log::new("BatteryChecker", sink);

log.log_header("Battery", InfoColor::Green);
log.log_info("Starting BatteryCheckerThreadProc...");
log.log_end_header();
sharedlog::log_error!(log, "capacity unavailable: {}", -5);

let trace = log.stack_trace("BatteryChecker");
assert!(trace.starts_with("Stack Trace from BatteryChecker:"));
```
*/

mod clock;
mod color;
mod config;
mod console;
mod error;
mod file_logger;
mod inmemory_logger;
mod lock;
mod log;
mod log_record;
mod logger;
mod macros;
mod pending;
mod rotate;
pub mod stack_trace;
mod sys;

pub use clock::{format_timestamp, timestamp_now};
pub use color::InfoColor;
pub use config::{
    DEFAULT_LOG_FILE, KEEP_LAST_LOG_SIZE, LOG_FILE_ENV, LogConfig, MAX_LOG_FILE_SIZE,
    RotationLimits,
};
pub use error::{Error, Result};
pub use file_logger::{FileLogger, WriteOutcome};
pub use inmemory_logger::InMemoryLogger;
pub use lock::LockedFile;
pub use log::{HEADER_SEPARATOR, Log, MAX_SEQUENCE};
pub use log_record::{LogRecord, Severity, short_location};
pub use logger::Logger;
pub use pending::{DEFERRED_MARKER, PendingQueue};
pub use rotate::{Rotation, maybe_rotate};
pub use stack_trace::capture_trace;
