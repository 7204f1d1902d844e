// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wall-clock timestamps for log lines.
//!
//! Lines are stamped in UTC as `MM/DD/YY HH:MM:SS.mmmm`: two-digit year, then
//! the time of day with milliseconds zero-padded to four digits. The width is
//! fixed so columns line up when tailing the file.

use chrono::{DateTime, Timelike, Utc};

/// Formats `time` as `MM/DD/YY HH:MM:SS.mmmm`.
pub fn format_timestamp(time: DateTime<Utc>) -> String {
    // leap seconds report nanos >= 1e9; clamp so the field stays 4 wide
    let millis = (time.nanosecond() / 1_000_000).min(999);
    format!("{}.{:04}", time.format("%m/%d/%y %H:%M:%S"), millis)
}

/// The current UTC time, formatted by [`format_timestamp`].
pub fn timestamp_now() -> String {
    format_timestamp(Utc::now())
}
