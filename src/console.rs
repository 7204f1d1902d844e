// SPDX-License-Identifier: MIT OR Apache-2.0

//! The fallback console stream.
//!
//! Failures of the shared log itself have nowhere else to go, so they are
//! narrated on stderr. The same module echoes logged lines to the terminal
//! for someone watching the process live.
//!
//! Nothing here may panic: a closed stderr just loses the text.

use crate::color::{InfoColor, NORMAL, RED};
use std::io::Write;

/// Reports a problem of the logger itself on stderr.
pub(crate) fn narrate(message: &str) {
    let mut lock = std::io::stderr().lock();
    let _ = writeln!(lock, "{RED}sharedlog: {message}{NORMAL}");
}

pub(crate) fn echo_info(color: InfoColor, message: &str) {
    let mut lock = std::io::stdout().lock();
    let _ = writeln!(lock, "{}{message}{NORMAL}", color.ansi());
}

pub(crate) fn echo_error(message: &str) {
    let mut lock = std::io::stderr().lock();
    let _ = writeln!(lock, "{RED}{message}{NORMAL}");
}
