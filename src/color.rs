// SPDX-License-Identifier: MIT OR Apache-2.0

//! Console colors for info lines.
//!
//! A [`Log`](crate::Log) shows its info lines in its current color, which
//! [`Log::log_header`](crate::Log::log_header) switches for the duration of a
//! block. Only the console echo is colored; the file never is.

pub(crate) const RED: &str = "\x1b[31m";
pub(crate) const NORMAL: &str = "\x1b[0m";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum InfoColor {
    #[default]
    Yellow = 0,
    Green,
    Blue,
    Cyan,
    Magenta,
    White,
}

impl InfoColor {
    /// ANSI escape selecting this color.
    pub fn ansi(self) -> &'static str {
        match self {
            InfoColor::Yellow => "\x1b[33m",
            InfoColor::Green => "\x1b[32m",
            InfoColor::Blue => "\x1b[34m",
            InfoColor::Cyan => "\x1b[36m",
            InfoColor::Magenta => "\x1b[35m",
            InfoColor::White => "\x1b[37m",
        }
    }

    pub(crate) fn from_u8(value: u8) -> Self {
        match value {
            1 => InfoColor::Green,
            2 => InfoColor::Blue,
            3 => InfoColor::Cyan,
            4 => InfoColor::Magenta,
            5 => InfoColor::White,
            _ => InfoColor::Yellow,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::InfoColor;

    #[test]
    fn u8_round_trip() {
        for color in [
            InfoColor::Yellow,
            InfoColor::Green,
            InfoColor::Blue,
            InfoColor::Cyan,
            InfoColor::Magenta,
            InfoColor::White,
        ] {
            assert_eq!(InfoColor::from_u8(color as u8), color);
        }
        assert_eq!(InfoColor::from_u8(200), InfoColor::Yellow);
    }
}
