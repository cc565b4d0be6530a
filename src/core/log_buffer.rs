//! Status Log
//!
//! Fixed-capacity ring buffer of operator-facing status lines (mode changes,
//! task faults, command results). Backed by heapless `HistoryBuf`, so
//! nothing allocates.
//!
//! ## Features
//!
//! - Capacity of 32 lines; the oldest line is evicted when full
//! - Overflow tracking for diagnostics
//! - Oldest-first iteration order

use core::fmt;

use heapless::{HistoryBuf, String, Vec};

/// Buffer capacity in number of lines
pub const STATUS_LOG_SIZE: usize = 32;

/// Maximum line length in bytes; longer lines are truncated
pub const STATUS_LINE_LEN: usize = 96;

/// Log level with ordering: Debug < Info < Warn < Error
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum LogLevel {
    Debug = 0,
    Info = 1,
    Warn = 2,
    Error = 3,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }
}

/// One status line
#[derive(Debug, Clone, PartialEq)]
pub struct StatusLine {
    pub level: LogLevel,
    pub message: String<STATUS_LINE_LEN>,
}

impl fmt::Display for StatusLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.level.as_str(), self.message)
    }
}

/// Writer that silently drops whatever does not fit
struct Truncating<'a>(&'a mut String<STATUS_LINE_LEN>);

impl fmt::Write for Truncating<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for c in s.chars() {
            if self.0.push(c).is_err() {
                break;
            }
        }
        Ok(())
    }
}

/// Ring buffer of status lines
pub struct StatusLog {
    buffer: HistoryBuf<StatusLine, STATUS_LOG_SIZE>,
    overflow_count: u32,
}

impl StatusLog {
    pub const fn new() -> Self {
        Self {
            buffer: HistoryBuf::new(),
            overflow_count: 0,
        }
    }

    /// Format and append a line
    ///
    /// If the buffer is full, the oldest line is evicted and
    /// `overflow_count` is incremented.
    pub fn push(&mut self, level: LogLevel, args: fmt::Arguments<'_>) {
        let mut message = String::new();
        let _ = fmt::write(&mut Truncating(&mut message), args);
        self.push_line(StatusLine { level, message });
    }

    pub fn push_line(&mut self, line: StatusLine) {
        if self.buffer.len() == STATUS_LOG_SIZE {
            self.overflow_count = self.overflow_count.saturating_add(1);
        }
        self.buffer.write(line);
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.len() == 0
    }

    /// Number of lines lost to overflow
    pub fn overflow_count(&self) -> u32 {
        self.overflow_count
    }

    /// Iterate over lines in oldest-first order
    pub fn iter(&self) -> impl Iterator<Item = &StatusLine> {
        self.buffer.oldest_ordered()
    }

    /// Most recent line
    pub fn latest(&self) -> Option<&StatusLine> {
        self.buffer.oldest_ordered().last()
    }

    /// Remove and return all lines, oldest first
    ///
    /// Does not reset `overflow_count`.
    pub fn drain(&mut self) -> Vec<StatusLine, STATUS_LOG_SIZE> {
        let mut lines = Vec::new();
        for line in self.buffer.oldest_ordered() {
            let _ = lines.push(line.clone());
        }
        self.buffer.clear();
        lines
    }
}

impl Default for StatusLog {
    fn default() -> Self {
        Self::new()
    }
}
