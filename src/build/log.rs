//! Build log
//!
//! Append-only text buffer of `<level>: <message>` lines collected during a
//! build session. Nothing is written to disk here; callers persist or display
//! the buffer themselves.

use std::fmt;

/// Severity of a log entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    /// Session bookkeeping such as `running: make`
    Info = 1,
    /// Raw output line from an external command
    Output = 2,
}

impl LogLevel {
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}

#[derive(Debug, Default, Clone)]
pub struct BuildLog {
    buffer: String,
}

impl BuildLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one entry. Entries are also echoed to the debug stream.
    pub fn log(&mut self, level: LogLevel, message: &str) {
        crate::debug!("{level}: {message}");
        self.buffer.push_str(&format!("{level}: {message}\n"));
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Iterate over `(level, message)` pairs in the order they were logged.
    pub fn entries(&self) -> impl Iterator<Item = (u8, &str)> + '_ {
        self.buffer.lines().filter_map(|line| {
            let (level, message) = line.split_once(": ")?;
            Some((level.parse().ok()?, message))
        })
    }
}

impl fmt::Display for BuildLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_level_prefix() {
        let mut log = BuildLog::new();
        log.log(LogLevel::Info, "running: phpize");
        log.log(LogLevel::Output, "Configuring for:");

        assert_eq!(log.as_str(), "1: running: phpize\n2: Configuring for:\n");
    }

    #[test]
    fn entries_split_level_and_message() {
        let mut log = BuildLog::new();
        log.log(LogLevel::Info, "running: make");
        log.log(LogLevel::Output, "cc -c foo.c: ok");

        let entries: Vec<_> = log.entries().collect();
        assert_eq!(
            entries,
            vec![(1, "running: make"), (2, "cc -c foo.c: ok")]
        );
    }

    #[test]
    fn new_log_is_empty() {
        let log = BuildLog::new();
        assert!(log.is_empty());
        assert_eq!(log.entries().count(), 0);
    }
}
