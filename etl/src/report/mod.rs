//! Status lines for conversions and loads.
//!
//! The driver and loader never print directly; they hand every decision to a
//! [`Reporter`]. The CLI uses [`StderrReporter`]. [`MemoryReporter`] keeps the
//! entries so callers can inspect what a run said about each file.

use std::sync::{Arc, Mutex};

/// Severity of a status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A single status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    /// Nesting depth, used to indent per-file detail under a run.
    pub indent: u8,
}

impl LogEntry {
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            indent: 0,
        }
    }

    pub fn with_indent(mut self, indent: u8) -> Self {
        self.indent = indent;
        self
    }

    /// Warning or worse.
    pub fn is_problem(&self) -> bool {
        self.level >= LogLevel::Warning
    }
}

/// Receiver of status lines.
pub trait Reporter: Send + Sync {
    fn report(&self, entry: LogEntry);

    fn info(&self, message: impl Into<String>)
    where
        Self: Sized,
    {
        self.report(LogEntry::new(LogLevel::Info, message));
    }

    fn success(&self, message: impl Into<String>)
    where
        Self: Sized,
    {
        self.report(LogEntry::new(LogLevel::Success, message));
    }

    fn warning(&self, message: impl Into<String>)
    where
        Self: Sized,
    {
        self.report(LogEntry::new(LogLevel::Warning, message));
    }

    fn error(&self, message: impl Into<String>)
    where
        Self: Sized,
    {
        self.report(LogEntry::new(LogLevel::Error, message));
    }
}

impl<R: Reporter + ?Sized> Reporter for Arc<R> {
    fn report(&self, entry: LogEntry) {
        (**self).report(entry);
    }
}

/// Prints entries to stderr with a level marker.
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrReporter;

impl StderrReporter {
    fn prefix(level: LogLevel) -> &'static str {
        match level {
            LogLevel::Info => "  ",
            LogLevel::Success => "✓ ",
            LogLevel::Warning => "⚠️ ",
            LogLevel::Error => "❌",
        }
    }
}

impl Reporter for StderrReporter {
    fn report(&self, entry: LogEntry) {
        let indent = "   ".repeat(entry.indent as usize);
        eprintln!("{}{} {}", indent, Self::prefix(entry.level), entry.message);
    }
}

/// Keeps every entry in memory.
#[derive(Debug, Default)]
pub struct MemoryReporter {
    entries: Mutex<Vec<LogEntry>>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the entries so far.
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries
            .lock()
            .map(|e| e.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    /// Warning and error entries whose message mentions `needle`.
    pub fn problems_mentioning(&self, needle: &str) -> Vec<LogEntry> {
        self.entries()
            .into_iter()
            .filter(|e| e.is_problem() && e.message.contains(needle))
            .collect()
    }
}

impl Reporter for MemoryReporter {
    fn report(&self, entry: LogEntry) {
        let mut entries = match self.entries.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        entries.push(entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_reporter_keeps_order() {
        let reporter = MemoryReporter::new();
        reporter.info("scanning");
        reporter.report(LogEntry::new(LogLevel::Error, "1.json: JSON data is empty").with_indent(1));
        reporter.success("done");

        let entries = reporter.entries();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[1].level, LogLevel::Error);
        assert_eq!(entries[1].indent, 1);
        assert_eq!(entries[2].level, LogLevel::Success);
    }

    #[test]
    fn test_problems_filter() {
        let reporter = MemoryReporter::new();
        reporter.info("1.json → out/1.csv (3 rows)");
        reporter.warning("Skipping 1.json (already processed)");
        reporter.error("2.json: Match has no dates");

        assert_eq!(reporter.problems_mentioning("1.json").len(), 1);
        assert_eq!(reporter.problems_mentioning("2.json")[0].level, LogLevel::Error);
        assert!(reporter.problems_mentioning("3.json").is_empty());
    }

    #[test]
    fn test_shared_reporter_through_arc() {
        let shared = Arc::new(MemoryReporter::new());
        let as_dyn: Arc<dyn Reporter> = shared.clone();
        as_dyn.report(LogEntry::new(LogLevel::Warning, "cancelled"));
        assert_eq!(shared.entries().len(), 1);
    }

    #[test]
    fn test_level_ordering() {
        assert!(LogEntry::new(LogLevel::Warning, "").is_problem());
        assert!(LogEntry::new(LogLevel::Error, "").is_problem());
        assert!(!LogEntry::new(LogLevel::Success, "").is_problem());
    }
}
