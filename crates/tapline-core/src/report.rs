//! Report entries for test runs.
//!
//! Screen actions record what they did (and what went wrong) as
//! [`ReportEntry`] values delivered to a [`Reporter`]. The default
//! [`TracingReporter`] forwards entries to `tracing`; [`MemoryReporter`]
//! keeps them in memory so tests and report writers can inspect them.
//!
//! # Example
//!
//! ```
//! use tapline_core::report::{MemoryReporter, ReportLevel, Reporter};
//!
//! let reporter = MemoryReporter::new();
//! reporter.info("Clicked on Login");
//! reporter.fail("Exception occurred when clicking on - Logout", Some("no such element".into()));
//!
//! let entries = reporter.entries();
//! assert_eq!(entries.len(), 2);
//! assert_eq!(entries[1].level, ReportLevel::Fail);
//! ```

use std::fmt;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Severity of a report entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportLevel {
    Info,
    Pass,
    Fail,
    Warning,
}

impl fmt::Display for ReportLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReportLevel::Info => "INFO",
            ReportLevel::Pass => "PASS",
            ReportLevel::Fail => "FAIL",
            ReportLevel::Warning => "WARNING",
        };
        f.write_str(name)
    }
}

/// One line of a test report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportEntry {
    /// Unique identifier for this entry.
    pub id: Uuid,
    /// When the entry was recorded.
    pub timestamp: DateTime<Utc>,
    pub level: ReportLevel,
    pub message: String,
    /// Error text for failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cause: Option<String>,
}

impl ReportEntry {
    pub fn new(level: ReportLevel, message: impl Into<String>, cause: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            level,
            message: message.into(),
            cause,
        }
    }
}

/// Receives report entries.
pub trait Reporter: Send + Sync {
    fn record(&self, entry: ReportEntry);

    fn info(&self, message: &str) {
        self.record(ReportEntry::new(ReportLevel::Info, message, None));
    }

    fn pass(&self, message: &str) {
        self.record(ReportEntry::new(ReportLevel::Pass, message, None));
    }

    fn fail(&self, message: &str, cause: Option<String>) {
        self.record(ReportEntry::new(ReportLevel::Fail, message, cause));
    }

    fn warning(&self, message: &str) {
        self.record(ReportEntry::new(ReportLevel::Warning, message, None));
    }
}

/// Forwards entries to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn record(&self, entry: ReportEntry) {
        match entry.level {
            ReportLevel::Info | ReportLevel::Pass => {
                tracing::info!(level = %entry.level, cause = entry.cause.as_deref(), "{}", entry.message)
            }
            ReportLevel::Warning => {
                tracing::warn!(level = %entry.level, "{}", entry.message)
            }
            ReportLevel::Fail => {
                tracing::error!(level = %entry.level, cause = entry.cause.as_deref(), "{}", entry.message)
            }
        }
    }
}

/// Keeps every entry in memory.
#[derive(Debug, Default)]
pub struct MemoryReporter {
    entries: Mutex<Vec<ReportEntry>>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of all entries recorded so far.
    pub fn entries(&self) -> Vec<ReportEntry> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }

    /// Returns the entries at `level`.
    pub fn entries_at(&self, level: ReportLevel) -> Vec<ReportEntry> {
        self.entries()
            .into_iter()
            .filter(|e| e.level == level)
            .collect()
    }

    /// Serializes all entries as JSON Lines.
    pub fn to_json_lines(&self) -> String {
        self.entries()
            .iter()
            .filter_map(|e| serde_json::to_string(e).ok())
            .map(|line| line + "\n")
            .collect()
    }
}

impl Reporter for MemoryReporter {
    fn record(&self, entry: ReportEntry) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push(entry);
        }
    }
}
