//! Failure log capability.
//!
//! Validation and read failures are appended to a plain-text log, one file per
//! calendar day. The pipeline receives the log as an `Arc<dyn FailureLog>` at
//! construction; the server binary wires a [`DailyFileLog`] once at startup and
//! tests use [`MemoryLog`].

use chrono::{DateTime, Local, NaiveDate};
use parking_lot::Mutex;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{ErrorContext, IngestError, IngestResult};

/// A single failure entry with timestamp and message.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub message: String,
}

/// Sink for failure messages. Recording never fails the caller.
pub trait FailureLog: Send + Sync {
    fn record(&self, message: &str);
}

/// Appends failures to `<dir>/<YYYY-MM-DD>.log`.
///
/// The file is picked when each entry is written, so a long-running process
/// rolls over to a new file at midnight local time.
pub struct DailyFileLog {
    dir: PathBuf,
    write_lock: Mutex<()>,
}

impl DailyFileLog {
    /// Create the log, creating `dir` if it does not exist.
    pub fn new(dir: impl Into<PathBuf>) -> IngestResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .map_err(|e| IngestError::io(&e, ErrorContext::new("create_log_dir").with_path(&dir)))?;
        Ok(Self {
            dir,
            write_lock: Mutex::new(()),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the log file for a given day.
    pub fn file_for(&self, date: NaiveDate) -> PathBuf {
        self.dir.join(format!("{}.log", date.format("%Y-%m-%d")))
    }

    /// Format one line as `<yy-Mon-dd HH:MM:SS> - <message>`.
    pub fn format_line(timestamp: &DateTime<Local>, message: &str) -> String {
        format!("{} - {}", timestamp.format("%y-%b-%d %H:%M:%S"), message)
    }

    fn append(&self, entry: &LogEntry) -> std::io::Result<()> {
        let path = self.file_for(entry.timestamp.date_naive());
        let _guard = self.write_lock.lock();
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(file, "{}", Self::format_line(&entry.timestamp, &entry.message))
    }
}

impl FailureLog for DailyFileLog {
    fn record(&self, message: &str) {
        let entry = LogEntry {
            timestamp: Local::now(),
            message: message.to_string(),
        };
        if let Err(e) = self.append(&entry) {
            tracing::warn!(dir = %self.dir.display(), error = %e, "failed to write failure log");
        }
    }
}

/// In-memory failure log.
#[derive(Default)]
pub struct MemoryLog {
    entries: Mutex<Vec<LogEntry>>,
}

impl MemoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.entries.lock().iter().map(|e| e.message.clone()).collect()
    }
}

impl FailureLog for MemoryLog {
    fn record(&self, message: &str) {
        self.entries.lock().push(LogEntry {
            timestamp: Local::now(),
            message: message.to_string(),
        });
    }
}
