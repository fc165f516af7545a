//! The catch-log-degrade wrapper applied to every network and storage call.
//!
//! Recognized failures ([`FailureClass`]) are written to the append-only
//! error log and turned into `Ok(None)`. Anything else is handed back to the
//! caller untouched.

use std::fs::{self, OpenOptions};
use std::future::Future;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use tracing::{error, warn};

use crate::error::AppError;
use crate::models::{format_timestamp, timestamp_now, Category};

/// Append-only text log, one `[<timestamp>] ERROR: <message>` line per entry.
#[derive(Debug, Clone)]
pub struct ErrorLog {
    path: PathBuf,
}

impl ErrorLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Formats a single log line, without the trailing newline.
    pub fn format_entry(at: &NaiveDateTime, message: &str) -> String {
        format!("[{}] ERROR: {}", format_timestamp(at), message)
    }

    /// Appends one entry, creating the log and its directory on first use.
    pub fn record(&self, message: &str) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        // Single write so an entry is never split across lines.
        let line = format!("{}\n", Self::format_entry(&timestamp_now(), message));
        file.write_all(line.as_bytes())
    }

    /// Like [`ErrorLog::record`], but a failing log never becomes a failing caller.
    pub fn record_quietly(&self, message: &str) {
        if let Err(e) = self.record(message) {
            warn!(path = %self.path.display(), "Could not write error log: {}", e);
        }
    }
}

/// Wraps fallible operations so that known failures degrade to "no result".
///
/// # Examples
///
/// ```no_run
/// use dailydose_core::{AppError, Category, ErrorEnvelope, ErrorLog};
///
/// let envelope = ErrorEnvelope::new(ErrorLog::new("log/app.log"));
///
/// let absorbed = envelope.run(Category::Advice, || -> Result<u32, AppError> {
///     Err(AppError::Timeout(10))
/// });
/// assert!(matches!(absorbed, Ok(None)));
/// ```
#[derive(Debug, Clone)]
pub struct ErrorEnvelope {
    log: ErrorLog,
}

impl ErrorEnvelope {
    pub fn new(log: ErrorLog) -> Self {
        Self { log }
    }

    pub fn log(&self) -> &ErrorLog {
        &self.log
    }

    /// Converts an already computed result.
    ///
    /// Returns `Ok(Some(value))` on success, `Ok(None)` after logging a
    /// recognized failure, and `Err` for anything unexpected.
    pub fn absorb<T>(
        &self,
        category: Category,
        result: Result<T, AppError>,
    ) -> Result<Option<T>, AppError> {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(err) => match err.failure_class() {
                Some(class) => {
                    error!(category = %category, class = ?class, "{}", err);
                    self.log
                        .record_quietly(&format!("{} error: {}", category.label(), err));
                    Ok(None)
                }
                None => Err(err),
            },
        }
    }

    pub fn run<T, F>(&self, category: Category, op: F) -> Result<Option<T>, AppError>
    where
        F: FnOnce() -> Result<T, AppError>,
    {
        self.absorb(category, op())
    }

    pub async fn run_async<T, Fut>(
        &self,
        category: Category,
        op: Fut,
    ) -> Result<Option<T>, AppError>
    where
        Fut: Future<Output = Result<T, AppError>>,
    {
        self.absorb(category, op.await)
    }

    /// Records a failure that escaped every category, e.g. in the menu loop.
    pub fn record_unexpected(&self, context: &str, err: &dyn std::fmt::Display) {
        error!("{}: {}", context, err);
        self.log.record_quietly(&format!("{}: {}", context, err));
    }
}
