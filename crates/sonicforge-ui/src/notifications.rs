//! User-facing error log and toast queue.
//!
//! Every failure is recovered where it happens and reported here. The log is
//! shared by cloning; each entry is also emitted through `tracing`.

use parking_lot::Mutex;
use serde::Serialize;
use sonicforge_core::{ErrorKind, Result, SonicForgeError};
use sonicforge_timeline::unix_now;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Entries kept before the oldest are dropped.
pub const MAX_ERRORS: usize = 100;

const CRITICAL_HINT: &str = "Please contact support if this persists.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppError {
    pub message: String,
    pub severity: Severity,
    /// Short machine code, e.g. `validation`.
    pub code: Option<String>,
    /// Unix seconds.
    pub timestamp: u64,
}

/// A pending notification for the UI.
#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub title: String,
    pub description: Option<String>,
    pub severity: Severity,
}

#[derive(Debug, Default)]
struct LogInner {
    errors: Vec<AppError>,
    toasts: Vec<Toast>,
}

#[derive(Debug, Clone, Default)]
pub struct ErrorLog {
    inner: Arc<Mutex<LogInner>>,
}

impl ErrorLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message and optionally queue a toast for it.
    pub fn handle(&self, message: impl Into<String>, severity: Severity, show_toast: bool) {
        self.push(message.into(), severity, None, show_toast);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.handle(message, Severity::Info, true);
    }

    /// Record a failed operation.
    pub fn report(&self, err: &SonicForgeError) {
        let (severity, code) = match err.kind() {
            ErrorKind::Validation => (Severity::Warning, "validation"),
            ErrorKind::Playback => (Severity::Error, "playback"),
            ErrorKind::Operation => (Severity::Error, "operation"),
        };
        self.push(err.to_string(), severity, Some(code.to_string()), true);
    }

    /// Report the error of `result`, if any, and pass the value through.
    pub fn capture<T>(&self, result: Result<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                self.report(&e);
                None
            }
        }
    }

    /// Drain queued toasts.
    pub fn take_toasts(&self) -> Vec<Toast> {
        std::mem::take(&mut self.inner.lock().toasts)
    }

    /// Logged entries, oldest first.
    pub fn errors(&self) -> Vec<AppError> {
        self.inner.lock().errors.clone()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.errors.clear();
        inner.toasts.clear();
    }

    /// Pretty JSON of the log for bug reports.
    pub fn export_json(&self) -> Result<String> {
        let errors = self.errors();
        serde_json::to_string_pretty(&errors)
            .map_err(|e| SonicForgeError::Serialization(e.to_string()))
    }

    fn push(&self, message: String, severity: Severity, code: Option<String>, show_toast: bool) {
        match severity {
            Severity::Info => info!(code = ?code, "{}", message),
            Severity::Warning => warn!(code = ?code, "{}", message),
            Severity::Error | Severity::Critical => error!(code = ?code, ?severity, "{}", message),
        }

        let mut inner = self.inner.lock();
        if show_toast {
            let (title, description) = match severity {
                Severity::Critical => (message.clone(), Some(CRITICAL_HINT.to_string())),
                _ => (message.clone(), None),
            };
            inner.toasts.push(Toast {
                title,
                description,
                severity,
            });
        }
        inner.errors.push(AppError {
            message,
            severity,
            code,
            timestamp: unix_now(),
        });
        if inner.errors.len() > MAX_ERRORS {
            let excess = inner.errors.len() - MAX_ERRORS;
            inner.errors.drain(..excess);
        }
    }
}
