//! Log sink collaborator
//!
//! The adapter reports non-fatal conditions through a one-way sink rather
//! than returning them, mirroring how a host process collects plugin
//! diagnostics. The default sink forwards to `tracing`.

use std::sync::Mutex;

use tracing::{debug, error, warn};

/// Severity of a log line emitted by the adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Diagnostic detail
    Debug,
    /// Non-fatal mapping problems
    Warning,
    /// Conditions that abort the in-flight scan or mutation
    Error,
}

/// One-way sink accepting (message, severity) pairs
pub trait LogSink: Send + Sync {
    /// Record one log line
    fn log(&self, severity: Severity, message: &str);
}

impl<T: LogSink + ?Sized> LogSink for std::sync::Arc<T> {
    fn log(&self, severity: Severity, message: &str) {
        (**self).log(severity, message);
    }
}

/// Default sink backed by the `tracing` macros
#[derive(Debug, Default)]
pub struct TracingLog;

impl LogSink for TracingLog {
    fn log(&self, severity: Severity, message: &str) {
        match severity {
            Severity::Debug => debug!("{message}"),
            Severity::Warning => warn!("{message}"),
            Severity::Error => error!("{message}"),
        }
    }
}

/// In-memory sink that records every line, for hosts (and tests) that
/// need to inspect what the adapter reported
#[derive(Debug, Default)]
pub struct MemoryLog {
    lines: Mutex<Vec<(Severity, String)>>,
}

impl MemoryLog {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all recorded lines
    pub fn lines(&self) -> Vec<(Severity, String)> {
        self.lines.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Recorded lines at the given severity
    pub fn lines_at(&self, severity: Severity) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter(|(s, _)| *s == severity)
            .map(|(_, m)| m)
            .collect()
    }
}

impl LogSink for MemoryLog {
    fn log(&self, severity: Severity, message: &str) {
        self.lines
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((severity, message.to_string()));
    }
}
