use std::{collections::VecDeque, fmt};

use chrono::{DateTime, Utc};
use serde::Serialize;
use shared::domain::ErrorLevel;
use tracing::{error, info, warn};

pub const DEFAULT_LOG_CAPACITY: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warn,
    Error,
}

impl From<ErrorLevel> for Severity {
    fn from(level: ErrorLevel) -> Self {
        match level {
            ErrorLevel::None | ErrorLevel::Info | ErrorLevel::Recovered => Severity::Info,
            ErrorLevel::Warning | ErrorLevel::Recoverable => Severity::Warn,
            ErrorLevel::Minor | ErrorLevel::Major | ErrorLevel::InitFailure | ErrorLevel::Fatal => {
                Severity::Error
            }
        }
    }
}

/// One line of the operator-facing log, rendered as `[TAG] message`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub tag: String,
    pub message: String,
    pub at: DateTime<Utc>,
}

impl Diagnostic {
    pub fn new(severity: Severity, tag: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity,
            tag: tag.into(),
            message: message.into(),
            at: Utc::now(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(Severity::Info, "INFO", message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, "ERROR", message)
    }

    /// A server-reported error, tagged with its severity token.
    pub fn leveled(level: ErrorLevel, message: impl Into<String>) -> Self {
        Self::new(level.into(), level.as_str(), message)
    }

    /// Mirrors the line to the tracing subscriber.
    pub fn trace(&self) {
        match self.severity {
            Severity::Info => info!(tag = %self.tag, "{}", self.message),
            Severity::Warn => warn!(tag = %self.tag, "{}", self.message),
            Severity::Error => error!(tag = %self.tag, "{}", self.message),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.tag, self.message)
    }
}

/// Newest-first diagnostic history. Entries beyond `capacity` fall off the
/// old end.
#[derive(Debug, Clone)]
pub struct DiagnosticLog {
    entries: VecDeque<Diagnostic>,
    capacity: usize,
}

impl DiagnosticLog {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.min(DEFAULT_LOG_CAPACITY)),
            capacity: capacity.max(1),
        }
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.entries.push_front(diagnostic);
        self.entries.truncate(self.capacity);
    }

    pub fn extend(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        for diagnostic in diagnostics {
            self.push(diagnostic);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&Diagnostic> {
        self.entries.front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for DiagnosticLog {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_LOG_CAPACITY)
    }
}
