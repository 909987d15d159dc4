//! Progress events emitted while a batch runs.
//!
//! Batches run on a worker thread; callers observe progress through a
//! callback receiving structured events instead of tailing a log file.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Severity of a batch event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventLevel {
    /// Step-by-step progress detail.
    Debug,

    /// Normal progress.
    Info,

    /// Something the user should look at, batch still healthy.
    Warning,

    /// A target operation failed.
    Error,
}

impl EventLevel {
    /// Returns the level as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for EventLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One progress event from a running batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchEvent {
    /// When the event was generated.
    pub timestamp: DateTime<Utc>,
    /// Severity.
    pub level: EventLevel,
    /// Human-readable description of the step.
    pub message: String,
}

impl BatchEvent {
    /// Create an event at the given level, stamped now.
    pub fn new(level: EventLevel, message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            level,
            message: message.into(),
        }
    }

    /// Info-level event.
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(EventLevel::Info, message)
    }

    /// Warning-level event.
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(EventLevel::Warning, message)
    }

    /// Error-level event.
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(EventLevel::Error, message)
    }
}

/// Callback type for batch progress events.
pub type EventCallback = Arc<dyn Fn(&BatchEvent) + Send + Sync>;
