//! Structured logger collaborator
//!
//! The exception reporter writes through the [`Logger`] trait so applications
//! can plug in their own sink. [`TracingLogger`] forwards to `tracing`;
//! [`MemoryLogger`] buffers entries for inspection.

use crate::error::{HarborError, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::{Mutex, MutexGuard};
use strum_macros::{Display, EnumString};

/// Extra key/value pairs attached to a log entry
pub type LogFields = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Display, EnumString, Serialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
}

pub trait Logger: Send + Sync {
    fn log(&self, severity: Severity, message: &str, fields: &LogFields) -> Result<()>;

    fn error(&self, message: &str, fields: &LogFields) -> Result<()> {
        self.log(Severity::Error, message, fields)
    }

    fn debug(&self, message: &str, fields: &LogFields) -> Result<()> {
        self.log(Severity::Debug, message, fields)
    }
}

/// Forwards entries to `tracing` events
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn log(&self, severity: Severity, message: &str, fields: &LogFields) -> Result<()> {
        let fields = serde_json::to_string(fields)?;
        match severity {
            Severity::Trace => tracing::trace!(fields = %fields, "{}", message),
            Severity::Debug => tracing::debug!(fields = %fields, "{}", message),
            Severity::Info => tracing::info!(fields = %fields, "{}", message),
            Severity::Warn => tracing::warn!(fields = %fields, "{}", message),
            Severity::Error | Severity::Fatal => {
                tracing::error!(severity = %severity, fields = %fields, "{}", message)
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogEntry {
    pub severity: Severity,
    pub message: String,
    pub fields: LogFields,
    pub timestamp: DateTime<Utc>,
}

/// Keeps every entry in memory
#[derive(Debug, Default)]
pub struct MemoryLogger {
    entries: Mutex<Vec<LogEntry>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<LogEntry>>> {
        self.entries
            .lock()
            .map_err(|_| HarborError::logger("memory logger lock poisoned"))
    }

    /// Snapshot of the recorded entries
    pub fn entries(&self) -> Vec<LogEntry> {
        self.lock().map(|entries| entries.clone()).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        if let Ok(mut entries) = self.lock() {
            entries.clear();
        }
    }
}

impl Logger for MemoryLogger {
    fn log(&self, severity: Severity, message: &str, fields: &LogFields) -> Result<()> {
        self.lock()?.push(LogEntry {
            severity,
            message: message.to_string(),
            fields: fields.clone(),
            timestamp: Utc::now(),
        });
        Ok(())
    }
}
