//! Normalized crash-notice data model.
//!
//! All entities are value objects built once during parsing; none holds a
//! reference back into the source document.

use crate::value::Value;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One normalized error report derived from an incoming document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    /// Protocol version declared by the document.
    pub version: String,
    /// Routing and credential parameters from the embedded api-key blob.
    pub params: BTreeMap<String, String>,
    /// Notifier client metadata.
    pub notifier: Value,
    /// The reported error.
    pub error: ErrorReport,
    /// Request context, if the document carries one.
    pub request: Option<Request>,
    /// Server environment attributes, if present.
    pub env: Option<Value>,
}

impl Notice {
    /// The environment name reported by the server-environment section.
    #[must_use]
    pub fn environment_name(&self) -> Option<&str> {
        self.env
            .as_ref()
            .and_then(|env| env.get("environment_name"))
            .and_then(Value::as_str)
            .filter(|name| !name.trim().is_empty())
    }
}

/// The error section of a notice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorReport {
    /// Exception class name, if reported.
    pub class_name: Option<String>,
    /// Error message. A notice without one is rejected at parse time.
    pub message: String,
    /// Stack frames, outermost call first. May be empty.
    pub backtrace: Vec<Frame>,
}

/// One stack-trace entry.
///
/// Absent fields stay `None` rather than defaulting to an empty string;
/// fingerprinting distinguishes the two.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    /// Source file path.
    pub file: Option<String>,
    /// Method or function name.
    pub method: Option<String>,
    /// Line number, kept as opaque text.
    pub number: Option<String>,
}

/// Request context attached to a notice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    /// Session data, if the request carries one.
    pub session: Option<Session>,
    /// Remaining request attributes, passed through as generic values.
    pub attributes: BTreeMap<String, Value>,
}

/// Session data inside a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Normalized session log, absent when no entries survive.
    pub log: Option<Vec<LogEntry>>,
    /// Remaining session variables.
    pub vars: BTreeMap<String, Value>,
}

/// One timestamped session log line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Entry timestamp. Entries without a parseable time are dropped.
    pub time: DateTime<Utc>,
    /// Free-text log line.
    pub line: String,
}
