//! Error types for notice parsing.

use thiserror::Error;

/// Errors that can occur while parsing a crash-notice document.
#[derive(Debug, Error)]
pub enum Error {
    /// The document is malformed or missing a required section.
    #[error("invalid notice: {0}")]
    InvalidNotice(String),

    /// The document is well-formed but declares an unsupported version.
    #[error("unsupported notice version: {0}")]
    UnsupportedVersion(String),
}

impl Error {
    /// Creates an `InvalidNotice` error with the given reason.
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidNotice(reason.into())
    }
}

/// Result type alias for notice parsing.
pub type Result<T> = std::result::Result<T, Error>;
