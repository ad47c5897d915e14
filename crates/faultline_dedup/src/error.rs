//! Error types for fingerprinting and dedup decisions.

use thiserror::Error;

/// Errors that can occur during dedup processing.
#[derive(Debug, Error)]
pub enum Error {
    /// The configured reopen pattern is not a valid regular expression.
    #[error("invalid reopen pattern '{pattern}': {reason}")]
    InvalidReopenPattern {
        /// The offending pattern.
        pattern: String,
        /// Why it failed to compile.
        reason: String,
    },

    /// The incoming document failed to parse.
    #[error(transparent)]
    Notice(#[from] faultline_notice::Error),
}

/// Result type alias for dedup operations.
pub type Result<T> = std::result::Result<T, Error>;
