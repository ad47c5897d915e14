//! Crash-notice parsing and normalization for Faultline.
//!
//! This crate provides:
//! - Schema-free conversion of document nodes into typed values
//! - Parsing of crash-notice XML documents into normalized [`Notice`]s
//! - Best-effort backtrace and session-log normalization
//!
//! # Example
//!
//! ```rust,ignore
//! use faultline_notice::parse;
//!
//! let notice = parse(xml)?;
//! assert_eq!(notice.version, "2.4");
//! ```

#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod backtrace;
pub mod error;
pub mod notice;
pub mod parser;
pub mod session;
pub mod value;

pub use error::{Error, Result};
pub use notice::{ErrorReport, Frame, LogEntry, Notice, Request, Session};
pub use parser::{parse, SUPPORTED_VERSIONS};
pub use value::Value;
