//! Error fingerprinting and dedup/reopen decisions for Faultline.
//!
//! This crate provides:
//! - A deterministic 128-bit fingerprint identifying "the same" error
//!   across occurrences
//! - The create/increment/reopen decision engine
//! - A processing pipeline wiring notice parsing, fingerprinting and the
//!   decision against an injected issue store
//!
//! # Example
//!
//! ```rust,ignore
//! use faultline_dedup::{process, ReopenPolicy};
//!
//! let policy = ReopenPolicy::new("stag.*")?;
//! let report = process(xml, &mut store, Some(&policy))?;
//! println!("identity: {}", report.fingerprint);
//! ```

#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod decision;
pub mod error;
pub mod fingerprint;
pub mod pipeline;

pub use decision::{decide, Action, IssueRecord, ReopenNote, ReopenPolicy};
pub use error::{Error, Result};
pub use fingerprint::fingerprint;
pub use pipeline::{process, IssueStore, Report};
