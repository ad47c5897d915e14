//! Error fingerprinting.
//!
//! The fingerprint is the stable identity grouping recurrences of "the
//! same" error: a hash over class name, message, and the normalized
//! backtrace. Method names are scrubbed of generated identifiers (the
//! `_<digits>_` infixes compilers and runtimes insert for closures and
//! blocks) so that otherwise-identical call sites from different process
//! runs fingerprint identically.

use faultline_notice::{ErrorReport, Frame};
use once_cell::sync::Lazy;
use regex::Regex;
use xxhash_rust::xxh3::xxh3_128;

static GENERATED_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"_\d+_").expect("generated-id pattern compiles"));

/// Computes the deterministic identity hash for an error.
///
/// Hash input is the newline-joined list of: class name (omitted when
/// absent), message, and one `file|method|number` line per backtrace
/// frame. A frame whose entry cannot be computed contributes nothing;
/// the operation itself never fails.
#[must_use]
pub fn fingerprint(error: &ErrorReport) -> String {
    let mut parts: Vec<String> = Vec::new();

    if let Some(class_name) = &error.class_name {
        parts.push(class_name.clone());
    }
    parts.push(error.message.clone());

    for frame in &error.backtrace {
        if let Some(line) = frame_line(frame) {
            parts.push(line);
        } else {
            tracing::debug!("skipping backtrace frame without method");
        }
    }

    let digest = xxh3_128(parts.join("\n").as_bytes());
    format!("{digest:032x}")
}

/// Renders one frame's hash contribution, or `None` when the frame has no
/// method. Absent file or number render as the empty string; absence of
/// the method skips the frame entirely.
fn frame_line(frame: &Frame) -> Option<String> {
    let method = frame.method.as_deref()?;
    let method = GENERATED_ID.replace_all(method, "");
    Some(format!(
        "{}|{}|{}",
        frame.file.as_deref().unwrap_or(""),
        method,
        frame.number.as_deref().unwrap_or("")
    ))
}
