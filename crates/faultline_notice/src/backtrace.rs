//! Backtrace normalization.
//!
//! The converted backtrace value varies with the document shape: a single
//! frame arrives as a lone object, multiple frames as a list, and broken
//! clients may send anything else. Normalization is best-effort; unusable
//! input yields an empty frame sequence, never an error.

use crate::notice::Frame;
use crate::value::Value;

/// Coerces a raw converted backtrace value into an ordered frame sequence.
///
/// A lone object is wrapped into a one-element list; non-object entries are
/// dropped; `file`/`method`/`number` fields map into the frame, staying
/// absent when missing. Document order is preserved.
#[must_use]
pub fn frames_from_value(value: Option<&Value>) -> Vec<Frame> {
    let Some(value) = value else {
        return Vec::new();
    };

    let entries: Vec<&Value> = match value {
        Value::Object(_) => vec![value],
        Value::List(items) => items.iter().collect(),
        Value::Scalar(_) => {
            tracing::debug!("backtrace value is scalar, treating as no backtrace");
            return Vec::new();
        }
    };

    entries
        .into_iter()
        .filter_map(|entry| match entry {
            Value::Object(_) => Some(Frame {
                file: scalar_field(entry, "file"),
                method: scalar_field(entry, "method"),
                number: scalar_field(entry, "number"),
            }),
            _ => {
                tracing::debug!("dropping non-object backtrace entry");
                None
            }
        })
        .collect()
}

fn scalar_field(entry: &Value, key: &str) -> Option<String> {
    entry.get(key).and_then(Value::as_str).map(str::to_string)
}
