//! Session log normalization.
//!
//! The session `log` field is a double-encoded payload: a JSON array of
//! `{time, line}` objects carried as a string inside the XML document.
//! Decoding is best-effort; a log that cannot be decoded never fails the
//! surrounding parse.

use crate::notice::LogEntry;
use crate::value::Value;
use chrono::{DateTime, NaiveDateTime, Utc};

/// Decodes the raw session `log` value into ordered, timestamped entries.
///
/// Returns `None` when the value is not a JSON-encoded array, and drops
/// entries without a parseable `time`. If no entries survive, the log is
/// absent.
#[must_use]
pub fn parse_session_log(value: &Value) -> Option<Vec<LogEntry>> {
    let raw = value.as_str()?;

    let entries: Vec<serde_json::Value> = match serde_json::from_str(raw) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::debug!("undecodable session log, dropping: {e}");
            return None;
        }
    };

    let entries: Vec<LogEntry> = entries
        .into_iter()
        .filter_map(|entry| {
            let time = entry.get("time").and_then(serde_json::Value::as_str)?;
            let Some(time) = parse_time(time) else {
                tracing::debug!("dropping log entry with unparseable time: {time}");
                return None;
            };
            let line = entry
                .get("line")
                .and_then(serde_json::Value::as_str)
                .unwrap_or("")
                .to_string();
            Some(LogEntry { time, line })
        })
        .collect();

    if entries.is_empty() {
        None
    } else {
        Some(entries)
    }
}

/// Parses a log timestamp, accepting the shapes clients actually send.
fn parse_time(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(time) = DateTime::parse_from_rfc3339(raw) {
        return Some(time.with_timezone(&Utc));
    }
    if let Ok(time) = DateTime::parse_from_rfc2822(raw) {
        return Some(time.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M:%S%.f %z", "%Y-%m-%d %H:%M:%S %z"] {
        if let Ok(time) = DateTime::parse_from_str(raw, format) {
            return Some(time.with_timezone(&Utc));
        }
    }
    // Zone-less timestamps are taken as UTC.
    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M:%S", "%Y/%m/%d %H:%M:%S"] {
        if let Ok(time) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(time.and_utc());
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn log_value(json: &str) -> Value {
        Value::Scalar(json.to_string())
    }

    #[test]
    fn decodes_json_array() {
        let value = log_value(
            r#"[{"time": "2014-03-01T12:30:00Z", "line": "started"},
                {"time": "2014-03-01T12:30:01Z", "line": "crashed"}]"#,
        );
        let log = parse_session_log(&value).unwrap();
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].line, "started");
        assert_eq!(log[1].line, "crashed");
    }

    #[test]
    fn entries_without_parseable_time_are_dropped() {
        let value = log_value(
            r#"[{"time": "not a time", "line": "bad"},
                {"time": "2014-03-01T12:30:00Z", "line": "good"}]"#,
        );
        let log = parse_session_log(&value).unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].line, "good");
    }

    #[test]
    fn undecodable_log_is_absent() {
        assert_eq!(parse_session_log(&log_value("not json")), None);
    }

    #[test]
    fn no_surviving_entries_means_absent() {
        let value = log_value(r#"[{"time": "garbage", "line": "x"}]"#);
        assert_eq!(parse_session_log(&value), None);
        assert_eq!(parse_session_log(&log_value("[]")), None);
    }

    #[test]
    fn non_scalar_value_is_absent() {
        let value = Value::List(Vec::new());
        assert_eq!(parse_session_log(&value), None);
    }

    #[test]
    fn missing_line_defaults_to_empty() {
        let value = log_value(r#"[{"time": "2014-03-01T12:30:00Z"}]"#);
        let log = parse_session_log(&value).unwrap();
        assert_eq!(log[0].line, "");
    }

    #[test]
    fn accepts_zone_less_timestamps() {
        let value = log_value(r#"[{"time": "2014-03-01 12:30:05", "line": "x"}]"#);
        let log = parse_session_log(&value).unwrap();
        assert_eq!(log[0].time.second(), 5);
    }

    #[test]
    fn accepts_offset_timestamps() {
        let value = log_value(r#"[{"time": "2014-03-01 12:30:05 +0100", "line": "x"}]"#);
        let log = parse_session_log(&value).unwrap();
        assert_eq!(log[0].time.hour(), 11);
    }
}
