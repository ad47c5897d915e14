//! Crash-notice document parser.
//!
//! Walks the XML document, extracts the top-level sections through the
//! generic element converter, and enforces the required-field and
//! version-support invariants. Parsing is a pure function over the input;
//! checks run version → credentials → notifier → error, and the first
//! failing check determines the error reported.

use crate::backtrace::frames_from_value;
use crate::error::{Error, Result};
use crate::notice::{ErrorReport, Notice, Request, Session};
use crate::session::parse_session_log;
use crate::value::Value;
use std::collections::BTreeMap;

/// Protocol versions this parser accepts.
pub const SUPPORTED_VERSIONS: &[&str] = &["2.4"];

/// Parses a crash-notice XML document into a [`Notice`].
///
/// # Errors
///
/// Returns [`Error::InvalidNotice`] when the document is malformed, the
/// `notice` root or its version attribute is missing, the api-key blob is
/// missing or undecodable, the notifier section is missing, or the error
/// section is missing or lacks a message. Returns
/// [`Error::UnsupportedVersion`] when the declared version is not in
/// [`SUPPORTED_VERSIONS`].
pub fn parse(xml: &str) -> Result<Notice> {
    let doc = roxmltree::Document::parse(xml)
        .map_err(|e| Error::invalid(format!("malformed document: {e}")))?;

    let notice = doc
        .descendants()
        .find(|n| n.has_tag_name("notice"))
        .ok_or_else(|| Error::invalid("no notice element"))?;

    let version = parse_version(notice)?;
    let params = parse_params(notice)?;
    let notifier = parse_notifier(notice)?;
    let error = parse_error(notice)?;
    let request = parse_request(notice);
    let env = child(notice, "server-environment")
        .map(Value::from_node)
        .filter(|v| !v.is_blank());

    Ok(Notice {
        version,
        params,
        notifier,
        error,
        request,
        env,
    })
}

fn parse_version(notice: roxmltree::Node<'_, '_>) -> Result<String> {
    let version = notice
        .attribute("version")
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| Error::invalid("no version"))?;

    if !SUPPORTED_VERSIONS.contains(&version) {
        return Err(Error::UnsupportedVersion(version.to_string()));
    }

    Ok(version.to_string())
}

/// Decodes the embedded api-key blob: a JSON object carried as text inside
/// one child element. An undecodable blob is treated the same as a missing
/// one.
fn parse_params(notice: roxmltree::Node<'_, '_>) -> Result<BTreeMap<String, String>> {
    let raw = child(notice, "api-key")
        .map(|n| {
            n.children()
                .filter(|c| c.is_text())
                .filter_map(|c| c.text())
                .collect::<String>()
        })
        .ok_or_else(|| Error::invalid("no or invalid api-key"))?;

    let decoded: serde_json::Map<String, serde_json::Value> =
        serde_json::from_str(&raw).map_err(|_| Error::invalid("no or invalid api-key"))?;

    let mut params = BTreeMap::new();
    for (key, value) in decoded {
        match value {
            serde_json::Value::String(s) => {
                params.insert(key, s);
            }
            serde_json::Value::Bool(_) | serde_json::Value::Number(_) => {
                params.insert(key, value.to_string());
            }
            _ => {
                tracing::debug!("dropping non-scalar api-key param: {key}");
            }
        }
    }

    if params.is_empty() {
        return Err(Error::invalid("no or invalid api-key"));
    }

    Ok(params)
}

fn parse_notifier(notice: roxmltree::Node<'_, '_>) -> Result<Value> {
    child(notice, "notifier")
        .map(Value::from_node)
        .filter(|v| !v.is_blank())
        .ok_or_else(|| Error::invalid("no notifier"))
}

fn parse_error(notice: roxmltree::Node<'_, '_>) -> Result<ErrorReport> {
    let error = child(notice, "error")
        .map(Value::from_node)
        .filter(|v| !v.is_blank())
        .ok_or_else(|| Error::invalid("no error"))?;

    let message = error
        .get("message")
        .and_then(Value::as_str)
        .map(str::to_string)
        .filter(|m| !m.trim().is_empty())
        .ok_or_else(|| Error::invalid("no message"))?;

    let class_name = error
        .get("class")
        .and_then(Value::as_str)
        .map(str::to_string)
        .filter(|c| !c.trim().is_empty());

    let backtrace = frames_from_value(error.get("backtrace").and_then(|b| b.get("line")));

    Ok(ErrorReport {
        class_name,
        message,
        backtrace,
    })
}

fn parse_request(notice: roxmltree::Node<'_, '_>) -> Option<Request> {
    let request = Value::from_node(child(notice, "request")?);
    if request.is_blank() {
        return None;
    }

    let Some(mut attributes) = request.into_object() else {
        tracing::debug!("request section is not an object, dropping");
        return None;
    };

    let session = attributes
        .remove("session")
        .filter(|s| !s.is_blank())
        .and_then(parse_session);

    Some(Request {
        session,
        attributes,
    })
}

fn parse_session(value: Value) -> Option<Session> {
    let mut vars = value.into_object()?;
    let log = vars.remove("log").and_then(|log| parse_session_log(&log));
    Some(Session { log, vars })
}

fn child<'a, 'i>(
    node: roxmltree::Node<'a, 'i>,
    name: &str,
) -> Option<roxmltree::Node<'a, 'i>> {
    node.children().find(|c| c.has_tag_name(name))
}
