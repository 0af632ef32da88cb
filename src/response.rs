//! Reply extraction from a generateContent response body.
//!
//! The reply lives at `candidates[0].content.parts[0].text`. Only the first
//! candidate is read; any further candidates are ignored.

use crate::types::Reply;
use crate::{Error, Result};
use serde_json::Value;

#[derive(Debug, Clone, Copy)]
enum Segment {
    Key(&'static str),
    Index(usize),
}

const REPLY_TEXT_PATH: &[Segment] = &[
    Segment::Key("candidates"),
    Segment::Index(0),
    Segment::Key("content"),
    Segment::Key("parts"),
    Segment::Index(0),
    Segment::Key("text"),
];

/// Parse a raw response body and pull out the reply.
pub fn extract_reply(body: &str) -> Result<Reply> {
    let root: Value = serde_json::from_str(body)?;
    extract_reply_from_value(&root)
}

/// Pull the reply out of an already-parsed response.
pub fn extract_reply_from_value(root: &Value) -> Result<Reply> {
    let text = walk(root, REPLY_TEXT_PATH).map_err(|path| {
        // A blocked prompt comes back without any candidate.
        let blocked = if path == "candidates" || path == "candidates[0]" {
            block_reason(root)
        } else {
            None
        };
        let details = match blocked {
            Some(reason) => format!("missing, prompt blocked: {}", reason),
            None => "missing".to_string(),
        };
        Error::unexpected_shape(path, Some(details))
    })?;

    let text = text.as_str().ok_or_else(|| {
        Error::unexpected_shape(
            render(REPLY_TEXT_PATH),
            Some(format!("expected a string, found {}", type_name(text))),
        )
    })?;

    let finish_reason = root
        .get("candidates")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("finishReason"))
        .and_then(Value::as_str)
        .map(str::to_string);

    Ok(Reply {
        text: text.to_string(),
        finish_reason,
    })
}

/// Pull the human-readable message out of a provider error body.
///
/// Provider errors look like `{"error": {"code": 400, "message": "...", "status": "..."}}`.
pub fn provider_error_message(body: &str) -> Option<String> {
    let json: Value = serde_json::from_str(body).ok()?;
    json.get("error")
        .and_then(|e| e.get("message"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Follow `path` from `root`. On failure returns the rendered path up to and
/// including the first segment that was missing.
fn walk<'a>(root: &'a Value, path: &[Segment]) -> std::result::Result<&'a Value, String> {
    let mut current = root;
    for (i, segment) in path.iter().enumerate() {
        let next = match (segment, current) {
            (Segment::Key(key), Value::Object(map)) => map.get(*key),
            (Segment::Index(idx), Value::Array(items)) => items.get(*idx),
            _ => None,
        };
        current = next.ok_or_else(|| render(&path[..=i]))?;
    }
    Ok(current)
}

fn render(path: &[Segment]) -> String {
    let mut out = String::new();
    for segment in path {
        match segment {
            Segment::Key(key) => {
                if !out.is_empty() {
                    out.push('.');
                }
                out.push_str(key);
            }
            Segment::Index(idx) => {
                out.push('[');
                out.push_str(&idx.to_string());
                out.push(']');
            }
        }
    }
    out
}

fn block_reason(root: &Value) -> Option<&str> {
    root.get("promptFeedback")
        .and_then(|f| f.get("blockReason"))
        .and_then(Value::as_str)
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
