//! Reasoning extraction from retained provider payloads
//!
//! Providers surface chain-of-thought in wildly different places: a
//! `reasoning_content` string, a `reasoning` object, Claude-style
//! `thinking` content blocks, or nested one level down in a retained
//! `raw_response`. This module walks all the known shapes and returns the
//! first non-empty text it finds.

use serde_json::{Map, Value};

/// Keys that may hold reasoning directly on a message or payload
const REASONING_KEYS: [&str; 3] = ["reasoning_content", "reasoning", "thinking"];

/// Keys worth descending into when flattening a reasoning object
const FLATTEN_KEYS: [&str; 9] = [
    "thinking",
    "text",
    "content",
    "reasoning",
    "reasoning_content",
    "output_text",
    "message",
    "analysis",
    "details",
];

/// Extract reasoning text from a retained provider payload
///
/// Candidates are tried in a fixed order and the first that flattens to
/// non-empty text wins: keys on the nested `message`, thinking blocks in
/// `message.content`, the same keys and blocks at the top level, then a
/// recursive look inside `raw_response`. Non-object payloads yield `None`.
pub fn extract_reasoning(raw: &Value) -> Option<String> {
    extract_from_object(raw.as_object()?)
}

fn extract_from_object(obj: &Map<String, Value>) -> Option<String> {
    if let Some(message) = obj.get("message").and_then(Value::as_object) {
        for key in REASONING_KEYS {
            if let Some(text) = message.get(key).and_then(normalize) {
                return Some(text);
            }
        }
        if let Some(items) = message.get("content").and_then(Value::as_array) {
            if let Some(text) = normalize_thinking_blocks(items) {
                return Some(text);
            }
        }
    }

    for key in REASONING_KEYS {
        if let Some(text) = obj.get(key).and_then(normalize) {
            return Some(text);
        }
    }
    if let Some(items) = obj.get("content").and_then(Value::as_array) {
        if let Some(text) = normalize_thinking_blocks(items) {
            return Some(text);
        }
    }

    obj.get("raw_response")
        .and_then(Value::as_object)
        .and_then(extract_from_object)
}

/// Flatten `thinking` / `reasoning` typed blocks out of a content array
fn normalize_thinking_blocks(items: &[Value]) -> Option<String> {
    let blocks: Vec<&Value> = items
        .iter()
        .filter(|item| {
            matches!(
                item.get("type").and_then(Value::as_str),
                Some("thinking") | Some("reasoning")
            )
        })
        .collect();
    if blocks.is_empty() {
        return None;
    }
    let mut pieces = Vec::new();
    for block in blocks {
        walk(block, &mut pieces);
    }
    join(pieces)
}

/// Flatten one candidate value into joined, trimmed text
fn normalize(value: &Value) -> Option<String> {
    let mut pieces = Vec::new();
    walk(value, &mut pieces);
    join(pieces)
}

fn join(pieces: Vec<String>) -> Option<String> {
    let text = pieces
        .iter()
        .filter(|p| !p.is_empty())
        .cloned()
        .collect::<Vec<_>>()
        .join("\n");
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn walk(node: &Value, pieces: &mut Vec<String>) {
    match node {
        Value::Null => {}
        Value::String(s) => {
            let trimmed = s.trim();
            if !trimmed.is_empty() {
                pieces.push(trimmed.to_string());
            }
        }
        Value::Number(n) => pieces.push(n.to_string()),
        Value::Bool(b) => pieces.push(b.to_string()),
        Value::Array(items) => {
            for item in items {
                walk(item, pieces);
            }
        }
        Value::Object(map) => {
            let mut handled = false;
            for key in FLATTEN_KEYS {
                if let Some(v) = map.get(key) {
                    handled = true;
                    walk(v, pieces);
                }
            }
            if !handled {
                if let Some(v) = map.get("value") {
                    handled = true;
                    walk(v, pieces);
                }
            }
            if !handled {
                // Last resort: keep the object as serialized JSON rather
                // than dropping it.
                if let Ok(serialized) = serde_json::to_string(map) {
                    if !serialized.is_empty() {
                        pieces.push(serialized);
                    }
                }
            }
        }
    }
}
