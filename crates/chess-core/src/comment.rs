//! Rich-comment documents.
//!
//! Comments are stored as an opaque JSON document (a paragraph/text tree).
//! Only import and export need to look inside, through [`CommentCodec`].

use serde_json::{json, Value as JsonValue};

pub trait CommentCodec {
    /// Wraps plain text in a document. Blank text yields no comment.
    fn from_text(&self, text: &str) -> Option<JsonValue>;

    /// Flattens a document back to plain text.
    fn to_text(&self, doc: &JsonValue) -> String;
}

/// `doc > paragraph > text` documents.
#[derive(Debug, Default, Clone, Copy)]
pub struct DocComments;

impl CommentCodec for DocComments {
    fn from_text(&self, text: &str) -> Option<JsonValue> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        Some(json!({
            "type": "doc",
            "content": [{
                "type": "paragraph",
                "content": [{ "type": "text", "text": text }]
            }]
        }))
    }

    fn to_text(&self, doc: &JsonValue) -> String {
        flatten(doc).trim().to_string()
    }
}

fn flatten(node: &JsonValue) -> String {
    match node {
        JsonValue::String(s) => s.clone(),
        // bare arrays of inline nodes
        JsonValue::Array(items) => items.iter().map(flatten).collect(),
        JsonValue::Object(map) => {
            if let Some(JsonValue::String(text)) = map.get("text") {
                return text.clone();
            }
            let Some(JsonValue::Array(children)) = map.get("content") else {
                return String::new();
            };
            let sep = if map.get("type").and_then(JsonValue::as_str) == Some("doc") {
                " "
            } else {
                ""
            };
            children
                .iter()
                .map(flatten)
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(sep)
        }
        _ => String::new(),
    }
}
