//! Normalization of persisted free-form input.
//!
//! Free-form entries have been stored in several shapes over time. Everything
//! that reads one goes through [`normalize`], which accepts all of them and
//! always produces a [`FreeContent`]:
//!
//! | Input | Result |
//! |-------|--------|
//! | `{ "blocks": [...] , ... }` | decoded as is |
//! | `{ "text": "..." }` (pre-editor entries) | one paragraph block |
//! | `"..."` | one paragraph block |
//! | anything else, `null`, absent | no blocks |
//!
//! The two wrapping cases stamp `time` with the current clock. The
//! structured case keeps whatever `time`/`version` it had.

use crate::content::{FreeBlock, FreeContent};
use serde_json::Value;

/// One of the accepted input shapes, classified.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentInput {
    /// Already block-structured.
    Structured(FreeContent),
    /// A persisted `{ "text": ... }` object.
    Legacy(String),
    /// A bare string.
    Text(String),
    /// Null, missing, or unrecognizable.
    Absent,
}

impl From<Value> for ContentInput {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => {
                if map.get("blocks").is_some_and(Value::is_array) {
                    ContentInput::Structured(FreeContent::decode(map, 0))
                } else {
                    match map.get("text") {
                        Some(Value::String(text)) => ContentInput::Legacy(text.clone()),
                        _ => ContentInput::Absent,
                    }
                }
            }
            Value::String(text) => ContentInput::Text(text),
            _ => ContentInput::Absent,
        }
    }
}

impl From<Option<Value>> for ContentInput {
    fn from(value: Option<Value>) -> Self {
        value.map(Self::from).unwrap_or(ContentInput::Absent)
    }
}

impl From<FreeContent> for ContentInput {
    fn from(content: FreeContent) -> Self {
        ContentInput::Structured(content)
    }
}

impl From<&str> for ContentInput {
    fn from(text: &str) -> Self {
        ContentInput::Text(text.to_owned())
    }
}

impl From<String> for ContentInput {
    fn from(text: String) -> Self {
        ContentInput::Text(text)
    }
}

/// Convert any accepted input into a [`FreeContent`]. Never fails.
pub fn normalize(input: impl Into<ContentInput>) -> FreeContent {
    match input.into() {
        ContentInput::Structured(content) => content,
        ContentInput::Legacy(text) | ContentInput::Text(text) => FreeContent {
            time: Some(now_millis()),
            blocks: vec![FreeBlock::paragraph(text)],
            ..FreeContent::default()
        },
        ContentInput::Absent => FreeContent {
            time: Some(now_millis()),
            ..FreeContent::default()
        },
    }
}

fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
