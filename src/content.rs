//! The free-form content model.
//!
//! A free-form retrospective is an ordered list of typed blocks produced by an
//! external block editor. This module defines the typed representation and the
//! lenient decoder that turns persisted JSON into it.
//!
//! ## Decoding Rules
//!
//! Decoding never fails. Every JSON shape maps onto some value of the model:
//!
//! - A block whose `type` is one of the seven known tags decodes into the
//!   matching [`Block`] variant. Missing or non-object `data` gives the empty
//!   payload of that variant.
//! - A block with a missing or unrecognized `type` becomes [`Block::Unknown`].
//!   Renderers and text extraction skip it.
//! - An array entry that is not an object at all becomes [`Block::Opaque`].
//! - A payload field decodes into its typed form only when it is fully
//!   well-formed (`items` must be an array of strings, `content` an array of
//!   string arrays, and so on). A malformed field stays in the payload's
//!   `extra` map verbatim and behaves as absent, except that list items,
//!   checklist items and table cells are still read element by element for
//!   display.
//!
//! ## Round-Tripping
//!
//! Fields the model doesn't understand (editor extensions such as quote
//! `caption` or table `withHeadings`) are collected into `extra` maps at every
//! level and written back on serialization. A decoded document serializes
//! back to the same fields and values it was read from, though not always in
//! the same key order: known fields are written first, then the collected
//! ones in the order they were read (`serde_json`'s `preserve_order`).
//!
//! ```text
//! { "time": 1718000000000,
//!   "blocks": [
//!     { "id": "a1", "type": "header",  "data": { "text": "Today", "level": 2 } },
//!     { "id": "b2", "type": "toggle",  "data": { "label": "More",
//!                                                "content": { "blocks": [ ... ] } } } ] }
//! ```

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::fmt;

/// Toggle content nested deeper than this is kept verbatim but treated as
/// empty.
pub const MAX_NESTING_DEPTH: usize = 64;

/// The closed set of block tags this model understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BlockKind {
    Paragraph,
    Header,
    List,
    Checklist,
    Table,
    Quote,
    Toggle,
}

impl BlockKind {
    pub const ALL: [BlockKind; 7] = [
        BlockKind::Paragraph,
        BlockKind::Header,
        BlockKind::List,
        BlockKind::Checklist,
        BlockKind::Table,
        BlockKind::Quote,
        BlockKind::Toggle,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BlockKind::Paragraph => "paragraph",
            BlockKind::Header => "header",
            BlockKind::List => "list",
            BlockKind::Checklist => "checklist",
            BlockKind::Table => "table",
            BlockKind::Quote => "quote",
            BlockKind::Toggle => "toggle",
        }
    }

    /// Look up a block tag. Tags are case-sensitive, as the editor writes them.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "paragraph" => Some(BlockKind::Paragraph),
            "header" => Some(BlockKind::Header),
            "list" => Some(BlockKind::List),
            "checklist" => Some(BlockKind::Checklist),
            "table" => Some(BlockKind::Table),
            "quote" => Some(BlockKind::Quote),
            "toggle" => Some(BlockKind::Toggle),
            _ => None,
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Document
// ============================================================================

/// The root free-form document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FreeContent {
    /// Creation timestamp in epoch milliseconds.
    pub time: Option<i64>,
    /// Opaque editor format version.
    pub version: Option<String>,
    /// Blocks in display order.
    pub blocks: Vec<FreeBlock>,
    /// Top-level fields not covered above, kept for round-tripping.
    pub extra: Map<String, Value>,
}

impl FreeContent {
    /// A document holding `blocks`, with no timestamp or version.
    pub fn new(blocks: Vec<FreeBlock>) -> Self {
        Self {
            blocks,
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Decode an already-structured document (an object with a `blocks`
    /// array).
    ///
    /// Other shapes are legacy inputs; route them through
    /// [`crate::normalize::normalize`] instead. Called on them directly, this
    /// yields an empty document carrying the input's fields in `extra`.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => Self::decode(map, 0),
            _ => Self::default(),
        }
    }

    pub(crate) fn decode(mut map: Map<String, Value>, depth: usize) -> Self {
        let time = take_field(&mut map, "time", Value::as_i64);
        let version = take_field(&mut map, "version", as_string);
        let blocks = match take_field(&mut map, "blocks", |v| v.as_array().cloned()) {
            Some(items) => items
                .into_iter()
                .map(|item| FreeBlock::decode(item, depth))
                .collect(),
            None => Vec::new(),
        };
        Self {
            time,
            version,
            blocks,
            extra: map,
        }
    }

    /// Encode back to the persisted JSON shape.
    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        if let Some(time) = self.time {
            map.insert("time".into(), Value::from(time));
        }
        if let Some(version) = &self.version {
            map.insert("version".into(), Value::from(version.as_str()));
        }
        map.insert(
            "blocks".into(),
            Value::Array(self.blocks.iter().map(FreeBlock::to_value).collect()),
        );
        append_extra(&mut map, &self.extra);
        Value::Object(map)
    }
}

impl Serialize for FreeContent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

/// Deserializing normalizes: any JSON value yields a document.
impl<'de> Deserialize<'de> for FreeContent {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(crate::normalize::normalize(value))
    }
}

// ============================================================================
// Blocks
// ============================================================================

/// One unit of content.
#[derive(Debug, Clone, PartialEq)]
pub struct FreeBlock {
    /// Editor-assigned identifier. Never interpreted.
    pub id: Option<String>,
    pub block: Block,
    /// Block-level fields besides `id`, `type` and `data` (e.g. editor tunes).
    pub extra: Map<String, Value>,
}

/// The typed payload of a block.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Paragraph(TextData),
    Header(HeaderData),
    List(ListData),
    Checklist(ChecklistData),
    Table(TableData),
    Quote(TextData),
    Toggle(ToggleData),
    /// An object whose `type` is missing or unrecognized. Both fields are
    /// kept verbatim.
    Unknown {
        kind: Option<Value>,
        data: Option<Value>,
    },
    /// A `blocks` entry that isn't an object.
    Opaque(Value),
}

impl From<Block> for FreeBlock {
    fn from(block: Block) -> Self {
        Self {
            id: None,
            block,
            extra: Map::new(),
        }
    }
}

impl FreeBlock {
    pub fn paragraph(text: impl Into<String>) -> Self {
        Block::Paragraph(TextData::new(text)).into()
    }

    /// The block's tag when it is one of the known kinds.
    pub fn kind(&self) -> Option<BlockKind> {
        match &self.block {
            Block::Paragraph(_) => Some(BlockKind::Paragraph),
            Block::Header(_) => Some(BlockKind::Header),
            Block::List(_) => Some(BlockKind::List),
            Block::Checklist(_) => Some(BlockKind::Checklist),
            Block::Table(_) => Some(BlockKind::Table),
            Block::Quote(_) => Some(BlockKind::Quote),
            Block::Toggle(_) => Some(BlockKind::Toggle),
            Block::Unknown { .. } | Block::Opaque(_) => None,
        }
    }

    /// The raw `type` tag, whether or not it is known.
    pub fn type_name(&self) -> Option<&str> {
        match &self.block {
            Block::Unknown { kind, .. } => kind.as_ref().and_then(Value::as_str),
            Block::Opaque(_) => None,
            _ => self.kind().map(|k| k.as_str()),
        }
    }

    pub fn from_value(value: Value) -> Self {
        Self::decode(value, 0)
    }

    pub(crate) fn decode(value: Value, depth: usize) -> Self {
        let mut map = match value {
            Value::Object(map) => map,
            other => return Block::Opaque(other).into(),
        };
        let id = take_field(&mut map, "id", as_string);
        let Some(kind) = map
            .get("type")
            .and_then(Value::as_str)
            .and_then(BlockKind::from_tag)
        else {
            let kind = map.shift_remove("type");
            let data = map.shift_remove("data");
            tracing::debug!(kind = ?kind, "unrecognized block type");
            return Self {
                id,
                block: Block::Unknown { kind, data },
                extra: map,
            };
        };

        let data = match map.shift_remove("data") {
            None | Some(Value::Null) => Map::new(),
            Some(Value::Object(data)) => data,
            // Malformed data means an empty payload. The raw value is kept
            // and written back while the payload stays empty.
            Some(other) => {
                tracing::debug!(kind = kind.as_str(), "block data is not an object");
                map.insert("data".into(), other);
                Map::new()
            }
        };
        map.shift_remove("type");

        let block = match kind {
            BlockKind::Paragraph => Block::Paragraph(TextData::decode(data)),
            BlockKind::Header => Block::Header(HeaderData::decode(data)),
            BlockKind::List => Block::List(ListData::decode(data)),
            BlockKind::Checklist => Block::Checklist(ChecklistData::decode(data)),
            BlockKind::Table => Block::Table(TableData::decode(data)),
            BlockKind::Quote => Block::Quote(TextData::decode(data)),
            BlockKind::Toggle => Block::Toggle(ToggleData::decode(data, depth)),
        };
        Self {
            id,
            block,
            extra: map,
        }
    }

    pub fn to_value(&self) -> Value {
        let (kind, data) = match &self.block {
            Block::Opaque(raw) => return raw.clone(),
            Block::Unknown { kind, data } => (kind.clone(), data.clone()),
            Block::Paragraph(d) | Block::Quote(d) => (None, Some(d.to_value())),
            Block::Header(d) => (None, Some(d.to_value())),
            Block::List(d) => (None, Some(d.to_value())),
            Block::Checklist(d) => (None, Some(d.to_value())),
            Block::Table(d) => (None, Some(d.to_value())),
            Block::Toggle(d) => (None, Some(d.to_value())),
        };
        let kind = kind.or_else(|| self.kind().map(|k| Value::from(k.as_str())));

        // An untouched payload decoded from malformed data defers to the
        // raw value kept in `extra`.
        let data = data.filter(|data| {
            !(self.extra.contains_key("data") && data.as_object().is_some_and(Map::is_empty))
        });

        let mut map = Map::new();
        if let Some(id) = &self.id {
            map.insert("id".into(), Value::from(id.as_str()));
        }
        if let Some(kind) = kind {
            map.insert("type".into(), kind);
        }
        if let Some(data) = data {
            map.insert("data".into(), data);
        }
        append_extra(&mut map, &self.extra);
        Value::Object(map)
    }
}

impl Serialize for FreeBlock {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for FreeBlock {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Self::from_value(Value::deserialize(deserializer)?))
    }
}

// ============================================================================
// Payloads
// ============================================================================

/// Payload of `paragraph` and `quote` blocks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextData {
    /// HTML fragment.
    pub text: Option<String>,
    pub extra: Map<String, Value>,
}

impl TextData {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            extra: Map::new(),
        }
    }

    fn decode(mut map: Map<String, Value>) -> Self {
        Self {
            text: take_field(&mut map, "text", as_string),
            extra: map,
        }
    }

    fn to_value(&self) -> Value {
        let mut map = Map::new();
        insert_opt(&mut map, "text", self.text.as_deref().map(Value::from));
        append_extra(&mut map, &self.extra);
        Value::Object(map)
    }
}

/// Heading level used when none (or `0`) is given.
pub const DEFAULT_HEADER_LEVEL: u8 = 2;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeaderData {
    pub text: Option<String>,
    /// Raw level as written; see [`HeaderData::clamped_level`].
    pub level: Option<i64>,
    pub extra: Map<String, Value>,
}

impl HeaderData {
    /// The heading level to render.
    ///
    /// Missing or zero means [`DEFAULT_HEADER_LEVEL`]; anything else is
    /// coerced into `1..=6`.
    pub fn clamped_level(&self) -> u8 {
        // Whole floats (`9.0`) and numeric strings are accepted too. They
        // stay in `extra` so they are written back as they were read.
        let level = self.level.or_else(|| match self.extra.get("level")? {
            Value::Number(n) => n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        });
        match level {
            None | Some(0) => DEFAULT_HEADER_LEVEL,
            Some(level) => level.clamp(1, 6) as u8,
        }
    }

    fn decode(mut map: Map<String, Value>) -> Self {
        Self {
            text: take_field(&mut map, "text", as_string),
            level: take_field(&mut map, "level", Value::as_i64),
            extra: map,
        }
    }

    fn to_value(&self) -> Value {
        let mut map = Map::new();
        insert_opt(&mut map, "text", self.text.as_deref().map(Value::from));
        insert_opt(&mut map, "level", self.level.map(Value::from));
        append_extra(&mut map, &self.extra);
        Value::Object(map)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ListStyle {
    Ordered,
    #[default]
    Unordered,
}

impl ListStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListStyle::Ordered => "ordered",
            ListStyle::Unordered => "unordered",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListData {
    pub style: Option<ListStyle>,
    /// HTML fragments, one per item.
    pub items: Option<Vec<String>>,
    pub extra: Map<String, Value>,
}

impl ListData {
    pub fn style(&self) -> ListStyle {
        self.style.unwrap_or_default()
    }

    /// Items to show. When `items` was malformed, whatever is readable in
    /// the raw value, one entry per element.
    pub fn items(&self) -> Cow<'_, [String]> {
        match &self.items {
            Some(items) => Cow::Borrowed(items),
            None => Cow::Owned(loose_strings(self.extra.get("items"))),
        }
    }

    fn decode(mut map: Map<String, Value>) -> Self {
        Self {
            style: take_field(&mut map, "style", |v| match v.as_str()? {
                "ordered" => Some(ListStyle::Ordered),
                "unordered" => Some(ListStyle::Unordered),
                _ => None,
            }),
            items: take_field(&mut map, "items", string_array),
            extra: map,
        }
    }

    fn to_value(&self) -> Value {
        let mut map = Map::new();
        insert_opt(&mut map, "style", self.style.map(|s| Value::from(s.as_str())));
        insert_opt(
            &mut map,
            "items",
            self.items.as_ref().map(|items| Value::from(items.clone())),
        );
        append_extra(&mut map, &self.extra);
        Value::Object(map)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChecklistItem {
    pub text: Option<String>,
    pub checked: Option<bool>,
    pub extra: Map<String, Value>,
}

impl ChecklistItem {
    pub fn new(text: impl Into<String>, checked: bool) -> Self {
        Self {
            text: Some(text.into()),
            checked: Some(checked),
            extra: Map::new(),
        }
    }

    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or_default()
    }

    pub fn is_checked(&self) -> bool {
        self.checked.unwrap_or(false)
    }

    fn decode(mut map: Map<String, Value>) -> Self {
        Self {
            text: take_field(&mut map, "text", as_string),
            checked: take_field(&mut map, "checked", Value::as_bool),
            extra: map,
        }
    }

    fn to_value(&self) -> Value {
        let mut map = Map::new();
        insert_opt(&mut map, "text", self.text.as_deref().map(Value::from));
        insert_opt(&mut map, "checked", self.checked.map(Value::from));
        append_extra(&mut map, &self.extra);
        Value::Object(map)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChecklistData {
    pub items: Option<Vec<ChecklistItem>>,
    pub extra: Map<String, Value>,
}

impl ChecklistData {
    /// Items to show. Non-object entries of a malformed `items` array show
    /// as empty, unchecked items.
    pub fn items(&self) -> Cow<'_, [ChecklistItem]> {
        match &self.items {
            Some(items) => Cow::Borrowed(items),
            None => Cow::Owned(
                self.extra
                    .get("items")
                    .and_then(Value::as_array)
                    .map(|items| {
                        items
                            .iter()
                            .map(|item| match item {
                                Value::Object(map) => ChecklistItem::decode(map.clone()),
                                _ => ChecklistItem::default(),
                            })
                            .collect()
                    })
                    .unwrap_or_default(),
            ),
        }
    }

    fn decode(mut map: Map<String, Value>) -> Self {
        let items = take_field(&mut map, "items", |v| {
            v.as_array()?
                .iter()
                .map(|item| item.as_object().cloned().map(ChecklistItem::decode))
                .collect::<Option<Vec<_>>>()
        });
        Self { items, extra: map }
    }

    fn to_value(&self) -> Value {
        let mut map = Map::new();
        insert_opt(
            &mut map,
            "items",
            self.items
                .as_ref()
                .map(|items| Value::Array(items.iter().map(ChecklistItem::to_value).collect())),
        );
        append_extra(&mut map, &self.extra);
        Value::Object(map)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableData {
    /// Rows of HTML cells. Rows may differ in length.
    pub content: Option<Vec<Vec<String>>>,
    pub extra: Map<String, Value>,
}

impl TableData {
    /// Rows to show. A malformed `content` is read cell by cell, so one bad
    /// cell doesn't hide the rest of the table.
    pub fn rows(&self) -> Cow<'_, [Vec<String>]> {
        match &self.content {
            Some(rows) => Cow::Borrowed(rows),
            None => Cow::Owned(
                self.extra
                    .get("content")
                    .and_then(Value::as_array)
                    .map(|rows| rows.iter().map(|row| loose_strings(Some(row))).collect())
                    .unwrap_or_default(),
            ),
        }
    }

    fn decode(mut map: Map<String, Value>) -> Self {
        let content = take_field(&mut map, "content", |v| {
            v.as_array()?
                .iter()
                .map(string_array)
                .collect::<Option<Vec<_>>>()
        });
        Self { content, extra: map }
    }

    fn to_value(&self) -> Value {
        let mut map = Map::new();
        insert_opt(
            &mut map,
            "content",
            self.content.as_ref().map(|rows| Value::from(rows.clone())),
        );
        append_extra(&mut map, &self.extra);
        Value::Object(map)
    }
}

/// What a toggle's `content` field held.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ToggleContent {
    #[default]
    Absent,
    /// A structured nested document.
    Document(Box<FreeContent>),
    /// Any other shape (legacy `{text}`, a bare string, junk), normalized on
    /// use.
    Other(Value),
    /// A structured document nested past [`MAX_NESTING_DEPTH`].
    Truncated(Value),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToggleData {
    pub label: Option<String>,
    pub title: Option<String>,
    pub content: ToggleContent,
    pub extra: Map<String, Value>,
}

impl ToggleData {
    pub fn new(label: impl Into<String>, blocks: Vec<FreeBlock>) -> Self {
        Self {
            label: Some(label.into()),
            content: ToggleContent::Document(Box::new(FreeContent::new(blocks))),
            ..Self::default()
        }
    }

    /// `label`, falling back to `title`. An empty label still wins.
    pub fn heading(&self) -> Option<&str> {
        self.label.as_deref().or(self.title.as_deref())
    }

    /// The nested document, normalized.
    pub fn nested(&self) -> Cow<'_, FreeContent> {
        match &self.content {
            ToggleContent::Document(doc) => Cow::Borrowed(doc.as_ref()),
            ToggleContent::Other(raw) => Cow::Owned(crate::normalize::normalize(raw.clone())),
            ToggleContent::Absent | ToggleContent::Truncated(_) => {
                Cow::Owned(FreeContent::default())
            }
        }
    }

    fn decode(mut map: Map<String, Value>, depth: usize) -> Self {
        let label = take_field(&mut map, "label", as_string);
        let title = take_field(&mut map, "title", as_string);
        let content = match map.shift_remove("content") {
            None => ToggleContent::Absent,
            Some(Value::Object(inner)) if inner.get("blocks").is_some_and(Value::is_array) => {
                if depth + 1 > MAX_NESTING_DEPTH {
                    tracing::warn!(
                        max = MAX_NESTING_DEPTH,
                        "toggle nesting too deep, treating content as empty"
                    );
                    ToggleContent::Truncated(Value::Object(inner))
                } else {
                    ToggleContent::Document(Box::new(FreeContent::decode(inner, depth + 1)))
                }
            }
            Some(other) => ToggleContent::Other(other),
        };
        Self {
            label,
            title,
            content,
            extra: map,
        }
    }

    fn to_value(&self) -> Value {
        let mut map = Map::new();
        insert_opt(&mut map, "label", self.label.as_deref().map(Value::from));
        insert_opt(&mut map, "title", self.title.as_deref().map(Value::from));
        let content = match &self.content {
            ToggleContent::Absent => None,
            ToggleContent::Document(doc) => Some(doc.to_value()),
            ToggleContent::Other(raw) | ToggleContent::Truncated(raw) => Some(raw.clone()),
        };
        insert_opt(&mut map, "content", content);
        append_extra(&mut map, &self.extra);
        Value::Object(map)
    }
}

// ============================================================================
// Field helpers
// ============================================================================

/// Remove `key` from `map` only if `convert` accepts its value.
///
/// Rejected values stay in the map so they survive re-serialization.
fn take_field<T>(
    map: &mut Map<String, Value>,
    key: &str,
    convert: impl FnOnce(&Value) -> Option<T>,
) -> Option<T> {
    let converted = convert(map.get(key)?)?;
    map.shift_remove(key);
    Some(converted)
}

fn as_string(value: &Value) -> Option<String> {
    value.as_str().map(str::to_owned)
}

fn string_array(value: &Value) -> Option<Vec<String>> {
    value.as_array()?.iter().map(as_string).collect()
}

/// Read an array element by element: strings as they are, numbers and
/// booleans as their JSON text, anything else as an empty string.
fn loose_strings(value: Option<&Value>) -> Vec<String> {
    let Some(items) = value.and_then(Value::as_array) else {
        return Vec::new();
    };
    items
        .iter()
        .map(|item| match item {
            Value::String(s) => s.clone(),
            Value::Number(_) | Value::Bool(_) => item.to_string(),
            _ => String::new(),
        })
        .collect()
}

fn insert_opt(map: &mut Map<String, Value>, key: &str, value: Option<Value>) {
    if let Some(value) = value {
        map.insert(key.to_owned(), value);
    }
}

/// Append extension fields without overwriting anything already written.
fn append_extra(map: &mut Map<String, Value>, extra: &Map<String, Value>) {
    for (key, value) in extra {
        map.entry(key.as_str()).or_insert_with(|| value.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode(value: Value) -> FreeContent {
        FreeContent::from_value(value)
    }

    #[test]
    fn kind_tags_roundtrip() {
        for kind in BlockKind::ALL {
            assert_eq!(BlockKind::from_tag(kind.as_str()), Some(kind));
        }
        assert_eq!(BlockKind::from_tag("Paragraph"), None);
        assert_eq!(BlockKind::from_tag("image"), None);
    }

    #[test]
    fn decodes_every_known_variant() {
        let doc = decode(json!({
            "blocks": [
                {"type": "paragraph", "data": {"text": "p"}},
                {"type": "header", "data": {"text": "h", "level": 3}},
                {"type": "list", "data": {"style": "ordered", "items": ["a", "b"]}},
                {"type": "checklist", "data": {"items": [{"text": "x", "checked": true}]}},
                {"type": "table", "data": {"content": [["a", "b"], ["c"]]}},
                {"type": "quote", "data": {"text": "q"}},
                {"type": "toggle", "data": {"label": "More", "content": {"blocks": []}}}
            ]
        }));
        let kinds: Vec<_> = doc.blocks.iter().filter_map(FreeBlock::kind).collect();
        assert_eq!(kinds, BlockKind::ALL.to_vec());

        let Block::List(list) = &doc.blocks[2].block else {
            panic!("expected list");
        };
        assert_eq!(list.style(), ListStyle::Ordered);
        assert_eq!(&*list.items(), ["a", "b"]);

        let Block::Table(table) = &doc.blocks[4].block else {
            panic!("expected table");
        };
        assert_eq!(table.rows().len(), 2);
        assert_eq!(table.rows()[1], vec!["c".to_string()]);
    }

    #[test]
    fn unknown_type_is_kept_verbatim() {
        let raw = json!({"id": "z", "type": "image", "data": {"url": "x.png"}});
        let block = FreeBlock::from_value(raw.clone());
        assert_eq!(block.kind(), None);
        assert_eq!(block.type_name(), Some("image"));
        assert_eq!(block.id.as_deref(), Some("z"));
        assert_eq!(block.to_value(), raw);
    }

    #[test]
    fn missing_type_is_unknown() {
        let block = FreeBlock::from_value(json!({"data": {"text": "orphan"}}));
        assert!(matches!(block.block, Block::Unknown { kind: None, .. }));
        assert_eq!(block.type_name(), None);
    }

    #[test]
    fn non_object_entries_are_opaque() {
        let doc = decode(json!({"blocks": [null, 3, "text"]}));
        assert_eq!(doc.blocks.len(), 3);
        assert!(doc.blocks.iter().all(|b| matches!(b.block, Block::Opaque(_))));
        assert_eq!(doc.to_value(), json!({"blocks": [null, 3, "text"]}));
    }

    #[test]
    fn missing_data_decodes_as_empty_payload() {
        let block = FreeBlock::from_value(json!({"type": "paragraph"}));
        assert_eq!(block.block, Block::Paragraph(TextData::default()));
    }

    #[test]
    fn non_object_data_is_an_empty_payload() {
        let raw = json!({"id": "p", "type": "paragraph", "data": "oops"});
        let block = FreeBlock::from_value(raw.clone());
        assert_eq!(block.kind(), Some(BlockKind::Paragraph));
        assert_eq!(block.block, Block::Paragraph(TextData::default()));
        assert_eq!(block.to_value(), raw);

        let raw = json!({"type": "toggle", "data": []});
        let block = FreeBlock::from_value(raw.clone());
        assert_eq!(block.block, Block::Toggle(ToggleData::default()));
        assert_eq!(block.to_value(), raw);
    }

    #[test]
    fn edited_payload_replaces_malformed_data() {
        let mut block = FreeBlock::from_value(json!({"type": "quote", "data": 7}));
        block.block = Block::Quote(TextData::new("fixed"));
        assert_eq!(
            block.to_value(),
            json!({"type": "quote", "data": {"text": "fixed"}})
        );
    }

    #[test]
    fn known_fields_first_then_extras_in_read_order() {
        let raw = json!({
            "tunes": {}, "type": "table", "id": "t",
            "data": {"withHeadings": true, "stretched": false, "content": [["a"]]}
        });
        let out = FreeBlock::from_value(raw).to_value();
        let keys = |v: &Value| v.as_object().unwrap().keys().cloned().collect::<Vec<_>>();
        assert_eq!(keys(&out), vec!["id", "type", "data", "tunes"]);
        assert_eq!(keys(&out["data"]), vec!["content", "withHeadings", "stretched"]);
    }

    #[test]
    fn malformed_fields_stay_in_extra() {
        let raw = json!({"type": "list", "data": {"items": ["a", 2], "style": "fancy"}});
        let block = FreeBlock::from_value(raw.clone());
        let Block::List(list) = &block.block else {
            panic!("expected list");
        };
        assert!(list.items.is_none());
        assert!(list.style.is_none());
        assert_eq!(list.style(), ListStyle::Unordered);
        assert_eq!(list.extra.get("items"), Some(&json!(["a", 2])));
        assert_eq!(block.to_value(), raw);
    }

    #[test]
    fn malformed_collections_read_cell_by_cell() {
        let block = FreeBlock::from_value(json!({"type": "list", "data": {"items": ["a", 2, null]}}));
        let Block::List(list) = &block.block else {
            panic!("expected list");
        };
        assert_eq!(&*list.items(), ["a", "2", ""]);

        let block = FreeBlock::from_value(json!({"type": "table", "data": {"content": [
            ["a", {"x": 1}], "not a row", ["b", true]
        ]}}));
        let Block::Table(table) = &block.block else {
            panic!("expected table");
        };
        assert!(table.content.is_none());
        assert_eq!(
            table.rows().to_vec(),
            vec![
                vec!["a".to_string(), String::new()],
                vec![],
                vec!["b".to_string(), "true".to_string()],
            ]
        );

        let block = FreeBlock::from_value(json!({"type": "checklist", "data": {"items": [
            {"text": "ok", "checked": true}, "junk"
        ]}}));
        let Block::Checklist(checklist) = &block.block else {
            panic!("expected checklist");
        };
        let items = checklist.items();
        assert_eq!(items.len(), 2);
        assert!(items[0].is_checked());
        assert_eq!(items[1], ChecklistItem::default());
    }

    #[test]
    fn editor_extensions_roundtrip() {
        let raw = json!({
            "time": 1718000000000_i64,
            "version": "2.28.2",
            "blocks": [
                {"id": "q1", "type": "quote",
                 "data": {"text": "Stay hungry", "caption": "Jobs", "alignment": "left"},
                 "tunes": {"anchor": "top"}},
                {"id": "t1", "type": "table",
                 "data": {"withHeadings": true, "content": [["h1", "h2"], ["a", "b"]]}}
            ],
            "meta": {"source": "editor"}
        });
        let doc = decode(raw.clone());
        assert_eq!(doc.time, Some(1718000000000));
        assert_eq!(doc.version.as_deref(), Some("2.28.2"));
        assert_eq!(doc.to_value(), raw);
        assert_eq!(serde_json::to_value(&doc).unwrap(), raw);
    }

    #[test]
    fn header_level_clamping() {
        let level = |v: Value| {
            let block = FreeBlock::from_value(json!({"type": "header", "data": {"level": v}}));
            match block.block {
                Block::Header(h) => h.clamped_level(),
                _ => panic!("expected header"),
            }
        };
        assert_eq!(level(json!(9)), 6);
        assert_eq!(level(json!(0)), 2);
        assert_eq!(level(json!(-3)), 1);
        assert_eq!(level(json!(4)), 4);
        assert_eq!(level(json!("3")), 3);
        assert_eq!(level(json!(null)), 2);
        assert_eq!(level(json!(2.5)), 2);
        assert_eq!(level(json!(9.0)), 6);
        assert_eq!(level(json!(3.0)), 3);
        assert_eq!(HeaderData::default().clamped_level(), 2);
    }

    #[test]
    fn loose_header_levels_written_back_unchanged() {
        for level in [json!("3"), json!(9.0)] {
            let raw = json!({"type": "header", "data": {"text": "t", "level": level}});
            assert_eq!(FreeBlock::from_value(raw.clone()).to_value(), raw);
        }
    }

    #[test]
    fn toggle_prefers_label_over_title() {
        let toggle = ToggleData {
            label: Some(String::new()),
            title: Some("Title".into()),
            ..ToggleData::default()
        };
        assert_eq!(toggle.heading(), Some(""));
        let toggle = ToggleData {
            title: Some("Title".into()),
            ..ToggleData::default()
        };
        assert_eq!(toggle.heading(), Some("Title"));
    }

    #[test]
    fn toggle_legacy_content_normalizes_on_use() {
        let block = FreeBlock::from_value(json!({
            "type": "toggle",
            "data": {"title": "Old", "content": {"text": "legacy body"}}
        }));
        let Block::Toggle(toggle) = &block.block else {
            panic!("expected toggle");
        };
        assert!(matches!(toggle.content, ToggleContent::Other(_)));
        let nested = toggle.nested();
        assert_eq!(nested.blocks, vec![FreeBlock::paragraph("legacy body")]);
    }

    #[test]
    fn toggle_without_content_is_empty() {
        let block = FreeBlock::from_value(json!({"type": "toggle", "data": {"label": "L"}}));
        let Block::Toggle(toggle) = &block.block else {
            panic!("expected toggle");
        };
        assert!(toggle.nested().is_empty());
        assert_eq!(block.to_value(), json!({"type": "toggle", "data": {"label": "L"}}));
    }

    #[test]
    fn deep_toggle_nesting_is_truncated() {
        let mut value = json!({"blocks": [{"type": "paragraph", "data": {"text": "bottom"}}]});
        for _ in 0..(MAX_NESTING_DEPTH + 5) {
            value = json!({"blocks": [{"type": "toggle", "data": {"label": "t", "content": value}}]});
        }
        let doc = decode(value.clone());

        let mut depth = 0;
        let mut current = doc.clone();
        loop {
            let Block::Toggle(toggle) = &current.blocks[0].block else {
                panic!("expected toggle");
            };
            let next = match &toggle.content {
                ToggleContent::Document(inner) => (**inner).clone(),
                ToggleContent::Truncated(_) => break,
                other => panic!("unexpected content {other:?}"),
            };
            depth += 1;
            current = next;
        }
        assert_eq!(depth, MAX_NESTING_DEPTH);
        // Truncated content still serializes back unchanged.
        assert_eq!(doc.to_value(), value);
    }

    #[test]
    fn programmatic_fields_override_stale_extra() {
        let mut doc = decode(json!({"time": "yesterday", "blocks": []}));
        assert_eq!(doc.time, None);
        doc.time = Some(5);
        assert_eq!(doc.to_value(), json!({"time": 5, "blocks": []}));
    }
}
