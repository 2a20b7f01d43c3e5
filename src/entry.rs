//! Retrospective entries.
//!
//! An entry is one day's retrospective in one of three templates. Entries are
//! persisted as JSON records:
//!
//! ```json
//! {
//!   "id": "5f0c...",
//!   "date": "2024-06-10",
//!   "type": "KPT",
//!   "content": { "keep": ["..."], "problem": ["..."], "try": ["..."] },
//!   "createdAt": "2024-06-10T21:04:00Z",
//!   "updatedAt": "2024-06-10T21:04:00Z"
//! }
//! ```
//!
//! `FREE` content goes through [`normalize`], so entries written before the
//! block editor existed (`{ "text": ... }` or a bare string) load as a single
//! paragraph.

use crate::content::FreeContent;
use crate::normalize::normalize;
use crate::text;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EntryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Malformed {kind} content: {source}")]
    Content {
        kind: EntryKind,
        source: serde_json::Error,
    },
    #[error("{0} entries have no free-form content")]
    NotFreeForm(EntryKind),
}

/// Which template an entry was written in.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum EntryKind {
    Kpt,
    Pmi,
    Free,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Kpt => "KPT",
            EntryKind::Pmi => "PMI",
            EntryKind::Free => "FREE",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Keep / Problem / Try.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KptContent {
    pub keep: Vec<String>,
    pub problem: Vec<String>,
    #[serde(rename = "try")]
    pub tries: Vec<String>,
}

/// Plus / Minus / Interesting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PmiContent {
    pub plus: Vec<String>,
    pub minus: Vec<String>,
    pub interesting: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EntryContent {
    Kpt(KptContent),
    Pmi(PmiContent),
    Free(FreeContent),
}

impl EntryContent {
    pub fn kind(&self) -> EntryKind {
        match self {
            EntryContent::Kpt(_) => EntryKind::Kpt,
            EntryContent::Pmi(_) => EntryKind::Pmi,
            EntryContent::Free(_) => EntryKind::Free,
        }
    }

    /// Template items in order. Empty for free-form content.
    fn items(&self) -> Vec<&str> {
        match self {
            EntryContent::Kpt(c) => c
                .keep
                .iter()
                .chain(&c.problem)
                .chain(&c.tries)
                .map(String::as_str)
                .collect(),
            EntryContent::Pmi(c) => c
                .plus
                .iter()
                .chain(&c.minus)
                .chain(&c.interesting)
                .map(String::as_str)
                .collect(),
            EntryContent::Free(_) => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RetrospectiveEntry {
    pub id: String,
    pub date: NaiveDate,
    pub content: EntryContent,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// The persisted record, before `content` is interpreted.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct EntryRecord {
    id: String,
    date: NaiveDate,
    #[serde(rename = "type")]
    kind: EntryKind,
    #[serde(default)]
    content: Value,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
}

impl TryFrom<EntryRecord> for RetrospectiveEntry {
    type Error = EntryError;

    fn try_from(record: EntryRecord) -> Result<Self, Self::Error> {
        let content_error = |source| EntryError::Content {
            kind: record.kind,
            source,
        };
        let content = match record.kind {
            EntryKind::Kpt => {
                EntryContent::Kpt(serde_json::from_value(record.content).map_err(content_error)?)
            }
            EntryKind::Pmi => {
                EntryContent::Pmi(serde_json::from_value(record.content).map_err(content_error)?)
            }
            EntryKind::Free => EntryContent::Free(normalize(record.content)),
        };
        Ok(Self {
            id: record.id,
            date: record.date,
            content,
            created_at: record.created_at,
            updated_at: record.updated_at,
        })
    }
}

impl RetrospectiveEntry {
    pub fn kind(&self) -> EntryKind {
        self.content.kind()
    }

    pub fn from_value(value: Value) -> Result<Self, EntryError> {
        let record: EntryRecord = serde_json::from_value(value)?;
        record.try_into()
    }

    /// Everything searchable in the entry, space-joined.
    pub fn plain_text(&self) -> String {
        match &self.content {
            EntryContent::Free(content) => text::plain_text(content),
            other => other
                .items()
                .into_iter()
                .filter(|item| !item.is_empty())
                .collect::<Vec<_>>()
                .join(" "),
        }
    }

    pub fn char_count(&self) -> usize {
        self.plain_text().chars().count()
    }

    /// Number of template items. Always 0 for free-form entries.
    pub fn item_count(&self) -> usize {
        self.content.items().len()
    }

    /// Case-insensitive substring match. An empty query matches everything.
    ///
    /// The query is used as typed, surrounding whitespace included. Template
    /// entries match when any single item contains it; free-form entries
    /// match against their whole plain text.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        if query.is_empty() {
            return true;
        }
        match &self.content {
            EntryContent::Free(content) => text::plain_text(content).to_lowercase().contains(&query),
            other => other
                .items()
                .iter()
                .any(|item| item.to_lowercase().contains(&query)),
        }
    }
}

/// Entries matching `query` (and `kind`, if given), newest first.
pub fn search<'a>(
    entries: &'a [RetrospectiveEntry],
    query: &str,
    kind: Option<EntryKind>,
) -> Vec<&'a RetrospectiveEntry> {
    let mut found: Vec<_> = entries
        .iter()
        .filter(|entry| kind.is_none_or(|k| entry.kind() == k))
        .filter(|entry| entry.matches(query))
        .collect();
    found.sort_by(|a, b| b.date.cmp(&a.date));
    found
}

/// Read one entry record from a JSON file.
pub fn load_entry(path: &Path) -> Result<RetrospectiveEntry, EntryError> {
    let content = fs::read_to_string(path)?;
    RetrospectiveEntry::from_value(serde_json::from_str(&content)?)
}

/// Whether `value` looks like an entry record rather than bare content.
pub fn is_entry_record(value: &Value) -> bool {
    value
        .get("type")
        .and_then(Value::as_str)
        .is_some_and(|t| matches!(t, "KPT" | "PMI" | "FREE"))
        && value.get("content").is_some()
}

/// Free-form content from either a `FREE` entry record or a bare payload in
/// any accepted shape.
pub fn free_content_from_value(value: Value) -> Result<FreeContent, EntryError> {
    if !is_entry_record(&value) {
        return Ok(normalize(value));
    }
    match RetrospectiveEntry::from_value(value)?.content {
        EntryContent::Free(content) => Ok(content),
        other => Err(EntryError::NotFreeForm(other.kind())),
    }
}

/// Parse JSON text with [`free_content_from_value`].
pub fn parse_free_content(json: &str) -> Result<FreeContent, EntryError> {
    free_content_from_value(serde_json::from_str(json)?)
}
