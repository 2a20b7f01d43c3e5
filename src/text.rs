//! Plain-text projection of free-form content.
//!
//! Used for search and for the editor's character counter. Each block
//! contributes a string; non-empty contributions are joined with single
//! spaces and the result is trimmed.
//!
//! Only paragraph and header text has HTML tags stripped. List, checklist,
//! table and quote text comes through raw, tags included. Search results and
//! character counts already depend on this, so it is kept as is.

use crate::content::{Block, FreeBlock, FreeContent};
use crate::normalize::{ContentInput, normalize};
use regex::Regex;
use std::sync::LazyLock;

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());

/// Normalize `input` and project it to plain text.
pub fn extract_plain_text(input: impl Into<ContentInput>) -> String {
    plain_text(&normalize(input))
}

/// Plain text of an already-normalized document.
pub fn plain_text(content: &FreeContent) -> String {
    join_non_empty(content.blocks.iter().map(block_text))
}

/// Character count of the plain text, as shown next to the editor.
pub fn char_count(content: &FreeContent) -> usize {
    plain_text(content).chars().count()
}

/// Remove everything that looks like a tag, in a single pass.
pub fn strip_tags(html: &str) -> String {
    TAG.replace_all(html, "").into_owned()
}

/// The text a single block contributes. Unknown blocks contribute nothing.
pub fn block_text(block: &FreeBlock) -> String {
    match &block.block {
        Block::Paragraph(data) => data.text.as_deref().map(strip_tags).unwrap_or_default(),
        Block::Header(data) => data.text.as_deref().map(strip_tags).unwrap_or_default(),
        Block::List(data) => data.items().join(" "),
        Block::Checklist(data) => data
            .items()
            .iter()
            .map(|item| item.text())
            .collect::<Vec<_>>()
            .join(" "),
        Block::Table(data) => data
            .rows()
            .iter()
            .flatten()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" "),
        Block::Quote(data) => data.text.clone().unwrap_or_default(),
        Block::Toggle(data) => {
            let heading = data.heading().unwrap_or_default().to_owned();
            let nested = plain_text(&data.nested());
            join_non_empty([heading, nested])
        }
        Block::Unknown { .. } | Block::Opaque(_) => String::new(),
    }
}

fn join_non_empty(parts: impl IntoIterator<Item = String>) -> String {
    parts
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn text_of(value: Value) -> String {
        extract_plain_text(value)
    }

    #[test]
    fn paragraph_tags_are_stripped() {
        let text = text_of(json!({"blocks": [
            {"type": "paragraph", "data": {"text": "<b>Hi</b> there"}}
        ]}));
        assert_eq!(text, "Hi there");
    }

    #[test]
    fn header_tags_are_stripped() {
        let text = text_of(json!({"blocks": [
            {"type": "header", "data": {"text": "<i>Week</i> 3", "level": 2}}
        ]}));
        assert_eq!(text, "Week 3");
    }

    #[test]
    fn list_items_join() {
        let text = text_of(json!({"blocks": [{"type": "list", "data": {"items": ["a", "b"]}}]}));
        assert_eq!(text, "a b");
    }

    #[test]
    fn checklist_items_join() {
        let text = text_of(json!({"blocks": [{"type": "checklist", "data": {"items": [
            {"text": "x", "checked": true},
            {"text": "y", "checked": false}
        ]}}]}));
        assert_eq!(text, "x y");
    }

    #[test]
    fn checklist_item_without_text_contributes_empty() {
        let text = text_of(json!({"blocks": [{"type": "checklist", "data": {"items": [
            {"checked": true},
            {"text": "y"}
        ]}}]}));
        assert_eq!(text, "y");
    }

    #[test]
    fn table_cells_flatten() {
        let text = text_of(json!({"blocks": [
            {"type": "table", "data": {"content": [["a", "b"], ["c"]]}}
        ]}));
        assert_eq!(text, "a b c");
    }

    #[test]
    fn toggle_label_then_nested() {
        let text = text_of(json!({"blocks": [{"type": "toggle", "data": {
            "label": "More",
            "content": {"blocks": [{"type": "paragraph", "data": {"text": "nested"}}]}
        }}]}));
        assert_eq!(text, "More nested");
    }

    #[test]
    fn toggle_title_fallback_and_empty_body() {
        let text = text_of(json!({"blocks": [{"type": "toggle", "data": {"title": "Only title"}}]}));
        assert_eq!(text, "Only title");
        let text = text_of(json!({"blocks": [{"type": "toggle", "data": {
            "content": {"blocks": [{"type": "quote", "data": {"text": "inside"}}]}
        }}]}));
        assert_eq!(text, "inside");
    }

    #[test]
    fn nested_toggles_recurse() {
        let text = text_of(json!({"blocks": [{"type": "toggle", "data": {
            "label": "outer",
            "content": {"blocks": [{"type": "toggle", "data": {
                "label": "inner",
                "content": {"blocks": [{"type": "list", "data": {"items": ["deep"]}}]}
            }}]}
        }}]}));
        assert_eq!(text, "outer inner deep");
    }

    #[test]
    fn unknown_and_opaque_blocks_contribute_nothing() {
        assert_eq!(text_of(json!({"blocks": [{"type": "unknown-type", "data": {}}]})), "");
        let text = text_of(json!({"blocks": [
            {"type": "paragraph", "data": {"text": "a"}},
            {"type": "embed", "data": {"url": "x"}},
            null,
            {"type": "paragraph", "data": {"text": "b"}}
        ]}));
        assert_eq!(text, "a b");
    }

    #[test]
    fn raw_tags_survive_outside_paragraphs() {
        let text = text_of(json!({"blocks": [
            {"type": "quote", "data": {"text": "<i>q</i>"}},
            {"type": "list", "data": {"items": ["<b>l</b>"]}}
        ]}));
        assert_eq!(text, "<i>q</i> <b>l</b>");
    }

    #[test]
    fn output_is_trimmed() {
        let text = text_of(json!({"blocks": [
            {"type": "paragraph", "data": {"text": "  padded  "}},
            {"type": "quote", "data": {"text": "end "}}
        ]}));
        assert_eq!(text, "padded   end");
    }

    #[test]
    fn legacy_shapes_extract() {
        assert_eq!(extract_plain_text(json!({"text": "<p>old</p>"})), "old");
        assert_eq!(extract_plain_text("plain"), "plain");
        assert_eq!(extract_plain_text(None::<Value>), "");
    }

    #[test]
    fn projection_stabilizes_after_one_pass() {
        let inputs = [
            json!({"blocks": [{"type": "list", "data": {"items": ["<b>a</b>", "<<x>y>"]}}]}),
            json!({"blocks": [{"type": "quote", "data": {"text": " <i>q</i> <"}}]}),
            json!({"blocks": [{"type": "paragraph", "data": {"text": "<p> spaced </p>"}}]}),
        ];
        for input in inputs {
            let once = extract_plain_text(input);
            let twice = extract_plain_text(once.as_str());
            let thrice = extract_plain_text(twice.as_str());
            assert_eq!(twice, thrice);
            assert_eq!(twice, twice.trim());
        }
    }

    #[test]
    fn strip_tags_single_pass() {
        assert_eq!(strip_tags("<p>Hello <b>world</b></p>"), "Hello world");
        assert_eq!(strip_tags("a < b"), "a < b");
        assert_eq!(strip_tags("<<b>a>"), "a>");
        assert_eq!(strip_tags(""), "");
    }

    #[test]
    fn char_count_counts_characters() {
        let doc = normalize(json!({"blocks": [
            {"type": "paragraph", "data": {"text": "<b>회고</b> done"}}
        ]}));
        assert_eq!(char_count(&doc), 7);
    }
}
