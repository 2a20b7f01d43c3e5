//! CLI output formatting.
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! Entries
//! 001 2024-06-10 KPT (4 items)
//!     Source: 2024-06-10-kpt.json
//! 002 2024-06-12 FREE (9 blocks, 1 unknown, depth 2, 187 chars)
//!     Source: 2024-06-12-free.json
//!     Preview: Wednesday A calm day of deep work. Fini...
//!
//! 2 entries (KPT 1, FREE 1)
//! ```
//!
//! ## Outline
//!
//! ```text
//! 001 header h6: Wednesday
//! 002 toggle: Details
//!     001 paragraph: Nested thoughts
//! 003 (skipped: image)
//! ```
//!
//! ## Search
//!
//! ```text
//! 2 matches for "focus"
//! 001 2024-06-12 FREE free-0612
//!     Deep focus all afternoon
//! ```

use crate::content::{Block, FreeContent};
use crate::entry::RetrospectiveEntry;
use crate::scan::{BlockStats, ScanReport};
use crate::text;

/// Preview length, in characters.
const PREVIEW_CHARS: usize = 40;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_desc(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

/// Header line for an entry: index, date, kind, optional detail.
fn entry_header(index: usize, entry: &RetrospectiveEntry, detail: Option<String>) -> String {
    let head = format!("{} {} {}", format_index(index), entry.date, entry.kind());
    match detail {
        Some(detail) => format!("{head} ({detail})"),
        None => head,
    }
}

fn stats_detail(stats: &BlockStats) -> String {
    let mut parts = vec![plural(stats.total(), "block")];
    if stats.unknown > 0 {
        parts.push(format!("{} unknown", stats.unknown));
    }
    if stats.max_depth > 0 {
        parts.push(format!("depth {}", stats.max_depth));
    }
    parts.push(plural(stats.chars, "char"));
    parts.join(", ")
}

// ============================================================================
// Check
// ============================================================================

pub fn format_scan_output(report: &ScanReport) -> Vec<String> {
    let mut lines = vec!["Entries".to_string()];

    for (i, scanned) in report.entries.iter().enumerate() {
        let entry = &scanned.entry;
        let detail = match &scanned.stats {
            Some(stats) => stats_detail(stats),
            None => plural(entry.item_count(), "item"),
        };
        lines.push(entry_header(i + 1, entry, Some(detail)));
        lines.push(format!("{}Source: {}", indent(1), scanned.source.display()));
        if scanned.stats.is_some() {
            let preview = entry.plain_text();
            if !preview.is_empty() {
                lines.push(format!(
                    "{}Preview: {}",
                    indent(1),
                    truncate_desc(&preview, PREVIEW_CHARS)
                ));
            }
        }
    }

    let by_kind = report
        .count_by_kind()
        .iter()
        .map(|(kind, n)| format!("{kind} {n}"))
        .collect::<Vec<_>>();
    let total = match report.entries.len() {
        1 => "1 entry".to_string(),
        n => format!("{n} entries"),
    };
    lines.push(String::new());
    if by_kind.is_empty() {
        lines.push(total);
    } else {
        lines.push(format!("{} ({})", total, by_kind.join(", ")));
    }
    lines
}

pub fn print_scan_output(report: &ScanReport) {
    for line in format_scan_output(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Outline
// ============================================================================

/// One line per block, nested toggle content indented beneath its toggle.
pub fn format_outline(content: &FreeContent) -> Vec<String> {
    let mut lines = Vec::new();
    outline_into(content, 0, &mut lines);
    if lines.is_empty() {
        lines.push("(no blocks)".to_string());
    }
    lines
}

fn outline_into(content: &FreeContent, depth: usize, lines: &mut Vec<String>) {
    for (i, block) in content.blocks.iter().enumerate() {
        let prefix = format!("{}{}", indent(depth), format_index(i + 1));
        let (label, text) = match &block.block {
            Block::Header(data) => (
                format!("header h{}", data.clamped_level()),
                text::block_text(block),
            ),
            Block::Toggle(data) => (
                "toggle".to_string(),
                data.heading().unwrap_or_default().to_string(),
            ),
            Block::Unknown { .. } => {
                let type_name = block.type_name().unwrap_or("no type");
                lines.push(format!("{prefix} (skipped: {type_name})"));
                continue;
            }
            Block::Opaque(_) => {
                lines.push(format!("{prefix} (skipped: not a block)"));
                continue;
            }
            _ => (
                block.kind().map(|k| k.as_str()).unwrap_or_default().to_string(),
                text::block_text(block),
            ),
        };
        if text.is_empty() {
            lines.push(format!("{prefix} {label}"));
        } else {
            lines.push(format!("{prefix} {label}: {}", truncate_desc(&text, PREVIEW_CHARS)));
        }

        if let Block::Toggle(data) = &block.block {
            outline_into(&data.nested(), depth + 1, lines);
        }
    }
}

pub fn print_outline(content: &FreeContent) {
    for line in format_outline(content) {
        println!("{}", line);
    }
}

// ============================================================================
// Search
// ============================================================================

pub fn format_search_results(found: &[&RetrospectiveEntry], query: &str) -> Vec<String> {
    let count = match found.len() {
        1 => "1 match".to_string(),
        n => format!("{n} matches"),
    };
    let mut lines = vec![format!("{count} for \"{query}\"")];
    for (i, entry) in found.iter().enumerate() {
        lines.push(format!("{} {}", entry_header(i + 1, entry, None), entry.id));
        let text = entry.plain_text();
        if !text.is_empty() {
            lines.push(format!("{}{}", indent(1), truncate_desc(&text, PREVIEW_CHARS)));
        }
    }
    lines
}

pub fn print_search_results(found: &[&RetrospectiveEntry], query: &str) {
    for line in format_search_results(found, query) {
        println!("{}", line);
    }
}
