//! # Retro Blocks
//!
//! The free-form content model of a daily retrospective journal. Besides the
//! fixed KPT (Keep/Problem/Try) and PMI (Plus/Minus/Interesting) templates,
//! an entry can be written as a free-form document: an ordered list of typed
//! blocks produced by a block editor.
//!
//! # Three Operations
//!
//! Everything in this crate feeds or consumes one of three operations:
//!
//! ```text
//! normalize           any stored shape   →  FreeContent   (never fails)
//! render_content      FreeContent        →  HTML          (maud Markup)
//! extract_plain_text  any stored shape   →  String        (search, counters)
//! ```
//!
//! Stored content comes in three generations: the block document
//! (`{ "blocks": [...] }`), an object with a single `text` field, and a bare
//! string. All of them are read; only the block document is ever written.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`content`] | Block model: `FreeContent`, `FreeBlock`, per-type payloads, lenient JSON decoding |
//! | [`normalize`] | Upgrades legacy and partial shapes to a `FreeContent` |
//! | [`render`] | HTML rendering with Maud, fragment and standalone page |
//! | [`text`] | Plain-text projection and character counting |
//! | [`entry`] | Entry records (KPT, PMI, FREE), loading and search |
//! | [`scan`] | Walks a directory of entry records and collects block statistics |
//! | [`config`] | `config.toml` loading, validation, merging, and CSS generation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Decoding Never Fails
//!
//! A document written by a newer editor may carry block types or fields this
//! crate has never heard of. Decoding is total: unknown block types become
//! [`content::Block::Unknown`], malformed fields stay as raw JSON, and both
//! are written back unchanged. Rendering skips what it does not understand
//! and plain-text extraction treats it as empty.
//!
//! ## Raw HTML In, Raw HTML Out
//!
//! The editor stores rich text as HTML fragments. [`render`] inserts them
//! without escaping; the trust boundary is documented there. [`text`] strips
//! tags from paragraph and header text only.
//!
//! ## Bounded Nesting
//!
//! Toggle blocks contain whole documents. Decoding stops interpreting them
//! past [`content::MAX_NESTING_DEPTH`] levels, so rendering and extraction
//! cannot recurse without bound on hostile input.

pub mod config;
pub mod content;
pub mod entry;
pub mod normalize;
pub mod output;
pub mod render;
pub mod scan;
pub mod text;

pub use content::{Block, BlockKind, FreeBlock, FreeContent};
pub use normalize::{ContentInput, normalize};
pub use render::{render_block, render_content};
pub use text::extract_plain_text;

#[cfg(test)]
pub(crate) mod test_helpers;
