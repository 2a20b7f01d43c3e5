//! Directory scanning.
//!
//! Walks a directory of persisted entry records and loads every one of them,
//! collecting block statistics for free-form entries along the way.
//!
//! ## Directory Structure
//!
//! ```text
//! entries/                         # Scan root
//! ├── config.toml                  # Viewer config (not scanned)
//! ├── 2024-06-10-kpt.json          # One entry record per file
//! ├── 2024-06-12-free.json
//! ├── archive/                     # Subdirectories are walked too
//! │   └── 2023-12-31-pmi.json
//! └── .drafts/                     # Hidden entries are skipped
//! ```
//!
//! Files are visited in file-name order. Only `*.json` files are loaded; a
//! file that fails to load fails the whole scan, naming the file.

use crate::content::{Block, BlockKind, FreeContent};
use crate::entry::{self, EntryContent, EntryError, EntryKind, RetrospectiveEntry};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("{path}: {source}")]
    Entry { path: PathBuf, source: EntryError },
}

/// Everything found under a scan root.
#[derive(Debug)]
pub struct ScanReport {
    pub root: PathBuf,
    pub entries: Vec<ScannedEntry>,
}

#[derive(Debug)]
pub struct ScannedEntry {
    /// Path relative to the scan root.
    pub source: PathBuf,
    pub entry: RetrospectiveEntry,
    /// Present for free-form entries only.
    pub stats: Option<BlockStats>,
}

/// Block counts for one free-form document, nested toggle content included.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlockStats {
    pub counts: BTreeMap<BlockKind, usize>,
    /// Blocks skipped by rendering: unknown types and non-object entries.
    pub unknown: usize,
    /// Deepest toggle nesting; 0 when there are no toggles.
    pub max_depth: usize,
    /// Plain-text character count.
    pub chars: usize,
}

impl BlockStats {
    pub fn collect(content: &FreeContent) -> Self {
        let mut stats = Self {
            chars: crate::text::char_count(content),
            ..Self::default()
        };
        stats.walk(content, 0);
        stats
    }

    fn walk(&mut self, content: &FreeContent, depth: usize) {
        for block in &content.blocks {
            match block.kind() {
                Some(kind) => *self.counts.entry(kind).or_default() += 1,
                None => self.unknown += 1,
            }
            if let Block::Toggle(toggle) = &block.block {
                self.max_depth = self.max_depth.max(depth + 1);
                self.walk(&toggle.nested(), depth + 1);
            }
        }
    }

    /// Known blocks, all levels.
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn count(&self, kind: BlockKind) -> usize {
        self.counts.get(&kind).copied().unwrap_or(0)
    }
}

impl ScanReport {
    pub fn count_by_kind(&self) -> BTreeMap<EntryKind, usize> {
        let mut counts = BTreeMap::new();
        for scanned in &self.entries {
            *counts.entry(scanned.entry.kind()).or_default() += 1;
        }
        counts
    }

    pub fn find(&self, id: &str) -> Option<&ScannedEntry> {
        self.entries.iter().find(|s| s.entry.id == id)
    }

    pub fn into_entries(self) -> Vec<RetrospectiveEntry> {
        self.entries.into_iter().map(|s| s.entry).collect()
    }
}

/// Load every entry record under `root`.
pub fn scan(root: &Path) -> Result<ScanReport, ScanError> {
    if !root.is_dir() {
        return Err(ScanError::NotADirectory(root.to_path_buf()));
    }

    let mut entries = Vec::new();
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e));
    for dir_entry in walker {
        let dir_entry = dir_entry?;
        let path = dir_entry.path();
        if !dir_entry.file_type().is_file() || path.extension().is_none_or(|ext| ext != "json") {
            continue;
        }

        let entry = entry::load_entry(path).map_err(|source| ScanError::Entry {
            path: path.to_path_buf(),
            source,
        })?;
        let stats = match &entry.content {
            EntryContent::Free(content) => Some(BlockStats::collect(content)),
            EntryContent::Kpt(_) | EntryContent::Pmi(_) => None,
        };
        let source = path.strip_prefix(root).unwrap_or(path).to_path_buf();
        tracing::info!(source = %source.display(), kind = %entry.kind(), "loaded entry");

        entries.push(ScannedEntry {
            source,
            entry,
            stats,
        });
    }

    Ok(ScanReport {
        root: root.to_path_buf(),
        entries,
    })
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}
