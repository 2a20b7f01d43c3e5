//! Shared test utilities.
//!
//! Fixture setup plus small builders for block JSON, so tests read like the
//! documents they describe:
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let content = normalize(doc(vec![
//!     header("Today", 2),
//!     toggle("More", vec![paragraph("nested")]),
//! ]));
//! ```

use serde_json::{Value, json};
use std::path::Path;
use tempfile::TempDir;

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/entries/` to a temp directory and return it.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/entries");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

pub fn write_file(dir: &Path, name: &str, content: &str) {
    std::fs::write(dir.join(name), content).unwrap();
}

// =========================================================================
// Block builders
// =========================================================================

pub fn doc(blocks: Vec<Value>) -> Value {
    json!({ "blocks": blocks })
}

pub fn paragraph(text: &str) -> Value {
    json!({ "type": "paragraph", "data": { "text": text } })
}

pub fn header(text: &str, level: i64) -> Value {
    json!({ "type": "header", "data": { "text": text, "level": level } })
}

pub fn list(items: &[&str]) -> Value {
    json!({ "type": "list", "data": { "style": "unordered", "items": items } })
}

pub fn toggle(label: &str, blocks: Vec<Value>) -> Value {
    json!({ "type": "toggle", "data": { "label": label, "content": { "blocks": blocks } } })
}
