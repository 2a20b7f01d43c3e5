//! HTML rendering of free-form content.
//!
//! Rendering walks the blocks in order and emits one element per known block.
//! Unknown blocks emit nothing: no placeholder, no error.
//!
//! ## Element Map
//!
//! | Block | Markup |
//! |-------|--------|
//! | paragraph | `<p class="block-paragraph">` |
//! | header | `<h1>`..`<h6>` with class `block-header`, level clamped |
//! | list | `<ol>` or `<ul>` with class `block-list` |
//! | checklist | `<ul class="block-checklist">` with a checkbox span per item |
//! | table | `<div class="block-table"><table><tbody>` |
//! | quote | `<blockquote class="block-quote">` |
//! | toggle | `<details class="block-toggle">` with the nested blocks inside |
//!
//! ## Trust Boundary
//!
//! Every text field coming from the document (paragraph and header text,
//! list items, checklist text, table cells, quote text, toggle labels) is
//! inserted as raw HTML with [`PreEscaped`]. The block editor is the only
//! producer of that HTML and is responsible for sanitizing it. Replacing the
//! editor with one that does not sanitize makes this an injection point.
//! Strings that come from [`ViewerConfig`] are ours and are escaped normally.

use crate::config::{self, LabelsConfig, ViewerConfig};
use crate::content::{Block, FreeBlock, FreeContent, ListStyle};
use maud::{DOCTYPE, Markup, PreEscaped, html};

const CSS_STATIC: &str = include_str!("../static/style.css");

/// Render a document as an HTML fragment.
pub fn render_content(content: &FreeContent, labels: &LabelsConfig) -> Markup {
    html! {
        @if content.is_empty() {
            p.free-content-empty { (labels.empty_content) }
        } @else {
            div.free-content {
                @for block in &content.blocks {
                    (render_block(block, labels))
                }
            }
        }
    }
}

/// Render a single block. Unknown and opaque blocks produce empty markup.
pub fn render_block(block: &FreeBlock, labels: &LabelsConfig) -> Markup {
    match &block.block {
        Block::Paragraph(data) => html! {
            p.block-paragraph { (raw(data.text.as_deref())) }
        },
        Block::Header(data) => {
            let text = raw(data.text.as_deref());
            match data.clamped_level() {
                1 => html! { h1.block-header.level-1 { (text) } },
                2 => html! { h2.block-header.level-2 { (text) } },
                3 => html! { h3.block-header.level-3 { (text) } },
                4 => html! { h4.block-header.level-4 { (text) } },
                5 => html! { h5.block-header.level-5 { (text) } },
                _ => html! { h6.block-header.level-6 { (text) } },
            }
        }
        Block::List(data) => match data.style() {
            ListStyle::Ordered => html! {
                ol.block-list.ordered {
                    @for item in data.items().iter() { li { (PreEscaped(item)) } }
                }
            },
            ListStyle::Unordered => html! {
                ul.block-list.unordered {
                    @for item in data.items().iter() { li { (PreEscaped(item)) } }
                }
            },
        },
        Block::Checklist(data) => html! {
            ul.block-checklist {
                @for item in data.items().iter() {
                    li.checklist-item.checked[item.is_checked()] {
                        span.checkbox {
                            @if item.is_checked() { "✓" }
                        }
                        span.checklist-text { (PreEscaped(item.text())) }
                    }
                }
            }
        },
        Block::Table(data) => html! {
            div.block-table {
                table {
                    tbody {
                        @for row in data.rows().iter() {
                            tr {
                                @for cell in row { td { (PreEscaped(cell)) } }
                            }
                        }
                    }
                }
            }
        },
        Block::Quote(data) => html! {
            blockquote.block-quote { (raw(data.text.as_deref())) }
        },
        Block::Toggle(data) => {
            let nested = data.nested();
            html! {
                details.block-toggle {
                    summary {
                        @match data.heading() {
                            Some(heading) => { (PreEscaped(heading)) }
                            None => { (labels.toggle_default) }
                        }
                    }
                    div.toggle-body {
                        @if nested.is_empty() {
                            p.toggle-placeholder { (labels.toggle_placeholder) }
                        } @else {
                            @for child in &nested.blocks {
                                (render_block(child, labels))
                            }
                        }
                    }
                }
            }
        }
        Block::Unknown { .. } | Block::Opaque(_) => html! {},
    }
}

/// Render a standalone HTML page for one document.
pub fn render_document(content: &FreeContent, config: &ViewerConfig) -> Markup {
    let css = format!(
        "{}\n\n{}",
        config::generate_color_css(&config.colors),
        CSS_STATIC
    );
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (config.labels.document_title) }
                style { (PreEscaped(css)) }
            }
            body {
                main.entry {
                    (render_content(content, &config.labels))
                }
            }
        }
    }
}

fn raw(text: Option<&str>) -> PreEscaped<&str> {
    PreEscaped(text.unwrap_or_default())
}
