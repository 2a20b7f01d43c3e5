//! Viewer configuration.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults are
//! the base layer; a user `config.toml` in the config directory overrides any
//! subset of keys.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [labels]
//! document_title = "Retrospective"
//! empty_content = "Nothing has been written yet."
//! toggle_default = "Toggle"
//! toggle_placeholder = "Add content to this toggle."
//!
//! [colors.light]
//! background = "#ffffff"
//! text = "#374151"
//! text_muted = "#6b7280"
//! border = "#e5e7eb"
//! accent = "#3b82f6"       # Checkbox fill, quote border
//! quote_background = "#eff6ff"
//! toggle_background = "#fffbeb"
//!
//! [colors.dark]
//! background = "#111827"
//! text = "#e5e7eb"
//! text_muted = "#9ca3af"
//! border = "#374151"
//! accent = "#60a5fa"
//! quote_background = "#1e293b"
//! toggle_background = "#292524"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// File name looked up in the config directory.
pub const CONFIG_FILE: &str = "config.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Viewer configuration loaded from `config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewerConfig {
    /// Fixed strings shown by the viewer.
    pub labels: LabelsConfig,
    /// Color schemes for light and dark modes.
    pub colors: ColorConfig,
}

impl ViewerConfig {
    /// Reject blank labels and colors.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let labels = [
            ("labels.document_title", &self.labels.document_title),
            ("labels.empty_content", &self.labels.empty_content),
            ("labels.toggle_default", &self.labels.toggle_default),
            ("labels.toggle_placeholder", &self.labels.toggle_placeholder),
        ];
        for (key, value) in labels {
            if value.trim().is_empty() {
                return Err(ConfigError::Validation(format!("{key} must not be empty")));
            }
        }
        for (mode, scheme) in [("light", &self.colors.light), ("dark", &self.colors.dark)] {
            for (name, value) in scheme.entries() {
                if value.trim().is_empty() {
                    return Err(ConfigError::Validation(format!(
                        "colors.{mode}.{name} must not be empty"
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Strings the viewer shows on its own behalf. Rendered escaped.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LabelsConfig {
    /// `<title>` of standalone pages.
    pub document_title: String,
    /// Shown instead of a document with no blocks.
    pub empty_content: String,
    /// Summary of a toggle with neither `label` nor `title`.
    pub toggle_default: String,
    /// Shown inside a toggle with no nested blocks.
    pub toggle_placeholder: String,
}

impl Default for LabelsConfig {
    fn default() -> Self {
        Self {
            document_title: "Retrospective".to_string(),
            empty_content: "Nothing has been written yet.".to_string(),
            toggle_default: "Toggle".to_string(),
            toggle_placeholder: "Add content to this toggle.".to_string(),
        }
    }
}

/// Color configuration for light and dark modes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    pub light: ColorScheme,
    pub dark: ColorScheme,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            light: ColorScheme::default_light(),
            dark: ColorScheme::default_dark(),
        }
    }
}

/// Individual color scheme (light or dark).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorScheme {
    pub background: String,
    pub text: String,
    /// Placeholders and the empty-document message.
    pub text_muted: String,
    pub border: String,
    /// Checked checkboxes and the quote rule.
    pub accent: String,
    pub quote_background: String,
    pub toggle_background: String,
}

impl ColorScheme {
    pub fn default_light() -> Self {
        Self {
            background: "#ffffff".to_string(),
            text: "#374151".to_string(),
            text_muted: "#6b7280".to_string(),
            border: "#e5e7eb".to_string(),
            accent: "#3b82f6".to_string(),
            quote_background: "#eff6ff".to_string(),
            toggle_background: "#fffbeb".to_string(),
        }
    }

    pub fn default_dark() -> Self {
        Self {
            background: "#111827".to_string(),
            text: "#e5e7eb".to_string(),
            text_muted: "#9ca3af".to_string(),
            border: "#374151".to_string(),
            accent: "#60a5fa".to_string(),
            quote_background: "#1e293b".to_string(),
            toggle_background: "#292524".to_string(),
        }
    }

    fn entries(&self) -> [(&'static str, &str); 7] {
        [
            ("background", &self.background),
            ("text", &self.text),
            ("text_muted", &self.text_muted),
            ("border", &self.border),
            ("accent", &self.accent),
            ("quote_background", &self.quote_background),
            ("toggle_background", &self.toggle_background),
        ]
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::default_light()
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(ViewerConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the directory has no `config.toml`.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join(CONFIG_FILE);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<ViewerConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: ViewerConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given directory, over stock defaults.
pub fn load_config(dir: &Path) -> Result<ViewerConfig, ConfigError> {
    let overlay = load_raw_config(dir)?;
    if overlay.is_some() {
        tracing::debug!(dir = %dir.display(), "loaded {CONFIG_FILE}");
    }
    resolve_config(stock_defaults_value(), overlay)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# retro-blocks viewer configuration
# ==================================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Labels shown by the viewer itself (rendered as plain, escaped text)
# ---------------------------------------------------------------------------
[labels]
# <title> of standalone pages.
document_title = "Retrospective"

# Shown in place of an entry with no blocks.
empty_content = "Nothing has been written yet."

# Summary of a toggle that has neither a label nor a title.
toggle_default = "Toggle"

# Shown inside a toggle with no nested blocks.
toggle_placeholder = "Add content to this toggle."

# ---------------------------------------------------------------------------
# Colors - Light mode (prefers-color-scheme: light)
# ---------------------------------------------------------------------------
[colors.light]
background = "#ffffff"
text = "#374151"
text_muted = "#6b7280"         # Placeholders, empty message
border = "#e5e7eb"
accent = "#3b82f6"             # Checked boxes, quote rule
quote_background = "#eff6ff"
toggle_background = "#fffbeb"

# ---------------------------------------------------------------------------
# Colors - Dark mode (prefers-color-scheme: dark)
# ---------------------------------------------------------------------------
[colors.dark]
background = "#111827"
text = "#e5e7eb"
text_muted = "#9ca3af"
border = "#374151"
accent = "#60a5fa"
quote_background = "#1e293b"
toggle_background = "#292524"
"##
}

/// Generate CSS custom properties from color config.
pub fn generate_color_css(colors: &ColorConfig) -> String {
    format!(
        ":root {{\n{}\n}}\n\n@media (prefers-color-scheme: dark) {{\n    :root {{\n{}\n    }}\n}}",
        color_properties(&colors.light, "    "),
        color_properties(&colors.dark, "        "),
    )
}

fn color_properties(scheme: &ColorScheme, indent: &str) -> String {
    scheme
        .entries()
        .iter()
        .map(|(name, value)| {
            let var = match *name {
                "background" => "bg".to_string(),
                other => other.replace('_', "-"),
            };
            format!("{indent}--color-{var}: {value};")
        })
        .collect::<Vec<_>>()
        .join("\n")
}
