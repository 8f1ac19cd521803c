//! Panel configuration.
//!
//! Every presentation and detection constant lives here so the library can
//! be pointed at a restyled page without code changes. All fields default to
//! the stock step-templates view; a JSON config file can override any subset.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Get the config directory using the platform-appropriate location.
///
/// - macOS: `~/Library/Application Support/steplib-panel/`
/// - Linux: `~/.config/steplib-panel/` (or `$XDG_CONFIG_HOME`)
/// - Windows: `%APPDATA%/steplib-panel/`
///
/// Falls back to `~/.steplib-panel/` if the platform dir is unavailable.
pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("steplib-panel"))
        .unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".steplib-panel")
        })
}

/// Default location of the optional config file.
pub fn default_config_path() -> PathBuf {
    config_dir().join("config.json")
}

/// All knobs for view detection and panel presentation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    /// Fixed, page-unique id of the injected panel container.
    pub panel_id: String,
    /// Static heading rendered at the top of the panel.
    pub panel_heading: String,
    /// Grid-width class of the injected panel.
    pub panel_width_class: String,

    /// Tag the target view's root element must carry.
    pub view_tag: String,
    /// Classes the target view's root element must all carry.
    pub view_classes: Vec<String>,
    /// Structural selector for the view heading, relative to the view root.
    pub heading_selector: String,
    /// Exact text the view heading must equal.
    pub heading_text: String,

    /// Selector for the view's existing content block.
    pub content_selector: String,
    /// Grid-width class removed from the content block on injection.
    pub content_width_from: String,
    /// Grid-width class added to the content block on injection.
    pub content_width_to: String,

    /// Rendered in place of a missing template description.
    pub missing_description: String,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            panel_id: "library-templates".to_string(),
            panel_heading: "Library".to_string(),
            panel_width_class: "span5".to_string(),
            view_tag: "div".to_string(),
            view_classes: vec!["ng-scope".to_string(), "container-fluid".to_string()],
            heading_selector: "div.span12 h3".to_string(),
            heading_text: "Step templates".to_string(),
            content_selector: "div.span12".to_string(),
            content_width_from: "span12".to_string(),
            content_width_to: "span7".to_string(),
            missing_description: "No description provided.".to_string(),
        }
    }
}

/// Load a config file, falling back to defaults when the file is absent.
pub fn load_config(path: &Path) -> Result<PanelConfig, String> {
    if !path.exists() {
        return Ok(PanelConfig::default());
    }
    let raw = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
}
