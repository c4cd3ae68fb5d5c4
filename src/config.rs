// src/config.rs
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::tag_set::is_truthy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, instrument, trace};

pub const ENV_ADD_TAG_INPUT_TEXT: &str = "TAGEDIT_ADD_TAG_INPUT_TEXT";
pub const ENV_SUBMIT_ON_BLUR: &str = "TAGEDIT_SUBMIT_ON_BLUR";
pub const ENV_MAX_TAG_LIMIT: &str = "TAGEDIT_MAX_TAG_LIMIT";

/// Controller options, fixed for the lifetime of a controller
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Settings {
    /// Placeholder shown in a new tag's input (default: "add a tag")
    #[serde(default = "default_add_tag_input_text")]
    pub add_tag_input_text: String,

    /// Label of the add affordance (default: "+")
    #[serde(default = "default_add_tag_btn_label")]
    pub add_tag_btn_label: String,

    /// Label of the submit affordance, shared by add and edit (default: "ok")
    #[serde(default = "default_edit_tag_btn_label")]
    pub edit_tag_btn_label: String,

    /// Save when an input loses focus (default: false)
    #[serde(default)]
    pub submit_on_blur: bool,

    /// Maximum number of tags per set, 0 means unlimited (default: 0)
    #[serde(default)]
    pub max_tag_limit: usize,
}

fn default_add_tag_input_text() -> String {
    "add a tag".to_string()
}

fn default_add_tag_btn_label() -> String {
    "+".to_string()
}

fn default_edit_tag_btn_label() -> String {
    "ok".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            add_tag_input_text: default_add_tag_input_text(),
            add_tag_btn_label: default_add_tag_btn_label(),
            edit_tag_btn_label: default_edit_tag_btn_label(),
            submit_on_blur: false,
            max_tag_limit: 0,
        }
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|p| p.join(".config/tagedit/config.toml"))
}

fn read_config_file(path: &Path) -> DomainResult<Settings> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        DomainError::Other(format!("Cannot read config file {}: {}", path.display(), e))
    })?;
    toml::from_str::<Settings>(&text).map_err(|e| {
        DomainError::Other(format!("Invalid config file {}: {}", path.display(), e))
    })
}

/// Load settings: defaults, then config file, then environment.
///
/// An explicit `config_file` must exist and parse; the default location is
/// skipped when absent or broken.
#[instrument(level = "debug")]
pub fn load_settings(config_file: Option<&Path>) -> DomainResult<Settings> {
    trace!("Loading settings");

    let mut settings = match config_file {
        Some(path) => {
            trace!("Loading config from: {:?}", path);
            read_config_file(path)?
        }
        None => match default_config_path().filter(|p| p.exists()) {
            Some(path) => read_config_file(&path).unwrap_or_else(|e| {
                debug!("Ignoring default config: {}", e);
                Settings::default()
            }),
            None => Settings::default(),
        },
    };

    if let Ok(text) = std::env::var(ENV_ADD_TAG_INPUT_TEXT) {
        trace!("Using {} from environment: {}", ENV_ADD_TAG_INPUT_TEXT, text);
        settings.add_tag_input_text = text;
    }

    if let Ok(flag) = std::env::var(ENV_SUBMIT_ON_BLUR) {
        trace!("Using {} from environment: {}", ENV_SUBMIT_ON_BLUR, flag);
        settings.submit_on_blur = is_truthy(&flag);
    }

    if let Ok(limit) = std::env::var(ENV_MAX_TAG_LIMIT) {
        trace!("Using {} from environment: {}", ENV_MAX_TAG_LIMIT, limit);
        settings.max_tag_limit = limit.trim().parse().map_err(|_| {
            DomainError::Other(format!("Invalid {}: '{}'", ENV_MAX_TAG_LIMIT, limit))
        })?;
    }

    trace!("Settings loaded: {:?}", settings);
    Ok(settings)
}

pub fn generate_default_config() -> String {
    toml::to_string_pretty(&Settings::default())
        .unwrap_or_else(|_| "# Error generating default configuration".to_string())
}
