//! Configuration file support for nb4llm CLI
//!
//! Loads settings from `_nb4llm.toml` configuration file.

use anyhow::{Context, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default configuration file name
pub const CONFIG_FILE_NAME: &str = "_nb4llm.toml";

/// Schema URL for the configuration file
pub const SCHEMA_URL: &str =
    "https://raw.githubusercontent.com/nb4llm/nb4llm/main/crates/nb4llm-cli/schema/nb4llm.schema.json";

/// Root configuration structure
#[derive(Debug, Default, Clone, Deserialize, Serialize, JsonSchema)]
#[serde(default)]
pub struct Config {
    /// Conversion configuration
    #[serde(skip_serializing_if = "ConvertConfig::is_empty")]
    pub convert: ConvertConfig,
    /// Output configuration
    #[serde(skip_serializing_if = "OutputConfig::is_empty")]
    pub output: OutputConfig,
}

/// Conversion configuration
#[derive(Debug, Default, Clone, Deserialize, Serialize, JsonSchema)]
#[serde(default)]
pub struct ConvertConfig {
    /// Kernel language used for code blocks when a notebook declares none (default: "python")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_language: Option<String>,
    /// Shortest fence emitted around a cell (default: 3)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_fence_length: Option<usize>,
}

impl ConvertConfig {
    fn is_empty(&self) -> bool {
        self.default_language.is_none() && self.min_fence_length.is_none()
    }
}

/// Output configuration
#[derive(Debug, Default, Clone, Deserialize, Serialize, JsonSchema)]
#[serde(default)]
pub struct OutputConfig {
    /// Extension of flat text files, without the dot (default: "txt")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_extension: Option<String>,
    /// Process directories recursively (default: false)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recursive: Option<bool>,
}

impl OutputConfig {
    fn is_empty(&self) -> bool {
        self.text_extension.is_none() && self.recursive.is_none()
    }
}

impl Config {
    /// Load configuration from a specific file path
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Try to load configuration from a directory (looks for `_nb4llm.toml`)
    ///
    /// Returns `Ok(None)` if the config file doesn't exist.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Generate JSON schema for the configuration
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Config)
    }

    /// Generate JSON schema as a string
    pub fn json_schema_string() -> Result<String> {
        let schema = Self::json_schema();
        serde_json::to_string_pretty(&schema).context("Failed to serialize JSON schema")
    }

    /// Serialize configuration to TOML string with schema directive
    pub fn to_toml_with_schema(&self) -> Result<String> {
        let toml_content =
            toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;

        Ok(format!("#:schema {}\n\n{}", SCHEMA_URL, toml_content))
    }

    /// Create a sample configuration with the defaults spelled out
    pub fn sample() -> Self {
        Config {
            convert: ConvertConfig {
                default_language: Some(nb4llm_core::DEFAULT_LANGUAGE.to_string()),
                min_fence_length: Some(nb4llm_core::fence::MIN_FENCE_LENGTH),
            },
            output: OutputConfig {
                text_extension: Some(nb4llm_batch::DEFAULT_TEXT_EXTENSION.to_string()),
                recursive: Some(false),
            },
        }
    }
}
