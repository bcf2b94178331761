//! Application configuration value object

use serde::{Deserialize, Serialize};

use crate::domain::report::ExportFormat;

/// Default captioning model
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash-lite";

/// Application configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub output_dir: Option<String>,
    pub format: Option<String>,
}

impl AppConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        Self {
            api_key: None,
            model: Some(DEFAULT_MODEL.to_string()),
            output_dir: Some(".".to_string()),
            format: Some("txt".to_string()),
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            api_key: other.api_key.or(self.api_key),
            model: other.model.or(self.model),
            output_dir: other.output_dir.or(self.output_dir),
            format: other.format.or(self.format),
        }
    }

    /// Get the model name, or the default if not set
    pub fn model_or_default(&self) -> String {
        self.model
            .clone()
            .unwrap_or_else(|| DEFAULT_MODEL.to_string())
    }

    /// Get the output directory, or the current directory if not set
    pub fn output_dir_or_default(&self) -> String {
        self.output_dir.clone().unwrap_or_else(|| ".".to_string())
    }

    /// Get the export format, or text if not set/invalid
    pub fn format_or_default(&self) -> ExportFormat {
        self.format
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }
}
