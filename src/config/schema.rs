//! Configuration schema types for `msxconv.toml`
//!
//! Defines the structure and validation rules for converter defaults.

use serde::{Deserialize, Serialize};

use crate::output::OutputFormat;

/// Default settings applied to every conversion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Image container: png, bmp or jpeg
    #[serde(default = "default_format")]
    pub format: String,
    /// Double decoded images in both axes
    #[serde(default)]
    pub double: bool,
    /// Print decoder diagnostics to stderr
    #[serde(default)]
    pub verbose: bool,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self { format: default_format(), double: false, verbose: false }
    }
}

fn default_format() -> String {
    "png".to_string()
}

/// Complete `msxconv.toml` configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsxConfig {
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

/// Configuration validation error
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    /// Path to the invalid field (e.g., "defaults.format")
    pub field: String,
    /// Error message
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "msxconv.toml: '{}' {}", self.field, self.message)
    }
}

impl MsxConfig {
    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();

        if let Err(message) = self.defaults.format.parse::<OutputFormat>() {
            errors.push(ConfigValidationError { field: "defaults.format".to_string(), message });
        }

        errors
    }

    /// The configured image container, falling back to PNG when invalid.
    ///
    /// Loaded configs are validated, so the fallback only applies to configs
    /// built by hand.
    pub fn output_format(&self) -> OutputFormat {
        self.defaults.format.parse().unwrap_or_default()
    }
}
