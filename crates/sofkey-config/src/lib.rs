#![deny(unsafe_code)]

//! Configuration loading and validation for sofkey.
//!
//! Loads TOML configuration files and validates them. Provides the
//! [`AppConfig`] type as the central configuration structure, and the
//! [`ConfigSource`] capability the resolver reads its overrides through.

/// Key/value override source consumed by the resolver.
pub mod source;

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use source::{ConfigSource, LANGUAGE_KEY, VERSION_KEY};

/// Sentinel value meaning "detect it, do not override".
pub const AUTO: &str = "Auto";

/// Lower-case aliases of English, the first being its code.
pub const ENGLISH_ALIASES: &[&str] = &["en", "eng", "english", "englisch"];

/// Lower-case aliases of German, the first being its code.
pub const GERMAN_ALIASES: &[&str] = &["de", "ger", "deu", "german", "deutsch"];

/// Every alias group accepted in `keywords.language`.
pub const LANGUAGE_ALIASES: &[&[&str]] = &[ENGLISH_ALIASES, GERMAN_ALIASES];

/// Whether `value` is a known language alias (case-insensitive, trimmed).
pub fn is_language_alias(value: &str) -> bool {
    let value = value.trim().to_ascii_lowercase();
    LANGUAGE_ALIASES
        .iter()
        .any(|group| group.contains(&value.as_str()))
}

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("validation error: {0}")]
    Validation(String),
}

/// Top-level application configuration.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Keyword resolution configuration.
    #[serde(default)]
    pub keywords: KeywordsConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Keyword resolution configuration.
///
/// ## TOML Example
///
/// ```toml
/// [keywords]
/// version = "2024"
/// language = "deutsch"
/// data_dir = "/usr/share/sofkey"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordsConfig {
    /// Version override, or `"Auto"` to rely on detection.
    #[serde(default = "default_version")]
    pub version: String,

    /// Language override. Any alias of a supported language is accepted;
    /// `"Auto"` or an empty string leaves the language to detection.
    #[serde(default = "default_language")]
    pub language: String,

    /// Directory holding the per-language `keywords_<lang>.json` tables.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// File name of the sidecar definition file looked up next to documents.
    #[serde(default = "default_sidecar")]
    pub sidecar: String,
}

impl Default for KeywordsConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            language: default_language(),
            data_dir: default_data_dir(),
            sidecar: default_sidecar(),
        }
    }
}

fn default_version() -> String {
    AUTO.to_string()
}

fn default_language() -> String {
    "en".to_string()
}

fn default_data_dir() -> String {
    "assets".to_string()
}

fn default_sidecar() -> String {
    "sofistik.def".to_string()
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g. "info", "debug", "trace").
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Whether `value` is the automatic sentinel (case-insensitive).
pub fn is_auto(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case(AUTO)
}

impl AppConfig {
    /// Load configuration from a TOML file at the given path.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::parse(&content)?;
        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let keywords = &self.keywords;
        if keywords.data_dir.is_empty() {
            return Err(ConfigError::Validation(
                "keywords.data_dir must not be empty".to_string(),
            ));
        }
        if keywords.sidecar.is_empty() {
            return Err(ConfigError::Validation(
                "keywords.sidecar must not be empty".to_string(),
            ));
        }

        if !is_auto(&keywords.version) {
            let v = keywords.version.trim();
            if v.is_empty() || v.len() > 4 || !v.bytes().all(|b| b.is_ascii_digit()) {
                return Err(ConfigError::Validation(format!(
                    "keywords.version must be \"{AUTO}\" or 1-4 digits, got {:?}",
                    keywords.version
                )));
            }
        }

        let language = keywords.language.trim();
        if !language.is_empty() && !is_auto(language) && !is_language_alias(language) {
            return Err(ConfigError::Validation(format!(
                "keywords.language must be one of {:?}, got {:?}",
                LANGUAGE_ALIASES.concat(),
                keywords.language
            )));
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::Validation(format!(
                "logging.level must be one of {:?}, got {:?}",
                valid_levels, self.logging.level
            )));
        }

        Ok(())
    }
}
