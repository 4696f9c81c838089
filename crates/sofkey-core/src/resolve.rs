//! Turns a [`Detection`](crate::detect::Detection) into a complete
//! (version, language) pair.
//!
//! Per field: detected value, else configured override (unless `Auto`),
//! else the compiled-in default.

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use sofkey_config::{is_auto, ConfigSource, LANGUAGE_KEY, VERSION_KEY};
use tracing::debug;

use crate::detect::Detector;
use crate::document::Document;
use crate::language::Language;
use crate::version::DEFAULT_VERSION;

/// A fully populated (version, language) pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Resolution {
    pub version: String,
    pub language: Language,
}

impl Default for Resolution {
    fn default() -> Self {
        Self {
            version: DEFAULT_VERSION.to_string(),
            language: Language::DEFAULT,
        }
    }
}

#[derive(Clone)]
pub struct Resolver {
    detector: Detector,
    config: Arc<dyn ConfigSource>,
}

impl Resolver {
    /// Combine a detector with the override source.
    pub fn new(detector: Detector, config: Arc<dyn ConfigSource>) -> Self {
        Self { detector, config }
    }

    /// Detect, then fill each missing field from config, then defaults.
    pub fn resolve(&self, document: Option<&dyn Document>, path: Option<&Path>) -> Resolution {
        let detected = self.detector.detect(document, path);

        let version = detected
            .version
            .or_else(|| self.configured_version())
            .unwrap_or_else(|| DEFAULT_VERSION.to_string());
        let language = detected
            .language
            .or_else(|| self.configured_language())
            .unwrap_or_default();

        debug!(%version, %language, "Resolved keyword context");
        Resolution { version, language }
    }

    fn configured_version(&self) -> Option<String> {
        self.configured(VERSION_KEY)
    }

    fn configured_language(&self) -> Option<Language> {
        self.configured(LANGUAGE_KEY)
            .and_then(|raw| Language::normalize(&raw))
    }

    fn configured(&self, key: &str) -> Option<String> {
        let value = self.config.get(key)?;
        let value = value.trim();
        if value.is_empty() || is_auto(value) {
            None
        } else {
            Some(value.to_string())
        }
    }
}

impl std::fmt::Debug for Resolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolver")
            .field("detector", &self.detector)
            .finish_non_exhaustive()
    }
}
