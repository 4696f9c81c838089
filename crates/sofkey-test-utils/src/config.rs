//! Configuration builders for tests.
//!
//! Use [`TestConfigBuilder`] to create customised [`AppConfig`] values without
//! repeating boilerplate across crate boundaries.

use std::path::Path;

use sofkey_config::AppConfig;

/// Fluent builder for [`AppConfig`] in tests.
///
/// # Example
///
/// ```ignore
/// let config = TestConfigBuilder::new()
///     .version("2024")
///     .language("de")
///     .build();
/// ```
pub struct TestConfigBuilder {
    config: AppConfig,
}

impl TestConfigBuilder {
    /// Start from [`AppConfig::default`].
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
        }
    }

    /// Set `keywords.version`.
    pub fn version(mut self, version: &str) -> Self {
        self.config.keywords.version = version.to_string();
        self
    }

    /// Set `keywords.language`.
    pub fn language(mut self, language: &str) -> Self {
        self.config.keywords.language = language.to_string();
        self
    }

    /// Set `keywords.data_dir`.
    pub fn data_dir(mut self, dir: &Path) -> Self {
        self.config.keywords.data_dir = dir.display().to_string();
        self
    }

    /// Set `keywords.sidecar`.
    pub fn sidecar(mut self, name: &str) -> Self {
        self.config.keywords.sidecar = name.to_string();
        self
    }

    /// Finish building.
    pub fn build(self) -> AppConfig {
        self.config
    }
}

impl Default for TestConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
