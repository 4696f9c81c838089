//! The keyword service: one object owning both caches, built once by the
//! host and shared by reference.

use std::path::Path;
use std::sync::Arc;

use sofkey_config::{AppConfig, ConfigSource, LANGUAGE_KEY};
use tracing::info;

use crate::cache::TaxonomyCache;
use crate::context::KeywordContext;
use crate::detect::{Detection, Detector};
use crate::document::{Document, FileSystem, OsFileSystem};
use crate::language::Language;
use crate::loader::{DirSource, TaxonomyLoader, TaxonomySource};
use crate::resolve::{Resolution, Resolver};
use crate::taxonomy::Taxonomy;

/// Version/language resolution plus the keyword taxonomy cache.
///
/// No method returns an error. Unreadable tables, unknown versions and
/// missing keywords all degrade to empty or default answers, with the
/// details sent to `tracing`.
#[derive(Debug)]
pub struct KeywordService {
    resolver: Resolver,
    detector: Detector,
    taxonomies: TaxonomyCache,
    /// Configured language, used when a caller passes none.
    default_language: Language,
}

impl KeywordService {
    /// Build a service reading tables from `config.keywords.data_dir` and
    /// taking its overrides from `config`.
    pub fn new(config: &AppConfig) -> Self {
        Self::from_parts(
            Box::new(DirSource::new(&config.keywords.data_dir)),
            Arc::new(OsFileSystem),
            Arc::new(config.clone()),
            &config.keywords.sidecar,
        )
    }

    /// Build a service from explicit collaborators.
    pub fn from_parts(
        source: Box<dyn TaxonomySource>,
        fs: Arc<dyn FileSystem>,
        config: Arc<dyn ConfigSource>,
        sidecar: &str,
    ) -> Self {
        let default_language = config
            .get(LANGUAGE_KEY)
            .and_then(|raw| Language::normalize(&raw))
            .unwrap_or_default();
        let detector = Detector::new(fs, sidecar);
        Self {
            resolver: Resolver::new(detector.clone(), config),
            detector,
            taxonomies: TaxonomyCache::new(TaxonomyLoader::new(source)),
            default_language,
        }
    }

    /// Run detection only, without applying any fallback.
    pub fn detect(&self, document: Option<&dyn Document>, path: Option<&Path>) -> Detection {
        self.detector.detect(document, path)
    }

    /// Detect, then fill missing fields from config and compiled defaults.
    pub fn resolve(&self, document: Option<&dyn Document>, path: Option<&Path>) -> Resolution {
        self.resolver.resolve(document, path)
    }

    /// Versions the table for `language` lists, oldest first. Empty when the
    /// table is unavailable. An absent language means the configured one.
    pub fn available_versions(&self, language: Option<Language>) -> Vec<String> {
        self.taxonomies
            .available_versions(Some(language.unwrap_or(self.default_language)))
    }

    /// The taxonomy for an explicit pair. An absent or empty version means
    /// [`DEFAULT_VERSION`](crate::version::DEFAULT_VERSION); an absent
    /// language means the configured one, else [`Language::DEFAULT`].
    pub fn load_keywords(&self, version: Option<&str>, language: Option<Language>) -> Arc<Taxonomy> {
        self.taxonomies
            .get(version, Some(language.unwrap_or(self.default_language)))
    }

    /// The language used when a caller passes none.
    pub fn default_language(&self) -> Language {
        self.default_language
    }

    /// Resolve once and bind the result for repeated queries.
    pub fn create_context(&self, document: Option<&dyn Document>, path: Option<&Path>) -> KeywordContext {
        let resolution = self.resolve(document, path);
        let taxonomy = self
            .taxonomies
            .get(Some(&resolution.version), Some(resolution.language));
        let origin = path
            .or_else(|| document.and_then(|d| d.path()))
            .map(Path::to_path_buf);
        KeywordContext::new(resolution, taxonomy, origin)
    }

    /// Drop every cached table and projection. Contexts created earlier keep
    /// their taxonomy; later requests reload.
    pub fn reset(&self) {
        self.taxonomies.clear();
        info!("Keyword caches cleared");
    }

    /// Number of (version, language) projections currently cached.
    pub fn cached_taxonomies(&self) -> usize {
        self.taxonomies.cached()
    }

    /// Number of raw language tables currently cached.
    pub fn cached_tables(&self) -> usize {
        self.taxonomies.loader().cached()
    }
}
