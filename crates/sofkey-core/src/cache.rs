//! Projected taxonomies, memoized per (version, language).
//!
//! A requested version missing from the language's table is replaced by the
//! table's declared default before the cache is consulted, so every invalid
//! request for one language shares the default's entry.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, warn};

use crate::language::Language;
use crate::loader::TaxonomyLoader;
use crate::taxonomy::{RawTaxonomy, Taxonomy};
use crate::version::DEFAULT_VERSION;

type CacheKey = (String, Language);

/// Cache of [`Taxonomy`] projections over a [`TaxonomyLoader`].
#[derive(Debug)]
pub struct TaxonomyCache {
    loader: TaxonomyLoader,
    cache: Mutex<HashMap<CacheKey, Arc<Taxonomy>>>,
}

impl TaxonomyCache {
    /// Create an empty cache over `loader`.
    pub fn new(loader: TaxonomyLoader) -> Self {
        Self {
            loader,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// The raw-table loader underneath.
    pub fn loader(&self) -> &TaxonomyLoader {
        &self.loader
    }

    /// Return the taxonomy for `version` in `language`.
    ///
    /// An empty or absent version means [`DEFAULT_VERSION`]; an absent
    /// language means [`Language::DEFAULT`].
    pub fn get(&self, version: Option<&str>, language: Option<Language>) -> Arc<Taxonomy> {
        let language = language.unwrap_or_default();
        let requested = version
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or(DEFAULT_VERSION);

        let raw = self.loader.load(language);
        let version = effective_version(&raw, requested, language);

        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        let key = (version.to_string(), language);
        if let Some(taxonomy) = cache.get(&key) {
            return Arc::clone(taxonomy);
        }

        let taxonomy = Arc::new(Taxonomy::project(&raw, version, language));
        debug!(
            version,
            %language,
            modules = taxonomy.modules().len(),
            "Projected keyword taxonomy"
        );
        cache.insert(key, Arc::clone(&taxonomy));
        taxonomy
    }

    /// Versions listed in the table for `language`, oldest first.
    pub fn available_versions(&self, language: Option<Language>) -> Vec<String> {
        self.loader
            .load(language.unwrap_or_default())
            .versions
            .versions
            .clone()
    }

    /// Drop every projection and every raw table.
    pub fn clear(&self) {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        self.loader.clear();
    }

    /// Number of projections currently cached.
    pub fn cached(&self) -> usize {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

fn effective_version<'a>(raw: &'a RawTaxonomy, requested: &'a str, language: Language) -> &'a str {
    if raw.versions.contains(requested) {
        return requested;
    }
    let fallback = raw.versions.default.as_str();
    warn!(
        requested,
        fallback,
        %language,
        "Version not in keyword table, using table default"
    );
    fallback
}
