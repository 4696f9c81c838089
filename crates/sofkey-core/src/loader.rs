//! Raw keyword table loading, memoized per language.
//!
//! A table that cannot be read or parsed is replaced by
//! [`RawTaxonomy::empty`]. The replacement is cached like a real table, so a
//! broken resource is retried only after [`TaxonomyLoader::clear`].

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, warn};

use crate::language::Language;
use crate::taxonomy::RawTaxonomy;

/// Errors from reading or parsing a raw table. Logged, never returned past
/// the loader.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read keyword table: {0}")]
    Io(#[from] io::Error),

    #[error("failed to parse keyword table: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Where raw per-language tables come from.
pub trait TaxonomySource: Send + Sync {
    /// Return the JSON text of the table for `language`.
    fn read(&self, language: Language) -> io::Result<String>;
}

/// Reads `<dir>/keywords_<code>.json`.
#[derive(Debug, Clone)]
pub struct DirSource {
    dir: PathBuf,
}

impl DirSource {
    /// Read tables from `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The directory tables are read from.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the table for `language`.
    pub fn path_for(&self, language: Language) -> PathBuf {
        self.dir.join(format!("keywords_{}.json", language.code()))
    }
}

impl TaxonomySource for DirSource {
    fn read(&self, language: Language) -> io::Result<String> {
        std::fs::read_to_string(self.path_for(language))
    }
}

/// Serves tables from memory. Languages without a table read as not found.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    tables: HashMap<Language, String>,
}

impl StaticSource {
    /// Create a source with no tables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the JSON table for `language`.
    pub fn with_table(mut self, language: Language, json: impl Into<String>) -> Self {
        self.tables.insert(language, json.into());
        self
    }
}

impl TaxonomySource for StaticSource {
    fn read(&self, language: Language) -> io::Result<String> {
        self.tables.get(&language).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no keyword table for {language}"),
            )
        })
    }
}

/// Per-language cache in front of a [`TaxonomySource`].
pub struct TaxonomyLoader {
    source: Box<dyn TaxonomySource>,
    cache: Mutex<HashMap<Language, Arc<RawTaxonomy>>>,
}

impl TaxonomyLoader {
    /// Create an empty cache over `source`.
    pub fn new(source: Box<dyn TaxonomySource>) -> Self {
        Self {
            source,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Return the raw table for `language`, reading it on first use.
    ///
    /// The cache lock is held across the read so two callers cannot load the
    /// same language twice.
    pub fn load(&self, language: Language) -> Arc<RawTaxonomy> {
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(raw) = cache.get(&language) {
            return Arc::clone(raw);
        }

        let raw = match self.read(language) {
            Ok(raw) => {
                debug!(
                    %language,
                    modules = raw.modules.len(),
                    versions = raw.versions.versions.len(),
                    "Loaded keyword table"
                );
                raw
            }
            Err(e) => {
                warn!(%language, error = %e, "Keyword table unavailable, using empty taxonomy");
                RawTaxonomy::empty()
            }
        };

        let raw = Arc::new(raw);
        cache.insert(language, Arc::clone(&raw));
        raw
    }

    fn read(&self, language: Language) -> Result<RawTaxonomy, LoadError> {
        let json = self.source.read(language)?;
        Ok(RawTaxonomy::from_json(&json)?)
    }

    /// Drop every cached table.
    pub fn clear(&self) {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Number of languages currently cached.
    pub fn cached(&self) -> usize {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

impl std::fmt::Debug for TaxonomyLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaxonomyLoader")
            .field("cached", &self.cached())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    const EN: &str = r#"{
        "_meta": { "versions": ["2022", "2024"], "default": "2024" },
        "AQUA": { "NORM": {} }
    }"#;

    struct Counting {
        inner: StaticSource,
        reads: Arc<AtomicUsize>,
    }

    impl TaxonomySource for Counting {
        fn read(&self, language: Language) -> io::Result<String> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            self.inner.read(language)
        }
    }

    fn counting_loader(source: StaticSource) -> (TaxonomyLoader, Arc<AtomicUsize>) {
        let reads = Arc::new(AtomicUsize::new(0));
        let loader = TaxonomyLoader::new(Box::new(Counting {
            inner: source,
            reads: Arc::clone(&reads),
        }));
        (loader, reads)
    }

    #[test]
    fn test_load_is_memoized() {
        let (loader, reads) = counting_loader(StaticSource::new().with_table(Language::En, EN));

        let first = loader.load(Language::En);
        let second = loader.load(Language::En);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(reads.load(Ordering::SeqCst), 1);
        assert_eq!(first.versions.versions, vec!["2022", "2024"]);
    }

    #[test_log::test]
    fn test_missing_table_is_empty_and_cached() {
        let (loader, reads) = counting_loader(StaticSource::new());

        let raw = loader.load(Language::De);
        assert!(raw.modules.is_empty());
        assert!(raw.versions.is_empty());
        assert_eq!(raw.versions.default, crate::version::DEFAULT_VERSION);

        loader.load(Language::De);
        assert_eq!(reads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_corrupt_table_is_empty() {
        let (loader, _) =
            counting_loader(StaticSource::new().with_table(Language::En, "{ \"AQUA\": [1, 2"));
        let raw = loader.load(Language::En);
        assert_eq!(*raw, RawTaxonomy::empty());
    }

    #[test]
    fn test_clear_retries_once() {
        let (loader, reads) = counting_loader(StaticSource::new().with_table(Language::En, EN));
        loader.load(Language::En);
        loader.clear();
        assert_eq!(loader.cached(), 0);

        loader.load(Language::En);
        loader.load(Language::En);
        assert_eq!(reads.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_languages_are_cached_separately() {
        let (loader, reads) = counting_loader(
            StaticSource::new()
                .with_table(Language::En, EN)
                .with_table(Language::De, r#"{ "AQUA": {}, "SOFILOAD": {} }"#),
        );
        assert_eq!(loader.load(Language::En).modules.len(), 1);
        assert_eq!(loader.load(Language::De).modules.len(), 2);
        assert_eq!(reads.load(Ordering::SeqCst), 2);
        assert_eq!(loader.cached(), 2);
    }

    #[test]
    fn test_dir_source_reads_per_language_file() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("keywords_en.json"), EN).unwrap();

        let source = DirSource::new(tmp.path());
        assert_eq!(source.dir(), tmp.path());
        assert_eq!(source.path_for(Language::De), tmp.path().join("keywords_de.json"));
        assert!(source.read(Language::En).is_ok());
        assert_eq!(
            source.read(Language::De).unwrap_err().kind(),
            io::ErrorKind::NotFound
        );
    }
}
