//! Taxonomy fixtures.
//!
//! [`TaxonomyFixture`] owns a temp directory laid out like a real install:
//! `data/keywords_<lang>.json` tables plus a `work/` tree for decks and
//! sidecar files. It is deleted when the fixture is dropped.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use sofkey_config::AppConfig;
use sofkey_core::{DirSource, Document, KeywordService, Language, TaxonomySource};
use tempfile::TempDir;

use crate::config::TestConfigBuilder;

/// English sample table.
///
/// `SOFIMSHC` comes first and has a parameter named `BEAM`, so a command
/// named `BEAM` further down can be checked to win validation.
pub const SAMPLE_EN: &str = r#"{
  "_meta": {
    "versions": ["2018", "2020", "2022", "2023", "2024", "2025", "2026"],
    "default": "2025"
  },
  "SOFIMSHC": {
    "SYST": { "params": { "TYPE": ["SPAC", "GIRD", "FRAM"], "BEAM": null } },
    "GDIV": {}
  },
  "AQUA": {
    "BEAM": { "version": "2020-2024", "params": { "NO": null, "TYPE": ["I", "T", "BOX"] } },
    "CONC": { "params": { "NO": null, "TYPE": ["C", "B", "LC"] } },
    "STEE": { "version": "2022", "params": { "NO": null, "TYPE": ["S", "B"] } },
    "OLD": { "version": "2020,2024" },
    "NORM": { "params": { "DC": ["EN", "DIN", "SIA"] } }
  },
  "SOFILOAD": {
    "LC": { "params": { "NO": null, "TYPE": ["G", "Q", "P"] } },
    "LOAD": ["TYPE", "P1"]
  }
}"#;

/// German sample table. Covers fewer versions than [`SAMPLE_EN`].
pub const SAMPLE_DE: &str = r#"{
  "_meta": { "versions": ["2022", "2024"], "default": "2024" },
  "AQUA": {
    "BETO": { "params": { "NR": null, "ART": ["C", "B"] } },
    "NORM": { "version": "2024", "params": { "DC": ["EN", "DIN"] } }
  }
}"#;

/// A document double with a fixed first line.
#[derive(Debug, Clone, Default)]
pub struct FakeDocument {
    path: Option<PathBuf>,
    first_line: String,
}

impl FakeDocument {
    /// A pathless document whose line 0 is `first_line`.
    pub fn new(first_line: &str) -> Self {
        Self {
            path: None,
            first_line: first_line.to_string(),
        }
    }

    /// Place the document at `path`.
    pub fn at(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }
}

impl Document for FakeDocument {
    fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn first_line(&self) -> String {
        self.first_line.clone()
    }
}

/// Wraps a [`TaxonomySource`], counting reads per language.
pub struct CountingSource<S> {
    inner: S,
    reads: Arc<Mutex<HashMap<Language, usize>>>,
    total: Arc<AtomicUsize>,
}

/// Read counters shared with a [`CountingSource`].
#[derive(Debug, Clone)]
pub struct ReadCounter {
    reads: Arc<Mutex<HashMap<Language, usize>>>,
    total: Arc<AtomicUsize>,
}

impl ReadCounter {
    /// Reads of the table for `language` so far.
    pub fn reads(&self, language: Language) -> usize {
        self.reads
            .lock()
            .map(|r| r.get(&language).copied().unwrap_or(0))
            .unwrap_or(0)
    }

    /// Reads across all languages so far.
    pub fn total(&self) -> usize {
        self.total.load(Ordering::SeqCst)
    }
}

impl<S: TaxonomySource> CountingSource<S> {
    /// Wrap `inner`, returning the shared counter.
    pub fn new(inner: S) -> (Self, ReadCounter) {
        let reads = Arc::new(Mutex::new(HashMap::new()));
        let total = Arc::new(AtomicUsize::new(0));
        let counter = ReadCounter {
            reads: Arc::clone(&reads),
            total: Arc::clone(&total),
        };
        (Self { inner, reads, total }, counter)
    }
}

impl<S: TaxonomySource> TaxonomySource for CountingSource<S> {
    fn read(&self, language: Language) -> io::Result<String> {
        self.total.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut reads) = self.reads.lock() {
            *reads.entry(language).or_default() += 1;
        }
        self.inner.read(language)
    }
}

/// On-disk tables and work directory for end-to-end tests.
pub struct TaxonomyFixture {
    dir: TempDir,
}

impl TaxonomyFixture {
    /// Fixture with [`SAMPLE_EN`] and [`SAMPLE_DE`] installed.
    pub fn new() -> Self {
        let fixture = Self::empty();
        fixture.write_table(Language::En, SAMPLE_EN);
        fixture.write_table(Language::De, SAMPLE_DE);
        fixture
    }

    /// Fixture with no tables at all.
    pub fn empty() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        std::fs::create_dir_all(dir.path().join("data")).expect("failed to create data dir");
        std::fs::create_dir_all(dir.path().join("work")).expect("failed to create work dir");
        Self { dir }
    }

    /// Directory holding `keywords_<lang>.json`.
    pub fn data_dir(&self) -> PathBuf {
        self.dir.path().join("data")
    }

    /// Directory for decks and sidecars.
    pub fn work_dir(&self) -> PathBuf {
        self.dir.path().join("work")
    }

    /// Overwrite the table for `language` with raw text (need not be JSON).
    pub fn write_table(&self, language: Language, contents: &str) {
        let path = DirSource::new(self.data_dir()).path_for(language);
        std::fs::write(path, contents).expect("failed to write keyword table");
    }

    /// Write a deck under `work/`, creating parent directories.
    pub fn write_document(&self, relative: impl AsRef<Path>, text: &str) -> PathBuf {
        let path = self.work_dir().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("failed to create document dir");
        }
        std::fs::write(&path, text).expect("failed to write document");
        path
    }

    /// Write `sofistik.def` into `work/<relative_dir>`; `""` means `work/`.
    pub fn write_sidecar(&self, relative_dir: &str, text: &str) -> PathBuf {
        self.write_document(Path::new(relative_dir).join("sofistik.def"), text)
    }

    /// Config pointing at this fixture's data directory.
    pub fn config(&self) -> AppConfig {
        self.config_builder().build()
    }

    /// Builder preset to this fixture's data directory.
    pub fn config_builder(&self) -> TestConfigBuilder {
        TestConfigBuilder::new().data_dir(&self.data_dir())
    }

    /// A service over this fixture with default config.
    pub fn service(&self) -> KeywordService {
        KeywordService::new(&self.config())
    }
}

impl Default for TaxonomyFixture {
    fn default() -> Self {
        Self::new()
    }
}
