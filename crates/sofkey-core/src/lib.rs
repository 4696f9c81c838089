#![deny(unsafe_code)]

//! Keyword resolution for SOFiSTiK input decks.
//!
//! Given a document or a path, works out which program version and natural
//! language apply, loads the matching keyword taxonomy (modules → commands
//! → parameters → allowed values), and answers lookup, validation, search,
//! and statistics queries against it.
//!
//! ## Flow
//!
//! ```text
//! caller ─▶ Resolver ──▶ TaxonomyCache ──▶ Taxonomy ──▶ query
//!            │  Detector      │  TaxonomyLoader
//!            │  ConfigSource  │  AvailabilitySpec
//!            ▼                ▼
//!        KeywordContext freezes the resolved pair for repeated queries
//! ```
//!
//! [`KeywordService`] owns both caches and is the entry point.

/// Per-(version, language) taxonomy cache.
pub mod cache;
/// A frozen resolution bound to its taxonomy.
pub mod context;
/// First-line marker and sidecar detection.
pub mod detect;
/// Document and filesystem capabilities.
pub mod document;
/// Supported languages and alias normalization.
pub mod language;
/// Raw keyword table loading.
pub mod loader;
/// Diagnostic event collector for hosts.
pub mod logging;
/// Insertion-ordered map used throughout the taxonomy.
pub mod ordered;
/// Lookup, search, validation, and statistics over a taxonomy.
pub mod query;
/// Fallback rules from detection to a complete pair.
pub mod resolve;
/// The service facade.
pub mod service;
/// Raw and projected taxonomy types.
pub mod taxonomy;
/// Version tables and availability tags.
pub mod version;

pub use context::KeywordContext;
pub use detect::{Detection, Detector};
pub use document::{Document, FileSystem, OsFileSystem, TextDocument};
pub use language::Language;
pub use loader::{DirSource, StaticSource, TaxonomySource};
pub use logging::{Diagnostic, DiagnosticCollector, DiagnosticReader};
pub use query::{KeywordMatch, MatchKind, Statistics, Validation};
pub use resolve::Resolution;
pub use service::KeywordService;
pub use taxonomy::{ParamMap, Taxonomy};
pub use version::{AvailabilitySpec, VersionTable, DEFAULT_VERSION};
