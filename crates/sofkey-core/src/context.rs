//! A resolution frozen for a batch of queries.
//!
//! Detection runs once, when the context is created. Every query afterwards
//! goes straight to the shared [`Taxonomy`] for the frozen pair.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::language::Language;
use crate::query::{KeywordMatch, Statistics, Validation};
use crate::resolve::Resolution;
use crate::taxonomy::{ParamMap, Taxonomy};

#[derive(Debug, Clone)]
pub struct KeywordContext {
    resolution: Resolution,
    taxonomy: Arc<Taxonomy>,
    origin: Option<PathBuf>,
}

impl KeywordContext {
    pub(crate) fn new(resolution: Resolution, taxonomy: Arc<Taxonomy>, origin: Option<PathBuf>) -> Self {
        Self {
            resolution,
            taxonomy,
            origin,
        }
    }

    /// The resolved version. May differ from `taxonomy().version()` when the
    /// table did not list it and its default was used instead.
    pub fn version(&self) -> &str {
        &self.resolution.version
    }

    /// The resolved language.
    pub fn language(&self) -> Language {
        self.resolution.language
    }

    /// The frozen (version, language) pair.
    pub fn resolution(&self) -> &Resolution {
        &self.resolution
    }

    /// The path detection ran against, if any.
    pub fn origin(&self) -> Option<&Path> {
        self.origin.as_deref()
    }

    /// The shared taxonomy every query runs against.
    pub fn taxonomy(&self) -> &Arc<Taxonomy> {
        &self.taxonomy
    }

    /// See [`Taxonomy::list_modules`].
    pub fn list_modules(&self) -> Vec<&str> {
        self.taxonomy.list_modules()
    }

    /// See [`Taxonomy::list_commands`].
    pub fn list_commands(&self, module: &str) -> Vec<&str> {
        self.taxonomy.list_commands(module)
    }

    /// See [`Taxonomy::params`].
    pub fn params(&self, module: &str, command: &str) -> Option<&ParamMap> {
        self.taxonomy.params(module, command)
    }

    /// See [`Taxonomy::list_param_names`].
    pub fn list_param_names(&self, module: &str, command: &str) -> Vec<&str> {
        self.taxonomy.list_param_names(module, command)
    }

    /// See [`Taxonomy::enum_values`].
    pub fn enum_values(&self, module: &str, command: &str, param: &str) -> Option<Option<&[String]>> {
        self.taxonomy.enum_values(module, command, param)
    }

    /// See [`Taxonomy::search`].
    pub fn search(&self, term: &str) -> Vec<KeywordMatch> {
        self.taxonomy.search(term)
    }

    /// See [`Taxonomy::validate`].
    pub fn validate(&self, word: &str) -> Option<Validation<'_>> {
        self.taxonomy.validate(word)
    }

    /// See [`Taxonomy::statistics`].
    pub fn statistics(&self) -> Statistics {
        self.taxonomy.statistics()
    }
}
