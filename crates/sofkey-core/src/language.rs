//! Natural languages the keyword tables are published in.

use serde::{Deserialize, Serialize};
use sofkey_config::{ENGLISH_ALIASES, GERMAN_ALIASES};

/// A supported keyword-table language.
///
/// Raw strings never reach a cache key: everything goes through
/// [`Language::normalize`] first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    De,
}

impl Language {
    /// Every supported language, in table order.
    pub const ALL: [Language; 2] = [Language::En, Language::De];

    /// The language used when nothing else applies.
    pub const DEFAULT: Language = Language::En;

    /// Map a code or alias (case-insensitive, surrounding whitespace ignored)
    /// to a language. Unknown input yields `None`.
    pub fn normalize(input: &str) -> Option<Self> {
        let input = input.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|language| language.aliases().contains(&input.as_str()))
    }

    /// Accepted lower-case aliases, code first.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            Language::En => ENGLISH_ALIASES,
            Language::De => GERMAN_ALIASES,
        }
    }

    /// Two-letter lower-case code.
    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::De => "de",
        }
    }
}

impl Default for Language {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::normalize(s).ok_or_else(|| UnknownLanguage(s.to_string()))
    }
}

/// Returned when parsing a string that is not a known language alias.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown language: {0:?}")]
pub struct UnknownLanguage(pub String);
