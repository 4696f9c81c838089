//! Keyword taxonomy types: the raw per-language table and the per-version
//! projection built from it.
//!
//! ## Resource format
//!
//! ```json
//! {
//!   "_meta": { "versions": ["2022", "2023", "2024"], "default": "2024" },
//!   "AQUA": {
//!     "BEAM": { "version": "2023", "params": { "NO": null, "TYPE": ["A", "B"] } },
//!     "NORM": {}
//!   }
//! }
//! ```
//!
//! A command may also be written as a bare array of parameter names (the
//! older, version-less table layout). Every parameter is then free-form.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use crate::language::Language;
use crate::ordered::OrderedMap;
use crate::version::{deserialize_availability, is_available, AvailabilitySpec, VersionTable};

/// Reserved top-level key holding the [`VersionTable`].
pub const META_KEY: &str = "_meta";

/// Allowed values of a parameter. `None` marks a free-form parameter.
pub type EnumValues = Option<Vec<String>>;

/// Parameter name → allowed values, in table order.
pub type ParamMap = OrderedMap<EnumValues>;

/// Command name → parameters.
pub type CommandMap = OrderedMap<ParamMap>;

/// One command of the raw table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "CommandRepr")]
pub struct CommandEntry {
    /// `None` means "available in every version".
    pub availability: Option<AvailabilitySpec>,
    pub params: Option<ParamMap>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CommandRepr {
    Names(Vec<String>),
    Full {
        #[serde(default, rename = "version", deserialize_with = "deserialize_availability")]
        availability: Option<AvailabilitySpec>,
        #[serde(default)]
        params: Option<ParamMap>,
    },
}

impl From<CommandRepr> for CommandEntry {
    fn from(repr: CommandRepr) -> Self {
        match repr {
            CommandRepr::Names(names) => Self {
                availability: None,
                params: Some(names.into_iter().map(|n| (n, None)).collect()),
            },
            CommandRepr::Full {
                availability,
                params,
            } => Self {
                availability,
                params,
            },
        }
    }
}

/// A per-language keyword table exactly as published, immutable once loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTaxonomy {
    pub versions: VersionTable,
    /// Module name → command name → entry. Never contains [`META_KEY`].
    pub modules: OrderedMap<OrderedMap<CommandEntry>>,
}

impl RawTaxonomy {
    /// The stand-in used when a table cannot be read: no modules, no
    /// versions, and the process-wide default version.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse a table from its JSON text.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl<'de> Deserialize<'de> for RawTaxonomy {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(RawTaxonomyVisitor)
    }
}

struct RawTaxonomyVisitor;

impl<'de> Visitor<'de> for RawTaxonomyVisitor {
    type Value = RawTaxonomy;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a keyword table object")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut raw = RawTaxonomy::default();
        while let Some(key) = access.next_key::<String>()? {
            if key == META_KEY {
                raw.versions = access.next_value()?;
            } else {
                let commands = access.next_value()?;
                raw.modules.insert(key, commands);
            }
        }
        Ok(raw)
    }
}

/// The keywords valid for one (version, language) pair.
///
/// Only commands available in `version` are present, with their
/// availability tags stripped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Taxonomy {
    version: String,
    language: Language,
    modules: OrderedMap<CommandMap>,
}

impl Taxonomy {
    /// Project `raw` onto `version`.
    pub fn project(raw: &RawTaxonomy, version: &str, language: Language) -> Self {
        let modules = raw
            .modules
            .iter()
            .map(|(module, commands)| {
                let kept: CommandMap = commands
                    .iter()
                    .filter(|(_, entry)| {
                        is_available(entry.availability.as_ref(), version, &raw.versions)
                    })
                    .map(|(name, entry)| (name, entry.params.clone().unwrap_or_default()))
                    .collect();
                (module, kept)
            })
            .collect();

        Self {
            version: version.to_string(),
            language,
            modules,
        }
    }

    /// The version this taxonomy was projected onto.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// The language of the table this was projected from.
    pub fn language(&self) -> Language {
        self.language
    }

    /// Module name → available commands, in table order.
    pub fn modules(&self) -> &OrderedMap<CommandMap> {
        &self.modules
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const TABLE: &str = r#"{
        "_meta": { "versions": ["2020", "2022", "2024"], "default": "2024" },
        "AQUA": {
            "BEAM": { "version": "2022", "params": { "NO": null, "TYPE": ["A", "B"] } },
            "NORM": {},
            "CONC": { "version": "2020,2024" }
        },
        "SOFIMSHC": {
            "SYST": ["TYPE", "GDIR"]
        }
    }"#;

    #[test]
    fn test_parse_raw_table() {
        let raw = RawTaxonomy::from_json(TABLE).unwrap();
        assert_eq!(raw.versions.versions, vec!["2020", "2022", "2024"]);
        assert_eq!(raw.versions.default, "2024");
        assert_eq!(raw.modules.keys().collect::<Vec<_>>(), vec!["AQUA", "SOFIMSHC"]);

        let beam = raw.modules.get("AQUA").unwrap().get("BEAM").unwrap();
        assert_eq!(beam.availability, Some(AvailabilitySpec::Since("2022".into())));
        let params = beam.params.as_ref().unwrap();
        assert_eq!(params.get("NO"), Some(&None));
        assert_eq!(params.get("TYPE"), Some(&Some(vec!["A".to_string(), "B".to_string()])));
    }

    #[test]
    fn test_meta_key_is_not_a_module() {
        let raw = RawTaxonomy::from_json(TABLE).unwrap();
        assert!(!raw.modules.contains_key(META_KEY));
        let tax = Taxonomy::project(&raw, "2024", Language::En);
        assert!(!tax.modules().contains_key(META_KEY));
    }

    #[test]
    fn test_name_list_commands_are_free_form() {
        let raw = RawTaxonomy::from_json(TABLE).unwrap();
        let syst = raw.modules.get("SOFIMSHC").unwrap().get("SYST").unwrap();
        assert_eq!(syst.availability, None);
        let params = syst.params.as_ref().unwrap();
        assert_eq!(params.keys().collect::<Vec<_>>(), vec!["TYPE", "GDIR"]);
        assert!(params.values().all(Option::is_none));
    }

    #[test]
    fn test_missing_meta_gives_empty_table() {
        let raw = RawTaxonomy::from_json(r#"{ "AQUA": {} }"#).unwrap();
        assert!(raw.versions.is_empty());
        assert_eq!(raw.versions.default, crate::version::DEFAULT_VERSION);
    }

    #[test]
    fn test_project_filters_unavailable_commands() {
        let raw = RawTaxonomy::from_json(TABLE).unwrap();

        let old = Taxonomy::project(&raw, "2020", Language::En);
        let aqua = old.modules().get("AQUA").unwrap();
        assert_eq!(aqua.keys().collect::<Vec<_>>(), vec!["NORM", "CONC"]);

        let mid = Taxonomy::project(&raw, "2022", Language::En);
        let aqua = mid.modules().get("AQUA").unwrap();
        assert_eq!(aqua.keys().collect::<Vec<_>>(), vec!["BEAM", "NORM"]);
        assert!(aqua.get("NORM").unwrap().is_empty());
    }

    #[test]
    fn test_project_keeps_empty_modules() {
        let raw = RawTaxonomy::from_json(
            r#"{ "_meta": { "versions": ["2020", "2024"] }, "TALPA": { "X": { "version": "2024" } } }"#,
        )
        .unwrap();
        let tax = Taxonomy::project(&raw, "2020", Language::De);
        assert!(tax.modules().get("TALPA").unwrap().is_empty());
        assert_eq!(tax.language(), Language::De);
        assert_eq!(tax.version(), "2020");
    }

    #[test]
    fn test_corrupt_json_is_an_error() {
        assert!(RawTaxonomy::from_json("{ not json").is_err());
        assert!(RawTaxonomy::from_json("[1, 2]").is_err());
    }
}
