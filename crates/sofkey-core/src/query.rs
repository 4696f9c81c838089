//! Read-only queries over a projected [`Taxonomy`].
//!
//! "Not found" is an ordinary answer here: lookups return `None` or an
//! empty list, never an error.

use serde::Serialize;

use crate::ordered::OrderedMap;
use crate::taxonomy::{ParamMap, Taxonomy};

/// What part of the taxonomy a [`KeywordMatch`] hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    Command,
    Param,
}

/// One substring-search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeywordMatch {
    pub kind: MatchKind,
    pub module: String,
    pub command: String,
    /// Set for [`MatchKind::Param`] hits.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub param: Option<String>,
}

/// Result of an exact keyword check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Validation<'a> {
    Command {
        module: &'a str,
        command: &'a str,
        params: &'a ParamMap,
    },
    Param {
        module: &'a str,
        command: &'a str,
        param: &'a str,
        values: Option<&'a [String]>,
    },
}

impl Validation<'_> {
    /// Whether a command or a parameter matched.
    pub fn kind(&self) -> MatchKind {
        match self {
            Validation::Command { .. } => MatchKind::Command,
            Validation::Param { .. } => MatchKind::Param,
        }
    }
}

/// Per-module counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ModuleStats {
    pub commands: usize,
    pub params: usize,
}

/// Aggregate counts over a taxonomy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Statistics {
    pub modules: usize,
    pub commands: usize,
    /// Free-form parameters count as one each.
    pub params: usize,
    pub per_module: OrderedMap<ModuleStats>,
}

impl Taxonomy {
    /// Module names in table order.
    pub fn list_modules(&self) -> Vec<&str> {
        self.modules().keys().collect()
    }

    /// Command names of `module`; empty when the module is absent.
    pub fn list_commands(&self, module: &str) -> Vec<&str> {
        self.modules()
            .get(module)
            .map(|commands| commands.keys().collect())
            .unwrap_or_default()
    }

    /// Parameter map of a command; `None` when either name is absent.
    pub fn params(&self, module: &str, command: &str) -> Option<&ParamMap> {
        self.modules().get(module)?.get(command)
    }

    /// Parameter names of a command; empty when absent.
    pub fn list_param_names(&self, module: &str, command: &str) -> Vec<&str> {
        self.params(module, command)
            .map(|params| params.keys().collect())
            .unwrap_or_default()
    }

    /// Allowed values of a parameter.
    ///
    /// The outer `Option` is key presence; the inner one is the declared
    /// value set, `None` for free-form parameters. `Some(None)` and `None`
    /// are different answers.
    pub fn enum_values(&self, module: &str, command: &str, param: &str) -> Option<Option<&[String]>> {
        self.params(module, command)?
            .get(param)
            .map(|values| values.as_deref())
    }

    /// Case-insensitive substring search over command and parameter names.
    ///
    /// Hits come in module, command, parameter traversal order. A parameter
    /// name shared by several commands yields one hit per command.
    pub fn search(&self, term: &str) -> Vec<KeywordMatch> {
        let needle = term.to_lowercase();
        let mut matches = Vec::new();

        for (module, commands) in self.modules().iter() {
            for (command, params) in commands.iter() {
                if command.to_lowercase().contains(&needle) {
                    matches.push(KeywordMatch {
                        kind: MatchKind::Command,
                        module: module.to_string(),
                        command: command.to_string(),
                        param: None,
                    });
                }
                for param in params.keys() {
                    if param.to_lowercase().contains(&needle) {
                        matches.push(KeywordMatch {
                            kind: MatchKind::Param,
                            module: module.to_string(),
                            command: command.to_string(),
                            param: Some(param.to_string()),
                        });
                    }
                }
            }
        }

        matches
    }

    /// Exact, case-insensitive keyword check. Surrounding whitespace is part
    /// of the word, so `" BEAM"` matches nothing.
    ///
    /// Any command match wins over every parameter match, whatever the
    /// traversal order.
    pub fn validate(&self, word: &str) -> Option<Validation<'_>> {
        let word = word.to_uppercase();

        for (module, commands) in self.modules().iter() {
            if let Some((command, params)) = commands.iter().find(|(c, _)| *c == word) {
                return Some(Validation::Command {
                    module,
                    command,
                    params,
                });
            }
        }

        for (module, commands) in self.modules().iter() {
            for (command, params) in commands.iter() {
                if let Some((param, values)) = params.iter().find(|(p, _)| *p == word) {
                    return Some(Validation::Param {
                        module,
                        command,
                        param,
                        values: values.as_deref(),
                    });
                }
            }
        }

        None
    }

    /// Module, command, and parameter counts.
    pub fn statistics(&self) -> Statistics {
        let mut stats = Statistics {
            modules: self.modules().len(),
            ..Statistics::default()
        };

        for (module, commands) in self.modules().iter() {
            let module_stats = ModuleStats {
                commands: commands.len(),
                params: commands.values().map(|params| params.len()).sum(),
            };
            stats.commands += module_stats.commands;
            stats.params += module_stats.params;
            stats.per_module.insert(module, module_stats);
        }

        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::Language;
    use crate::taxonomy::RawTaxonomy;
    use pretty_assertions::assert_eq;

    fn taxonomy() -> Taxonomy {
        let raw = RawTaxonomy::from_json(
            r#"{
                "_meta": { "versions": ["2024"], "default": "2024" },
                "SOFIMSHC": {
                    "SYST": { "params": { "BEAM": null, "TYPE": ["SPAC", "GIRD"] } }
                },
                "AQUA": {
                    "BEAM": { "params": { "NO": null, "TYPE": ["A", "B"] } },
                    "CONC": { "params": { "NO": null, "TYPE": [] } },
                    "NORM": {}
                }
            }"#,
        )
        .unwrap();
        Taxonomy::project(&raw, "2024", Language::En)
    }

    #[test]
    fn test_listing() {
        let tax = taxonomy();
        assert_eq!(tax.list_modules(), vec!["SOFIMSHC", "AQUA"]);
        assert_eq!(tax.list_commands("AQUA"), vec!["BEAM", "CONC", "NORM"]);
        assert!(tax.list_commands("MISSING").is_empty());
        assert_eq!(tax.list_param_names("AQUA", "BEAM"), vec!["NO", "TYPE"]);
        assert!(tax.list_param_names("AQUA", "NORM").is_empty());
        assert!(tax.list_param_names("AQUA", "MISSING").is_empty());
    }

    #[test]
    fn test_params_lookup() {
        let tax = taxonomy();
        assert_eq!(tax.params("AQUA", "BEAM").map(|p| p.len()), Some(2));
        assert!(tax.params("AQUA", "NORM").unwrap().is_empty());
        assert!(tax.params("AQUA", "NOPE").is_none());
        assert!(tax.params("NOPE", "BEAM").is_none());
    }

    #[test]
    fn test_enum_values_distinguishes_free_form_from_missing() {
        let tax = taxonomy();
        let values = ["A".to_string(), "B".to_string()];
        assert_eq!(tax.enum_values("AQUA", "BEAM", "TYPE"), Some(Some(&values[..])));
        assert_eq!(tax.enum_values("AQUA", "BEAM", "NO"), Some(None));
        assert_eq!(tax.enum_values("AQUA", "BEAM", "NONEXISTENT"), None);
        let empty: &[String] = &[];
        assert_eq!(tax.enum_values("AQUA", "CONC", "TYPE"), Some(Some(empty)));
    }

    #[test]
    fn test_search_order_and_duplicates() {
        let tax = taxonomy();
        let hits = tax.search("type");
        let hits: Vec<(&str, &str, Option<&str>)> = hits
            .iter()
            .map(|m| (m.module.as_str(), m.command.as_str(), m.param.as_deref()))
            .collect();
        assert_eq!(
            hits,
            vec![
                ("SOFIMSHC", "SYST", Some("TYPE")),
                ("AQUA", "BEAM", Some("TYPE")),
                ("AQUA", "CONC", Some("TYPE")),
            ]
        );
    }

    #[test]
    fn test_search_matches_commands_and_params() {
        let tax = taxonomy();
        let hits = tax.search("bEa");
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].kind, MatchKind::Param);
        assert_eq!(hits[0].module, "SOFIMSHC");
        assert_eq!(hits[1].kind, MatchKind::Command);
        assert_eq!(hits[1].command, "BEAM");
        assert_eq!(hits[1].param, None);
        assert!(tax.search("zzz").is_empty());
    }

    #[test]
    fn test_validate_prefers_commands() {
        let tax = taxonomy();
        match tax.validate("beam") {
            Some(Validation::Command {
                module,
                command,
                params,
            }) => {
                assert_eq!(module, "AQUA");
                assert_eq!(command, "BEAM");
                assert_eq!(params.len(), 2);
            }
            other => panic!("expected command match, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_param() {
        let tax = taxonomy();
        let hit = tax.validate("type").unwrap();
        assert_eq!(hit.kind(), MatchKind::Param);
        let Validation::Param {
            module,
            command,
            values,
            ..
        } = hit
        else {
            unreachable!()
        };
        assert_eq!((module, command), ("SOFIMSHC", "SYST"));
        assert_eq!(values.map(<[String]>::len), Some(2));

        let Some(Validation::Param { values, .. }) = tax.validate("NO") else {
            panic!("expected param match");
        };
        assert_eq!(values, None);
        assert_eq!(tax.validate("UNKNOWN"), None);
        assert_eq!(tax.validate("BEA"), None);
        assert_eq!(tax.validate(" NO"), None);
    }

    #[test]
    fn test_statistics() {
        let stats = taxonomy().statistics();
        assert_eq!(stats.modules, 2);
        assert_eq!(stats.commands, 4);
        assert_eq!(stats.params, 6);
        assert_eq!(stats.per_module.get("AQUA"), Some(&ModuleStats { commands: 3, params: 4 }));
        assert_eq!(stats.per_module.get("SOFIMSHC"), Some(&ModuleStats { commands: 1, params: 2 }));
    }
}
