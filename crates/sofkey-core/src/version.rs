//! Version tables and command availability.
//!
//! Version identifiers are opaque strings. Their order is their position in
//! the per-language [`VersionTable`]; no numeric comparison is ever made.

use serde::{Deserialize, Deserializer, Serialize};

/// Version used when neither detection, configuration, nor a table supplies one.
pub const DEFAULT_VERSION: &str = "2025";

/// The ordered list of versions a keyword table covers, plus its default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionTable {
    /// Supported versions, oldest first.
    #[serde(default)]
    pub versions: Vec<String>,

    /// Version used when a requested one is not in `versions`.
    #[serde(default = "default_version")]
    pub default: String,
}

fn default_version() -> String {
    DEFAULT_VERSION.to_string()
}

impl Default for VersionTable {
    fn default() -> Self {
        Self {
            versions: Vec::new(),
            default: default_version(),
        }
    }
}

impl VersionTable {
    /// Create a table from versions in order and its default.
    pub fn new(versions: Vec<String>, default: impl Into<String>) -> Self {
        Self {
            versions,
            default: default.into(),
        }
    }

    /// Position of `version` in the table, or `-1` when absent.
    ///
    /// The `-1` takes part in range comparisons like any other index.
    pub fn position(&self, version: &str) -> isize {
        self.versions
            .iter()
            .position(|v| v == version)
            .map_or(-1, |i| i as isize)
    }

    /// Whether `version` is listed.
    pub fn contains(&self, version: &str) -> bool {
        self.versions.iter().any(|v| v == version)
    }

    /// Whether the table lists no versions at all.
    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }
}

/// Which versions a command is available in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AvailabilitySpec {
    /// `"2022"`: that version and every later one.
    Since(String),
    /// `"2020,2024"`: exactly the listed versions.
    List(Vec<String>),
    /// `"2020-2024"`: both bounds inclusive, by table position.
    Range(String, String),
}

impl AvailabilitySpec {
    /// Parse a raw availability tag. Blank tags mean "always available" and
    /// yield `None`.
    pub fn parse(tag: &str) -> Option<Self> {
        let tag = tag.trim();
        if tag.is_empty() {
            return None;
        }
        if tag.contains(',') {
            let versions = tag.split(',').map(|v| v.trim().to_string()).collect();
            return Some(Self::List(versions));
        }
        if let Some((start, end)) = tag.split_once('-') {
            return Some(Self::Range(start.trim().to_string(), end.trim().to_string()));
        }
        Some(Self::Since(tag.to_string()))
    }

    /// Whether `target` is covered by this spec under `table`'s ordering.
    ///
    /// Bounds or targets missing from the table sit at index `-1`. A reversed
    /// range is evaluated as written.
    pub fn covers(&self, target: &str, table: &VersionTable) -> bool {
        match self {
            Self::List(versions) => versions.iter().any(|v| v == target),
            Self::Range(start, end) => {
                let t = table.position(target);
                table.position(start) <= t && t <= table.position(end)
            }
            Self::Since(start) => table.position(target) >= table.position(start),
        }
    }
}

impl std::fmt::Display for AvailabilitySpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Since(v) => f.write_str(v),
            Self::List(vs) => f.write_str(&vs.join(",")),
            Self::Range(a, b) => write!(f, "{a}-{b}"),
        }
    }
}

/// Whether a command tagged with `spec` exists in `target`.
///
/// Untagged commands are available everywhere, including versions the table
/// does not list.
pub fn is_available(spec: Option<&AvailabilitySpec>, target: &str, table: &VersionTable) -> bool {
    spec.is_none_or(|s| s.covers(target, table))
}

/// Serde adapter: read an optional tag string straight into a spec.
pub(crate) fn deserialize_availability<'de, D>(
    deserializer: D,
) -> Result<Option<AvailabilitySpec>, D::Error>
where
    D: Deserializer<'de>,
{
    let tag = Option::<String>::deserialize(deserializer)?;
    Ok(tag.as_deref().and_then(AvailabilitySpec::parse))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn table() -> VersionTable {
        VersionTable::new(
            ["2018", "2020", "2022", "2023", "2024", "2025", "2026"]
                .map(String::from)
                .to_vec(),
            "2025",
        )
    }

    fn available_in(tag: &str) -> Vec<&'static str> {
        let spec = AvailabilitySpec::parse(tag);
        ["2018", "2020", "2022", "2023", "2024", "2025", "2026"]
            .into_iter()
            .filter(|v| is_available(spec.as_ref(), v, &table()))
            .collect()
    }

    #[test]
    fn test_parse_forms() {
        assert_eq!(AvailabilitySpec::parse("2022"), Some(AvailabilitySpec::Since("2022".into())));
        assert_eq!(
            AvailabilitySpec::parse("2020, 2024"),
            Some(AvailabilitySpec::List(vec!["2020".into(), "2024".into()]))
        );
        assert_eq!(
            AvailabilitySpec::parse("2020-2024"),
            Some(AvailabilitySpec::Range("2020".into(), "2024".into()))
        );
        assert_eq!(AvailabilitySpec::parse("   "), None);
    }

    #[test]
    fn test_range_is_inclusive_by_table_order() {
        assert_eq!(available_in("2020-2024"), vec!["2020", "2022", "2023", "2024"]);
    }

    #[test]
    fn test_list_is_exact() {
        assert_eq!(available_in("2020,2024"), vec!["2020", "2024"]);
    }

    #[test]
    fn test_single_means_onward() {
        assert_eq!(available_in("2022"), vec!["2022", "2023", "2024", "2025", "2026"]);
    }

    #[test]
    fn test_untagged_is_always_available() {
        let t = table();
        for v in ["2018", "2026", "1999", "", "nonsense"] {
            assert!(is_available(None, v, &t), "{v:?}");
        }
        assert!(is_available(None, "2024", &VersionTable::default()));
    }

    #[test]
    fn test_unknown_target_is_before_known_start() {
        let spec = AvailabilitySpec::parse("2022");
        assert!(!is_available(spec.as_ref(), "2030", &table()));
    }

    #[test]
    fn test_unknown_start_covers_everything_onward() {
        let spec = AvailabilitySpec::parse("1990");
        assert!(is_available(spec.as_ref(), "2018", &table()));
    }

    #[test]
    fn test_inverted_range_is_not_guarded() {
        assert!(available_in("2024-2020").is_empty());
        assert_eq!(available_in("2023-2023"), vec!["2023"]);
    }

    #[test]
    fn test_position_ignores_numeric_value() {
        let t = VersionTable::new(vec!["b".into(), "a".into()], "a");
        assert_eq!(t.position("b"), 0);
        assert_eq!(t.position("a"), 1);
        assert_eq!(t.position("c"), -1);
        assert!(is_available(AvailabilitySpec::parse("b").as_ref(), "a", &t));
    }

    #[test]
    fn test_display_round_trips_tag() {
        for tag in ["2022", "2020,2024", "2020-2024"] {
            assert_eq!(AvailabilitySpec::parse(tag).unwrap().to_string(), tag);
        }
    }
}
