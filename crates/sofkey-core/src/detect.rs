//! Version and language detection from a document and its surroundings.
//!
//! Two signals are consulted, first match wins per field:
//!
//! 1. The document's first line, e.g. `@ SOFiSTiK 2024 DE`. Only read when
//!    the document is the file being asked about.
//! 2. A sidecar definition file (`sofistik.def` by default) next to the file,
//!    containing a line such as `SOF_VERSION = 2022`. Only consulted for the
//!    version.
//!
//! Fields nothing matched stay `None`; defaults are the resolver's business.

use std::path::Path;
use std::sync::{Arc, LazyLock};

use regex::Regex;
use serde::Serialize;
use tracing::debug;

use crate::document::{Document, FileSystem};
use crate::language::Language;

static MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*@\s*SOFiSTiK\s*(\d{1,4})(?:-\d{1,2})?(?:\s+([a-z]{2}))?\b")
        .expect("marker pattern is valid")
});

static SIDECAR_VERSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?im)^\s*(?:set\s+)?SOF_VERSION\s*=\s*"?(\d{1,4})\b"#)
        .expect("sidecar pattern is valid")
});

/// Whatever detection found. Either field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Detection {
    pub version: Option<String>,
    pub language: Option<Language>,
}

/// Parse a first-line marker into `(version, language)`.
///
/// The `-N` service-pack suffix is accepted and dropped. An unrecognized
/// two-letter code yields no language.
pub fn parse_marker(line: &str) -> Option<(String, Option<Language>)> {
    let caps = MARKER.captures(line)?;
    let version = caps[1].to_string();
    let language = caps
        .get(2)
        .and_then(|m| Language::normalize(m.as_str()));
    Some((version, language))
}

/// Find the `SOF_VERSION` assignment in sidecar text.
pub fn parse_sidecar(text: &str) -> Option<String> {
    SIDECAR_VERSION
        .captures(text)
        .map(|caps| caps[1].to_string())
}

/// Runs the detection heuristics against a [`FileSystem`].
#[derive(Clone)]
pub struct Detector {
    fs: Arc<dyn FileSystem>,
    sidecar: String,
}

impl Detector {
    /// Detect through `fs`, looking for sidecars named `sidecar`.
    pub fn new(fs: Arc<dyn FileSystem>, sidecar: impl Into<String>) -> Self {
        Self {
            fs,
            sidecar: sidecar.into(),
        }
    }

    /// Detect version and language for `path`, or for `document` when no
    /// path is given.
    ///
    /// A document whose own path differs from `path` is not consulted, so
    /// a marker in an unrelated open buffer is never attributed to `path`.
    pub fn detect(&self, document: Option<&dyn Document>, path: Option<&Path>) -> Detection {
        let mut detection = Detection::default();
        let document_path = document.and_then(|d| d.path());

        if let Some(document) = document {
            let same_target = match path {
                None => true,
                Some(path) => document_path == Some(path),
            };
            if same_target && let Some((version, language)) = parse_marker(&document.first_line()) {
                detection.version = Some(version);
                detection.language = language;
            }
        }

        if detection.version.is_none() {
            let target = path.or(document_path);
            if let Some(dir) = target.and_then(Path::parent) {
                detection.version = self.sidecar_version(dir);
            }
        }

        detection
    }

    fn sidecar_version(&self, dir: &Path) -> Option<String> {
        let sidecar = dir.join(&self.sidecar);
        if !self.fs.exists(&sidecar) {
            return None;
        }
        match self.fs.read_to_string(&sidecar) {
            Ok(text) => {
                let version = parse_sidecar(&text);
                debug!(path = %sidecar.display(), ?version, "Read sidecar definition file");
                version
            }
            Err(e) => {
                debug!(path = %sidecar.display(), error = %e, "Sidecar unreadable, ignoring");
                None
            }
        }
    }
}

impl std::fmt::Debug for Detector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Detector")
            .field("sidecar", &self.sidecar)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{OsFileSystem, TextDocument};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn detector() -> Detector {
        Detector::new(Arc::new(OsFileSystem), "sofistik.def")
    }

    #[test]
    fn test_parse_marker() {
        assert_eq!(
            parse_marker("@ SOFiSTiK 2024 DE"),
            Some(("2024".to_string(), Some(Language::De)))
        );
        assert_eq!(parse_marker("@sofistik 2022"), Some(("2022".to_string(), None)));
        assert_eq!(
            parse_marker("  @ SOFISTIK 2023-1 en"),
            Some(("2023".to_string(), Some(Language::En)))
        );
        assert_eq!(parse_marker("@ SOFiSTiK 2024 fr"), Some(("2024".to_string(), None)));
        assert_eq!(parse_marker("@ SOFiSTiK 2024 DEMO"), Some(("2024".to_string(), None)));
    }

    #[test]
    fn test_parse_marker_rejects_non_markers() {
        assert_eq!(parse_marker("PROG AQUA"), None);
        assert_eq!(parse_marker("$ @ SOFiSTiK 2024"), None);
        assert_eq!(parse_marker("@ SOFiSTiK 20245"), None);
        assert_eq!(parse_marker("@ SOFiSTiK"), None);
        assert_eq!(parse_marker(""), None);
    }

    #[test]
    fn test_parse_sidecar() {
        assert_eq!(parse_sidecar("SOF_VERSION = 2020\n"), Some("2020".to_string()));
        assert_eq!(
            parse_sidecar("# project\nset sof_version=\"2024\"\nOTHER = 1\n"),
            Some("2024".to_string())
        );
        assert_eq!(parse_sidecar("SOF_VERSION_X = 2024"), None);
        assert_eq!(parse_sidecar(""), None);
    }

    #[test]
    fn test_marker_beats_sidecar() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("sofistik.def"), "SOF_VERSION = 2020\n").unwrap();
        let path = tmp.path().join("deck.dat");
        let doc = TextDocument::new("@ SOFiSTiK 2024 DE\nPROG AQUA\n").with_path(&path);

        let found = detector().detect(Some(&doc), None);
        assert_eq!(found.version.as_deref(), Some("2024"));
        assert_eq!(found.language, Some(Language::De));

        let found = detector().detect(Some(&doc), Some(&path));
        assert_eq!(found.version.as_deref(), Some("2024"));
    }

    #[test]
    fn test_sidecar_fallback() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("sofistik.def"), "SOF_VERSION = 2022\n").unwrap();
        let doc = TextDocument::new("PROG AQUA\n").with_path(tmp.path().join("deck.dat"));

        let found = detector().detect(Some(&doc), None);
        assert_eq!(found.version.as_deref(), Some("2022"));
        assert_eq!(found.language, None);
    }

    #[test]
    fn test_empty_document_uses_sidecar() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("sofistik.def"), "SOF_VERSION = 2022\n").unwrap();
        let doc = TextDocument::new("").with_path(tmp.path().join("deck.dat"));

        let found = detector().detect(Some(&doc), None);
        assert_eq!(found, Detection { version: Some("2022".into()), language: None });
    }

    #[test]
    fn test_unrelated_document_is_ignored() {
        let tmp = TempDir::new().unwrap();
        let other = tmp.path().join("sub");
        std::fs::create_dir(&other).unwrap();
        std::fs::write(other.join("sofistik.def"), "SOF_VERSION = 2020\n").unwrap();

        let doc = TextDocument::new("@ SOFiSTiK 2024 DE").with_path(tmp.path().join("open.dat"));
        let found = detector().detect(Some(&doc), Some(&other.join("queried.dat")));
        assert_eq!(found.version.as_deref(), Some("2020"));
        assert_eq!(found.language, None);
    }

    #[test]
    fn test_pathless_document_with_explicit_path_is_ignored() {
        let doc = TextDocument::new("@ SOFiSTiK 2024 DE");
        let found = detector().detect(Some(&doc), Some(Path::new("/nonexistent/deck.dat")));
        assert_eq!(found, Detection::default());
    }

    #[test]
    fn test_pathless_document_alone() {
        let doc = TextDocument::new("@ SOFiSTiK 2018 EN");
        let found = detector().detect(Some(&doc), None);
        assert_eq!(found.version.as_deref(), Some("2018"));
        assert_eq!(found.language, Some(Language::En));
    }

    #[test]
    fn test_nothing_found() {
        let tmp = TempDir::new().unwrap();
        let found = detector().detect(None, Some(&tmp.path().join("deck.dat")));
        assert_eq!(found, Detection::default());
        assert_eq!(detector().detect(None, None), Detection::default());
    }

    #[test]
    fn test_custom_sidecar_name() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("project.def"), "SOF_VERSION=2023").unwrap();
        let detector = Detector::new(Arc::new(OsFileSystem), "project.def");
        let found = detector.detect(None, Some(&tmp.path().join("deck.dat")));
        assert_eq!(found.version.as_deref(), Some("2023"));
    }
}
