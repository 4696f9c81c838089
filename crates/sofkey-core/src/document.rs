//! Host capabilities the detector reads through.
//!
//! An editor hands over open buffers as [`Document`]s; files on disk are
//! reached through [`FileSystem`]. Both are narrow enough to fake in tests.

use std::io;
use std::path::{Path, PathBuf};

/// An open document as seen by the detector.
pub trait Document {
    /// Where the document lives on disk, if anywhere.
    fn path(&self) -> Option<&Path>;

    /// Text of line 0, without its terminator or a leading byte-order mark.
    /// Empty for an empty document.
    fn first_line(&self) -> String;
}

/// A document backed by an owned string.
#[derive(Debug, Clone, Default)]
pub struct TextDocument {
    path: Option<PathBuf>,
    text: String,
}

impl TextDocument {
    /// A pathless document over `text`.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            path: None,
            text: text.into(),
        }
    }

    /// Attach the on-disk location.
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Read a document from disk through `fs`.
    pub fn open(fs: &dyn FileSystem, path: &Path) -> io::Result<Self> {
        let text = fs.read_to_string(path)?;
        Ok(Self::new(text).with_path(path))
    }

    /// The full text, as read.
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl Document for TextDocument {
    fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn first_line(&self) -> String {
        let text = self.text.strip_prefix('\u{feff}').unwrap_or(&self.text);
        text.lines().next().unwrap_or_default().to_string()
    }
}

/// Read access to files by path.
pub trait FileSystem: Send + Sync {
    fn exists(&self, path: &Path) -> bool;

    fn read_to_string(&self, path: &Path) -> io::Result<String>;
}

/// [`FileSystem`] over `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }
}
