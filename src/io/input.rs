//! Input factory: turns a filesystem location (or an in-memory request body)
//! into an engine input.
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;

/// One document handed to the check engine.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentInput {
    /// Where the document came from. For daemon requests this is a synthetic
    /// name, not a real filesystem path.
    pub source: PathBuf,
    /// Short name used for report and artifact naming (file stem).
    pub name: String,
    pub content: String,
}

impl DocumentInput {
    /// Read a document from disk.
    pub fn read(path: &Path) -> io::Result<Self> {
        let content = fs::read_to_string(path)?;
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "input".to_string());
        Ok(Self {
            source: path.to_path_buf(),
            name,
            content,
        })
    }

    /// Build an input from an in-memory document, e.g. a daemon request body.
    pub fn from_string(name: &str, content: String) -> Self {
        Self {
            source: PathBuf::from(name),
            name: name.to_string(),
            content,
        }
    }

    pub fn size(&self) -> u64 {
        self.content.len() as u64
    }
}
