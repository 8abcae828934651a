//! Target resolution: expands positional arguments into the concrete list
//! of documents a batch run will check.
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::warn;

/// File name suffix a directory entry must carry to count as a document.
pub const DOCUMENT_EXTENSION: &str = ".xml";

#[derive(Debug, Error)]
pub enum TargetError {
    #[error("No test targets found. Nothing to check. Will quit now!")]
    NoTargets,
    #[error("I/O error while listing directory content. Can not determine test targets: {path}")]
    Listing {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Expand the positional arguments into an ordered target list.
///
/// A directory contributes its immediate children ending in
/// [`DOCUMENT_EXTENSION`] in filesystem listing order; an existing file
/// contributes itself; a missing path is skipped with a warning. An empty
/// aggregate result is fatal.
pub fn resolve_targets(args: &[PathBuf]) -> Result<Vec<PathBuf>, TargetError> {
    let mut targets = Vec::new();
    for arg in args {
        targets.extend(resolve_target(arg)?);
    }
    if targets.is_empty() {
        return Err(TargetError::NoTargets);
    }
    Ok(targets)
}

fn resolve_target(path: &Path) -> Result<Vec<PathBuf>, TargetError> {
    if path.is_dir() {
        list_directory_targets(path)
    } else if path.exists() {
        Ok(vec![path.to_path_buf()])
    } else {
        warn!(
            "The specified test target {} does not exist. Will be ignored",
            path.display()
        );
        Ok(Vec::new())
    }
}

fn list_directory_targets(dir: &Path) -> Result<Vec<PathBuf>, TargetError> {
    let listing = |e: std::io::Error| TargetError::Listing {
        path: dir.display().to_string(),
        source: e,
    };
    let mut targets = Vec::new();
    for entry in fs::read_dir(dir).map_err(listing)? {
        let path = entry.map_err(listing)?.path();
        let is_document = path
            .file_name()
            .map(|n| n.to_string_lossy().ends_with(DOCUMENT_EXTENSION))
            .unwrap_or(false);
        if is_document {
            targets.push(path);
        }
    }
    Ok(targets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn directory_yields_only_documents() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.xml"), "<a/>").unwrap();
        fs::write(dir.path().join("b.xml"), "<b/>").unwrap();
        fs::write(dir.path().join("notes.txt"), "x").unwrap();
        fs::write(dir.path().join("c.json"), "{}").unwrap();

        let targets = resolve_targets(&[dir.path().to_path_buf()]).unwrap();
        assert_eq!(targets.len(), 2);
        assert!(targets.iter().all(|t| t.to_string_lossy().ends_with(".xml")));
    }

    #[test]
    fn file_yields_itself() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("single.xml");
        fs::write(&file, "<a/>").unwrap();

        let targets = resolve_targets(&[file.clone()]).unwrap();
        assert_eq!(targets, vec![file]);
    }

    #[test]
    fn missing_path_is_skipped_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("real.xml");
        fs::write(&file, "<a/>").unwrap();
        let missing = dir.path().join("ghost.xml");

        let targets = resolve_targets(&[missing, file.clone()]).unwrap();
        assert_eq!(targets, vec![file]);
    }

    #[test]
    fn empty_result_is_fatal() {
        let missing = PathBuf::from("/no/such/target.xml");
        assert!(matches!(
            resolve_targets(&[missing]),
            Err(TargetError::NoTargets)
        ));
        assert!(matches!(resolve_targets(&[]), Err(TargetError::NoTargets)));
    }

    #[test]
    fn repeated_arguments_preserve_order() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.xml");
        let b = dir.path().join("b.xml");
        fs::write(&a, "<a/>").unwrap();
        fs::write(&b, "<b/>").unwrap();

        let targets = resolve_targets(&[b.clone(), a.clone(), b.clone()]).unwrap();
        assert_eq!(targets, vec![b.clone(), a, b]);
    }
}
