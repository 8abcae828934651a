//! High-level, ergonomic library API: validate single documents, in-memory
//! content, or whole directories without going through the CLI. Prefer these
//! entrypoints over the low-level `core` modules when embedding DOCCHECK.
use std::path::Path;

use crate::core::check::engine::{TargetReport, examine};
use crate::core::targets::resolve_targets;
use crate::error::Result;
use crate::io::{DocumentInput, Scenarios};

/// Summary of a directory validation run.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub checked: usize,
    pub accepted: usize,
    pub rejected: usize,
}

/// Validate a single document file against a scenario definition.
pub fn validate_file(
    scenario_definition: &Path,
    repository: Option<&Path>,
    target: &Path,
) -> Result<TargetReport> {
    let scenarios = Scenarios::load(scenario_definition, repository)?;
    let input = DocumentInput::read(target)?;
    Ok(examine(&scenarios, &input))
}

/// Validate an in-memory document, e.g. a daemon request body.
pub fn validate_content(scenarios: &Scenarios, name: &str, content: String) -> TargetReport {
    examine(scenarios, &DocumentInput::from_string(name, content))
}

/// Validate every document in a directory (non-recursive).
pub fn validate_directory(
    scenario_definition: &Path,
    repository: Option<&Path>,
    directory: &Path,
) -> Result<BatchReport> {
    let scenarios = Scenarios::load(scenario_definition, repository)?;
    let targets = resolve_targets(&[directory.to_path_buf()])?;
    let mut report = BatchReport::default();
    for target in targets {
        let input = DocumentInput::read(&target)?;
        let result = examine(&scenarios, &input);
        report.checked += 1;
        if result.accepted {
            report.accepted += 1;
        } else {
            report.rejected += 1;
        }
    }
    Ok(report)
}
