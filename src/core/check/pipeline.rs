//! The check-step pipeline: a trait for pluggable post-processing actions
//! and the builder that assembles the ordered step list from run parameters.
use std::path::Path;

use tracing::debug;

use crate::core::check::engine::CheckResult;
use crate::core::check::steps::{
    CheckAssertionsStep, ExtractHtmlStep, MemoryStatsStep, PrintReportStep, SerializeInputStep,
    SerializeReportStep,
};
use crate::core::params::BatchParams;
use crate::error::Result;
use crate::io::Assertions;

/// One post-processing action applied to each target's check result.
pub trait CheckStep {
    fn name(&self) -> &'static str;
    fn process(&self, result: &mut CheckResult) -> Result<()>;
}

/// Assemble the ordered pipeline for a batch run.
///
/// Order is significant: html extraction runs before report serialization,
/// serialization before printing, printing before assertion checking, and
/// memory stats last. The serialize-report step is always present.
pub fn build_pipeline(params: &BatchParams) -> Result<Vec<Box<dyn CheckStep>>> {
    let output_directory: &Path = &params.output_directory;
    let mut steps: Vec<Box<dyn CheckStep>> = Vec::new();
    if params.extract_html {
        steps.push(Box::new(ExtractHtmlStep::new(output_directory)));
    }
    steps.push(Box::new(SerializeReportStep::new(
        output_directory,
        params.naming.clone(),
    )));
    if params.serialize_report_input {
        steps.push(Box::new(SerializeInputStep::new(output_directory)));
    }
    if params.print {
        steps.push(Box::new(PrintReportStep));
    }
    if let Some(path) = &params.assertions_file {
        if path.exists() {
            steps.push(Box::new(CheckAssertionsStep::new(Assertions::load(path)?)));
        } else {
            debug!(
                "Assertions file {} does not exist, skipping assertion checks",
                path.display()
            );
        }
    }
    if params.memory_stats {
        steps.push(Box::new(MemoryStatsStep));
    }
    Ok(steps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    fn names(steps: &[Box<dyn CheckStep>]) -> Vec<&'static str> {
        steps.iter().map(|s| s.name()).collect()
    }

    #[test]
    fn serialize_report_is_always_present() {
        let steps = build_pipeline(&BatchParams::default()).unwrap();
        assert_eq!(names(&steps), vec!["serialize-report"]);
    }

    #[test]
    fn full_pipeline_order() {
        let dir = tempfile::tempdir().unwrap();
        let assertions = dir.path().join("assertions.xml");
        fs::write(
            &assertions,
            r#"<assertions><assertion target="a.xml" expect="accept"/></assertions>"#,
        )
        .unwrap();

        let params = BatchParams {
            output_directory: dir.path().to_path_buf(),
            print: true,
            extract_html: true,
            serialize_report_input: true,
            memory_stats: true,
            assertions_file: Some(assertions),
            ..BatchParams::default()
        };
        let steps = build_pipeline(&params).unwrap();
        assert_eq!(
            names(&steps),
            vec![
                "extract-html",
                "serialize-report",
                "serialize-report-input",
                "print-report",
                "check-assertions",
                "memory-stats",
            ]
        );
    }

    #[test]
    fn missing_assertions_file_is_silently_skipped() {
        let params = BatchParams {
            assertions_file: Some(PathBuf::from("/no/such/assertions.xml")),
            ..BatchParams::default()
        };
        let steps = build_pipeline(&params).unwrap();
        assert_eq!(names(&steps), vec!["serialize-report"]);
    }

    #[test]
    fn malformed_assertions_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let assertions = dir.path().join("assertions.xml");
        fs::write(&assertions, "<assertions><assertion").unwrap();

        let params = BatchParams {
            assertions_file: Some(assertions),
            ..BatchParams::default()
        };
        assert!(build_pipeline(&params).is_err());
    }
}
