//! Built-in check steps: report serialization, html extraction, report-input
//! serialization, stdout printing, assertion checking, and memory stats.
use std::fs;
use std::path::{Path, PathBuf};

use sysinfo::{ProcessesToUpdate, System};
use tracing::{debug, error, info};

use crate::core::check::engine::CheckResult;
use crate::core::check::naming::ReportNaming;
use crate::core::check::pipeline::CheckStep;
use crate::error::Result;
use crate::io::Assertions;

/// Writes each embedded html fragment as a separate file.
pub struct ExtractHtmlStep {
    output_directory: PathBuf,
}

impl ExtractHtmlStep {
    pub fn new(output_directory: &Path) -> Self {
        Self {
            output_directory: output_directory.to_path_buf(),
        }
    }
}

impl CheckStep for ExtractHtmlStep {
    fn name(&self) -> &'static str {
        "extract-html"
    }

    fn process(&self, result: &mut CheckResult) -> Result<()> {
        for (i, fragment) in result.report.html_fragments.iter().enumerate() {
            let file = self
                .output_directory
                .join(format!("{}-{}.html", result.report.name, i));
            fs::write(&file, fragment)?;
            info!("Extracted html content to {}", file.display());
        }
        Ok(())
    }
}

/// Writes the JSON report into the output directory. Always part of the
/// pipeline: a validation run always materializes its report.
pub struct SerializeReportStep {
    output_directory: PathBuf,
    naming: ReportNaming,
}

impl SerializeReportStep {
    pub fn new(output_directory: &Path, naming: ReportNaming) -> Self {
        Self {
            output_directory: output_directory.to_path_buf(),
            naming,
        }
    }
}

impl CheckStep for SerializeReportStep {
    fn name(&self) -> &'static str {
        "serialize-report"
    }

    fn process(&self, result: &mut CheckResult) -> Result<()> {
        let file = self
            .output_directory
            .join(self.naming.report_file_name(&result.report.name));
        fs::write(&file, serde_json::to_string_pretty(&result.report)?)?;
        debug!("Serialized report to {}", file.display());
        Ok(())
    }
}

/// Writes the engine input (source, name, size, content) next to the report.
pub struct SerializeInputStep {
    output_directory: PathBuf,
}

impl SerializeInputStep {
    pub fn new(output_directory: &Path) -> Self {
        Self {
            output_directory: output_directory.to_path_buf(),
        }
    }
}

impl CheckStep for SerializeInputStep {
    fn name(&self) -> &'static str {
        "serialize-report-input"
    }

    fn process(&self, result: &mut CheckResult) -> Result<()> {
        let file = self
            .output_directory
            .join(format!("{}-input.json", result.report.name));
        let body = serde_json::json!({
            "source": result.input.source,
            "name": result.input.name,
            "size": result.input.size(),
            "content": result.input.content,
        });
        fs::write(&file, serde_json::to_string_pretty(&body)?)?;
        debug!("Serialized report input to {}", file.display());
        Ok(())
    }
}

/// Pretty-prints the JSON report to stdout.
pub struct PrintReportStep;

impl CheckStep for PrintReportStep {
    fn name(&self) -> &'static str {
        "print-report"
    }

    fn process(&self, result: &mut CheckResult) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(&result.report)?);
        Ok(())
    }
}

/// Compares the report's acceptance against the expectation recorded in the
/// assertions file. Mismatches are recorded on the report and fail the
/// overall verdict; targets without an assertion entry are skipped.
pub struct CheckAssertionsStep {
    assertions: Assertions,
}

impl CheckAssertionsStep {
    pub fn new(assertions: Assertions) -> Self {
        Self { assertions }
    }
}

impl CheckStep for CheckAssertionsStep {
    fn name(&self) -> &'static str {
        "check-assertions"
    }

    fn process(&self, result: &mut CheckResult) -> Result<()> {
        let file_name = result
            .report
            .target
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| result.report.name.clone());
        match self.assertions.for_target(&file_name) {
            Some(assertion) if assertion.accept != result.report.accepted => {
                let failure = format!(
                    "Assertion failed for {}: expected {}, was {}",
                    file_name,
                    verdict(assertion.accept),
                    verdict(result.report.accepted)
                );
                error!("{}", failure);
                result.report.assertion_failures.push(failure);
            }
            Some(_) => debug!("Assertion satisfied for {}", file_name),
            None => debug!("No assertion defined for {}", file_name),
        }
        Ok(())
    }
}

fn verdict(accept: bool) -> &'static str {
    if accept { "accept" } else { "reject" }
}

/// Logs system and process memory usage.
pub struct MemoryStatsStep;

impl CheckStep for MemoryStatsStep {
    fn name(&self) -> &'static str {
        "memory-stats"
    }

    fn process(&self, _result: &mut CheckResult) -> Result<()> {
        let mut system = System::new();
        system.refresh_memory();
        info!(
            "Memory usage: {:.2} MB used of {:.2} MB total",
            system.used_memory() as f64 / 1024.0 / 1024.0,
            system.total_memory() as f64 / 1024.0 / 1024.0
        );
        if let Ok(pid) = sysinfo::get_current_pid() {
            system.refresh_processes(ProcessesToUpdate::Some(&[pid]), true);
            if let Some(process) = system.process(pid) {
                info!(
                    "Process memory (approx): {:.2} MB",
                    process.memory() as f64 / 1024.0 / 1024.0
                );
            }
        }
        Ok(())
    }
}
