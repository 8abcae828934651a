//! The check engine: examines one document per submitted input, applies the
//! configured step pipeline to the result, and accumulates the run outcome.
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use serde::Serialize;
use tracing::{debug, info};

use crate::core::check::pipeline::CheckStep;
use crate::error::Result;
use crate::io::{DocumentInput, Scenarios};

/// Structured outcome of examining one target.
#[derive(Debug, Clone, Serialize)]
pub struct TargetReport {
    pub target: PathBuf,
    pub name: String,
    /// Name of the scenario that matched the document root, if any.
    pub scenario: Option<String>,
    pub well_formed: bool,
    pub accepted: bool,
    pub problems: Vec<String>,
    /// Raw markup of embedded `<html>` elements (outermost only).
    pub html_fragments: Vec<String>,
    pub assertion_failures: Vec<String>,
    pub checked_at: DateTime<Utc>,
    pub input_size: u64,
}

/// A report together with the input it was produced from. Pipeline steps
/// receive this so artifact-producing steps can reach the raw input.
#[derive(Debug)]
pub struct CheckResult {
    pub input: DocumentInput,
    pub report: TargetReport,
}

/// The engine: submit inputs one at a time, then evaluate the whole run.
pub struct Check {
    scenarios: Scenarios,
    steps: Vec<Box<dyn CheckStep>>,
    results: Vec<CheckResult>,
}

impl Check {
    pub fn new(scenarios: Scenarios) -> Self {
        Self {
            scenarios,
            steps: Vec::new(),
            results: Vec::new(),
        }
    }

    pub fn scenarios(&self) -> &Scenarios {
        &self.scenarios
    }

    pub fn add_step(&mut self, step: Box<dyn CheckStep>) {
        self.steps.push(step);
    }

    pub fn add_steps(&mut self, steps: Vec<Box<dyn CheckStep>>) {
        self.steps.extend(steps);
    }

    pub fn steps(&self) -> &[Box<dyn CheckStep>] {
        &self.steps
    }

    /// Examine one input and run every pipeline step against the result.
    /// A step error aborts the run; there is no per-target recovery.
    pub fn check_input(&mut self, input: DocumentInput) -> Result<()> {
        let report = examine(&self.scenarios, &input);
        let mut result = CheckResult { input, report };
        for step in &self.steps {
            debug!(
                "Running check step `{}` for {}",
                step.name(),
                result.report.target.display()
            );
            step.process(&mut result)?;
        }
        self.results.push(result);
        Ok(())
    }

    pub fn results(&self) -> &[CheckResult] {
        &self.results
    }

    /// Print the accumulated outcome and return the overall verdict: true
    /// iff every target was accepted and no assertion failed.
    pub fn print_and_evaluate(&self) -> bool {
        let mut overall = true;
        let mut accepted = 0usize;
        for result in &self.results {
            let report = &result.report;
            if report.accepted && report.assertion_failures.is_empty() {
                accepted += 1;
                info!("ACCEPTED {}", report.target.display());
            } else {
                overall = false;
                info!("REJECTED {}", report.target.display());
                for problem in &report.problems {
                    info!("  {}", problem);
                }
                for failure in &report.assertion_failures {
                    info!("  {}", failure);
                }
            }
        }
        info!("{} of {} object(s) accepted", accepted, self.results.len());
        overall
    }
}

/// Examine one document: establish well-formedness, capture the root
/// element and embedded html fragments, and match against the scenarios.
/// Examination records problems on the report instead of failing.
pub fn examine(scenarios: &Scenarios, input: &DocumentInput) -> TargetReport {
    let mut report = TargetReport {
        target: input.source.clone(),
        name: input.name.clone(),
        scenario: None,
        well_formed: true,
        accepted: false,
        problems: Vec::new(),
        html_fragments: Vec::new(),
        assertion_failures: Vec::new(),
        checked_at: Utc::now(),
        input_size: input.size(),
    };

    let mut reader = Reader::from_str(&input.content);
    let mut root: Option<(String, Option<String>)> = None;
    let mut depth = 0usize;
    let mut html_start: Option<usize> = None;
    let mut html_depth = 0usize;
    // byte offset of the current event's start, tracked manually
    let mut pos = 0usize;

    loop {
        let event = reader.read_event();
        let next_pos = reader.buffer_position();
        match event {
            Ok(Event::Start(ref e)) => {
                let local = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                if root.is_none() && depth == 0 {
                    root = Some((local.clone(), default_namespace(e)));
                }
                depth += 1;
                if local == "html" {
                    if html_depth == 0 {
                        html_start = Some(pos);
                    }
                    html_depth += 1;
                }
            }
            Ok(Event::Empty(ref e)) => {
                let local = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                if root.is_none() && depth == 0 {
                    root = Some((local.clone(), default_namespace(e)));
                }
                if local == "html" && html_depth == 0 {
                    report.html_fragments.push(input.content[pos..next_pos].to_string());
                }
            }
            Ok(Event::End(ref e)) => {
                if depth == 0 {
                    report.well_formed = false;
                    report.problems.push(format!(
                        "Unexpected closing tag `{}` at byte {}",
                        String::from_utf8_lossy(e.local_name().as_ref()),
                        next_pos
                    ));
                    break;
                }
                depth -= 1;
                if e.local_name().as_ref() == b"html" && html_depth > 0 {
                    html_depth -= 1;
                    if html_depth == 0 {
                        if let Some(start) = html_start.take() {
                            report
                                .html_fragments
                                .push(input.content[start..next_pos].to_string());
                        }
                    }
                }
            }
            Ok(Event::Eof) => {
                if depth > 0 {
                    report.well_formed = false;
                    report.problems.push(format!(
                        "Unexpected end of document: {} element(s) left open",
                        depth
                    ));
                }
                break;
            }
            Err(e) => {
                report.well_formed = false;
                report
                    .problems
                    .push(format!("XML parse error at byte {}: {}", next_pos, e));
                break;
            }
            Ok(_) => {}
        }
        pos = next_pos;
    }

    if report.well_formed {
        match &root {
            Some((local, namespace)) => match scenarios.match_root(local, namespace.as_deref()) {
                Some(scenario) => report.scenario = Some(scenario.name.clone()),
                None => report
                    .problems
                    .push(format!("No scenario matched document root `{}`", local)),
            },
            None => {
                report.well_formed = false;
                report.problems.push("Document has no root element".to_string());
            }
        }
    }

    report.accepted = report.well_formed && report.scenario.is_some();
    report
}

fn default_namespace(e: &BytesStart) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == b"xmlns")
        .and_then(|a| a.unescape_value().ok())
        .map(|v| v.to_string())
}
