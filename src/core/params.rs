//! Run parameters shared by the CLI, the library API, and the daemon.
//! Mode selection is a tagged union: a run is either a batch over targets or
//! a daemon, decided before any variant-specific validation happens.
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::thread;

use serde::{Deserialize, Serialize};

use crate::core::check::naming::ReportNaming;

/// Parameters for one batch validation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchParams {
    /// Directory receiving reports and extracted artifacts. Empty means cwd.
    pub output_directory: PathBuf,
    pub print: bool,
    pub extract_html: bool,
    pub serialize_report_input: bool,
    pub memory_stats: bool,
    /// Assertions file; a missing file skips assertion checking.
    pub assertions_file: Option<PathBuf>,
    pub naming: ReportNaming,
}

impl Default for BatchParams {
    fn default() -> Self {
        Self {
            output_directory: PathBuf::new(),
            print: false,
            extract_html: false,
            serialize_report_input: false,
            memory_stats: false,
            assertions_file: None,
            naming: ReportNaming::default(),
        }
    }
}

/// Configuration surface of the validation daemon.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaemonParams {
    pub host: String,
    pub port: u16,
    /// Number of worker threads processing validation requests.
    pub workers: usize,
    pub gui_enabled: bool,
}

impl Default for DaemonParams {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 8080,
            workers: default_worker_count(),
            gui_enabled: true,
        }
    }
}

/// Worker count default: one per available processor, at least one.
pub fn default_worker_count() -> usize {
    thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}

/// The two run modes. Exactly one is active per invocation.
#[derive(Debug, Clone)]
pub enum RunMode {
    Batch(BatchParams),
    Daemon(DaemonParams),
}
