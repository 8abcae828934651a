#![doc = r#"
DOCCHECK — a scenario-driven XML document validation toolkit.

This crate turns raw documents into structured validation reports. A run is
configured by a scenario definition file declaring which document types are
known (matched on the root element's local name and optional default
namespace); each checked document yields a [`TargetReport`] that the
configurable step pipeline can serialize, print, extract artifacts from, or
compare against recorded assertions. The crate powers the DOCCHECK CLI in
both its one-shot batch mode and its long-running daemon mode, and can be
embedded in your own Rust applications.

Quick start: validate one file
------------------------------
```rust,no_run
use std::path::Path;

fn main() -> doccheck::Result<()> {
    let report = doccheck::api::validate_file(
        Path::new("scenarios.xml"),
        None,
        Path::new("invoice.xml"),
    )?;
    println!("accepted: {}", report.accepted);
    Ok(())
}
```

Validate a whole directory
--------------------------
```rust,no_run
use std::path::Path;
use doccheck::api::validate_directory;

fn main() -> doccheck::Result<()> {
    let report = validate_directory(
        Path::new("scenarios.xml"),
        Some(Path::new("repository/")),
        Path::new("incoming/"),
    )?;
    println!(
        "checked={} accepted={} rejected={}",
        report.checked, report.accepted, report.rejected
    );
    Ok(())
}
```

Run the engine with a custom pipeline
-------------------------------------
```rust,no_run
use std::path::Path;
use doccheck::core::check::{Check, build_pipeline};
use doccheck::core::params::BatchParams;
use doccheck::io::{DocumentInput, Scenarios};

fn main() -> doccheck::Result<()> {
    let scenarios = Scenarios::load(Path::new("scenarios.xml"), None)?;
    let mut check = Check::new(scenarios);
    check.add_steps(build_pipeline(&BatchParams::default())?);
    check.check_input(DocumentInput::read(Path::new("invoice.xml"))?)?;
    let all_accepted = check.print_and_evaluate();
    std::process::exit(if all_accepted { 0 } else { 1 });
}
```

Daemon mode
-----------
```rust,no_run
use std::path::Path;
use doccheck::core::params::DaemonParams;
use doccheck::daemon::Daemon;
use doccheck::io::Scenarios;

fn main() -> doccheck::Result<()> {
    let scenarios = Scenarios::load(Path::new("scenarios.xml"), None)?;
    // Blocks until the listener fails; the daemon owns the process from here.
    Daemon::new(DaemonParams::default()).start(scenarios)
}
```

Error handling
--------------
All fallible functions return [`Result`]; match on [`Error`] to handle
specific cases, e.g. scenario definition or target resolution failures.

Useful modules
--------------
- [`api`] — high-level, ergonomic entry points.
- [`core`] — run parameters, target resolution, the check engine and steps.
- [`io`] — document inputs, scenario definitions, assertions.
- [`daemon`] — the long-running validation server.
- [`error`] — crate-level `Error` and `Result`.
"#]

// Core modules (public)
pub mod api;
pub mod core;
pub mod daemon;
pub mod error;
pub mod io;
pub mod types;

// Curated public API surface
// Types
pub use core::check::{Check, CheckResult, CheckStep, ReportNaming, TargetReport};
pub use core::params::{BatchParams, DaemonParams, RunMode};
pub use error::{Error, Result};
pub use types::{DAEMON_SIGNAL, RunStatus};

// Readers
pub use io::{Assertion, AssertionError, Assertions, DocumentInput, Scenario, ScenarioError, Scenarios};

// High-level API re-exports
pub use api::{BatchReport, validate_content, validate_directory, validate_file};
