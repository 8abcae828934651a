//! Command Line Interface (CLI) layer for DOCCHECK.
//!
//! This module defines argument parsing (`args`), error types (`errors`),
//! and the orchestration logic (`runner`) for batch and daemon runs. It
//! wires user-provided options to the underlying library functionality
//! exposed via `doccheck::api` and `doccheck::core`.
//!
//! If you are embedding DOCCHECK into another application, prefer using
//! the high-level `doccheck::api` module instead of calling the CLI code.
pub mod args;
pub mod errors;
pub mod runner;

pub use args::CliArgs;
pub use runner::run;
