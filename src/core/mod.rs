//! Core building blocks: run parameters, target resolution, and the check
//! engine with its step pipeline. These are internal primitives consumed by
//! the high-level `api` module and the CLI.
pub mod check;
pub mod params;
pub mod targets;
