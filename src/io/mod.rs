//! I/O layer for reading documents, scenario definitions, and assertions.
//! Provides the `input` factory for engine inputs, the `scenarios` loader,
//! and the `assertions` loader.
pub mod input;
pub use input::DocumentInput;

pub mod scenarios;
pub use scenarios::{Scenario, ScenarioError, Scenarios};

pub mod assertions;
pub use assertions::{Assertion, AssertionError, Assertions};
