//! Crate-level error type and `Result` alias for stable, structured error handling.
//! Converts underlying I/O, XML, and serialization errors, and provides semantic
//! variants for scenario, assertion, and daemon failures.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Scenario definition error: {0}")]
    Scenario(#[from] crate::io::ScenarioError),

    #[error("Assertions error: {0}")]
    Assertions(#[from] crate::io::AssertionError),

    #[error("Report serialization error: {0}")]
    Report(#[from] serde_json::Error),

    #[error("Target resolution error: {0}")]
    Target(#[from] crate::core::targets::TargetError),

    #[error("Daemon error: {0}")]
    Daemon(String),

    #[error("Processing error: {0}")]
    Processing(String),
}

impl Error {
    pub fn daemon<E: std::fmt::Display>(e: E) -> Self {
        Error::Daemon(e.to_string())
    }
}
