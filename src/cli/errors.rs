use thiserror::Error;

/// Application-specific errors for the CLI
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Option '{option}' required")]
    MissingOption { option: &'static str },

    #[error("Option value required for option '{option}'")]
    BlankOptionValue { option: &'static str },

    #[error("Not a valid path for scenario definition specified: '{path}'")]
    InvalidScenarioDefinition { path: String },

    #[error("Not a valid path for repository definition specified: '{path}'")]
    InvalidRepository { path: String },

    #[error("Invalid target directory {path} specified")]
    InvalidOutputDirectory { path: String },

    #[error(transparent)]
    Target(#[from] doccheck::core::targets::TargetError),

    #[error("Scenario definition error: {0}")]
    Scenario(#[from] doccheck::ScenarioError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Check(#[from] doccheck::Error),
}
