use thiserror::Error;

/// Main error type for Runsight operations
#[derive(Error, Debug)]
pub enum RunsightError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Analysis error: {0}")]
    Analysis(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("File system error: {0}")]
    FileSystem(String),

    #[error("Build descriptor error: {0}")]
    Setup(String),
}

pub type Result<T> = std::result::Result<T, RunsightError>;
