//! CLI error types

use thiserror::Error;
use triad_profile::ProfileError;

/// CLI error type
#[derive(Error, Debug)]
pub enum CliError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("{0}")]
    Profile(#[from] ProfileError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
