// src/errors.rs

//! Crate-wide error type and result alias.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenError {
    /// Parameters that can never produce a DAG, detected before any
    /// randomness is consumed.
    #[error("Infeasible configuration: {0}")]
    InfeasibleConfig(String),

    /// Random search gave up after `max_try` attempts.
    #[error("Build failed: {0}")]
    BuildFailed(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerError(#[from] toml::ser::Error),

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GenError {
    /// Whether a build attempt that hit this error may be retried from scratch.
    pub fn is_retryable(&self) -> bool {
        matches!(self, GenError::BuildFailed(_))
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, GenError>;
