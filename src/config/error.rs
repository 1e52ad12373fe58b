//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading `.fireproof`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Config file parsing error in `{0}`")]
    Yaml(PathBuf, #[source] serde_yaml::Error),

    #[error("Config validation error: {0}")]
    Validation(String),
}
