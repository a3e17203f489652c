//! Errors raised while loading or checking `orion.toml`

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    /// The file is not valid TOML or does not match the `[api]`,
    /// `[polling]` and `[logging]` layout
    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Failed to render config as TOML: {0}")]
    Render(String),

    #[error("Invalid value for '{field}': {message}")]
    Validation { field: String, message: String },
}
