use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReconError {
    /// Source directory does not exist. Fatal: no partial result is possible.
    #[error("tables directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),
    /// Source directory exists but cannot be listed.
    #[error("cannot read {}: {message}", .path.display())]
    Io { path: PathBuf, message: String },
    /// TOML parse / deserialization error.
    #[error("config parse error: {0}")]
    ConfigParse(String),
    /// Config validation error (bad period, duplicate token, etc.).
    #[error("config validation error: {0}")]
    ConfigValidation(String),
    /// JSON encoding of a response blob failed.
    #[error("JSON serialization error: {0}")]
    Serialize(String),
}
