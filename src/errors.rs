use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Unknown mode {0}")]
    UnknownMode(String),

    #[error("wp-config.php could not be found in {0}")]
    MissingWordPress(String),

    #[error("Could not determine the home directory for the configuration root")]
    NoHomeDir,

    #[error("Invalid setting: {0}")]
    Settings(String),

    #[error("Cache I/O error at {path}: {source}")]
    CacheIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Console I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serde JSON error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    #[error("Standard input was closed before an answer was given")]
    InputClosed,

    #[error("Configuration was not confirmed after {0} attempt(s)")]
    RetriesExhausted(u32),
}

impl AppError {
    /// Errors that end the process through the usage message rather than a diagnostic.
    pub fn is_usage(&self) -> bool {
        matches!(self, AppError::UnknownMode(_) | AppError::MissingWordPress(_))
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
