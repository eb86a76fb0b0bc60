use std::io;
use std::path::PathBuf;
use sudoku_client::ServiceError;
use thiserror::Error;

/// Failures that stop the program before or after the UI runs
#[derive(Debug, Error)]
pub enum AppError {
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("config file not found: {}", path.display())]
    ConfigMissing { path: PathBuf },

    #[error("failed to read config {}: {source}", path.display())]
    ConfigRead { path: PathBuf, source: io::Error },

    #[error("invalid config {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid log filter {filter:?}: {reason}")]
    LogFilter { filter: String, reason: String },

    #[error("failed to open log file {}: {source}", path.display())]
    LogFile { path: PathBuf, source: io::Error },

    #[error("failed to install logger: {0}")]
    Logger(String),

    #[error("service setup failed: {0}")]
    Service(#[from] ServiceError),
}
