use crate::config::Settings;
use crate::error::AppError;
use std::fs::{self, OpenOptions};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info";

/// Build the filter: explicit setting, then RUST_LOG, then `info`
pub fn build_filter(explicit: Option<&str>) -> Result<EnvFilter, AppError> {
    match explicit {
        Some(filter) => EnvFilter::try_new(filter).map_err(|e| AppError::LogFilter {
            filter: filter.to_string(),
            reason: e.to_string(),
        }),
        None => Ok(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into())),
    }
}

/// Send tracing output to the log file; the terminal belongs to the UI
pub fn init(settings: &Settings) -> Result<(), AppError> {
    let filter = build_filter(settings.log_level.as_deref())?;

    let path = &settings.log_file;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| AppError::LogFile {
            path: path.clone(),
            source,
        })?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| AppError::LogFile {
            path: path.clone(),
            source,
        })?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_thread_names(true)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|e| AppError::Logger(e.to_string()))
}
