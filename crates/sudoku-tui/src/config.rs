//! Command line, environment and config file settings.
//!
//! Precedence: flags and environment first, then the TOML file, then
//! built-in defaults.

use crate::error::AppError;
use clap::Parser;
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use sudoku_client::{Algorithm, Difficulty, ServiceConfig};

const APP_DIR: &str = "sudoku-solver";

#[derive(Debug, Parser)]
#[command(name = "sudoku-solver", version, about = "Terminal client for a Sudoku solving service")]
pub struct Cli {
    /// Base URL of the solving backend
    #[arg(long, env = "SUDOKU_BACKEND_URL")]
    pub backend_url: Option<String>,

    /// Base URL of the puzzle import service
    #[arg(long, env = "SUDOKU_IMPORT_URL")]
    pub import_url: Option<String>,

    /// Initial solving algorithm (backtracking, evolutionary, tabu_search)
    #[arg(long)]
    pub algorithm: Option<Algorithm>,

    /// Initial import difficulty (easy, medium, hard, expert, extreme)
    #[arg(long)]
    pub difficulty: Option<Difficulty>,

    /// Request timeout in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Config file path
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log filter, e.g. "debug" or "sudoku_client=trace"
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

/// Contents of config.toml; every key optional
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub backend_url: Option<String>,
    pub import_url: Option<String>,
    pub algorithm: Option<Algorithm>,
    pub difficulty: Option<Difficulty>,
    pub timeout_secs: Option<u64>,
    pub log_level: Option<String>,
    pub log_file: Option<PathBuf>,
}

impl FileConfig {
    pub fn parse(path: &Path, text: &str) -> Result<Self, AppError> {
        toml::from_str(text).map_err(|source| AppError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Read a config file. A missing file is only an error when `required`.
    pub fn load(path: &Path, required: bool) -> Result<Self, AppError> {
        match fs::read_to_string(path) {
            Ok(text) => Self::parse(path, &text),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                if required {
                    Err(AppError::ConfigMissing {
                        path: path.to_path_buf(),
                    })
                } else {
                    Ok(Self::default())
                }
            }
            Err(source) => Err(AppError::ConfigRead {
                path: path.to_path_buf(),
                source,
            }),
        }
    }
}

/// Resolved settings for one run
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub service: ServiceConfig,
    pub algorithm: Algorithm,
    pub difficulty: Difficulty,
    /// Explicit filter; `None` defers to RUST_LOG
    pub log_level: Option<String>,
    pub log_file: PathBuf,
}

impl Settings {
    pub fn from_cli(cli: &Cli) -> Result<Self, AppError> {
        let file = match &cli.config {
            Some(path) => FileConfig::load(path, true)?,
            None => match default_config_path() {
                Some(path) => FileConfig::load(&path, false)?,
                None => FileConfig::default(),
            },
        };
        Ok(Self::merge(cli, file))
    }

    pub fn merge(cli: &Cli, file: FileConfig) -> Self {
        let defaults = ServiceConfig::default();
        let service = ServiceConfig {
            backend_url: cli
                .backend_url
                .clone()
                .or(file.backend_url)
                .unwrap_or(defaults.backend_url),
            import_url: cli
                .import_url
                .clone()
                .or(file.import_url)
                .unwrap_or(defaults.import_url),
            timeout_secs: cli
                .timeout_secs
                .or(file.timeout_secs)
                .unwrap_or(defaults.timeout_secs),
        };

        Self {
            service,
            algorithm: cli.algorithm.or(file.algorithm).unwrap_or_default(),
            difficulty: cli.difficulty.or(file.difficulty).unwrap_or_default(),
            log_level: cli.log_level.clone().or(file.log_level),
            log_file: cli
                .log_file
                .clone()
                .or(file.log_file)
                .unwrap_or_else(default_log_path),
        }
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
}

pub fn default_log_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join("sudoku-solver.log")
}
