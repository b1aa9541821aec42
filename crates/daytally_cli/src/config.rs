//! CLI configuration loaded from `config.toml`.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "daytally";
const DB_FILE_NAME: &str = "daytally.sqlite3";

/// Settings read from `<config_dir>/daytally/config.toml`.
///
/// Every key is optional; missing keys fall back to platform data paths.
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// SQLite database file.
    pub db_path: Option<PathBuf>,
    /// One of `trace|debug|info|warn|error`.
    pub log_level: Option<String>,
    /// Absolute directory for rolling log files.
    pub log_dir: Option<PathBuf>,
}

/// Fully resolved settings used by commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub db_path: PathBuf,
    pub log_level: String,
    pub log_dir: PathBuf,
}

/// Get the default config file path (`<config_dir>/daytally/config.toml`)
pub fn default_config_path() -> Result<PathBuf> {
    let dir = dirs::config_dir().context("Could not determine config directory")?;
    Ok(dir.join(APP_DIR).join("config.toml"))
}

fn data_dir() -> Result<PathBuf> {
    let dir = dirs::data_dir().context("Could not determine data directory")?;
    Ok(dir.join(APP_DIR))
}

/// Load config from `path`, or from the default location when `None`.
///
/// A missing file is not an error and yields an empty config.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => default_config_path()?,
    };

    if !path.exists() {
        return Ok(Config::default());
    }

    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    parse_config(&contents).with_context(|| format!("Invalid config file {}", path.display()))
}

pub fn parse_config(contents: &str) -> Result<Config> {
    Ok(toml::from_str(contents)?)
}

impl Config {
    /// Fills in defaults and applies the `--db` override.
    pub fn resolve(self, db_override: Option<PathBuf>) -> Result<Settings> {
        let db_path = match db_override.or(self.db_path) {
            Some(path) => path,
            None => data_dir()?.join(DB_FILE_NAME),
        };
        let log_dir = match self.log_dir {
            Some(dir) => dir,
            None => data_dir()?.join("logs"),
        };
        let log_level = self
            .log_level
            .unwrap_or_else(|| daytally_core::default_log_level().to_string());

        Ok(Settings {
            db_path,
            log_level,
            log_dir,
        })
    }
}
