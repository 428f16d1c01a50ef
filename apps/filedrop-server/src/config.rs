//! Process-wide configuration
//!
//! Configuration is read once at startup from the environment, after the
//! `.env` file has been loaded into it. A missing `.env` file is fatal.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use filedrop_domain::ingestion::DEFAULT_MAX_CONCURRENT_TASKS;
use filedrop_local::{infrastructure::DEFAULT_COMMAND_TEMPLATE, ShellActionConfig};
use thiserror::Error;
use tracing::info;

/// Default request body limit (100MB)
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 100 * 1024 * 1024;

/// Errors that prevent the service from starting
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The `.env` file could not be loaded
    #[error("Error loading .env file: {0}")]
    EnvFile(#[from] dotenvy::Error),

    /// A variable is set but cannot be parsed
    #[error("Invalid value {value:?} for {variable}")]
    Invalid { variable: String, value: String },
}

/// Service configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub uploads_dir: PathBuf,
    pub processed_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub max_concurrent_tasks: usize,
    pub action: ShellActionConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 9090,
            uploads_dir: PathBuf::from("uploads"),
            processed_dir: PathBuf::from("processed"),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            max_concurrent_tasks: DEFAULT_MAX_CONCURRENT_TASKS,
            action: ShellActionConfig::default(),
        }
    }
}

impl Config {
    /// Load the `.env` file, then read the configuration from the environment
    ///
    /// # Errors
    ///
    /// - `ConfigError::EnvFile` if no `.env` file can be found or parsed
    /// - `ConfigError::Invalid` if a numeric variable does not parse
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Path::new(".env"))
    }

    /// Load the environment file at `path`, then read the configuration
    ///
    /// # Errors
    ///
    /// Same as [`Config::load`].
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        dotenvy::from_path(path)?;
        info!(path = %path.display(), "Loaded environment file");
        Self::from_env()
    }

    /// Read the configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read the configuration through `lookup`, falling back to defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Ok(Self {
            host: lookup("FILEDROP_HOST").unwrap_or(defaults.host),
            port: parse_var(&lookup, "FILEDROP_PORT", defaults.port)?,
            uploads_dir: lookup("FILEDROP_UPLOADS_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.uploads_dir),
            processed_dir: lookup("FILEDROP_PROCESSED_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.processed_dir),
            max_upload_bytes: parse_var(
                &lookup,
                "FILEDROP_MAX_UPLOAD_BYTES",
                defaults.max_upload_bytes,
            )?,
            max_concurrent_tasks: parse_var(
                &lookup,
                "FILEDROP_MAX_CONCURRENT_TASKS",
                defaults.max_concurrent_tasks,
            )?,
            action: ShellActionConfig {
                unix_program: lookup("APP_DEMO"),
                windows_program: lookup("APP_WIND"),
                command_template: lookup("FILEDROP_ACTION_TEMPLATE")
                    .unwrap_or_else(|| DEFAULT_COMMAND_TEMPLATE.to_string()),
            },
        })
    }

    /// Address to bind the HTTP listener to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_var<F, T>(lookup: &F, variable: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(variable) {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
            variable: variable.to_string(),
            value,
        }),
    }
}
