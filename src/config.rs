//! Configuration loading for Goalmet.
//!
//! Configuration follows a precedence chain:
//! 1. Environment variables (highest priority)
//! 2. Project config (`.goalmet/config.toml`)
//! 3. User config (`~/.goalmet/config.toml`)
//! 4. Defaults (lowest priority)
//!
//! All configuration is optional. The system runs with sensible defaults
//! when no config exists.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{GoalmetError, Result};

/// Default key the goal snapshot is stored under.
pub const DEFAULT_STORAGE_KEY: &str = "goals";

/// Valid values for the logging level field.
pub const VALID_LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

/// Main configuration struct for Goalmet.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Persistence configuration.
    pub storage: StorageConfig,
    /// Diagnostic logging configuration.
    pub logging: LoggingConfig,
}

/// Build target, which decides the storage backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    /// Web build: local storage.
    #[default]
    Development,
    /// Packaged-extension build: extension storage.
    Production,
}

impl Target {
    /// Parse a target name.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "development" => Some(Target::Development),
            "production" => Some(Target::Production),
            _ => None,
        }
    }
}

/// Persistence configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StorageConfig {
    /// Which backend to use.
    pub target: Target,
    /// Key the goal snapshot is read from and written to.
    pub key: String,
    /// Directory for storage files. Defaults to `<goalmet_home>/data`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            target: Target::Development,
            key: DEFAULT_STORAGE_KEY.to_string(),
            dir: None,
        }
    }
}

impl StorageConfig {
    /// Directory storage files live in.
    pub fn data_dir(&self) -> Option<PathBuf> {
        self.dir
            .clone()
            .or_else(|| goalmet_home().map(|h| h.join("data")))
    }
}

/// Diagnostic logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter level when `RUST_LOG` is not set.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl LoggingConfig {
    /// Check if a level value is valid.
    pub fn is_valid_level(value: &str) -> bool {
        VALID_LOG_LEVELS.contains(&value)
    }
}

impl Config {
    /// Load configuration with full precedence chain.
    pub fn load() -> Self {
        // Fail-open: without a cwd there is no project config, but user
        // config and env overrides still apply
        match env::current_dir() {
            Ok(cwd) => Self::load_from_cwd(&cwd),
            Err(_) => {
                let mut config = Config::default();
                if let Some(user_config) = Self::load_user_config() {
                    config = config.merge(user_config);
                }
                config.apply_env_overrides();
                config
            }
        }
    }

    /// Load configuration with a specific working directory.
    pub fn load_from_cwd(cwd: &Path) -> Self {
        let mut config = Config::default();

        if let Some(user_config) = Self::load_user_config() {
            config = config.merge(user_config);
        }

        if let Some(project_config) = Self::load_project_config(cwd) {
            config = config.merge(project_config);
        }

        config.apply_env_overrides();

        config
    }

    /// Load user config from `~/.goalmet/config.toml`.
    fn load_user_config() -> Option<Config> {
        let config_path = goalmet_home()?.join("config.toml");
        Self::load_optional(&config_path)
    }

    /// Load project config from `.goalmet/config.toml` in the given directory.
    fn load_project_config(cwd: &Path) -> Option<Config> {
        let config_path = cwd.join(".goalmet").join("config.toml");
        Self::load_optional(&config_path)
    }

    /// Load a config file if it exists, warning about files that don't parse.
    fn load_optional(path: &Path) -> Option<Config> {
        if !path.exists() {
            return None;
        }
        match Self::load_from_file(path) {
            Ok(config) => Some(config),
            Err(err) => {
                tracing::warn!("ignoring config {}: {}", path.display(), err);
                None
            }
        }
    }

    /// Load config from a specific file path.
    fn load_from_file(path: &Path) -> Result<Config> {
        let content = fs::read_to_string(path).map_err(|e| GoalmetError::io(path, e))?;
        toml::from_str(&content).map_err(|e| GoalmetError::config(e.to_string()))
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        // GOALMET_TARGET
        if let Ok(val) = env::var("GOALMET_TARGET") {
            match Target::parse(&val) {
                Some(target) => self.storage.target = target,
                None => eprintln!(
                    "Warning: Invalid GOALMET_TARGET value '{}'. \
                    Valid values: [\"development\", \"production\"]. Using '{:?}'.",
                    val, self.storage.target
                ),
            }
        }

        // GOALMET_STORAGE_KEY
        if let Ok(val) = env::var("GOALMET_STORAGE_KEY") {
            if val.trim().is_empty() {
                eprintln!(
                    "Warning: GOALMET_STORAGE_KEY is empty. Using '{}'.",
                    self.storage.key
                );
            } else {
                self.storage.key = val;
            }
        }

        // GOALMET_DATA_DIR
        if let Ok(val) = env::var("GOALMET_DATA_DIR") {
            if !val.is_empty() {
                self.storage.dir = Some(PathBuf::from(val));
            }
        }

        // GOALMET_LOG
        if let Ok(val) = env::var("GOALMET_LOG") {
            if LoggingConfig::is_valid_level(&val) {
                self.logging.level = val;
            } else {
                eprintln!(
                    "Warning: Invalid GOALMET_LOG value '{}'. \
                    Valid values: {:?}. Using '{}'.",
                    val, VALID_LOG_LEVELS, self.logging.level
                );
            }
        }
    }

    /// Merge another config into this one.
    ///
    /// The `other` config takes precedence for every field where it differs
    /// from the default. A layer therefore cannot reset a value back to the
    /// default once a lower layer changed it.
    fn merge(mut self, other: Config) -> Self {
        let default_storage = StorageConfig::default();
        if other.storage.target != default_storage.target {
            self.storage.target = other.storage.target;
        }
        if other.storage.key != default_storage.key {
            self.storage.key = other.storage.key;
        }
        if other.storage.dir.is_some() {
            self.storage.dir = other.storage.dir;
        }

        if other.logging.level != LoggingConfig::default().level {
            self.logging.level = other.logging.level;
        }

        self
    }
}

/// Get the Goalmet home directory.
///
/// Checks the `GOALMET_HOME` environment variable first, then falls back to
/// `~/.goalmet`. An empty `GOALMET_HOME` is ignored.
pub fn goalmet_home() -> Option<PathBuf> {
    if let Ok(home) = env::var("GOALMET_HOME") {
        if home.is_empty() {
            tracing::warn!("GOALMET_HOME is empty, using default");
        } else {
            let path = PathBuf::from(&home);
            if path.is_absolute() {
                return Some(path);
            }
            if let Ok(canonical) = path.canonicalize() {
                return Some(canonical);
            }
            tracing::warn!("GOALMET_HOME is relative and doesn't exist, using as-is");
            return Some(path);
        }
    }

    if let Some(home) = dirs::home_dir() {
        return Some(home.join(".goalmet"));
    }

    // Containerized/minimal environments without HOME
    let fallback_path = env::temp_dir().join("goalmet");
    tracing::warn!(
        "HOME not set, using fallback location: {}",
        fallback_path.display()
    );
    Some(fallback_path)
}
