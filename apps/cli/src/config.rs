//! CLI configuration file support.
//!
//! Configuration precedence:
//! 1. CLI arguments (handled by clap)
//! 2. Local config file (./.heraldrc)
//! 3. Global config file (~/.herald/config.toml)
//! 4. Defaults

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// CLI configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CliConfig {
    /// String table overriding the built-in one
    #[serde(default)]
    pub strings: Option<PathBuf>,

    /// Delay between simulated job steps, in milliseconds
    #[serde(default)]
    pub step_ms: Option<u64>,

    /// Number of entry batches the simulated job loads
    #[serde(default)]
    pub batches: Option<u32>,

    /// Log level
    #[serde(default)]
    pub log_level: Option<String>,

    /// Output format preferences
    #[serde(default)]
    pub output: OutputConfig,
}

/// Output format configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Default output format (human, json)
    #[serde(default = "default_output_format")]
    pub format: String,
}

fn default_output_format() -> String {
    "human".to_string()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { format: default_output_format() }
    }
}

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum CliConfigError {
    /// Configuration file not found.
    #[error("Configuration file not found: {0}")]
    NotFound(String),

    /// Failed to read configuration file.
    #[error("Failed to read configuration file: {0}")]
    ReadError(String),

    /// Failed to parse configuration file.
    #[error("Failed to parse configuration file: {0}")]
    ParseError(String),
}

/// Result type for configuration operations.
pub type CliConfigResult<T> = std::result::Result<T, CliConfigError>;

impl CliConfig {
    /// Load configuration from a TOML file.
    pub fn load_from_file(path: &Path) -> CliConfigResult<Self> {
        if !path.exists() {
            return Err(CliConfigError::NotFound(path.display().to_string()));
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| CliConfigError::ReadError(format!("{}: {}", path.display(), e)))?;

        toml::from_str(&content).map_err(|e| CliConfigError::ParseError(format!("{}: {}", path.display(), e)))
    }

    /// Get default global configuration file path.
    pub fn default_global_path() -> PathBuf {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(".herald")
            .join("config.toml")
    }

    /// Get default local configuration file path.
    pub fn default_local_path() -> PathBuf {
        PathBuf::from(".heraldrc")
    }

    /// Discover and load configuration files.
    ///
    /// Local config overrides global config. Missing files are skipped;
    /// unreadable or malformed ones are skipped and returned so the caller
    /// can report them once logging is set up.
    pub fn discover_and_load() -> (Self, Vec<CliConfigError>) {
        let mut config = Self::default();
        let mut problems = Vec::new();

        for path in [Self::default_global_path(), Self::default_local_path()] {
            match Self::load_from_file(&path) {
                Ok(found) => config.merge(&found),
                Err(CliConfigError::NotFound(_)) => {}
                Err(e) => problems.push(e),
            }
        }

        (config, problems)
    }

    /// Merge another configuration into this one.
    ///
    /// Values from `other` override values in `self` if they are Some.
    pub fn merge(&mut self, other: &Self) {
        if let Some(ref strings) = other.strings {
            self.strings = Some(strings.clone());
        }
        if let Some(step_ms) = other.step_ms {
            self.step_ms = Some(step_ms);
        }
        if let Some(batches) = other.batches {
            self.batches = Some(batches);
        }
        if let Some(ref log_level) = other.log_level {
            self.log_level = Some(log_level.clone());
        }
        if other.output.format != "human" {
            self.output.format = other.output.format.clone();
        }
    }

    pub fn wants_json(&self) -> bool {
        self.output.format.eq_ignore_ascii_case("json")
    }
}

/// Load and merge CLI configuration.
pub fn load_config() -> (CliConfig, Vec<CliConfigError>) {
    CliConfig::discover_and_load()
}
