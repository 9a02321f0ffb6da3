//! Configuration management for the CLI
//!
//! Configuration is read from the first file found among:
//! - the `--config` flag or `APIDECL_CONFIG`
//! - `.apidecl.yaml` / `.apidecl.json` in the current directory
//! - `apidecl/config.yaml` / `config.json` in the user config directory
//! - `~/.apidecl.yaml` / `~/.apidecl.json`
//!
//! Command-line flags override anything read here.

use crate::cli::OutputFormat;
use crate::error::{Error, Result};
use apidecl_core::EngineConfig;
use apidecl_openapi::OpenApiVersion;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// OpenAPI version rendered when `--openapi` is not given
    pub openapi: OpenApiVersion,

    /// Output settings
    pub output: OutputConfig,

    /// Settings handed to every registry the CLI builds
    pub engine: EngineConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format
    pub format: OutputFormat,

    /// Use colored output by default
    pub color: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error); verbosity flags win
    pub level: Option<String>,

    /// Log format (compact, full, json)
    pub format: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            openapi: OpenApiVersion::default(),
            output: OutputConfig::default(),
            engine: EngineConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Human,
            color: true,
        }
    }
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|s| s.to_str()),
        Some("yaml") | Some("yml")
    )
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path)?;
        let config = if is_yaml(path) {
            serde_yaml::from_str(&content)
                .map_err(|e| Error::config(format!("{}: {}", path.display(), e)))?
        } else {
            serde_json::from_str(&content)
                .map_err(|e| Error::config(format!("{}: {}", path.display(), e)))?
        };

        Ok(config)
    }

    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        for path in Self::default_config_paths() {
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file or default locations
    pub fn load_with_file(file: Option<&Path>) -> Result<Self> {
        match file {
            Some(path) => Self::from_file(path),
            None => Self::load(),
        }
    }

    /// Default configuration file paths, in lookup order
    fn default_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(".apidecl.yaml"), PathBuf::from(".apidecl.json")];

        if let Some(config_dir) = dirs::config_dir() {
            let apidecl_dir = config_dir.join("apidecl");
            paths.push(apidecl_dir.join("config.yaml"));
            paths.push(apidecl_dir.join("config.json"));
        }

        if let Some(home_dir) = dirs::home_dir() {
            paths.push(home_dir.join(".apidecl.yaml"));
            paths.push(home_dir.join(".apidecl.json"));
        }

        paths
    }
}

/// Builder for creating configurations programmatically
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an already loaded configuration
    pub fn from_config(config: Config) -> Self {
        Self { config }
    }

    pub fn openapi(mut self, version: OpenApiVersion) -> Self {
        self.config.openapi = version;
        self
    }

    pub fn output_format(mut self, format: OutputFormat) -> Self {
        self.config.output.format = format;
        self
    }

    pub fn locale(mut self, locale: impl Into<String>) -> Self {
        self.config.engine.locale = locale.into();
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
