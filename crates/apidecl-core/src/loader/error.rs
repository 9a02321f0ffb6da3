//! Error types for declaration loading
//!
//! Copyright (c) 2025 Apidecl Team
//! Licensed under the Apache-2.0 license

use crate::error::DeclarationError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for loader operations
pub type LoaderResult<T> = Result<T, LoaderError>;

/// Errors raised while reading declaration files into a registry
#[derive(Error, Debug)]
pub enum LoaderError {
    /// File I/O errors
    #[error("Failed to read file '{path}': {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    /// YAML parsing errors
    #[error("Failed to parse YAML file '{path}': {source}")]
    YamlParseError {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    /// JSON parsing errors
    #[error("Failed to parse JSON file '{path}': {source}")]
    JsonParseError {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// Unsupported file format
    #[error("Unsupported file format for '{path}'. Expected .yaml, .yml, or .json")]
    UnsupportedFormat { path: PathBuf },

    /// The document parsed but does not describe a valid declaration
    #[error("Invalid declaration in '{path}': {source}")]
    InvalidDeclaration {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// A component was rejected while being registered
    #[error("Invalid declaration in '{path}': {source}")]
    DeclarationError {
        path: PathBuf,
        source: DeclarationError,
    },
}

impl LoaderError {
    /// Create an I/O error with path context
    pub fn io_error(path: PathBuf, error: std::io::Error) -> Self {
        Self::IoError { path, source: error }
    }

    /// Create a YAML parsing error with path context
    pub fn yaml_parse_error(path: PathBuf, error: serde_yaml::Error) -> Self {
        Self::YamlParseError { path, source: error }
    }

    /// Create a JSON parsing error with path context
    pub fn json_parse_error(path: PathBuf, error: serde_json::Error) -> Self {
        Self::JsonParseError { path, source: error }
    }

    /// Create an unsupported format error
    pub fn unsupported_format(path: PathBuf) -> Self {
        Self::UnsupportedFormat { path }
    }

    /// Get the path associated with this error
    pub fn path(&self) -> &PathBuf {
        match self {
            Self::IoError { path, .. }
            | Self::YamlParseError { path, .. }
            | Self::JsonParseError { path, .. }
            | Self::UnsupportedFormat { path }
            | Self::InvalidDeclaration { path, .. }
            | Self::DeclarationError { path, .. } => path,
        }
    }
}
