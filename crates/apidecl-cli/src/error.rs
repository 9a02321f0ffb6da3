//! Error types and handling for the CLI

use apidecl_core::loader::LoaderError;
use apidecl_core::ReferenceError;
use std::io;
use std::path::PathBuf;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for CLI operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error (file operations, etc.)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// A declaration file could not be read or applied
    #[error("{0}")]
    Loader(#[from] LoaderError),

    /// A declaration refers to something that does not resolve
    #[error("Reference error: {0}")]
    Reference(#[from] ReferenceError),

    /// Document rendering failed
    #[error("Render error: {0}")]
    Render(#[from] apidecl_openapi::Error),

    /// File not found
    #[error("File not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid argument combination
    #[error("Invalid arguments: {0}")]
    InvalidArgs(String),

    /// The named schema is not declared
    #[error("Schema '{}' is not declared", name)]
    SchemaNotFound { name: String },

    /// The cast input failed validation
    #[error("Input is invalid: {} error(s)", count)]
    Invalid { count: usize },

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Generic error with context
    #[error("{message}")]
    Other { message: String },
}

impl Error {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a generic error with message
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Io(_) => 1,
            Self::Loader(_) => 2,
            Self::Reference(_) => 3,
            Self::Render(_) => 4,
            Self::FileNotFound { .. } => 5,
            Self::Config(_) => 6,
            Self::InvalidArgs(_) => 7,
            Self::SchemaNotFound { .. } => 8,
            Self::Invalid { .. } => 9,
            Self::Json(_) => 12,
            Self::Yaml(_) => 13,
            Self::Other { .. } => 99,
        }
    }

    /// Check if this error should display usage help
    pub fn should_show_help(&self) -> bool {
        matches!(self, Self::InvalidArgs(_))
    }
}

/// Format an error for display to the user
pub fn format_error(error: &Error, use_color: bool) -> String {
    if use_color {
        use colored::Colorize;
        format!("{} {}", "Error:".red().bold(), error)
    } else {
        format!("Error: {}", error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use apidecl_core::ComponentKind;

    #[test]
    fn test_exit_codes_are_distinct() {
        let errors = [
            Error::Io(io::Error::new(io::ErrorKind::Other, "boom")),
            Error::Reference(ReferenceError::missing(ComponentKind::Schema, "Pet")),
            Error::FileNotFound { path: PathBuf::from("pets.yaml") },
            Error::config("bad"),
            Error::InvalidArgs("conflict".into()),
            Error::SchemaNotFound { name: "Pet".into() },
            Error::Invalid { count: 2 },
            Error::other("misc"),
        ];
        let mut codes: Vec<i32> = errors.iter().map(Error::exit_code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
        assert!(codes.iter().all(|code| *code != 0));
    }

    #[test]
    fn test_format_error_plain() {
        let error = Error::SchemaNotFound { name: "Pet".into() };
        assert_eq!(format_error(&error, false), "Error: Schema 'Pet' is not declared");
        assert!(Error::InvalidArgs("x".into()).should_show_help());
        assert!(!error.should_show_help());
    }
}
