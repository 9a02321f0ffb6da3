//! Logging setup for the apidecl CLI
//!
//! Installs a `tracing-subscriber` whose level and format follow the
//! verbosity flags, the configuration file and the `RUST_LOG` /
//! `APIDECL_LOG_FORMAT` environment variables. Every run gets a request id
//! and the [`timing::Timer`] helper records how long each phase took.

use crate::config;
use crate::error::{Error, Result};
use is_terminal::IsTerminal;
use std::sync::OnceLock;
use tracing::{field, Span};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

/// Request id of the current run
static REQUEST_ID: OnceLock<String> = OnceLock::new();

/// Resolved subscriber settings for one run
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `warn` or `apidecl_core=debug`
    pub level: String,
    pub format: LogFormat,
    /// Colored stderr output when stderr is a terminal
    pub console: bool,
    pub thread_ids: bool,
    /// Attach file and line to each event
    pub source_location: bool,
}

/// Shape of each log line on stderr
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// One line per event, the default
    Compact,
    /// Multi-line events with span context
    Full,
    /// Newline-delimited JSON
    Json,
}

impl LogFormat {
    fn parse(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "compact" => Some(LogFormat::Compact),
            "full" => Some(LogFormat::Full),
            "json" => Some(LogFormat::Json),
            _ => None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::Compact,
            console: true,
            thread_ids: false,
            source_location: false,
        }
    }
}

impl LoggingConfig {
    /// Settings for `-v` repeated `verbosity` times (0: warn, 1: info, 2: debug, 3+: trace)
    pub fn from_verbosity(verbosity: u8) -> Self {
        let mut config = Self::default();

        match verbosity {
            0 => {}
            1 => config.level = "info".to_string(),
            2 => {
                config.level = "debug".to_string();
                config.source_location = true;
            }
            _ => {
                config.level = "trace".to_string();
                config.format = LogFormat::Full;
                config.source_location = true;
                config.thread_ids = true;
            }
        }

        config
    }

    /// Apply settings from the configuration file.
    ///
    /// The file's level only applies when no `-v` flag was given.
    pub fn merge_with_file(&mut self, settings: &config::LoggingConfig, verbosity: u8) {
        if verbosity == 0 {
            if let Some(level) = &settings.level {
                self.level = level.clone();
            }
        }
        if let Some(format) = settings.format.as_deref() {
            match LogFormat::parse(format) {
                Some(format) => self.format = format,
                None => eprintln!("Warning: unknown log format '{}' in configuration", format),
            }
        }
    }

    /// Apply environment overrides
    pub fn merge_with_env(&mut self) {
        if let Ok(rust_log) = std::env::var("RUST_LOG") {
            self.level = rust_log;
        }

        if let Ok(format) = std::env::var("APIDECL_LOG_FORMAT") {
            match LogFormat::parse(&format) {
                Some(format) => self.format = format,
                None => eprintln!("Warning: invalid APIDECL_LOG_FORMAT '{}', using default", format),
            }
        }
    }
}

/// Install the global subscriber and assign this run its request id
pub fn init_logging(config: LoggingConfig) -> Result<()> {
    let env_filter = EnvFilter::try_new(&config.level)
        .map_err(|e| Error::config(format!("Invalid log level '{}': {}", config.level, e)))?;
    let ansi = config.console && std::io::stderr().is_terminal();

    // each format builds a different subscriber type
    let installed = match config.format {
        LogFormat::Compact => tracing::subscriber::set_global_default(
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_ansi(ansi)
                .with_thread_ids(config.thread_ids)
                .with_file(config.source_location)
                .with_line_number(config.source_location)
                .compact()
                .finish(),
        ),
        LogFormat::Json => tracing::subscriber::set_global_default(
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_ansi(false)
                .with_thread_ids(config.thread_ids)
                .with_file(config.source_location)
                .with_line_number(config.source_location)
                .json()
                .finish(),
        ),
        LogFormat::Full => tracing::subscriber::set_global_default(
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_ansi(ansi)
                .with_thread_ids(config.thread_ids)
                .with_file(config.source_location)
                .with_line_number(config.source_location)
                .finish(),
        ),
    };
    installed.map_err(|e| Error::other(format!("Failed to initialize logging: {}", e)))?;

    let request_id = generate_request_id();
    REQUEST_ID
        .set(request_id.clone())
        .map_err(|_| Error::other("Logging was already initialized"))?;

    tracing::debug!(request_id = %request_id, config = ?config, "Logging system initialized");
    Ok(())
}

/// Generate a unique request ID for this run
pub fn generate_request_id() -> String {
    format!("req_{}", Uuid::new_v4().simple())
}

/// Request id assigned by [`init_logging`], if it ran
pub fn current_request_id() -> Option<&'static str> {
    REQUEST_ID.get().map(|s| s.as_str())
}

fn operation_span(operation: &str, details: Option<&str>) -> Span {
    tracing::info_span!(
        "operation",
        operation = operation,
        request_id = current_request_id().unwrap_or("unknown"),
        details = details.unwrap_or(""),
        duration_ms = field::Empty,
    )
}

/// Masking of secrets in payloads before they reach the logs
pub mod redaction {
    use regex::Regex;
    use serde_json::Value;
    use std::sync::OnceLock;

    static SECRET_ASSIGNMENT: OnceLock<Regex> = OnceLock::new();

    fn secret_assignment() -> &'static Regex {
        SECRET_ASSIGNMENT.get_or_init(|| {
            Regex::new(r#"(?i)(api[_-]?key|token|bearer|password|passwd|secret)[=:\s]+['"]?[^\s'"&]{3,}['"]?"#)
                .expect("redaction pattern is valid")
        })
    }

    /// Mask `key=value` style secrets inside free text
    pub fn redact_sensitive(input: &str) -> String {
        secret_assignment().replace_all(input, "$1=***").into_owned()
    }

    /// Mask values under secret-looking keys, recursively
    pub fn redact_json_value(value: &mut Value) {
        match value {
            Value::Object(map) => {
                for (key, val) in map.iter_mut() {
                    if is_sensitive_key(key) {
                        *val = Value::String("***".to_string());
                    } else {
                        redact_json_value(val);
                    }
                }
            }
            Value::Array(items) => items.iter_mut().for_each(redact_json_value),
            Value::String(text) => *text = redact_sensitive(text),
            _ => {}
        }
    }

    fn is_sensitive_key(key: &str) -> bool {
        let key = key.to_lowercase();
        ["password", "passwd", "secret", "token", "api_key", "apikey", "credential"]
            .iter()
            .any(|marker| key.contains(marker))
    }
}

/// Phase timings (loading, casting, rendering)
pub mod timing {
    use std::time::Instant;
    use tracing::Span;

    /// Records its span's duration when dropped
    pub struct Timer {
        start: Instant,
        span: Span,
        operation: String,
    }

    impl Timer {
        pub fn new(operation: &str) -> Self {
            Self {
                start: Instant::now(),
                span: super::operation_span(operation, None),
                operation: operation.to_string(),
            }
        }

        pub fn with_details(operation: &str, details: &str) -> Self {
            Self {
                start: Instant::now(),
                span: super::operation_span(operation, Some(details)),
                operation: operation.to_string(),
            }
        }
    }

    impl Drop for Timer {
        fn drop(&mut self) {
            let duration = self.start.elapsed();
            self.span.record("duration_ms", duration.as_millis() as u64);

            tracing::debug!(
                operation = %self.operation,
                duration_ms = duration.as_millis() as u64,
                "Operation completed"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_redaction() {
        let redacted = redaction::redact_sensitive("password=hunter22 name=rex");
        assert_eq!(redacted, "password=*** name=rex");
    }

    #[test]
    fn test_json_redaction() {
        let mut value = json!({
            "username": "rex",
            "password": "hunter22",
            "profile": { "api_key": "abc123456789", "bio": "token: s3cr3t-value" }
        });

        redaction::redact_json_value(&mut value);

        assert_eq!(value["username"], "rex");
        assert_eq!(value["password"], "***");
        assert_eq!(value["profile"]["api_key"], "***");
        assert_eq!(value["profile"]["bio"], "token=***");
    }

    #[test]
    fn test_logging_config_from_verbosity() {
        let config = LoggingConfig::from_verbosity(0);
        assert_eq!(config.level, "warn");
        assert!(!config.source_location);

        let config = LoggingConfig::from_verbosity(2);
        assert_eq!(config.level, "debug");
        assert!(config.source_location);

        let config = LoggingConfig::from_verbosity(3);
        assert_eq!(config.level, "trace");
        assert_eq!(config.format, LogFormat::Full);
        assert!(config.thread_ids);
    }

    #[test]
    fn test_file_settings_yield_to_flags() {
        let settings = config::LoggingConfig {
            level: Some("info".to_string()),
            format: Some("json".to_string()),
        };

        let mut quiet = LoggingConfig::from_verbosity(0);
        quiet.merge_with_file(&settings, 0);
        assert_eq!(quiet.level, "info");
        assert_eq!(quiet.format, LogFormat::Json);

        let mut verbose = LoggingConfig::from_verbosity(2);
        verbose.merge_with_file(&settings, 2);
        assert_eq!(verbose.level, "debug");
    }

    #[test]
    fn test_request_ids_are_unique() {
        let first = generate_request_id();
        assert!(first.starts_with("req_"));
        assert_ne!(first, generate_request_id());
    }
}
