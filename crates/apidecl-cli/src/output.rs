//! Output formatting and writing utilities
//!
//! Results are written as human-readable text, JSON, pretty JSON or YAML.
//! Status lines (info, success, warning) only appear in human mode so that
//! machine formats stay parseable.

use crate::cli::OutputFormat;
use crate::error::Result;
use crate::logging::redaction;
use apidecl_core::ValidationError;
use colored::Colorize;
use is_terminal::IsTerminal;
use serde::Serialize;
use serde_json::Value;
use std::io::{self, Write};
use tracing::trace;

/// One validation failure with its rendered message
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorEntry {
    #[serde(flatten)]
    pub error: ValidationError,
    pub message: String,
}

/// Outcome of `apidecl cast`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CastReport {
    pub schema: String,
    pub valid: bool,
    pub value: Value,
    pub errors: Vec<ErrorEntry>,
}

/// Formatting of results for each output format
pub trait OutputFormatter {
    /// Format a serializable value
    fn format<T: Serialize>(&self, value: &T) -> Result<String>;

    /// Format the outcome of a cast
    fn format_cast_report(&self, report: &CastReport) -> Result<String>;
}

impl OutputFormatter for OutputFormat {
    fn format<T: Serialize>(&self, value: &T) -> Result<String> {
        match self {
            OutputFormat::Json => Ok(serde_json::to_string(value)?),
            OutputFormat::JsonPretty | OutputFormat::Human => Ok(serde_json::to_string_pretty(value)?),
            OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?),
        }
    }

    fn format_cast_report(&self, report: &CastReport) -> Result<String> {
        match self {
            OutputFormat::Human => format_cast_report_human(report),
            _ => self.format(report),
        }
    }
}

/// Output writer that handles different output formats and colors
pub struct OutputWriter {
    format: OutputFormat,
    use_color: bool,
    quiet: bool,
    writer: Box<dyn Write>,
}

impl OutputWriter {
    pub fn new(format: OutputFormat, use_color: bool, quiet: bool) -> Self {
        Self {
            format,
            use_color: use_color && io::stdout().is_terminal(),
            quiet,
            writer: Box::new(io::stdout()),
        }
    }

    /// Create an output writer with a custom writer
    pub fn with_writer(format: OutputFormat, use_color: bool, quiet: bool, writer: Box<dyn Write>) -> Self {
        Self {
            format,
            use_color,
            quiet,
            writer,
        }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Write raw output
    pub fn write(&mut self, content: &str) -> Result<()> {
        write!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Write a line of output
    pub fn writeln(&mut self, content: &str) -> Result<()> {
        writeln!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }

    fn is_human(&self) -> bool {
        self.format == OutputFormat::Human
    }

    /// Write an info message
    pub fn info(&mut self, message: &str) -> Result<()> {
        if self.quiet || !self.is_human() {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&format!("{} {}", "ℹ".blue(), message))
        } else {
            self.writeln(&format!("INFO: {}", message))
        }
    }

    /// Write a success message
    pub fn success(&mut self, message: &str) -> Result<()> {
        if self.quiet || !self.is_human() {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.green().to_string())
        } else {
            self.writeln(message)
        }
    }

    /// Write a warning message
    pub fn warning(&mut self, message: &str) -> Result<()> {
        if !self.is_human() {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.yellow().to_string())
        } else {
            self.writeln(&format!("WARNING: {}", message))
        }
    }

    /// Write data in the configured format
    pub fn data<T: Serialize>(&mut self, value: &T) -> Result<()> {
        let formatted = self.format.format(value)?;
        if self.is_human() || self.format == OutputFormat::Json {
            self.writeln(&formatted)
        } else {
            self.write(&formatted)
        }
    }

    /// Write a cast report; payload values are redacted in the trace log
    pub fn cast_report(&mut self, report: &CastReport) -> Result<()> {
        let mut logged = report.value.clone();
        redaction::redact_json_value(&mut logged);
        trace!(schema = %report.schema, value = %logged, "Writing cast report");

        let formatted = self.format.format_cast_report(report)?;
        self.writeln(formatted.trim_end())
    }
}

/// Format a cast report for human reading
fn format_cast_report_human(report: &CastReport) -> Result<String> {
    let mut output = String::new();

    if report.valid {
        output.push_str(&format!("✅ {} is valid\n\n", report.schema));
    } else {
        output.push_str(&format!(
            "❌ {} is invalid - {} error(s)\n",
            report.schema,
            report.errors.len()
        ));
        for error in &report.errors {
            output.push_str(&format!("  • {}\n", error.message));
        }
        output.push('\n');
    }

    output.push_str("📝 Value:\n");
    output.push_str(&serde_json::to_string_pretty(&report.value)?);
    output.push('\n');

    Ok(output)
}
