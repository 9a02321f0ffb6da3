//! Command-line interface argument parsing and definitions
//!
//! This module defines the CLI structure using clap's derive API.

use apidecl_openapi::OpenApiVersion;
use clap::{Parser, Subcommand, ValueEnum};
use is_terminal::IsTerminal;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// apidecl - declare API data shapes once, render and enforce them everywhere
///
/// Loads YAML or JSON declarations of schemas, components and operations,
/// renders them as OpenAPI 2.0, 3.0 or 3.1 documents, and casts and
/// validates payloads against them.
#[derive(Parser, Debug)]
#[command(
    name = "apidecl",
    version,
    author,
    about,
    long_about = None,
    propagate_version = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Enable verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "APIDECL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format for results [default: from config, else human]
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render declarations as an OpenAPI document
    Render(RenderArgs),

    /// Cast an input file against a declared schema and validate it
    Cast(CastArgs),

    /// Load declarations and resolve every reference
    Check(CheckArgs),

    /// Generate shell completions for the specified shell
    Completions(CompletionsArgs),
}

/// Arguments for the render command
#[derive(Parser, Debug)]
pub struct RenderArgs {
    /// Declaration files (JSON or YAML), applied in order
    #[arg(value_name = "DECLARATION", required = true)]
    pub declarations: Vec<PathBuf>,

    /// OpenAPI version to produce: 2.0, 3.0 or 3.1
    #[arg(id = "openapi", long = "openapi", value_name = "VERSION")]
    pub version: Option<OpenApiVersion>,

    /// Write the document to a file instead of stdout (YAML for .yaml/.yml)
    #[arg(long = "save-to", value_name = "OUTPUT_FILE")]
    pub save_to: Option<PathBuf>,
}

/// Arguments for the cast command
#[derive(Parser, Debug)]
pub struct CastArgs {
    /// Declaration files (JSON or YAML), applied in order
    #[arg(value_name = "DECLARATION", required = true)]
    pub declarations: Vec<PathBuf>,

    /// Name of the registered schema to cast against
    #[arg(short, long)]
    pub schema: String,

    /// Input payload (JSON or YAML)
    #[arg(short, long, value_name = "INPUT_FILE")]
    pub input: PathBuf,

    /// Treat the input as parsed wire data (string scalars, `name[]` keys)
    #[arg(long)]
    pub wire: bool,

    /// Locale for error messages
    #[arg(long)]
    pub locale: Option<String>,
}

/// Arguments for the check command
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Declaration files (JSON or YAML), applied in order
    #[arg(value_name = "DECLARATION", required = true)]
    pub declarations: Vec<PathBuf>,
}

/// Arguments for generating shell completions
#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Output format options
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// Human-readable formatted output
    Human,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
    /// Pretty-printed JSON output
    JsonPretty,
}

/// Supported shells for completion generation
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the effective verbosity level (considering quiet flag)
    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }

    /// Check if colored output should be used
    pub fn use_color(&self) -> bool {
        !self.no_color && std::io::stdout().is_terminal()
    }
}

impl Shell {
    /// Convert to clap_complete shell type
    pub fn to_clap_shell(self) -> clap_complete::Shell {
        match self {
            Shell::Bash => clap_complete::Shell::Bash,
            Shell::Zsh => clap_complete::Shell::Zsh,
            Shell::Fish => clap_complete::Shell::Fish,
            Shell::PowerShell => clap_complete::Shell::PowerShell,
            Shell::Elvish => clap_complete::Shell::Elvish,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_render_arguments() {
        let cli = Cli::parse_from(["apidecl", "render", "pets.yaml", "users.yaml", "--openapi", "3.1"]);
        match cli.command {
            Commands::Render(args) => {
                assert_eq!(args.declarations.len(), 2);
                assert_eq!(args.version, Some(OpenApiVersion::V31));
                assert!(args.save_to.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_rejects_unsupported_version() {
        let result = Cli::try_parse_from(["apidecl", "render", "pets.yaml", "--openapi", "4.0"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cast_arguments() {
        let cli = Cli::parse_from([
            "apidecl", "-vv", "cast", "pets.yaml", "--schema", "Pet", "--input", "rex.json", "--wire",
        ]);
        assert_eq!(cli.verbosity_level(), 2);
        match cli.command {
            Commands::Cast(args) => {
                assert_eq!(args.schema, "Pet");
                assert!(args.wire);
                assert!(args.locale.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_quiet_overrides_verbosity() {
        let cli = Cli::parse_from(["apidecl", "--quiet", "check", "pets.yaml"]);
        assert!(cli.quiet);
        assert_eq!(cli.verbosity_level(), 0);
    }

    #[test]
    fn test_output_format_names() {
        let cli = Cli::parse_from(["apidecl", "-o", "json-pretty", "check", "pets.yaml"]);
        assert_eq!(cli.output, Some(OutputFormat::JsonPretty));
    }
}
