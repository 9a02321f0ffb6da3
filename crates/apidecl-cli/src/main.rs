//! apidecl CLI - render declared APIs as OpenAPI and enforce them on payloads
//!
//! This is the entry point for the `apidecl` binary. It wires argument
//! parsing, configuration, logging and output together and dispatches to the
//! command handlers.

mod cli;
mod config;
mod error;
mod handlers;
mod logging;
mod output;

use cli::{Cli, Commands};
use colored::control;
use config::{Config, ConfigBuilder};
use error::Result;
use logging::{timing::Timer, LoggingConfig};
use output::OutputWriter;
use std::process;
use tracing::instrument;

fn main() {
    let cli = Cli::parse_args();

    control::set_override(cli.use_color());

    let result = Config::load_with_file(cli.config.as_deref()).and_then(|config| {
        if let Err(e) = init_logging(&cli, &config) {
            eprintln!("Failed to initialize logging: {}", e);
        }
        run(cli, config)
    });

    match result {
        Ok(()) => process::exit(0),
        Err(e) => {
            eprintln!("{}", error::format_error(&e, control::SHOULD_COLORIZE.should_colorize()));

            if e.should_show_help() {
                eprintln!("\nFor more information, try '--help'");
            }

            process::exit(e.exit_code());
        }
    }
}

/// Main application logic
#[instrument(skip_all, fields(command = ?cli.command))]
fn run(cli: Cli, config: Config) -> Result<()> {
    let _timer = Timer::new("cli_execution");

    let config = apply_overrides(&cli, config);
    let mut output = OutputWriter::new(
        config.output.format,
        cli.use_color() && config.output.color,
        cli.quiet,
    );

    tracing::info!(
        command = ?cli.command,
        verbosity = cli.verbosity_level(),
        "Executing command"
    );

    match cli.command {
        Commands::Render(args) => handlers::handle_render(args, &config, &mut output),
        Commands::Cast(args) => handlers::handle_cast(args, &config, &mut output),
        Commands::Check(args) => handlers::handle_check(args, &config, &mut output),
        Commands::Completions(args) => handlers::handle_completions(args),
    }
}

/// Layer command-line flags over the loaded configuration
fn apply_overrides(cli: &Cli, config: Config) -> Config {
    let mut builder = ConfigBuilder::from_config(config);
    if let Some(format) = cli.output {
        builder = builder.output_format(format);
    }
    match &cli.command {
        Commands::Render(args) => {
            if let Some(version) = args.version {
                builder = builder.openapi(version);
            }
        }
        Commands::Cast(args) => {
            if let Some(locale) = &args.locale {
                builder = builder.locale(locale.clone());
            }
        }
        _ => {}
    }
    builder.build()
}

/// Initialize the logging system from flags, the config file and the environment
fn init_logging(cli: &Cli, config: &Config) -> Result<()> {
    let verbosity = cli.verbosity_level();
    let mut logging_config = LoggingConfig::from_verbosity(verbosity);
    logging_config.merge_with_file(&config.logging, verbosity);
    logging_config.merge_with_env();

    if cli.quiet {
        logging_config.level = "error".to_string();
        logging_config.console = false;
    }

    logging::init_logging(logging_config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from(["apidecl", "-vv", "check", "api.yaml"]);
        assert_eq!(cli.verbosity_level(), 2);

        let cli = Cli::parse_from(["apidecl", "--quiet", "check", "api.yaml"]);
        assert_eq!(cli.verbosity_level(), 0);
        assert!(matches!(cli.command, Commands::Check(_)));
    }

    #[test]
    fn test_flags_override_config() {
        let config = Config::default();
        let cli = Cli::parse_from(["apidecl", "-o", "yaml", "render", "api.yaml", "--openapi", "2.0"]);
        let config = apply_overrides(&cli, config);
        assert_eq!(config.output.format, crate::cli::OutputFormat::Yaml);
        assert_eq!(config.openapi, apidecl_openapi::OpenApiVersion::V2);

        let cli = Cli::parse_from(["apidecl", "cast", "api.yaml", "-s", "Pet", "-i", "rex.json", "--locale", "de"]);
        assert_eq!(apply_overrides(&cli, Config::default()).engine.locale, "de");
    }
}
