//! Cast command handler

use super::utils::{load_registry, read_input};
use crate::cli::CastArgs;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::logging::timing::Timer;
use crate::output::{CastReport, ErrorEntry, OutputWriter};
use apidecl_core::{CastMode, Caster, DefaultMessages, Schema};
use tracing::{debug, instrument};

/// Handle the cast command
#[instrument(skip_all, fields(schema = %args.schema, input = %args.input.display()))]
pub fn handle_cast(args: CastArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let _timer = Timer::with_details("cast_command", &args.schema);

    let registry = load_registry(&args.declarations, config)?;
    let schema = registry
        .lookup::<Schema>(&args.schema)
        .map_err(|_| Error::SchemaNotFound {
            name: args.schema.clone(),
        })?;

    let input = read_input(&args.input)?;
    let mode = if args.wire {
        CastMode::Wire
    } else {
        registry.config().default_cast_mode
    };
    let locale = registry.config().locale.as_str();

    output.info(&format!("Casting {} as {}", args.input.display(), args.schema))?;
    debug!(mode = ?mode, locale = %locale, "Casting input");

    let node = Caster::new(&registry, mode).cast_json(Some(&input), schema)?;
    let errors = node.errors();
    let entries: Vec<ErrorEntry> = errors
        .iter()
        .map(|error| ErrorEntry {
            message: error.full_message(&DefaultMessages, locale),
            error: error.clone(),
        })
        .collect();

    let report = CastReport {
        schema: args.schema,
        valid: entries.is_empty(),
        value: node.value().to_json(),
        errors: entries,
    };
    output.cast_report(&report)?;

    if report.valid {
        Ok(())
    } else {
        Err(Error::Invalid {
            count: report.errors.len(),
        })
    }
}
