//! Check command handler

use super::utils::load_registry;
use crate::cli::{CheckArgs, OutputFormat};
use crate::config::Config;
use crate::error::Result;
use crate::output::OutputWriter;
use serde::Serialize;
use tracing::instrument;

/// What a successful check found
#[derive(Debug, Serialize)]
struct CheckSummary {
    schemas: usize,
    components: usize,
    operations: usize,
    valid: bool,
}

/// Handle the check command
#[instrument(skip_all, fields(files = args.declarations.len()))]
pub fn handle_check(args: CheckArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    output.info(&format!("Checking {} declaration file(s)", args.declarations.len()))?;

    let registry = load_registry(&args.declarations, config)?;
    registry.check_references()?;

    let summary = CheckSummary {
        schemas: registry.schemas().len(),
        components: registry.parameters().len()
            + registry.request_bodies().len()
            + registry.responses().len()
            + registry.headers().len()
            + registry.examples().len()
            + registry.links().len()
            + registry.callbacks().len()
            + registry.security_schemes().len(),
        operations: registry.operations().len(),
        valid: true,
    };

    if summary.operations == 0 {
        output.warning("No operations declared")?;
    }

    if output.format() == OutputFormat::Human {
        output.success(&format!(
            "✅ {} schema(s), {} other component(s), {} operation(s); every reference resolves",
            summary.schemas, summary.components, summary.operations
        ))
    } else {
        output.data(&summary)
    }
}
