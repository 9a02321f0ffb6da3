//! Render command handler

use super::utils::load_registry;
use crate::cli::RenderArgs;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::logging::timing::Timer;
use crate::output::OutputWriter;
use apidecl_openapi::{render, Document};
use std::fs;
use std::path::Path;
use tracing::{info, instrument};

/// File formats a rendered document can be saved in
enum SaveFormat {
    Json,
    Yaml,
}

impl SaveFormat {
    fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|s| s.to_str()) {
            Some("json") => Ok(SaveFormat::Json),
            Some("yaml") | Some("yml") => Ok(SaveFormat::Yaml),
            _ => Err(Error::InvalidArgs(format!(
                "--save-to must name a .json, .yaml or .yml file, got {}",
                path.display()
            ))),
        }
    }

    fn encode(&self, document: &Document) -> Result<String> {
        match self {
            SaveFormat::Json => Ok(document.to_json_pretty()?),
            SaveFormat::Yaml => Ok(serde_yaml::to_string(document)?),
        }
    }
}

/// Handle the render command
#[instrument(skip_all, fields(files = args.declarations.len()))]
pub fn handle_render(args: RenderArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let version = config.openapi;
    let _timer = Timer::with_details("render_command", &format!("openapi {}", version));

    let save_format = args.save_to.as_deref().map(SaveFormat::from_path).transpose()?;

    let registry = load_registry(&args.declarations, config)?;
    let document = {
        let _render_timer = Timer::new("document_render");
        render(&registry, version)?
    };
    info!(version = %version, "Document rendered");

    match (args.save_to, save_format) {
        (Some(path), Some(format)) => {
            output.info(&format!(
                "Saving OpenAPI {} document to {}",
                version.document_version(),
                path.display()
            ))?;
            if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, format.encode(&document)?)?;
            output.success(&format!("✅ Wrote {}", path.display()))
        }
        _ => output.data(&document),
    }
}
