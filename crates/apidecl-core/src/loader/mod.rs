//! Declaration loading
//!
//! Reads YAML or JSON declaration files into a [`Registry`]. Loading several
//! files into one registry applies them in order, so a later file can
//! reopen and extend what an earlier one declared.
//!
//! Copyright (c) 2025 Apidecl Team
//! Licensed under the Apache-2.0 license

pub mod declaration;
pub mod error;
pub mod parser;

pub use declaration::{Components, Declaration};
pub use error::{LoaderError, LoaderResult};
pub use parser::Format;

use crate::config::EngineConfig;
use crate::registry::Registry;
use std::path::Path;

/// Parse a declaration from content in `format`; `path` is used in errors
pub fn parse_declaration(content: &str, format: Format, path: &Path) -> LoaderResult<Declaration> {
    let value = parser::parse_content(content, format, path)?;
    serde_json::from_value(value).map_err(|source| LoaderError::InvalidDeclaration {
        path: path.to_path_buf(),
        source,
    })
}

/// Apply declaration content to `registry`
pub fn load_str(registry: &mut Registry, content: &str, format: Format, path: &Path) -> LoaderResult<()> {
    parse_declaration(content, format, path)?
        .apply(registry)
        .map_err(|source| LoaderError::DeclarationError {
            path: path.to_path_buf(),
            source,
        })
}

/// Apply one declaration file to `registry`
pub fn load_file(registry: &mut Registry, path: &Path) -> LoaderResult<()> {
    let format = Format::from_path(path)?;
    let content = std::fs::read_to_string(path)
        .map_err(|e| LoaderError::io_error(path.to_path_buf(), e))?;
    load_str(registry, &content, format, path)?;
    tracing::debug!(path = %path.display(), "declaration loaded");
    Ok(())
}

/// Build a registry from declaration files, applied in order
pub fn load_files<P: AsRef<Path>>(paths: &[P], config: EngineConfig) -> LoaderResult<Registry> {
    let mut registry = Registry::with_config(config);
    for path in paths {
        load_file(&mut registry, path.as_ref())?;
    }
    Ok(registry)
}
