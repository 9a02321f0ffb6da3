//! Shared utilities for command handlers

use crate::config::Config;
use crate::error::{Error, Result};
use crate::logging::timing::Timer;
use apidecl_core::loader::{self, parser};
use apidecl_core::Registry;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Build a registry from declaration files, applied in order
pub fn load_registry(paths: &[PathBuf], config: &Config) -> Result<Registry> {
    let _timer = Timer::with_details("declaration_loading", &format!("{} file(s)", paths.len()));

    if let Some(missing) = paths.iter().find(|path| !path.exists()) {
        return Err(Error::FileNotFound {
            path: missing.clone(),
        });
    }

    let registry = loader::load_files(paths, config.engine.clone())?;
    debug!(
        schemas = registry.schemas().len(),
        operations = registry.operations().len(),
        "Declarations loaded"
    );
    Ok(registry)
}

/// Read a JSON or YAML payload
pub fn read_input(path: &Path) -> Result<Value> {
    if !path.exists() {
        return Err(Error::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    Ok(parser::parse_file(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_declaration() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("absent.yaml");
        let result = load_registry(&[missing.clone()], &Config::default());
        assert!(matches!(result, Err(Error::FileNotFound { path }) if path == missing));
    }

    #[test]
    fn test_later_files_extend_earlier_ones() {
        let dir = TempDir::new().unwrap();
        let base = dir.path().join("base.yaml");
        let extra = dir.path().join("extra.json");
        std::fs::write(&base, "components:\n  schemas:\n    Pet:\n      type: object\n").unwrap();
        std::fs::write(&extra, r#"{ "components": { "schemas": { "Owner": { "type": "string" } } } }"#).unwrap();

        let registry = load_registry(&[base, extra], &Config::default()).unwrap();
        assert_eq!(registry.schemas().keys().collect::<Vec<_>>(), vec!["Pet", "Owner"]);
    }

    #[test]
    fn test_read_yaml_input() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rex.yml");
        std::fs::write(&path, "name: Rex\nage: '3'\n").unwrap();
        let value = read_input(&path).unwrap();
        assert_eq!(value["name"], "Rex");
        assert_eq!(value["age"], "3");
    }
}
