//! OpenAPI version parsing
//!
//! Copyright (c) 2025 Apidecl Team
//! Licensed under the Apache-2.0 license

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors parsing a requested document version
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VersionError {
    #[error("Invalid version format: {0}")]
    InvalidFormat(String),

    #[error("Unsupported OpenAPI version: {0}")]
    Unsupported(String),
}

/// The document generations the renderer distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Generation {
    /// Swagger 2.0
    V2,
    /// OpenAPI 3.0.x
    V30,
    /// OpenAPI 3.1.x
    V31,
}

/// A requested OpenAPI version such as `2.0`, `3.0` or `3.1.0`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OpenApiVersion {
    pub major: u32,
    pub minor: u32,
    /// Left out when the caller only named the generation
    pub patch: Option<u32>,
}

impl OpenApiVersion {
    pub const V2: Self = Self { major: 2, minor: 0, patch: None };
    pub const V30: Self = Self { major: 3, minor: 0, patch: None };
    pub const V31: Self = Self { major: 3, minor: 1, patch: None };

    /// Parse a version string, accepting `2`, `3.0`, `v3.1`, `3.0.3`, ...
    pub fn parse(version_str: &str) -> Result<Self, VersionError> {
        let trimmed = version_str.trim();
        let trimmed = trimmed.strip_prefix('v').unwrap_or(trimmed);

        let parts: Vec<&str> = trimmed.split('.').collect();
        if parts.is_empty() || parts.len() > 3 {
            return Err(VersionError::InvalidFormat(format!(
                "Expected format X[.Y[.Z]], got: {}",
                version_str
            )));
        }

        let number = |part: &str, label: &str| -> Result<u32, VersionError> {
            part.parse().map_err(|_| {
                VersionError::InvalidFormat(format!("Invalid {} version: {}", label, part))
            })
        };

        let major = number(parts[0], "major")?;
        let minor = parts.get(1).map(|part| number(part, "minor")).transpose()?.unwrap_or(0);
        let patch = parts.get(2).map(|part| number(part, "patch")).transpose()?;

        let version = Self { major, minor, patch };
        version.generation()?;
        Ok(version)
    }

    /// The generation this version belongs to
    pub fn generation(&self) -> Result<Generation, VersionError> {
        match (self.major, self.minor) {
            (2, 0) => Ok(Generation::V2),
            (3, 0) => Ok(Generation::V30),
            (3, 1) => Ok(Generation::V31),
            _ => Err(VersionError::Unsupported(self.to_string())),
        }
    }

    /// The string written into the document's `swagger` / `openapi` field
    pub fn document_version(&self) -> String {
        match (self.major, self.minor) {
            (2, _) => "2.0".to_string(),
            (3, 0) => format!("3.0.{}", self.patch.unwrap_or(3)),
            (major, minor) => format!("{}.{}.{}", major, minor, self.patch.unwrap_or(0)),
        }
    }
}

impl Default for OpenApiVersion {
    fn default() -> Self {
        Self::V30
    }
}

impl fmt::Display for OpenApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)?;
        if let Some(patch) = self.patch {
            write!(f, ".{}", patch)?;
        }
        Ok(())
    }
}

impl FromStr for OpenApiVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for OpenApiVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for OpenApiVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = serde_json::Value::deserialize(deserializer)?;
        let text = match raw {
            serde_json::Value::String(text) => text,
            serde_json::Value::Number(number) => number.to_string(),
            other => return Err(serde::de::Error::custom(format!("invalid version {}", other))),
        };
        Self::parse(&text).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_generations() {
        assert_eq!(OpenApiVersion::parse("2.0").unwrap().generation().unwrap(), Generation::V2);
        assert_eq!(OpenApiVersion::parse("2").unwrap().generation().unwrap(), Generation::V2);
        assert_eq!(OpenApiVersion::parse("v3.0").unwrap().generation().unwrap(), Generation::V30);
        assert_eq!(OpenApiVersion::parse("3.1.0").unwrap().generation().unwrap(), Generation::V31);
    }

    #[test]
    fn test_document_version() {
        assert_eq!(OpenApiVersion::V2.document_version(), "2.0");
        assert_eq!(OpenApiVersion::V30.document_version(), "3.0.3");
        assert_eq!(OpenApiVersion::parse("3.0.1").unwrap().document_version(), "3.0.1");
        assert_eq!(OpenApiVersion::V31.document_version(), "3.1.0");
    }

    #[test]
    fn test_rejects_unknown_versions() {
        assert!(matches!(OpenApiVersion::parse("4.0"), Err(VersionError::Unsupported(_))));
        assert!(matches!(OpenApiVersion::parse("1.2"), Err(VersionError::Unsupported(_))));
        assert!(matches!(OpenApiVersion::parse("three"), Err(VersionError::InvalidFormat(_))));
        assert!(matches!(OpenApiVersion::parse("3.0.0.1"), Err(VersionError::InvalidFormat(_))));
    }

    #[test]
    fn test_generation_ordering() {
        assert!(Generation::V2 < Generation::V30);
        assert!(Generation::V30 < Generation::V31);
    }

    #[test]
    fn test_serde() {
        let version: OpenApiVersion = serde_json::from_str("\"3.1\"").unwrap();
        assert_eq!(version, OpenApiVersion::V31);
        let version: OpenApiVersion = serde_json::from_str("2.0").unwrap();
        assert_eq!(version.generation().unwrap(), Generation::V2);
        assert_eq!(serde_json::to_string(&OpenApiVersion::V30).unwrap(), "\"3.0\"");
    }
}
