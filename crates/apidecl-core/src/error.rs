//! Error types for the apidecl core library
//!
//! Two disjoint classes of failure live here. Declaration errors and
//! reference errors are raised and abort the call that hit them; data errors
//! found while validating input are never raised, they are collected into
//! [`crate::validation::ValidationErrors`] instead.
//!
//! Copyright (c) 2025 Apidecl Team
//! Licensed under the Apache-2.0 license

use crate::registry::ComponentKind;
use thiserror::Error;

/// Main error type for apidecl core operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The declaration itself is malformed
    #[error("Declaration error: {0}")]
    Declaration(#[from] DeclarationError),

    /// A named component could not be resolved
    #[error("Reference error: {0}")]
    Reference(#[from] ReferenceError),
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Programmer errors detected while a declaration is being built
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DeclarationError {
    /// A validator was given a configuration value it cannot work with
    #[error("Invalid configuration for validator '{validator}': {reason}")]
    InvalidValidator { validator: String, reason: String },

    /// A component was registered without a name
    #[error("A {kind} cannot be registered with a blank name")]
    BlankName { kind: ComponentKind },

    /// A declaration field holds a value of the wrong shape
    #[error("Invalid declaration at '{path}': {reason}")]
    Malformed { path: String, reason: String },
}

impl DeclarationError {
    /// Create an invalid validator configuration error
    pub fn invalid_validator(validator: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValidator {
            validator: validator.into(),
            reason: reason.into(),
        }
    }

    /// Create a malformed declaration error
    pub fn malformed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Malformed {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Failures resolving a named reference through the registry
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReferenceError {
    /// Lookup by name missed
    #[error("{kind} '{name}' is not declared")]
    Missing { kind: ComponentKind, name: String },

    /// A name was reached again while it was still being resolved
    #[error("Circular reference detected: {chain}")]
    Circular { chain: String },

    /// Resolution went deeper than the configured limit
    #[error("Reference depth limit of {limit} exceeded while resolving '{name}'")]
    TooDeep { name: String, limit: usize },
}

impl ReferenceError {
    /// Create a missing reference error
    pub fn missing(kind: ComponentKind, name: impl Into<String>) -> Self {
        Self::Missing {
            kind,
            name: name.into(),
        }
    }

    /// Create a circular reference error from the resolution chain
    pub fn circular<S: AsRef<str>>(chain: &[S]) -> Self {
        let chain = chain
            .iter()
            .map(|name| name.as_ref())
            .collect::<Vec<_>>()
            .join(" -> ");
        Self::Circular { chain }
    }

    /// Name of the reference that failed, when there is a single one
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Missing { name, .. } | Self::TooDeep { name, .. } => Some(name),
            Self::Circular { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::from(ReferenceError::missing(ComponentKind::Schema, "User"));
        assert_eq!(err.to_string(), "Reference error: schema 'User' is not declared");

        let err = Error::from(DeclarationError::invalid_validator("minimum", "bound must be numeric"));
        assert_eq!(
            err.to_string(),
            "Declaration error: Invalid configuration for validator 'minimum': bound must be numeric"
        );
    }

    #[test]
    fn test_circular_chain() {
        let err = ReferenceError::circular(&["A", "B", "A"]);
        assert_eq!(err.to_string(), "Circular reference detected: A -> B -> A");
        assert_eq!(err.name(), None);
    }

    #[test]
    fn test_blank_name_mentions_kind() {
        let err = DeclarationError::BlankName {
            kind: ComponentKind::SecurityScheme,
        };
        assert_eq!(err.to_string(), "A security scheme cannot be registered with a blank name");
    }
}
