//! Validation engine
//!
//! Walks a casting result and collects every data error it finds. For each
//! node, in order:
//!
//! 1. the existence level is checked; failing it records `blank` and stops
//!    there for that node,
//! 2. an accepted null is valid and nothing more is checked,
//! 3. input that could not be cast records one `invalid` error and stops,
//! 4. every attached validator runs, each recording its own violation,
//! 5. object attributes and array elements are validated in turn.
//!
//! Errors are addressed by attribute path: `base` for the root value, the
//! property name for its attributes and dotted names below that. Array
//! elements share the path of their array.
//!
//! Copyright (c) 2025 Apidecl Team
//! Licensed under the Apache-2.0 license

pub mod error;
pub mod messages;

pub use error::{
    humanize, ErrorKind, ErrorOptions, ValidationError, ValidationErrors, Violation, BASE_ATTRIBUTE,
};
pub use messages::{DefaultMessages, MessageCatalog};

use crate::casting::CastNode;
use crate::existence::Presence;

/// Dotted path of the attribute being validated
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributePath {
    segments: Vec<String>,
}

impl AttributePath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn child(&self, name: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(name.to_string());
        Self { segments }
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }
}

impl std::fmt::Display for AttributePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_root() {
            f.write_str(BASE_ATTRIBUTE)
        } else {
            f.write_str(&self.segments.join("."))
        }
    }
}

/// Validate `node`, appending errors; true when nothing was found
pub fn validate(node: &CastNode<'_>, errors: &mut ValidationErrors) -> bool {
    validate_at(node, &AttributePath::root(), errors)
}

/// Validate `node` as if it sat at `path`
pub fn validate_at(node: &CastNode<'_>, path: &AttributePath, errors: &mut ValidationErrors) -> bool {
    let schema = node.schema();

    if !schema.existence.reach(node) {
        errors.add(ValidationError::new(path.to_string(), ErrorKind::Blank));
        return false;
    }

    if node.is_null() {
        return true;
    }

    if node.is_invalid() {
        errors.add(ValidationError::new(path.to_string(), ErrorKind::Invalid));
        return false;
    }

    let mut valid = true;
    let value = node.value();
    for validator in schema.validators.values() {
        if let Some(violation) = validator.check(value) {
            errors.add(violation.at(path.to_string()));
            valid = false;
        }
    }

    for (name, attribute) in node.attributes() {
        valid &= validate_at(attribute, &path.child(name), errors);
    }
    for element in node.elements() {
        valid &= validate_at(element, path, errors);
    }

    valid
}

impl CastNode<'_> {
    /// Run validation and return the collected errors
    pub fn errors(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        validate(self, &mut errors);
        errors
    }

    pub fn is_valid(&self) -> bool {
        self.errors().is_empty()
    }
}
