//! Validation error records
//!
//! Copyright (c) 2025 Apidecl Team
//! Licensed under the Apache-2.0 license

use crate::validation::messages::{DefaultMessages, MessageCatalog};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Attribute name errors on the value itself are reported under
pub const BASE_ATTRIBUTE: &str = "base";

/// Interpolation options carried by an error, e.g. `count`
pub type ErrorOptions = IndexMap<String, Value>;

/// Stable error type symbols
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Blank,
    Invalid,
    Inclusion,
    TooShort,
    TooLong,
    GreaterThan,
    GreaterThanOrEqualTo,
    LessThan,
    LessThanOrEqualTo,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Blank => "blank",
            ErrorKind::Invalid => "invalid",
            ErrorKind::Inclusion => "inclusion",
            ErrorKind::TooShort => "too_short",
            ErrorKind::TooLong => "too_long",
            ErrorKind::GreaterThan => "greater_than",
            ErrorKind::GreaterThanOrEqualTo => "greater_than_or_equal_to",
            ErrorKind::LessThan => "less_than",
            ErrorKind::LessThanOrEqualTo => "less_than_or_equal_to",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed check before it is attached to an attribute
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    pub kind: ErrorKind,
    pub options: ErrorOptions,
}

impl Violation {
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, options: ErrorOptions::new() }
    }

    pub fn with_count(kind: ErrorKind, count: impl Into<Value>) -> Self {
        Self::new(kind).with_option("count", count)
    }

    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// Attach the violation to an attribute path
    pub fn at(self, attribute: impl Into<String>) -> ValidationError {
        ValidationError {
            attribute: attribute.into(),
            kind: self.kind,
            options: self.options,
        }
    }
}

/// One data error found while validating a casting result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Dotted path of the offending attribute, `base` for the value itself
    pub attribute: String,
    #[serde(rename = "type")]
    pub kind: ErrorKind,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub options: ErrorOptions,
}

impl ValidationError {
    pub fn new(attribute: impl Into<String>, kind: ErrorKind) -> Self {
        Violation::new(kind).at(attribute)
    }

    /// The bare message, e.g. `is too long (maximum is 3 characters)`
    pub fn message(&self, catalog: &dyn MessageCatalog, locale: &str) -> String {
        catalog.format(self.kind, &self.options, locale)
    }

    /// The message prefixed with the humanized attribute name.
    ///
    /// Errors on `base` are not prefixed.
    pub fn full_message(&self, catalog: &dyn MessageCatalog, locale: &str) -> String {
        let message = self.message(catalog, locale);
        if self.attribute == BASE_ATTRIBUTE {
            message
        } else {
            format!("{} {}", humanize(&self.attribute), message)
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_message(&DefaultMessages, DefaultMessages::LOCALE))
    }
}

/// `billing_address.zip_code` becomes `Billing address zip code`
pub fn humanize(attribute: &str) -> String {
    let words = attribute.replace(['.', '_'], " ").to_lowercase();
    let mut chars = words.trim().chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Ordered collection of validation errors
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ValidationError> {
        self.errors.iter()
    }

    /// Errors recorded against one attribute path
    pub fn on<'a>(&'a self, attribute: &'a str) -> impl Iterator<Item = &'a ValidationError> + 'a {
        self.errors.iter().filter(move |error| error.attribute == attribute)
    }

    /// `(attribute, type)` pairs, handy for assertions and machine output
    pub fn details(&self) -> Vec<(&str, ErrorKind)> {
        self.errors
            .iter()
            .map(|error| (error.attribute.as_str(), error.kind))
            .collect()
    }

    pub fn full_messages(&self, catalog: &dyn MessageCatalog, locale: &str) -> Vec<String> {
        self.errors
            .iter()
            .map(|error| error.full_message(catalog, locale))
            .collect()
    }

    /// All full messages joined into a single sentence list
    pub fn to_message(&self, catalog: &dyn MessageCatalog, locale: &str) -> String {
        self.full_messages(catalog, locale).join(". ")
    }

    /// Ok if no errors were collected
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_message(&DefaultMessages, DefaultMessages::LOCALE))
    }
}

impl std::error::Error for ValidationErrors {}

impl From<ValidationError> for ValidationErrors {
    fn from(error: ValidationError) -> Self {
        Self { errors: vec![error] }
    }
}

impl From<Vec<ValidationError>> for ValidationErrors {
    fn from(errors: Vec<ValidationError>) -> Self {
        Self { errors }
    }
}

impl IntoIterator for ValidationErrors {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a ValidationError;
    type IntoIter = std::slice::Iter<'a, ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_humanize() {
        assert_eq!(humanize("first_name"), "First name");
        assert_eq!(humanize("billing_address.zip_code"), "Billing address zip code");
        assert_eq!(humanize(""), "");
    }

    #[test]
    fn test_full_messages_and_join() {
        let mut errors = ValidationErrors::new();
        errors.add(ValidationError::new("name", ErrorKind::Blank));
        errors.add(Violation::with_count(ErrorKind::TooLong, 3).at("nick_name"));
        errors.add(ValidationError::new(BASE_ATTRIBUTE, ErrorKind::Invalid));

        assert_eq!(
            errors.full_messages(&DefaultMessages, "en"),
            vec![
                "Name can't be blank".to_string(),
                "Nick name is too long (maximum is 3 characters)".to_string(),
                "is invalid".to_string(),
            ]
        );
        assert_eq!(
            errors.to_string(),
            "Name can't be blank. Nick name is too long (maximum is 3 characters). is invalid"
        );
    }

    #[test]
    fn test_collection_helpers() {
        let mut errors = ValidationErrors::new();
        assert!(errors.clone().into_result().is_ok());

        errors.add(ValidationError::new("tags", ErrorKind::Invalid));
        errors.add(ValidationError::new("tags", ErrorKind::Blank));
        errors.add(ValidationError::new("name", ErrorKind::Blank));

        assert_eq!(errors.len(), 3);
        assert_eq!(errors.on("tags").count(), 2);
        assert_eq!(errors.details()[2], ("name", ErrorKind::Blank));
        assert!(errors.into_result().is_err());
    }

    #[test]
    fn test_serializes_type_and_options() {
        let error = Violation::with_count(ErrorKind::LessThan, 10).at("age");
        assert_eq!(
            serde_json::to_value(&error).unwrap(),
            json!({ "attribute": "age", "type": "less_than", "options": { "count": 10 } })
        );
    }
}
