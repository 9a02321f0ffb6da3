//! Validators attached to schema nodes
//!
//! Each validator is built from a single configuration value and checks one
//! casted value, reporting at most one violation. A configuration value the
//! validator cannot work with is rejected when the validator is built, as a
//! [`DeclarationError`], never at validation time.
//!
//! Copyright (c) 2025 Apidecl Team
//! Licensed under the Apache-2.0 license

use crate::casting::Casted;
use crate::error::DeclarationError;
use crate::validation::{ErrorKind, Violation};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// The validator kinds a schema node can carry, one instance per kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidatorKind {
    Minimum,
    Maximum,
    #[serde(alias = "minLength")]
    MinLength,
    #[serde(alias = "maxLength")]
    MaxLength,
    Pattern,
    Enum,
    #[serde(alias = "multipleOf")]
    MultipleOf,
    #[serde(alias = "minItems")]
    MinItems,
    #[serde(alias = "maxItems")]
    MaxItems,
}

impl ValidatorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ValidatorKind::Minimum => "minimum",
            ValidatorKind::Maximum => "maximum",
            ValidatorKind::MinLength => "min_length",
            ValidatorKind::MaxLength => "max_length",
            ValidatorKind::Pattern => "pattern",
            ValidatorKind::Enum => "enum",
            ValidatorKind::MultipleOf => "multiple_of",
            ValidatorKind::MinItems => "min_items",
            ValidatorKind::MaxItems => "max_items",
        }
    }
}

impl fmt::Display for ValidatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValidatorKind {
    type Err = DeclarationError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        serde_json::from_value(Value::String(name.to_string()))
            .map_err(|_| DeclarationError::invalid_validator(name, "unknown validator"))
    }
}

/// A numeric bound, optionally exclusive
#[derive(Debug, Clone, PartialEq)]
pub struct Bound {
    pub value: Number,
    pub exclusive: bool,
}

impl Bound {
    pub fn inclusive(value: impl Into<Number>) -> Self {
        Self { value: value.into(), exclusive: false }
    }

    pub fn exclusive(value: impl Into<Number>) -> Self {
        Self { value: value.into(), exclusive: true }
    }

    /// Order `value` against the bound; integers compare exactly
    fn compare(&self, value: &Casted) -> Option<Ordering> {
        match value {
            Casted::Integer(actual) => match (self.value.as_i64(), self.value.as_u64()) {
                (Some(limit), _) => Some(actual.cmp(&limit)),
                (None, Some(_)) => Some(Ordering::Less),
                (None, None) => (*actual as f64).partial_cmp(&self.value.as_f64()?),
            },
            _ => value.as_f64()?.partial_cmp(&self.value.as_f64()?),
        }
    }
}

/// A compiled regular expression that remembers its source text
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    pub fn new(source: &str) -> Result<Self, DeclarationError> {
        let regex = Regex::new(source).map_err(|e| {
            DeclarationError::invalid_validator(ValidatorKind::Pattern.as_str(), e.to_string())
        })?;
        Ok(Self { source: source.to_string(), regex })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn is_match(&self, input: &str) -> bool {
        self.regex.is_match(input)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

/// A constraint on a casted value
#[derive(Debug, Clone, PartialEq)]
pub enum Validator {
    Minimum(Bound),
    Maximum(Bound),
    MinLength(usize),
    MaxLength(usize),
    Pattern(Pattern),
    Enum(Vec<Value>),
    MultipleOf(Number),
    MinItems(usize),
    MaxItems(usize),
}

impl Validator {
    /// Build a validator of `kind` from its declared configuration value.
    ///
    /// Bounds accept a plain number or `{ value, exclusive }`; length and item
    /// counts accept non-negative integers; `pattern` accepts a regular
    /// expression; `enum` a non-empty list; `multiple_of` a positive number.
    pub fn build(kind: ValidatorKind, config: &Value) -> Result<Self, DeclarationError> {
        let invalid = |reason: &str| DeclarationError::invalid_validator(kind.as_str(), reason);

        match kind {
            ValidatorKind::Minimum | ValidatorKind::Maximum => {
                let bound = match config {
                    Value::Number(value) => Bound::inclusive(value.clone()),
                    Value::Object(map) => {
                        let value = match map.get("value") {
                            Some(Value::Number(value)) => value.clone(),
                            _ => return Err(invalid("bound must be numeric")),
                        };
                        let exclusive = match map.get("exclusive") {
                            None => false,
                            Some(Value::Bool(flag)) => *flag,
                            Some(_) => return Err(invalid("exclusive must be a boolean")),
                        };
                        Bound { value, exclusive }
                    }
                    _ => return Err(invalid("bound must be numeric")),
                };
                Ok(if kind == ValidatorKind::Minimum {
                    Validator::Minimum(bound)
                } else {
                    Validator::Maximum(bound)
                })
            }
            ValidatorKind::MinLength
            | ValidatorKind::MaxLength
            | ValidatorKind::MinItems
            | ValidatorKind::MaxItems => {
                let count = config
                    .as_u64()
                    .ok_or_else(|| invalid("expected a non-negative integer"))?
                    as usize;
                Ok(match kind {
                    ValidatorKind::MinLength => Validator::MinLength(count),
                    ValidatorKind::MaxLength => Validator::MaxLength(count),
                    ValidatorKind::MinItems => Validator::MinItems(count),
                    _ => Validator::MaxItems(count),
                })
            }
            ValidatorKind::Pattern => {
                let source = config
                    .as_str()
                    .ok_or_else(|| invalid("expected a regular expression string"))?;
                Ok(Validator::Pattern(Pattern::new(source)?))
            }
            ValidatorKind::Enum => match config {
                Value::Array(members) if !members.is_empty() => Ok(Validator::Enum(members.clone())),
                Value::Array(_) => Err(invalid("the set of allowed values is empty")),
                _ => Err(invalid("expected a list of allowed values")),
            },
            ValidatorKind::MultipleOf => match config {
                Value::Number(divisor) if divisor.as_f64().is_some_and(|d| d > 0.0) => {
                    Ok(Validator::MultipleOf(divisor.clone()))
                }
                _ => Err(invalid("divisor must be a positive number")),
            },
        }
    }

    pub fn kind(&self) -> ValidatorKind {
        match self {
            Validator::Minimum(_) => ValidatorKind::Minimum,
            Validator::Maximum(_) => ValidatorKind::Maximum,
            Validator::MinLength(_) => ValidatorKind::MinLength,
            Validator::MaxLength(_) => ValidatorKind::MaxLength,
            Validator::Pattern(_) => ValidatorKind::Pattern,
            Validator::Enum(_) => ValidatorKind::Enum,
            Validator::MultipleOf(_) => ValidatorKind::MultipleOf,
            Validator::MinItems(_) => ValidatorKind::MinItems,
            Validator::MaxItems(_) => ValidatorKind::MaxItems,
        }
    }

    /// Check `value`, returning the violation if it fails.
    ///
    /// Values of a type the validator does not apply to pass; a `pattern` on
    /// an integer field has nothing to say about it.
    pub fn check(&self, value: &Casted) -> Option<Violation> {
        match self {
            Validator::Minimum(bound) => {
                let ordering = bound.compare(value)?;
                if bound.exclusive && ordering != Ordering::Greater {
                    Some(Violation::with_count(ErrorKind::GreaterThan, bound.value.clone()))
                } else if !bound.exclusive && ordering == Ordering::Less {
                    Some(Violation::with_count(ErrorKind::GreaterThanOrEqualTo, bound.value.clone()))
                } else {
                    None
                }
            }
            Validator::Maximum(bound) => {
                let ordering = bound.compare(value)?;
                if bound.exclusive && ordering != Ordering::Less {
                    Some(Violation::with_count(ErrorKind::LessThan, bound.value.clone()))
                } else if !bound.exclusive && ordering == Ordering::Greater {
                    Some(Violation::with_count(ErrorKind::LessThanOrEqualTo, bound.value.clone()))
                } else {
                    None
                }
            }
            Validator::MinLength(count) => {
                let length = value.as_str()?.chars().count();
                (length < *count).then(|| Violation::with_count(ErrorKind::TooShort, *count))
            }
            Validator::MaxLength(count) => {
                let length = value.as_str()?.chars().count();
                (length > *count).then(|| Violation::with_count(ErrorKind::TooLong, *count))
            }
            Validator::Pattern(pattern) => {
                let input = value.as_str()?;
                (!pattern.is_match(input)).then(|| Violation::new(ErrorKind::Invalid))
            }
            Validator::Enum(members) => {
                let actual = value.to_json();
                let included = members.iter().any(|member| json_matches(member, &actual));
                (!included).then(|| {
                    Violation::new(ErrorKind::Inclusion).with_option("value", actual)
                })
            }
            Validator::MultipleOf(divisor) => {
                (!is_multiple(value, divisor)?).then(|| Violation::new(ErrorKind::Invalid))
            }
            Validator::MinItems(count) => {
                let size = value.as_array()?.len();
                (size < *count).then(|| Violation::with_count(ErrorKind::Invalid, *count))
            }
            Validator::MaxItems(count) => {
                let size = value.as_array()?.len();
                (size > *count).then(|| Violation::with_count(ErrorKind::Invalid, *count))
            }
        }
    }
}

fn is_multiple(value: &Casted, divisor: &Number) -> Option<bool> {
    match (value, divisor.as_i64()) {
        (Casted::Integer(actual), Some(divisor)) if divisor != 0 => Some(actual % divisor == 0),
        _ => {
            let actual = value.as_f64()?;
            let divisor = divisor.as_f64()?;
            Some(actual % divisor == 0.0)
        }
    }
}

/// Compare JSON values, treating `3` and `3.0` as the same member
fn json_matches(member: &Value, actual: &Value) -> bool {
    match (member, actual) {
        (Value::Number(a), Value::Number(b)) => match (a.as_i64(), b.as_i64()) {
            (Some(a), Some(b)) => a == b,
            _ => match (a.as_u64(), b.as_u64()) {
                (Some(a), Some(b)) => a == b,
                _ => (a.is_f64() || b.is_f64()) && a.as_f64() == b.as_f64(),
            },
        },
        _ => member == actual,
    }
}
