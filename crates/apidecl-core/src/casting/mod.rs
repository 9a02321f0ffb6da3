//! Value-casting engine
//!
//! Casting wraps an untyped input value against a schema, resolving
//! references through the registry, substituting defaults for omitted
//! values and coercing scalars. The result is a [`CastNode`] tree ready to
//! be validated or read as a typed [`Model`].
//!
//! Both input modes run through the same [`Caster`]; they differ only in how
//! object attributes are looked up (see [`input`]) and in which spellings of
//! a boolean are accepted.
//!
//! Malformed scalars (a number that does not parse, an impossible date)
//! never abort the cast. They become an invalid node carrying a
//! [`CastError`], which validation reports as a single `invalid` error.
//!
//! Copyright (c) 2025 Apidecl Team
//! Licensed under the Apache-2.0 license

pub mod input;
pub mod node;

pub use input::{AttributeSource, CastMode, JsonObject, Raw, ToRaw, WireObject};
pub use node::{CastError, CastNode, Casted, Model};

use crate::error::ReferenceError;
use crate::registry::Registry;
use crate::schema::format::{parse_date, parse_date_time};
use crate::schema::{Format, IsoDuration, Kind, Schema, SchemaNode};
use chrono::{NaiveTime, TimeZone, Utc};
use indexmap::IndexMap;
use node::NodeData;
use serde_json::Value;

/// Casts input against schemas of one registry
#[derive(Debug, Clone, Copy)]
pub struct Caster<'r> {
    registry: &'r Registry,
    mode: CastMode,
}

impl<'r> Caster<'r> {
    pub fn new(registry: &'r Registry, mode: CastMode) -> Self {
        Self { registry, mode }
    }

    /// A caster in the registry's configured default mode
    pub fn for_registry(registry: &'r Registry) -> Self {
        Self::new(registry, registry.config().default_cast_mode)
    }

    pub fn mode(&self) -> CastMode {
        self.mode
    }

    /// Cast `raw` against `schema`; `None` means the value was omitted
    pub fn cast(&self, raw: Option<Raw<'_>>, schema: &'r Schema) -> Result<CastNode<'r>, ReferenceError> {
        let node = self.registry.resolve(schema)?;
        self.cast_node(raw, node)
    }

    /// Cast a JSON value, wrapping objects according to the caster's mode
    pub fn cast_json(&self, value: Option<&Value>, schema: &'r Schema) -> Result<CastNode<'r>, ReferenceError> {
        self.cast(value.map(|value| Raw::from_json(value, self.mode)), schema)
    }

    /// Cast against the schema registered under `name`
    pub fn cast_named(&self, raw: Option<Raw<'_>>, name: &str) -> Result<CastNode<'r>, ReferenceError> {
        let schema = self.registry.lookup::<Schema>(name)?;
        self.cast(raw, schema)
    }

    fn cast_node(&self, raw: Option<Raw<'_>>, node: &'r SchemaNode) -> Result<CastNode<'r>, ReferenceError> {
        let raw = match raw {
            Some(raw) => raw,
            None => match &node.default {
                Some(default) => {
                    let produced = default.produce();
                    return self.cast_node(Some(Raw::from_json(&produced, self.mode)), node);
                }
                None => return Ok(CastNode::new(node, NodeData::Null { omitted: true })),
            },
        };

        if let Raw::Null = raw {
            return Ok(CastNode::new(node, NodeData::Null { omitted: false }));
        }

        let data = match &node.kind {
            Kind::Boolean => self.cast_boolean(raw),
            Kind::Integer => cast_integer(raw),
            Kind::Number => cast_number(raw),
            Kind::String => cast_string(raw, node.format.as_ref()),
            Kind::Array { items } => {
                let items = self.registry.resolve(items)?;
                let elements = match raw {
                    Raw::Sequence(elements) => elements,
                    Raw::String(text) if text.is_empty() => Vec::new(),
                    single => vec![single],
                };
                let elements = elements
                    .into_iter()
                    .map(|element| self.cast_node(Some(element), items))
                    .collect::<Result<Vec<_>, _>>()?;
                NodeData::Array(elements)
            }
            Kind::Object { properties, .. } => match raw {
                Raw::Object(source) => {
                    let mut attributes = IndexMap::with_capacity(properties.len());
                    for (name, property) in properties {
                        let child = self.cast(source.attribute(name), property)?;
                        attributes.insert(name.clone(), child);
                    }
                    NodeData::Object(attributes)
                }
                Raw::String(text) if text.is_empty() => NodeData::Null { omitted: false },
                other => invalid("object", &other),
            },
        };

        if let NodeData::Invalid(error) = &data {
            tracing::debug!(kind = node.kind.name(), %error, "input could not be cast");
        }
        Ok(CastNode::new(node, data))
    }

    fn cast_boolean(&self, raw: Raw<'_>) -> NodeData<'r> {
        match raw {
            Raw::Bool(flag) => NodeData::Scalar(Casted::Bool(flag)),
            Raw::String(text) => match (text.as_ref(), self.mode) {
                ("true", _) | ("True", CastMode::Wire) => NodeData::Scalar(Casted::Bool(true)),
                ("false", _) | ("False", CastMode::Wire) => NodeData::Scalar(Casted::Bool(false)),
                ("", _) => NodeData::Null { omitted: false },
                _ => invalid_text("boolean", &text),
            },
            other => invalid("boolean", &other),
        }
    }
}

fn invalid<'s>(expected: &str, raw: &Raw<'_>) -> NodeData<'s> {
    NodeData::Invalid(CastError::new(expected, raw.describe()))
}

fn invalid_text<'s>(expected: &str, text: &str) -> NodeData<'s> {
    NodeData::Invalid(CastError::new(expected, format!("string {:?}", text)))
}

fn cast_integer<'s>(raw: Raw<'_>) -> NodeData<'s> {
    match raw {
        Raw::Integer(integer) => NodeData::Scalar(Casted::Integer(integer)),
        Raw::Number(number) if number.fract() == 0.0 && number.abs() < i64::MAX as f64 => {
            NodeData::Scalar(Casted::Integer(number as i64))
        }
        Raw::String(text) if text.trim().is_empty() => NodeData::Null { omitted: false },
        Raw::String(text) => match text.trim().parse::<i64>() {
            Ok(integer) => NodeData::Scalar(Casted::Integer(integer)),
            Err(_) => invalid_text("integer", &text),
        },
        other => invalid("integer", &other),
    }
}

fn cast_number<'s>(raw: Raw<'_>) -> NodeData<'s> {
    match raw {
        Raw::Integer(integer) => NodeData::Scalar(Casted::Number(integer as f64)),
        Raw::Number(number) if number.is_finite() => NodeData::Scalar(Casted::Number(number)),
        Raw::String(text) if text.trim().is_empty() => NodeData::Null { omitted: false },
        Raw::String(text) => match text.trim().parse::<f64>() {
            Ok(number) if number.is_finite() => NodeData::Scalar(Casted::Number(number)),
            _ => invalid_text("number", &text),
        },
        other => invalid("number", &other),
    }
}

fn cast_string<'s>(raw: Raw<'_>, format: Option<&Format>) -> NodeData<'s> {
    match format {
        Some(Format::Date) => match raw {
            Raw::Date(date) => NodeData::Scalar(Casted::Date(date)),
            Raw::DateTime(moment) => NodeData::Scalar(Casted::Date(moment.date_naive())),
            Raw::String(text) if text.is_empty() => NodeData::Null { omitted: false },
            Raw::String(text) => match parse_date(&text) {
                Some(date) => NodeData::Scalar(Casted::Date(date)),
                None => invalid_text("date", &text),
            },
            other => invalid("date", &other),
        },
        Some(Format::DateTime) => match raw {
            Raw::DateTime(moment) => NodeData::Scalar(Casted::DateTime(moment)),
            Raw::Date(date) => {
                let midnight = Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN));
                NodeData::Scalar(Casted::DateTime(midnight.fixed_offset()))
            }
            Raw::String(text) if text.is_empty() => NodeData::Null { omitted: false },
            Raw::String(text) => match parse_date_time(&text) {
                Some(moment) => NodeData::Scalar(Casted::DateTime(moment)),
                None => invalid_text("date-time", &text),
            },
            other => invalid("date-time", &other),
        },
        Some(Format::Duration) => match raw {
            Raw::String(text) if text.is_empty() => NodeData::Null { omitted: false },
            Raw::String(text) => match text.parse::<IsoDuration>() {
                Ok(duration) => NodeData::Scalar(Casted::Duration(duration)),
                Err(_) => invalid_text("duration", &text),
            },
            other => invalid("duration", &other),
        },
        _ => match raw {
            Raw::String(text) => NodeData::Scalar(Casted::String(text.into_owned())),
            Raw::Integer(integer) => NodeData::Scalar(Casted::String(integer.to_string())),
            Raw::Number(number) => NodeData::Scalar(Casted::String(number.to_string())),
            Raw::Bool(flag) => NodeData::Scalar(Casted::String(flag.to_string())),
            Raw::Date(date) => NodeData::Scalar(Casted::String(date.format("%Y-%m-%d").to_string())),
            Raw::DateTime(moment) => NodeData::Scalar(Casted::String(moment.to_rfc3339())),
            other => invalid("string", &other),
        },
    }
}

/// Cast `raw` in object mode
pub fn cast<'r>(raw: Option<Raw<'_>>, schema: &'r Schema, registry: &'r Registry) -> Result<CastNode<'r>, ReferenceError> {
    Caster::new(registry, CastMode::Object).cast(raw, schema)
}

/// Cast a parsed wire value
pub fn cast_wire<'r>(value: Option<&Value>, schema: &'r Schema, registry: &'r Registry) -> Result<CastNode<'r>, ReferenceError> {
    Caster::new(registry, CastMode::Wire).cast_json(value, schema)
}
