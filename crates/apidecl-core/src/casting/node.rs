//! Casting results
//!
//! A [`CastNode`] pairs a resolved schema node with the coerced input. Its
//! outside representation, a [`Casted`] value, is built on first request
//! and cached inside the node, which is owned by whoever ran the cast.
//!
//! Copyright (c) 2025 Apidecl Team
//! Licensed under the Apache-2.0 license

use crate::existence::Presence;
use crate::schema::{IsoDuration, SchemaNode};
use chrono::{DateTime, FixedOffset, NaiveDate};
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Serialize, Serializer};
use serde_json::{Map, Number, Value};
use std::cell::OnceCell;
use thiserror::Error;

/// Input that could not be read as the declared type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("cannot cast {found} to {expected}")]
pub struct CastError {
    pub expected: String,
    pub found: String,
}

impl CastError {
    pub fn new(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self {
            expected: expected.into(),
            found: found.into(),
        }
    }
}

/// The outside representation of a casted value
#[derive(Debug, Clone, PartialEq)]
pub enum Casted {
    Null,
    Bool(bool),
    Integer(i64),
    Number(f64),
    String(String),
    Date(NaiveDate),
    DateTime(DateTime<FixedOffset>),
    Duration(IsoDuration),
    Array(Vec<Casted>),
    Model(Model),
}

impl Casted {
    pub fn is_null(&self) -> bool {
        matches!(self, Casted::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Casted::Bool(flag) => Some(*flag),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Casted::Integer(integer) => Some(*integer),
            _ => None,
        }
    }

    /// Integers and numbers as `f64`
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Casted::Integer(integer) => Some(*integer as f64),
            Casted::Number(number) => Some(*number),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Casted::String(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Casted::Date(date) => Some(*date),
            _ => None,
        }
    }

    pub fn as_date_time(&self) -> Option<DateTime<FixedOffset>> {
        match self {
            Casted::DateTime(moment) => Some(*moment),
            _ => None,
        }
    }

    pub fn as_duration(&self) -> Option<&IsoDuration> {
        match self {
            Casted::Duration(duration) => Some(duration),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Casted]> {
        match self {
            Casted::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_model(&self) -> Option<&Model> {
        match self {
            Casted::Model(model) => Some(model),
            _ => None,
        }
    }

    /// JSON form; temporal values become their ISO 8601 strings
    pub fn to_json(&self) -> Value {
        match self {
            Casted::Null => Value::Null,
            Casted::Bool(flag) => Value::Bool(*flag),
            Casted::Integer(integer) => Value::from(*integer),
            Casted::Number(number) => Number::from_f64(*number).map(Value::Number).unwrap_or(Value::Null),
            Casted::String(text) => Value::String(text.clone()),
            Casted::Date(date) => Value::String(date.format("%Y-%m-%d").to_string()),
            Casted::DateTime(moment) => Value::String(moment.to_rfc3339()),
            Casted::Duration(duration) => Value::String(duration.to_string()),
            Casted::Array(items) => Value::Array(items.iter().map(Casted::to_json).collect()),
            Casted::Model(model) => model.to_json(),
        }
    }
}

impl Serialize for Casted {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

/// Attribute-addressable view over a casted object
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    binding: Option<String>,
    attributes: IndexMap<String, Casted>,
}

impl Model {
    pub fn new(binding: Option<String>, attributes: IndexMap<String, Casted>) -> Self {
        Self { binding, attributes }
    }

    /// Name of the model type the schema binds to, if any
    pub fn binding(&self) -> Option<&str> {
        self.binding.as_deref()
    }

    /// The casted value of a declared property
    pub fn get(&self, name: &str) -> Option<&Casted> {
        self.attributes.get(name)
    }

    pub fn attributes(&self) -> &IndexMap<String, Casted> {
        &self.attributes
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    pub fn to_json(&self) -> Value {
        Value::Object(
            self.attributes
                .iter()
                .map(|(name, value)| (name.clone(), value.to_json()))
                .collect::<Map<String, Value>>(),
        )
    }

    /// Materialize the attributes into an application type
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.to_json())
    }
}

/// How the input was read
#[derive(Debug)]
pub(crate) enum NodeData<'s> {
    /// Absent input; `omitted` tells a missing key from an explicit null
    Null { omitted: bool },
    Scalar(Casted),
    Array(Vec<CastNode<'s>>),
    Object(IndexMap<String, CastNode<'s>>),
    /// Structurally unreadable input
    Invalid(CastError),
}

/// The result of casting one input value against one schema node
#[derive(Debug)]
pub struct CastNode<'s> {
    schema: &'s SchemaNode,
    data: NodeData<'s>,
    value: OnceCell<Casted>,
}

impl<'s> CastNode<'s> {
    pub(crate) fn new(schema: &'s SchemaNode, data: NodeData<'s>) -> Self {
        Self {
            schema,
            data,
            value: OnceCell::new(),
        }
    }

    /// The resolved schema node this value was cast against
    pub fn schema(&self) -> &'s SchemaNode {
        self.schema
    }

    /// Outside representation, built once and cached.
    ///
    /// Objects yield a [`Casted::Model`]; unreadable input yields `Null`.
    pub fn value(&self) -> &Casted {
        self.value.get_or_init(|| match &self.data {
            NodeData::Null { .. } | NodeData::Invalid(_) => Casted::Null,
            NodeData::Scalar(value) => value.clone(),
            NodeData::Array(elements) => {
                Casted::Array(elements.iter().map(|element| element.value().clone()).collect())
            }
            NodeData::Object(attributes) => Casted::Model(Model::new(
                self.schema.model_name().map(str::to_string),
                attributes
                    .iter()
                    .map(|(name, node)| (name.clone(), node.value().clone()))
                    .collect(),
            )),
        })
    }

    /// The model view of an object value
    pub fn model(&self) -> Option<&Model> {
        self.value().as_model()
    }

    /// A declared attribute of an object value
    pub fn attribute(&self, name: &str) -> Option<&CastNode<'s>> {
        match &self.data {
            NodeData::Object(attributes) => attributes.get(name),
            _ => None,
        }
    }

    /// Declared attributes in declaration order; empty unless this is an object
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &CastNode<'s>)> {
        let attributes = match &self.data {
            NodeData::Object(attributes) => Some(attributes),
            _ => None,
        };
        attributes
            .into_iter()
            .flatten()
            .map(|(name, node)| (name.as_str(), node))
    }

    /// Element nodes; empty unless this is an array
    pub fn elements(&self) -> &[CastNode<'s>] {
        match &self.data {
            NodeData::Array(elements) => elements,
            _ => &[],
        }
    }

    /// The structural failure, when the input could not be read at all
    pub fn cast_error(&self) -> Option<&CastError> {
        match &self.data {
            NodeData::Invalid(error) => Some(error),
            _ => None,
        }
    }

    pub fn is_invalid(&self) -> bool {
        self.cast_error().is_some()
    }
}

impl Presence for CastNode<'_> {
    fn is_omitted(&self) -> bool {
        matches!(self.data, NodeData::Null { omitted: true })
    }

    fn is_null(&self) -> bool {
        matches!(self.data, NodeData::Null { .. })
    }

    fn is_empty(&self) -> bool {
        match &self.data {
            NodeData::Null { .. } => true,
            NodeData::Scalar(Casted::String(text)) => text.is_empty(),
            NodeData::Scalar(_) | NodeData::Invalid(_) => false,
            NodeData::Array(elements) => elements.is_empty(),
            NodeData::Object(attributes) => attributes.values().all(|node| node.is_empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[test]
    fn test_casted_to_json() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        assert_eq!(Casted::Date(date).to_json(), json!("2024-01-31"));
        assert_eq!(Casted::Number(f64::NAN).to_json(), Value::Null);
        assert_eq!(
            Casted::Array(vec![Casted::Integer(1), Casted::Null]).to_json(),
            json!([1, null])
        );
    }

    #[test]
    fn test_model_deserialize() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct Pet {
            name: String,
            age: Option<i64>,
        }

        let mut attributes = IndexMap::new();
        attributes.insert("name".to_string(), Casted::String("Rex".into()));
        attributes.insert("age".to_string(), Casted::Null);
        let model = Model::new(Some("Pet".into()), attributes);

        assert_eq!(model.binding(), Some("Pet"));
        assert_eq!(model.get("name").and_then(Casted::as_str), Some("Rex"));
        assert_eq!(
            model.deserialize::<Pet>().unwrap(),
            Pet { name: "Rex".into(), age: None }
        );
    }

    #[test]
    fn test_emptiness() {
        let schema = SchemaNode::string();
        let blank = CastNode::new(&schema, NodeData::Scalar(Casted::String(String::new())));
        assert!(blank.is_empty());
        assert!(!blank.is_null());

        let zero = CastNode::new(&schema, NodeData::Scalar(Casted::Integer(0)));
        assert!(!zero.is_empty());

        let omitted = CastNode::new(&schema, NodeData::Null { omitted: true });
        assert!(omitted.is_omitted() && omitted.is_null() && omitted.is_empty());

        let explicit = CastNode::new(&schema, NodeData::Null { omitted: false });
        assert!(!explicit.is_omitted() && explicit.is_null());
    }

    #[test]
    fn test_value_is_cached() {
        let schema = SchemaNode::object();
        let node = CastNode::new(&schema, NodeData::Object(IndexMap::new()));
        let first = node.value() as *const Casted;
        let second = node.value() as *const Casted;
        assert_eq!(first, second);
        assert!(node.is_empty());
    }
}
