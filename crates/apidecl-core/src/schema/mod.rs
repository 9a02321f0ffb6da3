//! Schema nodes
//!
//! A [`SchemaNode`] describes one value shape: a primitive, an array of some
//! item schema, or an object of named properties. A [`Schema`] is either such
//! a node or a reference to a schema registered by name; references are
//! resolved through the [`crate::Registry`] before anything inspects them.
//!
//! Declarations are read through [`SchemaDecl`], a flat description of every
//! field a node may carry, and converted into nodes with validators compiled.
//!
//! Copyright (c) 2025 Apidecl Team
//! Licensed under the Apache-2.0 license

pub mod format;
pub mod validators;

pub use format::{Format, IsoDuration};
pub use validators::{Bound, Pattern, Validator, ValidatorKind};

use crate::error::DeclarationError;
use crate::existence::Existence;
use indexmap::IndexMap;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Prefixes accepted in front of a schema name inside `$ref`
const REFERENCE_PREFIXES: &[&str] = &["#/components/schemas/", "#/definitions/"];

/// The primitive and structural kinds a node can have
#[derive(Debug, Clone)]
pub enum Kind {
    String,
    Integer,
    Number,
    Boolean,
    Array {
        items: Schema,
    },
    Object {
        properties: IndexMap<String, Schema>,
        /// Name of the model type exposed for casted values
        model: Option<String>,
    },
}

impl Kind {
    pub fn name(&self) -> &'static str {
        match self {
            Kind::String => "string",
            Kind::Integer => "integer",
            Kind::Number => "number",
            Kind::Boolean => "boolean",
            Kind::Array { .. } => "array",
            Kind::Object { .. } => "object",
        }
    }

    fn primitive(name: &str) -> Option<Self> {
        match name {
            "string" => Some(Kind::String),
            "integer" => Some(Kind::Integer),
            "number" => Some(Kind::Number),
            "boolean" => Some(Kind::Boolean),
            "object" => Some(Kind::Object {
                properties: IndexMap::new(),
                model: None,
            }),
            _ => None,
        }
    }
}

/// Default substituted when a value is omitted
#[derive(Clone)]
pub enum DefaultValue {
    Static(Value),
    /// Invoked each time a default is needed
    Producer(Arc<dyn Fn() -> Value + Send + Sync>),
}

impl DefaultValue {
    pub fn produce(&self) -> Value {
        match self {
            DefaultValue::Static(value) => value.clone(),
            DefaultValue::Producer(producer) => producer(),
        }
    }

    /// The static value, if one was declared; producers have none to document
    pub fn as_static(&self) -> Option<&Value> {
        match self {
            DefaultValue::Static(value) => Some(value),
            DefaultValue::Producer(_) => None,
        }
    }
}

impl fmt::Debug for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultValue::Static(value) => f.debug_tuple("Static").field(value).finish(),
            DefaultValue::Producer(_) => f.write_str("Producer(..)"),
        }
    }
}

/// One type declaration
#[derive(Debug, Clone)]
pub struct SchemaNode {
    pub kind: Kind,
    pub existence: Existence,
    pub default: Option<DefaultValue>,
    pub format: Option<Format>,
    pub validators: IndexMap<ValidatorKind, Validator>,
    /// Explicit nullability; when unset it follows the existence level
    pub nullable: Option<bool>,
    pub example: Option<Value>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub deprecated: bool,
    pub read_only: bool,
    pub write_only: bool,
    /// Vendor extensions, keys always start with `x-`
    pub extensions: IndexMap<String, Value>,
}

impl SchemaNode {
    pub fn new(kind: Kind) -> Self {
        Self {
            kind,
            existence: Existence::default(),
            default: None,
            format: None,
            validators: IndexMap::new(),
            nullable: None,
            example: None,
            title: None,
            description: None,
            deprecated: false,
            read_only: false,
            write_only: false,
            extensions: IndexMap::new(),
        }
    }

    pub fn string() -> Self {
        Self::new(Kind::String)
    }

    pub fn integer() -> Self {
        Self::new(Kind::Integer)
    }

    pub fn number() -> Self {
        Self::new(Kind::Number)
    }

    pub fn boolean() -> Self {
        Self::new(Kind::Boolean)
    }

    pub fn array(items: impl Into<Schema>) -> Self {
        Self::new(Kind::Array { items: items.into() })
    }

    pub fn object() -> Self {
        Self::new(Kind::Object {
            properties: IndexMap::new(),
            model: None,
        })
    }

    /// Add a property; has no effect unless the node is an object
    pub fn property(mut self, name: impl Into<String>, schema: impl Into<Schema>) -> Self {
        if let Kind::Object { properties, .. } = &mut self.kind {
            properties.insert(name.into(), schema.into());
        }
        self
    }

    /// Bind object values to a named model type
    pub fn model(mut self, name: impl Into<String>) -> Self {
        if let Kind::Object { model, .. } = &mut self.kind {
            *model = Some(name.into());
        }
        self
    }

    pub fn existence(mut self, existence: Existence) -> Self {
        self.existence = existence;
        self
    }

    pub fn required(self) -> Self {
        self.existence(Existence::Present)
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(DefaultValue::Static(value.into()));
        self
    }

    pub fn default_with<F>(mut self, producer: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        self.default = Some(DefaultValue::Producer(Arc::new(producer)));
        self
    }

    pub fn format(mut self, format: impl Into<Format>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// Attach a validator, replacing any earlier one of the same kind
    pub fn validator(mut self, validator: Validator) -> Self {
        self.validators.insert(validator.kind(), validator);
        self
    }

    /// Build and attach a validator from its configuration value
    pub fn try_validator(self, kind: ValidatorKind, config: &Value) -> Result<Self, DeclarationError> {
        Ok(self.validator(Validator::build(kind, config)?))
    }

    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = Some(nullable);
        self
    }

    pub fn example(mut self, example: impl Into<Value>) -> Self {
        self.example = Some(example.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn deprecated(mut self) -> Self {
        self.deprecated = true;
        self
    }

    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    pub fn write_only(mut self) -> Self {
        self.write_only = true;
        self
    }

    /// Add a vendor extension, prefixing the key with `x-` when missing
    pub fn extension(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.extensions.insert(extension_key(key), value.into());
        self
    }

    /// Whether documents describe the value as nullable
    pub fn is_nullable(&self) -> bool {
        self.nullable.unwrap_or(self.existence == Existence::AllowNil)
    }

    pub fn properties(&self) -> Option<&IndexMap<String, Schema>> {
        match &self.kind {
            Kind::Object { properties, .. } => Some(properties),
            _ => None,
        }
    }

    pub fn items(&self) -> Option<&Schema> {
        match &self.kind {
            Kind::Array { items } => Some(items),
            _ => None,
        }
    }

    pub fn model_name(&self) -> Option<&str> {
        match &self.kind {
            Kind::Object { model, .. } => model.as_deref(),
            _ => None,
        }
    }
}

/// Vendor extension key for `key`, adding the `x-` prefix when missing
pub fn extension_key(key: &str) -> String {
    if key.starts_with("x-") {
        key.to_string()
    } else {
        format!("x-{}", key)
    }
}

/// A schema position: an inline node or a named reference
#[derive(Debug, Clone)]
pub enum Schema {
    Reference(String),
    Inline(Box<SchemaNode>),
}

impl Schema {
    pub fn reference(name: impl Into<String>) -> Self {
        Schema::Reference(name.into())
    }

    pub fn as_reference(&self) -> Option<&str> {
        match self {
            Schema::Reference(name) => Some(name),
            Schema::Inline(_) => None,
        }
    }

    pub fn as_inline(&self) -> Option<&SchemaNode> {
        match self {
            Schema::Inline(node) => Some(node),
            Schema::Reference(_) => None,
        }
    }
}

impl From<SchemaNode> for Schema {
    fn from(node: SchemaNode) -> Self {
        Schema::Inline(Box::new(node))
    }
}

/// A bare name refers to a registered schema
impl From<&str> for Schema {
    fn from(name: &str) -> Self {
        Schema::Reference(name.to_string())
    }
}

impl From<String> for Schema {
    fn from(name: String) -> Self {
        Schema::Reference(name)
    }
}

/// Strip a `$ref` pointer down to the schema name
pub(crate) fn reference_name(pointer: &str) -> &str {
    REFERENCE_PREFIXES
        .iter()
        .find_map(|prefix| pointer.strip_prefix(prefix))
        .unwrap_or(pointer)
}

impl<'de> Deserialize<'de> for Schema {
    /// Accepts `"integer"` shorthand, `"User"` or `{"$ref": "User"}`
    /// references, and full node declarations.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        match value {
            Value::String(name) => Ok(match Kind::primitive(&name) {
                Some(kind) => SchemaNode::new(kind).into(),
                None => Schema::Reference(reference_name(&name).to_string()),
            }),
            Value::Object(ref map) if map.contains_key("$ref") => match map.get("$ref") {
                Some(Value::String(pointer)) => Ok(Schema::Reference(reference_name(pointer).to_string())),
                _ => Err(D::Error::custom("$ref must be a string")),
            },
            Value::Object(_) => SchemaDecl::deserialize(value)
                .map_err(D::Error::custom)?
                .into_node()
                .map(Schema::from)
                .map_err(D::Error::custom),
            other => Err(D::Error::custom(format!(
                "expected a schema declaration, found {}",
                other
            ))),
        }
    }
}

impl<'de> Deserialize<'de> for SchemaNode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        SchemaDecl::deserialize(deserializer)?
            .into_node()
            .map_err(D::Error::custom)
    }
}

/// The declared form of a schema node, field by field
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaDecl {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub items: Option<Schema>,
    #[serde(default)]
    pub properties: IndexMap<String, Schema>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub existence: Option<Existence>,
    /// Shorthand for `existence: present`
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub default: Option<Value>,
    #[serde(default)]
    pub format: Option<Format>,
    #[serde(default, alias = "validators")]
    pub validations: IndexMap<ValidatorKind, Value>,
    #[serde(default)]
    pub nullable: Option<bool>,
    #[serde(default)]
    pub example: Option<Value>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub deprecated: bool,
    #[serde(default)]
    pub read_only: bool,
    #[serde(default)]
    pub write_only: bool,
    #[serde(default)]
    pub extensions: IndexMap<String, Value>,
}

impl SchemaDecl {
    /// Check the declared fields against each other and compile validators
    pub fn into_node(self) -> Result<SchemaNode, DeclarationError> {
        let kind = match self.kind.as_str() {
            "array" => {
                let items = self
                    .items
                    .ok_or_else(|| DeclarationError::malformed("items", "an array needs an item schema"))?;
                Kind::Array { items }
            }
            "object" => Kind::Object {
                properties: self.properties,
                model: self.model,
            },
            other => Kind::primitive(other).ok_or_else(|| {
                DeclarationError::malformed("type", format!("unknown schema type '{}'", other))
            })?,
        };

        let existence = match (self.existence, self.required) {
            (Some(existence), _) => existence,
            (None, true) => Existence::Present,
            (None, false) => Existence::default(),
        };

        let mut node = SchemaNode::new(kind);
        node.existence = existence;
        node.default = self.default.map(DefaultValue::Static);
        node.format = self.format;
        node.nullable = self.nullable;
        node.example = self.example;
        node.title = self.title;
        node.description = self.description;
        node.deprecated = self.deprecated;
        node.read_only = self.read_only;
        node.write_only = self.write_only;
        node.extensions = self
            .extensions
            .into_iter()
            .map(|(key, value)| (extension_key(&key), value))
            .collect();

        for (kind, config) in &self.validations {
            node = node.try_validator(*kind, config)?;
        }
        Ok(node)
    }
}
