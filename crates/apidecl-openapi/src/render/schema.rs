//! Schema objects

use super::{insert_flag, insert_opt, Renderer};
use crate::error::Result;
use apidecl_core::{Bound, ComponentKind, Kind, Schema, SchemaNode, Validator};
use serde_json::{json, Map, Value};

/// Keys a 2.0 non-body parameter or header may carry from its schema
const SIMPLE_SCHEMA_KEYS: &[&str] = &[
    "type",
    "format",
    "items",
    "default",
    "enum",
    "minimum",
    "maximum",
    "exclusiveMinimum",
    "exclusiveMaximum",
    "minLength",
    "maxLength",
    "pattern",
    "multipleOf",
    "minItems",
    "maxItems",
];

impl<'r> Renderer<'r> {
    /// Render a schema position: a `$ref` for named schemas, the full
    /// object otherwise
    pub(crate) fn render_schema(&self, schema: &Schema) -> Result<Value> {
        match schema {
            Schema::Reference(name) => {
                self.registry.resolve(schema)?;
                Ok(self.reference(ComponentKind::Schema, name))
            }
            Schema::Inline(node) => Ok(Value::Object(self.render_node(node)?)),
        }
    }

    pub(crate) fn render_node(&self, node: &SchemaNode) -> Result<Map<String, Value>> {
        let mut out = Map::new();
        let type_name = node.kind.name();

        if node.is_nullable() && self.is_v31() {
            out.insert("type".into(), json!([type_name, "null"]));
        } else {
            out.insert("type".into(), json!(type_name));
            insert_flag(&mut out, "nullable", node.is_nullable());
        }

        insert_opt(&mut out, "format", node.format.as_ref().map(|f| f.as_str().to_string()));
        insert_opt(&mut out, "title", node.title.clone());
        insert_opt(&mut out, "description", node.description.clone());

        match &node.kind {
            Kind::Array { items } => {
                out.insert("items".into(), self.render_schema(items)?);
            }
            Kind::Object { properties, .. } if !properties.is_empty() => {
                let mut rendered = Map::new();
                let mut required = Vec::new();
                for (name, property) in properties {
                    if self.registry.resolve(property)?.existence.is_required() {
                        required.push(Value::String(name.clone()));
                    }
                    rendered.insert(name.clone(), self.render_schema(property)?);
                }
                out.insert("properties".into(), Value::Object(rendered));
                if !required.is_empty() {
                    out.insert("required".into(), Value::Array(required));
                }
            }
            _ => {}
        }

        for validator in node.validators.values() {
            self.render_validator(validator, &mut out);
        }

        if let Some(default) = node.default.as_ref().and_then(|d| d.as_static()) {
            out.insert("default".into(), default.clone());
        }

        if let Some(example) = &node.example {
            if self.is_v31() {
                out.insert("examples".into(), json!([example]));
            } else {
                out.insert("example".into(), example.clone());
            }
        }

        insert_flag(&mut out, "readOnly", node.read_only);
        if !self.is_v2() {
            insert_flag(&mut out, "writeOnly", node.write_only);
            insert_flag(&mut out, "deprecated", node.deprecated);
        }

        for (key, value) in &node.extensions {
            out.insert(key.clone(), value.clone());
        }

        Ok(out)
    }

    fn render_validator(&self, validator: &Validator, out: &mut Map<String, Value>) {
        match validator {
            Validator::Minimum(bound) => self.render_bound(bound, "minimum", "exclusiveMinimum", out),
            Validator::Maximum(bound) => self.render_bound(bound, "maximum", "exclusiveMaximum", out),
            Validator::MinLength(length) => {
                out.insert("minLength".into(), json!(length));
            }
            Validator::MaxLength(length) => {
                out.insert("maxLength".into(), json!(length));
            }
            Validator::Pattern(pattern) => {
                out.insert("pattern".into(), json!(pattern.as_str()));
            }
            Validator::Enum(options) => {
                out.insert("enum".into(), Value::Array(options.clone()));
            }
            Validator::MultipleOf(factor) => {
                out.insert("multipleOf".into(), Value::Number(factor.clone()));
            }
            Validator::MinItems(count) => {
                out.insert("minItems".into(), json!(count));
            }
            Validator::MaxItems(count) => {
                out.insert("maxItems".into(), json!(count));
            }
        }
    }

    /// 3.1 writes an exclusive bound under the exclusive keyword itself;
    /// earlier versions pair the bound with a boolean flag
    fn render_bound(&self, bound: &Bound, key: &str, exclusive_key: &str, out: &mut Map<String, Value>) {
        let value = Value::Number(bound.value.clone());
        if !bound.exclusive {
            out.insert(key.to_string(), value);
        } else if self.is_v31() {
            out.insert(exclusive_key.to_string(), value);
        } else {
            out.insert(key.to_string(), value);
            out.insert(exclusive_key.to_string(), Value::Bool(true));
        }
    }

    /// Schema keys inlined into a 2.0 parameter or header
    pub(crate) fn render_simple_schema(&self, schema: &Schema) -> Result<Map<String, Value>> {
        let node = self.registry.resolve(schema)?;
        let mut rendered = self.render_node(node)?;
        rendered.retain(|key, _| SIMPLE_SCHEMA_KEYS.contains(&key.as_str()) || key.starts_with("x-"));
        Ok(rendered)
    }

    pub(crate) fn render_schemas(&self) -> Result<Map<String, Value>> {
        let mut schemas = Map::new();
        for (name, schema) in self.registry.schemas() {
            tracing::trace!(schema = %name, "rendering schema");
            schemas.insert(name.clone(), self.render_schema(schema)?);
        }
        Ok(schemas)
    }
}
