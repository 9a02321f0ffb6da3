//! Parameters, request bodies, media types and headers

use super::{insert_flag, insert_opt, Renderer};
use crate::error::Result;
use apidecl_core::{
    ComponentKind, Example, Header, MediaType, Parameter, ParameterLocation, RefOr, RequestBody,
};
use indexmap::IndexMap;
use serde_json::{json, Map, Value};

impl<'r> Renderer<'r> {
    /// `None` when the parameter has no 2.0 representation
    pub(crate) fn render_parameter_ref(&self, parameter: &RefOr<Parameter>) -> Result<Option<Value>> {
        match parameter {
            RefOr::Ref(name) => {
                let target = self.registry.lookup::<Parameter>(name)?;
                if self.is_v2() && target.location == ParameterLocation::Cookie {
                    return Ok(None);
                }
                Ok(Some(self.reference(ComponentKind::Parameter, name)))
            }
            RefOr::Item(parameter) => self.render_parameter(parameter),
        }
    }

    pub(crate) fn render_parameter(&self, parameter: &Parameter) -> Result<Option<Value>> {
        if self.is_v2() && parameter.location == ParameterLocation::Cookie {
            tracing::debug!(parameter = %parameter.name, "cookie parameters have no 2.0 form");
            return Ok(None);
        }

        let mut out = Map::new();
        out.insert("name".into(), json!(parameter.name));
        out.insert("in".into(), json!(parameter.location.as_str()));
        insert_opt(&mut out, "description", parameter.description.clone());
        insert_flag(&mut out, "required", parameter.is_required());

        if self.is_v2() {
            out.extend(self.render_simple_schema(&parameter.schema)?);
        } else {
            insert_flag(&mut out, "deprecated", parameter.deprecated);
            out.insert("schema".into(), self.render_schema(&parameter.schema)?);
            insert_opt(&mut out, "example", parameter.example.clone());
        }
        Ok(Some(Value::Object(out)))
    }

    pub(crate) fn render_parameter_components(&self) -> Result<Map<String, Value>> {
        let mut parameters = Map::new();
        for (name, parameter) in self.registry.parameters() {
            tracing::trace!(parameter = %name, "rendering parameter");
            if let Some(rendered) = self.render_parameter(parameter)? {
                parameters.insert(name.clone(), rendered);
            }
        }
        Ok(parameters)
    }

    pub(crate) fn render_request_body_ref(&self, body: &RefOr<RequestBody>) -> Result<Value> {
        match body {
            RefOr::Ref(name) => {
                self.registry.lookup::<RequestBody>(name)?;
                Ok(self.reference(ComponentKind::RequestBody, name))
            }
            RefOr::Item(body) => self.render_request_body(body),
        }
    }

    pub(crate) fn render_request_body(&self, body: &RequestBody) -> Result<Value> {
        let mut out = Map::new();
        insert_opt(&mut out, "description", body.description.clone());
        out.insert("content".into(), Value::Object(self.render_content(&body.content)?));
        insert_flag(&mut out, "required", body.existence.is_required());
        Ok(Value::Object(out))
    }

    /// Fold a request body into the single `in: body` parameter 2.0 uses.
    ///
    /// Returns the parameter and the body's media types for `consumes`.
    pub(crate) fn render_body_parameter(&self, body: &RefOr<RequestBody>) -> Result<(Value, Vec<String>)> {
        let body = self.registry.resolve_component(body)?;
        let mut out = Map::new();
        out.insert("name".into(), json!("body"));
        out.insert("in".into(), json!("body"));
        insert_opt(&mut out, "description", body.description.clone());
        insert_flag(&mut out, "required", body.existence.is_required());

        let schema = match body.content.values().next() {
            Some(media) => self.render_schema(&media.schema)?,
            None => json!({}),
        };
        out.insert("schema".into(), schema);

        Ok((Value::Object(out), body.content.keys().cloned().collect()))
    }

    pub(crate) fn render_request_body_components(&self) -> Result<Map<String, Value>> {
        let mut bodies = Map::new();
        for (name, body) in self.registry.request_bodies() {
            tracing::trace!(request_body = %name, "rendering request body");
            bodies.insert(name.clone(), self.render_request_body(body)?);
        }
        Ok(bodies)
    }

    pub(crate) fn render_content(&self, content: &IndexMap<String, MediaType>) -> Result<Map<String, Value>> {
        let mut out = Map::new();
        for (mime, media) in content {
            let mut rendered = Map::new();
            rendered.insert("schema".into(), self.render_schema(&media.schema)?);
            insert_opt(&mut rendered, "example", media.example.clone());
            if !media.examples.is_empty() {
                let mut examples = Map::new();
                for (name, example) in &media.examples {
                    examples.insert(name.clone(), self.render_example_ref(example)?);
                }
                rendered.insert("examples".into(), Value::Object(examples));
            }
            out.insert(mime.clone(), Value::Object(rendered));
        }
        Ok(out)
    }

    pub(crate) fn render_example_ref(&self, example: &RefOr<Example>) -> Result<Value> {
        match example {
            RefOr::Ref(name) => {
                self.registry.lookup::<Example>(name)?;
                Ok(self.reference(ComponentKind::Example, name))
            }
            RefOr::Item(example) => Ok(serde_json::to_value(example)?),
        }
    }

    pub(crate) fn render_example_components(&self) -> Result<Map<String, Value>> {
        let mut examples = Map::new();
        for (name, example) in self.registry.examples() {
            examples.insert(name.clone(), serde_json::to_value(example)?);
        }
        Ok(examples)
    }

    /// 2.0 has no header components, so references are inlined there
    pub(crate) fn render_header_ref(&self, header: &RefOr<Header>) -> Result<Value> {
        match header {
            RefOr::Ref(name) if !self.is_v2() => {
                self.registry.lookup::<Header>(name)?;
                Ok(self.reference(ComponentKind::Header, name))
            }
            _ => self.render_header(self.registry.resolve_component(header)?),
        }
    }

    pub(crate) fn render_header(&self, header: &Header) -> Result<Value> {
        let mut out = Map::new();
        insert_opt(&mut out, "description", header.description.clone());

        if self.is_v2() {
            out.extend(self.render_simple_schema(&header.schema)?);
        } else {
            insert_flag(&mut out, "required", header.existence.is_required());
            out.insert("schema".into(), self.render_schema(&header.schema)?);
            if let Some(example) = &header.example {
                out.insert("examples".into(), json!({ "default": { "value": example } }));
            }
        }
        Ok(Value::Object(out))
    }

    pub(crate) fn render_header_components(&self) -> Result<Map<String, Value>> {
        let mut headers = Map::new();
        for (name, header) in self.registry.headers() {
            tracing::trace!(header = %name, "rendering header");
            headers.insert(name.clone(), self.render_header(header)?);
        }
        Ok(headers)
    }
}
