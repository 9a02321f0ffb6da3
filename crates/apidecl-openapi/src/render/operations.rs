//! Paths, operations and callbacks

use super::{insert_flag, insert_opt, Renderer};
use crate::error::Result;
use apidecl_core::schema::extension_key;
use apidecl_core::{Callback, ComponentKind, Operation, RefOr};
use indexmap::{IndexMap, IndexSet};
use serde_json::{json, Map, Value};

impl<'r> Renderer<'r> {
    /// Group operations by path, keeping declaration order
    pub(crate) fn render_paths(&self) -> Result<Value> {
        let mut paths: IndexMap<&str, Map<String, Value>> = IndexMap::new();
        for operation in self.registry.operations() {
            tracing::trace!(method = %operation.method, path = %operation.path, "rendering operation");
            let rendered = self.render_operation(operation)?;
            paths
                .entry(operation.path.as_str())
                .or_default()
                .insert(operation.method.as_str().to_string(), rendered);
        }

        Ok(Value::Object(
            paths
                .into_iter()
                .map(|(path, item)| (path.to_string(), Value::Object(item)))
                .collect(),
        ))
    }

    pub(crate) fn render_operation(&self, operation: &Operation) -> Result<Value> {
        let mut out = Map::new();
        if !operation.tags.is_empty() {
            out.insert("tags".into(), json!(operation.tags));
        }
        insert_opt(&mut out, "summary", operation.summary.clone());
        insert_opt(&mut out, "description", operation.description.clone());
        insert_opt(&mut out, "operationId", operation.operation_id.clone());

        let mut parameters = Vec::new();
        for parameter in &operation.parameters {
            if let Some(rendered) = self.render_parameter_ref(parameter)? {
                parameters.push(rendered);
            }
        }

        if self.is_v2() {
            if let Some(body) = &operation.request_body {
                let (parameter, consumes) = self.render_body_parameter(body)?;
                parameters.push(parameter);
                if !consumes.is_empty() {
                    out.insert("consumes".into(), json!(consumes));
                }
            }
            let mut produces = IndexSet::new();
            for response in operation.responses.values() {
                produces.extend(self.response_media_types(response)?);
            }
            if !produces.is_empty() {
                out.insert("produces".into(), json!(produces.into_iter().collect::<Vec<_>>()));
            }
        }

        if !parameters.is_empty() {
            out.insert("parameters".into(), Value::Array(parameters));
        }

        if !self.is_v2() {
            if let Some(body) = &operation.request_body {
                out.insert("requestBody".into(), self.render_request_body_ref(body)?);
            }
        }

        let mut responses = Map::new();
        for (status, response) in &operation.responses {
            responses.insert(status.clone(), self.render_response_ref(response)?);
        }
        out.insert("responses".into(), Value::Object(responses));

        if !self.is_v2() && !operation.callbacks.is_empty() {
            let mut callbacks = Map::new();
            for (name, callback) in &operation.callbacks {
                callbacks.insert(name.clone(), self.render_callback_ref(callback)?);
            }
            out.insert("callbacks".into(), Value::Object(callbacks));
        }

        insert_flag(&mut out, "deprecated", operation.deprecated);

        if let Some(security) = &operation.security {
            let rendered = self.render_requirements(security)?;
            // `[]` means public, so it renders only when declared that way
            if !rendered.is_empty() || security.is_empty() {
                out.insert("security".into(), Value::Array(rendered));
            }
        }

        for (key, value) in &operation.extensions {
            out.insert(extension_key(key), value.clone());
        }

        Ok(Value::Object(out))
    }

    fn render_callback_ref(&self, callback: &RefOr<Callback>) -> Result<Value> {
        match callback {
            RefOr::Ref(name) => {
                self.registry.lookup::<Callback>(name)?;
                Ok(self.reference(ComponentKind::Callback, name))
            }
            RefOr::Item(callback) => self.render_callback(callback),
        }
    }

    /// Runtime expression to a path item of the callback's operations
    fn render_callback(&self, callback: &Callback) -> Result<Value> {
        let mut out = Map::new();
        for (expression, operations) in &callback.0 {
            let mut item = Map::new();
            for operation in operations {
                item.insert(operation.method.as_str().to_string(), self.render_operation(operation)?);
            }
            out.insert(expression.clone(), Value::Object(item));
        }
        Ok(Value::Object(out))
    }

    pub(crate) fn render_callback_components(&self) -> Result<Map<String, Value>> {
        let mut callbacks = Map::new();
        for (name, callback) in self.registry.callbacks() {
            tracing::trace!(callback = %name, "rendering callback");
            callbacks.insert(name.clone(), self.render_callback(callback)?);
        }
        Ok(callbacks)
    }
}
