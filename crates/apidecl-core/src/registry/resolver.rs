//! Reference resolution
//!
//! Schemas may name other schemas, and a registered schema may itself be a
//! bare alias for another name. Resolution follows those names until it
//! reaches an inline node, keeping a stack of the names it is following so a
//! loop like `A -> B -> A` fails instead of spinning forever.
//!
//! Copyright (c) 2025 Apidecl Team
//! Licensed under the Apache-2.0 license

use crate::error::ReferenceError;
use crate::registry::components::{Callback, Operation, RefOr, Response};
use crate::registry::{Component, Registry};
use crate::schema::{Kind, Schema, SchemaNode};

/// Stack of names currently being resolved
#[derive(Debug, Clone)]
pub struct ResolutionContext {
    resolution_stack: Vec<String>,
    max_depth: usize,
}

impl ResolutionContext {
    pub fn new(max_depth: usize) -> Self {
        Self {
            resolution_stack: Vec::new(),
            max_depth,
        }
    }

    /// Enter `name`, failing when it is already being resolved
    pub fn push(&mut self, name: &str) -> Result<(), ReferenceError> {
        if self.resolution_stack.iter().any(|entry| entry == name) {
            let mut chain = self.resolution_stack.clone();
            chain.push(name.to_string());
            return Err(ReferenceError::circular(&chain));
        }

        if self.resolution_stack.len() >= self.max_depth {
            return Err(ReferenceError::TooDeep {
                name: name.to_string(),
                limit: self.max_depth,
            });
        }

        self.resolution_stack.push(name.to_string());
        Ok(())
    }

    pub fn pop(&mut self) -> Option<String> {
        self.resolution_stack.pop()
    }

    pub fn depth(&self) -> usize {
        self.resolution_stack.len()
    }
}

impl Registry {
    /// Follow `schema` to the inline node it stands for
    pub fn resolve<'a>(&'a self, schema: &'a Schema) -> Result<&'a SchemaNode, ReferenceError> {
        let mut context = ResolutionContext::new(self.config().max_reference_depth);
        let mut current = schema;
        loop {
            match current {
                Schema::Inline(node) => return Ok(node),
                Schema::Reference(name) => {
                    context.push(name)?;
                    current = self.lookup::<Schema>(name).map_err(|err| {
                        tracing::debug!(reference = %name, depth = context.depth(), "schema reference did not resolve");
                        err
                    })?;
                }
            }
        }
    }

    /// Look up the component behind a `RefOr`, or return the inline one
    pub fn resolve_component<'a, T: Component>(&'a self, item: &'a RefOr<T>) -> Result<&'a T, ReferenceError> {
        match item {
            RefOr::Item(component) => Ok(component),
            RefOr::Ref(name) => self.lookup::<T>(name),
        }
    }

    /// Resolve every reference reachable from the registry.
    ///
    /// Returns the first failure; a registry that passes can be cast against
    /// and rendered without reference errors.
    pub fn check_references(&self) -> Result<(), ReferenceError> {
        for schema in self.schemas().values() {
            self.check_schema(schema)?;
        }
        for parameter in self.parameters().values() {
            self.check_schema(&parameter.schema)?;
        }
        for body in self.request_bodies().values() {
            for media in body.content.values() {
                self.check_schema(&media.schema)?;
            }
        }
        for response in self.responses().values() {
            self.check_response(response)?;
        }
        for header in self.headers().values() {
            self.check_schema(&header.schema)?;
        }
        for callback in self.callbacks().values() {
            self.check_callback(callback)?;
        }
        for requirement in self.security() {
            self.check_requirement(requirement)?;
        }
        for operation in self.operations() {
            self.check_operation(operation)?;
        }
        Ok(())
    }

    fn check_schema(&self, schema: &Schema) -> Result<(), ReferenceError> {
        match schema {
            Schema::Reference(_) => self.resolve(schema).map(|_| ()),
            Schema::Inline(node) => match &node.kind {
                Kind::Array { items } => self.check_schema(items),
                Kind::Object { properties, .. } => properties
                    .values()
                    .try_for_each(|property| self.check_schema(property)),
                _ => Ok(()),
            },
        }
    }

    fn check_response(&self, response: &Response) -> Result<(), ReferenceError> {
        for header in response.headers.values() {
            self.check_schema(&self.resolve_component(header)?.schema)?;
        }
        for media in response.content.values() {
            self.check_schema(&media.schema)?;
            for example in media.examples.values() {
                self.resolve_component(example)?;
            }
        }
        for link in response.links.values() {
            self.resolve_component(link)?;
        }
        Ok(())
    }

    fn check_callback(&self, callback: &Callback) -> Result<(), ReferenceError> {
        callback
            .0
            .values()
            .flatten()
            .try_for_each(|operation| self.check_operation(operation))
    }

    fn check_requirement(&self, requirement: &crate::SecurityRequirement) -> Result<(), ReferenceError> {
        requirement
            .keys()
            .try_for_each(|scheme| self.lookup::<crate::SecurityScheme>(scheme).map(|_| ()))
    }

    fn check_operation(&self, operation: &Operation) -> Result<(), ReferenceError> {
        for parameter in &operation.parameters {
            self.check_schema(&self.resolve_component(parameter)?.schema)?;
        }
        if let Some(body) = &operation.request_body {
            for media in self.resolve_component(body)?.content.values() {
                self.check_schema(&media.schema)?;
            }
        }
        for response in operation.responses.values() {
            self.check_response(self.resolve_component(response)?)?;
        }
        for callback in operation.callbacks.values() {
            self.check_callback(self.resolve_component(callback)?)?;
        }
        for requirement in operation.security.iter().flatten() {
            self.check_requirement(requirement)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_detects_cycles() {
        let mut context = ResolutionContext::new(10);
        context.push("A").unwrap();
        context.push("B").unwrap();
        let err = context.push("A").unwrap_err();
        assert_eq!(err, ReferenceError::Circular { chain: "A -> B -> A".to_string() });
    }

    #[test]
    fn test_push_respects_depth() {
        let mut context = ResolutionContext::new(2);
        context.push("A").unwrap();
        context.push("B").unwrap();
        assert!(matches!(context.push("C"), Err(ReferenceError::TooDeep { limit: 2, .. })));
        assert_eq!(context.pop().as_deref(), Some("B"));
        assert!(context.push("C").is_ok());
    }
}
