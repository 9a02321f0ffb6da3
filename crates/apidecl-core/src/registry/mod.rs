//! Definitions registry
//!
//! A [`Registry`] is the named-object store behind one API description. It
//! is filled during a declaration phase through `&mut self` entry points and
//! read through `&self` afterwards, so any number of casts and renders can
//! share it (behind an `Arc`, say) once declaration is over.
//!
//! Registering a name twice replaces the earlier component. Declarations rely
//! on this to reopen and extend a component.
//!
//! Copyright (c) 2025 Apidecl Team
//! Licensed under the Apache-2.0 license

pub mod components;
pub mod resolver;

pub use components::{
    ApiKeyLocation, Callback, Contact, Example, Header, HttpMethod, Info, License, Link,
    MediaType, OAuthFlow, OAuthFlows, Operation, Parameter, ParameterLocation, RefOr,
    RequestBody, Response, SecurityRequirement, SecurityScheme, Server, Tag,
};
pub use resolver::ResolutionContext;

use crate::config::EngineConfig;
use crate::error::{DeclarationError, ReferenceError};
use crate::schema::Schema;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The named collections a registry holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentKind {
    Schema,
    Parameter,
    RequestBody,
    Response,
    Header,
    Example,
    Link,
    Callback,
    SecurityScheme,
}

impl ComponentKind {
    /// Key of the collection under `components` in a 3.x document
    pub fn components_key(self) -> &'static str {
        match self {
            ComponentKind::Schema => "schemas",
            ComponentKind::Parameter => "parameters",
            ComponentKind::RequestBody => "requestBodies",
            ComponentKind::Response => "responses",
            ComponentKind::Header => "headers",
            ComponentKind::Example => "examples",
            ComponentKind::Link => "links",
            ComponentKind::Callback => "callbacks",
            ComponentKind::SecurityScheme => "securitySchemes",
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ComponentKind::Schema => "schema",
            ComponentKind::Parameter => "parameter",
            ComponentKind::RequestBody => "request body",
            ComponentKind::Response => "response",
            ComponentKind::Header => "header",
            ComponentKind::Example => "example",
            ComponentKind::Link => "link",
            ComponentKind::Callback => "callback",
            ComponentKind::SecurityScheme => "security scheme",
        };
        f.write_str(name)
    }
}

/// A type stored in one of the registry's named collections
pub trait Component: Sized {
    const KIND: ComponentKind;

    fn collection(registry: &Registry) -> &IndexMap<String, Self>;

    fn collection_mut(registry: &mut Registry) -> &mut IndexMap<String, Self>;
}

macro_rules! component {
    ($type:ty, $kind:ident, $field:ident) => {
        impl Component for $type {
            const KIND: ComponentKind = ComponentKind::$kind;

            fn collection(registry: &Registry) -> &IndexMap<String, Self> {
                &registry.$field
            }

            fn collection_mut(registry: &mut Registry) -> &mut IndexMap<String, Self> {
                &mut registry.$field
            }
        }
    };
}

component!(Schema, Schema, schemas);
component!(Parameter, Parameter, parameters);
component!(RequestBody, RequestBody, request_bodies);
component!(Response, Response, responses);
component!(Header, Header, headers);
component!(Example, Example, examples);
component!(Link, Link, links);
component!(Callback, Callback, callbacks);
component!(SecurityScheme, SecurityScheme, security_schemes);

/// Named components plus the operations of one API
#[derive(Debug, Clone, Default)]
pub struct Registry {
    config: EngineConfig,
    info: Info,
    servers: Vec<Server>,
    tags: Vec<Tag>,
    security: Vec<SecurityRequirement>,
    schemas: IndexMap<String, Schema>,
    parameters: IndexMap<String, Parameter>,
    request_bodies: IndexMap<String, RequestBody>,
    responses: IndexMap<String, Response>,
    headers: IndexMap<String, Header>,
    examples: IndexMap<String, Example>,
    links: IndexMap<String, Link>,
    callbacks: IndexMap<String, Callback>,
    security_schemes: IndexMap<String, SecurityScheme>,
    operations: Vec<Operation>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Register `component` under `name`, replacing any earlier one
    pub fn add<T: Component>(&mut self, name: impl Into<String>, component: T) -> Result<(), DeclarationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DeclarationError::BlankName { kind: T::KIND });
        }
        if T::collection_mut(self).insert(name.clone(), component).is_some() {
            tracing::debug!(kind = %T::KIND, name = %name, "component redeclared, keeping the latest");
        }
        Ok(())
    }

    pub fn add_schema(&mut self, name: impl Into<String>, schema: impl Into<Schema>) -> Result<(), DeclarationError> {
        self.add(name, schema.into())
    }

    /// Find the component registered under `name`
    pub fn lookup<T: Component>(&self, name: &str) -> Result<&T, ReferenceError> {
        T::collection(self)
            .get(name)
            .ok_or_else(|| ReferenceError::missing(T::KIND, name))
    }

    pub fn contains<T: Component>(&self, name: &str) -> bool {
        T::collection(self).contains_key(name)
    }

    pub fn add_operation(&mut self, operation: Operation) {
        self.operations.push(operation);
    }

    pub fn set_info(&mut self, info: Info) {
        self.info = info;
    }

    pub fn add_server(&mut self, server: Server) {
        self.servers.push(server);
    }

    /// Add a tag, replacing the description of an existing tag with the same name
    pub fn add_tag(&mut self, tag: Tag) {
        match self.tags.iter_mut().find(|existing| existing.name == tag.name) {
            Some(existing) => *existing = tag,
            None => self.tags.push(tag),
        }
    }

    pub fn add_security_requirement(&mut self, requirement: SecurityRequirement) {
        self.security.push(requirement);
    }

    pub fn info(&self) -> &Info {
        &self.info
    }

    pub fn servers(&self) -> &[Server] {
        &self.servers
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    /// Document-wide security requirements
    pub fn security(&self) -> &[SecurityRequirement] {
        &self.security
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn schemas(&self) -> &IndexMap<String, Schema> {
        &self.schemas
    }

    pub fn parameters(&self) -> &IndexMap<String, Parameter> {
        &self.parameters
    }

    pub fn request_bodies(&self) -> &IndexMap<String, RequestBody> {
        &self.request_bodies
    }

    pub fn responses(&self) -> &IndexMap<String, Response> {
        &self.responses
    }

    pub fn headers(&self) -> &IndexMap<String, Header> {
        &self.headers
    }

    pub fn examples(&self) -> &IndexMap<String, Example> {
        &self.examples
    }

    pub fn links(&self) -> &IndexMap<String, Link> {
        &self.links
    }

    pub fn callbacks(&self) -> &IndexMap<String, Callback> {
        &self.callbacks
    }

    pub fn security_schemes(&self) -> &IndexMap<String, SecurityScheme> {
        &self.security_schemes
    }
}
