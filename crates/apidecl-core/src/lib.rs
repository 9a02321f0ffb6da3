//! apidecl core - declare API data shapes once, cast and validate against them
//!
//! This crate holds the schema meta-model and the runtime engine built on it:
//!
//! - **Existence levels**: ordered requirement strength for a value
//! - **Schema nodes**: recursive type descriptions with validators and defaults
//! - **Definitions registry**: named components with reference resolution
//! - **Casting engine**: coerces untyped input into a typed result tree
//! - **Validation engine**: collects attribute-scoped data errors
//! - **Loader**: reads YAML/JSON declaration files into a registry
//!
//! ## Quick Start
//!
//! ```rust
//! use apidecl_core::{cast_wire, Registry, Schema, SchemaNode, ValidatorKind};
//! use serde_json::json;
//!
//! let mut registry = Registry::new();
//! registry
//!     .add_schema(
//!         "Pet",
//!         SchemaNode::object()
//!             .property("name", SchemaNode::string().required())
//!             .property(
//!                 "age",
//!                 SchemaNode::integer()
//!                     .try_validator(ValidatorKind::Minimum, &json!(0))
//!                     .unwrap(),
//!             ),
//!     )
//!     .unwrap();
//!
//! let schema = Schema::reference("Pet");
//! let input = json!({ "name": "Rex", "age": "3" });
//! let pet = cast_wire(Some(&input), &schema, &registry).unwrap();
//!
//! assert!(pet.is_valid());
//! let model = pet.model().unwrap();
//! assert_eq!(model.get("age").and_then(|age| age.as_i64()), Some(3));
//! ```
//!
//! Copyright (c) 2025 Apidecl Team
//! Licensed under the Apache-2.0 license

pub mod casting;
pub mod config;
pub mod error;
pub mod existence;
pub mod loader;
pub mod registry;
pub mod schema;
pub mod validation;

// Re-export commonly used types for convenience
pub use casting::{
    cast, cast_wire, AttributeSource, CastError, CastMode, CastNode, Casted, Caster, Model, Raw,
    ToRaw,
};
pub use config::EngineConfig;
pub use error::{DeclarationError, Error, ReferenceError, Result};
pub use existence::{Existence, Presence};
pub use registry::{
    ApiKeyLocation, Callback, Component, ComponentKind, Contact, Example, Header, HttpMethod, Info,
    License, Link, MediaType, OAuthFlow, OAuthFlows, Operation, Parameter, ParameterLocation,
    RefOr, Registry, RequestBody, Response, SecurityRequirement, SecurityScheme, Server, Tag,
};
pub use schema::{
    Bound, DefaultValue, Format, IsoDuration, Kind, Schema, SchemaNode, Validator, ValidatorKind,
};
pub use validation::{
    validate, DefaultMessages, ErrorKind, MessageCatalog, ValidationError, ValidationErrors,
};
