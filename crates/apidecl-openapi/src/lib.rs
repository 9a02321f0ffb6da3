//! apidecl OpenAPI - render a definitions registry as an OpenAPI document
//!
//! One registry renders to Swagger 2.0, OpenAPI 3.0 or OpenAPI 3.1. The
//! renderer is a pure function of the registry and the version, so rendering
//! the same registry twice gives identical output.
//!
//! ## Quick Start
//!
//! ```rust
//! use apidecl_core::{Existence, HttpMethod, Operation, Registry, Response, SchemaNode};
//! use apidecl_openapi::{render, OpenApiVersion};
//!
//! let mut registry = Registry::new();
//! registry
//!     .add_schema("Pet", SchemaNode::object().property("tag", SchemaNode::string().existence(Existence::AllowNil)))
//!     .unwrap();
//! registry.add_operation(
//!     Operation::new(HttpMethod::Get, "/pets").response("200", Response::new("A pet").json("Pet")),
//! );
//!
//! let document = render(&registry, OpenApiVersion::V31).unwrap();
//! assert_eq!(
//!     document.pointer("/components/schemas/Pet/properties/tag/type").unwrap(),
//!     &serde_json::json!(["string", "null"])
//! );
//! ```
//!
//! Copyright (c) 2025 Apidecl Team
//! Licensed under the Apache-2.0 license

pub mod document;
pub mod error;
pub mod render;
pub mod version;

pub use document::Document;
pub use error::{Error, Result};
pub use render::{render, Renderer};
pub use version::{Generation, OpenApiVersion, VersionError};
