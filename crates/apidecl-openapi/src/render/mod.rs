//! Document renderer
//!
//! Turns a [`Registry`] into an OpenAPI document for one version. Most of the
//! output is shared between generations; the places where 2.0, 3.0 and 3.1
//! disagree are handled where each piece is rendered:
//!
//! - nullability: a `nullable` flag up to 3.0, a `"null"` type member in 3.1
//! - exclusive bounds: boolean flags up to 3.0, the bound itself in 3.1
//! - request bodies: an `in: body` parameter in 2.0, `requestBody` in 3.x
//! - security schemes: 2.0 drops bearer, other HTTP and OpenID Connect
//!   schemes and collapses OAuth2 flows into one
//! - headers are parameter-like in 2.0; links and callbacks are 3.x only
//! - `$ref` targets live under `#/definitions` etc. in 2.0 and under
//!   `#/components` in 3.x
//!
//! Any reference that fails to resolve aborts the render.
//!
//! Copyright (c) 2025 Apidecl Team
//! Licensed under the Apache-2.0 license

mod operations;
mod parameters;
mod responses;
mod schema;
mod security;

use crate::document::Document;
use crate::error::Result;
use crate::version::{Generation, OpenApiVersion};
use apidecl_core::{ComponentKind, Registry, Server};
use indexmap::IndexSet;
use serde_json::{json, Map, Value};
use url::Url;

/// Renders one registry for one OpenAPI version
#[derive(Debug, Clone, Copy)]
pub struct Renderer<'r> {
    registry: &'r Registry,
    version: OpenApiVersion,
    generation: Generation,
}

impl<'r> Renderer<'r> {
    pub fn new(registry: &'r Registry, version: OpenApiVersion) -> Result<Self> {
        Ok(Self {
            registry,
            version,
            generation: version.generation()?,
        })
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    fn is_v2(&self) -> bool {
        self.generation == Generation::V2
    }

    fn is_v31(&self) -> bool {
        self.generation == Generation::V31
    }

    /// `$ref` target of a named component for this generation
    fn ref_path(&self, kind: ComponentKind, name: &str) -> String {
        if self.is_v2() {
            let section = match kind {
                ComponentKind::Schema => "definitions",
                ComponentKind::SecurityScheme => "securityDefinitions",
                other => other.components_key(),
            };
            format!("#/{}/{}", section, name)
        } else {
            format!("#/components/{}/{}", kind.components_key(), name)
        }
    }

    fn reference(&self, kind: ComponentKind, name: &str) -> Value {
        json!({ "$ref": self.ref_path(kind, name) })
    }

    /// Render the whole document
    pub fn render(&self) -> Result<Document> {
        let mut document = Map::new();
        if self.is_v2() {
            document.insert("swagger".into(), json!(self.version.document_version()));
        } else {
            document.insert("openapi".into(), json!(self.version.document_version()));
        }
        document.insert("info".into(), serde_json::to_value(self.registry.info())?);

        if self.is_v2() {
            self.render_host(self.registry.servers(), &mut document);
        } else if !self.registry.servers().is_empty() {
            document.insert("servers".into(), serde_json::to_value(self.registry.servers())?);
        }

        if !self.registry.tags().is_empty() {
            document.insert("tags".into(), serde_json::to_value(self.registry.tags())?);
        }

        document.insert("paths".into(), self.render_paths()?);

        if self.is_v2() {
            self.render_v2_sections(&mut document)?;
        } else {
            let components = self.render_components()?;
            if !components.is_empty() {
                document.insert("components".into(), Value::Object(components));
            }
        }

        if !self.registry.security().is_empty() {
            let security = self.render_requirements(self.registry.security())?;
            if !security.is_empty() {
                document.insert("security".into(), Value::Array(security));
            }
        }

        let path_count = document
            .get("paths")
            .and_then(Value::as_object)
            .map_or(0, |paths| paths.len());
        tracing::info!(
            version = %self.version,
            paths = path_count,
            "document rendered"
        );
        Ok(Document::new(self.version, Value::Object(document)))
    }

    /// 2.0 describes the server as `host`, `basePath` and `schemes`
    fn render_host(&self, servers: &[Server], document: &mut Map<String, Value>) {
        let Some(first) = servers.first() else {
            return;
        };

        match Url::parse(&first.url) {
            Ok(url) => {
                if let Some(host) = url.host_str() {
                    let host = match url.port() {
                        Some(port) => format!("{}:{}", host, port),
                        None => host.to_string(),
                    };
                    document.insert("host".into(), json!(host));
                }
                let path = url.path().trim_end_matches('/');
                if !path.is_empty() {
                    document.insert("basePath".into(), json!(path));
                }
                let schemes: IndexSet<String> = servers
                    .iter()
                    .filter_map(|server| Url::parse(&server.url).ok())
                    .map(|url| url.scheme().to_string())
                    .collect();
                document.insert("schemes".into(), json!(schemes.into_iter().collect::<Vec<_>>()));
            }
            Err(_) if first.url.starts_with('/') => {
                document.insert("basePath".into(), json!(first.url.trim_end_matches('/')));
            }
            Err(error) => {
                tracing::debug!(url = %first.url, %error, "server url cannot be expressed as a 2.0 host");
            }
        }
    }

    fn render_v2_sections(&self, document: &mut Map<String, Value>) -> Result<()> {
        let definitions = self.render_schemas()?;
        if !definitions.is_empty() {
            document.insert("definitions".into(), Value::Object(definitions));
        }
        let parameters = self.render_parameter_components()?;
        if !parameters.is_empty() {
            document.insert("parameters".into(), Value::Object(parameters));
        }
        let responses = self.render_response_components()?;
        if !responses.is_empty() {
            document.insert("responses".into(), Value::Object(responses));
        }
        let schemes = self.render_security_schemes();
        if !schemes.is_empty() {
            document.insert("securityDefinitions".into(), Value::Object(schemes));
        }
        Ok(())
    }

    fn render_components(&self) -> Result<Map<String, Value>> {
        let mut components = Map::new();
        let mut section = |kind: ComponentKind, rendered: Map<String, Value>| {
            if !rendered.is_empty() {
                components.insert(kind.components_key().to_string(), Value::Object(rendered));
            }
        };

        section(ComponentKind::Schema, self.render_schemas()?);
        section(ComponentKind::Response, self.render_response_components()?);
        section(ComponentKind::Parameter, self.render_parameter_components()?);
        section(ComponentKind::Example, self.render_example_components()?);
        section(ComponentKind::RequestBody, self.render_request_body_components()?);
        section(ComponentKind::Header, self.render_header_components()?);
        section(ComponentKind::SecurityScheme, self.render_security_schemes());
        section(ComponentKind::Link, self.render_link_components()?);
        section(ComponentKind::Callback, self.render_callback_components()?);
        Ok(components)
    }
}

/// Render `registry` as an OpenAPI document of `version`
pub fn render(registry: &Registry, version: OpenApiVersion) -> Result<Document> {
    Renderer::new(registry, version)?.render()
}

/// Insert `value` under `key` unless it is `None`
fn insert_opt<T: Into<Value>>(map: &mut Map<String, Value>, key: &str, value: Option<T>) {
    if let Some(value) = value {
        map.insert(key.to_string(), value.into());
    }
}

/// Insert `true` under `key` when `flag` is set
fn insert_flag(map: &mut Map<String, Value>, key: &str, flag: bool) {
    if flag {
        map.insert(key.to_string(), Value::Bool(true));
    }
}
