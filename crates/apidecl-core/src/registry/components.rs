//! Reusable components held by the registry
//!
//! Every descriptor here is plain data read straight from a declaration by
//! serde. Component positions that may point at a registered component by
//! name use [`RefOr`].
//!
//! Copyright (c) 2025 Apidecl Team
//! Licensed under the Apache-2.0 license

use crate::existence::Existence;
use crate::schema::Schema;
use indexmap::IndexMap;
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

/// Either a reference to a registered component or the component itself
#[derive(Debug, Clone, PartialEq)]
pub enum RefOr<T> {
    Ref(String),
    Item(T),
}

impl<T> RefOr<T> {
    pub fn reference(name: impl Into<String>) -> Self {
        RefOr::Ref(name.into())
    }
}

impl<T> From<T> for RefOr<T> {
    fn from(item: T) -> Self {
        RefOr::Item(item)
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for RefOr<T> {
    /// `{"$ref": "#/components/responses/NotFound"}` or `{"$ref": "NotFound"}`
    /// become references; anything else is read as the component.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        if let Some(pointer) = value.get("$ref") {
            let pointer = pointer
                .as_str()
                .ok_or_else(|| D::Error::custom("$ref must be a string"))?;
            let name = pointer.rsplit('/').next().unwrap_or(pointer);
            return Ok(RefOr::Ref(name.to_string()));
        }
        T::deserialize(value).map(RefOr::Item).map_err(D::Error::custom)
    }
}

/// General API metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Info {
    pub title: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "terms_of_service")]
    pub terms_of_service: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<Contact>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<License>,
}

impl Default for Info {
    fn default() -> Self {
        Self {
            title: "API".to_string(),
            version: "1.0.0".to_string(),
            description: None,
            terms_of_service: None,
            contact: None,
            license: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct License {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Server {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Where a parameter is carried
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Query,
    Header,
    Path,
    Cookie,
}

impl ParameterLocation {
    pub fn as_str(self) -> &'static str {
        match self {
            ParameterLocation::Query => "query",
            ParameterLocation::Header => "header",
            ParameterLocation::Path => "path",
            ParameterLocation::Cookie => "cookie",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "in")]
    pub location: ParameterLocation,
    pub schema: Schema,
    #[serde(default)]
    pub existence: Existence,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub deprecated: bool,
    #[serde(default)]
    pub example: Option<Value>,
}

impl Parameter {
    pub fn new(name: impl Into<String>, location: ParameterLocation, schema: impl Into<Schema>) -> Self {
        Self {
            name: name.into(),
            location,
            schema: schema.into(),
            existence: Existence::default(),
            description: None,
            deprecated: false,
            example: None,
        }
    }

    pub fn existence(mut self, existence: Existence) -> Self {
        self.existence = existence;
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Path parameters are always required
    pub fn is_required(&self) -> bool {
        self.location == ParameterLocation::Path || self.existence.is_required()
    }
}

/// A schema for one content type, plus examples
#[derive(Debug, Clone, Deserialize)]
pub struct MediaType {
    pub schema: Schema,
    #[serde(default)]
    pub example: Option<Value>,
    #[serde(default)]
    pub examples: IndexMap<String, RefOr<Example>>,
}

impl MediaType {
    pub fn new(schema: impl Into<Schema>) -> Self {
        Self {
            schema: schema.into(),
            example: None,
            examples: IndexMap::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RequestBody {
    #[serde(default)]
    pub description: Option<String>,
    /// Media types keyed by MIME type, in declaration order
    pub content: IndexMap<String, MediaType>,
    #[serde(default)]
    pub existence: Existence,
}

impl RequestBody {
    pub fn json(schema: impl Into<Schema>) -> Self {
        let mut content = IndexMap::new();
        content.insert("application/json".to_string(), MediaType::new(schema));
        Self {
            description: None,
            content,
            existence: Existence::default(),
        }
    }

    pub fn existence(mut self, existence: Existence) -> Self {
        self.existence = existence;
        self
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Header {
    #[serde(default)]
    pub description: Option<String>,
    pub schema: Schema,
    #[serde(default)]
    pub existence: Existence,
    #[serde(default)]
    pub example: Option<Value>,
}

impl Header {
    pub fn new(schema: impl Into<Schema>) -> Self {
        Self {
            description: None,
            schema: schema.into(),
            existence: Existence::default(),
            example: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Response {
    pub description: String,
    #[serde(default)]
    pub headers: IndexMap<String, RefOr<Header>>,
    #[serde(default)]
    pub content: IndexMap<String, MediaType>,
    #[serde(default)]
    pub links: IndexMap<String, RefOr<Link>>,
}

impl Response {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            headers: IndexMap::new(),
            content: IndexMap::new(),
            links: IndexMap::new(),
        }
    }

    pub fn json(mut self, schema: impl Into<Schema>) -> Self {
        self.content
            .insert("application/json".to_string(), MediaType::new(schema));
        self
    }

    pub fn header(mut self, name: impl Into<String>, header: impl Into<RefOr<Header>>) -> Self {
        self.headers.insert(name.into(), header.into());
        self
    }

    pub fn link(mut self, name: impl Into<String>, link: impl Into<RefOr<Link>>) -> Self {
        self.links.insert(name.into(), link.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Example {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "external_value")]
    pub external_value: Option<String>,
}

/// A design-time link between a response and another operation
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "operation_id")]
    pub operation_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "operation_ref")]
    pub operation_ref: Option<String>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub parameters: IndexMap<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "request_body")]
    pub request_body: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Out-of-band requests keyed by runtime expression, e.g. `{$request.body#/url}`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct Callback(pub IndexMap<String, Vec<Operation>>);

/// Location of an API key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiKeyLocation {
    Query,
    Header,
    Cookie,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type")]
pub enum SecurityScheme {
    #[serde(rename = "apiKey", alias = "api_key")]
    ApiKey {
        name: String,
        #[serde(rename = "in")]
        location: ApiKeyLocation,
        #[serde(default)]
        description: Option<String>,
    },
    #[serde(rename = "http")]
    Http {
        /// `basic`, `bearer`, or any other registered HTTP auth scheme
        scheme: String,
        #[serde(default)]
        bearer_format: Option<String>,
        #[serde(default)]
        description: Option<String>,
    },
    #[serde(rename = "oauth2")]
    OAuth2 {
        flows: OAuthFlows,
        #[serde(default)]
        description: Option<String>,
    },
    #[serde(rename = "openIdConnect", alias = "open_id_connect")]
    OpenIdConnect {
        open_id_connect_url: String,
        #[serde(default)]
        description: Option<String>,
    },
}

impl SecurityScheme {
    pub fn description(&self) -> Option<&str> {
        match self {
            SecurityScheme::ApiKey { description, .. }
            | SecurityScheme::Http { description, .. }
            | SecurityScheme::OAuth2 { description, .. }
            | SecurityScheme::OpenIdConnect { description, .. } => description.as_deref(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct OAuthFlows {
    #[serde(default)]
    pub implicit: Option<OAuthFlow>,
    #[serde(default)]
    pub password: Option<OAuthFlow>,
    #[serde(default)]
    pub client_credentials: Option<OAuthFlow>,
    #[serde(default)]
    pub authorization_code: Option<OAuthFlow>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct OAuthFlow {
    #[serde(default)]
    pub authorization_url: Option<String>,
    #[serde(default)]
    pub token_url: Option<String>,
    #[serde(default)]
    pub refresh_url: Option<String>,
    #[serde(default)]
    pub scopes: IndexMap<String, String>,
}

/// Scheme name to required scopes
pub type SecurityRequirement = IndexMap<String, Vec<String>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    Get,
    Put,
    Post,
    Delete,
    Options,
    Head,
    Patch,
    Trace,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Put => "put",
            HttpMethod::Post => "post",
            HttpMethod::Delete => "delete",
            HttpMethod::Options => "options",
            HttpMethod::Head => "head",
            HttpMethod::Patch => "patch",
            HttpMethod::Trace => "trace",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One method on one path
#[derive(Debug, Clone, Deserialize)]
pub struct Operation {
    pub method: HttpMethod,
    /// Empty for operations declared inside callbacks
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub operation_id: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub parameters: Vec<RefOr<Parameter>>,
    #[serde(default)]
    pub request_body: Option<RefOr<RequestBody>>,
    /// Keyed by status code or `default`
    #[serde(default)]
    pub responses: IndexMap<String, RefOr<Response>>,
    #[serde(default)]
    pub callbacks: IndexMap<String, RefOr<Callback>>,
    /// Overrides the document-level requirement when set
    #[serde(default)]
    pub security: Option<Vec<SecurityRequirement>>,
    #[serde(default)]
    pub deprecated: bool,
    #[serde(default)]
    pub extensions: IndexMap<String, Value>,
}

impl Operation {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            operation_id: None,
            summary: None,
            description: None,
            tags: Vec::new(),
            parameters: Vec::new(),
            request_body: None,
            responses: IndexMap::new(),
            callbacks: IndexMap::new(),
            security: None,
            deprecated: false,
            extensions: IndexMap::new(),
        }
    }

    pub fn operation_id(mut self, id: impl Into<String>) -> Self {
        self.operation_id = Some(id.into());
        self
    }

    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn parameter(mut self, parameter: impl Into<RefOr<Parameter>>) -> Self {
        self.parameters.push(parameter.into());
        self
    }

    pub fn request_body(mut self, body: impl Into<RefOr<RequestBody>>) -> Self {
        self.request_body = Some(body.into());
        self
    }

    pub fn response(mut self, status: impl Into<String>, response: impl Into<RefOr<Response>>) -> Self {
        self.responses.insert(status.into(), response.into());
        self
    }

    pub fn callback(mut self, name: impl Into<String>, callback: impl Into<RefOr<Callback>>) -> Self {
        self.callbacks.insert(name.into(), callback.into());
        self
    }

    pub fn security(mut self, requirement: SecurityRequirement) -> Self {
        self.security.get_or_insert_with(Vec::new).push(requirement);
        self
    }

    pub fn deprecated(mut self) -> Self {
        self.deprecated = true;
        self
    }
}
