//! Security schemes and requirements

use super::{insert_opt, Renderer};
use crate::error::Result;
use apidecl_core::{ApiKeyLocation, OAuthFlow, OAuthFlows, SecurityRequirement, SecurityScheme};
use serde_json::{json, Map, Value};

impl<'r> Renderer<'r> {
    /// `None` when the scheme cannot be expressed in this version
    pub(crate) fn render_security_scheme(&self, scheme: &SecurityScheme) -> Option<Value> {
        let mut out = Map::new();
        match scheme {
            SecurityScheme::ApiKey { name, location, .. } => {
                if self.is_v2() && *location == ApiKeyLocation::Cookie {
                    return None;
                }
                out.insert("type".into(), json!("apiKey"));
                out.insert("name".into(), json!(name));
                let location = match location {
                    ApiKeyLocation::Query => "query",
                    ApiKeyLocation::Header => "header",
                    ApiKeyLocation::Cookie => "cookie",
                };
                out.insert("in".into(), json!(location));
            }
            SecurityScheme::Http { scheme, bearer_format, .. } => {
                if self.is_v2() {
                    if !scheme.eq_ignore_ascii_case("basic") {
                        return None;
                    }
                    out.insert("type".into(), json!("basic"));
                } else {
                    out.insert("type".into(), json!("http"));
                    out.insert("scheme".into(), json!(scheme));
                    insert_opt(&mut out, "bearerFormat", bearer_format.clone());
                }
            }
            SecurityScheme::OAuth2 { flows, .. } => {
                out.insert("type".into(), json!("oauth2"));
                if self.is_v2() {
                    let (flow, settings) = v2_flow(flows)?;
                    out.insert("flow".into(), json!(flow));
                    insert_opt(&mut out, "authorizationUrl", settings.authorization_url.clone());
                    insert_opt(&mut out, "tokenUrl", settings.token_url.clone());
                    out.insert("scopes".into(), json!(settings.scopes));
                } else {
                    out.insert("flows".into(), Value::Object(render_flows(flows)));
                }
            }
            SecurityScheme::OpenIdConnect { open_id_connect_url, .. } => {
                if self.is_v2() {
                    return None;
                }
                out.insert("type".into(), json!("openIdConnect"));
                out.insert("openIdConnectUrl".into(), json!(open_id_connect_url));
            }
        }
        insert_opt(&mut out, "description", scheme.description().map(str::to_string));
        Some(Value::Object(out))
    }

    pub(crate) fn render_security_schemes(&self) -> Map<String, Value> {
        let mut schemes = Map::new();
        for (name, scheme) in self.registry.security_schemes() {
            match self.render_security_scheme(scheme) {
                Some(rendered) => {
                    schemes.insert(name.clone(), rendered);
                }
                None => tracing::debug!(scheme = %name, "security scheme omitted for this version"),
            }
        }
        schemes
    }

    /// Requirements naming only omitted schemes are dropped; an empty
    /// requirement as declared (anonymous access) is kept
    pub(crate) fn render_requirements(&self, requirements: &[SecurityRequirement]) -> Result<Vec<Value>> {
        let mut rendered = Vec::with_capacity(requirements.len());
        for requirement in requirements {
            let mut out = Map::new();
            for (name, scopes) in requirement {
                let scheme = self.registry.lookup::<SecurityScheme>(name)?;
                if self.render_security_scheme(scheme).is_some() {
                    out.insert(name.clone(), json!(scopes));
                }
            }
            if out.is_empty() && !requirement.is_empty() {
                continue;
            }
            rendered.push(Value::Object(out));
        }
        Ok(rendered)
    }
}

/// The single flow 2.0 supports, picked in the order 2.0 lists them
fn v2_flow(flows: &OAuthFlows) -> Option<(&'static str, &OAuthFlow)> {
    [
        ("implicit", flows.implicit.as_ref()),
        ("password", flows.password.as_ref()),
        ("application", flows.client_credentials.as_ref()),
        ("accessCode", flows.authorization_code.as_ref()),
    ]
    .into_iter()
    .find_map(|(name, flow)| flow.map(|flow| (name, flow)))
}

fn render_flows(flows: &OAuthFlows) -> Map<String, Value> {
    let mut out = Map::new();
    let entries = [
        ("implicit", &flows.implicit),
        ("password", &flows.password),
        ("clientCredentials", &flows.client_credentials),
        ("authorizationCode", &flows.authorization_code),
    ];
    for (key, flow) in entries {
        if let Some(flow) = flow {
            let mut rendered = Map::new();
            insert_opt(&mut rendered, "authorizationUrl", flow.authorization_url.clone());
            insert_opt(&mut rendered, "tokenUrl", flow.token_url.clone());
            insert_opt(&mut rendered, "refreshUrl", flow.refresh_url.clone());
            rendered.insert("scopes".into(), json!(flow.scopes));
            out.insert(key.to_string(), Value::Object(rendered));
        }
    }
    out
}
