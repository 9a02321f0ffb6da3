//! Declaration documents
//!
//! A declaration file is read field by field into [`Declaration`] and then
//! applied to a registry through its public `add*` entry points.

use crate::error::DeclarationError;
use crate::registry::{
    Callback, Example, Header, Info, Link, Operation, Parameter, Registry, RequestBody, Response,
    SecurityRequirement, SecurityScheme, Server, Tag,
};
use crate::schema::Schema;
use indexmap::IndexMap;
use serde::Deserialize;

/// One declaration file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Declaration {
    #[serde(default)]
    pub info: Option<Info>,
    #[serde(default)]
    pub servers: Vec<Server>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub components: Components,
    #[serde(default)]
    pub security: Vec<SecurityRequirement>,
    #[serde(default)]
    pub operations: Vec<Operation>,
}

/// Named components of a declaration file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Components {
    pub schemas: IndexMap<String, Schema>,
    pub parameters: IndexMap<String, Parameter>,
    pub request_bodies: IndexMap<String, RequestBody>,
    pub responses: IndexMap<String, Response>,
    pub headers: IndexMap<String, Header>,
    pub examples: IndexMap<String, Example>,
    pub links: IndexMap<String, Link>,
    pub callbacks: IndexMap<String, Callback>,
    pub security_schemes: IndexMap<String, SecurityScheme>,
}

impl Declaration {
    /// Register everything this declaration holds.
    ///
    /// Names already in the registry are replaced.
    pub fn apply(self, registry: &mut Registry) -> Result<(), DeclarationError> {
        if let Some(info) = self.info {
            registry.set_info(info);
        }
        for server in self.servers {
            registry.add_server(server);
        }
        for tag in self.tags {
            registry.add_tag(tag);
        }

        let components = self.components;
        for (name, schema) in components.schemas {
            registry.add(name, schema)?;
        }
        for (name, parameter) in components.parameters {
            registry.add(name, parameter)?;
        }
        for (name, body) in components.request_bodies {
            registry.add(name, body)?;
        }
        for (name, response) in components.responses {
            registry.add(name, response)?;
        }
        for (name, header) in components.headers {
            registry.add(name, header)?;
        }
        for (name, example) in components.examples {
            registry.add(name, example)?;
        }
        for (name, link) in components.links {
            registry.add(name, link)?;
        }
        for (name, callback) in components.callbacks {
            registry.add(name, callback)?;
        }
        for (name, scheme) in components.security_schemes {
            registry.add(name, scheme)?;
        }

        for requirement in self.security {
            registry.add_security_requirement(requirement);
        }
        for operation in self.operations {
            registry.add_operation(operation);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_apply_populates_registry() {
        let declaration: Declaration = serde_json::from_value(json!({
            "info": { "title": "Pets", "version": "2.1.0" },
            "components": {
                "schemas": { "Pet": { "type": "object", "properties": { "name": "string" } } },
                "security_schemes": { "token": { "type": "http", "scheme": "bearer" } }
            },
            "security": [ { "token": [] } ],
            "operations": [ { "method": "get", "path": "/pets", "responses": { "200": { "description": "OK" } } } ]
        }))
        .unwrap();

        let mut registry = Registry::new();
        declaration.apply(&mut registry).unwrap();

        assert_eq!(registry.info().title, "Pets");
        assert!(registry.contains::<Schema>("Pet"));
        assert!(registry.contains::<SecurityScheme>("token"));
        assert_eq!(registry.operations().len(), 1);
        assert!(registry.check_references().is_ok());
    }

    #[test]
    fn test_blank_component_name() {
        let declaration: Declaration = serde_json::from_value(json!({
            "components": { "schemas": { "": "string" } }
        }))
        .unwrap();
        let err = declaration.apply(&mut Registry::new()).unwrap_err();
        assert!(matches!(err, DeclarationError::BlankName { .. }));
    }

    #[test]
    fn test_unknown_sections_are_rejected() {
        let result = serde_json::from_value::<Declaration>(json!({ "paths": {} }));
        assert!(result.is_err());
    }
}
