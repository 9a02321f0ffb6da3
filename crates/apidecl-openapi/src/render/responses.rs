//! Responses and links

use super::{insert_opt, Renderer};
use crate::error::Result;
use apidecl_core::{ComponentKind, Link, RefOr, Response};
use serde_json::{json, Map, Value};

impl<'r> Renderer<'r> {
    pub(crate) fn render_response_ref(&self, response: &RefOr<Response>) -> Result<Value> {
        match response {
            RefOr::Ref(name) => {
                self.registry.lookup::<Response>(name)?;
                Ok(self.reference(ComponentKind::Response, name))
            }
            RefOr::Item(response) => self.render_response(response),
        }
    }

    pub(crate) fn render_response(&self, response: &Response) -> Result<Value> {
        let mut out = Map::new();
        out.insert("description".into(), json!(response.description));

        if self.is_v2() {
            // one schema per response; examples are keyed by mime type
            if let Some(media) = response.content.values().next() {
                out.insert("schema".into(), self.render_schema(&media.schema)?);
            }
            let examples: Map<String, Value> = response
                .content
                .iter()
                .filter_map(|(mime, media)| media.example.clone().map(|example| (mime.clone(), example)))
                .collect();
            if !examples.is_empty() {
                out.insert("examples".into(), Value::Object(examples));
            }
        }

        if !response.headers.is_empty() {
            let mut headers = Map::new();
            for (name, header) in &response.headers {
                headers.insert(name.clone(), self.render_header_ref(header)?);
            }
            out.insert("headers".into(), Value::Object(headers));
        }

        if !self.is_v2() {
            if !response.content.is_empty() {
                out.insert("content".into(), Value::Object(self.render_content(&response.content)?));
            }
            if !response.links.is_empty() {
                let mut links = Map::new();
                for (name, link) in &response.links {
                    links.insert(name.clone(), self.render_link_ref(link)?);
                }
                out.insert("links".into(), Value::Object(links));
            }
        }

        Ok(Value::Object(out))
    }

    /// Media types a response can produce, for the 2.0 `produces` list
    pub(crate) fn response_media_types(&self, response: &RefOr<Response>) -> Result<Vec<String>> {
        let response = self.registry.resolve_component(response)?;
        Ok(response.content.keys().cloned().collect())
    }

    pub(crate) fn render_response_components(&self) -> Result<Map<String, Value>> {
        let mut responses = Map::new();
        for (name, response) in self.registry.responses() {
            tracing::trace!(response = %name, "rendering response");
            responses.insert(name.clone(), self.render_response(response)?);
        }
        Ok(responses)
    }

    fn render_link_ref(&self, link: &RefOr<Link>) -> Result<Value> {
        match link {
            RefOr::Ref(name) => {
                self.registry.lookup::<Link>(name)?;
                Ok(self.reference(ComponentKind::Link, name))
            }
            RefOr::Item(link) => self.render_link(link),
        }
    }

    fn render_link(&self, link: &Link) -> Result<Value> {
        let mut out = Map::new();
        insert_opt(&mut out, "operationId", link.operation_id.clone());
        insert_opt(&mut out, "operationRef", link.operation_ref.clone());
        if !link.parameters.is_empty() {
            out.insert("parameters".into(), serde_json::to_value(&link.parameters)?);
        }
        insert_opt(&mut out, "requestBody", link.request_body.clone());
        insert_opt(&mut out, "description", link.description.clone());
        Ok(Value::Object(out))
    }

    pub(crate) fn render_link_components(&self) -> Result<Map<String, Value>> {
        let mut links = Map::new();
        for (name, link) in self.registry.links() {
            links.insert(name.clone(), self.render_link(link)?);
        }
        Ok(links)
    }
}
