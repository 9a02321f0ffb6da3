//! Rendered documents

use crate::error::Result;
use crate::version::OpenApiVersion;
use serde::{Serialize, Serializer};
use serde_json::Value;

/// A rendered OpenAPI document
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    version: OpenApiVersion,
    value: Value,
}

impl Document {
    pub(crate) fn new(version: OpenApiVersion, value: Value) -> Self {
        Self { version, value }
    }

    pub fn version(&self) -> OpenApiVersion {
        self.version
    }

    pub fn as_value(&self) -> &Value {
        &self.value
    }

    pub fn into_value(self) -> Value {
        self.value
    }

    /// Look up a fragment by JSON pointer, e.g. `/paths/~1pets/get`
    pub fn pointer(&self, pointer: &str) -> Option<&Value> {
        self.value.pointer(pointer)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.value)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.value)?)
    }
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.value.serialize(serializer)
    }
}
