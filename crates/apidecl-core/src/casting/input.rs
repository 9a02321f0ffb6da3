//! Raw input values
//!
//! The casting engine reads input through [`Raw`], a borrowed view of an
//! untyped value. Objects are reached through [`AttributeSource`], which is
//! implemented once per input shape: application structs implement it by
//! hand, JSON maps get it from the adapters here, with the key matching
//! rules of the chosen [`CastMode`].

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// How attributes are pulled out of objects and how loosely scalars are read
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CastMode {
    /// In-process application values; keys match exactly
    #[default]
    Object,
    /// Values parsed off the wire (query strings, form and JSON bodies)
    Wire,
}

/// An untyped input value
pub enum Raw<'a> {
    Null,
    Bool(bool),
    Integer(i64),
    Number(f64),
    String(Cow<'a, str>),
    Date(NaiveDate),
    DateTime(DateTime<FixedOffset>),
    Sequence(Vec<Raw<'a>>),
    Object(Box<dyn AttributeSource + 'a>),
}

impl<'a> Raw<'a> {
    /// View a JSON value, wrapping objects with the key rules of `mode`
    pub fn from_json(value: &'a Value, mode: CastMode) -> Self {
        match value {
            Value::Null => Raw::Null,
            Value::Bool(flag) => Raw::Bool(*flag),
            Value::Number(number) => match number.as_i64() {
                Some(integer) => Raw::Integer(integer),
                None => Raw::Number(number.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(text) => Raw::String(Cow::Borrowed(text)),
            Value::Array(items) => {
                Raw::Sequence(items.iter().map(|item| Raw::from_json(item, mode)).collect())
            }
            Value::Object(map) => match mode {
                CastMode::Object => Raw::Object(Box::new(JsonObject(map))),
                CastMode::Wire => Raw::Object(Box::new(WireObject(map))),
            },
        }
    }

    pub fn string(text: impl Into<Cow<'a, str>>) -> Self {
        Raw::String(text.into())
    }

    pub fn object<S: AttributeSource + 'a>(source: S) -> Self {
        Raw::Object(Box::new(source))
    }

    /// Short description of the value's shape, used in cast errors
    pub fn describe(&self) -> String {
        match self {
            Raw::Null => "null".to_string(),
            Raw::Bool(flag) => format!("boolean {}", flag),
            Raw::Integer(integer) => format!("integer {}", integer),
            Raw::Number(number) => format!("number {}", number),
            Raw::String(text) => format!("string {:?}", text),
            Raw::Date(date) => format!("date {}", date),
            Raw::DateTime(moment) => format!("date-time {}", moment.to_rfc3339()),
            Raw::Sequence(items) => format!("sequence of {} items", items.len()),
            Raw::Object(_) => "object".to_string(),
        }
    }
}

impl fmt::Debug for Raw<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

/// Named attribute access over one input object
pub trait AttributeSource {
    /// The attribute called `name`, or `None` when it is absent
    fn attribute(&self, name: &str) -> Option<Raw<'_>>;
}

impl<T: AttributeSource + ?Sized> AttributeSource for &T {
    fn attribute(&self, name: &str) -> Option<Raw<'_>> {
        (**self).attribute(name)
    }
}

/// Conversion of application values into [`Raw`]
pub trait ToRaw {
    fn to_raw(&self) -> Raw<'_>;
}

/// JSON object read with exact keys
#[derive(Debug, Clone, Copy)]
pub struct JsonObject<'a>(pub &'a Map<String, Value>);

impl AttributeSource for JsonObject<'_> {
    fn attribute(&self, name: &str) -> Option<Raw<'_>> {
        self.0.get(name).map(|value| Raw::from_json(value, CastMode::Object))
    }
}

/// JSON object parsed off the wire.
///
/// Besides the exact key it accepts the bracketed collection form that
/// form encoders produce, so `tags[]` satisfies a `tags` property.
#[derive(Debug, Clone, Copy)]
pub struct WireObject<'a>(pub &'a Map<String, Value>);

impl AttributeSource for WireObject<'_> {
    fn attribute(&self, name: &str) -> Option<Raw<'_>> {
        self.0
            .get(name)
            .or_else(|| self.0.get(&format!("{}[]", name)))
            .map(|value| Raw::from_json(value, CastMode::Wire))
    }
}

impl<T: ToRaw> AttributeSource for HashMap<String, T> {
    fn attribute(&self, name: &str) -> Option<Raw<'_>> {
        self.get(name).map(ToRaw::to_raw)
    }
}

impl<T: ToRaw> AttributeSource for BTreeMap<String, T> {
    fn attribute(&self, name: &str) -> Option<Raw<'_>> {
        self.get(name).map(ToRaw::to_raw)
    }
}

impl ToRaw for Value {
    fn to_raw(&self) -> Raw<'_> {
        Raw::from_json(self, CastMode::Object)
    }
}

impl ToRaw for bool {
    fn to_raw(&self) -> Raw<'_> {
        Raw::Bool(*self)
    }
}

macro_rules! integer_to_raw {
    ($($type:ty),*) => {
        $(
            impl ToRaw for $type {
                fn to_raw(&self) -> Raw<'_> {
                    Raw::Integer(i64::from(*self))
                }
            }
        )*
    };
}

integer_to_raw!(i8, i16, i32, i64, u8, u16, u32);

impl ToRaw for f32 {
    fn to_raw(&self) -> Raw<'_> {
        Raw::Number(f64::from(*self))
    }
}

impl ToRaw for f64 {
    fn to_raw(&self) -> Raw<'_> {
        Raw::Number(*self)
    }
}

impl ToRaw for str {
    fn to_raw(&self) -> Raw<'_> {
        Raw::String(Cow::Borrowed(self))
    }
}

impl ToRaw for String {
    fn to_raw(&self) -> Raw<'_> {
        Raw::String(Cow::Borrowed(self.as_str()))
    }
}

impl ToRaw for NaiveDate {
    fn to_raw(&self) -> Raw<'_> {
        Raw::Date(*self)
    }
}

impl ToRaw for DateTime<FixedOffset> {
    fn to_raw(&self) -> Raw<'_> {
        Raw::DateTime(*self)
    }
}

impl<T: ToRaw> ToRaw for Option<T> {
    fn to_raw(&self) -> Raw<'_> {
        match self {
            Some(value) => value.to_raw(),
            None => Raw::Null,
        }
    }
}

impl<T: ToRaw> ToRaw for Vec<T> {
    fn to_raw(&self) -> Raw<'_> {
        Raw::Sequence(self.iter().map(ToRaw::to_raw).collect())
    }
}

impl<T: ToRaw + ?Sized> ToRaw for &T {
    fn to_raw(&self) -> Raw<'_> {
        (**self).to_raw()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_shapes() {
        let value = json!({ "a": [1, 2.5, "x", null, true] });
        let raw = Raw::from_json(&value, CastMode::Object);
        let Raw::Object(source) = raw else {
            panic!("expected an object");
        };
        let Some(Raw::Sequence(items)) = source.attribute("a") else {
            panic!("expected a sequence");
        };
        assert!(matches!(items[0], Raw::Integer(1)));
        assert!(matches!(items[1], Raw::Number(n) if n == 2.5));
        assert!(matches!(&items[2], Raw::String(text) if text == "x"));
        assert!(matches!(items[3], Raw::Null));
        assert!(matches!(items[4], Raw::Bool(true)));
    }

    #[test]
    fn test_wire_key_tolerance() {
        let value = json!({ "tags[]": ["a", "b"] });
        let map = value.as_object().unwrap();
        assert!(JsonObject(map).attribute("tags").is_none());
        assert!(matches!(WireObject(map).attribute("tags"), Some(Raw::Sequence(_))));
    }

    #[test]
    fn test_exact_key_wins_on_the_wire() {
        let value = json!({ "tags": "exact", "tags[]": ["bracketed"] });
        let map = value.as_object().unwrap();
        assert!(matches!(WireObject(map).attribute("tags"), Some(Raw::String(_))));
    }

    #[test]
    fn test_map_sources() {
        let mut params = HashMap::new();
        params.insert("page".to_string(), "2".to_string());
        assert!(matches!(params.attribute("page"), Some(Raw::String(text)) if text == "2"));
        assert!(params.attribute("limit").is_none());
    }

    #[test]
    fn test_option_and_vec() {
        let missing: Option<i32> = None;
        assert!(matches!(missing.to_raw(), Raw::Null));
        assert!(matches!(vec![1u8, 2].to_raw(), Raw::Sequence(items) if items.len() == 2));
    }
}
