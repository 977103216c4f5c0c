//! Payload and parameter types for request descriptions.
//!
//! # Design
//! Request bodies, query parameters and response bodies are closed sets of
//! tagged variants. Every transform dispatches on the tag, so "is this a plain
//! structured object?" is a pattern match rather than a runtime check.
//!
//! All three types deserialize from arbitrary JSON so a whole request
//! description can be loaded from a config file. Parameter maps keep the order
//! in which keys appear in the source document.

use std::fmt;
use std::marker::PhantomData;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Number, Value};

/// A single query parameter value.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "Value")]
pub enum ParamValue {
    /// Skipped entirely when it is the value of a parameter.
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    /// Rendered as an ISO-8601 timestamp with millisecond precision.
    Date(DateTime<Utc>),
    /// Serialized as repeated `key[]=` pairs.
    Array(Vec<ParamValue>),
    /// Serialized as its JSON text.
    Object(Map<String, Value>),
}

impl ParamValue {
    /// The string form placed on the right-hand side of `key=`.
    pub fn render(&self) -> String {
        match self {
            ParamValue::Null => "null".to_string(),
            ParamValue::Bool(b) => b.to_string(),
            // Whole floats print without a trailing `.0`.
            ParamValue::Number(n) => match n.as_f64() {
                Some(float) if n.is_f64() => float.to_string(),
                _ => n.to_string(),
            },
            ParamValue::String(s) => s.clone(),
            ParamValue::Date(date) => date.to_rfc3339_opts(SecondsFormat::Millis, true),
            ParamValue::Array(items) => items
                .iter()
                .map(ParamValue::render)
                .collect::<Vec<_>>()
                .join(","),
            ParamValue::Object(map) => Value::Object(map.clone()).to_string(),
        }
    }
}

impl From<Value> for ParamValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => ParamValue::Null,
            Value::Bool(b) => ParamValue::Bool(b),
            Value::Number(n) => ParamValue::Number(n),
            Value::String(s) => ParamValue::String(s),
            Value::Array(items) => ParamValue::Array(items.into_iter().map(Into::into).collect()),
            Value::Object(map) => ParamValue::Object(map),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::String(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::String(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Number(value.into())
    }
}

impl From<u64> for ParamValue {
    fn from(value: u64) -> Self {
        ParamValue::Number(value.into())
    }
}

impl From<f64> for ParamValue {
    /// Non-finite floats have no JSON form and become `Null`.
    fn from(value: f64) -> Self {
        Number::from_f64(value).map_or(ParamValue::Null, ParamValue::Number)
    }
}

impl From<DateTime<Utc>> for ParamValue {
    fn from(value: DateTime<Utc>) -> Self {
        ParamValue::Date(value)
    }
}

impl<T: Into<ParamValue>> From<Vec<T>> for ParamValue {
    fn from(values: Vec<T>) -> Self {
        ParamValue::Array(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<ParamValue>> From<Option<T>> for ParamValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(ParamValue::Null, Into::into)
    }
}

/// Query parameters in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params(Vec<(String, ParamValue)>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`Params::insert`].
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Set `key`, replacing an existing entry in place or appending a new one.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.0.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (k, v) in iter {
            params.insert(k, v);
        }
        params
    }
}

impl<'de> Deserialize<'de> for Params {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        ordered_pairs::<D, ParamValue>(deserializer).map(|pairs| pairs.into_iter().collect())
    }
}

/// Request payload handed to the transport.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "Value")]
pub enum Body {
    /// No body; the transport sends nothing.
    #[default]
    Empty,
    Text(String),
    Bytes(Vec<u8>),
    /// Form fields, sent as-is by the transport.
    Form(Vec<(String, String)>),
    /// A plain structured object. Serialized to JSON before sending.
    Json(Map<String, Value>),
}

impl Body {
    /// Whether this is a plain structured object.
    pub fn is_plain_object(&self) -> bool {
        matches!(self, Body::Json(_))
    }

    /// Whether there is nothing worth describing with a `Content-Type`.
    pub fn is_absent(&self) -> bool {
        match self {
            Body::Empty => true,
            Body::Text(text) => text.is_empty(),
            Body::Bytes(_) | Body::Form(_) | Body::Json(_) => false,
        }
    }
}

impl From<Value> for Body {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Body::Empty,
            Value::String(text) => Body::Text(text),
            Value::Object(map) => Body::Json(map),
            other => Body::Text(other.to_string()),
        }
    }
}

impl From<Map<String, Value>> for Body {
    fn from(map: Map<String, Value>) -> Self {
        Body::Json(map)
    }
}

impl From<&str> for Body {
    fn from(text: &str) -> Self {
        Body::Text(text.to_string())
    }
}

impl From<String> for Body {
    fn from(text: String) -> Self {
        Body::Text(text)
    }
}

impl From<Vec<u8>> for Body {
    fn from(bytes: Vec<u8>) -> Self {
        Body::Bytes(bytes)
    }
}

/// Response payload as read from the transport.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ResponseData {
    #[default]
    Empty,
    Text(String),
    Json(Value),
    Bytes(Vec<u8>),
}

impl ResponseData {
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ResponseData::Json(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ResponseData::Text(text) => Some(text),
            _ => None,
        }
    }
}

/// Deserialize a map into `(key, value)` pairs without losing source order.
pub(crate) fn ordered_pairs<'de, D, V>(deserializer: D) -> Result<Vec<(String, V)>, D::Error>
where
    D: Deserializer<'de>,
    V: Deserialize<'de>,
{
    struct PairsVisitor<V>(PhantomData<V>);

    impl<'de, V: Deserialize<'de>> Visitor<'de> for PairsVisitor<V> {
        type Value = Vec<(String, V)>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map with string keys")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
            let mut pairs = Vec::with_capacity(access.size_hint().unwrap_or(0));
            while let Some(entry) = access.next_entry()? {
                pairs.push(entry);
            }
            Ok(pairs)
        }
    }

    deserializer.deserialize_map(PairsVisitor(PhantomData))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;

    #[test]
    fn date_renders_as_iso_with_millis() {
        let date = Utc.with_ymd_and_hms(2020, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(ParamValue::from(date).render(), "2020-01-02T03:04:05.000Z");
    }

    #[test]
    fn object_renders_as_json() {
        let value = ParamValue::from(json!({"a": 1}));
        assert_eq!(value.render(), r#"{"a":1}"#);
    }

    #[test]
    fn object_keeps_key_order() {
        let value: ParamValue = serde_json::from_str(r#"{"z":1,"a":2}"#).unwrap();
        assert_eq!(value.render(), r#"{"z":1,"a":2}"#);
    }

    #[test]
    fn whole_float_renders_without_fraction() {
        assert_eq!(ParamValue::from(1.0f64).render(), "1");
        assert_eq!(ParamValue::from(-3.0f64).render(), "-3");
        assert_eq!(ParamValue::from(2.5f64).render(), "2.5");
        assert_eq!(ParamValue::from(7i64).render(), "7");
        let parsed: ParamValue = serde_json::from_str("1.0").unwrap();
        assert_eq!(parsed.render(), "1");
    }

    #[test]
    fn nested_array_renders_comma_joined() {
        let value = ParamValue::from(json!([1, 2]));
        assert_eq!(value.render(), "1,2");
    }

    #[test]
    fn params_keep_insertion_order() {
        let params = Params::new().with("z", 1i64).with("a", 2i64).with("z", 3i64);
        let keys: Vec<_> = params.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["z", "a"]);
        assert_eq!(params.get("z"), Some(&ParamValue::from(3i64)));
    }

    #[test]
    fn params_deserialize_in_document_order() {
        let params: Params = serde_json::from_str(r#"{"zeta":1,"alpha":[1,2],"mid":null}"#).unwrap();
        let keys: Vec<_> = params.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["zeta", "alpha", "mid"]);
        assert_eq!(params.get("mid"), Some(&ParamValue::Null));
    }

    #[test]
    fn body_from_json_value() {
        assert_eq!(Body::from(Value::Null), Body::Empty);
        assert_eq!(Body::from(json!("raw")), Body::Text("raw".to_string()));
        assert!(Body::from(json!({"x": 1})).is_plain_object());
        assert_eq!(Body::from(json!([1, 2])), Body::Text("[1,2]".to_string()));
    }

    #[test]
    fn empty_text_counts_as_absent() {
        assert!(Body::Empty.is_absent());
        assert!(Body::from("").is_absent());
        assert!(!Body::from("x").is_absent());
        assert!(!Body::Bytes(Vec::new()).is_absent());
    }

    #[test]
    fn non_finite_float_is_null() {
        assert_eq!(ParamValue::from(f64::NAN), ParamValue::Null);
    }
}
