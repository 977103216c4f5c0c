//! Request header normalization and response header parsing.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::types::{ordered_pairs, Body};

/// Canonical spelling of the content type header.
pub const CONTENT_TYPE: &str = "Content-Type";

/// Content type set for plain structured bodies.
pub const JSON_CONTENT_TYPE: &str = "application/json;charset=utf-8";

/// Request headers in insertion order.
///
/// Names are kept exactly as written. Two names that differ only in case are
/// distinct entries until [`normalize_header_name`] folds them together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers(Vec<(String, String)>);

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`Headers::insert`].
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// Set `name` (exact match), replacing its value in place or appending.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.0.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.0.push((name, value)),
        }
    }

    /// Look up `name` by exact match.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for Headers {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut headers = Headers::new();
        for (name, value) in iter {
            headers.insert(name, value);
        }
        headers
    }
}

impl Serialize for Headers {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

impl<'de> Deserialize<'de> for Headers {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        ordered_pairs::<D, String>(deserializer).map(|pairs| pairs.into_iter().collect())
    }
}

/// Fold every case variant of `canonical` into a single entry spelled
/// `canonical`.
///
/// Variants are visited in order and each one overwrites the previous value,
/// so the last variant seen wins. An entry already spelled `canonical` keeps
/// its position; otherwise the folded entry is appended.
pub fn normalize_header_name(headers: Headers, canonical: &str) -> Headers {
    let mut normalized = Headers::new();
    let mut folded = None;
    for (name, value) in headers.0 {
        if name == canonical {
            normalized.insert(name, value);
        } else if name.eq_ignore_ascii_case(canonical) {
            folded = Some(value);
        } else {
            normalized.insert(name, value);
        }
    }
    if let Some(value) = folded {
        normalized.insert(canonical, value);
    }
    normalized
}

/// Canonicalize header names and add a JSON content type for structured
/// bodies that do not already declare one.
///
/// An empty `Content-Type` value counts as not set.
pub fn process_headers(headers: Headers, data: &Body) -> Headers {
    let mut headers = normalize_header_name(headers, CONTENT_TYPE);
    if data.is_plain_object() && headers.get(CONTENT_TYPE).map_or(true, str::is_empty) {
        headers.insert(CONTENT_TYPE, JSON_CONTENT_TYPE);
    }
    headers
}

/// Response headers keyed by lowercase name.
pub type ResponseHeaders = BTreeMap<String, String>;

/// Parse a raw CRLF-separated header block into a lowercase-keyed map.
///
/// Each line is split on its first `:`. Lines whose name or value is empty
/// after trimming are skipped, and a repeated name keeps its last value.
pub fn parse_headers(raw: &str) -> ResponseHeaders {
    let mut parsed = ResponseHeaders::new();
    for line in raw.split("\r\n") {
        let Some((name, value)) = line.split_once(':') else {
            continue;
        };
        let name = name.trim().to_ascii_lowercase();
        let value = value.trim();
        if name.is_empty() || value.is_empty() {
            continue;
        }
        parsed.insert(name, value.to_string());
    }
    parsed
}
