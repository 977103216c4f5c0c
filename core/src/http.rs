//! Request descriptions and response envelopes.
//!
//! # Design
//! A [`RequestConfig`] is plain data built by the caller (or deserialized from
//! a JSON description), normalized once by [`process_config`] and then handed to
//! a transport. The [`Response`] envelope carries the normalized config back
//! together with the transport object that produced it, so callers can inspect
//! both after the fact.
//!
//! [`process_config`]: crate::client::process_config

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer};
use thiserror::Error;

use crate::headers::{Headers, ResponseHeaders};
use crate::types::{Body, Params, ResponseData};

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Method {
    #[default]
    Get,
    Delete,
    Head,
    Options,
    Post,
    Put,
    Patch,
}

impl Method {
    /// Uppercase wire form.
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Delete => "DELETE",
            Method::Head => "HEAD",
            Method::Options => "OPTIONS",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a method name is not one of the seven supported verbs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported HTTP method: {0}")]
pub struct ParseMethodError(pub String);

impl FromStr for Method {
    type Err = ParseMethodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            Method::Get,
            Method::Delete,
            Method::Head,
            Method::Options,
            Method::Post,
            Method::Put,
            Method::Patch,
        ]
        .into_iter()
        .find(|m| m.as_str().eq_ignore_ascii_case(s))
        .ok_or_else(|| ParseMethodError(s.to_string()))
    }
}

impl<'de> Deserialize<'de> for Method {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}

/// How the transport should interpret the response body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum ResponseType {
    /// Text, the transport's default interpretation.
    #[default]
    #[serde(rename = "")]
    Default,
    #[serde(rename = "text")]
    Text,
    #[serde(rename = "json")]
    Json,
    #[serde(rename = "arraybuffer")]
    ArrayBuffer,
    #[serde(rename = "blob")]
    Blob,
}

impl ResponseType {
    /// Whether the body should be read through the transport's text accessor.
    pub fn is_text(self) -> bool {
        matches!(self, ResponseType::Default | ResponseType::Text)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ResponseType::Default => "",
            ResponseType::Text => "text",
            ResponseType::Json => "json",
            ResponseType::ArrayBuffer => "arraybuffer",
            ResponseType::Blob => "blob",
        }
    }
}

/// Description of one HTTP request.
///
/// Only `url` is required when deserializing; every other field has the
/// default shown on it.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestConfig {
    pub url: String,
    /// Defaults to `GET`.
    #[serde(default)]
    pub method: Method,
    /// Defaults to no body.
    #[serde(default)]
    pub data: Body,
    #[serde(default)]
    pub params: Option<Params>,
    /// Defaults to no headers.
    #[serde(default)]
    pub headers: Headers,
    /// Defaults to the transport's text interpretation.
    #[serde(default)]
    pub response_type: ResponseType,
    /// Milliseconds; `0` disables the timeout.
    #[serde(default)]
    pub timeout: u64,
}

impl RequestConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    #[must_use]
    pub fn data(mut self, data: impl Into<Body>) -> Self {
        self.data = data.into();
        self
    }

    #[must_use]
    pub fn params(mut self, params: Params) -> Self {
        self.params = Some(params);
        self
    }

    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    #[must_use]
    pub fn response_type(mut self, response_type: ResponseType) -> Self {
        self.response_type = response_type;
        self
    }

    #[must_use]
    pub fn timeout(mut self, millis: u64) -> Self {
        self.timeout = millis;
        self
    }
}

/// A completed HTTP exchange.
#[derive(Debug)]
pub struct Response<T> {
    pub data: ResponseData,
    pub status: u16,
    pub status_text: String,
    /// Lowercase header names.
    pub headers: ResponseHeaders,
    /// The normalized config that produced this response.
    pub config: RequestConfig,
    /// The transport object, for introspection.
    pub request: T,
}

impl<T> Response<T> {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status)
    }

    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.status)
    }
}
