//! Config normalization and the public request entry point.
//!
//! # Design
//! [`process_config`] is a composition of three pure transforms over an owned
//! config. Headers are processed before the body because the header step
//! needs to see whether the body is still a plain structured object; once the
//! body transform has serialized it, that signal is gone.
//!
//! [`request`] runs the pipeline, drives the transport, and parses a textual
//! response body as JSON where possible. [`Client`] does the same with a fresh
//! transport per call.

use std::fmt;
use std::future::Future;

use crate::data::{transform_request, transform_response};
use crate::driver;
use crate::error::RequestError;
use crate::headers::process_headers;
use crate::http::{RequestConfig, Response};
use crate::transport::Transport;
use crate::url::bind_url;

/// Turn a caller's config into a transport-ready one.
///
/// Must run exactly once per request: binding parameters onto the URL is not
/// idempotent.
pub fn process_config(config: RequestConfig) -> RequestConfig {
    let RequestConfig {
        url,
        method,
        data,
        params,
        headers,
        response_type,
        timeout,
    } = config;

    let url = bind_url(&url, params.as_ref());
    let headers = process_headers(headers, &data);
    let data = transform_request(data);

    RequestConfig {
        url,
        method,
        data,
        params,
        headers,
        response_type,
        timeout,
    }
}

/// Send `config` over `transport` and resolve with the parsed response.
pub fn request<T: Transport>(
    config: RequestConfig,
    transport: T,
) -> impl Future<Output = Result<Response<T>, RequestError>> {
    let pending = driver::send(process_config(config), transport);
    async move {
        let mut response = pending.await?;
        response.data = transform_response(std::mem::take(&mut response.data));
        Ok(response)
    }
}

/// Issues requests, each over a transport built by `make_transport`.
pub struct Client<F> {
    make_transport: F,
}

impl<F> fmt::Debug for Client<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client").finish_non_exhaustive()
    }
}

impl<F, T> Client<F>
where
    F: Fn() -> T,
    T: Transport,
{
    pub fn new(make_transport: F) -> Self {
        Self { make_transport }
    }

    /// Run `config` through [`request`] on a new transport.
    pub fn request(
        &self,
        config: RequestConfig,
    ) -> impl Future<Output = Result<Response<T>, RequestError>> {
        request(config, (self.make_transport)())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::headers::{Headers, CONTENT_TYPE, JSON_CONTENT_TYPE};
    use crate::http::Method;
    use crate::transport::testing::ScriptedTransport;
    use crate::types::{Body, Params, ResponseData};

    #[test]
    fn pipeline_sets_content_type_before_serializing() {
        let config = RequestConfig::new("http://a.com/p#top")
            .method(Method::Post)
            .params(Params::new().with("q", "x y"))
            .data(Body::from(json!({"a": 1})));

        let processed = process_config(config);

        assert_eq!(processed.url, "http://a.com/p?q=x+y");
        assert_eq!(processed.headers.get(CONTENT_TYPE), Some(JSON_CONTENT_TYPE));
        assert_eq!(processed.data, Body::Text(r#"{"a":1}"#.to_string()));
        assert_eq!(processed.method, Method::Post);
    }

    #[test]
    fn pipeline_leaves_plain_requests_alone() {
        let config = RequestConfig::new("/plain").data("text");
        let processed = process_config(config.clone());
        assert_eq!(processed, config);
    }

    #[test]
    fn pipeline_canonicalizes_header_case() {
        let config = RequestConfig {
            headers: Headers::new().with("CONTENT-TYPE", "text/csv"),
            ..RequestConfig::new("/csv").data(Body::from(json!({"a": 1})))
        };
        let processed = process_config(config);
        assert_eq!(processed.headers.get(CONTENT_TYPE), Some("text/csv"));
        assert_eq!(processed.headers.len(), 1);
    }

    #[tokio::test]
    async fn request_parses_json_body() {
        let mut transport = ScriptedTransport::completing(200, r#"{"ok":true}"#);
        transport.raw_headers = "content-type: application/json\r\n".to_string();
        let record = transport.record();

        let config = RequestConfig::new("/api")
            .method(Method::Post)
            .params(Params::new().with("v", 2i64))
            .data(Body::from(json!({"name": "n"})));
        let response = request(config, transport).await.unwrap();

        assert_eq!(response.data, ResponseData::Json(json!({"ok": true})));
        assert_eq!(response.config.url, "/api?v=2");
        let record = record.lock().unwrap();
        assert_eq!(record.sent, Some(Body::Text(r#"{"name":"n"}"#.to_string())));
        assert_eq!(
            record.headers,
            [(CONTENT_TYPE.to_string(), JSON_CONTENT_TYPE.to_string())]
        );
    }

    #[tokio::test]
    async fn request_keeps_non_json_text() {
        let transport = ScriptedTransport::completing(200, "plain words");
        let response = request(RequestConfig::new("/t"), transport).await.unwrap();
        assert_eq!(response.data, ResponseData::Text("plain words".to_string()));
    }

    #[tokio::test]
    async fn client_builds_a_transport_per_request() {
        let built = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&built);
        let client = Client::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            ScriptedTransport::completing(200, "[]")
        });

        let first = client.request(RequestConfig::new("/a")).await.unwrap();
        let second = client.request(RequestConfig::new("/b")).await.unwrap();

        assert_eq!(built.load(Ordering::SeqCst), 2);
        assert_eq!(first.data, ResponseData::Json(json!([])));
        assert_eq!(second.config.url, "/b");
    }
}
