//! Drives one transport through a single request.
//!
//! # Design
//! [`send`] does all of its work against the transport synchronously: open,
//! subscribe, configure, send. It then returns a future that only waits for
//! the one-shot outcome, so nothing blocks the calling thread and the
//! transport is free to report events from wherever it runs. The response
//! itself travels with the completion signal, so polling late never observes a
//! transport that has moved on.

use std::future::Future;

use tokio::sync::oneshot;

use crate::error::RequestError;
use crate::headers::{Headers, CONTENT_TYPE};
use crate::http::{RequestConfig, Response};
use crate::transport::{Completion, EventSink, Signal, Transport};
use crate::types::Body;

/// Send an already-normalized config over `transport`.
///
/// The returned future resolves exactly once: with a [`Response`] when the
/// transport reaches [`Done`](crate::ReadyState::Done), or with a
/// [`RequestError`] on a network error or timeout. If the transport drops every [`EventSink`]
/// without reporting an outcome the request fails as a network error.
pub fn send<T: Transport>(
    config: RequestConfig,
    mut transport: T,
) -> impl Future<Output = Result<Response<T>, RequestError>> {
    let (events, outcome) = EventSink::new(config.response_type, config.timeout > 0);

    tracing::debug!(
        method = %config.method,
        url = %config.url,
        response_type = config.response_type.as_str(),
        "opening request"
    );
    transport.open(config.method, &config.url);
    transport.subscribe(events);
    transport.set_response_type(config.response_type);
    if config.timeout > 0 {
        transport.set_timeout(config.timeout);
    }
    apply_headers(&mut transport, &config.headers, &config.data);
    transport.send(config.data.clone());

    async move { settle(outcome.await, config, transport) }
}

/// Apply every header, except a `Content-Type` on a request without a body.
fn apply_headers<T: Transport>(transport: &mut T, headers: &Headers, data: &Body) {
    for (name, value) in headers.iter() {
        if data.is_absent() && name.eq_ignore_ascii_case(CONTENT_TYPE) {
            tracing::trace!(header = name, "dropping content type on bodyless request");
            continue;
        }
        tracing::trace!(header = name, "setting request header");
        transport.set_request_header(name, value);
    }
}

fn settle<T: Transport>(
    outcome: Result<Signal, oneshot::error::RecvError>,
    config: RequestConfig,
    transport: T,
) -> Result<Response<T>, RequestError> {
    match outcome {
        Ok(Signal::Done(completion)) => Ok(into_response(completion, config, transport)),
        Ok(Signal::Error) => {
            tracing::debug!(url = %config.url, "request failed with a network error");
            Err(RequestError::Network {
                config: Box::new(config),
            })
        }
        Ok(Signal::Timeout) => {
            tracing::debug!(url = %config.url, timeout = config.timeout, "request timed out");
            let timeout = config.timeout;
            Err(RequestError::Timeout {
                config: Box::new(config),
                timeout,
            })
        }
        Err(_) => {
            tracing::warn!(url = %config.url, "transport went away without completing");
            Err(RequestError::Network {
                config: Box::new(config),
            })
        }
    }
}

fn into_response<T: Transport>(
    completion: Completion,
    config: RequestConfig,
    transport: T,
) -> Response<T> {
    let Completion {
        status,
        status_text,
        data,
        headers,
    } = completion;
    tracing::debug!(url = %config.url, status, "request completed");
    Response {
        data,
        status,
        status_text,
        headers,
        config,
        request: transport,
    }
}
