//! Minimal asynchronous HTTP client core.
//!
//! # Overview
//! Turns a declarative [`RequestConfig`] into a transport-ready request, sends
//! it over a caller-supplied [`Transport`], and resolves exactly once with a
//! [`Response`] or a [`RequestError`]. The crate performs no I/O itself; the
//! transport is an external object in the style of a browser's asynchronous
//! request object (host-does-IO pattern).
//!
//! # Design
//! - The config pipeline is three pure transforms: bind `params` onto the URL,
//!   normalize headers, serialize a structured body. Order is fixed.
//! - The driver configures the transport synchronously and hands it an
//!   [`EventSink`]; the first terminal event wins and later ones are ignored.
//!   The response is read at the moment completion is reported.
//! - Bodies, parameters and response data are closed enums, so every transform
//!   is a pattern match.
//!
//! # Example
//! ```no_run
//! # async fn run<T: ajax_core::Transport>(transport: T) -> Result<(), ajax_core::RequestError> {
//! use ajax_core::{request, Method, Params, RequestConfig};
//!
//! let config = RequestConfig::new("https://example.com/search")
//!     .method(Method::Get)
//!     .params(Params::new().with("q", "rust").with("tags", vec!["a", "b"]))
//!     .timeout(5_000);
//! let response = request(config, transport).await?;
//! println!("{} {:?}", response.status, response.data);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod data;
pub mod driver;
pub mod encode;
pub mod error;
pub mod headers;
pub mod http;
pub mod transport;
pub mod types;
pub mod url;

pub use client::{process_config, request, Client};
pub use data::{transform_request, transform_response};
pub use encode::encode;
pub use error::RequestError;
pub use headers::{normalize_header_name, parse_headers, process_headers, Headers, ResponseHeaders};
pub use http::{Method, ParseMethodError, RequestConfig, Response, ResponseType};
pub use transport::{EventSink, ReadyState, Transport, TransportState};
pub use types::{Body, ParamValue, Params, ResponseData};
pub use url::bind_url;
