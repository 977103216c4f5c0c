//! Request and response body conversion.

use serde_json::Value;

use crate::types::{Body, ResponseData};

/// Convert a request body into a form the transport can send.
///
/// A plain structured object becomes its JSON text. Every other payload is
/// returned untouched.
pub fn transform_request(data: Body) -> Body {
    match data {
        Body::Json(map) => Body::Text(Value::Object(map).to_string()),
        other => other,
    }
}

/// Convert a raw response body into structured data.
///
/// Text that parses as JSON becomes [`ResponseData::Json`]. Text that does not
/// is kept as-is; the parse failure is only logged, since a successful text
/// response need not be JSON.
pub fn transform_response(data: ResponseData) -> ResponseData {
    match data {
        ResponseData::Text(text) => match serde_json::from_str::<Value>(&text) {
            Ok(value) => ResponseData::Json(value),
            Err(err) => {
                tracing::debug!(error = %err, len = text.len(), "response body is not JSON");
                ResponseData::Text(text)
            }
        },
        other => other,
    }
}
