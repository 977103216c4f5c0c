//! Binding query parameters onto a URL.

use crate::encode::encode;
use crate::types::{ParamValue, Params};

/// Suffix marking a repeated array key, kept percent-escaped on the wire.
const ARRAY_KEY_SUFFIX: &str = "%5B%5D";

/// Serialize `params` into a query string and merge it into `url`.
///
/// Entries whose value is `Null` are skipped. Array values produce one
/// `key%5B%5D=value` pair per element. When at least one pair is emitted any
/// fragment is stripped from `url` before the query is appended. Binding is not
/// idempotent: call it once per request.
pub fn bind_url(url: &str, params: Option<&Params>) -> String {
    let Some(params) = params else {
        return url.to_string();
    };

    let mut parts = Vec::new();
    for (key, value) in params.iter() {
        let (key, values) = match value {
            ParamValue::Null => continue,
            ParamValue::Array(items) => (
                format!("{}{ARRAY_KEY_SUFFIX}", encode(key)),
                items.iter().collect::<Vec<_>>(),
            ),
            single => (encode(key), vec![single]),
        };
        for value in values {
            parts.push(format!("{key}={}", encode(&value.render())));
        }
    }

    let serialized = parts.join("&");
    if serialized.is_empty() {
        return url.to_string();
    }

    let base = url.split_once('#').map_or(url, |(before, _)| before);
    let separator = if base.contains('?') { '&' } else { '?' };
    format!("{base}{separator}{serialized}")
}
