//! Request body decoding.
//!
//! Bodies are accepted as JSON objects or urlencoded forms and decoded into
//! a field map so that absent keys and `null` stay distinguishable. Requests
//! without a recognised content type, with an empty body, or with a JSON
//! array decode to an empty map and fail the usual presence checks instead
//! of erroring.

use axum::http::{HeaderMap, header::CONTENT_TYPE};
use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};
use crate::validate::Fields;

/// Decode a request body according to its `Content-Type`.
///
/// # Errors
///
/// Returns [`Error::InvalidBody`] for malformed JSON, a top-level JSON scalar
/// or an undecodable form.
pub fn decode(headers: &HeaderMap, body: &[u8]) -> Result<Fields> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Fields::new());
    }

    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    if mime == "application/json" || mime.ends_with("+json") {
        return match serde_json::from_slice::<Value>(body) {
            Ok(Value::Object(fields)) => Ok(fields),
            // An array has no named fields
            Ok(Value::Array(_)) => Ok(Fields::new()),
            Ok(_) => Err(Error::InvalidBody("expected a JSON object".to_string())),
            Err(e) => Err(Error::InvalidBody(e.to_string())),
        };
    }

    if mime == "application/x-www-form-urlencoded" {
        let pairs: Vec<(String, String)> =
            serde_urlencoded::from_bytes(body).map_err(|e| Error::InvalidBody(e.to_string()))?;
        return Ok(pairs
            .into_iter()
            .map(|(key, value)| (key, Value::String(value)))
            .collect());
    }

    debug!(content_type, "Ignoring body with unsupported content type");
    Ok(Fields::new())
}
