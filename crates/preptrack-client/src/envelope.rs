//! The `{ success, data }` envelope every backend response uses.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use preptrack_core::ApiError;

#[derive(Debug, Deserialize)]
struct RawEnvelope {
    success: bool,
    #[serde(default)]
    data: Value,
}

/// Decode a response body into `T`, applying envelope semantics.
///
/// - `success: false` yields [`ApiError::Rejected`] with the payload text.
/// - A body that is not an envelope yields [`ApiError::Http`] for error
///   statuses and [`ApiError::Decode`] otherwise.
/// - A successful envelope whose `data` does not match `T` yields
///   [`ApiError::Decode`].
pub fn decode<T: DeserializeOwned>(status: u16, body: &str) -> Result<T, ApiError> {
    let envelope: RawEnvelope = match serde_json::from_str(body) {
        Ok(envelope) => envelope,
        Err(_) if status >= 400 => {
            return Err(ApiError::Http {
                status,
                body: body.to_string(),
            });
        }
        Err(e) => return Err(ApiError::Decode(e.to_string())),
    };

    if !envelope.success {
        return Err(ApiError::Rejected(rejection_message(envelope.data)));
    }

    if status >= 400 {
        return Err(ApiError::Http {
            status,
            body: body.to_string(),
        });
    }

    serde_json::from_value(envelope.data).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Text carried by a failed envelope.
///
/// Strings pass through untouched; objects contribute their `message` (or
/// `error`) field; anything else is rendered as JSON.
fn rejection_message(data: Value) -> String {
    match data {
        Value::String(s) => s,
        Value::Object(map) => map
            .get("message")
            .or_else(|| map.get("error"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| serde_json::to_string(&map).unwrap_or_default()),
        Value::Null => "request failed".to_string(),
        other => other.to_string(),
    }
}
