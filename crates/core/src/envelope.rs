//! The `{ "data", "code", "message" }` response envelope.
//!
//! [`normalize_envelope`] is the terminal stage of the pipeline: every
//! outcome, successful or not, leaves it as an [`Envelope`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Failure;
use crate::error_mapping::ErrorMapping;

/// `code` value of every successful envelope.
pub const SUCCESS_CODE: i64 = 0;

/// Standard response envelope.
///
/// `data` is `null` on failure; `message` is empty on success unless a
/// handler supplies one explicitly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub data: Value,
    pub code: i64,
    pub message: String,
}

impl Envelope {
    pub fn success(data: Value) -> Self {
        Self {
            data,
            code: SUCCESS_CODE,
            message: String::new(),
        }
    }

    pub fn success_with_message(data: Value, message: impl Into<String>) -> Self {
        Self {
            data,
            code: SUCCESS_CODE,
            message: message.into(),
        }
    }

    pub fn failure(code: i64, message: impl Into<String>) -> Self {
        Self {
            data: Value::Null,
            code,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == SUCCESS_CODE
    }

    /// Reinterpret a JSON value that is already envelope-shaped.
    ///
    /// Matches only objects with exactly the keys `data`, `code` (an integer)
    /// and `message` (a string). Anything else is handed back unchanged.
    pub fn try_from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Object(mut map)
                if map.len() == 3
                    && map.contains_key("data")
                    && map.get("code").is_some_and(Value::is_i64)
                    && map.get("message").is_some_and(Value::is_string) =>
            {
                let data = map.remove("data").unwrap_or(Value::Null);
                let code = map.get("code").and_then(Value::as_i64).unwrap_or(SUCCESS_CODE);
                let message = match map.remove("message") {
                    Some(Value::String(message)) => message,
                    _ => String::new(),
                };
                Ok(Self { data, code, message })
            }
            other => Err(other),
        }
    }
}

/// Wrap a pipeline result in the envelope.
///
/// - `Ok(payload)`: `data = payload`, `code = 0`, `message = ""`. A payload
///   that already is an envelope is passed through rather than wrapped again.
/// - `Err(failure)`: `data = null`, code and message from `mapping`, with
///   unmapped categories degraded to the generic internal error.
pub fn normalize_envelope(result: Result<Value, Failure>, mapping: &ErrorMapping) -> Envelope {
    match result {
        Ok(payload) => match Envelope::try_from_value(payload) {
            Ok(envelope) => {
                tracing::debug!(code = envelope.code, "Payload already enveloped, passing through");
                envelope
            }
            Err(payload) => Envelope::success(payload),
        },
        Err(failure) => {
            let (code, message) = mapping.resolve_or_fallback(&failure);
            tracing::debug!(category = %failure.category, code, "Normalized failure");
            Envelope::failure(code, message)
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn success_wraps_payload() {
        let envelope = normalize_envelope(Ok(json!({"id": 1})), &ErrorMapping::builtin());
        assert_eq!(envelope, Envelope::success(json!({"id": 1})));
        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({"data": {"id": 1}, "code": 0, "message": ""})
        );
    }

    #[test]
    fn success_wraps_arrays_and_null() {
        let mapping = ErrorMapping::builtin();
        assert_eq!(normalize_envelope(Ok(json!([1, 2])), &mapping).data, json!([1, 2]));
        assert_eq!(normalize_envelope(Ok(Value::Null), &mapping).data, Value::Null);
    }

    #[test]
    fn enveloped_payload_is_not_wrapped_twice() {
        let mapping = ErrorMapping::builtin();
        let once = normalize_envelope(Ok(json!({"id": 1})), &mapping);
        let twice = normalize_envelope(Ok(serde_json::to_value(&once).unwrap()), &mapping);
        assert_eq!(once, twice);
    }

    #[test]
    fn near_envelope_shapes_are_wrapped() {
        let mapping = ErrorMapping::builtin();
        for payload in [
            json!({"data": 1, "code": 0}),
            json!({"data": 1, "code": "0", "message": ""}),
            json!({"data": 1, "code": 0, "message": "", "extra": true}),
            json!({"data": 1, "code": 0.5, "message": ""}),
        ] {
            let envelope = normalize_envelope(Ok(payload.clone()), &mapping);
            assert_eq!(envelope.data, payload);
        }
    }

    #[test]
    fn failure_maps_through_table() {
        let envelope = normalize_envelope(Err(Failure::not_found()), &ErrorMapping::builtin());
        assert_eq!(envelope, Envelope::failure(40401, "Resource not found"));
        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({"data": null, "code": 40401, "message": "Resource not found"})
        );
    }

    #[test]
    fn failure_interpolates_detail() {
        let envelope = normalize_envelope(
            Err(Failure::validation("title is required")),
            &ErrorMapping::builtin(),
        );
        assert_eq!(envelope.code, 40001);
        assert_eq!(envelope.message, "Validation failed: title is required");
    }

    #[test]
    fn unmapped_failure_gets_generic_code() {
        let envelope = normalize_envelope(Err(Failure::new("quota")), &ErrorMapping::builtin());
        assert_ne!(envelope.code, SUCCESS_CODE);
        assert!(!envelope.message.is_empty());
        assert_eq!(envelope.data, Value::Null);
    }
}
