//! Response serialization and error formatting.

use serde::Serialize;
use stratus_model::ControlError;

use crate::body::ControlResponseBody;

/// Content type for control-plane JSON responses.
pub const CONTENT_TYPE: &str = "application/json";

/// Serialize a control-plane error into a JSON response body:
///
/// ```json
/// {"error": "not_found", "message": "not found: bucket b"}
/// ```
#[must_use]
pub fn error_to_json(error: &ControlError) -> Vec<u8> {
    serde_json::to_vec(&serde_json::json!({
        "error": error.kind(),
        "message": error.to_string(),
    }))
    .expect("JSON serialization of error cannot fail")
}

/// Convert a [`ControlError`] into a complete HTTP error response.
#[must_use]
pub fn error_to_response(
    error: &ControlError,
    request_id: &str,
) -> http::Response<ControlResponseBody> {
    let body = ControlResponseBody::from_json(error_to_json(error));
    http::Response::builder()
        .status(error.status_code())
        .header("content-type", CONTENT_TYPE)
        .header("x-request-id", request_id)
        .body(body)
        .expect("valid error response")
}

/// Build a 200 response from a serializable payload. The request id header
/// is stamped by the service layer.
pub fn json_response<T: Serialize>(
    payload: &T,
) -> Result<http::Response<ControlResponseBody>, ControlError> {
    let json = serde_json::to_vec(payload)
        .map_err(|e| ControlError::transient_store(format!("response serialization: {e}")))?;
    let response = http::Response::builder()
        .status(http::StatusCode::OK)
        .header("content-type", CONTENT_TYPE)
        .body(ControlResponseBody::from_json(json))
        .expect("valid JSON response");
    Ok(response)
}

/// Build the 200 response for endpoints with no payload.
#[must_use]
pub fn empty_response() -> http::Response<ControlResponseBody> {
    http::Response::builder()
        .status(http::StatusCode::OK)
        .header("content-type", CONTENT_TYPE)
        .body(ControlResponseBody::from_json(b"{}".to_vec()))
        .expect("valid empty response")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_format_error_json() {
        let err = ControlError::not_found("bucket b");
        let json = error_to_json(&err);
        let parsed: serde_json::Value = serde_json::from_slice(&json).unwrap();
        assert_eq!(parsed["error"], "not_found");
        assert_eq!(parsed["message"], "not found: bucket b");
    }

    #[test]
    fn test_should_build_error_response_with_mapped_status() {
        let err = ControlError::conflict("object already exists");
        let resp = error_to_response(&err, "req-1");
        assert_eq!(resp.status(), http::StatusCode::CONFLICT);
        assert_eq!(resp.headers().get("content-type").unwrap(), CONTENT_TYPE);
        assert_eq!(resp.headers().get("x-request-id").unwrap(), "req-1");
    }

    #[test]
    fn test_should_build_json_success_response() {
        let resp = json_response(&serde_json::json!({"ok": true})).unwrap();
        assert_eq!(resp.status(), http::StatusCode::OK);
        assert_eq!(resp.headers().get("content-type").unwrap(), CONTENT_TYPE);
    }

    #[test]
    fn test_should_build_empty_response_as_json_object() {
        let resp = empty_response();
        assert_eq!(resp.status(), http::StatusCode::OK);
    }
}
