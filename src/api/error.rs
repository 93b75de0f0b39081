//! Mapping of HTTP failures onto [`SiteworkError::RequestFailed`].
//!
//! Both transport errors and non-2xx responses become the one request-failed
//! kind, carrying method, path and (when there was a response) status.

use reqwest::StatusCode;
use serde::Deserialize;

use crate::error::SiteworkError;

/// Longest response body quoted in an error message
const MAX_BODY_CHARS: usize = 200;

/// Common error payload shapes: `{"message": ...}` or `{"error": ...}`
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

/// Error for a request that got a non-success response
pub fn response_error(method: &str, path: &str, status: StatusCode, body: &str) -> SiteworkError {
    SiteworkError::request_failed(method, path, Some(status.as_u16()), error_message(status, body))
}

/// Error for a request that never produced a response
pub fn transport_error(method: &str, path: &str, err: reqwest::Error) -> SiteworkError {
    let message = if err.is_timeout() {
        "request timed out".to_string()
    } else if err.is_connect() {
        "could not connect".to_string()
    } else {
        err.to_string()
    };
    SiteworkError::request_failed(method, path, err.status().map(|s| s.as_u16()), message)
}

/// Best human-readable message for a failed response
pub fn error_message(status: StatusCode, body: &str) -> String {
    let body = body.trim();
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body)
        && let Some(message) = parsed.message.or(parsed.error)
    {
        return message;
    }
    if body.is_empty() {
        return status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string();
    }
    body.chars().take(MAX_BODY_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_from_json_body() {
        assert_eq!(
            error_message(StatusCode::BAD_REQUEST, r#"{"message":"title is required"}"#),
            "title is required"
        );
        assert_eq!(
            error_message(StatusCode::CONFLICT, r#"{"error":"already awarded"}"#),
            "already awarded"
        );
    }

    #[test]
    fn test_message_falls_back_to_reason_then_text() {
        assert_eq!(error_message(StatusCode::NOT_FOUND, ""), "Not Found");
        assert_eq!(error_message(StatusCode::BAD_GATEWAY, "upstream down"), "upstream down");
        let long = "x".repeat(500);
        assert_eq!(error_message(StatusCode::INTERNAL_SERVER_ERROR, &long).len(), MAX_BODY_CHARS);
    }

    #[test]
    fn test_response_error_is_request_failure() {
        let err = response_error("PUT", "/bids/bid-1/award", StatusCode::CONFLICT, "");
        assert!(err.is_request_failure());
        assert_eq!(err.to_string(), "PUT /bids/bid-1/award failed (409): Conflict");
    }
}
