// src/api/parser.rs
//! Turns raw HTTP replies into payloads or typed transport faults.

use super::client::ApiResponse;
use super::types::ApiEnvelope;
use crate::constants::ERROR_BODY_PREVIEW_LENGTH;
use crate::error::{ApiErrorCode, AppError};
use serde_json::Value;

/// Unwraps a wall API reply into its `response` payload.
///
/// Non-success statuses and `error` envelopes both become
/// [`AppError::TransportFault`]; the wall API reports most failures with
/// HTTP 200 and an error body.
pub fn parse_api_response(method: &str, result: ApiResponse<String>) -> Result<Value, AppError> {
    if !result.status.is_success() {
        return Err(AppError::TransportFault {
            endpoint: method.to_string(),
            code: ApiErrorCode::from_http_status(result.status.as_u16()),
            message: format!("HTTP {}: {}", result.status, preview(&result.data)),
        });
    }

    let envelope: ApiEnvelope = serde_json::from_str(&result.data).map_err(|e| {
        log::error!("Failed to parse response from {}: {}", method, e);
        AppError::MalformedResponse(format!(
            "{} from {}: {}",
            e,
            method,
            preview(&result.data)
        ))
    })?;

    match envelope {
        ApiEnvelope {
            error: Some(error), ..
        } => {
            let code = ApiErrorCode::from_api_code(error.error_code);
            if code.is_rate_limited() {
                log::warn!("{} rejected for rate: {}", method, error.error_msg);
            }
            Err(AppError::TransportFault {
                endpoint: method.to_string(),
                code,
                message: error.error_msg,
            })
        }
        ApiEnvelope {
            response: Some(response),
            ..
        } => Ok(response),
        _ => Err(AppError::MalformedResponse(format!(
            "{} replied with neither 'response' nor 'error'",
            method
        ))),
    }
}

/// Decodes a payload into a typed shape, naming the method on failure.
pub fn parse_payload<T>(method: &str, payload: Value) -> Result<T, AppError>
where
    T: serde::de::DeserializeOwned,
{
    serde_json::from_value(payload)
        .map_err(|e| AppError::MalformedResponse(format!("{}: {}", method, e)))
}

/// Shortens a body for inclusion in error messages.
pub(crate) fn preview(body: &str) -> String {
    if body.chars().count() > ERROR_BODY_PREVIEW_LENGTH {
        let head: String = body.chars().take(ERROR_BODY_PREVIEW_LENGTH).collect();
        format!("{}...", head)
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    fn reply(status: StatusCode, body: &str) -> ApiResponse<String> {
        ApiResponse {
            data: body.to_string(),
            status,
            url: "https://api.vk.com/method/photos.get".to_string(),
        }
    }

    #[test]
    fn unwraps_response_payload() {
        let value = parse_api_response(
            "photos.get",
            reply(StatusCode::OK, r#"{"response": {"count": 0, "items": []}}"#),
        )
        .unwrap();
        assert_eq!(value["count"], 0);
    }

    #[test]
    fn error_envelope_becomes_transport_fault() {
        let err = parse_api_response(
            "photos.get",
            reply(
                StatusCode::OK,
                r#"{"error": {"error_code": 6, "error_msg": "Too many requests per second"}}"#,
            ),
        )
        .unwrap_err();

        match err {
            AppError::TransportFault { endpoint, code, .. } => {
                assert_eq!(endpoint, "photos.get");
                assert_eq!(code, ApiErrorCode::TooManyRequests);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn http_failure_becomes_transport_fault() {
        let err = parse_api_response("wall.get", reply(StatusCode::BAD_GATEWAY, "upstream"))
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::TransportFault {
                code: ApiErrorCode::HttpStatus(502),
                ..
            }
        ));
    }

    #[test]
    fn garbage_body_is_malformed() {
        let err = parse_api_response("wall.get", reply(StatusCode::OK, "<html>")).unwrap_err();
        assert!(matches!(err, AppError::MalformedResponse(_)));

        let err = parse_api_response("wall.get", reply(StatusCode::OK, "{}")).unwrap_err();
        assert!(matches!(err, AppError::MalformedResponse(_)));
    }

    #[test]
    fn preview_truncates_long_bodies() {
        let body = "x".repeat(ERROR_BODY_PREVIEW_LENGTH + 50);
        assert_eq!(preview(&body).len(), ERROR_BODY_PREVIEW_LENGTH + 3);
    }
}
