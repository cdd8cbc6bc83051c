//! HTTP status mapping for `TranslatorError` (§6). The only place in the
//! workspace that knows `TranslatorError` corresponds to an HTTP status —
//! `translator_core` stays transport-agnostic.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use translator_core::TranslatorError;

pub struct ApiError(pub TranslatorError);

impl From<TranslatorError> for ApiError {
    fn from(err: TranslatorError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, retry_after) = match &self.0 {
            TranslatorError::InputInvalid(_) => (StatusCode::BAD_REQUEST, None),
            TranslatorError::AuthFailed => (StatusCode::UNAUTHORIZED, None),
            TranslatorError::RateLimited { retry_after_secs } => {
                (StatusCode::TOO_MANY_REQUESTS, Some(*retry_after_secs))
            }
            // These three recover to the fallback builder inside the
            // orchestrator; reaching here means something upstream of the
            // orchestrator failed outright.
            TranslatorError::AiUnavailable
            | TranslatorError::AiCallFailed(_)
            | TranslatorError::LlmResponseMalformed(_) => (StatusCode::OK, None),
            TranslatorError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, None),
        };

        let body = Json(json!({ "success": false, "error": self.0.to_string() }));
        let mut response = (status, body).into_response();
        if let Some(secs) = retry_after {
            response
                .headers_mut()
                .insert("Retry-After", secs.to_string().parse().unwrap());
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limited_maps_to_429_with_retry_after() {
        let response = ApiError(TranslatorError::RateLimited { retry_after_secs: 30 }).into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers().get("Retry-After").unwrap(), "30");
    }

    #[test]
    fn input_invalid_maps_to_400() {
        let response = ApiError(TranslatorError::InputInvalid("too short".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn ai_unavailable_maps_to_200() {
        let response = ApiError(TranslatorError::AiUnavailable).into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
