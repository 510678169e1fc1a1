use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::advice::profile::ProfileError;
use crate::advice::AdviceError;

/// Message shown for every failed advice request, whatever the cause.
pub const REQUEST_FAILED_MESSAGE: &str = "Please check your API key and try again.";

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Missing API credential")]
    MissingCredential,

    #[error("Advice request failed: {0}")]
    RequestFailed(String),
}

impl From<ProfileError> for AppError {
    fn from(e: ProfileError) -> Self {
        AppError::Validation(e.to_string())
    }
}

impl From<AdviceError> for AppError {
    fn from(e: AdviceError) -> Self {
        if e.is_request_failed() {
            AppError::RequestFailed(e.to_string())
        } else {
            AppError::MissingCredential
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::MissingCredential => (
                StatusCode::BAD_REQUEST,
                "MISSING_CREDENTIAL",
                "An API key is required".to_string(),
            ),
            AppError::RequestFailed(cause) => {
                tracing::warn!("Advice request failed: {cause}");
                (
                    StatusCode::BAD_GATEWAY,
                    "REQUEST_FAILED",
                    REQUEST_FAILED_MESSAGE.to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advice::schema::SchemaError;
    use crate::llm_client::LlmError;

    #[test]
    fn test_missing_credential_maps_to_its_own_code() {
        let err: AppError = AdviceError::MissingCredential.into();
        assert!(matches!(err, AppError::MissingCredential));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_model_and_schema_failures_collapse_to_request_failed() {
        let causes = [
            AdviceError::Model(LlmError::EmptyContent),
            AdviceError::Schema(SchemaError::NotAnObject),
            AdviceError::Schema(SchemaError::MissingKey("recommendations")),
        ];
        for cause in causes {
            let err: AppError = cause.into();
            assert!(matches!(err, AppError::RequestFailed(_)));
            assert_eq!(err.into_response().status(), StatusCode::BAD_GATEWAY);
        }
    }

    #[test]
    fn test_profile_error_is_validation() {
        let err: AppError = ProfileError::AgeOutOfRange(12).into();
        match err {
            AppError::Validation(msg) => assert!(msg.contains("12")),
            other => panic!("expected Validation, got {other:?}"),
        }
    }
}
