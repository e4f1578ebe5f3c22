//! API error handling
//!
//! Internal failure detail is logged where it happens and never copied into
//! a response body.
//!
//! Author: hephaex@gmail.com

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use injury_core::InjuryError;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// API error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    /// Error code
    #[schema(example = "UNAUTHORIZED")]
    pub code: String,
    /// Human-readable message
    #[schema(example = "Invalid token")]
    pub message: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new("BAD_REQUEST", message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new("UNAUTHORIZED", message)
    }

    pub fn too_many_requests() -> Self {
        Self::new("RATE_LIMITED", "Too Many Requests")
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new("INTERNAL_ERROR", message)
    }
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    Unauthorized(String),
    RateLimited { retry_after_secs: u64 },
    DatasetUnavailable,
    DatasetProcessing,
    Completion,
    Internal,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, ApiError::bad_request(msg)),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, ApiError::unauthorized(msg)),
            AppError::RateLimited { retry_after_secs } => {
                let mut response =
                    (StatusCode::TOO_MANY_REQUESTS, Json(ApiError::too_many_requests()))
                        .into_response();
                response
                    .headers_mut()
                    .insert(header::RETRY_AFTER, HeaderValue::from(retry_after_secs));
                return response;
            }
            AppError::DatasetUnavailable => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("DATASET_UNAVAILABLE", "Dataset not loaded"),
            ),
            AppError::DatasetProcessing => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("DATASET_ERROR", "Dataset processing error"),
            ),
            AppError::Completion => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::internal_error("Failed to process request"),
            ),
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::internal_error("Internal server error"),
            ),
        };

        (status, Json(error)).into_response()
    }
}

impl From<InjuryError> for AppError {
    fn from(err: InjuryError) -> Self {
        match err {
            InjuryError::DatasetUnavailable(_) => AppError::DatasetUnavailable,
            InjuryError::DatasetProcessing(_) => AppError::DatasetProcessing,
            InjuryError::Completion(_) => AppError::Completion,
            other => {
                tracing::error!(error = %other, "Unexpected analysis error");
                AppError::Internal
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use injury_core::CompletionError;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_rate_limited_response() {
        let response = AppError::RateLimited {
            retry_after_secs: 42,
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()[header::RETRY_AFTER], "42");

        let json = body_json(response).await;
        assert_eq!(json["code"], "RATE_LIMITED");
        assert_eq!(json["message"], "Too Many Requests");
    }

    #[tokio::test]
    async fn test_completion_error_is_not_leaked() {
        let err = InjuryError::Completion(CompletionError::Provider {
            status: 401,
            body: "invalid api key gsk_secret".to_string(),
        });
        let response = AppError::from(err).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["message"], "Failed to process request");
        assert!(!json.to_string().contains("gsk_secret"));
    }

    #[test]
    fn test_dataset_errors_map_to_distinct_variants() {
        assert!(matches!(
            AppError::from(InjuryError::DatasetUnavailable("io".into())),
            AppError::DatasetUnavailable
        ));
        assert!(matches!(
            AppError::from(InjuryError::DatasetProcessing("column".into())),
            AppError::DatasetProcessing
        ));
    }
}
