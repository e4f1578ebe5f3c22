//! Request extractors whose rejections use the API error body
//!
//! Author: hephaex@gmail.com

use crate::error::AppError;
use axum::extract::{rejection::JsonRejection, FromRequest};

/// JSON body extractor that rejects with `AppError::BadRequest`
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(status = %rejection.status(), error = %rejection.body_text(), "Rejected request body");
        AppError::BadRequest(rejection.body_text())
    }
}
