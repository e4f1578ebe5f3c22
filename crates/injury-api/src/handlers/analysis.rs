//! Injury analysis handlers
//!
//! Both endpoints run the same pipeline over a different dataset column.
//!
//! Author: hephaex@gmail.com

use crate::error::AppError;
use crate::extract::ApiJson;
use crate::state::AppState;
use axum::{extract::State, Json};
use injury_core::{FrequencyTable, Topic};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

/// Analysis request body
#[derive(Debug, Deserialize, ToSchema)]
pub struct AnalysisRequest {
    /// Question to answer from the injury statistics
    #[serde(alias = "pergunta")]
    #[schema(example = "Quais são os graus de ferimento mais frequentes?")]
    pub question: String,
}

/// Analysis response body
#[derive(Debug, Serialize, ToSchema)]
pub struct AnalysisResponse {
    /// Generated analysis
    #[schema(example = "A maioria dos acidentes registrados não foi fatal...")]
    pub result: String,

    /// Category counts the analysis was based on, most frequent first
    #[schema(value_type = Object)]
    pub data: FrequencyTable,
}

/// Analyse the distribution of injury severity
#[utoipa::path(
    post,
    path = "/busca/grau-ferimento",
    tag = "analysis",
    request_body = AnalysisRequest,
    responses(
        (status = 200, description = "Analysis generated", body = AnalysisResponse),
        (status = 400, description = "Blank question or malformed body", body = crate::error::ApiError),
        (status = 401, description = "Invalid credential", body = crate::error::ApiError),
        (status = 429, description = "Too many requests", body = crate::error::ApiError),
        (status = 500, description = "Dataset or completion failure", body = crate::error::ApiError)
    ),
    security(("api_token" = []))
)]
pub async fn injury_severity_handler(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<AnalysisRequest>,
) -> Result<Json<AnalysisResponse>, AppError> {
    run_analysis(&state, Topic::InjurySeverity, req).await
}

/// Analyse which parts of the body are most affected
#[utoipa::path(
    post,
    path = "/busca/partes-corpo-afetadas",
    tag = "analysis",
    request_body = AnalysisRequest,
    responses(
        (status = 200, description = "Analysis generated", body = AnalysisResponse),
        (status = 400, description = "Blank question or malformed body", body = crate::error::ApiError),
        (status = 401, description = "Invalid credential", body = crate::error::ApiError),
        (status = 429, description = "Too many requests", body = crate::error::ApiError),
        (status = 500, description = "Dataset or completion failure", body = crate::error::ApiError)
    ),
    security(("api_token" = []))
)]
pub async fn body_parts_handler(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<AnalysisRequest>,
) -> Result<Json<AnalysisResponse>, AppError> {
    run_analysis(&state, Topic::BodyPart, req).await
}

async fn run_analysis(
    state: &AppState,
    topic: Topic,
    req: AnalysisRequest,
) -> Result<Json<AnalysisResponse>, AppError> {
    if req.question.trim().is_empty() {
        return Err(AppError::BadRequest("Question cannot be empty".to_string()));
    }

    tracing::info!(%topic, question = %req.question, "Analysis requested");

    let analysis = state.analyzer.analyze(topic, &req.question).await?;

    Ok(Json(AnalysisResponse {
        result: analysis.result,
        data: analysis.data,
    }))
}
