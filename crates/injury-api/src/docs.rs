//! OpenAPI documentation
//!
//! Author: hephaex@gmail.com

use crate::auth::API_TOKEN_HEADER;
use crate::error::ApiError;
use crate::handlers::{analysis, health};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Injury Insight API",
        description = "Analysis of OSHA accident and injury statistics backed by an LLM. \
                       Answers are written in Brazilian Portuguese."
    ),
    paths(
        health::health_check,
        analysis::injury_severity_handler,
        analysis::body_parts_handler,
    ),
    components(schemas(
        analysis::AnalysisRequest,
        analysis::AnalysisResponse,
        health::HealthResponse,
        ApiError,
    )),
    modifiers(&ApiTokenScheme),
    tags(
        (name = "analysis", description = "Injury statistics analysis"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;

/// Registers the `api-token` header scheme referenced by the analysis paths
struct ApiTokenScheme;

impl Modify for ApiTokenScheme {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "api_token",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new(API_TOKEN_HEADER))),
            );
        }
    }
}
