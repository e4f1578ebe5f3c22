//! Injury Insight API - HTTP server
//!
//! Provides two analysis endpoints over the OSHA injury dataset, plus health
//! and OpenAPI documentation routes.

pub mod audit;
pub mod auth;
pub mod docs;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

use axum::{middleware as axum_middleware, routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::docs::ApiDoc;
use crate::middleware::{cors_layer, security_headers_middleware};
use crate::state::AppState;

/// Build the application router.
///
/// Security headers wrap CORS so both apply to every response, including
/// rejections from the auth and rate-limit layers.
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config.server.cors_origins);

    Router::new()
        .route("/health", get(handlers::health::health_check))
        .merge(routes::analysis_routes(state.clone()))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(axum_middleware::from_fn(security_headers_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
