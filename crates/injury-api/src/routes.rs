//! API route definitions
//!
//! Author: hephaex@gmail.com

use crate::auth::auth_middleware;
use crate::handlers::analysis;
use crate::middleware::rate_limit_middleware;
use crate::state::AppState;
use axum::{middleware, routing::post, Router};
use std::sync::Arc;

/// Analysis routes.
///
/// Layers run outermost first: authentication, then rate limiting, so
/// rejected credentials never consume a client's quota.
pub fn analysis_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/busca/grau-ferimento",
            post(analysis::injury_severity_handler),
        )
        .route(
            "/busca/partes-corpo-afetadas",
            post(analysis::body_parts_handler),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}
