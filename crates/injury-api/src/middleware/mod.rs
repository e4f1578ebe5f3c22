//! HTTP edge middleware
//!
//! Author: hephaex@gmail.com

pub mod rate_limit;
pub mod security_headers;

pub use rate_limit::{
    client_address, rate_limit_middleware, FixedWindowLimiter, RateDecision, RateLimitKey, RateLimiter,
};
pub use security_headers::security_headers_middleware;

use axum::http::HeaderValue;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

/// CORS policy for the configured origins.
///
/// Methods and headers are mirrored from the preflight request, since a
/// wildcard cannot be combined with credentials. A `*` origin is dropped for
/// the same reason.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter(|origin| {
            let wildcard = origin.trim() == "*";
            if wildcard {
                tracing::warn!("Ignoring wildcard CORS origin; list explicit origins instead");
            }
            !wildcard
        })
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}
