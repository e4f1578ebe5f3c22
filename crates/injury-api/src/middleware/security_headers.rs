//! Security response headers
//!
//! Every response leaving the router carries the same three headers, whether
//! it came from a handler or from the auth, rate-limit or error paths:
//! `X-Content-Type-Options: nosniff`, `X-Frame-Options: DENY` and
//! `X-XSS-Protection: 1; mode=block`.
//!
//! Author: hephaex@gmail.com

use axum::{
    body::Body,
    extract::Request,
    http::{header, HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};

const SECURITY_HEADERS: [(HeaderName, &str); 3] = [
    (header::X_CONTENT_TYPE_OPTIONS, "nosniff"),
    (header::X_FRAME_OPTIONS, "DENY"),
    (header::X_XSS_PROTECTION, "1; mode=block"),
];

/// Overwrite the security headers on the outgoing response
pub async fn security_headers_middleware(request: Request<Body>, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    for (name, value) in SECURITY_HEADERS {
        headers.insert(name, HeaderValue::from_static(value));
    }

    response
}
