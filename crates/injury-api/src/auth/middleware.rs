/// Authentication middleware for protecting routes
///
/// Reads the `api-token` header (or `api_token`), validates it with the
/// shared `Authenticator` and adds the `Principal` to request extensions.
use super::{Credential, JwtError};
use crate::audit::{audit_log, AuditEvent};
use crate::error::AppError;
use crate::middleware::client_address;
use crate::state::AppState;
use axum::{
    body::Body,
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use thiserror::Error;

/// Credential header name
pub const API_TOKEN_HEADER: &str = "api-token";

/// Underscore spelling of the credential header, also accepted
pub const API_TOKEN_HEADER_ALT: &str = "api_token";

/// Authentication middleware errors
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing api-token header")]
    MissingCredential,

    #[error("Invalid api token")]
    InvalidApiToken,

    #[error("Invalid token: {0}")]
    InvalidToken(#[from] JwtError),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let message = match self {
            AuthError::MissingCredential => "Missing api-token header",
            AuthError::InvalidApiToken => "Invalid token",
            AuthError::InvalidToken(_) => "Invalid or expired token",
        };
        AppError::Unauthorized(message.to_string()).into_response()
    }
}

/// Authentication middleware that requires a valid credential
///
/// ```ignore
/// let app = Router::new()
///     .route("/busca/grau-ferimento", post(handler))
///     .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));
/// ```
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    let ip_address = Some(client_address(
        &request,
        state.config.rate_limit.trust_forwarded_headers,
    ));
    let path = request.uri().path().to_string();

    let raw = request
        .headers()
        .get(API_TOKEN_HEADER)
        .or_else(|| request.headers().get(API_TOKEN_HEADER_ALT))
        .and_then(|h| h.to_str().ok());

    let Some(raw) = raw else {
        audit_log(&AuditEvent::MissingCredential { ip_address, path });
        return Err(AuthError::MissingCredential);
    };

    let credential = Credential::parse(raw);
    let principal = match state.authenticator.authenticate(&credential) {
        Ok(p) => p,
        Err(e) => {
            let event = match &e {
                AuthError::InvalidToken(reason) => AuditEvent::InvalidToken {
                    ip_address,
                    path,
                    reason: reason.to_string(),
                },
                _ => AuditEvent::InvalidApiToken { ip_address, path },
            };
            audit_log(&event);
            return Err(e);
        }
    };

    tracing::debug!(principal = principal.label(), path = %path, "Request authenticated");
    request.extensions_mut().insert(principal);

    Ok(next.run(request).await)
}
