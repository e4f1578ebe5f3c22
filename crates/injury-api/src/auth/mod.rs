//! Authentication module
//!
//! Requests carry a single credential header. A `Bearer ` prefix marks a
//! signed token (HS256 JWT); anything else is compared against the static
//! API token.

pub mod jwt;
pub mod middleware;

pub use jwt::{generate_access_token, validate_access_token, Claims, JwtConfig, JwtError};
pub use middleware::{auth_middleware, AuthError, API_TOKEN_HEADER, API_TOKEN_HEADER_ALT};

use injury_core::AuthConfig;

/// A credential as presented by the client, classified by prefix
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credential {
    /// Static shared secret
    Plain(String),
    /// Signed token with the `Bearer ` prefix removed
    Signed(String),
}

impl Credential {
    pub fn parse(raw: &str) -> Self {
        match raw.strip_prefix("Bearer ") {
            Some(token) => Self::Signed(token.to_string()),
            None => Self::Plain(raw.to_string()),
        }
    }
}

/// Identity established by a successful authentication
#[derive(Debug, Clone)]
pub enum Principal {
    /// Caller presented the shared API token
    ApiToken,
    /// Caller presented a valid signed token
    Token(Claims),
}

impl Principal {
    /// Short label for logs
    pub fn label(&self) -> &str {
        match self {
            Self::ApiToken => "api_token",
            Self::Token(claims) => &claims.sub,
        }
    }
}

/// Validates credentials with the strategy matching their kind
#[derive(Debug, Clone)]
pub struct Authenticator {
    api_token: Option<String>,
    jwt: JwtConfig,
}

impl Authenticator {
    pub fn new(api_token: Option<String>, jwt: JwtConfig) -> Self {
        Self { api_token, jwt }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(config.api_token.clone(), JwtConfig::from_auth_config(config))
    }

    pub fn jwt_config(&self) -> &JwtConfig {
        &self.jwt
    }

    pub fn authenticate(&self, credential: &Credential) -> Result<Principal, AuthError> {
        match credential {
            Credential::Signed(token) => validate_access_token(&self.jwt, token)
                .map(Principal::Token)
                .map_err(AuthError::InvalidToken),
            Credential::Plain(token) => match &self.api_token {
                Some(expected) if expected == token => Ok(Principal::ApiToken),
                _ => Err(AuthError::InvalidApiToken),
            },
        }
    }
}
