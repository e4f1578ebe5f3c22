//! JWT token generation and validation
//!
//! Implements signed-token authentication with HMAC-SHA256. Tokens must carry
//! an `exp` claim; other claims are optional so externally minted tokens are
//! accepted as long as the signature checks out.

use injury_core::AuthConfig;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use uuid::Uuid;

/// JWT Claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - who the token was issued to
    #[serde(default)]
    pub sub: String,
    /// Expiration timestamp (Unix epoch)
    pub exp: u64,
    /// Issued at timestamp (Unix epoch)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<u64>,
    /// JWT ID - unique token identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
}

/// JWT token generation and validation errors
#[derive(Debug, Error)]
pub enum JwtError {
    #[error("Failed to encode JWT: {0}")]
    EncodingError(#[from] jsonwebtoken::errors::Error),

    #[error("Invalid token format")]
    InvalidToken,

    #[error("Token has expired")]
    ExpiredToken,

    #[error("Invalid token signature")]
    InvalidSignature,

    #[error("System time error: {0}")]
    SystemTimeError(#[from] std::time::SystemTimeError),
}

/// JWT Configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Secret key for HMAC signing
    pub secret: String,
    /// Access token expiration time in seconds (default: 1800 = 30 minutes)
    pub access_expiration_secs: u64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self::from_auth_config(&AuthConfig::default())
    }
}

impl JwtConfig {
    pub fn from_auth_config(config: &AuthConfig) -> Self {
        Self {
            secret: config.jwt_secret.clone(),
            access_expiration_secs: config.jwt_expiration_minutes.saturating_mul(60),
        }
    }
}

/// Generate a signed access token for `subject`
///
/// # Example
///
/// ```no_run
/// use injury_api::auth::jwt::{generate_access_token, JwtConfig};
///
/// let config = JwtConfig::default();
/// let token = generate_access_token(&config, "dashboard").expect("Failed to generate token");
/// println!("api-token: Bearer {token}");
/// ```
pub fn generate_access_token(config: &JwtConfig, subject: &str) -> Result<String, JwtError> {
    let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();

    let claims = Claims {
        sub: subject.to_string(),
        exp: now.saturating_add(config.access_expiration_secs),
        iat: Some(now),
        jti: Some(Uuid::new_v4().to_string()),
    };

    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )?;

    Ok(token)
}

/// Validate a signed token and extract its claims
pub fn validate_access_token(config: &JwtConfig, token: &str) -> Result<Claims, JwtError> {
    let validation = Validation::new(Algorithm::HS256);

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
        jsonwebtoken::errors::ErrorKind::InvalidSignature => JwtError::InvalidSignature,
        _ => JwtError::InvalidToken,
    })?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode_claims(config: &JwtConfig, claims: &Claims) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .unwrap()
    }

    fn now() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs()
    }

    #[test]
    fn test_generate_and_validate_token() {
        let config = JwtConfig::default();
        let token = generate_access_token(&config, "analyst").expect("Failed to generate token");

        let claims = validate_access_token(&config, &token).expect("Failed to validate token");
        assert_eq!(claims.sub, "analyst");
        assert!(claims.jti.is_some());
        assert_eq!(claims.exp - claims.iat.unwrap(), 30 * 60);
    }

    #[test]
    fn test_huge_expiration_saturates() {
        let auth = AuthConfig {
            jwt_expiration_minutes: u64::MAX,
            ..Default::default()
        };
        let config = JwtConfig::from_auth_config(&auth);
        assert_eq!(config.access_expiration_secs, u64::MAX);

        let token = generate_access_token(&config, "analyst").unwrap();
        let claims = validate_access_token(&config, &token).unwrap();
        assert_eq!(claims.exp, u64::MAX);
    }

    #[test]
    fn test_invalid_token() {
        let config = JwtConfig::default();
        let result = validate_access_token(&config, "invalid.token.here");
        assert!(matches!(result, Err(JwtError::InvalidToken)));
    }

    #[test]
    fn test_wrong_secret() {
        let config1 = JwtConfig {
            secret: "secret1".to_string(),
            ..Default::default()
        };
        let config2 = JwtConfig {
            secret: "secret2".to_string(),
            ..Default::default()
        };

        let token = generate_access_token(&config1, "analyst").unwrap();
        let result = validate_access_token(&config2, &token);
        assert!(matches!(result, Err(JwtError::InvalidSignature)));
    }

    #[test]
    fn test_expired_token() {
        let config = JwtConfig::default();
        let claims = Claims {
            sub: "analyst".to_string(),
            exp: now() - 3600,
            iat: Some(now() - 7200),
            jti: None,
        };

        let token = encode_claims(&config, &claims);
        let result = validate_access_token(&config, &token);
        assert!(matches!(result, Err(JwtError::ExpiredToken)));
    }

    #[test]
    fn test_minimal_claims_accepted() {
        let config = JwtConfig::default();
        let token = encode(
            &Header::new(Algorithm::HS256),
            &serde_json::json!({ "exp": now() + 600 }),
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .unwrap();

        let claims = validate_access_token(&config, &token).unwrap();
        assert!(claims.sub.is_empty());
        assert!(claims.jti.is_none());
    }

    #[test]
    fn test_token_without_exp_rejected() {
        let config = JwtConfig::default();
        let token = encode(
            &Header::new(Algorithm::HS256),
            &serde_json::json!({ "sub": "analyst" }),
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .unwrap();

        assert!(validate_access_token(&config, &token).is_err());
    }
}
