//! Injury Insight Configuration Management
//!
//! Configuration is resolved in three layers: built-in defaults, an optional
//! TOML file named by `INJURY_CONFIG`, then environment variables.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Placeholder signing secret used when `SECRET_KEY` is not set
pub const PLACEHOLDER_JWT_SECRET: &str = "minha_chave_secreta";

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Server configuration
    pub server: ServerConfig,

    /// Credential validation
    pub auth: AuthConfig,

    /// Injury dataset location and columns
    pub dataset: DatasetConfig,

    /// LLM provider configuration
    pub llm: LlmConfig,

    /// Per-client request limits
    pub rate_limit: RateLimitConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Resolve defaults, then the `INJURY_CONFIG` file if set, then the environment
    pub fn load() -> Result<Self, ConfigError> {
        let base = match std::env::var("INJURY_CONFIG") {
            Ok(path) => Self::from_file(path)?,
            Err(_) => Self::default(),
        };
        base.with_env_override()
    }

    /// Load configuration from environment variables over the defaults
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_env_override()
    }

    /// Load from a TOML file
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::FileReadError {
            path: path.clone(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path,
            message: e.to_string(),
        })
    }

    /// Apply environment variables on top of this configuration (env takes precedence)
    pub fn with_env_override(mut self) -> Result<Self, ConfigError> {
        // Server
        if let Ok(host) = std::env::var("API_HOST") {
            self.server.host = host;
        }
        if let Some(port) = parse_env("API_PORT")? {
            self.server.port = port;
        }
        if let Ok(origins) = std::env::var("CORS_ORIGINS") {
            self.server.cors_origins = origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        // Auth
        if let Ok(token) = std::env::var("API_TOKEN") {
            self.auth.api_token = Some(token);
        }
        if let Ok(secret) = std::env::var("SECRET_KEY") {
            self.auth.jwt_secret = secret;
        }
        if let Some(minutes) = parse_env("JWT_EXPIRATION_MINUTES")? {
            self.auth.jwt_expiration_minutes = minutes;
        }

        // Dataset
        if let Ok(path) = std::env::var("DATASET_PATH") {
            self.dataset.path = PathBuf::from(path);
        }

        // LLM
        if let Ok(key) = std::env::var("GROQ_API_KEY") {
            self.llm.api_key = Some(key);
        }
        if let Ok(url) = std::env::var("LLM_BASE_URL") {
            self.llm.base_url = url;
        }
        if let Ok(model) = std::env::var("LLM_MODEL") {
            self.llm.model = model;
        }
        if let Some(secs) = parse_env("LLM_TIMEOUT_SECS")? {
            self.llm.timeout_secs = secs;
        }

        // Rate limiting
        if let Some(requests) = parse_env("RATE_LIMIT_REQUESTS")? {
            self.rate_limit.requests_per_window = requests;
        }
        if let Some(secs) = parse_env("RATE_LIMIT_WINDOW_SECS")? {
            self.rate_limit.window_secs = secs;
        }
        if let Some(trust) = parse_env("TRUST_FORWARDED_HEADERS")? {
            self.rate_limit.trust_forwarded_headers = trust;
        }

        // Logging
        if let Ok(level) = std::env::var("LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("LOG_FORMAT") {
            self.logging.json_format = format.eq_ignore_ascii_case("json");
        }

        Ok(self)
    }
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Result<Option<T>, ConfigError> {
    match std::env::var(key) {
        Ok(value) => value
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue {
                key: key.to_string(),
                value,
            }),
        Err(_) => Ok(None),
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Allowed origins for CORS
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            cors_origins: vec!["https://example.com".to_string()],
        }
    }
}

/// Credential validation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Static shared-secret token; plain tokens never validate when unset
    pub api_token: Option<String>,

    /// HMAC secret for signed tokens
    pub jwt_secret: String,

    /// Lifetime of minted access tokens
    pub jwt_expiration_minutes: u64,
}

impl AuthConfig {
    /// Whether the signing secret is still the built-in placeholder
    pub fn uses_placeholder_secret(&self) -> bool {
        self.jwt_secret == PLACEHOLDER_JWT_SECRET
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            api_token: None,
            jwt_secret: PLACEHOLDER_JWT_SECRET.to_string(),
            jwt_expiration_minutes: 30,
        }
    }
}

/// Injury dataset configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// Path to the CSV (or XLSX) file
    pub path: PathBuf,

    /// Column holding the degree of injury
    pub severity_column: String,

    /// Column holding the affected part of body
    pub body_part_column: String,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(
                "osha-accident-and-injury-data-1517/OSHA HSE DATA_ALL ABSTRACTS 15-17_FINAL.csv",
            ),
            severity_column: "Degree of Injury".to_string(),
            body_part_column: "Part of Body".to_string(),
        }
    }
}

/// LLM provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider API key
    pub api_key: Option<String>,

    /// OpenAI-compatible API base URL
    pub base_url: String,

    /// Model name to use
    pub model: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.groq.com/openai/v1".to_string(),
            model: "deepseek-r1-distill-llama-70b".to_string(),
            timeout_secs: 60,
        }
    }
}

/// Per-client, per-endpoint request limits
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Requests allowed per window
    pub requests_per_window: u32,

    /// Window length in seconds
    pub window_secs: u64,

    /// Key clients on `X-Forwarded-For` / `X-Real-IP` instead of the socket
    /// peer. Only safe behind a proxy that overwrites those headers.
    pub trust_forwarded_headers: bool,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_window: 5,
            window_secs: 60,
            trust_forwarded_headers: false,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log filter directives (e.g. `info` or `injury_api=debug,tower_http=debug`)
    pub level: String,

    /// JSON format for logs
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "injury_api=debug,tower_http=debug".to_string(),
            json_format: false,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.rate_limit.requests_per_window, 5);
        assert_eq!(config.rate_limit.window_secs, 60);
        assert!(!config.rate_limit.trust_forwarded_headers);
        assert_eq!(config.llm.model, "deepseek-r1-distill-llama-70b");
        assert!(config.auth.uses_placeholder_secret());
        assert!(config.auth.api_token.is_none());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[dataset]\npath = \"/data/injuries.csv\"\n\n[rate_limit]\nrequests_per_window = 10"
        )
        .unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.dataset.path, PathBuf::from("/data/injuries.csv"));
        assert_eq!(config.dataset.severity_column, "Degree of Injury");
        assert_eq!(config.rate_limit.requests_per_window, 10);
        assert_eq!(config.rate_limit.window_secs, 60);
    }

    #[test]
    fn test_missing_file() {
        let result = AppConfig::from_file("/nonexistent/injury.toml");
        assert!(matches!(result, Err(ConfigError::FileReadError { .. })));
    }
}
