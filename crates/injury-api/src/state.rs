//! Application state management
//!
//! Author: hephaex@gmail.com

use crate::auth::Authenticator;
use crate::middleware::{FixedWindowLimiter, RateLimiter};
use injury_analysis::{ChatCompletionClient, InjuryAnalyzer};
use injury_core::config::AppConfig;
use injury_core::{CompletionClient, Result};
use std::sync::Arc;
use std::time::Instant;

/// Application state shared across handlers
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,
    /// Server start time
    pub start_time: Instant,
    /// Credential validation
    pub authenticator: Authenticator,
    /// Per-client request counters
    pub rate_limiter: Arc<dyn RateLimiter>,
    /// Dataset aggregation and completion pipeline
    pub analyzer: InjuryAnalyzer,
}

impl AppState {
    /// Create application state backed by the configured LLM provider
    pub fn new(config: AppConfig) -> Result<Self> {
        let completion = ChatCompletionClient::from_config(&config.llm)?;
        Ok(Self::with_completion_client(config, Arc::new(completion)))
    }

    /// Create application state with an explicit completion client
    pub fn with_completion_client(
        config: AppConfig,
        completion: Arc<dyn CompletionClient>,
    ) -> Self {
        let rate_limiter = Arc::new(FixedWindowLimiter::from_config(&config.rate_limit));
        Self::with_parts(config, completion, rate_limiter)
    }

    /// Create application state from fully injected collaborators
    pub fn with_parts(
        config: AppConfig,
        completion: Arc<dyn CompletionClient>,
        rate_limiter: Arc<dyn RateLimiter>,
    ) -> Self {
        Self {
            authenticator: Authenticator::from_config(&config.auth),
            analyzer: InjuryAnalyzer::new(config.dataset.clone(), completion),
            rate_limiter,
            start_time: Instant::now(),
            config,
        }
    }

    /// Get uptime in seconds
    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
