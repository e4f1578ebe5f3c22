//! Injury Insight Core - Domain types, traits, and shared configuration
//!
//! This crate defines the abstractions shared by the rest of the workspace:
//! - Analysis topics and the columns they aggregate
//! - Frequency tables produced from the injury dataset
//! - The `CompletionClient` capability used to reach the LLM provider
//! - Common error types
//! - Configuration management

pub mod config;

pub use config::{
    AppConfig, AuthConfig, ConfigError, DatasetConfig, LlmConfig, LoggingConfig, RateLimitConfig,
    ServerConfig,
};

use async_trait::async_trait;
use serde::ser::{Serialize, SerializeMap, Serializer};
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Core error type for analysis operations
#[derive(Error, Debug)]
pub enum InjuryError {
    #[error("Dataset unavailable: {0}")]
    DatasetUnavailable(String),

    #[error("Dataset processing error: {0}")]
    DatasetProcessing(String),

    #[error("Completion failed: {0}")]
    Completion(#[from] CompletionError),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, InjuryError>;

/// Errors raised while talking to the completion provider
#[derive(Error, Debug)]
pub enum CompletionError {
    #[error("Completion provider credential is not configured")]
    MissingCredential,

    #[error("Request failed: {0}")]
    Request(String),

    #[error("Provider returned {status}: {body}")]
    Provider { status: u16, body: String },

    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),

    #[error("Provider returned no choices")]
    EmptyResponse,
}

// ============================================================================
// Completion capability
// ============================================================================

/// Single-turn text completion against an external LLM.
///
/// Implementations make exactly one call per invocation; there is no retry.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Send `prompt` as a single user message and return the generated text
    async fn complete(&self, prompt: &str) -> std::result::Result<String, CompletionError>;
}

// ============================================================================
// Topics
// ============================================================================

/// The canned questions the service can answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    /// Distribution of injury severity (`Degree of Injury`)
    InjurySeverity,
    /// Distribution of affected body parts (`Part of Body`)
    BodyPart,
}

impl Topic {
    /// Dataset column aggregated for this topic
    pub fn column<'a>(&self, dataset: &'a DatasetConfig) -> &'a str {
        match self {
            Self::InjurySeverity => &dataset.severity_column,
            Self::BodyPart => &dataset.body_part_column,
        }
    }

    /// Subject of the summary requested from the model
    pub fn subject(&self) -> &'static str {
        match self {
            Self::InjurySeverity => "os graus de ferimento mais comuns",
            Self::BodyPart => "as partes do corpo mais afetadas",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InjurySeverity => "severity",
            Self::BodyPart => "body-part",
        }
    }
}

impl std::fmt::Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Topic {
    type Err = InjuryError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "severity" | "degree" | "grau-ferimento" => Ok(Self::InjurySeverity),
            "body-part" | "body" | "partes-corpo-afetadas" => Ok(Self::BodyPart),
            other => Err(InjuryError::Config(format!("Unknown topic: {other}"))),
        }
    }
}

// ============================================================================
// Frequency Table
// ============================================================================

/// Category counts for one dataset column, most frequent first.
///
/// Serializes as a JSON object whose key order follows the table order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    entries: Vec<(String, u64)>,
}

impl FrequencyTable {
    /// Build a table from raw counts, sorting by descending count.
    ///
    /// The sort is stable, so ties keep the order they were supplied in.
    pub fn from_counts(counts: impl IntoIterator<Item = (String, u64)>) -> Self {
        let mut entries: Vec<_> = counts.into_iter().collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        Self { entries }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn get(&self, category: &str) -> Option<u64> {
        self.entries
            .iter()
            .find(|(k, _)| k == category)
            .map(|(_, v)| *v)
    }

    /// Sum of all counts
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, v)| v).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Literal textual form embedded in prompts
    pub fn to_text(&self) -> String {
        // Serializing string keys and integers cannot fail
        serde_json::to_string(self).unwrap_or_default()
    }
}

impl Serialize for FrequencyTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (category, count) in &self.entries {
            map.serialize_entry(category, count)?;
        }
        map.end()
    }
}

// ============================================================================
// Tests
// ============================================================================
