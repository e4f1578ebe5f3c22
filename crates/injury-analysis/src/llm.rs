//! Completion client implementation
//!
//! Talks to any OpenAI-compatible chat completion endpoint. The default
//! configuration targets Groq.
//!
//! Author: hephaex@gmail.com

use async_trait::async_trait;
use injury_core::{CompletionClient, CompletionError, InjuryError, LlmConfig};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// OpenAI-compatible chat completion client
pub struct ChatCompletionClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

impl ChatCompletionClient {
    /// Create a new client
    pub fn new(
        api_key: Option<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: base_url.into(),
            model: model.into(),
        }
    }

    /// Create from config.
    ///
    /// A missing API key is not an error here; it surfaces on the first completion.
    pub fn from_config(config: &LlmConfig) -> Result<Self, InjuryError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| InjuryError::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl CompletionClient for ChatCompletionClient {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        let api_key = self
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(CompletionError::MissingCredential)?;

        let request = ChatRequest {
            model: &self.model,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| CompletionError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CompletionError::Provider {
                status: status.as_u16(),
                body,
            });
        }

        let result: ChatResponse = response
            .json()
            .await
            .map_err(|e| CompletionError::MalformedResponse(e.to_string()))?;

        let choice = result
            .choices
            .into_iter()
            .next()
            .ok_or(CompletionError::EmptyResponse)?;

        let content = choice.message.content.ok_or_else(|| {
            CompletionError::MalformedResponse("message has no content".to_string())
        })?;

        tracing::info!(model = %self.model, chars = content.len(), "Completion received");
        Ok(content)
    }
}
