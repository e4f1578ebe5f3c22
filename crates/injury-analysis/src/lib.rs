//! Injury analysis pipeline
//!
//! Loads the injury dataset, aggregates the column for the requested topic,
//! composes a prompt around the user's question and delegates the narrative
//! to a `CompletionClient`.
//!
//! Author: hephaex@gmail.com

pub mod llm;
pub mod prompt;

pub use llm::ChatCompletionClient;
pub use prompt::compose_prompt;

use injury_core::{CompletionClient, DatasetConfig, FrequencyTable, InjuryError, Result, Topic};
use injury_dataset::Dataset;
use serde::Serialize;
use std::sync::Arc;

/// Outcome of one analysis request
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    /// LLM-generated narrative
    pub result: String,
    /// Frequency table the narrative was grounded on
    pub data: FrequencyTable,
}

/// Orchestrates dataset aggregation and completion for a topic
pub struct InjuryAnalyzer {
    dataset: DatasetConfig,
    completion: Arc<dyn CompletionClient>,
}

impl InjuryAnalyzer {
    pub fn new(dataset: DatasetConfig, completion: Arc<dyn CompletionClient>) -> Self {
        Self {
            dataset,
            completion,
        }
    }

    /// Load the dataset from disk
    ///
    /// Parsing runs on the blocking pool. Every failure is logged and reported
    /// as `DatasetUnavailable`.
    pub async fn load_dataset(&self) -> Result<Dataset> {
        let path = self.dataset.path.clone();
        let loaded = tokio::task::spawn_blocking(move || Dataset::load(&path))
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Dataset loading task failed");
                InjuryError::DatasetUnavailable(e.to_string())
            })?;

        loaded.map_err(|e| {
            tracing::error!(
                path = %self.dataset.path.display(),
                error = %e,
                "Failed to load injury dataset"
            );
            InjuryError::DatasetUnavailable(e.to_string())
        })
    }

    /// Frequency table for the topic's column, read fresh from disk
    pub async fn frequencies(&self, topic: Topic) -> Result<FrequencyTable> {
        let dataset = self.load_dataset().await?;
        let column = topic.column(&self.dataset);

        dataset.value_counts(column).map_err(|e| {
            tracing::error!(%topic, column, error = %e, "Failed to aggregate dataset column");
            InjuryError::DatasetProcessing(e.to_string())
        })
    }

    /// Answer `question` about `topic`
    pub async fn analyze(&self, topic: Topic, question: &str) -> Result<Analysis> {
        let data = self.frequencies(topic).await?;

        let prompt = compose_prompt(&data, question, topic);
        tracing::debug!(%topic, prompt_chars = prompt.len(), "Calling completion client");

        let result = self.completion.complete(&prompt).await.map_err(|e| {
            tracing::error!(%topic, error = %e, "Completion request failed");
            InjuryError::Completion(e)
        })?;

        tracing::info!(%topic, categories = data.len(), "Analysis completed");
        Ok(Analysis { result, data })
    }
}
