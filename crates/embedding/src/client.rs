use async_trait::async_trait;
use reqwest::Client;
use semsearch_common::{Result, SemSearchError};
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::embedder::TextEmbedder;
use crate::types::{EmbedRequest, EmbedResponse};

/// Text used once to discover the model's output dimension
const DIMENSION_PROBE_TEXT: &str = "dimension probe";

/// Ollama embeddings API client
///
/// Bound to a single model for its lifetime; an index built with this
/// client is only compatible with the same model.
#[derive(Debug)]
pub struct OllamaClient {
    base_url: String,
    model: String,
    client: Client,
    dimension: OnceCell<usize>,
}

impl OllamaClient {
    /// Create new Ollama client
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into();
        let model = model.into();
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .map_err(|e| SemSearchError::network(format!("Failed to create HTTP client: {}", e)))?;

        info!("Ollama client initialized: {} (model: {})", base_url, model);
        Ok(Self {
            base_url,
            model,
            client,
            dimension: OnceCell::new(),
        })
    }

    /// Test connection to Ollama
    pub async fn test_connection(&self) -> Result<bool> {
        let url = format!("{}/api/tags", self.base_url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| SemSearchError::network(format!("Failed to connect to Ollama: {}", e)))?;
        Ok(response.status().is_success())
    }

    /// Generate embedding with bounded retries for transient failures
    async fn embed_with_retry(&self, text: &str, max_retries: u32) -> Result<Vec<f32>> {
        let url = format!("{}/api/embeddings", self.base_url);

        debug!(
            "Generating embedding - Model: {}, Text length: {}",
            self.model,
            text.len()
        );

        let request = EmbedRequest {
            model: self.model.clone(),
            prompt: text.to_string(),
        };

        let mut last_error = None;

        for attempt in 1..=max_retries {
            match self.try_embed(&url, &request).await {
                Ok(embedding) => {
                    debug!("Received embedding - Dimension: {}", embedding.len());
                    return Ok(embedding);
                }
                Err(e) => {
                    // Only transient network failures are worth retrying
                    let transient = matches!(e, SemSearchError::Network(_));
                    last_error = Some(e);
                    if transient && attempt < max_retries {
                        let delay = std::time::Duration::from_secs(2u64.pow(attempt - 1));
                        tracing::warn!(
                            "Embedding request failed (attempt {}/{}). Retrying in {:?}...",
                            attempt,
                            max_retries,
                            delay
                        );
                        tokio::time::sleep(delay).await;
                    } else {
                        break;
                    }
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| SemSearchError::embedding("All embedding attempts failed")))
    }

    /// Single attempt to generate embedding
    async fn try_embed(&self, url: &str, request: &EmbedRequest) -> Result<Vec<f32>> {
        let response = self
            .client
            .post(url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                SemSearchError::network(format!("Failed to send embedding request: {}", e))
            })?
            .error_for_status()
            .map_err(|e| SemSearchError::embedding(format!("Ollama embedding API error: {}", e)))?;

        let result: EmbedResponse = response.json().await.map_err(|e| {
            SemSearchError::embedding(format!("Failed to parse embedding response: {}", e))
        })?;

        if result.embedding.is_empty() {
            return Err(SemSearchError::embedding("Empty embedding from Ollama"));
        }

        Ok(result.embedding)
    }
}

#[async_trait]
impl TextEmbedder for OllamaClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        if text.trim().is_empty() {
            return Err(SemSearchError::invalid_input(
                "Cannot embed empty or whitespace-only text",
            ));
        }

        self.embed_with_retry(text, 3).await
    }

    async fn dimension(&self) -> Result<usize> {
        // Probe the model once and cache the answer for the process lifetime
        self.dimension
            .get_or_try_init(|| async {
                let probe = self.embed_with_retry(DIMENSION_PROBE_TEXT, 3).await?;
                info!(
                    "Embedding model {} reports dimension {}",
                    self.model,
                    probe.len()
                );
                Ok(probe.len())
            })
            .await
            .copied()
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_text_is_rejected_without_network() {
        // Unroutable base URL: if validation failed to short-circuit, the
        // request would error as Network, not InvalidInput
        let client = OllamaClient::new("http://127.0.0.1:1", "nomic-embed-text").unwrap();

        let err = client.embed("   \t\n").await.unwrap_err();
        assert!(matches!(err, SemSearchError::InvalidInput(_)));
    }

    #[test]
    fn test_model_id() {
        let client = OllamaClient::new("http://localhost:11434", "nomic-embed-text").unwrap();
        assert_eq!(client.model_id(), "nomic-embed-text");
    }
}
