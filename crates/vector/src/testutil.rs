//! Deterministic embedder for tests: counts occurrences of a fixed
//! vocabulary, so related texts get related vectors without a model.

use async_trait::async_trait;
use semsearch_common::{Result, SemSearchError};
use semsearch_embedding::TextEmbedder;

const VOCAB: [&str; 8] = [
    "ai", "gpu", "computing", "cloud", "software", "xbox", "electric", "banking",
];

pub struct MockEmbedder {
    model: String,
}

impl MockEmbedder {
    pub fn with_model(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
        }
    }
}

impl Default for MockEmbedder {
    fn default() -> Self {
        Self::with_model("mock-embedder")
    }
}

#[async_trait]
impl TextEmbedder for MockEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        if text.trim().is_empty() {
            return Err(SemSearchError::invalid_input(
                "Cannot embed empty or whitespace-only text",
            ));
        }
        if text.contains("FAILME") {
            return Err(SemSearchError::embedding("Mock embedding failure"));
        }

        let lower = text.to_lowercase();
        Ok(VOCAB
            .iter()
            .map(|word| lower.matches(word).count() as f32)
            .collect())
    }

    async fn dimension(&self) -> Result<usize> {
        Ok(VOCAB.len())
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}
