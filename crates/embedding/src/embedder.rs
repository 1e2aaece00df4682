use async_trait::async_trait;
use semsearch_common::Result;

/// Common trait for text embedding backends.
///
/// Implementations must be deterministic for a fixed model version: the
/// same text always yields the same vector. Empty or whitespace-only text
/// is rejected with `InvalidInput`, never embedded as a zero vector.
#[async_trait]
pub trait TextEmbedder: Send + Sync {
    /// Generate embedding for text
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Output vector dimension of the loaded model
    async fn dimension(&self) -> Result<usize>;

    /// Identifier of the loaded model version
    fn model_id(&self) -> &str;
}
