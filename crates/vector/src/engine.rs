use semsearch_common::{Result, SemSearchError};
use semsearch_embedding::TextEmbedder;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::builder::load_index;
use crate::similarity::{clamp_score, cosine_similarity, SCORE_TIE_EPSILON};
use crate::types::{IndexStats, SearchOutput, SearchResult, VectorIndex};

/// Query engine: answers queries against a read-only index snapshot.
///
/// Holds the loaded embedding adapter and the published index for the
/// process lifetime. Queries are stateless; concurrent queries share the
/// read lock. The index is only ever swapped wholesale via [`replace`],
/// never mutated in place.
///
/// [`replace`]: SearchEngine::replace
pub struct SearchEngine {
    index: Arc<RwLock<VectorIndex>>,
    embedder: Arc<dyn TextEmbedder>,
    default_limit: usize,
}

impl std::fmt::Debug for SearchEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchEngine")
            .field("default_limit", &self.default_limit)
            .finish_non_exhaustive()
    }
}

impl SearchEngine {
    /// Create engine over an index snapshot, validating model compatibility
    pub async fn new(
        index: VectorIndex,
        embedder: Arc<dyn TextEmbedder>,
        default_limit: usize,
    ) -> Result<Self> {
        Self::validate_compat(embedder.as_ref(), &index).await?;

        info!(
            "Search engine initialized - {} entries (model: {})",
            index.len(),
            index.embedding_model
        );

        Ok(Self {
            index: Arc::new(RwLock::new(index)),
            embedder,
            default_limit,
        })
    }

    /// Create engine from the persisted index, or an empty index when no
    /// index has been built yet
    pub async fn open(
        index_path: &Path,
        embedder: Arc<dyn TextEmbedder>,
        default_limit: usize,
    ) -> Result<Self> {
        let index = match load_index(index_path).await? {
            Some(index) => index,
            None => {
                let dimension = embedder.dimension().await?;
                info!(
                    "No index found at {}, starting empty",
                    index_path.display()
                );
                VectorIndex::new(embedder.model_id(), dimension)
            }
        };

        Self::new(index, embedder, default_limit).await
    }

    /// A non-empty index must match the adapter's model and dimension;
    /// serving mismatched vectors would silently mis-rank everything.
    async fn validate_compat(embedder: &dyn TextEmbedder, index: &VectorIndex) -> Result<()> {
        if index.is_empty() {
            return Ok(());
        }

        if index.embedding_model != embedder.model_id() {
            return Err(SemSearchError::index_incompatible(format!(
                "Index was built with model '{}', adapter is '{}'",
                index.embedding_model,
                embedder.model_id()
            )));
        }

        let dimension = embedder.dimension().await?;
        if index.embedding_dim != dimension {
            return Err(SemSearchError::index_incompatible(format!(
                "Index dimension {} does not match model dimension {}",
                index.embedding_dim, dimension
            )));
        }

        Ok(())
    }

    /// Search for the companies most similar to the query
    pub async fn search(&self, query: &str, limit: Option<usize>) -> Result<SearchOutput> {
        self.search_filtered(query, limit, None).await
    }

    /// Search with an optional sector filter applied during the scan
    pub async fn search_filtered(
        &self,
        query: &str,
        limit: Option<usize>,
        sector: Option<&str>,
    ) -> Result<SearchOutput> {
        if query.trim().is_empty() {
            return Err(SemSearchError::invalid_input("Query cannot be empty"));
        }

        let limit = match limit {
            Some(0) => {
                return Err(SemSearchError::invalid_input(
                    "Result limit must be a positive integer",
                ))
            }
            Some(n) => n,
            None => self.default_limit,
        };

        debug!("Searching for: {} (limit={}, sector={:?})", query, limit, sector);

        // Generate query embedding
        let query_embedding = self.embedder.embed(query).await?;

        let index = self.index.read().await;

        // An empty catalog is a valid answer, not an error
        if index.is_empty() {
            return Ok(SearchOutput {
                results: Vec::new(),
                count: 0,
                query: query.to_string(),
            });
        }

        if query_embedding.len() != index.embedding_dim {
            return Err(SemSearchError::index_incompatible(format!(
                "Query embedding dimension {} does not match index dimension {}",
                query_embedding.len(),
                index.embedding_dim
            )));
        }

        // Full scan: the catalog is hundreds of entries, not millions
        let total_candidates = index.len();
        let mut results = Vec::new();
        for entry in index.entries.values() {
            if let Some(sector) = sector {
                if entry.metadata.sector != sector {
                    continue;
                }
            }

            let score = clamp_score(cosine_similarity(&query_embedding, &entry.embedding));
            results.push(SearchResult::from_entry(entry, score));
        }

        // Descending by score; near-equal scores order by symbol so
        // repeated runs return identical rankings
        results.sort_by(|a, b| {
            if (a.score - b.score).abs() <= SCORE_TIE_EPSILON {
                a.symbol.cmp(&b.symbol)
            } else {
                b.score
                    .partial_cmp(&a.score)
                    .unwrap_or(std::cmp::Ordering::Equal)
            }
        });

        results.truncate(limit);

        info!(
            "Search completed - {} results ({} candidates scanned)",
            results.len(),
            total_candidates
        );

        Ok(SearchOutput {
            count: results.len(),
            query: query.to_string(),
            results,
        })
    }

    /// Atomically publish a new index snapshot. In-flight queries finish
    /// against the old snapshot.
    pub async fn replace(&self, new_index: VectorIndex) -> Result<()> {
        Self::validate_compat(self.embedder.as_ref(), &new_index).await?;

        let mut index = self.index.write().await;
        let old_len = index.len();
        *index = new_index;

        info!(
            "Index snapshot replaced: {} -> {} entries",
            old_len,
            index.len()
        );
        Ok(())
    }

    /// Get index statistics
    pub async fn stats(&self) -> IndexStats {
        let index = self.index.read().await;
        IndexStats {
            entries: index.len(),
            embedding_model: index.embedding_model.clone(),
            embedding_dim: index.embedding_dim,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::MockEmbedder;
    use crate::types::{CompanyMetadata, IndexEntry};
    use chrono::Utc;

    async fn index_of(companies: &[(&str, &str, &str, &str)]) -> VectorIndex {
        let embedder = MockEmbedder::default();
        let dimension = embedder.dimension().await.unwrap();
        let mut index = VectorIndex::new(embedder.model_id(), dimension);

        for (symbol, name, sector, description) in companies {
            let text = format!("{} {} {}", name, sector, description);
            index.upsert(IndexEntry {
                symbol: symbol.to_string(),
                embedding: embedder.embed(&text).await.unwrap(),
                metadata: CompanyMetadata {
                    name: name.to_string(),
                    sector: sector.to_string(),
                    description: description.to_string(),
                },
                indexed_at: Utc::now(),
            });
        }

        index
    }

    async fn engine_of(companies: &[(&str, &str, &str, &str)]) -> SearchEngine {
        let index = index_of(companies).await;
        SearchEngine::new(index, Arc::new(MockEmbedder::default()), 10)
            .await
            .unwrap()
    }

    fn catalog() -> Vec<(&'static str, &'static str, &'static str, &'static str)> {
        vec![
            (
                "NVDA",
                "NVIDIA Corporation",
                "Information Technology",
                "Designs GPUs for gaming and AI computing",
            ),
            (
                "MSFT",
                "Microsoft Corporation",
                "Information Technology",
                "Develops Windows, Azure and Xbox",
            ),
            (
                "TSLA",
                "Tesla Inc.",
                "Consumer Discretionary",
                "Electric vehicles and energy storage",
            ),
        ]
    }

    #[tokio::test]
    async fn test_empty_index_returns_empty_results() {
        let engine = engine_of(&[]).await;

        let output = engine.search("AI computing", None).await.unwrap();
        assert!(output.results.is_empty());
        assert_eq!(output.count, 0);
        assert_eq!(output.query, "AI computing");
    }

    #[tokio::test]
    async fn test_whitespace_query_is_rejected() {
        let engine = engine_of(&catalog()).await;

        let err = engine.search("   \t", None).await.unwrap_err();
        assert!(matches!(err, SemSearchError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_zero_limit_is_rejected() {
        let engine = engine_of(&catalog()).await;

        let err = engine.search("AI", Some(0)).await.unwrap_err();
        assert!(matches!(err, SemSearchError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_ai_query_ranks_nvda_above_msft() {
        let engine = engine_of(&catalog()).await;

        let output = engine.search("AI technology", None).await.unwrap();
        let nvda = output.results.iter().find(|r| r.symbol == "NVDA").unwrap();
        let msft = output.results.iter().find(|r| r.symbol == "MSFT").unwrap();

        assert_eq!(output.results[0].symbol, "NVDA");
        assert!(nvda.score > msft.score);
    }

    #[tokio::test]
    async fn test_limit_one_returns_top_entry() {
        let engine = engine_of(&catalog()).await;

        let output = engine.search("electric vehicles", Some(1)).await.unwrap();
        assert_eq!(output.count, 1);
        assert_eq!(output.results[0].symbol, "TSLA");
    }

    #[tokio::test]
    async fn test_limit_beyond_index_size_returns_all() {
        let engine = engine_of(&catalog()).await;

        let output = engine.search("computing", Some(100)).await.unwrap();
        assert_eq!(output.count, 3);
    }

    #[tokio::test]
    async fn test_scores_are_monotonically_non_increasing() {
        let engine = engine_of(&catalog()).await;

        let output = engine.search("AI cloud computing", None).await.unwrap();
        for pair in output.results.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[tokio::test]
    async fn test_scores_are_clamped_to_unit_interval() {
        let engine = engine_of(&catalog()).await;

        let output = engine.search("unrelated query text", None).await.unwrap();
        assert_eq!(output.count, 3);
        for result in &output.results {
            assert!(result.score >= 0.0 && result.score <= 1.0);
        }
    }

    #[tokio::test]
    async fn test_tied_scores_order_by_symbol() {
        let engine = engine_of(&[
            ("ZETA", "Zeta Motors", "Industrials", "Electric trucks"),
            ("ACME", "Acme Motors", "Industrials", "Electric trucks"),
        ])
        .await;

        let output = engine.search("electric", None).await.unwrap();
        assert_eq!(output.results[0].symbol, "ACME");
        assert_eq!(output.results[1].symbol, "ZETA");
        assert!((output.results[0].score - output.results[1].score).abs() <= SCORE_TIE_EPSILON);
    }

    #[tokio::test]
    async fn test_repeated_searches_are_deterministic() {
        let engine = engine_of(&catalog()).await;

        let first = engine.search("AI computing", Some(3)).await.unwrap();
        let second = engine.search("AI computing", Some(3)).await.unwrap();

        let symbols = |output: &SearchOutput| {
            output
                .results
                .iter()
                .map(|r| (r.symbol.clone(), r.score))
                .collect::<Vec<_>>()
        };
        assert_eq!(symbols(&first), symbols(&second));
    }

    #[tokio::test]
    async fn test_sector_filter() {
        let engine = engine_of(&catalog()).await;

        let output = engine
            .search_filtered("vehicles", None, Some("Consumer Discretionary"))
            .await
            .unwrap();
        assert_eq!(output.count, 1);
        assert_eq!(output.results[0].symbol, "TSLA");
    }

    #[tokio::test]
    async fn test_model_mismatch_is_fatal() {
        let index = index_of(&catalog()).await;
        let other = Arc::new(MockEmbedder::with_model("other-model"));

        let err = SearchEngine::new(index, other, 10).await.unwrap_err();
        assert!(matches!(err, SemSearchError::IndexIncompatible(_)));
    }

    #[tokio::test]
    async fn test_dimension_mismatch_is_fatal() {
        let mut index = VectorIndex::new("mock-embedder", 4);
        index.upsert(IndexEntry {
            symbol: "ACME".to_string(),
            embedding: vec![1.0, 0.0, 0.0, 0.0],
            metadata: CompanyMetadata {
                name: "Acme".to_string(),
                sector: "Industrials".to_string(),
                description: "Widgets".to_string(),
            },
            indexed_at: Utc::now(),
        });

        let err = SearchEngine::new(index, Arc::new(MockEmbedder::default()), 10)
            .await
            .unwrap_err();
        assert!(matches!(err, SemSearchError::IndexIncompatible(_)));
    }

    #[tokio::test]
    async fn test_replace_publishes_new_snapshot() {
        let engine = engine_of(&[]).await;
        assert_eq!(engine.search("AI", None).await.unwrap().count, 0);

        engine.replace(index_of(&catalog()).await).await.unwrap();

        let output = engine.search("AI", None).await.unwrap();
        assert_eq!(output.count, 3);

        let stats = engine.stats().await;
        assert_eq!(stats.entries, 3);
        assert_eq!(stats.embedding_model, "mock-embedder");
    }

    #[tokio::test]
    async fn test_replace_rejects_incompatible_snapshot() {
        let engine = engine_of(&catalog()).await;

        let mut foreign = VectorIndex::new("other-model", 8);
        foreign.upsert(IndexEntry {
            symbol: "ACME".to_string(),
            embedding: vec![0.0; 8],
            metadata: CompanyMetadata {
                name: "Acme".to_string(),
                sector: "Industrials".to_string(),
                description: "Widgets".to_string(),
            },
            indexed_at: Utc::now(),
        });

        let err = engine.replace(foreign).await.unwrap_err();
        assert!(matches!(err, SemSearchError::IndexIncompatible(_)));
    }
}
