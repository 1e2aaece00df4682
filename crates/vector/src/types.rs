use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Company metadata stored alongside each embedding.
///
/// Carries everything needed to build a search result without re-reading
/// the catalog CSV.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompanyMetadata {
    /// Company name
    pub name: String,

    /// Sector classification
    pub sector: String,

    /// Business description
    pub description: String,
}

/// Vector index entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexEntry {
    /// Stock symbol (index key)
    pub symbol: String,

    /// Embedding of the company's composite text
    pub embedding: Vec<f32>,

    /// Company metadata
    pub metadata: CompanyMetadata,

    /// Timestamp when indexed
    pub indexed_at: DateTime<Utc>,
}

/// Vector index structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorIndex {
    /// Entries map (symbol -> entry)
    pub entries: HashMap<String, IndexEntry>,

    /// Embedding model used
    pub embedding_model: String,

    /// Embedding dimension
    pub embedding_dim: usize,
}

impl VectorIndex {
    /// Create new empty index
    pub fn new(embedding_model: impl Into<String>, embedding_dim: usize) -> Self {
        Self {
            entries: HashMap::new(),
            embedding_model: embedding_model.into(),
            embedding_dim,
        }
    }

    /// Insert or replace an entry by symbol
    pub fn upsert(&mut self, entry: IndexEntry) {
        self.entries.insert(entry.symbol.clone(), entry);
    }

    /// Get entry by symbol
    pub fn get(&self, symbol: &str) -> Option<&IndexEntry> {
        self.entries.get(symbol)
    }

    /// Number of indexed companies
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Search result for one company
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// Stock symbol
    pub symbol: String,

    /// Company name
    pub name: String,

    /// Sector classification
    pub sector: String,

    /// Business description
    pub description: String,

    /// Cosine similarity clamped to [0.0, 1.0], higher = more relevant
    pub score: f32,
}

impl SearchResult {
    pub fn from_entry(entry: &IndexEntry, score: f32) -> Self {
        Self {
            symbol: entry.symbol.clone(),
            name: entry.metadata.name.clone(),
            sector: entry.metadata.sector.clone(),
            description: entry.metadata.description.clone(),
            score,
        }
    }
}

/// Ranked answer for one query, the shape the HTTP layer wraps verbatim
#[derive(Debug, Clone, Serialize)]
pub struct SearchOutput {
    /// Results ordered by descending score
    pub results: Vec<SearchResult>,

    /// Number of returned results
    pub count: usize,

    /// Query echoed back
    pub query: String,
}

/// Summary of a completed index build
#[derive(Debug, Clone, Serialize)]
pub struct BuildReport {
    /// Records successfully embedded and indexed
    pub indexed: usize,

    /// Records skipped (empty composite text or embedding failure)
    pub skipped: usize,

    /// Embedding model used
    pub model: String,

    /// Embedding dimension
    pub dimension: usize,
}

/// Outcome of a build request
#[derive(Debug, Clone)]
pub enum BuildOutcome {
    /// A fresh index was built and persisted
    Built(BuildReport),

    /// A non-empty index already exists and force was not requested
    SkippedExisting(usize),

    /// The build was cancelled before publishing; the existing index is untouched
    Cancelled,
}

/// Index statistics for monitoring
#[derive(Debug, Clone, Serialize)]
pub struct IndexStats {
    /// Number of indexed companies
    pub entries: usize,

    /// Embedding model used
    pub embedding_model: String,

    /// Embedding dimension
    pub embedding_dim: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(symbol: &str, embedding: Vec<f32>) -> IndexEntry {
        IndexEntry {
            symbol: symbol.to_string(),
            embedding,
            metadata: CompanyMetadata {
                name: format!("{} Inc.", symbol),
                sector: "Industrials".to_string(),
                description: "Widgets".to_string(),
            },
            indexed_at: Utc::now(),
        }
    }

    #[test]
    fn test_upsert_replaces_by_symbol() {
        let mut index = VectorIndex::new("test-model", 2);
        index.upsert(entry("ACME", vec![1.0, 0.0]));
        index.upsert(entry("ACME", vec![0.0, 1.0]));

        assert_eq!(index.len(), 1);
        assert_eq!(index.get("ACME").unwrap().embedding, vec![0.0, 1.0]);
    }

    #[test]
    fn test_empty_index() {
        let index = VectorIndex::new("test-model", 2);
        assert!(index.is_empty());
        assert_eq!(index.len(), 0);
        assert!(index.get("ACME").is_none());
    }

    #[test]
    fn test_index_round_trips_through_json() {
        let mut index = VectorIndex::new("test-model", 2);
        index.upsert(entry("ACME", vec![0.5, -0.5]));

        let json = serde_json::to_string(&index).unwrap();
        let restored: VectorIndex = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.embedding_model, "test-model");
        assert_eq!(restored.embedding_dim, 2);
        assert_eq!(restored.get("ACME").unwrap().embedding, vec![0.5, -0.5]);
    }
}
