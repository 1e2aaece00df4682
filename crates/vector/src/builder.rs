use chrono::Utc;
use semsearch_catalog::CompanyRecord;
use semsearch_common::{Result, SemSearchError};
use semsearch_embedding::TextEmbedder;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::types::{BuildOutcome, BuildReport, CompanyMetadata, IndexEntry, VectorIndex};

/// Attempts for persisting the index before giving up
const PERSIST_RETRIES: u32 = 3;

/// Build options
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Discard any existing index and rebuild from empty
    pub force: bool,

    /// Checked between records; cancelling abandons the build before
    /// the new index is published
    pub cancel: Option<CancellationToken>,
}

impl BuildOptions {
    pub fn force() -> Self {
        Self {
            force: true,
            cancel: None,
        }
    }
}

/// Load a persisted index, `None` when no index file exists yet
pub async fn load_index(path: &Path) -> Result<Option<VectorIndex>> {
    if !path.exists() {
        return Ok(None);
    }

    let data = tokio::fs::read_to_string(path).await.map_err(|e| {
        SemSearchError::persistence(format!("Failed to read index {}: {}", path.display(), e))
    })?;
    let index: VectorIndex = serde_json::from_str(&data).map_err(|e| {
        SemSearchError::persistence(format!("Failed to parse index {}: {}", path.display(), e))
    })?;

    Ok(Some(index))
}

/// Builds the persisted vector index from company records.
///
/// Writes are exclusive to the builder: the engine only ever reads
/// published snapshots.
pub struct IndexBuilder {
    embedder: Arc<dyn TextEmbedder>,
    index_path: PathBuf,
}

impl IndexBuilder {
    /// Create new index builder
    pub fn new(embedder: Arc<dyn TextEmbedder>, index_path: impl Into<PathBuf>) -> Self {
        Self {
            embedder,
            index_path: index_path.into(),
        }
    }

    pub fn index_path(&self) -> &Path {
        &self.index_path
    }

    /// Load the currently published index, if any
    pub async fn load_existing(&self) -> Result<Option<VectorIndex>> {
        load_index(&self.index_path).await
    }

    /// Build the index from a validated record set.
    ///
    /// Default mode skips the build when a non-empty index is already
    /// published. Per-record failures (empty composite text, embedding
    /// errors) skip the record; the build fails only when no record
    /// succeeds.
    pub async fn build(
        &self,
        records: &[CompanyRecord],
        opts: BuildOptions,
    ) -> Result<BuildOutcome> {
        if !opts.force {
            if let Some(existing) = self.load_existing().await? {
                if !existing.is_empty() {
                    info!(
                        "Index already contains {} entries, skipping build (use force to rebuild)",
                        existing.len()
                    );
                    return Ok(BuildOutcome::SkippedExisting(existing.len()));
                }
            }
        }

        let model = self.embedder.model_id().to_string();
        let dimension = self.embedder.dimension().await?;

        info!(
            "Building index for {} records (model: {}, dimension: {})",
            records.len(),
            model,
            dimension
        );

        let mut index = VectorIndex::new(&model, dimension);
        let mut skipped = 0usize;

        for record in records {
            if let Some(token) = &opts.cancel {
                if token.is_cancelled() {
                    info!(
                        "Index build cancelled after {} records, existing index untouched",
                        index.len()
                    );
                    return Ok(BuildOutcome::Cancelled);
                }
            }

            match self.embed_record(record, dimension).await {
                Ok(entry) => index.upsert(entry),
                Err(e) => {
                    warn!("Skipping record {}: {}", record.symbol, e);
                    skipped += 1;
                }
            }
        }

        if index.is_empty() {
            return Err(SemSearchError::build_failed(format!(
                "No records could be embedded ({} skipped)",
                skipped
            )));
        }

        self.persist(&index).await?;

        let report = BuildReport {
            indexed: index.len(),
            skipped,
            model,
            dimension,
        };
        info!(
            "Index build complete: {} indexed, {} skipped",
            report.indexed, report.skipped
        );

        Ok(BuildOutcome::Built(report))
    }

    /// Re-embed a single record and replace its entry, leaving all other
    /// entries untouched. Returns the updated index for the engine to swap in.
    pub async fn upsert(&self, record: &CompanyRecord) -> Result<VectorIndex> {
        let dimension = self.embedder.dimension().await?;

        let mut index = match self.load_existing().await? {
            Some(index) => index,
            None => VectorIndex::new(self.embedder.model_id(), dimension),
        };

        let entry = self.embed_record(record, dimension).await?;
        index.upsert(entry);
        self.persist(&index).await?;

        info!("Upserted {} into index ({} entries)", record.symbol, index.len());
        Ok(index)
    }

    /// Embed one record's composite text into an index entry
    async fn embed_record(&self, record: &CompanyRecord, dimension: usize) -> Result<IndexEntry> {
        let text = record.combined_text();
        if text.is_empty() {
            return Err(SemSearchError::invalid_input("Empty composite text"));
        }

        let embedding = self.embedder.embed(&text).await?;
        if embedding.len() != dimension {
            return Err(SemSearchError::embedding(format!(
                "Expected dimension {}, model returned {}",
                dimension,
                embedding.len()
            )));
        }

        Ok(IndexEntry {
            symbol: record.symbol.clone(),
            embedding,
            metadata: CompanyMetadata {
                name: record.name.clone(),
                sector: record.sector.clone(),
                description: record.description.clone(),
            },
            indexed_at: Utc::now(),
        })
    }

    /// Persist the index: write a temporary sibling file, then rename it
    /// over the published path so readers see fully-old or fully-new.
    async fn persist(&self, index: &VectorIndex) -> Result<()> {
        let data = serde_json::to_string_pretty(index)?;
        let tmp_path = self.index_path.with_extension("json.tmp");

        let mut last_error = None;
        for attempt in 1..=PERSIST_RETRIES {
            let result = async {
                tokio::fs::write(&tmp_path, &data).await?;
                tokio::fs::rename(&tmp_path, &self.index_path).await?;
                Ok::<(), std::io::Error>(())
            }
            .await;

            match result {
                Ok(()) => return Ok(()),
                Err(e) => {
                    warn!(
                        "Failed to persist index (attempt {}/{}): {}",
                        attempt, PERSIST_RETRIES, e
                    );
                    last_error = Some(e);
                }
            }
        }

        Err(SemSearchError::persistence(format!(
            "Failed to persist index to {}: {}",
            self.index_path.display(),
            last_error.expect("retry loop ran at least once")
        )))
    }
}
