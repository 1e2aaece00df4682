use semsearch_common::AppConfig;
use semsearch_vector::{IndexBuilder, SearchEngine};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Shared application state
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,

    /// Query engine over the published index snapshot
    pub engine: Arc<SearchEngine>,

    /// Index builder (exclusive writer of the persisted index)
    pub builder: Arc<IndexBuilder>,

    /// Serializes rebuild requests; queries never take this lock
    pub rebuild_lock: Mutex<()>,
}

impl AppState {
    /// Create new application state
    pub fn new(config: AppConfig, engine: Arc<SearchEngine>, builder: Arc<IndexBuilder>) -> Self {
        Self {
            config,
            engine,
            builder,
            rebuild_lock: Mutex::new(()),
        }
    }
}
