/// SemSearch error types
#[derive(Debug, thiserror::Error)]
pub enum SemSearchError {
    /// Embedding model adapter error
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// Catalog loading error
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// Vector search related error
    #[error("Vector search error: {0}")]
    VectorSearch(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Persisted index does not match the loaded embedding model
    #[error("Index incompatible: {0}")]
    IndexIncompatible(String),

    /// Index build produced zero entries
    #[error("Build failed: {0}")]
    BuildFailed(String),

    /// Index persistence error
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Network/HTTP error
    #[error("Network error: {0}")]
    Network(String),

    /// Not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// General error (anyhow integration)
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SemSearchError {
    /// Create embedding error
    pub fn embedding<S: Into<String>>(msg: S) -> Self {
        Self::Embedding(msg.into())
    }

    /// Create catalog error
    pub fn catalog<S: Into<String>>(msg: S) -> Self {
        Self::Catalog(msg.into())
    }

    /// Create vector search error
    pub fn vector_search<S: Into<String>>(msg: S) -> Self {
        Self::VectorSearch(msg.into())
    }

    /// Create config error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Create invalid input error
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create index incompatibility error
    pub fn index_incompatible<S: Into<String>>(msg: S) -> Self {
        Self::IndexIncompatible(msg.into())
    }

    /// Create build failure error
    pub fn build_failed<S: Into<String>>(msg: S) -> Self {
        Self::BuildFailed(msg.into())
    }

    /// Create persistence error
    pub fn persistence<S: Into<String>>(msg: S) -> Self {
        Self::Persistence(msg.into())
    }

    /// Create network error
    pub fn network<S: Into<String>>(msg: S) -> Self {
        Self::Network(msg.into())
    }

    /// Create not found error
    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create internal error
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Self::Internal(msg.into())
    }
}

// HTTP response conversion (for actix-web)
impl SemSearchError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidInput(_) => 400,
            Self::NotFound(_) => 404,
            Self::Config(_) => 500,
            Self::Internal(_) => 500,
            Self::Embedding(_) => 500,
            Self::Catalog(_) => 500,
            Self::VectorSearch(_) => 500,
            Self::IndexIncompatible(_) => 500,
            Self::BuildFailed(_) => 500,
            Self::Persistence(_) => 500,
            Self::Network(_) => 503,
            Self::Io(_) => 500,
            Self::Json(_) => 400,
            Self::Other(_) => 500,
        }
    }
}
