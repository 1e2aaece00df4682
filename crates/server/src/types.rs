use semsearch_vector::SearchResult;
use serde::{Deserialize, Serialize};

/// Search endpoint query parameters
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    /// Search query string
    pub query: String,

    /// Maximum number of results to return
    pub limit: Option<usize>,

    /// Filter results by sector
    pub sector: Option<String>,
}

/// Search endpoint response
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub results: Vec<CompanyResultItem>,
    pub count: usize,
    pub query: String,
}

/// One matched company with its similarity score
#[derive(Debug, Serialize)]
pub struct CompanyResultItem {
    pub company_name: String,
    pub stock_symbol: String,
    pub sector: String,
    pub description: String,
    pub score: f32,
}

impl From<SearchResult> for CompanyResultItem {
    fn from(result: SearchResult) -> Self {
        Self {
            company_name: result.name,
            stock_symbol: result.symbol,
            sector: result.sector,
            description: result.description,
            score: result.score,
        }
    }
}

/// Rebuild endpoint request body
#[derive(Debug, Deserialize)]
pub struct RebuildRequest {
    /// Discard the existing index and rebuild from the catalog
    #[serde(default)]
    pub force: bool,
}

/// Rebuild endpoint response
#[derive(Debug, Serialize)]
pub struct RebuildResponse {
    pub success: bool,
    pub indexed: usize,
    pub skipped: usize,
    pub message: String,
}
