use actix_web::{get, web, HttpResponse};
use std::sync::Arc;

use crate::error::ApiError;
use crate::state::AppState;
use crate::types::{CompanyResultItem, SearchQuery, SearchResponse};

#[get("/search")]
pub async fn search(
    query: web::Query<SearchQuery>,
    state: web::Data<Arc<AppState>>,
) -> Result<HttpResponse, ApiError> {
    let output = state
        .engine
        .search_filtered(&query.query, query.limit, query.sector.as_deref())
        .await?;

    // Convert to response format
    let results: Vec<CompanyResultItem> = output
        .results
        .into_iter()
        .map(CompanyResultItem::from)
        .collect();

    Ok(HttpResponse::Ok().json(SearchResponse {
        count: results.len(),
        results,
        query: output.query,
    }))
}

#[get("/search/stats")]
pub async fn search_stats(
    state: web::Data<Arc<AppState>>,
) -> Result<HttpResponse, ApiError> {
    let stats = state.engine.stats().await;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "total_companies": stats.entries,
        "embedding_model": stats.embedding_model,
        "embedding_dim": stats.embedding_dim,
    })))
}
