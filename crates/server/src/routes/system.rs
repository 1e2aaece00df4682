use actix_web::{get, HttpResponse};

/// Health check
#[get("/health")]
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
    }))
}

/// Root endpoint
#[get("/")]
pub async fn root() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "message": "Welcome to the Semantic Company Search API",
        "search_endpoint": "/api/v1/search?query=your_search_query",
        "health": "/health",
    }))
}
