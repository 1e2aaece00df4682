//! SemSearch HTTP Server
//!
//! Actix-web REST API wrapping the query engine and index builder

pub mod error;
pub mod routes;
pub mod state;
pub mod types;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use semsearch_common::Result;
use std::sync::Arc;
use tracing::info;
use tracing_actix_web::TracingLogger;

pub use state::AppState;

/// Register all routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(routes::system::root)
        .service(routes::system::health)
        .service(
            web::scope("/api/v1")
                .service(routes::search::search)
                .service(routes::search::search_stats)
                .service(routes::index::rebuild_index),
        );
}

/// Start the HTTP server, serving until shutdown
pub async fn start_server(state: Arc<AppState>) -> Result<()> {
    let bind_address = state.config.server_bind_address();
    info!("Starting HTTP server on {}", bind_address);

    let data = web::Data::new(state);

    HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .wrap(TracingLogger::default())
            .wrap(Cors::permissive())
            .configure(configure)
    })
    .bind(&bind_address)?
    .run()
    .await?;

    Ok(())
}
