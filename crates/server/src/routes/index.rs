use actix_web::{post, web, HttpResponse};
use semsearch_common::SemSearchError;
use semsearch_vector::{BuildOptions, BuildOutcome};
use std::sync::Arc;
use tracing::info;

use crate::error::ApiError;
use crate::state::AppState;
use crate::types::{RebuildRequest, RebuildResponse};

/// Rebuild the vector index from the company catalog.
///
/// Default mode skips the rebuild when a populated index already exists;
/// force discards it. On success the engine's snapshot is swapped, so
/// in-flight searches finish against the old index.
#[post("/index/rebuild")]
pub async fn rebuild_index(
    body: web::Json<RebuildRequest>,
    state: web::Data<Arc<AppState>>,
) -> Result<HttpResponse, ApiError> {
    // One rebuild at a time; searches are unaffected
    let _guard = state.rebuild_lock.lock().await;

    info!("Index rebuild requested (force: {})", body.force);

    let records = semsearch_catalog::load_companies(&state.config.data_path)?;

    let opts = BuildOptions {
        force: body.force,
        cancel: None,
    };
    let outcome = state.builder.build(&records, opts).await?;

    let response = match outcome {
        BuildOutcome::Built(report) => {
            let index = state.builder.load_existing().await?.ok_or_else(|| {
                SemSearchError::internal("Index missing immediately after build")
            })?;
            state.engine.replace(index).await?;

            RebuildResponse {
                success: true,
                indexed: report.indexed,
                skipped: report.skipped,
                message: format!(
                    "Index rebuilt: {} companies indexed, {} skipped",
                    report.indexed, report.skipped
                ),
            }
        }
        BuildOutcome::SkippedExisting(entries) => RebuildResponse {
            success: true,
            indexed: entries,
            skipped: 0,
            message: format!(
                "Index already contains {} entries, use force to rebuild",
                entries
            ),
        },
        BuildOutcome::Cancelled => RebuildResponse {
            success: false,
            indexed: 0,
            skipped: 0,
            message: "Index rebuild was cancelled".to_string(),
        },
    };

    Ok(HttpResponse::Ok().json(response))
}
