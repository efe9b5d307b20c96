use super::json_body;
use crate::application::thumbnailer::ThumbnailService;
use crate::domain::requests::{ThumbnailRequest, ThumbnailResult};
use crate::error::MediaError;
use crate::ports::media::MediaToolRunner;
use crate::ports::storage::StoragePort;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use std::sync::Arc;

const SERVICE_NAME: &str = "video-thumbnail";
/// Reported by the health check; tracks the HTTP contract, not the crate version.
const SERVICE_VERSION: &str = "1.0.0";

/// `POST /thumbnail` and `GET /health` for the thumbnail generator.
pub fn router<S, R>(service: Arc<ThumbnailService<S, R>>) -> Router
where
    S: StoragePort + 'static,
    R: MediaToolRunner + 'static,
{
    Router::new()
        .route("/thumbnail", post(thumbnail::<S, R>))
        .route("/health", get(health::<S, R>))
        .with_state(service)
}

async fn thumbnail<S, R>(
    State(service): State<Arc<ThumbnailService<S, R>>>,
    payload: Result<Json<ThumbnailRequest>, JsonRejection>,
) -> Result<Json<ThumbnailResult>, MediaError>
where
    S: StoragePort + 'static,
    R: MediaToolRunner + 'static,
{
    let request = json_body(payload)?;
    let result = service.generate(&request).await?;
    Ok(Json(result))
}

/// Healthy only if the external tool can actually be invoked.
async fn health<S, R>(State(service): State<Arc<ThumbnailService<S, R>>>) -> Response
where
    S: StoragePort + 'static,
    R: MediaToolRunner + 'static,
{
    match service.tool_version().await {
        Ok(ffmpeg) => Json(json!({
            "status": "healthy",
            "service": SERVICE_NAME,
            "version": SERVICE_VERSION,
            "ffmpeg": ffmpeg,
        }))
        .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "success": false, "error": "ffmpeg not available" })),
            )
                .into_response()
        }
    }
}
