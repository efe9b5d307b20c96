use super::json_body;
use crate::application::converter::ConverterService;
use crate::domain::requests::{ConversionRequest, ConversionResult};
use crate::error::MediaError;
use crate::ports::media::MediaToolRunner;
use crate::ports::storage::StoragePort;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use std::sync::Arc;

/// `POST /process` and `GET /health` for the video-to-audio converter.
pub fn router<S, R>(service: Arc<ConverterService<S, R>>) -> Router
where
    S: StoragePort + 'static,
    R: MediaToolRunner + 'static,
{
    Router::new()
        .route("/process", post(process::<S, R>))
        .route("/health", get(health))
        .with_state(service)
}

async fn process<S, R>(
    State(service): State<Arc<ConverterService<S, R>>>,
    payload: Result<Json<ConversionRequest>, JsonRejection>,
) -> Result<Json<ConversionResult>, MediaError>
where
    S: StoragePort + 'static,
    R: MediaToolRunner + 'static,
{
    let request = json_body(payload)?;
    let result = service.convert(&request).await?;
    Ok(Json(result))
}

async fn health() -> &'static str {
    "OK"
}
