use super::upload::stream_to_file;
use crate::application::transcoder::TranscoderService;
use crate::domain::requests::TranscodeRequest;
use crate::error::MediaError;
use crate::ports::media::MediaToolRunner;
use axum::extract::multipart::{Field, MultipartRejection};
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use std::sync::Arc;

/// `POST /convert` and `GET /health` for the upload transcoder.
pub fn router<R>(service: Arc<TranscoderService<R>>, max_upload_bytes: usize) -> Router
where
    R: MediaToolRunner + 'static,
{
    Router::new()
        .route("/convert", post(convert::<R>))
        .route("/health", get(health))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(service)
}

// Form fields arrive in any order; the file is streamed straight into the
// staging area and the text fields are collected alongside it.
async fn convert<R>(
    State(service): State<Arc<TranscoderService<R>>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, MediaError>
where
    R: MediaToolRunner + 'static,
{
    let mut multipart = multipart
        .map_err(|_| MediaError::validation("Expected a multipart/form-data body"))?;

    let staging = service.stage().await?;
    let input = staging.file("upload");
    let mut request = TranscodeRequest::default();
    let mut received = false;

    while let Some(field) = multipart.next_field().await.map_err(invalid_form)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                request.file_name = field.file_name().map(String::from);
                let bytes = stream_to_file(&input, field).await?;
                tracing::debug!(bytes, "received upload");
                received = true;
            }
            "format" => request.format = Some(text(field).await?),
            "bitrate" => request.bitrate = Some(text(field).await?),
            "sampleRate" => request.sample_rate = Some(text(field).await?),
            _ => continue,
        }
    }

    if !received {
        return Err(MediaError::validation("file is required"));
    }

    let audio = service.transcode(&staging, &input, &request).await?;
    let disposition = format!("attachment; filename=\"{}\"", audio.file_name);
    Ok((
        [
            (header::CONTENT_TYPE, audio.content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        audio.bytes,
    )
        .into_response())
}

async fn text(field: Field<'_>) -> Result<String, MediaError> {
    field.text().await.map_err(invalid_form)
}

fn invalid_form(err: axum::extract::multipart::MultipartError) -> MediaError {
    MediaError::validation(format!("Invalid multipart body: {}", err.body_text()))
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "healthy", "service": "audio-transcoder" }))
}
