//! Error types shared by every service.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Failure of a single request. The HTTP layer is the only place these are
/// turned into a response.
#[derive(Debug, Error)]
pub enum MediaError {
    /// Missing or malformed request field.
    #[error("{0}")]
    Validation(String),

    /// The source object could not be retrieved or written to the staging area.
    #[error("Failed to download {key}: {source}")]
    Fetch {
        key: String,
        #[source]
        source: StorageError,
    },

    /// The external tool exited non-zero, could not be spawned, or produced no output.
    #[error("{context}: {diagnostics}")]
    Transform {
        context: String,
        diagnostics: String,
    },

    /// The output could not be stored.
    #[error("Failed to upload {key}: {source}")]
    Publish {
        key: String,
        #[source]
        source: StorageError,
    },

    /// Local filesystem failure outside of fetch/publish (staging area, reading output).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl MediaError {
    pub fn validation(message: impl Into<String>) -> Self {
        MediaError::Validation(message.into())
    }

    pub fn transform(context: impl Into<String>, diagnostics: impl Into<String>) -> Self {
        MediaError::Transform {
            context: context.into(),
            diagnostics: diagnostics.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            MediaError::Validation(_) => StatusCode::BAD_REQUEST,
            MediaError::Fetch { .. }
            | MediaError::Transform { .. }
            | MediaError::Publish { .. }
            | MediaError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for MediaError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::info!(error = %self, "request rejected");
        }
        let body = Json(json!({
            "success": false,
            "error": self.to_string(),
        }));
        (status, body).into_response()
    }
}

/// Errors reported by a [`crate::ports::storage::StoragePort`] implementation.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("object storage client not initialized (missing credentials)")]
    NotConfigured,

    #[error("object {0} does not exist")]
    NotFound(String),

    #[error("{0}")]
    Backend(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    #[test]
    fn validation_maps_to_bad_request() {
        let err = MediaError::validation("videoKey is required");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "videoKey is required");
    }

    #[test]
    fn pipeline_failures_map_to_internal_error() {
        let fetch = MediaError::Fetch {
            key: "videos/a.mp4".into(),
            source: StorageError::NotFound("videos/a.mp4".into()),
        };
        assert_eq!(fetch.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            fetch.to_string(),
            "Failed to download videos/a.mp4: object videos/a.mp4 does not exist"
        );

        let transform = MediaError::transform("ffmpeg failed", "Invalid data found");
        assert_eq!(transform.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(transform.to_string().contains("Invalid data found"));
    }

    #[tokio::test]
    async fn into_response_renders_json_envelope() {
        let response = MediaError::validation("file is required").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["success"], false);
        assert_eq!(value["error"], "file is required");
    }
}
