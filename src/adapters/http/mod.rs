//! HTTP inbound adapter.
//!
//! One router per service binary. Handlers only extract, delegate to the
//! application service, and render; `MediaError` renders itself as the JSON
//! error envelope.

pub mod converter;
pub mod thumbnail;
pub mod transcoder;
mod upload;

use crate::error::MediaError;
use axum::extract::rejection::JsonRejection;
use axum::{Json, Router};
use std::io;

/// Unwraps a JSON body, reporting malformed input as a validation error.
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, MediaError> {
    payload.map(|Json(body)| body).map_err(|rejection| {
        tracing::debug!(%rejection, "rejected request body");
        MediaError::validation("Invalid request body")
    })
}

/// Binds `address` and serves `app` until Ctrl-C.
pub async fn serve(address: &str, app: Router) -> io::Result<()> {
    let listener = tokio::net::TcpListener::bind(address).await?;
    tracing::info!(address, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for shutdown signal");
            }
        })
        .await
}

#[cfg(test)]
pub(crate) mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::Router;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    pub(crate) fn json_request(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    pub(crate) async fn send(router: Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, body.to_vec())
    }

    pub(crate) async fn send_json(
        router: Router,
        request: Request<Body>,
    ) -> (StatusCode, serde_json::Value) {
        let (status, body) = send(router, request).await;
        (status, serde_json::from_slice(&body).unwrap())
    }
}
