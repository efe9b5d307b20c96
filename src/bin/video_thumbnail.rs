//! Video thumbnail - Grabs JPEG frames from a stored video.

use std::sync::Arc;
use vidtalk_media::adapters::{ffmpeg::FfmpegCli, http, storage_from_config};
use vidtalk_media::application::{thumbnailer::ThumbnailService, PipelineSettings};
use vidtalk_media::{telemetry, ServiceConfig};

#[tokio::main]
async fn main() {
    telemetry::init();

    let config = match ServiceConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            std::process::exit(1);
        }
    };

    let storage = storage_from_config(&config.storage).await;
    let runner = FfmpegCli::from_config(&config);
    tracing::info!(policy = %config.batch_policy, "batch thumbnail policy");

    let service = Arc::new(ThumbnailService::new(
        storage,
        runner,
        PipelineSettings::from_config(&config),
    ));

    let app = http::thumbnail::router(service);
    if let Err(e) = http::serve(&config.bind_address(), app).await {
        tracing::error!(error = %e, "server failed");
        std::process::exit(1);
    }
}
