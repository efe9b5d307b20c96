//! Video converter - Extracts the audio track of a stored video.
//!
//! Wires up:
//! - Object storage (R2/S3, local directory, or unconfigured)
//! - ffmpeg CLI runner
//! - `POST /process` HTTP adapter

use std::sync::Arc;
use vidtalk_media::adapters::{ffmpeg::FfmpegCli, http, storage_from_config};
use vidtalk_media::application::{converter::ConverterService, PipelineSettings};
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

    // 1. Adapters
    let storage = storage_from_config(&config.storage).await;
    let runner = FfmpegCli::from_config(&config);

    // 2. Application service
    let service = Arc::new(ConverterService::new(
        storage,
        runner,
        PipelineSettings::from_config(&config),
    ));

    // 3. HTTP layer
    let app = http::converter::router(service);
    if let Err(e) = http::serve(&config.bind_address(), app).await {
        tracing::error!(error = %e, "server failed");
        std::process::exit(1);
    }
}
