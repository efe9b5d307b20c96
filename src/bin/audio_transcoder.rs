//! Audio transcoder - Converts an uploaded file and returns the result.
//!
//! No object storage is involved; the upload is staged on local disk only.

use std::sync::Arc;
use vidtalk_media::adapters::{ffmpeg::FfmpegCli, http};
use vidtalk_media::application::{transcoder::TranscoderService, PipelineSettings};
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

    let runner = FfmpegCli::from_config(&config);
    let service = Arc::new(TranscoderService::new(
        runner,
        PipelineSettings::from_config(&config),
    ));

    let app = http::transcoder::router(service, config.max_upload_bytes);
    if let Err(e) = http::serve(&config.bind_address(), app).await {
        tracing::error!(error = %e, "server failed");
        std::process::exit(1);
    }
}
