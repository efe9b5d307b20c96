//! Adapters - Concrete implementations of ports.

pub mod ffmpeg;
pub mod fs;
pub mod http;
#[cfg(feature = "s3")]
pub mod s3;
pub mod unconfigured;

use crate::config::StorageConfig;
use crate::ports::storage::StoragePort;
use std::sync::Arc;

/// Picks the storage backend for this process.
///
/// A local directory wins when configured; otherwise the S3-compatible bucket
/// is used if credentials are present. Without either the service still starts
/// and storage calls fail with `StorageError::NotConfigured`.
pub async fn storage_from_config(config: &StorageConfig) -> Arc<dyn StoragePort> {
    if let Some(dir) = &config.local_dir {
        tracing::info!(dir = %dir.display(), "using local directory storage");
        return Arc::new(fs::FsAdapter::new(dir));
    }

    #[cfg(feature = "s3")]
    if let Some(adapter) = s3::S3Adapter::connect(config).await {
        tracing::info!(bucket = %config.bucket, "object storage configured");
        return Arc::new(adapter);
    }

    tracing::warn!("object storage credentials not configured; storage calls will fail");
    Arc::new(unconfigured::UnconfiguredStorage)
}
