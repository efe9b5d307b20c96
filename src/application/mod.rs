//! Application layer - Request pipelines that use ports.
//!
//! Every pipeline is linear: validate, stage, fetch, transform, publish.
//! The staging area is owned by the pipeline call, so it is gone by the time
//! the call returns on any path.

pub mod converter;
pub mod thumbnailer;
pub mod transcoder;

use crate::config::ServiceConfig;
use crate::domain::policy::BatchPolicy;
use crate::domain::staging::StagingArea;
use std::path::PathBuf;

/// Settings shared by the pipelines, taken from [`ServiceConfig`] at startup.
#[derive(Clone, Debug)]
pub struct PipelineSettings {
    pub staging_root: PathBuf,
    pub public_base_url: String,
    pub source_key_segment: String,
    pub batch_policy: BatchPolicy,
}

impl PipelineSettings {
    pub fn from_config(config: &ServiceConfig) -> Self {
        Self {
            staging_root: config.staging_root.clone(),
            public_base_url: config.storage.public_base_url(),
            source_key_segment: config.source_key_segment.clone(),
            batch_policy: config.batch_policy,
        }
    }
}

/// Removes a staging area at the end of a successful pipeline. A failed
/// removal is logged; the request has already succeeded.
pub(crate) fn release(staging: StagingArea) {
    let path = staging.path().to_path_buf();
    if let Err(e) = staging.close() {
        tracing::warn!(path = %path.display(), error = %e, "failed to remove staging area");
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::path::Path;

    pub(crate) fn settings(root: &Path) -> PipelineSettings {
        PipelineSettings {
            staging_root: root.to_path_buf(),
            public_base_url: String::from("https://pub.r2.dev"),
            source_key_segment: String::from("videos"),
            batch_policy: BatchPolicy::ContinueOnError,
        }
    }

    pub(crate) fn staging_is_empty(root: &Path) -> bool {
        std::fs::read_dir(root).map(|d| d.count() == 0).unwrap_or(true)
    }
}
