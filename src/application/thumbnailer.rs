use super::{release, PipelineSettings};
use crate::domain::av::frames::{extract_frame, FrameSpec};
use crate::domain::av::probe::{probe_duration, tool_version};
use crate::domain::av::sampling::{format_offset, sample_offsets};
use crate::domain::locator;
use crate::domain::requests::{ThumbnailMode, ThumbnailPlan, ThumbnailRequest, ThumbnailResult};
use crate::domain::staging::StagingArea;
use crate::error::MediaError;
use crate::ports::media::MediaToolRunner;
use crate::ports::storage::StoragePort;
use std::path::{Path, PathBuf};
use std::time::Instant;

const THUMBNAIL_CONTENT_TYPE: &str = "image/jpeg";

/// One successfully extracted batch frame.
#[derive(Debug, Clone, PartialEq)]
pub struct SampledFrame {
    pub offset: String,
    pub path: PathBuf,
}

pub struct ThumbnailService<S, R> {
    storage: S,
    runner: R,
    settings: PipelineSettings,
}

impl<S, R> ThumbnailService<S, R>
where
    S: StoragePort,
    R: MediaToolRunner,
{
    pub fn new(storage: S, runner: R, settings: PipelineSettings) -> Self {
        Self {
            storage,
            runner,
            settings,
        }
    }

    /// Version line of the external tool, used by the health check.
    pub async fn tool_version(&self) -> Result<String, MediaError> {
        tool_version(&self.runner).await
    }

    pub async fn generate(
        &self,
        request: &ThumbnailRequest,
    ) -> Result<ThumbnailResult, MediaError> {
        let started = Instant::now();
        let plan = request.validate()?;

        let staging =
            StagingArea::create(&self.settings.staging_root, "video-thumbnail").await?;
        let input = staging.file(&match locator::source_extension(&plan.video_key) {
            Some(ext) => format!("video.{}", ext),
            None => String::from("video"),
        });

        tracing::info!(key = %plan.video_key, "downloading video");
        self.storage
            .download(&plan.video_key, &input)
            .await
            .map_err(|source| MediaError::Fetch {
                key: plan.video_key.clone(),
                source,
            })?;

        let result = match &plan.mode {
            ThumbnailMode::Single { offset } => {
                self.single(&plan, &staging, &input, offset).await?;
                ThumbnailResult::single(plan.output_key.clone(), started.elapsed().as_secs_f64())
            }
            ThumbnailMode::Batch { count } => {
                tracing::info!(count, "generating thumbnails");
                let frames = self.sample_frames(&input, &staging, &plan.frame, *count).await?;
                let keys = self.publish_batch(&plan, frames).await?;
                ThumbnailResult::batch(keys, started.elapsed().as_secs_f64())
            }
        };

        release(staging);
        Ok(result)
    }

    async fn single(
        &self,
        plan: &ThumbnailPlan,
        staging: &StagingArea,
        input: &Path,
        offset: &str,
    ) -> Result<(), MediaError> {
        tracing::info!(offset, "generating thumbnail");
        let output = staging.file("thumb.jpg");
        extract_frame(&self.runner, input, offset, &plan.frame, &output).await?;

        self.storage
            .upload(&output, &plan.output_key, THUMBNAIL_CONTENT_TYPE)
            .await
            .map_err(|source| MediaError::Publish {
                key: plan.output_key.clone(),
                source,
            })
    }

    /// Probes the duration of `input` and extracts `count` frames at evenly
    /// spaced interior offsets. A failed probe fails the batch; a failed frame
    /// is skipped or fatal depending on the configured policy.
    pub async fn sample_frames(
        &self,
        input: &Path,
        staging: &StagingArea,
        frame: &FrameSpec,
        count: u32,
    ) -> Result<Vec<SampledFrame>, MediaError> {
        let duration = probe_duration(&self.runner, input).await?;

        let mut frames = Vec::with_capacity(count as usize);
        for (index, seconds) in sample_offsets(duration, count).into_iter().enumerate() {
            let offset = format_offset(seconds);
            let path = staging.file(&format!("thumb_{}.jpg", index));
            match extract_frame(&self.runner, input, &offset, frame, &path).await {
                Ok(()) => frames.push(SampledFrame { offset, path }),
                Err(e) if self.settings.batch_policy.continues() => {
                    tracing::warn!(offset = %offset, error = %e, "failed to generate thumbnail, skipping");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(frames)
    }

    /// Keys are numbered by position among the extracted frames, so a
    /// skipped frame leaves no gap. A skipped upload does.
    async fn publish_batch(
        &self,
        plan: &ThumbnailPlan,
        frames: Vec<SampledFrame>,
    ) -> Result<Vec<String>, MediaError> {
        let mut keys = Vec::with_capacity(frames.len());
        for (index, frame) in frames.into_iter().enumerate() {
            let key = locator::batch_thumbnail_key(&plan.output_key, index);
            match self
                .storage
                .upload(&frame.path, &key, THUMBNAIL_CONTENT_TYPE)
                .await
            {
                Ok(()) => keys.push(key),
                Err(source) if self.settings.batch_policy.continues() => {
                    tracing::warn!(key = %key, error = %source, "failed to upload thumbnail, skipping");
                }
                Err(source) => return Err(MediaError::Publish { key, source }),
            }
        }
        Ok(keys)
    }
}
