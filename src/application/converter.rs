use super::{release, PipelineSettings};
use crate::domain::av::audio::extract_audio;
use crate::domain::locator;
use crate::domain::requests::{ConversionRequest, ConversionResult};
use crate::domain::staging::StagingArea;
use crate::error::MediaError;
use crate::ports::media::MediaToolRunner;
use crate::ports::storage::StoragePort;

/// Extracts the audio track of a stored video and stores it next to the source.
pub struct ConverterService<S, R> {
    storage: S,
    runner: R,
    settings: PipelineSettings,
}

impl<S, R> ConverterService<S, R>
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

    pub async fn convert(
        &self,
        request: &ConversionRequest,
    ) -> Result<ConversionResult, MediaError> {
        let plan = request.validate(&self.settings.source_key_segment)?;

        let staging = StagingArea::create(
            &self.settings.staging_root,
            &format!("video-convert-{}", plan.video_id),
        )
        .await?;

        // 1. Download
        tracing::info!(video_id = %plan.video_id, key = %plan.source_key, "downloading video");
        let input = staging.file("input.mp4");
        self.storage
            .download(&plan.source_key, &input)
            .await
            .map_err(|source| MediaError::Fetch {
                key: plan.source_key.clone(),
                source,
            })?;

        // 2. Convert
        tracing::info!(video_id = %plan.video_id, format = %plan.target.format, "converting video");
        let output = staging.file(&format!("output.{}", plan.target.format.extension()));
        extract_audio(&self.runner, &input, &output, &plan.target).await?;

        // 3. Upload
        let key = plan.output_key();
        tracing::info!(video_id = %plan.video_id, key = %key, "uploading audio");
        self.storage
            .upload(&output, &key, plan.target.format.content_type())
            .await
            .map_err(|source| MediaError::Publish {
                key: key.clone(),
                source,
            })?;

        release(staging);
        let url = locator::public_url(&self.settings.public_base_url, &key);
        Ok(ConversionResult::uploaded(key, url))
    }
}
