use super::PipelineSettings;
use crate::domain::av::audio::extract_audio;
use crate::domain::requests::{TranscodeRequest, TranscodedAudio};
use crate::domain::staging::StagingArea;
use crate::error::MediaError;
use crate::ports::media::MediaToolRunner;
use std::path::Path;

/// Transcodes an uploaded file and hands the bytes back to the caller.
/// Nothing is persisted.
pub struct TranscoderService<R> {
    runner: R,
    settings: PipelineSettings,
}

impl<R> TranscoderService<R>
where
    R: MediaToolRunner,
{
    pub fn new(runner: R, settings: PipelineSettings) -> Self {
        Self { runner, settings }
    }

    /// Staging area the caller writes the upload into before [`Self::transcode`].
    pub async fn stage(&self) -> Result<StagingArea, MediaError> {
        Ok(StagingArea::create(&self.settings.staging_root, "audio-transcode").await?)
    }

    pub async fn transcode(
        &self,
        staging: &StagingArea,
        input: &Path,
        request: &TranscodeRequest,
    ) -> Result<TranscodedAudio, MediaError> {
        let plan = request.validate()?;

        tracing::info!(format = %plan.target.format, "transcoding upload");
        let output = staging.file(&format!("output.{}", plan.target.format.extension()));
        extract_audio(&self.runner, input, &output, &plan.target).await?;

        let bytes = tokio::fs::read(&output).await?;
        tracing::info!(bytes = bytes.len(), file = %plan.download_name, "transcoded");
        Ok(TranscodedAudio {
            bytes,
            content_type: plan.target.format.content_type(),
            file_name: plan.download_name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::tests::{settings, staging_is_empty};
    use crate::domain::av::tests::mock_output;
    use crate::ports::media::MockMediaToolRunner;
    use tempfile::tempdir;

    #[tokio::test]
    async fn returns_transcoded_bytes() {
        let root = tempdir().unwrap();
        let mut runner = MockMediaToolRunner::new();
        runner
            .expect_run_ffmpeg()
            .withf(|args| args.iter().any(|a| a == "libvorbis"))
            .times(1)
            .returning(|args| {
                std::fs::write(args.last().unwrap(), b"OggS").unwrap();
                mock_output("", "", true)
            });

        let service = TranscoderService::new(runner, settings(root.path()));
        let staging = service.stage().await.unwrap();
        let input = staging.file("upload");
        std::fs::write(&input, b"RIFF").unwrap();

        let request = TranscodeRequest {
            format: Some("ogg".into()),
            file_name: Some("voice.wav".into()),
            ..Default::default()
        };
        let audio = service.transcode(&staging, &input, &request).await.unwrap();
        assert_eq!(audio.bytes, b"OggS");
        assert_eq!(audio.content_type, "audio/ogg");
        assert_eq!(audio.file_name, "voice.ogg");

        drop(staging);
        assert!(staging_is_empty(root.path()));
    }

    #[tokio::test]
    async fn invalid_format_never_runs_tool() {
        let root = tempdir().unwrap();
        let mut runner = MockMediaToolRunner::new();
        runner.expect_run_ffmpeg().times(0);

        let service = TranscoderService::new(runner, settings(root.path()));
        let staging = service.stage().await.unwrap();
        let request = TranscodeRequest {
            format: Some("midi".into()),
            ..Default::default()
        };
        let err = service
            .transcode(&staging, &staging.file("upload"), &request)
            .await
            .unwrap_err();
        assert!(matches!(err, MediaError::Validation(_)));
    }
}
