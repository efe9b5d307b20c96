//! Container metadata inspection.

use super::{check_output, diagnostics};
use crate::error::MediaError;
use crate::ports::media::MediaToolRunner;
use std::ffi::OsString;
use std::path::Path;

pub fn duration_args(input: &Path) -> Vec<OsString> {
    vec![
        "-v".into(),
        "error".into(),
        "-show_entries".into(),
        "format=duration".into(),
        "-of".into(),
        "default=noprint_wrappers=1:nokey=1".into(),
        input.into(),
    ]
}

/// Parses the bare `format=duration` value printed by ffprobe.
pub fn parse_duration(stdout: &str) -> Result<f64, MediaError> {
    let raw = stdout.lines().map(str::trim).find(|l| !l.is_empty()).unwrap_or("");
    match raw.parse::<f64>() {
        Ok(duration) if duration.is_finite() && duration > 0.0 => Ok(duration),
        _ => Err(MediaError::transform(
            "ffprobe reported no usable duration",
            format!("{:?}", raw),
        )),
    }
}

/// Total duration of `input` in seconds.
pub async fn probe_duration<R>(runner: &R, input: &Path) -> Result<f64, MediaError>
where
    R: MediaToolRunner + ?Sized,
{
    let output = runner
        .run_ffprobe(duration_args(input))
        .await
        .map_err(|e| {
            MediaError::transform("failed to get video duration", format!("could not run tool: {}", e))
        })?;

    if !output.status.success() {
        return Err(MediaError::transform(
            format!("failed to get video duration ({})", output.status),
            diagnostics(&output),
        ));
    }

    let duration = parse_duration(&String::from_utf8_lossy(&output.stdout))?;
    tracing::debug!(input = %input.display(), duration, "probed duration");
    Ok(duration)
}

/// Runs `ffmpeg -version` and returns its first line.
pub async fn tool_version<R>(runner: &R) -> Result<String, MediaError>
where
    R: MediaToolRunner + ?Sized,
{
    let result = runner.run_ffmpeg(vec!["-version".into()]).await;
    let version = match &result {
        Ok(output) => String::from_utf8_lossy(&output.stdout)
            .lines()
            .next()
            .unwrap_or_default()
            .to_string(),
        Err(_) => String::new(),
    };
    check_output("ffmpeg not available", result, None).await?;
    Ok(version)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::av::tests::mock_output;
    use crate::ports::media::MockMediaToolRunner;
    use std::io;

    #[test]
    fn parses_plain_duration() {
        assert_eq!(parse_duration("30.000000\n").unwrap(), 30.0);
        assert_eq!(parse_duration("\n 12.5 \n").unwrap(), 12.5);
    }

    #[test]
    fn rejects_unusable_durations() {
        for raw in ["", "N/A", "0.000000", "-3", "inf", "NaN"] {
            assert!(parse_duration(raw).is_err(), "accepted {:?}", raw);
        }
    }

    #[tokio::test]
    async fn probe_duration_uses_ffprobe() {
        let mut runner = MockMediaToolRunner::new();
        runner
            .expect_run_ffprobe()
            .withf(|args| args.iter().any(|a| a == "format=duration"))
            .times(1)
            .returning(|_| mock_output("30.000000\n", "", true));
        runner.expect_run_ffmpeg().times(0);

        let duration = probe_duration(&runner, Path::new("in.mp4")).await.unwrap();
        assert_eq!(duration, 30.0);
    }

    #[tokio::test]
    async fn probe_failure_is_transform_error() {
        let mut runner = MockMediaToolRunner::new();
        runner
            .expect_run_ffprobe()
            .times(1)
            .returning(|_| mock_output("", "in.mp4: moov atom not found", false));

        let err = probe_duration(&runner, Path::new("in.mp4")).await.unwrap_err();
        assert!(matches!(err, MediaError::Transform { .. }));
        assert!(err.to_string().contains("moov atom not found"));
    }

    #[tokio::test]
    async fn version_reports_first_line() {
        let mut runner = MockMediaToolRunner::new();
        runner
            .expect_run_ffmpeg()
            .times(1)
            .returning(|_| mock_output("ffmpeg version 6.1.1\nbuilt with gcc\n", "", true));
        assert_eq!(tool_version(&runner).await.unwrap(), "ffmpeg version 6.1.1");

        let mut missing = MockMediaToolRunner::new();
        missing
            .expect_run_ffmpeg()
            .times(1)
            .returning(|_| Err(io::Error::new(io::ErrorKind::NotFound, "No such file")));
        assert!(tool_version(&missing).await.is_err());
    }
}
