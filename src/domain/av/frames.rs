//! Single still-frame extraction.

use super::check_output;
use crate::error::MediaError;
use crate::ports::media::MediaToolRunner;
use regex::Regex;
use std::ffi::OsString;
use std::path::Path;
use std::sync::LazyLock;

pub const DEFAULT_WIDTH: u32 = 320;
pub const DEFAULT_HEIGHT: u32 = 180;
pub const MAX_DIMENSION: u32 = 4096;
pub const DEFAULT_TIME_OFFSET: &str = "00:00:01";

// "5", "7.50", "00:00:05", "01:02:03.250"
static TIME_OFFSET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,6}(\.\d{1,3})?|\d{1,2}:[0-5]\d:[0-5]\d(\.\d{1,3})?)$")
        .expect("time offset pattern is valid")
});

/// Target box for an extracted frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameSpec {
    pub width: u32,
    pub height: u32,
}

impl Default for FrameSpec {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

impl FrameSpec {
    /// Absent or zero dimensions fall back to 320x180.
    pub fn from_request(width: Option<u32>, height: Option<u32>) -> Result<Self, MediaError> {
        let width = width.filter(|w| *w > 0).unwrap_or(DEFAULT_WIDTH);
        let height = height.filter(|h| *h > 0).unwrap_or(DEFAULT_HEIGHT);
        if width > MAX_DIMENSION || height > MAX_DIMENSION {
            return Err(MediaError::validation(format!(
                "Thumbnail size {}x{} exceeds {}x{}",
                width, height, MAX_DIMENSION, MAX_DIMENSION
            )));
        }
        Ok(Self { width, height })
    }

    /// Scale to fit inside the box keeping aspect ratio, then letterbox-pad to
    /// exactly fill it, centered.
    pub fn filter(&self) -> String {
        format!(
            "scale={w}:{h}:force_original_aspect_ratio=decrease,pad={w}:{h}:(ow-iw)/2:(oh-ih)/2",
            w = self.width,
            h = self.height
        )
    }
}

/// Validates a caller-provided seek offset, defaulting to one second in.
pub fn parse_time_offset(raw: Option<&str>) -> Result<String, MediaError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(DEFAULT_TIME_OFFSET.to_string()),
        Some(offset) if TIME_OFFSET.is_match(offset) => Ok(offset.to_string()),
        Some(offset) => Err(MediaError::validation(format!(
            "Invalid timeOffset: {}",
            offset
        ))),
    }
}

pub fn frame_args(input: &Path, offset: &str, spec: &FrameSpec, output: &Path) -> Vec<OsString> {
    vec![
        "-y".into(),
        "-ss".into(),
        offset.into(),
        "-i".into(),
        input.into(),
        "-vframes".into(),
        "1".into(),
        "-vf".into(),
        spec.filter().into(),
        "-q:v".into(),
        "2".into(),
        output.into(),
    ]
}

/// Seeks to `offset` and writes exactly one JPEG frame to `output`.
pub async fn extract_frame<R>(
    runner: &R,
    input: &Path,
    offset: &str,
    spec: &FrameSpec,
    output: &Path,
) -> Result<(), MediaError>
where
    R: MediaToolRunner + ?Sized,
{
    tracing::debug!(input = %input.display(), offset, "extracting frame");
    let result = runner.run_ffmpeg(frame_args(input, offset, spec, output)).await;
    check_output(
        &format!("ffmpeg frame extraction at {} failed", offset),
        result,
        Some(output),
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::av::tests::mock_output;
    use crate::ports::media::MockMediaToolRunner;
    use tempfile::tempdir;

    #[test]
    fn filter_letterboxes_to_exact_box() {
        let spec = FrameSpec {
            width: 640,
            height: 360,
        };
        assert_eq!(
            spec.filter(),
            "scale=640:360:force_original_aspect_ratio=decrease,pad=640:360:(ow-iw)/2:(oh-ih)/2"
        );
    }

    #[test]
    fn frame_spec_defaults_and_limits() {
        assert_eq!(FrameSpec::from_request(None, None).unwrap(), FrameSpec::default());
        assert_eq!(
            FrameSpec::from_request(Some(0), Some(240)).unwrap(),
            FrameSpec {
                width: 320,
                height: 240
            }
        );
        assert!(FrameSpec::from_request(Some(8000), None).is_err());
    }

    #[test]
    fn time_offsets() {
        assert_eq!(parse_time_offset(None).unwrap(), "00:00:01");
        assert_eq!(parse_time_offset(Some("  ")).unwrap(), "00:00:01");
        assert_eq!(parse_time_offset(Some("5")).unwrap(), "5");
        assert_eq!(parse_time_offset(Some("7.50")).unwrap(), "7.50");
        assert_eq!(parse_time_offset(Some("00:01:30")).unwrap(), "00:01:30");
        assert!(parse_time_offset(Some("-5")).is_err());
        assert!(parse_time_offset(Some("00:99:00")).is_err());
        assert!(parse_time_offset(Some("5; rm -rf /")).is_err());
    }

    #[test]
    fn frame_args_seek_before_input() {
        let args: Vec<String> = frame_args(
            Path::new("in.mp4"),
            "15.00",
            &FrameSpec::default(),
            Path::new("thumb.jpg"),
        )
        .iter()
        .map(|a| a.to_string_lossy().into_owned())
        .collect();
        assert_eq!(&args[..5], &["-y", "-ss", "15.00", "-i", "in.mp4"]);
        assert_eq!(args.last().map(String::as_str), Some("thumb.jpg"));
        assert!(args.windows(2).any(|w| w[0] == "-vframes" && w[1] == "1"));
    }

    #[tokio::test]
    async fn extract_frame_reports_failure_with_offset() {
        let mut runner = MockMediaToolRunner::new();
        runner
            .expect_run_ffmpeg()
            .times(1)
            .returning(|_| mock_output("", "Output file is empty, nothing was encoded", false));

        let dir = tempdir().unwrap();
        let err = extract_frame(
            &runner,
            Path::new("in.mp4"),
            "99.00",
            &FrameSpec::default(),
            &dir.path().join("thumb.jpg"),
        )
        .await
        .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("99.00"));
        assert!(message.contains("nothing was encoded"));
    }
}
