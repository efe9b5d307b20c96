//! Request and result envelopes for the three services.
//!
//! Request fields are all optional at the serde level so that a missing field
//! is reported as a validation error rather than a body rejection.

use super::av::audio::AudioTarget;
use super::av::frames::{parse_time_offset, FrameSpec};
use super::locator;
use crate::error::MediaError;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const MAX_THUMBNAIL_COUNT: u32 = 20;

fn required(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Body of `POST /process`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionRequest {
    pub video_id: Option<String>,
    /// Storage key, or a URL containing it
    pub video_url: Option<String>,
    /// Target audio format, `mp3` when absent
    pub format: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConversionPlan {
    pub video_id: String,
    pub source_key: String,
    pub target: AudioTarget,
}

impl ConversionPlan {
    /// `videos/<id>/audio.<ext>`
    pub fn output_key(&self) -> String {
        format!(
            "videos/{}/audio.{}",
            self.video_id,
            self.target.format.extension()
        )
    }
}

impl ConversionRequest {
    pub fn validate(&self, key_segment: &str) -> Result<ConversionPlan, MediaError> {
        let (video_id, video_url) = match (required(&self.video_id), required(&self.video_url)) {
            (Some(id), Some(url)) => (id, url),
            _ => return Err(MediaError::validation("Missing videoId or videoUrl")),
        };
        if !locator::is_safe_segment(video_id) {
            return Err(MediaError::validation("Invalid videoId"));
        }
        let target = AudioTarget::from_hints(self.format.as_deref(), None, None)?;

        Ok(ConversionPlan {
            video_id: video_id.to_string(),
            source_key: locator::extract_key(video_url, key_segment),
            target,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ConversionResult {
    pub fn uploaded(key: String, url: String) -> Self {
        Self {
            success: true,
            audio_key: Some(key),
            audio_url: Some(url),
            error: None,
        }
    }
}

/// Body of `POST /thumbnail`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThumbnailRequest {
    pub video_key: Option<String>,
    pub thumbnail_key: Option<String>,
    /// `SS`, `SS.fff` or `HH:MM:SS[.fff]`
    pub time_offset: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub count: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThumbnailMode {
    /// One frame at a fixed offset, no duration probe.
    Single { offset: String },
    /// `count` frames at evenly spaced interior offsets.
    Batch { count: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThumbnailPlan {
    pub video_key: String,
    pub output_key: String,
    pub frame: FrameSpec,
    pub mode: ThumbnailMode,
}

impl ThumbnailRequest {
    pub fn validate(&self) -> Result<ThumbnailPlan, MediaError> {
        let video_key = required(&self.video_key)
            .ok_or_else(|| MediaError::validation("videoKey is required"))?;
        let frame = FrameSpec::from_request(self.width, self.height)?;

        let count = self.count.unwrap_or(1);
        if count > MAX_THUMBNAIL_COUNT {
            return Err(MediaError::validation(format!(
                "count must be at most {}",
                MAX_THUMBNAIL_COUNT
            )));
        }
        let mode = if count > 1 {
            ThumbnailMode::Batch { count }
        } else {
            ThumbnailMode::Single {
                offset: parse_time_offset(self.time_offset.as_deref())?,
            }
        };

        let output_key = required(&self.thumbnail_key)
            .map(String::from)
            .unwrap_or_else(|| locator::default_thumbnail_key(video_key));

        Ok(ThumbnailPlan {
            video_key: video_key.to_string(),
            output_key,
            frame,
            mode,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThumbnailResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_keys: Option<Vec<String>>,
    /// Processing time in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ThumbnailResult {
    pub fn single(key: String, seconds: f64) -> Self {
        Self {
            success: true,
            thumbnail_key: Some(key),
            thumbnail_keys: None,
            duration: Some(seconds),
            error: None,
        }
    }

    pub fn batch(keys: Vec<String>, seconds: f64) -> Self {
        Self {
            success: true,
            thumbnail_key: None,
            thumbnail_keys: Some(keys),
            duration: Some(seconds),
            error: None,
        }
    }
}

/// Form fields of `POST /convert`, collected from the multipart body.
#[derive(Debug, Clone, Default)]
pub struct TranscodeRequest {
    pub format: Option<String>,
    pub bitrate: Option<String>,
    pub sample_rate: Option<String>,
    /// Client file name of the upload
    pub file_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TranscodePlan {
    pub target: AudioTarget,
    /// Value for the `Content-Disposition` filename
    pub download_name: String,
}

impl TranscodeRequest {
    pub fn validate(&self) -> Result<TranscodePlan, MediaError> {
        let target = AudioTarget::from_hints(
            self.format.as_deref(),
            self.bitrate.as_deref(),
            self.sample_rate.as_deref(),
        )?;
        let stem = self
            .file_name
            .as_deref()
            .and_then(|name| Path::new(name).file_stem())
            .and_then(|stem| stem.to_str())
            .map(sanitize_stem)
            .filter(|stem| !stem.is_empty())
            .unwrap_or_else(|| String::from("converted"));

        Ok(TranscodePlan {
            download_name: format!("{}.{}", stem, target.format.extension()),
            target,
        })
    }
}

/// Keeps characters that are safe inside a quoted header value.
fn sanitize_stem(stem: &str) -> String {
    stem.chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ' '))
        .take(100)
        .collect::<String>()
        .trim()
        .to_string()
}

/// Transcoded output returned directly as the response body.
#[derive(Debug, Clone)]
pub struct TranscodedAudio {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
    pub file_name: String,
}
