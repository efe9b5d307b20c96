//! Audio extraction and transcoding targets.

use super::{check_output, DEFAULT_SAMPLE_RATE};
use crate::error::MediaError;
use crate::ports::media::MediaToolRunner;
use regex::Regex;
use std::ffi::OsString;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::LazyLock;

const SUPPORTED_SAMPLE_RATES: &[u32] = &[8000, 16000, 22050, 24000, 32000, 44100, 48000];
// libopus only encodes at 48 kHz and its divisors
const OPUS_SAMPLE_RATES: &[u32] = &[8000, 12000, 16000, 24000, 48000];

static BITRATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[1-9][0-9]{1,3}k$").expect("bitrate pattern is valid"));

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AudioFormat {
    #[default]
    Mp3,
    Aac,
    M4a,
    Ogg,
    Opus,
    Flac,
    Wav,
}

impl AudioFormat {
    pub fn codec(self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "libmp3lame",
            AudioFormat::Aac | AudioFormat::M4a => "aac",
            AudioFormat::Ogg => "libvorbis",
            AudioFormat::Opus => "libopus",
            AudioFormat::Flac => "flac",
            AudioFormat::Wav => "pcm_s16le",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "audio/mpeg",
            AudioFormat::Aac => "audio/aac",
            AudioFormat::M4a => "audio/mp4",
            AudioFormat::Ogg => "audio/ogg",
            AudioFormat::Opus => "audio/opus",
            AudioFormat::Flac => "audio/flac",
            AudioFormat::Wav => "audio/wav",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "mp3",
            AudioFormat::Aac => "aac",
            AudioFormat::M4a => "m4a",
            AudioFormat::Ogg => "ogg",
            AudioFormat::Opus => "opus",
            AudioFormat::Flac => "flac",
            AudioFormat::Wav => "wav",
        }
    }

    /// Lossless and PCM outputs take no bitrate argument.
    pub fn default_bitrate(self) -> Option<&'static str> {
        match self {
            AudioFormat::Flac | AudioFormat::Wav => None,
            AudioFormat::Opus => Some("96k"),
            _ => Some("128k"),
        }
    }

    pub fn default_sample_rate(self) -> u32 {
        match self {
            AudioFormat::Opus => 48000,
            _ => DEFAULT_SAMPLE_RATE,
        }
    }

    /// Output rates the encoder accepts.
    pub fn supported_sample_rates(self) -> &'static [u32] {
        match self {
            AudioFormat::Opus => OPUS_SAMPLE_RATES,
            _ => SUPPORTED_SAMPLE_RATES,
        }
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for AudioFormat {
    type Err = MediaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mp3" | "mpeg" => Ok(AudioFormat::Mp3),
            "aac" => Ok(AudioFormat::Aac),
            "m4a" => Ok(AudioFormat::M4a),
            "ogg" | "vorbis" => Ok(AudioFormat::Ogg),
            "opus" => Ok(AudioFormat::Opus),
            "flac" => Ok(AudioFormat::Flac),
            "wav" | "wave" => Ok(AudioFormat::Wav),
            other => Err(MediaError::validation(format!(
                "Unsupported audio format: {}",
                other
            ))),
        }
    }
}

/// Fully resolved encoding parameters for one audio output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AudioTarget {
    pub format: AudioFormat,
    pub bitrate: Option<String>,
    pub sample_rate: u32,
}

impl AudioTarget {
    pub fn new(format: AudioFormat) -> Self {
        Self {
            format,
            bitrate: format.default_bitrate().map(String::from),
            sample_rate: format.default_sample_rate(),
        }
    }

    /// Resolve a target from optional caller hints, falling back to the format defaults.
    pub fn from_hints(
        format: Option<&str>,
        bitrate: Option<&str>,
        sample_rate: Option<&str>,
    ) -> Result<Self, MediaError> {
        let format = match format.map(str::trim).filter(|f| !f.is_empty()) {
            Some(hint) => hint.parse()?,
            None => AudioFormat::default(),
        };
        let mut target = Self::new(format);

        if let Some(raw) = bitrate.map(str::trim).filter(|b| !b.is_empty()) {
            if !BITRATE.is_match(raw) {
                return Err(MediaError::validation(format!("Invalid bitrate: {}", raw)));
            }
            if target.bitrate.is_some() {
                target.bitrate = Some(raw.to_string());
            }
        }

        if let Some(raw) = sample_rate.map(str::trim).filter(|r| !r.is_empty()) {
            let rate = raw
                .parse::<u32>()
                .ok()
                .filter(|rate| format.supported_sample_rates().contains(rate))
                .ok_or_else(|| {
                    MediaError::validation(format!(
                        "Invalid sample rate for {}: {}",
                        format, raw
                    ))
                })?;
            target.sample_rate = rate;
        }

        Ok(target)
    }
}

/// `ffmpeg -y -i <in> -vn -acodec <codec> [-ab <bitrate>] -ar <rate> <out>`
pub fn audio_args(input: &Path, output: &Path, target: &AudioTarget) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![
        "-y".into(),
        "-i".into(),
        input.into(),
        "-vn".into(),
        "-acodec".into(),
        target.format.codec().into(),
    ];
    if let Some(bitrate) = &target.bitrate {
        args.push("-ab".into());
        args.push(bitrate.into());
    }
    args.push("-ar".into());
    args.push(target.sample_rate.to_string().into());
    args.push(output.into());
    args
}

/// Drops the video streams of `input` and encodes its audio into `output`.
pub async fn extract_audio<R>(
    runner: &R,
    input: &Path,
    output: &Path,
    target: &AudioTarget,
) -> Result<(), MediaError>
where
    R: MediaToolRunner + ?Sized,
{
    tracing::debug!(input = %input.display(), format = %target.format, "extracting audio");
    let result = runner.run_ffmpeg(audio_args(input, output, target)).await;
    check_output("ffmpeg audio conversion failed", result, Some(output)).await
}
