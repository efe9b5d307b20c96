use crate::config::ServiceConfig;
use crate::ports::media::MediaToolRunner;
use async_trait::async_trait;
use std::ffi::OsString;
use std::io;
use std::process::{Output, Stdio};
use std::time::Duration;
use tokio::process::Command;

/// Runs the `ffmpeg`/`ffprobe` binaries as child processes.
///
/// Children are killed when the waiting future is dropped, so an abandoned
/// request does not leave the tool running. An optional timeout kills the
/// child and reports `ErrorKind::TimedOut`.
#[derive(Clone, Debug)]
pub struct FfmpegCli {
    ffmpeg: String,
    ffprobe: String,
    timeout: Option<Duration>,
}

impl FfmpegCli {
    pub fn new(ffmpeg: impl Into<String>, ffprobe: impl Into<String>) -> Self {
        Self {
            ffmpeg: ffmpeg.into(),
            ffprobe: ffprobe.into(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn from_config(config: &ServiceConfig) -> Self {
        Self::new(&config.ffmpeg_path, &config.ffprobe_path).with_timeout(config.tool_timeout)
    }

    async fn run(&self, program: &str, args: Vec<OsString>) -> io::Result<Output> {
        let mut command = Command::new(program);
        command
            .args(&args)
            .stdin(Stdio::null())
            .kill_on_drop(true);

        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, command.output())
                .await
                .map_err(|_| {
                    tracing::warn!(program, timeout_secs = limit.as_secs_f64(), "tool timed out");
                    io::Error::new(
                        io::ErrorKind::TimedOut,
                        format!("{} timed out after {:?}", program, limit),
                    )
                })?,
            None => command.output().await,
        }
    }
}

#[async_trait]
impl MediaToolRunner for FfmpegCli {
    async fn run_ffmpeg(&self, args: Vec<OsString>) -> io::Result<Output> {
        self.run(&self.ffmpeg, args).await
    }

    async fn run_ffprobe(&self, args: Vec<OsString>) -> io::Result<Output> {
        self.run(&self.ffprobe, args).await
    }
}
