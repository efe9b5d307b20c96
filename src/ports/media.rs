use async_trait::async_trait;
use std::ffi::OsString;
use std::io;
use std::process::Output;

/// Runs the external media toolkit with an explicit argument list.
///
/// Implementations never go through a shell and wait for the process to exit.
/// Interpreting the exit status is left to the caller.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MediaToolRunner: Send + Sync {
    async fn run_ffmpeg(&self, args: Vec<OsString>) -> io::Result<Output>;
    async fn run_ffprobe(&self, args: Vec<OsString>) -> io::Result<Output>;
}
