//! Audio/Video domain modules.
//!
//! Each module owns the fixed argument template for one external tool
//! operation and interprets the tool's exit status.

pub mod audio;
pub mod frames;
pub mod probe;
pub mod sampling;

use crate::error::MediaError;
use std::io;
use std::path::Path;
use std::process::Output;

pub const DEFAULT_SAMPLE_RATE: u32 = 44100;

/// Combined stdout/stderr text of a finished tool invocation.
pub fn diagnostics(output: &Output) -> String {
    [&output.stderr, &output.stdout]
        .iter()
        .map(|stream| String::from_utf8_lossy(stream).trim().to_string())
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Turns a tool invocation into a result. A zero exit only counts as success
/// when `produced` (if given) exists and is non-empty.
pub(crate) async fn check_output(
    context: &str,
    result: io::Result<Output>,
    produced: Option<&Path>,
) -> Result<(), MediaError> {
    let output = result
        .map_err(|e| MediaError::transform(context, format!("could not run tool: {}", e)))?;

    if !output.status.success() {
        let text = diagnostics(&output);
        tracing::warn!(status = %output.status, diagnostics = %text, "{}", context);
        return Err(MediaError::transform(
            format!("{} ({})", context, output.status),
            text,
        ));
    }

    if let Some(path) = produced {
        let written = tokio::fs::metadata(path)
            .await
            .map(|meta| meta.len() > 0)
            .unwrap_or(false);
        if !written {
            return Err(MediaError::transform(
                context,
                format!("no output written to {}", path.display()),
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::os::unix::process::ExitStatusExt;
    use std::process::ExitStatus;
    use tempfile::tempdir;

    pub(crate) fn mock_output(stdout: &str, stderr: &str, success: bool) -> io::Result<Output> {
        Ok(Output {
            status: if success {
                ExitStatus::from_raw(0)
            } else {
                // raw wait status: exit code 1
                ExitStatus::from_raw(1 << 8)
            },
            stdout: stdout.as_bytes().to_vec(),
            stderr: stderr.as_bytes().to_vec(),
        })
    }

    #[test]
    fn diagnostics_combines_both_streams() {
        let output = mock_output("progress line\n", "fatal: bad codec\n", false).unwrap();
        assert_eq!(diagnostics(&output), "fatal: bad codec\nprogress line");
    }

    #[tokio::test]
    async fn spawn_failure_is_transform_error() {
        let result = Err(io::Error::new(io::ErrorKind::NotFound, "ffmpeg not found"));
        let err = check_output("ffmpeg failed", result, None).await.unwrap_err();
        assert!(matches!(err, MediaError::Transform { .. }));
        assert!(err.to_string().contains("ffmpeg not found"));
    }

    #[tokio::test]
    async fn nonzero_exit_carries_status_and_text() {
        let err = check_output("ffmpeg failed", mock_output("", "boom", false), None)
            .await
            .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("exit status: 1"), "{}", message);
        assert!(message.contains("boom"));
    }

    #[tokio::test]
    async fn zero_exit_without_output_file_fails() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("never.jpg");
        let err = check_output("ffmpeg failed", mock_output("", "", true), Some(&missing))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("no output written"));

        let empty = dir.path().join("empty.jpg");
        std::fs::write(&empty, b"").unwrap();
        assert!(check_output("ffmpeg failed", mock_output("", "", true), Some(&empty))
            .await
            .is_err());
    }
}
