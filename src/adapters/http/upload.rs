use crate::error::MediaError;
use axum::body::Bytes;
use axum::BoxError;
use futures::{Stream, TryStreamExt};
use std::io;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tokio_util::io::StreamReader;

/// Save a `Stream` of body chunks to a file without buffering it in memory.
pub(crate) async fn stream_to_file<S, E>(path: &Path, stream: S) -> Result<u64, MediaError>
where
    S: Stream<Item = Result<Bytes, E>>,
    E: Into<BoxError>,
{
    let body_with_io_error = stream.map_err(io::Error::other);
    let body_reader = StreamReader::new(body_with_io_error);
    futures::pin_mut!(body_reader);

    let mut file = BufWriter::new(File::create(path).await?);
    let written = tokio::io::copy(&mut body_reader, &mut file).await?;
    file.flush().await?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_stream_to_file() {
        let temp_dir = tempdir().unwrap();
        let file_path = temp_dir.path().join("upload");

        type E = std::io::Error;
        let chunks = vec![
            Ok::<Bytes, E>(Bytes::from_static(b"RIFF")),
            Ok(Bytes::from_static(b"WAVE")),
        ];

        let written = stream_to_file(&file_path, stream::iter(chunks)).await.unwrap();

        assert_eq!(written, 8);
        assert_eq!(std::fs::read(file_path).unwrap(), b"RIFFWAVE");
    }

    #[tokio::test]
    async fn test_stream_to_file_error() {
        let temp_dir = tempdir().unwrap();
        let file_path = temp_dir.path().join("upload");

        let mock_stream = stream::iter(vec![Err::<Bytes, _>("connection reset")]);
        let err = stream_to_file(&file_path, mock_stream).await.unwrap_err();

        assert!(matches!(err, MediaError::Io(_)));
        assert!(err.to_string().contains("connection reset"));
    }
}
