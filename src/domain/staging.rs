//! Request-scoped temporary directories.

use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A uniquely named directory that owns every temporary file of one request.
///
/// The directory and its contents are removed when the value is dropped, so
/// early returns and `?` propagation clean up the same way as success.
#[derive(Debug)]
pub struct StagingArea {
    dir: TempDir,
}

impl StagingArea {
    /// Creates `<root>/<prefix>-XXXXXX`. `root` is created if missing.
    pub async fn create(root: &Path, prefix: &str) -> io::Result<Self> {
        let root = root.to_path_buf();
        let prefix = format!("{}-", prefix);
        let dir = tokio::task::spawn_blocking(move || {
            std::fs::create_dir_all(&root)?;
            tempfile::Builder::new().prefix(&prefix).tempdir_in(&root)
        })
        .await
        .map_err(io::Error::other)??;
        tracing::debug!(path = %dir.path().display(), "created staging area");
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Path of a file inside the staging area. `name` must be a plain file name.
    pub fn file(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Removes the directory now, reporting failures instead of ignoring them.
    pub fn close(self) -> io::Result<()> {
        let path = self.dir.path().to_path_buf();
        self.dir.close()?;
        tracing::debug!(path = %path.display(), "removed staging area");
        Ok(())
    }
}
