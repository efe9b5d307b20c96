use crate::error::StorageError;
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StoragePort: Send + Sync {
    /// Download an object from storage to a local path
    async fn download(&self, key: &str, local_path: &Path) -> Result<(), StorageError>;

    /// Upload a file from a local path to storage
    async fn upload(
        &self,
        local_path: &Path,
        key: &str,
        content_type: &str,
    ) -> Result<(), StorageError>;
}

#[async_trait]
impl<T: StoragePort + ?Sized> StoragePort for Arc<T> {
    async fn download(&self, key: &str, local_path: &Path) -> Result<(), StorageError> {
        (**self).download(key, local_path).await
    }

    async fn upload(
        &self,
        local_path: &Path,
        key: &str,
        content_type: &str,
    ) -> Result<(), StorageError> {
        (**self).upload(local_path, key, content_type).await
    }
}
