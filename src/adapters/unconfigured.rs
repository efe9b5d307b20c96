use crate::error::StorageError;
use crate::ports::storage::StoragePort;
use async_trait::async_trait;
use std::path::Path;

/// Stand-in used when no storage credentials were provided at startup.
/// The service runs, but every storage call fails.
#[derive(Clone, Copy, Debug, Default)]
pub struct UnconfiguredStorage;

#[async_trait]
impl StoragePort for UnconfiguredStorage {
    async fn download(&self, _key: &str, _local_path: &Path) -> Result<(), StorageError> {
        Err(StorageError::NotConfigured)
    }

    async fn upload(
        &self,
        _local_path: &Path,
        _key: &str,
        _content_type: &str,
    ) -> Result<(), StorageError> {
        Err(StorageError::NotConfigured)
    }
}
