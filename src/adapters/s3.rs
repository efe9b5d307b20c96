use crate::config::StorageConfig;
use crate::error::StorageError;
use crate::ports::storage::StoragePort;
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use std::path::Path;
use tokio::io::AsyncWriteExt;

/// S3Adapter implements StoragePort for any S3-compatible bucket (AWS S3, R2, MinIO).
#[derive(Clone)]
pub struct S3Adapter {
    client: Client,
    bucket: String,
}

impl S3Adapter {
    pub fn new(client: Client, bucket: String) -> Self {
        Self { client, bucket }
    }

    /// Builds a client from static credentials. Returns `None` when the
    /// configuration lacks credentials or an endpoint.
    pub async fn connect(config: &StorageConfig) -> Option<Self> {
        let credentials = config.credentials()?;
        let endpoint = config.endpoint_url()?;

        let provider = Credentials::new(
            credentials.access_key_id,
            credentials.secret_access_key,
            None,
            None,
            "static",
        );
        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new("auto"))
            .credentials_provider(provider)
            .endpoint_url(&endpoint)
            .load()
            .await;

        // R2 and most S3-compatible endpoints need path-style addressing
        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(true)
            .build();

        Some(Self::new(Client::from_conf(s3_config), config.bucket.clone()))
    }
}

#[async_trait]
impl StoragePort for S3Adapter {
    async fn download(&self, key: &str, local_path: &Path) -> Result<(), StorageError> {
        let resp = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|err| {
                let err = err.into_service_error();
                if err.is_no_such_key() {
                    StorageError::NotFound(key.to_string())
                } else {
                    StorageError::Backend(DisplayErrorContext(&err).to_string())
                }
            })?;

        let reader = resp.body.into_async_read();
        futures::pin_mut!(reader);
        let mut file = tokio::fs::File::create(local_path).await?;
        tokio::io::copy(&mut reader, &mut file).await?;
        file.flush().await?;
        Ok(())
    }

    async fn upload(
        &self,
        local_path: &Path,
        key: &str,
        content_type: &str,
    ) -> Result<(), StorageError> {
        let body = ByteStream::from_path(local_path)
            .await
            .map_err(|e| StorageError::Backend(e.to_string()))?;

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(body)
            .send()
            .await
            .map_err(|err| StorageError::Backend(DisplayErrorContext(&err).to_string()))?;
        Ok(())
    }
}
