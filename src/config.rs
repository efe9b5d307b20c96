//! Configuration shared by the three service binaries.

use crate::domain::policy::BatchPolicy;
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_BUCKET: &str = "vidtalk";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 512 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} has an invalid value {value:?}: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Static credentials for the S3-compatible bucket.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
}

/// Object storage settings. Every field may be absent; the services still start.
#[derive(Clone, Debug, Default)]
pub struct StorageConfig {
    /// Cloudflare account id, used to derive the R2 endpoint
    pub account_id: Option<String>,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub bucket: String,
    /// Explicit endpoint, overrides the one derived from `account_id`
    pub endpoint: Option<String>,
    /// Base URL prepended to keys in returned locators
    pub public_url: Option<String>,
    /// Serve the bucket from a local directory instead of object storage
    pub local_dir: Option<PathBuf>,
}

impl StorageConfig {
    /// Endpoint to reach the bucket, if one can be determined.
    pub fn endpoint_url(&self) -> Option<String> {
        self.endpoint.clone().or_else(|| {
            self.account_id
                .as_ref()
                .map(|account| format!("https://{}.r2.cloudflarestorage.com", account))
        })
    }

    /// Returns credentials only when the account and both keys are present.
    pub fn credentials(&self) -> Option<Credentials> {
        match (&self.access_key_id, &self.secret_access_key) {
            (Some(access), Some(secret)) if self.endpoint_url().is_some() => Some(Credentials {
                access_key_id: access.clone(),
                secret_access_key: secret.clone(),
            }),
            _ => None,
        }
    }

    /// Base for public locators, without a trailing slash.
    pub fn public_base_url(&self) -> String {
        let base = self
            .public_url
            .clone()
            .or_else(|| self.endpoint_url())
            .unwrap_or_default();
        base.trim_end_matches('/').to_string()
    }
}

/// Configuration for one service process, read once at startup.
#[derive(Clone, Debug)]
pub struct ServiceConfig {
    /// HTTP server bind address
    pub addr: String,
    /// HTTP server port
    pub port: u16,
    pub storage: StorageConfig,
    pub ffmpeg_path: String,
    pub ffprobe_path: String,
    /// Parent directory for per-request staging areas
    pub staging_root: PathBuf,
    /// Kill the external tool after this long, if set
    pub tool_timeout: Option<Duration>,
    /// Request body limit for multipart uploads
    pub max_upload_bytes: usize,
    pub batch_policy: BatchPolicy,
    /// Path segment marking the start of a storage key inside a URL
    pub source_key_segment: String,
}

impl ServiceConfig {
    /// Load configuration from environment variables (and `.env` if present).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let port = match var("PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|e| ConfigError::Invalid {
                name: "PORT",
                value: raw.clone(),
                reason: e.to_string(),
            })?,
            None => 8080,
        };

        let tool_timeout = match var("MEDIA_TOOL_TIMEOUT_SECS") {
            Some(raw) => {
                let secs = raw.parse::<u64>().map_err(|e| ConfigError::Invalid {
                    name: "MEDIA_TOOL_TIMEOUT_SECS",
                    value: raw.clone(),
                    reason: e.to_string(),
                })?;
                (secs > 0).then(|| Duration::from_secs(secs))
            }
            None => None,
        };

        let max_upload_bytes = match var("MAX_UPLOAD_BYTES") {
            Some(raw) => raw.parse::<usize>().map_err(|e| ConfigError::Invalid {
                name: "MAX_UPLOAD_BYTES",
                value: raw.clone(),
                reason: e.to_string(),
            })?,
            None => DEFAULT_MAX_UPLOAD_BYTES,
        };

        let batch_policy = match var("THUMBNAIL_BATCH_POLICY") {
            Some(raw) => raw.parse::<BatchPolicy>().map_err(|reason| ConfigError::Invalid {
                name: "THUMBNAIL_BATCH_POLICY",
                value: raw.clone(),
                reason,
            })?,
            None => BatchPolicy::default(),
        };

        let storage = StorageConfig {
            account_id: var("R2_ACCOUNT_ID").or_else(|| var("CLOUDFLARE_ACCOUNT_ID")),
            access_key_id: var("R2_ACCESS_KEY_ID"),
            secret_access_key: var("R2_SECRET_ACCESS_KEY"),
            bucket: var("R2_BUCKET_NAME")
                .or_else(|| var("R2_BUCKET"))
                .unwrap_or_else(|| String::from(DEFAULT_BUCKET)),
            endpoint: var("R2_ENDPOINT"),
            public_url: var("R2_PUBLIC_URL"),
            local_dir: var("LOCAL_STORAGE_DIR").map(PathBuf::from),
        };

        Ok(Self {
            addr: var("ADDR").unwrap_or_else(|| String::from("0.0.0.0")),
            port,
            storage,
            ffmpeg_path: var("FFMPEG_PATH").unwrap_or_else(|| String::from("ffmpeg")),
            ffprobe_path: var("FFPROBE_PATH").unwrap_or_else(|| String::from("ffprobe")),
            staging_root: var("STAGING_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(env::temp_dir),
            tool_timeout,
            max_upload_bytes,
            batch_policy,
            source_key_segment: var("SOURCE_KEY_SEGMENT")
                .unwrap_or_else(|| String::from("videos")),
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.addr, self.port)
    }
}
