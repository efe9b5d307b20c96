//! VidTalk media services library
//!
//! Hexagonal Architecture:
//! - domain/: Pure business logic (requests, locators, staging, av argument templates, sampling)
//! - ports/: Trait definitions (storage, external media tool)
//! - adapters/: Concrete implementations (S3, filesystem, ffmpeg CLI, HTTP)
//! - application/: Request pipelines (convert, thumbnail, transcode)
//! - config: Environment configuration
//!
//! # Features
//! - `s3`: S3-compatible object storage adapter (enabled by default). Without it
//!   every binary starts with an unconfigured storage handle.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod ports;
pub mod telemetry;

pub use config::{ServiceConfig, StorageConfig};
pub use error::{MediaError, StorageError};
