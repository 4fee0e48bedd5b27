//! Storage abstraction trait
//!
//! This module defines the Storage trait that all blob store backends must
//! implement, plus the error and result types shared by every backend.

use async_trait::async_trait;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Storage backend types
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    S3,
    Local,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "s3" => Ok(StorageBackend::S3),
            "local" => Ok(StorageBackend::Local),
            _ => Err(anyhow::anyhow!("Invalid storage backend: {}", s)),
        }
    }
}

impl Display for StorageBackend {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            StorageBackend::S3 => write!(f, "s3"),
            StorageBackend::Local => write!(f, "local"),
        }
    }
}

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Unknown disk: {0}")]
    UnknownDisk(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage abstraction trait
///
/// All storage backends (S3, local filesystem) must implement this trait.
/// Backends must be safe for concurrent use from independent pipeline
/// invocations writing distinct keys; no cross-invocation locking is
/// provided or required.
#[async_trait]
pub trait Storage: Send + Sync + std::fmt::Debug {
    /// Upload data under a storage key and return the public URL.
    async fn put(&self, key: &str, data: Vec<u8>, content_type: &str) -> StorageResult<String>;

    /// Download an object by its storage key.
    async fn download(&self, key: &str) -> StorageResult<Vec<u8>>;

    /// Delete an object by its storage key.
    async fn delete(&self, key: &str) -> StorageResult<()>;

    /// Check if an object exists.
    async fn exists(&self, key: &str) -> StorageResult<bool>;

    /// Get the size in bytes of an object, if it exists.
    async fn content_length(&self, key: &str) -> StorageResult<u64>;

    /// Generate a signed, expiring GET URL.
    ///
    /// `disposition` sets a signed `Content-Disposition` response override
    /// (forced download). Backends without signing support return a
    /// `ConfigError` when a disposition override is requested; see
    /// `supports_signing`.
    async fn presigned_url(
        &self,
        key: &str,
        expires_in: Duration,
        disposition: Option<&str>,
    ) -> StorageResult<String>;

    /// Whether this backend can sign URLs (and response-header overrides).
    fn supports_signing(&self) -> bool;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
