//! Transformation error types
//!
//! Content-level conversion failures never surface as errors: the pipeline
//! absorbs them and returns an empty result. Everything that does surface
//! carries a retryability flag so a calling scheduler can decide between
//! requeueing and giving up.

use medialib_convert::ConvertError;
use medialib_storage::StorageError;
use thiserror::Error;

/// Errors escaping a transformer invocation
#[derive(Debug, Error)]
pub enum TransformError {
    #[error(transparent)]
    Convert(#[from] ConvertError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Image processing error: {0}")]
    ImageProcessing(#[source] anyhow::Error),

    #[error("Failed to persist transformation: {0}")]
    Persist(#[source] anyhow::Error),

    #[error("Invalid file: {0}")]
    InvalidFile(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl TransformError {
    /// Whether a caller should schedule a retry for this error.
    ///
    /// Configuration-shaped problems (unknown disk, invalid file record)
    /// will not fix themselves; everything infrastructure-shaped will be
    /// retried. Decode failures after a successful conversion count as
    /// infrastructure (a truncated download, not a bad source).
    pub fn is_retryable(&self) -> bool {
        match self {
            TransformError::Convert(e) => e.is_retryable(),
            TransformError::Storage(e) => !matches!(
                e,
                StorageError::UnknownDisk(_)
                    | StorageError::InvalidKey(_)
                    | StorageError::ConfigError(_)
            ),
            TransformError::ImageProcessing(_) => true,
            TransformError::Persist(_) => true,
            TransformError::InvalidFile(_) => false,
            TransformError::Io(_) => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_convert_classification_passes_through() {
        let err = TransformError::from(ConvertError::Timeout(Duration::from_secs(30)));
        assert!(err.is_retryable());
    }

    #[test]
    fn test_config_shaped_errors_are_not_retryable() {
        let err = TransformError::from(StorageError::UnknownDisk("media".to_string()));
        assert!(!err.is_retryable());

        let err = TransformError::InvalidFile("no extension".to_string());
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_decode_failure_is_retryable() {
        let err = TransformError::ImageProcessing(anyhow::anyhow!("truncated file"));
        assert!(err.is_retryable());
    }
}
