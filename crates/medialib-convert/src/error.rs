//! Conversion error types
//!
//! A conversion either fails because of the input itself (corrupt or
//! unsupported source, reported by the remote service as a failed job) or
//! because of infrastructure between us and the service. The first class is
//! permanent; everything else should be retried.

use std::time::Duration;
use thiserror::Error;

/// Conversion service errors
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The remote service reports the input could not be converted. Not
    /// retryable: the input will not get better on its own.
    #[error("Conversion failed: {0}")]
    ConversionFailed(String),

    /// The blocking wait exceeded its limit. Retryable.
    #[error("Conversion timed out after {0:?}")]
    Timeout(Duration),

    /// Request-level failure talking to the service. Retryable.
    #[error("Conversion service request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// The service answered with a non-success status. Retryable: covers
    /// unavailability, rate limiting, and auth failures.
    #[error("Conversion service returned {status}: {message}")]
    Service { status: u16, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConvertError {
    /// A content-level failure of the input itself.
    pub fn is_content_failure(&self) -> bool {
        matches!(self, ConvertError::ConversionFailed(_))
    }

    /// Whether a caller should schedule a retry for this error.
    pub fn is_retryable(&self) -> bool {
        !self.is_content_failure()
    }

    /// Classify a reqwest error, folding client-side timeouts into the
    /// timeout class.
    pub(crate) fn transport(err: reqwest::Error, wait: Duration) -> Self {
        if err.is_timeout() {
            ConvertError::Timeout(wait)
        } else {
            ConvertError::Transport(err)
        }
    }
}
