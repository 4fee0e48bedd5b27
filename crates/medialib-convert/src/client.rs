//! Conversion service trait
//!
//! The pipeline drives a remote conversion through this trait and never
//! talks HTTP directly, which keeps the transformer testable against mock
//! implementations.

use crate::error::ConvertError;
use async_trait::async_trait;
use medialib_core::ConverterOptions;
use std::path::Path;
use std::time::Duration;

/// One conversion request: source format, target format, and where the
/// service can fetch the source bytes from.
#[derive(Debug, Clone)]
pub struct ConvertRequest {
    pub input_format: String,
    pub output_format: String,
    /// Address the service downloads the source from.
    pub source_url: String,
    pub options: ConverterOptions,
    /// Upper bound on the blocking wait. None applies the client default.
    pub timeout: Option<Duration>,
}

/// A remote job that reached the completed state.
#[derive(Debug, Clone)]
pub struct ConvertedJob {
    pub id: String,
    /// Address the converted bytes can be fetched from.
    pub output_url: String,
}

/// Remote conversion service abstraction
///
/// Implementations must be safe for concurrent use from independent
/// pipeline invocations.
#[async_trait]
pub trait ConversionService: Send + Sync {
    /// Submit a conversion and block until the remote job reaches a
    /// terminal state or the wait limit is exceeded.
    async fn convert(&self, request: &ConvertRequest) -> Result<ConvertedJob, ConvertError>;

    /// Download the converted bytes to a local path.
    async fn fetch(&self, job: &ConvertedJob, dest: &Path) -> Result<(), ConvertError>;

    /// Release the remote job artifact. Idempotent: deleting a job that is
    /// already gone succeeds.
    async fn delete(&self, job: &ConvertedJob) -> Result<(), ConvertError>;
}
