//! Test doubles for the pipeline seams
//!
//! A scriptable conversion service plus small fixture builders. Exposed as
//! a regular module so integration tests and downstream crates can drive
//! the transformers without a network.

use async_trait::async_trait;
use image::{DynamicImage, ImageFormat, RgbaImage};
use medialib_convert::{ConversionService, ConvertError, ConvertRequest, ConvertedJob};
use std::io::Cursor;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Encode a blank RGBA image of the given size as PNG bytes.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = DynamicImage::ImageRgba8(RgbaImage::new(width, height));
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png).unwrap();
    buf.into_inner()
}

enum Outcome {
    /// Conversion succeeds; these bytes are written on fetch.
    Succeed(Vec<u8>),
    /// Conversion reports a content-level failure.
    FailContent(String),
    /// Conversion dies on an infrastructure problem.
    FailService,
}

/// Scriptable `ConversionService` double.
pub struct MockConversionService {
    outcome: Outcome,
    fetch_fails: bool,
    delete_fails: bool,
    deletes: AtomicUsize,
}

impl MockConversionService {
    pub fn succeed(output: Vec<u8>) -> Self {
        Self {
            outcome: Outcome::Succeed(output),
            fetch_fails: false,
            delete_fails: false,
            deletes: AtomicUsize::new(0),
        }
    }

    pub fn fail_content(message: impl Into<String>) -> Self {
        Self {
            outcome: Outcome::FailContent(message.into()),
            fetch_fails: false,
            delete_fails: false,
            deletes: AtomicUsize::new(0),
        }
    }

    pub fn fail_service() -> Self {
        Self {
            outcome: Outcome::FailService,
            fetch_fails: false,
            delete_fails: false,
            deletes: AtomicUsize::new(0),
        }
    }

    pub fn with_failing_fetch(mut self) -> Self {
        self.fetch_fails = true;
        self
    }

    pub fn with_failing_delete(mut self) -> Self {
        self.delete_fails = true;
        self
    }

    /// Number of delete calls received so far.
    pub fn delete_count(&self) -> usize {
        self.deletes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ConversionService for MockConversionService {
    async fn convert(&self, _request: &ConvertRequest) -> Result<ConvertedJob, ConvertError> {
        match &self.outcome {
            Outcome::Succeed(_) => Ok(ConvertedJob {
                id: "job-1".to_string(),
                output_url: "https://convert.example.com/out/job-1".to_string(),
            }),
            Outcome::FailContent(message) => {
                Err(ConvertError::ConversionFailed(message.clone()))
            }
            Outcome::FailService => Err(ConvertError::Service {
                status: 503,
                message: "service unavailable".to_string(),
            }),
        }
    }

    async fn fetch(&self, _job: &ConvertedJob, dest: &Path) -> Result<(), ConvertError> {
        if self.fetch_fails {
            return Err(ConvertError::Service {
                status: 502,
                message: "output download failed".to_string(),
            });
        }
        match &self.outcome {
            Outcome::Succeed(bytes) => {
                std::fs::write(dest, bytes)?;
                Ok(())
            }
            _ => Err(ConvertError::Service {
                status: 500,
                message: "no output to fetch".to_string(),
            }),
        }
    }

    async fn delete(&self, _job: &ConvertedJob) -> Result<(), ConvertError> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        if self.delete_fails {
            return Err(ConvertError::Service {
                status: 500,
                message: "delete failed".to_string(),
            });
        }
        Ok(())
    }
}
