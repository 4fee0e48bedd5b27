//! Medialib Conversion Client
//!
//! This crate wraps the remote, asynchronous document/format conversion
//! service behind the `ConversionService` trait: submit a job and block
//! until it reaches a terminal state, fetch the converted bytes to a local
//! path, and release the remote job. Errors are classified so callers can
//! tell a content-level conversion failure (the input itself cannot be
//! converted, not worth retrying) from retryable transport, timeout, and
//! service-availability failures.

pub mod client;
pub mod error;
pub mod http;

pub use client::{ConversionService, ConvertRequest, ConvertedJob};
pub use error::ConvertError;
pub use http::HttpConversionClient;
