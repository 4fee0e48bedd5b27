//! Medialib Processing Library
//!
//! The transformation pipeline: transformers derive named artifacts
//! (previews, thumbnails) from a stored file, and URL generators map a
//! file/transformation pair to an externally resolvable address under a
//! delivery policy. Storage backends, the conversion service, and the
//! relational store are consumed through traits so independent pipeline
//! invocations can run concurrently against shared adapters.

pub mod error;
pub mod image_ops;
pub mod persist;
pub mod temp;
pub mod test_helpers;
pub mod transformers;
pub mod urls;

// Re-export commonly used types
pub use error::TransformError;
pub use image_ops::DecodedImage;
pub use persist::{MemoryTransformationStore, TransformationStore};
pub use temp::ScratchFile;
pub use transformers::{
    DocumentPreviewTransformer, ImageThumbTransformer, Transformer, TransformerRegistry,
};
pub use urls::{
    LocalUrlGenerator, S3PresignedUrlGenerator, S3UrlConfig, S3UrlGenerator, UrlError,
    UrlGenerator, UrlGeneratorRegistry,
};
