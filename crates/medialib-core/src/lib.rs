//! Medialib Core Library
//!
//! This crate provides the domain models and configuration shared by the
//! transformation pipeline and URL generation: `File`, `Transformation`,
//! `MediaType`, and the validated per-pipeline config structs.

pub mod config;
pub mod models;

// Re-export commonly used types
pub use config::{ConverterOptions, DocumentPreviewConfig, ThumbConfig};
pub use models::file::{File, MediaType};
pub use models::transformation::{
    Transformation, TRANSFORMATION_PREVIEW, TRANSFORMATION_THUMB, TRANSFORMATION_UPLOAD,
};
