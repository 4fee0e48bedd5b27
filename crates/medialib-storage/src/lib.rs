//! Medialib Storage Library
//!
//! This crate provides the blob store abstraction the transformation
//! pipeline writes through. It includes the Storage trait, implementations
//! for S3 and local filesystem, and the disk registry that resolves a
//! file's `disk` identifier to a backend instance.
//!
//! # Storage key format
//!
//! Keys are derived by the owning `File` as `{file_id}/{name}.{extension}`
//! under a flat namespace. Backends accept arbitrary string keys; keys must
//! not contain `..` or a leading `/`.

#[cfg(feature = "storage-local")]
pub mod local;
pub mod registry;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
pub use registry::DiskRegistry;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{Storage, StorageBackend, StorageError, StorageResult};
