//! URL generators
//!
//! A URL generator maps a file and an optional transformation to an
//! externally resolvable address. All generators share one target
//! resolution rule; what differs is how the resolved storage path becomes
//! a URL and which delivery options the backend can honor. Unsupported
//! options fail fast rather than degrade silently.

pub mod local;
pub mod presigned;
pub mod s3;

pub use local::LocalUrlGenerator;
pub use presigned::S3PresignedUrlGenerator;
pub use s3::{S3UrlConfig, S3UrlGenerator};

use async_trait::async_trait;
use medialib_core::{File, MediaType, Transformation, TRANSFORMATION_PREVIEW, TRANSFORMATION_UPLOAD};
use medialib_storage::StorageError;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Preview artifacts are addressed with a fixed extension so links stay
/// stable across configuration changes.
const PREVIEW_URL_EXTENSION: &str = "jpg";

#[derive(Debug, Error)]
pub enum UrlError {
    /// The requested delivery option cannot be honored by this generator.
    #[error("Unsupported URL option: {0}")]
    UnsupportedOption(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Resolve the `(name, extension)` the URL should address.
///
/// A given transformation wins outright. Otherwise `full_preview` on a
/// non-image file addresses the conventional preview artifact; everything
/// else addresses the original upload.
pub fn resolve_target(
    file: &File,
    transformation: Option<&Transformation>,
    full_preview: bool,
) -> (String, String) {
    if let Some(t) = transformation {
        return (t.name.clone(), t.extension.clone());
    }

    if full_preview && file.media_type != MediaType::Image {
        return (
            TRANSFORMATION_PREVIEW.to_string(),
            PREVIEW_URL_EXTENSION.to_string(),
        );
    }

    (TRANSFORMATION_UPLOAD.to_string(), file.extension.clone())
}

/// Maps files and transformations to externally resolvable URLs.
#[async_trait]
pub trait UrlGenerator: Send + Sync {
    /// Build a URL for a file, or for one of its transformations.
    ///
    /// `full_preview` swaps a non-image upload for its preview artifact.
    /// `download` requests a forced-download delivery; generators that
    /// cannot express it return `UnsupportedOption`.
    async fn url_for_transformation(
        &self,
        file: &File,
        transformation: Option<&Transformation>,
        full_preview: bool,
        download: bool,
    ) -> Result<String, UrlError>;

    /// Whether this generator can express forced-download delivery.
    fn supports_forced_download(&self) -> bool {
        false
    }
}

/// Generators keyed by a delivery policy name.
#[derive(Default)]
pub struct UrlGeneratorRegistry {
    generators: HashMap<String, Arc<dyn UrlGenerator>>,
}

impl UrlGeneratorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: impl Into<String>, generator: Arc<dyn UrlGenerator>) {
        self.generators.insert(name.into(), generator);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn UrlGenerator>> {
        self.generators.get(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use medialib_core::TRANSFORMATION_THUMB;
    use uuid::Uuid;

    fn file_of(media_type: MediaType, extension: &str) -> File {
        File {
            id: Uuid::new_v4(),
            disk: "media".to_string(),
            extension: extension.to_string(),
            media_type,
            download_url: "https://media.example.com/source".to_string(),
        }
    }

    fn thumb() -> Transformation {
        Transformation {
            name: TRANSFORMATION_THUMB.to_string(),
            media_type: MediaType::Image,
            extension: "png".to_string(),
            mime_type: "image/png".to_string(),
            width: Some(200),
            height: Some(120),
            size: 4096,
            completed: true,
        }
    }

    #[test]
    fn test_transformation_wins() {
        let file = file_of(MediaType::Document, "docx");
        let t = thumb();

        let (name, ext) = resolve_target(&file, Some(&t), true);
        assert_eq!((name.as_str(), ext.as_str()), ("thumb", "png"));
    }

    #[test]
    fn test_full_preview_swaps_non_image_for_preview() {
        let file = file_of(MediaType::Document, "docx");

        let (name, ext) = resolve_target(&file, None, true);
        assert_eq!((name.as_str(), ext.as_str()), ("preview", "jpg"));
    }

    #[test]
    fn test_full_preview_on_image_keeps_upload() {
        let file = file_of(MediaType::Image, "png");

        let (name, ext) = resolve_target(&file, None, true);
        assert_eq!((name.as_str(), ext.as_str()), ("upload", "png"));
    }

    #[test]
    fn test_default_is_upload() {
        let file = file_of(MediaType::Document, "docx");

        let (name, ext) = resolve_target(&file, None, false);
        assert_eq!((name.as_str(), ext.as_str()), ("upload", "docx"));
    }
}
