//! Transformers
//!
//! A transformer derives named artifacts from a stored file. Each media
//! type gets at most one registered transformer; dispatch happens on the
//! file's media type.

pub mod document;
pub mod image;

pub use document::DocumentPreviewTransformer;
pub use image::ImageThumbTransformer;

use crate::error::TransformError;
use async_trait::async_trait;
use medialib_core::{File, MediaType, Transformation};
use std::collections::HashMap;
use std::sync::Arc;

/// A pipeline deriving artifacts from a source file.
///
/// `Ok(None)` means the file was examined and declined: wrong kind, or a
/// content-level failure that retrying cannot fix. `Err` is reserved for
/// infrastructure problems worth surfacing to a scheduler.
#[async_trait]
pub trait Transformer: Send + Sync {
    /// Name of the transformation this transformer produces.
    fn name(&self) -> &str;

    async fn transform(&self, file: &File) -> Result<Option<Transformation>, TransformError>;
}

/// Transformers keyed by the media type they handle.
#[derive(Default)]
pub struct TransformerRegistry {
    by_type: HashMap<MediaType, Arc<dyn Transformer>>,
}

impl TransformerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, media_type: MediaType, transformer: Arc<dyn Transformer>) {
        self.by_type.insert(media_type, transformer);
    }

    pub fn get(&self, media_type: MediaType) -> Option<Arc<dyn Transformer>> {
        self.by_type.get(&media_type).cloned()
    }
}
