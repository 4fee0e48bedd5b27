//! Image thumbnail pipeline
//!
//! Derives a named thumbnail from an already stored image. No remote
//! conversion is involved: the upload bytes are downloaded, resized and
//! re-encoded locally in the sniffed source format.

use crate::error::TransformError;
use crate::image_ops::DecodedImage;
use crate::temp::ScratchFile;
use crate::transformers::Transformer;
use async_trait::async_trait;
use medialib_core::{File, MediaType, ThumbConfig, Transformation};
use medialib_storage::DiskRegistry;
use std::sync::Arc;
use std::time::Instant;

/// Derives a named thumbnail from an image file.
pub struct ImageThumbTransformer {
    name: String,
    config: ThumbConfig,
    disks: Arc<DiskRegistry>,
}

impl ImageThumbTransformer {
    pub fn new(
        name: impl Into<String>,
        config: ThumbConfig,
        disks: Arc<DiskRegistry>,
    ) -> Result<Self, anyhow::Error> {
        config.validate()?;
        Ok(Self {
            name: name.into(),
            config,
            disks,
        })
    }
}

#[async_trait]
impl Transformer for ImageThumbTransformer {
    fn name(&self) -> &str {
        &self.name
    }

    async fn transform(&self, file: &File) -> Result<Option<Transformation>, TransformError> {
        if file.media_type != MediaType::Image {
            return Ok(None);
        }
        file.validate()
            .map_err(|e| TransformError::InvalidFile(e.to_string()))?;

        let disk = self.disks.get(&file.disk)?;
        let started = Instant::now();

        let source_bytes = disk.download(&file.upload_key()).await?;

        let mut scratch = ScratchFile::acquire()?;
        std::fs::write(scratch.path(), &source_bytes)?;

        // A stored upload that does not decode is a content problem, not
        // an infrastructure one. Skip instead of retrying forever.
        let image = match DecodedImage::open(scratch.path()) {
            Ok(image) => image,
            Err(e) => {
                tracing::info!(
                    file_id = %file.id,
                    error = %e,
                    "Stored image cannot be decoded, skipping thumbnail"
                );
                return Ok(None);
            }
        };

        let resized = if self.config.fit {
            image.fit(self.config.width, self.config.height, self.config.upsize)
        } else {
            image.resize(
                self.config.width,
                self.config.height,
                self.config.aspect,
                self.config.upsize,
            )
        };

        resized
            .save(scratch.path())
            .map_err(TransformError::ImageProcessing)?;
        let thumb_bytes = std::fs::read(scratch.path())?;

        let thumb = Transformation {
            name: self.name.clone(),
            media_type: MediaType::Image,
            extension: file.extension.clone(),
            mime_type: image.mime_type().to_string(),
            width: Some(resized.width()),
            height: Some(resized.height()),
            size: thumb_bytes.len() as u64,
            completed: true,
        };
        disk.put(&file.path_for(&thumb), thumb_bytes, &thumb.mime_type)
            .await?;

        scratch.release();

        tracing::info!(
            file_id = %file.id,
            key = %file.path_for(&thumb),
            width = ?thumb.width,
            height = ?thumb.height,
            duration_ms = started.elapsed().as_millis() as u64,
            "Image thumbnail derived"
        );

        Ok(Some(thumb))
    }
}
