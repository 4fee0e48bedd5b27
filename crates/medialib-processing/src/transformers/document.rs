//! Document preview pipeline
//!
//! Converts the first page of a stored document to an image through the
//! remote conversion service, persists the full-size preview immediately,
//! then derives and uploads a thumbnail from it. The remote job and the
//! local scratch file are released on every exit path.

use crate::error::TransformError;
use crate::image_ops::DecodedImage;
use crate::persist::TransformationStore;
use crate::temp::ScratchFile;
use crate::transformers::Transformer;
use async_trait::async_trait;
use medialib_convert::{ConversionService, ConvertRequest, ConvertedJob};
use medialib_core::{
    DocumentPreviewConfig, File, MediaType, Transformation, TRANSFORMATION_PREVIEW,
};
use medialib_storage::DiskRegistry;
use std::sync::Arc;
use std::time::Instant;

/// Derives a `preview` image plus a named thumbnail from a document file.
pub struct DocumentPreviewTransformer {
    name: String,
    config: DocumentPreviewConfig,
    converter: Arc<dyn ConversionService>,
    disks: Arc<DiskRegistry>,
    store: Arc<dyn TransformationStore>,
}

impl DocumentPreviewTransformer {
    pub fn new(
        name: impl Into<String>,
        config: DocumentPreviewConfig,
        converter: Arc<dyn ConversionService>,
        disks: Arc<DiskRegistry>,
        store: Arc<dyn TransformationStore>,
    ) -> Result<Self, anyhow::Error> {
        config.validate()?;
        Ok(Self {
            name: name.into(),
            config,
            converter,
            disks,
            store,
        })
    }

    /// Best-effort release of the remote job artifact.
    ///
    /// A leaked remote job costs quota, never correctness, so failure is
    /// logged and swallowed.
    async fn release_job(&self, file: &File, job: &ConvertedJob) {
        if let Err(e) = self.converter.delete(job).await {
            tracing::warn!(
                file_id = %file.id,
                job_id = %job.id,
                error = %e,
                "Failed to delete remote conversion job"
            );
        }
    }
}

#[async_trait]
impl Transformer for DocumentPreviewTransformer {
    fn name(&self) -> &str {
        &self.name
    }

    async fn transform(&self, file: &File) -> Result<Option<Transformation>, TransformError> {
        if file.media_type != MediaType::Document {
            return Ok(None);
        }
        file.validate()
            .map_err(|e| TransformError::InvalidFile(e.to_string()))?;

        let disk = self.disks.get(&file.disk)?;
        let extension = self.config.target_extension(&file.extension).to_string();
        let started = Instant::now();

        let request = ConvertRequest {
            input_format: file.extension.clone(),
            output_format: extension.clone(),
            source_url: file.download_url.clone(),
            options: self.config.converter_options.clone(),
            timeout: self.config.timeout(),
        };

        let job = match self.converter.convert(&request).await {
            Ok(job) => job,
            Err(e) if e.is_content_failure() => {
                tracing::info!(
                    file_id = %file.id,
                    source_extension = %file.extension,
                    error = %e,
                    "Document cannot be converted, skipping preview"
                );
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let mut scratch = ScratchFile::acquire()?;

        let fetched = self.converter.fetch(&job, scratch.path()).await;
        // The remote artifact is no longer needed whether the fetch
        // succeeded or not.
        self.release_job(file, &job).await;
        fetched?;

        let image = DecodedImage::open(scratch.path()).map_err(TransformError::ImageProcessing)?;

        let preview_bytes = std::fs::read(scratch.path())?;
        let preview_key = file.preview_key(&extension);
        disk.put(&preview_key, preview_bytes.clone(), image.mime_type())
            .await?;

        let preview = Transformation {
            name: TRANSFORMATION_PREVIEW.to_string(),
            media_type: MediaType::from_mime(image.mime_type()),
            extension: extension.clone(),
            mime_type: image.mime_type().to_string(),
            width: Some(image.width()),
            height: Some(image.height()),
            size: preview_bytes.len() as u64,
            completed: true,
        };
        // Recorded before thumb derivation: the preview must survive even
        // if the rest of the pipeline dies.
        self.store
            .save(file, &preview)
            .await
            .map_err(TransformError::Persist)?;

        tracing::info!(
            file_id = %file.id,
            key = %preview_key,
            size_bytes = preview.size,
            duration_ms = started.elapsed().as_millis() as u64,
            "Document preview persisted"
        );

        let thumb_cfg = &self.config.thumb;
        let resized = if thumb_cfg.fit {
            image.fit(thumb_cfg.width, thumb_cfg.height, thumb_cfg.upsize)
        } else {
            image.resize(
                thumb_cfg.width,
                thumb_cfg.height,
                thumb_cfg.aspect,
                thumb_cfg.upsize,
            )
        };

        resized
            .save(scratch.path())
            .map_err(TransformError::ImageProcessing)?;
        let thumb_bytes = std::fs::read(scratch.path())?;

        let thumb = Transformation {
            name: self.name.clone(),
            media_type: preview.media_type,
            extension,
            mime_type: preview.mime_type.clone(),
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
            "Document thumbnail derived"
        );

        Ok(Some(thumb))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persist::MemoryTransformationStore;
    use crate::test_helpers::{png_bytes, MockConversionService};
    use medialib_storage::LocalStorage;
    use uuid::Uuid;

    fn document_file() -> File {
        File {
            id: Uuid::new_v4(),
            disk: "media".to_string(),
            extension: "docx".to_string(),
            media_type: MediaType::Document,
            download_url: "https://media.example.com/source.docx".to_string(),
        }
    }

    async fn transformer_with(
        converter: MockConversionService,
    ) -> (DocumentPreviewTransformer, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path(), "http://localhost/media".to_string())
            .await
            .unwrap();
        let mut disks = DiskRegistry::new();
        disks.register("media", Arc::new(storage));

        let transformer = DocumentPreviewTransformer::new(
            "thumb",
            DocumentPreviewConfig::default(),
            Arc::new(converter),
            Arc::new(disks),
            Arc::new(MemoryTransformationStore::new()),
        )
        .unwrap();

        (transformer, dir)
    }

    #[tokio::test]
    async fn test_non_document_is_declined() {
        let (transformer, _dir) = transformer_with(MockConversionService::succeed(png_bytes(8, 8))).await;
        let mut file = document_file();
        file.media_type = MediaType::Image;

        let result = transformer.transform(&file).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_invalid_file_is_rejected_without_retry() {
        let (transformer, _dir) = transformer_with(MockConversionService::succeed(png_bytes(8, 8))).await;
        let mut file = document_file();
        file.extension = String::new();

        let err = transformer.transform(&file).await.unwrap_err();
        assert!(matches!(err, TransformError::InvalidFile(_)));
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn test_unknown_disk_is_rejected_without_retry() {
        let (transformer, _dir) = transformer_with(MockConversionService::succeed(png_bytes(8, 8))).await;
        let mut file = document_file();
        file.disk = "archive".to_string();

        let err = transformer.transform(&file).await.unwrap_err();
        assert!(!err.is_retryable());
    }
}
