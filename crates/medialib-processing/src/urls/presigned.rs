//! Presigned URL generator
//!
//! Builds expiring signed URLs through the storage backend owning the
//! file's bytes. The only generator that can honor forced download, which
//! it expresses as a signed `Content-Disposition` response override.

use crate::urls::{resolve_target, UrlError, UrlGenerator};
use async_trait::async_trait;
use medialib_core::{File, Transformation};
use medialib_storage::DiskRegistry;
use std::sync::Arc;
use std::time::Duration;

/// Signed, expiring URLs resolved through the file's own disk.
pub struct S3PresignedUrlGenerator {
    disks: Arc<DiskRegistry>,
    expires_in: Duration,
}

impl S3PresignedUrlGenerator {
    pub fn new(disks: Arc<DiskRegistry>, expires_in: Duration) -> Self {
        Self { disks, expires_in }
    }
}

#[async_trait]
impl UrlGenerator for S3PresignedUrlGenerator {
    async fn url_for_transformation(
        &self,
        file: &File,
        transformation: Option<&Transformation>,
        full_preview: bool,
        download: bool,
    ) -> Result<String, UrlError> {
        let storage = self.disks.get(&file.disk)?;

        if download && !storage.supports_signing() {
            return Err(UrlError::UnsupportedOption(format!(
                "disk {} cannot sign a forced-download URL",
                file.disk
            )));
        }

        let (name, extension) = resolve_target(file, transformation, full_preview);
        let key = file.transformation_path(&name, &extension);

        let disposition = download.then(|| {
            format!("attachment; filename=\"{}.{}\"", file.id, extension)
        });

        let url = storage
            .presigned_url(&key, self.expires_in, disposition.as_deref())
            .await?;
        Ok(url)
    }

    fn supports_forced_download(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use medialib_core::MediaType;
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

    async fn local_disks(dir: &std::path::Path) -> Arc<DiskRegistry> {
        let storage = LocalStorage::new(dir, "http://localhost:3000/media".to_string())
            .await
            .unwrap();
        let mut disks = DiskRegistry::new();
        disks.register("media", Arc::new(storage));
        Arc::new(disks)
    }

    #[tokio::test]
    async fn test_plain_url_over_non_signing_disk() {
        let dir = tempfile::tempdir().unwrap();
        let generator = S3PresignedUrlGenerator::new(
            local_disks(dir.path()).await,
            Duration::from_secs(600),
        );

        let file = document_file();
        let url = generator
            .url_for_transformation(&file, None, false, false)
            .await
            .unwrap();
        assert!(url.ends_with(&format!("{}/upload.docx", file.id)));
    }

    #[tokio::test]
    async fn test_download_rejected_on_non_signing_disk() {
        let dir = tempfile::tempdir().unwrap();
        let generator = S3PresignedUrlGenerator::new(
            local_disks(dir.path()).await,
            Duration::from_secs(600),
        );

        let file = document_file();
        let err = generator
            .url_for_transformation(&file, None, false, true)
            .await
            .unwrap_err();
        assert!(matches!(err, UrlError::UnsupportedOption(_)));
        assert!(generator.supports_forced_download());
    }

    #[tokio::test]
    async fn test_unknown_disk_surfaces_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let generator = S3PresignedUrlGenerator::new(
            local_disks(dir.path()).await,
            Duration::from_secs(600),
        );

        let mut file = document_file();
        file.disk = "archive".to_string();
        let err = generator
            .url_for_transformation(&file, None, false, false)
            .await
            .unwrap_err();
        assert!(matches!(err, UrlError::Storage(_)));
    }
}
