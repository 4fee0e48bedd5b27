//! Local URL generator
//!
//! Joins the resolved storage path onto a static base URL, for objects
//! served straight off a local disk. No signing, so no forced download.

use crate::urls::{resolve_target, UrlError, UrlGenerator};
use async_trait::async_trait;
use medialib_core::{File, Transformation};

/// URLs for objects served from a local filesystem disk.
pub struct LocalUrlGenerator {
    base_url: String,
}

impl LocalUrlGenerator {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl UrlGenerator for LocalUrlGenerator {
    async fn url_for_transformation(
        &self,
        file: &File,
        transformation: Option<&Transformation>,
        full_preview: bool,
        download: bool,
    ) -> Result<String, UrlError> {
        if download {
            return Err(UrlError::UnsupportedOption(
                "local delivery cannot force a download".to_string(),
            ));
        }

        let (name, extension) = resolve_target(file, transformation, full_preview);
        Ok(format!(
            "{}/{}",
            self.base_url,
            file.transformation_path(&name, &extension)
        ))
    }
}
