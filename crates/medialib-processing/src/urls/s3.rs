//! Public S3 URL generator
//!
//! Builds unsigned path-style URLs for objects in a public bucket. Forced
//! download needs signed response-header overrides, which an unsigned URL
//! cannot carry; that option is served by the presigned generator.

use crate::urls::{resolve_target, UrlError, UrlGenerator};
use async_trait::async_trait;
use medialib_core::{File, Transformation};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct S3UrlConfig {
    pub region: String,
    pub bucket: String,
}

/// Unsigned URLs for a publicly readable S3 bucket.
pub struct S3UrlGenerator {
    config: S3UrlConfig,
}

impl S3UrlGenerator {
    pub fn new(config: S3UrlConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl UrlGenerator for S3UrlGenerator {
    async fn url_for_transformation(
        &self,
        file: &File,
        transformation: Option<&Transformation>,
        full_preview: bool,
        download: bool,
    ) -> Result<String, UrlError> {
        if download {
            return Err(UrlError::UnsupportedOption(
                "forced download requires a signing generator".to_string(),
            ));
        }

        let (name, extension) = resolve_target(file, transformation, full_preview);
        Ok(format!(
            "https://s3.{}.amazonaws.com/{}/{}",
            self.config.region,
            self.config.bucket,
            file.transformation_path(&name, &extension)
        ))
    }
}
