//! Configuration module
//!
//! Pipeline configuration is modelled as explicit structs with serde
//! defaults, resolved and validated once when a transformer is built, not
//! re-parsed per call. Every field documents its default.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

const DEFAULT_TARGET_EXTENSION: &str = "jpg";
const DEFAULT_PAGE_RANGE: &str = "1-1";

fn default_extension() -> String {
    DEFAULT_TARGET_EXTENSION.to_string()
}

fn default_page_range() -> String {
    DEFAULT_PAGE_RANGE.to_string()
}

fn default_true() -> bool {
    true
}

/// Passthrough options for the conversion backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConverterOptions {
    /// Page range to convert. Default "1-1": only the first page is needed
    /// for a preview.
    #[serde(default = "default_page_range")]
    pub page_range: String,
}

impl Default for ConverterOptions {
    fn default() -> Self {
        Self {
            page_range: default_page_range(),
        }
    }
}

/// Thumbnail derivation settings shared by all thumb-producing pipelines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThumbConfig {
    /// Crop-to-fit the target box (anchored at the top edge) instead of a
    /// proportional resize. Default false.
    #[serde(default)]
    pub fit: bool,
    /// Target width. A missing dimension is inferred from the other to
    /// preserve the aspect ratio.
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    /// Preserve aspect ratio during a proportional resize. Default true.
    /// Ignored when `fit` is set.
    #[serde(default = "default_true")]
    pub aspect: bool,
    /// Permit upscaling when the source is smaller than the target.
    /// Default true.
    #[serde(default = "default_true")]
    pub upsize: bool,
}

impl Default for ThumbConfig {
    fn default() -> Self {
        Self {
            fit: false,
            width: None,
            height: None,
            aspect: true,
            upsize: true,
        }
    }
}

impl ThumbConfig {
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.width == Some(0) || self.height == Some(0) {
            anyhow::bail!("Thumb dimensions must be non-zero");
        }
        Ok(())
    }
}

/// Configuration for the document-to-image preview pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentPreviewConfig {
    /// Target-extension overrides keyed by source extension.
    #[serde(default)]
    pub output_formats: HashMap<String, String>,
    /// Fallback target extension. Default "jpg".
    #[serde(default = "default_extension")]
    pub extension: String,
    #[serde(default)]
    pub converter_options: ConverterOptions,
    /// Upper bound on the blocking conversion wait, in seconds. None means
    /// the conversion client's own default applies.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub thumb: ThumbConfig,
}

impl Default for DocumentPreviewConfig {
    fn default() -> Self {
        Self {
            output_formats: HashMap::new(),
            extension: default_extension(),
            converter_options: ConverterOptions::default(),
            timeout_secs: None,
            thumb: ThumbConfig::default(),
        }
    }
}

impl DocumentPreviewConfig {
    /// Resolve the target output extension for a given source extension.
    pub fn target_extension(&self, source_extension: &str) -> &str {
        self.output_formats
            .get(source_extension)
            .map(String::as_str)
            .unwrap_or(&self.extension)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.extension.is_empty() {
            anyhow::bail!("Fallback target extension must not be empty");
        }
        self.thumb.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_json() {
        let config: DocumentPreviewConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.extension, "jpg");
        assert_eq!(config.converter_options.page_range, "1-1");
        assert!(config.timeout_secs.is_none());
        assert!(!config.thumb.fit);
        assert!(config.thumb.aspect);
        assert!(config.thumb.upsize);
    }

    #[test]
    fn test_target_extension_override() {
        let config: DocumentPreviewConfig = serde_json::from_str(
            r#"{"output_formats": {"docx": "png"}, "extension": "jpg"}"#,
        )
        .unwrap();

        assert_eq!(config.target_extension("docx"), "png");
        assert_eq!(config.target_extension("pdf"), "jpg");
    }

    #[test]
    fn test_validate_rejects_zero_dimension() {
        let config = DocumentPreviewConfig {
            thumb: ThumbConfig {
                width: Some(0),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_timeout() {
        let config = DocumentPreviewConfig {
            timeout_secs: Some(30),
            ..Default::default()
        };
        assert_eq!(config.timeout(), Some(Duration::from_secs(30)));
    }
}
