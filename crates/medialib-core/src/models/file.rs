use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use uuid::Uuid;

use super::transformation::Transformation;

/// Media type enum
///
/// The kind of a source file or of a derived artifact. A derived artifact
/// may have a different kind than its source (a document's preview is an
/// image).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Video,
    Audio,
    Document,
    Other,
}

impl MediaType {
    /// Derive the media type from a mime type string.
    pub fn from_mime(mime: &str) -> MediaType {
        match mime.split('/').next().unwrap_or("") {
            "image" => MediaType::Image,
            "video" => MediaType::Video,
            "audio" => MediaType::Audio,
            "text" => MediaType::Document,
            "application" => MediaType::Document,
            _ => MediaType::Other,
        }
    }
}

impl FromStr for MediaType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "image" => Ok(MediaType::Image),
            "video" => Ok(MediaType::Video),
            "audio" => Ok(MediaType::Audio),
            "document" => Ok(MediaType::Document),
            "other" => Ok(MediaType::Other),
            _ => Err(anyhow::anyhow!("Invalid media type: {}", s)),
        }
    }
}

impl Display for MediaType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            MediaType::Image => write!(f, "image"),
            MediaType::Video => write!(f, "video"),
            MediaType::Audio => write!(f, "audio"),
            MediaType::Document => write!(f, "document"),
            MediaType::Other => write!(f, "other"),
        }
    }
}

/// One uploaded source asset.
///
/// Read-only to the pipeline: transformers derive artifacts from a `File`
/// but never mutate it. The `id` doubles as the storage-key prefix for
/// every artifact derived from this file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct File {
    pub id: Uuid,
    /// Identifier selecting the blob store backend holding this file's bytes.
    pub disk: String,
    /// Source format extension, without the leading dot.
    pub extension: String,
    pub media_type: MediaType,
    /// Address the conversion service can fetch the source bytes from.
    pub download_url: String,
}

impl File {
    /// Validate the invariants the pipeline relies on.
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.disk.is_empty() {
            anyhow::bail!("File {} has no disk identifier", self.id);
        }
        if self.extension.is_empty() {
            anyhow::bail!("File {} has no extension", self.id);
        }
        Ok(())
    }

    /// Storage key for a named transformation of this file.
    ///
    /// Key derivation is owned by `File` so every component addresses
    /// artifacts the same way: `{id}/{name}.{extension}`.
    pub fn transformation_path(&self, name: &str, extension: &str) -> String {
        format!("{}/{}.{}", self.id, name, extension)
    }

    /// Storage key for a `Transformation` record.
    pub fn path_for(&self, transformation: &Transformation) -> String {
        self.transformation_path(&transformation.name, &transformation.extension)
    }

    /// Storage key for the original uploaded bytes.
    pub fn upload_key(&self) -> String {
        self.transformation_path(super::transformation::TRANSFORMATION_UPLOAD, &self.extension)
    }

    /// Storage key for the conventional preview artifact.
    pub fn preview_key(&self, extension: &str) -> String {
        self.transformation_path(super::transformation::TRANSFORMATION_PREVIEW, extension)
    }
}
