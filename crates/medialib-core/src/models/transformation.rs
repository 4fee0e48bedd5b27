use serde::{Deserialize, Serialize};

use super::file::MediaType;

/// Conventional transformation name for the original uploaded bytes.
pub const TRANSFORMATION_UPLOAD: &str = "upload";
/// Conventional transformation name for the full-size converted preview.
pub const TRANSFORMATION_PREVIEW: &str = "preview";
/// Conventional transformation name for the resized thumbnail.
pub const TRANSFORMATION_THUMB: &str = "thumb";

/// One named derived artifact of a `File`.
///
/// Owned by its file; a transformation has no independent existence. A
/// record with `completed == true` guarantees the artifact bytes exist at
/// the key the owning file derives from `(name, extension)`. Transformers
/// never hand out incomplete records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transformation {
    /// Unique per file: "preview", "thumb", ...
    pub name: String,
    /// Kind of the derived artifact, not of the source file.
    pub media_type: MediaType,
    pub extension: String,
    pub mime_type: String,
    /// Absent for non-visual kinds.
    pub width: Option<u32>,
    pub height: Option<u32>,
    /// Size in bytes.
    pub size: u64,
    pub completed: bool,
}
