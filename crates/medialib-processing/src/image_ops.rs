//! Image decode and geometry operations
//!
//! Thin wrapper over the `image` crate used by the transformers. Decoding
//! sniffs the format from file content, never from the extension, and the
//! sniffed format is carried alongside the pixels so re-encoding and MIME
//! reporting stay consistent.

use anyhow::{anyhow, Context, Result};
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageFormat, ImageReader};
use std::path::Path;

/// A decoded image together with its sniffed on-disk format.
pub struct DecodedImage {
    img: DynamicImage,
    format: ImageFormat,
}

/// Pick a scaling filter based on how aggressive the resize is.
///
/// Heavy downscales tolerate a cheaper filter; near-identity resizes
/// get Lanczos for quality.
fn select_filter(src_w: u32, src_h: u32, dst_w: u32, dst_h: u32) -> FilterType {
    let src_pixels = (src_w as u64) * (src_h as u64);
    let dst_pixels = (dst_w as u64) * (dst_h as u64);

    if dst_pixels * 4 <= src_pixels {
        FilterType::Triangle
    } else {
        FilterType::Lanczos3
    }
}

/// Resolve requested dimensions against the source, inferring a missing
/// axis from the source aspect ratio.
fn resolve_dimensions(
    src_w: u32,
    src_h: u32,
    width: Option<u32>,
    height: Option<u32>,
) -> (u32, u32) {
    match (width, height) {
        (Some(w), Some(h)) => (w, h),
        (Some(w), None) => {
            let h = ((w as f64) * (src_h as f64) / (src_w as f64)).round() as u32;
            (w, h.max(1))
        }
        (None, Some(h)) => {
            let w = ((h as f64) * (src_w as f64) / (src_h as f64)).round() as u32;
            (w.max(1), h)
        }
        (None, None) => (src_w, src_h),
    }
}

impl DecodedImage {
    /// Decode an image from disk, sniffing the format from content.
    pub fn open(path: &Path) -> Result<Self> {
        let reader = ImageReader::open(path)
            .with_context(|| format!("failed to open image at {}", path.display()))?
            .with_guessed_format()
            .context("failed to sniff image format")?;

        let format = reader
            .format()
            .ok_or_else(|| anyhow!("unrecognized image format at {}", path.display()))?;

        let img = reader
            .decode()
            .with_context(|| format!("failed to decode {:?} image", format))?;

        Ok(Self { img, format })
    }

    /// MIME type of the sniffed format.
    pub fn mime_type(&self) -> &'static str {
        self.format.to_mime_type()
    }

    pub fn width(&self) -> u32 {
        self.img.dimensions().0
    }

    pub fn height(&self) -> u32 {
        self.img.dimensions().1
    }

    /// Scale the image to the requested box.
    ///
    /// A missing axis is inferred from the source aspect ratio. With
    /// `aspect` the image is fitted inside the box; without it the box is
    /// filled exactly, distorting if needed. With `upsize` disabled the
    /// target is clamped to the source dimensions.
    pub fn resize(
        &self,
        width: Option<u32>,
        height: Option<u32>,
        aspect: bool,
        upsize: bool,
    ) -> Self {
        let (src_w, src_h) = self.img.dimensions();
        let (mut dst_w, mut dst_h) = resolve_dimensions(src_w, src_h, width, height);

        if !upsize {
            dst_w = dst_w.min(src_w);
            dst_h = dst_h.min(src_h);
        }

        let filter = select_filter(src_w, src_h, dst_w, dst_h);
        let img = if aspect {
            self.img.resize(dst_w, dst_h, filter)
        } else {
            self.img.resize_exact(dst_w, dst_h, filter)
        };

        Self {
            img,
            format: self.format,
        }
    }

    /// Scale to cover the requested box, then crop to it.
    ///
    /// The crop is centered horizontally and anchored to the top edge, so
    /// the head of a document page survives the cut. With `upsize` disabled
    /// the image is never scaled past its source size and the crop shrinks
    /// to what is available.
    pub fn fit(&self, width: Option<u32>, height: Option<u32>, upsize: bool) -> Self {
        let (src_w, src_h) = self.img.dimensions();
        let dst_w = width.or(height).unwrap_or(src_w);
        let dst_h = height.or(width).unwrap_or(src_h);

        let mut scale = f64::max(
            (dst_w as f64) / (src_w as f64),
            (dst_h as f64) / (src_h as f64),
        );
        if !upsize {
            scale = scale.min(1.0);
        }

        let scaled_w = ((src_w as f64) * scale).round().max(1.0) as u32;
        let scaled_h = ((src_h as f64) * scale).round().max(1.0) as u32;

        let filter = select_filter(src_w, src_h, scaled_w, scaled_h);
        let scaled = self.img.resize_exact(scaled_w, scaled_h, filter);

        let crop_w = dst_w.min(scaled_w);
        let crop_h = dst_h.min(scaled_h);
        let x = (scaled_w - crop_w) / 2;
        let img = scaled.crop_imm(x, 0, crop_w, crop_h);

        Self {
            img,
            format: self.format,
        }
    }

    /// Re-encode to disk in the sniffed source format.
    pub fn save(&self, path: &Path) -> Result<()> {
        self.img
            .save_with_format(path, self.format)
            .with_context(|| format!("failed to encode image to {}", path.display()))
    }
}
