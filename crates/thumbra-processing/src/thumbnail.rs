//! Thumbnail rendering: one source buffer in, one encoded thumbnail out.

use crate::orientation::ImageOrientation;
use bytes::Bytes;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};
use std::io::Cursor;
use thiserror::Error;
use thumbra_core::DerivativeSpec;

/// Rendering failures, split so callers can tell a bad source (decode) from
/// a failure producing output (encode).
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to decode source image: {0}")]
    Decode(#[source] image::ImageError),

    #[error("failed to encode thumbnail: {0}")]
    Encode(#[source] image::ImageError),
}

pub struct ThumbnailRenderer;

impl ThumbnailRenderer {
    /// Render the `spec` thumbnail of `data`.
    ///
    /// Decodes the source (any format the `image` crate recognizes from the
    /// bytes themselves), applies EXIF orientation, crop-fills to exactly
    /// `spec.width` x `spec.height` with Lanczos resampling so the output is
    /// never letterboxed, and re-encodes as JPEG at default quality.
    pub fn render(data: &[u8], spec: DerivativeSpec) -> Result<Bytes, RenderError> {
        let cursor = Cursor::new(data);
        let img = image::ImageReader::new(cursor)
            .with_guessed_format()
            .map_err(|e| RenderError::Decode(image::ImageError::IoError(e)))?
            .decode()
            .map_err(RenderError::Decode)?;

        let img = ImageOrientation::apply_exif_orientation(img, data);

        let thumb = img.resize_to_fill(spec.width, spec.height, FilterType::Lanczos3);
        // JPEG has no alpha channel; flatten before encoding.
        let thumb = DynamicImage::ImageRgb8(thumb.to_rgb8());

        let estimated_size = (spec.width as usize) * (spec.height as usize) * 3;
        let mut buffer = Vec::with_capacity(estimated_size);
        let mut cursor = Cursor::new(&mut buffer);
        thumb
            .write_to(&mut cursor, ImageFormat::Jpeg)
            .map_err(RenderError::Encode)?;

        Ok(Bytes::from(buffer))
    }
}
