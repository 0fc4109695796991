//! Image compression for uploads.
//!
//! Uploaded photos are downscaled to a web-friendly width and re-encoded as
//! JPEG before they reach object storage.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;

use crate::error::CoreError;

/// Widest image kept after compression, in pixels.
pub const DEFAULT_MAX_WIDTH: u32 = 800;

/// JPEG quality (1-100) used for re-encoding.
pub const DEFAULT_JPEG_QUALITY: u8 = 70;

/// Largest upload accepted before decoding (10 MiB).
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Content types accepted for upload.
pub const ACCEPTED_CONTENT_TYPES: &[&str] = &["image/jpeg", "image/png", "image/webp", "image/gif"];

/// Content type of every compressed image.
pub const OUTPUT_CONTENT_TYPE: &str = "image/jpeg";

/// Result of [`compress_image`].
#[derive(Debug, Clone)]
pub struct CompressedImage {
    /// JPEG-encoded bytes.
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Whether `content_type` is one of [`ACCEPTED_CONTENT_TYPES`].
pub fn is_accepted_content_type(content_type: &str) -> bool {
    ACCEPTED_CONTENT_TYPES.contains(&content_type)
}

/// Size after fitting `width` into `max_width`, keeping the aspect ratio.
///
/// Images already narrow enough are left alone. Height never drops below 1.
pub fn target_dimensions(width: u32, height: u32, max_width: u32) -> (u32, u32) {
    if width <= max_width {
        return (width, height);
    }
    let scaled = (u64::from(height) * u64::from(max_width) / u64::from(width)).max(1);
    (max_width, scaled as u32)
}

/// Decode, downscale and re-encode an image as JPEG.
pub fn compress_image(
    data: &[u8],
    max_width: u32,
    quality: u8,
) -> Result<CompressedImage, CoreError> {
    if data.len() > MAX_UPLOAD_BYTES {
        return Err(CoreError::Validation(format!(
            "Image is too large ({} bytes). Maximum is {MAX_UPLOAD_BYTES} bytes",
            data.len()
        )));
    }

    let decoded = image::load_from_memory(data)
        .map_err(|e| CoreError::Validation(format!("Failed to decode image: {e}")))?;

    let (width, height) = target_dimensions(decoded.width(), decoded.height(), max_width);
    let resized = if (width, height) == (decoded.width(), decoded.height()) {
        decoded
    } else {
        decoded.resize_exact(width, height, FilterType::Triangle)
    };

    // JPEG has no alpha channel.
    let rgb = resized.to_rgb8();

    let mut bytes = Cursor::new(Vec::new());
    JpegEncoder::new_with_quality(&mut bytes, quality.clamp(1, 100))
        .encode_image(&rgb)
        .map_err(|e| CoreError::Internal(format!("Failed to encode JPEG: {e}")))?;

    Ok(CompressedImage {
        bytes: bytes.into_inner(),
        width,
        height,
    })
}

#[cfg(test)]
mod tests {
    use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};

    use super::*;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba([250, 180, 20, 128]));
        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(img)
            .write_to(&mut out, ImageFormat::Png)
            .expect("png encoding should succeed");
        out.into_inner()
    }

    #[test]
    fn wide_images_are_scaled_to_max_width() {
        assert_eq!(target_dimensions(1600, 1200, 800), (800, 600));
        assert_eq!(target_dimensions(801, 1, 800), (800, 1));
    }

    #[test]
    fn narrow_images_are_not_upscaled() {
        assert_eq!(target_dimensions(640, 480, 800), (640, 480));
    }

    #[test]
    fn accepted_content_types() {
        assert!(is_accepted_content_type("image/webp"));
        assert!(!is_accepted_content_type("image/svg+xml"));
        assert!(!is_accepted_content_type("application/pdf"));
    }

    #[test]
    fn compress_png_to_jpeg() {
        let compressed = compress_image(&png_bytes(1600, 400), DEFAULT_MAX_WIDTH, DEFAULT_JPEG_QUALITY)
            .expect("compression should succeed");
        assert_eq!((compressed.width, compressed.height), (800, 200));
        // JPEG SOI marker.
        assert_eq!(&compressed.bytes[..2], &[0xFF, 0xD8]);

        let decoded = image::load_from_memory(&compressed.bytes).unwrap();
        assert_eq!(decoded.width(), 800);
    }

    #[test]
    fn garbage_is_a_validation_error() {
        let err = compress_image(b"definitely not an image", 800, 70).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }
}
