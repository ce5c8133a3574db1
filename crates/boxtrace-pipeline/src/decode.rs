//! Image decoding into a [`Picture`].
//!
//! Accepts raw image bytes (PNG, JPEG, BMP, WebP) and produces an RGB
//! picture ready for scanning. Alpha is dropped: detection only compares
//! color channels.

use image::RgbImage;

use crate::picture::Picture;
use crate::types::DetectError;

/// Decode raw image bytes into a picture.
///
/// # Errors
///
/// Returns [`DetectError::EmptyInput`] if `bytes` is empty.
/// Returns [`DetectError::ImageDecode`] if the image format is
/// unrecognized or the data is corrupt.
/// Returns [`DetectError::InvalidDimensions`] if the decoded image has a
/// zero dimension.
pub fn decode_picture(bytes: &[u8]) -> Result<Picture<RgbImage>, DetectError> {
    if bytes.is_empty() {
        return Err(DetectError::EmptyInput);
    }

    let img = image::load_from_memory(bytes)?;
    Picture::new(img.to_rgb8())
}
