//! boxtrace-pipeline: Pure rectangle detection engine (sans-IO).
//!
//! Finds axis-aligned rectangles in a raster by tracing contrast borders:
//! background inference -> raster scan for border pixels -> symmetric
//! rail tracing from each seed -> bounding box and completion check.
//!
//! This crate has **no I/O dependencies** -- it operates on in-memory
//! rasters or byte slices and returns structured data. File access and
//! rendering live in `boxtrace-cli` and `boxtrace-export`.

pub mod color;
pub mod decode;
pub mod detector;
pub mod diagnostics;
pub mod direction;
pub mod picture;
pub mod point;
pub mod scan;
pub mod search;
pub mod segment;
pub mod trace;
pub mod types;

pub use color::Color;
pub use detector::{DetectorKind, RectangleDetector};
pub use direction::Direction;
pub use picture::{Picture, RasterSource};
pub use point::{Pixel, Point};
pub use scan::{ScanDriver, ScanOutput, ScanStats};
pub use types::{DetectConfig, DetectError, DetectResult, Dimensions, Shape};

/// Detect rectangles in a picture.
///
/// # Steps
///
/// 1. Validate the configuration
/// 2. Infer the background color from the four corners
/// 3. Scan with the configured detector
///
/// # Errors
///
/// Returns [`DetectError::InvalidConfig`] if `config` fails validation.
pub fn detect<S: RasterSource>(
    picture: &Picture<S>,
    config: &DetectConfig,
) -> Result<DetectResult, DetectError> {
    config.validate()?;

    let background = picture.background_color();
    let output = config.detector.detect(picture, background, config);

    Ok(DetectResult {
        shapes: output.shapes,
        dimensions: picture.dimensions(),
        background,
    })
}

/// Decode raw image bytes (PNG, JPEG, BMP, WebP) and detect rectangles.
///
/// # Errors
///
/// Returns [`DetectError::EmptyInput`] if `image_bytes` is empty.
/// Returns [`DetectError::ImageDecode`] if the image format is unrecognized.
/// Returns [`DetectError::InvalidConfig`] if `config` fails validation.
pub fn detect_bytes(image_bytes: &[u8], config: &DetectConfig) -> Result<DetectResult, DetectError> {
    config.validate()?;
    let picture = decode::decode_picture(image_bytes)?;
    detect(&picture, config)
}
