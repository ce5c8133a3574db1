//! Pixel colors and the perceptual contrast metric.
//!
//! Contrast is measured with the "redmean" weighted Euclidean distance,
//! a cheap approximation of perceived color difference that weights the
//! red and blue channels by the mean red level of the two colors:
//!
//! ```text
//! rmean = (r1 + r2) / 2
//! d = sqrt(((512 + rmean) * dr^2 >> 8) + 4 * dg^2 + ((767 - rmean) * db^2 >> 8))
//! ```
//!
//! All intermediate arithmetic is integer, matching the shifts above.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Distance above which a color counts as contrasted against a
/// reference color.
pub const CONTRAST_THRESHOLD: f64 = 50.0;

/// An opaque 24-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Color {
    /// Pure white, the usual page background.
    pub const WHITE: Self = Self::new(255, 255, 255);

    /// Pure black.
    pub const BLACK: Self = Self::new(0, 0, 0);

    /// Create a color from its channels.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Redmean contrast distance to another color.
    ///
    /// Symmetric, and zero only for identical colors.
    #[must_use]
    pub fn contrast_distance(self, other: Self) -> f64 {
        let rmean = (i64::from(self.r) + i64::from(other.r)) / 2;
        let dr = i64::from(self.r) - i64::from(other.r);
        let dg = i64::from(self.g) - i64::from(other.g);
        let db = i64::from(self.b) - i64::from(other.b);

        let weighted =
            (((512 + rmean) * dr * dr) >> 8) + 4 * dg * dg + (((767 - rmean) * db * db) >> 8);

        // Bounded well below 2^53, so the conversion is exact.
        #[allow(clippy::cast_precision_loss)]
        let weighted = weighted as f64;
        weighted.sqrt()
    }

    /// Whether this color stands out from `background`.
    #[must_use]
    pub fn is_contrast(self, background: Self) -> bool {
        self.contrast_distance(background) > CONTRAST_THRESHOLD
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl From<image::Rgb<u8>> for Color {
    fn from(pixel: image::Rgb<u8>) -> Self {
        let [r, g, b] = pixel.0;
        Self::new(r, g, b)
    }
}

/// Alpha is ignored: pictures are treated as opaque.
impl From<image::Rgba<u8>> for Color {
    fn from(pixel: image::Rgba<u8>) -> Self {
        let [r, g, b, _] = pixel.0;
        Self::new(r, g, b)
    }
}

impl From<Color> for image::Rgb<u8> {
    fn from(color: Color) -> Self {
        Self([color.r, color.g, color.b])
    }
}
