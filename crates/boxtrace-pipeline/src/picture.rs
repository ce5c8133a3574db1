//! Read-only picture access: pixel lookup, background inference and
//! border classification.
//!
//! A [`Picture`] wraps any [`RasterSource`] and is the only way the
//! detectors look at pixels. Lookups outside the image yield `None`,
//! and every predicate treats a missing pixel as background, so
//! searches may probe freely past the edges.

use image::{DynamicImage, GenericImageView, RgbImage, RgbaImage};

use crate::color::Color;
use crate::point::{Pixel, Point};
use crate::types::{DetectError, Dimensions};

/// A raster that can report its size and the color at an in-bounds
/// position.
pub trait RasterSource {
    /// `(width, height)` in pixels.
    fn dimensions(&self) -> (u32, u32);

    /// Color at `(x, y)`. Callers guarantee the position is in bounds.
    fn color_at(&self, x: u32, y: u32) -> Color;
}

impl RasterSource for RgbImage {
    fn dimensions(&self) -> (u32, u32) {
        Self::dimensions(self)
    }

    fn color_at(&self, x: u32, y: u32) -> Color {
        Color::from(*self.get_pixel(x, y))
    }
}

impl RasterSource for RgbaImage {
    fn dimensions(&self) -> (u32, u32) {
        Self::dimensions(self)
    }

    fn color_at(&self, x: u32, y: u32) -> Color {
        Color::from(*self.get_pixel(x, y))
    }
}

impl RasterSource for DynamicImage {
    fn dimensions(&self) -> (u32, u32) {
        GenericImageView::dimensions(self)
    }

    fn color_at(&self, x: u32, y: u32) -> Color {
        Color::from(GenericImageView::get_pixel(self, x, y))
    }
}

/// A picture being scanned for rectangles.
///
/// Owns its raster for the whole scan and never mutates it.
#[derive(Debug, Clone)]
pub struct Picture<S = RgbImage> {
    source: S,
    width: u32,
    height: u32,
}

impl<S: RasterSource> Picture<S> {
    /// Wrap a raster.
    ///
    /// # Errors
    ///
    /// Returns [`DetectError::InvalidDimensions`] if either dimension is
    /// zero or does not fit an `i32` coordinate.
    pub fn new(source: S) -> Result<Self, DetectError> {
        let (width, height) = source.dimensions();
        if width == 0 || height == 0 || i32::try_from(width).is_err() || i32::try_from(height).is_err()
        {
            return Err(DetectError::InvalidDimensions { width, height });
        }
        Ok(Self {
            source,
            width,
            height,
        })
    }

    /// Width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Width and height together.
    #[must_use]
    pub const fn dimensions(&self) -> Dimensions {
        Dimensions {
            width: self.width,
            height: self.height,
        }
    }

    /// The wrapped raster.
    #[must_use]
    pub const fn source(&self) -> &S {
        &self.source
    }

    /// `tolerance` as a signed pixel offset, capped at the larger
    /// dimension. A larger offset leaves the picture from every pixel, so
    /// the cap never changes a neighbourhood test.
    #[must_use]
    pub fn reach(&self, tolerance: u32) -> i32 {
        i32::try_from(tolerance.min(self.width.max(self.height))).unwrap_or(i32::MAX)
    }

    /// In-bounds unsigned position for `(x, y)`, if any.
    fn position(&self, x: i32, y: i32) -> Option<(u32, u32)> {
        let ux = u32::try_from(x).ok()?;
        let uy = u32::try_from(y).ok()?;
        (ux < self.width && uy < self.height).then_some((ux, uy))
    }

    /// Whether `(x, y)` lies inside the picture.
    #[must_use]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        self.position(x, y).is_some()
    }

    /// The pixel at `(x, y)`, or `None` outside the picture.
    #[must_use]
    pub fn pixel_at(&self, x: i32, y: i32) -> Option<Pixel> {
        self.position(x, y)
            .map(|(ux, uy)| Pixel::new(Point::new(x, y), self.source.color_at(ux, uy)))
    }

    /// Whether the pixel at `(x, y)` exists and contrasts with
    /// `background`.
    #[must_use]
    pub fn is_contrast_point(&self, x: i32, y: i32, background: Color) -> bool {
        self.pixel_at(x, y)
            .is_some_and(|p| p.color.is_contrast(background))
    }

    /// Most frequent color among the four corners.
    ///
    /// Ties go to the color met first in the order top-left,
    /// bottom-left, top-right, bottom-right.
    #[must_use]
    pub fn background_color(&self) -> Color {
        let right = self.width - 1;
        let bottom = self.height - 1;
        let corners = [(0, 0), (0, bottom), (right, 0), (right, bottom)]
            .map(|(x, y)| self.source.color_at(x, y));

        let mut best = corners[0];
        let mut best_count = 0;
        for color in corners {
            let count = corners.iter().filter(|&&c| c == color).count();
            if count > best_count {
                best = color;
                best_count = count;
            }
        }
        best
    }

    /// Whether `(x, y)` is a contrasted pixel with at least one
    /// non-contrasted pixel (or the image edge) within `tolerance`
    /// pixels in the surrounding square.
    #[must_use]
    pub fn is_border_point(&self, x: i32, y: i32, tolerance: u32, background: Color) -> bool {
        if !self.is_contrast_point(x, y, background) {
            return false;
        }
        let reach = self.reach(tolerance);
        (-reach..=reach).any(|dy| {
            (-reach..=reach).any(|dx| {
                (dx, dy) != (0, 0)
                    && !self.is_contrast_point(
                        x.saturating_add(dx),
                        y.saturating_add(dy),
                        background,
                    )
            })
        })
    }
}
