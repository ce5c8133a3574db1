//! Integer pixel coordinates and colored pixels.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::color::Color;

/// A pixel position in image coordinates.
///
/// Coordinates are signed so that search offsets may step past the
/// left/top image edge; such points simply have no pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Point {
    /// Column, pixels from the left edge.
    pub x: i32,
    /// Row, pixels from the top edge.
    pub y: i32,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The point shifted by `(dx, dy)`, saturating at the `i32` range.
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }

    /// Squared Euclidean distance to another point.
    #[must_use]
    pub fn distance_squared(self, other: Self) -> u64 {
        let dx = u64::from(self.x.abs_diff(other.x));
        let dy = u64::from(self.y.abs_diff(other.y));
        dx * dx + dy * dy
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        #[allow(clippy::cast_precision_loss)]
        let squared = self.distance_squared(other) as f64;
        squared.sqrt()
    }

    /// Whether `other` lies strictly closer than `tolerance` pixels.
    #[must_use]
    pub fn is_near(self, other: Self, tolerance: u32) -> bool {
        let limit = u64::from(tolerance);
        self.distance_squared(other) < limit * limit
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

/// A point bound to the color found there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pixel {
    /// Where the pixel sits.
    pub point: Point,
    /// Its color.
    pub color: Color,
}

impl Pixel {
    /// Create a pixel.
    #[must_use]
    pub const fn new(point: Point, color: Color) -> Self {
        Self { point, color }
    }
}
