//! Shared types for the boxtrace detection pipeline.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::detector::DetectorKind;
use crate::point::Point;

/// Image dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Dimensions {
    /// Total pixel count.
    #[must_use]
    pub fn pixel_count(self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

/// A detected rectangle: bounding box plus completion flag.
///
/// `width` and `height` are the coordinate span of the traced points
/// (`max - min`), clamped to at least 1, so the right-most traced column
/// is `x + width` and the bottom-most traced row is `y + height`.
///
/// Shapes are immutable once built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Shape {
    x: i32,
    y: i32,
    width: u32,
    height: u32,
    completed: bool,
}

impl Shape {
    /// Build a shape spanning two opposite corners.
    #[must_use]
    pub fn from_corners(a: Point, b: Point, completed: bool) -> Self {
        Self {
            x: a.x.min(b.x),
            y: a.y.min(b.y),
            width: a.x.abs_diff(b.x).max(1),
            height: a.y.abs_diff(b.y).max(1),
            completed,
        }
    }

    /// Bounding shape of a point set, or `None` when `points` is empty.
    #[must_use]
    pub fn from_points(points: &[Point], completed: bool) -> Option<Self> {
        let first = points.first()?;
        let (min, max) = points.iter().fold((*first, *first), |(min, max), p| {
            (
                Point::new(min.x.min(p.x), min.y.min(p.y)),
                Point::new(max.x.max(p.x), max.y.max(p.y)),
            )
        });
        Some(Self::from_corners(min, max, completed))
    }

    /// Left edge.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Top edge.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Horizontal span, at least 1.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Vertical span, at least 1.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Whether the outline closed and met the minimum size.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.completed
    }

    /// Right-most column covered by the shape.
    #[must_use]
    pub const fn right(&self) -> i32 {
        self.x.saturating_add_unsigned(self.width)
    }

    /// Bottom-most row covered by the shape.
    #[must_use]
    pub const fn bottom(&self) -> i32 {
        self.y.saturating_add_unsigned(self.height)
    }

    /// Whether `point` lies inside the box, edges included.
    #[must_use]
    pub const fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x <= self.right() && point.y >= self.y && point.y <= self.bottom()
    }

    /// Whether the two boxes share at least one pixel.
    #[must_use]
    pub const fn intersects(&self, other: &Self) -> bool {
        self.x <= other.right()
            && other.x <= self.right()
            && self.y <= other.bottom()
            && other.y <= self.bottom()
    }

    /// Whether `other` lies entirely inside this box, edges included.
    #[must_use]
    pub const fn encloses(&self, other: &Self) -> bool {
        self.contains(Point::new(other.x, other.y))
            && self.contains(Point::new(other.right(), other.bottom()))
    }

    /// `width * height`.
    #[must_use]
    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({},{} {}x{}){}",
            self.x,
            self.y,
            self.width,
            self.height,
            if self.completed { "" } else { " incomplete" },
        )
    }
}

/// Configuration for rectangle detection.
///
/// Deserialization fills missing fields from [`Default`], so partial
/// JSON such as `{"tolerance": 2}` is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectConfig {
    /// Neighbourhood radius for border classification and the number
    /// of consecutive misses before a search direction gives up.
    ///
    /// Must be at least 1.
    pub tolerance: u32,

    /// Minimum width of a completed shape.
    ///
    /// Border tracing compares the coordinate span; segment scanning
    /// compares the top run's length in pixels.
    pub min_width: u32,

    /// Minimum height of a completed shape.
    ///
    /// Border tracing compares the coordinate span; segment scanning
    /// compares the number of rows.
    pub min_height: u32,

    /// Also report traces that did not close or came out too small.
    pub keep_incomplete: bool,

    /// Upper bound on search moves per trace. A trace that reaches it
    /// is abandoned.
    pub max_trace_steps: usize,

    /// Which detection strategy to run.
    pub detector: DetectorKind,
}

impl DetectConfig {
    /// Default [`tolerance`](Self::tolerance).
    pub const DEFAULT_TOLERANCE: u32 = 3;
    /// Default [`min_width`](Self::min_width).
    pub const DEFAULT_MIN_WIDTH: u32 = 40;
    /// Default [`min_height`](Self::min_height).
    pub const DEFAULT_MIN_HEIGHT: u32 = 15;
    /// Default [`max_trace_steps`](Self::max_trace_steps).
    pub const DEFAULT_MAX_TRACE_STEPS: usize = 10_000;

    /// Check the invariants the detectors rely on.
    ///
    /// # Errors
    ///
    /// Returns [`DetectError::InvalidConfig`] if `tolerance` or
    /// `max_trace_steps` is zero.
    pub fn validate(&self) -> Result<(), DetectError> {
        if self.tolerance == 0 {
            return Err(DetectError::InvalidConfig(
                "tolerance must be at least 1".to_string(),
            ));
        }
        if self.max_trace_steps == 0 {
            return Err(DetectError::InvalidConfig(
                "max_trace_steps must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for DetectConfig {
    fn default() -> Self {
        Self {
            tolerance: Self::DEFAULT_TOLERANCE,
            min_width: Self::DEFAULT_MIN_WIDTH,
            min_height: Self::DEFAULT_MIN_HEIGHT,
            keep_incomplete: false,
            max_trace_steps: Self::DEFAULT_MAX_TRACE_STEPS,
            detector: DetectorKind::default(),
        }
    }
}

/// Result of running detection over a picture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectResult {
    /// Detected shapes in discovery order. Incomplete shapes are only
    /// present when [`DetectConfig::keep_incomplete`] is set.
    pub shapes: Vec<Shape>,
    /// Dimensions of the scanned picture.
    pub dimensions: Dimensions,
    /// Background color inferred from the picture corners.
    pub background: Color,
}

impl DetectResult {
    /// Shapes that closed and met the minimum size.
    pub fn completed(&self) -> impl Iterator<Item = &Shape> {
        self.shapes.iter().filter(|s| s.is_completed())
    }
}

/// Errors that can occur before or during detection.
#[derive(Debug, thiserror::Error)]
pub enum DetectError {
    /// Failed to decode the input image.
    #[error("failed to decode image: {0}")]
    ImageDecode(#[from] image::ImageError),

    /// The input image bytes were empty.
    #[error("input image data is empty")]
    EmptyInput,

    /// The picture has a zero dimension or does not fit signed pixel
    /// coordinates.
    #[error("unusable image dimensions {width}x{height}")]
    InvalidDimensions {
        /// Width of the rejected image.
        width: u32,
        /// Height of the rejected image.
        height: u32,
    },

    /// Detection configuration is invalid.
    #[error("invalid detection configuration: {0}")]
    InvalidConfig(String),
}
