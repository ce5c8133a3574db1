//! Rectangle detection strategies.
//!
//! This module defines the [`RectangleDetector`] trait for pluggable
//! detection algorithms and the [`DetectorKind`] enum for selecting which
//! one to run at runtime.
//!
//! # Strategy pattern
//!
//! Border tracing and segment scanning trade robustness for speed on the
//! same input. The trait/enum split lets callers pick one from
//! configuration while both implementations stay in the sans-IO core.

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::picture::{Picture, RasterSource};
use crate::scan::{ScanDriver, ScanOutput};
use crate::segment::scan_segments;
use crate::types::DetectConfig;

/// Selects which detection algorithm to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DetectorKind {
    /// Follow each outline with a pair of mirrored rails until they meet.
    ///
    /// Handles thin, broken and rounded outlines; costs a trace per seed.
    #[default]
    BorderTrace,

    /// Grow boxes from long horizontal contrast runs and check the other
    /// three sides inside tolerance windows.
    SegmentScan,
}

/// Trait for rectangle detection strategies.
///
/// Input: a picture and the background color to contrast against.
/// Output: shapes in discovery order plus scan counters.
pub trait RectangleDetector {
    /// Detect rectangles in `picture`.
    fn detect<S: RasterSource>(
        &self,
        picture: &Picture<S>,
        background: Color,
        config: &DetectConfig,
    ) -> ScanOutput;
}

impl RectangleDetector for DetectorKind {
    fn detect<S: RasterSource>(
        &self,
        picture: &Picture<S>,
        background: Color,
        config: &DetectConfig,
    ) -> ScanOutput {
        match *self {
            Self::BorderTrace => ScanDriver::with_background(picture, background, config).run(),
            Self::SegmentScan => scan_segments(picture, background, config),
        }
    }
}
