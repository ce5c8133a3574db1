//! Raster-order scan that seeds a trace at every unclaimed border pixel.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::color::Color;
use crate::picture::{Picture, RasterSource};
use crate::point::Point;
use crate::trace::{TraceEngine, TraceState};
use crate::types::{DetectConfig, Shape};

/// Counters collected while scanning.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanStats {
    /// Traces started.
    pub seeds: usize,
    /// Traces whose rails met.
    pub closed: usize,
    /// Traces that found no way forward, including budget exhaustion.
    pub stuck: usize,
    /// Closed traces whose box was below the minimum size.
    pub too_small: usize,
    /// Traces abandoned at the step budget.
    pub budget_exhausted: usize,
    /// Completed shapes emitted.
    pub completed: usize,
    /// Incomplete shapes emitted (only with `keep_incomplete`).
    pub incomplete: usize,
}

/// Shapes found by a scan plus the counters behind them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanOutput {
    /// Shapes in discovery order.
    pub shapes: Vec<Shape>,
    /// Scan counters.
    pub stats: ScanStats,
}

impl ScanOutput {
    /// The emitted shape whose box holds `point`, if any.
    pub(crate) fn claimant(&self, point: Point) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.contains(point))
    }

    /// Add `shape` and count it.
    ///
    /// A shape enclosed by one already emitted is dropped. A completed
    /// shape replaces the incomplete shapes it encloses.
    pub(crate) fn emit(&mut self, shape: Shape) {
        if self.shapes.iter().any(|s| s.encloses(&shape)) {
            return;
        }
        if shape.is_completed() {
            let before = self.shapes.len();
            self.shapes
                .retain(|s| s.is_completed() || !shape.encloses(s));
            self.stats.incomplete -= before - self.shapes.len();
            self.stats.completed += 1;
        } else {
            self.stats.incomplete += 1;
        }
        self.shapes.push(shape);
    }
}

/// Walks a picture top-to-bottom, left-to-right and traces outlines.
///
/// Pixels inside the bounding box of any emitted shape are jumped over,
/// as are pixels already visited by an earlier trace that failed, so the
/// same outline is never traced twice. Incomplete shapes only claim
/// their box when `keep_incomplete` emits them.
#[derive(Debug)]
pub struct ScanDriver<'a, S> {
    picture: &'a Picture<S>,
    background: Color,
    config: &'a DetectConfig,
}

impl<'a, S: RasterSource> ScanDriver<'a, S> {
    /// Create a driver using the picture's inferred background.
    #[must_use]
    pub fn new(picture: &'a Picture<S>, config: &'a DetectConfig) -> Self {
        Self::with_background(picture, picture.background_color(), config)
    }

    /// Create a driver with an explicit background color.
    #[must_use]
    pub const fn with_background(
        picture: &'a Picture<S>,
        background: Color,
        config: &'a DetectConfig,
    ) -> Self {
        Self {
            picture,
            background,
            config,
        }
    }

    /// Background color the scan compares against.
    #[must_use]
    pub const fn background(&self) -> Color {
        self.background
    }

    /// Scan the whole picture.
    #[must_use]
    pub fn run(&self) -> ScanOutput {
        let engine = TraceEngine::new(self.picture, self.background, self.config);
        let width = i32::try_from(self.picture.width()).unwrap_or(i32::MAX);
        let height = i32::try_from(self.picture.height()).unwrap_or(i32::MAX);

        let mut output = ScanOutput::default();
        let mut abandoned: HashSet<Point> = HashSet::new();

        for y in 0..height {
            let mut x = 0;
            while x < width {
                let point = Point::new(x, y);
                if let Some(shape) = output.claimant(point) {
                    x = shape.right().saturating_add(1);
                    continue;
                }
                if abandoned.contains(&point)
                    || !self
                        .picture
                        .is_border_point(x, y, self.config.tolerance, self.background)
                {
                    x += 1;
                    continue;
                }

                let report = engine.trace_from(point);
                let stats = &mut output.stats;
                stats.seeds += 1;
                match report.state {
                    TraceState::Closed => stats.closed += 1,
                    TraceState::Stuck => stats.stuck += 1,
                }
                if report.budget_exhausted {
                    stats.budget_exhausted += 1;
                    warn!(
                        x,
                        y,
                        max_trace_steps = self.config.max_trace_steps,
                        "trace exhausted its step budget"
                    );
                }
                if report.closed_too_small(self.config) {
                    stats.too_small += 1;
                }

                let shape = report.shape(self.config);
                trace!(
                    x,
                    y,
                    state = ?report.state,
                    steps = report.steps,
                    shape = ?shape,
                    "trace finished"
                );

                match shape {
                    Some(shape) if shape.is_completed() => {
                        output.emit(shape);
                        x = shape.right().saturating_add(1).max(x + 1);
                    }
                    other => {
                        if let Some(shape) = other.filter(|_| self.config.keep_incomplete) {
                            output.emit(shape);
                        }
                        if let Some(context) = report.context {
                            abandoned.extend(context.into_visited());
                        }
                        abandoned.insert(point);
                        x += 1;
                    }
                }
            }
        }

        debug!(
            width,
            height,
            background = %self.background,
            seeds = output.stats.seeds,
            completed = output.stats.completed,
            incomplete = output.stats.incomplete,
            "scan finished"
        );
        output
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use image::{Rgb, RgbImage};

    use super::*;

    const INK: Rgb<u8> = Rgb([0, 0, 0]);
    const PAPER: Rgb<u8> = Rgb([255, 255, 255]);

    fn boxes(width: u32, height: u32, rects: &[(u32, u32, u32, u32)]) -> Picture {
        let img = RgbImage::from_fn(width, height, |x, y| {
            let inside = rects.iter().any(|&(l, t, r, b)| {
                (l..=r).contains(&x) && (t..=b).contains(&y)
            });
            if inside { INK } else { PAPER }
        });
        Picture::new(img).unwrap()
    }

    fn scan(picture: &Picture, config: &DetectConfig) -> ScanOutput {
        ScanDriver::new(picture, config).run()
    }

    #[test]
    fn blank_picture_has_no_seeds() {
        let pic = boxes(50, 40, &[]);
        let out = scan(&pic, &DetectConfig::default());
        assert!(out.shapes.is_empty());
        assert_eq!(out.stats, ScanStats::default());
    }

    #[test]
    fn single_filled_rectangle() {
        let pic = boxes(80, 50, &[(10, 10, 69, 39)]);
        let out = scan(&pic, &DetectConfig::default());

        assert_eq!(out.shapes.len(), 1);
        let shape = out.shapes[0];
        assert!(shape.is_completed());
        assert_eq!((shape.x(), shape.y(), shape.width(), shape.height()), (10, 10, 59, 29));
        assert_eq!(out.stats.seeds, 1);
        assert_eq!(out.stats.closed, 1);
        assert_eq!(out.stats.completed, 1);
    }

    #[test]
    fn two_rectangles_are_found_once_each() {
        let pic = boxes(180, 60, &[(10, 10, 69, 39), (100, 15, 159, 49)]);
        let out = scan(&pic, &DetectConfig::default());

        assert_eq!(out.shapes.len(), 2);
        assert!(out.shapes.iter().all(Shape::is_completed));
        assert!(!out.shapes[0].intersects(&out.shapes[1]));
        assert_eq!(out.stats.seeds, 2);
    }

    #[test]
    fn small_rectangle_is_dropped_unless_kept() {
        let pic = boxes(50, 30, &[(5, 5, 24, 14)]);

        let out = scan(&pic, &DetectConfig::default());
        assert!(out.shapes.is_empty());
        assert!(out.stats.too_small >= 1);
        assert_eq!(out.stats.completed, 0);

        let keep = DetectConfig {
            keep_incomplete: true,
            ..DetectConfig::default()
        };
        let out = scan(&pic, &keep);
        assert!(!out.shapes.is_empty());
        assert!(out.shapes.iter().all(|s| !s.is_completed()));
        assert_eq!(out.stats.incomplete, out.shapes.len());
    }

    #[test]
    fn step_budget_prevents_completion() {
        let pic = boxes(80, 50, &[(10, 10, 69, 39)]);
        let config = DetectConfig {
            max_trace_steps: 1,
            ..DetectConfig::default()
        };
        let out = scan(&pic, &config);
        assert_eq!(out.stats.completed, 0);
        assert!(out.stats.budget_exhausted >= 1);
        assert!(out.stats.stuck >= out.stats.budget_exhausted);
    }

    #[test]
    fn explicit_background_is_used() {
        // Against black the whole white field contrasts, and its border
        // is the image edge.
        let pic = boxes(60, 30, &[]);
        let config = DetectConfig::default();
        let driver = ScanDriver::with_background(&pic, Color::BLACK, &config);
        assert_eq!(driver.background(), Color::BLACK);
        let out = driver.run();
        assert_eq!(out.shapes.len(), 1);
        let shape = out.shapes[0];
        assert_eq!((shape.x(), shape.y(), shape.width(), shape.height()), (0, 0, 59, 29));
    }

    fn no_shape_encloses_another(shapes: &[Shape]) -> bool {
        shapes.iter().enumerate().all(|(i, a)| {
            shapes
                .iter()
                .enumerate()
                .all(|(j, b)| i == j || !a.encloses(b))
        })
    }

    #[test]
    fn kept_incomplete_shape_claims_its_box() {
        // An open "U" with a closed box inside it.
        let img = RgbImage::from_fn(80, 50, |x, y| {
            let u = ((x == 10 || x == 69) && (10..=39).contains(&y))
                || (y == 10 && (10..=69).contains(&x));
            let inner = ((x == 15 || x == 64) && (20..=36).contains(&y))
                || ((y == 20 || y == 36) && (15..=64).contains(&x));
            if u || inner { INK } else { PAPER }
        });
        let pic = Picture::new(img).unwrap();

        let out = scan(&pic, &DetectConfig::default());
        let found: Vec<_> = out
            .shapes
            .iter()
            .map(|s| (s.x(), s.y(), s.width(), s.height(), s.is_completed()))
            .collect();
        assert_eq!(found, vec![(15, 20, 49, 16, true)]);

        let keep = DetectConfig {
            keep_incomplete: true,
            ..DetectConfig::default()
        };
        let out = scan(&pic, &keep);
        assert!(no_shape_encloses_another(&out.shapes));
        let found: Vec<_> = out
            .shapes
            .iter()
            .map(|s| (s.x(), s.y(), s.width(), s.height(), s.is_completed()))
            .collect();
        assert_eq!(found, vec![(10, 10, 59, 29, false)]);
        assert_eq!(out.stats.incomplete, 1);
        assert_eq!(out.stats.completed, 0);
    }

    #[test]
    fn completed_shape_replaces_enclosed_incomplete_ones() {
        let open = Shape::from_corners(Point::new(70, 25), Point::new(109, 26), false);
        let elsewhere = Shape::from_corners(Point::new(0, 0), Point::new(5, 5), false);
        let frame = Shape::from_corners(Point::new(40, 25), Point::new(109, 54), true);

        let mut out = ScanOutput::default();
        out.emit(open);
        out.emit(elsewhere);
        out.emit(frame);
        assert_eq!(out.shapes, vec![elsewhere, frame]);
        assert_eq!(out.stats.incomplete, 1);
        assert_eq!(out.stats.completed, 1);

        // Anything inside an emitted box is dropped, duplicates included.
        out.emit(frame);
        out.emit(open);
        assert_eq!(out.shapes, vec![elsewhere, frame]);
        assert_eq!(out.claimant(Point::new(80, 40)), Some(&frame));
    }
}
