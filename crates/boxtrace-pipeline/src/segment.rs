//! Segment scan: a faster detector built from horizontal contrast runs.
//!
//! Every horizontal run of contrast at least `min_width` pixels long whose
//! first pixel has no contrast directly above it is a top-edge candidate. The
//! left border is followed down a `tolerance`-wide column window to find
//! the bottom row, then the right border (column window ending at the
//! run's last pixel) and the bottom border (row window ending at the
//! bottom row) are checked. Each check fails once `tolerance` rows or
//! columns have no contrast in their window. A valid candidate spanning
//! at least `min_height` rows is completed.
//!
//! Unlike border tracing this needs no rail symmetry, so it copes with
//! thick or filled boxes but is fooled by anything that merely starts
//! with a long horizontal line.

use tracing::{debug, trace};

use crate::color::Color;
use crate::picture::{Picture, RasterSource};
use crate::point::Point;
use crate::scan::{ScanOutput, ScanStats};
use crate::types::{DetectConfig, Shape};

/// Scan `picture` for rectangles with the segment strategy.
#[must_use]
pub fn scan_segments<S: RasterSource>(
    picture: &Picture<S>,
    background: Color,
    config: &DetectConfig,
) -> ScanOutput {
    let scanner = SegmentScanner {
        picture,
        background,
        reach: picture.reach(config.tolerance),
        tolerance: config.tolerance,
    };
    let width = i32::try_from(picture.width()).unwrap_or(i32::MAX);
    let height = i32::try_from(picture.height()).unwrap_or(i32::MAX);

    let mut output = ScanOutput::default();

    for y in 0..height {
        let mut x = 0;
        while x < width {
            if !scanner.is_contrast(x, y) {
                x += 1;
                continue;
            }
            let start = x;
            while x < width && scanner.is_contrast(x, y) {
                x += 1;
            }
            let last = x - 1;

            let top_left = Point::new(start, y);
            let run_length = last.abs_diff(start) + 1;
            if run_length < config.min_width
                || scanner.is_contrast(start, y - 1)
                || output.claimant(top_left).is_some()
            {
                continue;
            }

            let stats = &mut output.stats;
            stats.seeds += 1;
            let bottom = scanner.left_border_bottom(start, y);
            let rows = bottom.abs_diff(y) + 1;
            let valid = rows > 1
                && scanner.right_border_holds(last, y, bottom)
                && scanner.bottom_border_holds(start, last, bottom);
            let completed = valid && rows >= config.min_height;
            tally(stats, valid, completed);

            let shape = Shape::from_corners(top_left, Point::new(last, bottom), completed);
            trace!(x = start, y, %shape, "segment candidate");
            if completed || config.keep_incomplete {
                output.emit(shape);
            }
        }
    }

    debug!(
        width,
        height,
        background = %background,
        candidates = output.stats.seeds,
        completed = output.stats.completed,
        "segment scan finished"
    );
    output
}

fn tally(stats: &mut ScanStats, valid: bool, completed: bool) {
    if valid {
        stats.closed += 1;
        if !completed {
            stats.too_small += 1;
        }
    } else {
        stats.stuck += 1;
    }
}

struct SegmentScanner<'a, S> {
    picture: &'a Picture<S>,
    background: Color,
    reach: i32,
    tolerance: u32,
}

impl<S: RasterSource> SegmentScanner<'_, S> {
    fn is_contrast(&self, x: i32, y: i32) -> bool {
        self.picture.is_contrast_point(x, y, self.background)
    }

    fn any_in_row(&self, y: i32, from_x: i32, to_x: i32) -> bool {
        (from_x..=to_x).any(|x| self.is_contrast(x, y))
    }

    fn any_in_column(&self, x: i32, from_y: i32, to_y: i32) -> bool {
        (from_y..=to_y).any(|y| self.is_contrast(x, y))
    }

    /// Last row below `top` that still has contrast near the left edge,
    /// bridging gaps shorter than `tolerance` rows.
    fn left_border_bottom(&self, left: i32, top: i32) -> i32 {
        let window_end = left.saturating_add(self.reach);
        let mut bottom = top;
        let mut misses = 0;
        let mut y = top + 1;
        while misses < self.tolerance && self.picture.in_bounds(left, y) {
            if self.any_in_row(y, left, window_end) {
                bottom = y;
                misses = 0;
            } else {
                misses += 1;
            }
            y += 1;
        }
        bottom
    }

    fn right_border_holds(&self, right: i32, top: i32, bottom: i32) -> bool {
        let window_start = right.saturating_sub(self.reach);
        within_budget(
            (top..=bottom).map(|y| self.any_in_row(y, window_start, right)),
            self.tolerance,
        )
    }

    fn bottom_border_holds(&self, left: i32, right: i32, bottom: i32) -> bool {
        let window_start = bottom.saturating_sub(self.reach);
        within_budget(
            (left..=right).map(|x| self.any_in_column(x, window_start, bottom)),
            self.tolerance,
        )
    }
}

/// Whether fewer than `budget` of the checks failed.
fn within_budget(hits: impl Iterator<Item = bool>, budget: u32) -> bool {
    let mut errors = 0;
    for hit in hits {
        if !hit {
            errors += 1;
            if errors >= budget {
                return false;
            }
        }
    }
    true
}
