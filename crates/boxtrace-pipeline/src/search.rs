//! Directional search: find where the two rails of a trace go next.
//!
//! Given the rails of the edge traced so far, every direction reachable
//! from the previous move is probed. A cardinal probe walks both rails
//! step by step (B mirrored horizontally) and keeps every step where both
//! candidates are border points; it gives up after `tolerance` consecutive
//! misses, on leaving the picture, on meeting an already traced point, or
//! when converging rails would cross. The longest run of matches wins.
//!
//! Only when no cardinal direction matches at all are corner directions
//! tried. A corner probe looks for a single pair of border points in the
//! square of offsets up to `tolerance` diagonally away from the rails,
//! which is how rounded or anti-aliased corners are stepped around.

use std::cmp::Reverse;

use crate::color::Color;
use crate::direction::Direction;
use crate::picture::{Picture, RasterSource};
use crate::point::Point;
use crate::trace::TraceContext;

/// A successful search: the direction taken and the newly matched points.
///
/// `points` alternates rail A and rail B, one pair per matched step, so
/// its length is always even and the last pair holds the new rails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Move {
    /// Direction the rails moved in.
    pub direction: Direction,
    /// Matched points, `[a1, b1, a2, b2, ...]`.
    pub points: Vec<Point>,
}

impl Move {
    /// The last matched pair, which becomes the new rails.
    #[must_use]
    pub fn rails(&self) -> Option<(Point, Point)> {
        match self.points.as_slice() {
            [.., a, b] => Some((*a, *b)),
            _ => None,
        }
    }

    /// Number of matched steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len() / 2
    }

    /// Whether no step matched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Probes a picture for symmetric border points around a trace.
#[derive(Debug, Clone, Copy)]
pub struct Searcher<'a, S> {
    picture: &'a Picture<S>,
    background: Color,
    tolerance: u32,
}

impl<'a, S: RasterSource> Searcher<'a, S> {
    /// Create a searcher against `background` with the given tolerance.
    #[must_use]
    pub const fn new(picture: &'a Picture<S>, background: Color, tolerance: u32) -> Self {
        Self {
            picture,
            background,
            tolerance,
        }
    }

    fn reach(&self) -> i32 {
        self.picture.reach(self.tolerance)
    }

    /// Whether `point` is a border point of the picture.
    #[must_use]
    pub fn is_border(&self, point: Point) -> bool {
        self.picture
            .is_border_point(point.x, point.y, self.tolerance, self.background)
    }

    /// A candidate rail position that is a border point not yet traced.
    fn is_fresh_border(&self, context: &TraceContext, point: Point) -> bool {
        !context.has_visited(point) && self.is_border(point)
    }

    /// Decide the next move for `context`, or `None` when the trace is
    /// stuck.
    #[must_use]
    pub fn next_move(&self, context: &TraceContext) -> Option<Move> {
        let candidates = context
            .previous()
            .map_or(Direction::INITIAL, Direction::reachable);

        let best = candidates
            .iter()
            .filter(|d| !d.is_corner())
            .map(|&d| self.cardinal(context, d))
            .filter(|m| !m.is_empty())
            .max_by_key(|m| (m.len(), Reverse(m.direction)));
        if best.is_some() {
            return best;
        }

        candidates
            .iter()
            .filter(|d| d.is_corner())
            .find_map(|&d| self.corner(context, d))
    }

    /// Walk both rails in a cardinal direction, collecting matched pairs.
    #[must_use]
    pub fn cardinal(&self, context: &TraceContext, direction: Direction) -> Move {
        let (a0, b0) = context.rails();
        let (adx, ady) = direction.step();
        let (bdx, bdy) = direction.mirrored_step();

        let mut points = Vec::new();
        let mut misses = 0;
        let mut k: i32 = 1;
        while misses < self.tolerance {
            let a = a0.offset(adx.saturating_mul(k), ady.saturating_mul(k));
            let b = b0.offset(bdx.saturating_mul(k), bdy.saturating_mul(k));

            if direction.converges() && a.x > b.x {
                break;
            }
            if !self.picture.in_bounds(a.x, a.y) || !self.picture.in_bounds(b.x, b.y) {
                break;
            }
            if context.has_visited(a) || context.has_visited(b) {
                break;
            }

            if self.is_border(a) && self.is_border(b) {
                points.push(a);
                points.push(b);
                misses = 0;
            } else {
                misses += 1;
            }
            k = k.saturating_add(1);
        }

        Move { direction, points }
    }

    /// Look for one pair of border points around a corner.
    ///
    /// Column offsets grow in the outer loop and row offsets in the
    /// inner loop; the first rail A candidate with a matching rail B
    /// candidate wins. For B every row offset up to `tolerance` is
    /// accepted, nearest to A's offset first.
    #[must_use]
    pub fn corner(&self, context: &TraceContext, direction: Direction) -> Option<Move> {
        let (a0, b0) = context.rails();
        let (sx, sy) = direction.step();
        let reach = self.reach();

        for dx in 1..=reach {
            for dy in 1..=reach {
                let a = a0.offset(sx * dx, sy * dy);
                if !self.is_fresh_border(context, a) {
                    continue;
                }
                let partner = (1..=reach)
                    .map(|bdy| b0.offset(-sx * dx, sy * bdy))
                    .filter(|&b| self.is_fresh_border(context, b))
                    .filter(|b| !direction.converges() || a.x <= b.x)
                    .min_by_key(|b| (b.y - b0.y).abs().abs_diff(dy));
                if let Some(b) = partner {
                    return Some(Move {
                        direction,
                        points: vec![a, b],
                    });
                }
            }
        }
        None
    }
}
