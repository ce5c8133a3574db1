//! Tracing a single outline from a seed point.
//!
//! A trace keeps two rails, points that mirror each other about a
//! vertical axis. It starts in the middle of the horizontal contrast run
//! at the seed, spreads along it, and then follows both sides of the
//! outline until the rails meet again (closed) or no direction matches
//! (stuck). Every point the rails land on is recorded in the path and
//! in the visited set, so a trace never walks back over itself.

use std::collections::HashSet;

use crate::color::Color;
use crate::direction::Direction;
use crate::picture::{Picture, RasterSource};
use crate::point::Point;
use crate::search::{Move, Searcher};
use crate::types::{DetectConfig, Shape};

/// How a trace ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceState {
    /// The rails met within `tolerance` pixels.
    Closed,
    /// No direction matched, the seed run was too short, or the step
    /// budget ran out.
    Stuck,
}

/// Mutable state of one trace.
#[derive(Debug, Clone)]
pub struct TraceContext {
    rail_a: Point,
    rail_b: Point,
    previous: Option<Direction>,
    path: Vec<Point>,
    visited: HashSet<Point>,
    history: Vec<Direction>,
}

impl TraceContext {
    /// Start a trace with the rails at `a` and `b`.
    #[must_use]
    pub fn seed(a: Point, b: Point) -> Self {
        Self {
            rail_a: a,
            rail_b: b,
            previous: None,
            path: vec![a, b],
            visited: HashSet::from([a, b]),
            history: Vec::new(),
        }
    }

    /// Current `(a, b)` rails.
    #[must_use]
    pub const fn rails(&self) -> (Point, Point) {
        (self.rail_a, self.rail_b)
    }

    /// Direction of the last move, `None` before the first.
    #[must_use]
    pub const fn previous(&self) -> Option<Direction> {
        self.previous
    }

    /// Whether `point` already belongs to this trace.
    #[must_use]
    pub fn has_visited(&self, point: Point) -> bool {
        self.visited.contains(&point)
    }

    /// Every point the rails have landed on, in order.
    #[must_use]
    pub fn path(&self) -> &[Point] {
        &self.path
    }

    /// Directions taken so far.
    #[must_use]
    pub fn history(&self) -> &[Direction] {
        &self.history
    }

    /// Euclidean distance between the rails.
    #[must_use]
    pub fn rail_distance(&self) -> f64 {
        self.rail_a.distance(self.rail_b)
    }

    /// Whether the rails have met within `tolerance` pixels.
    #[must_use]
    pub fn is_closed(&self, tolerance: u32) -> bool {
        self.rail_a.is_near(self.rail_b, tolerance)
    }

    /// Record a move and put the rails on its last matched pair.
    ///
    /// An empty move changes nothing.
    pub fn apply(&mut self, step: Move) {
        let Some((a, b)) = step.rails() else {
            return;
        };
        self.visited.extend(step.points.iter().copied());
        self.path.extend(step.points);
        self.rail_a = a;
        self.rail_b = b;
        self.previous = Some(step.direction);
        self.history.push(step.direction);
    }

    /// Consume the context, keeping only its visited set.
    #[must_use]
    pub fn into_visited(self) -> HashSet<Point> {
        self.visited
    }
}

/// Outcome of [`TraceEngine::trace_from`].
#[derive(Debug, Clone)]
pub struct TraceReport {
    /// Final state, [`TraceState::Closed`] or [`TraceState::Stuck`].
    pub state: TraceState,
    /// Moves applied.
    pub steps: usize,
    /// Whether the trace stopped because it hit
    /// [`DetectConfig::max_trace_steps`].
    pub budget_exhausted: bool,
    /// Final trace state, or `None` when no seed rails could be placed.
    pub context: Option<TraceContext>,
}

impl TraceReport {
    fn stuck_without_seed() -> Self {
        Self {
            state: TraceState::Stuck,
            steps: 0,
            budget_exhausted: false,
            context: None,
        }
    }

    /// Bounding shape of the traced path, completed only when the trace
    /// closed and the box meets the configured minimum size.
    #[must_use]
    pub fn shape(&self, config: &DetectConfig) -> Option<Shape> {
        let path = self.context.as_ref()?.path();
        let bounds = Shape::from_points(path, false)?;
        let completed = self.state == TraceState::Closed
            && bounds.width() >= config.min_width
            && bounds.height() >= config.min_height;
        Shape::from_points(path, completed)
    }

    /// Whether the trace closed but the box came out smaller than the
    /// configured minimum.
    #[must_use]
    pub fn closed_too_small(&self, config: &DetectConfig) -> bool {
        self.state == TraceState::Closed
            && self.shape(config).is_some_and(|s| !s.is_completed())
    }
}

/// Runs traces over one picture with one configuration.
#[derive(Debug)]
pub struct TraceEngine<'a, S> {
    picture: &'a Picture<S>,
    background: Color,
    config: &'a DetectConfig,
}

impl<'a, S: RasterSource> TraceEngine<'a, S> {
    /// Create an engine tracing against `background`.
    #[must_use]
    pub const fn new(picture: &'a Picture<S>, background: Color, config: &'a DetectConfig) -> Self {
        Self {
            picture,
            background,
            config,
        }
    }

    fn searcher(&self) -> Searcher<'a, S> {
        Searcher::new(self.picture, self.background, self.config.tolerance)
    }

    /// Initial rails for a trace seeded at `start`.
    ///
    /// The contiguous contrast run from `start` rightwards is split in
    /// the middle: an even run puts the rails on its two middle pixels,
    /// an odd run on the pixels either side of its middle. Runs shorter
    /// than two pixels give `None`.
    #[must_use]
    pub fn seed_rails(&self, start: Point) -> Option<(Point, Point)> {
        let run = (0..)
            .map_while(|dx| {
                let x = start.x.checked_add(dx)?;
                self.picture
                    .is_contrast_point(x, start.y, self.background)
                    .then_some(())
            })
            .count();
        let len = i32::try_from(run).ok()?;
        if len < 2 {
            return None;
        }
        let half = len / 2;
        let mid = start.x + half;
        let (a, b) = if len % 2 == 0 {
            (mid - 1, mid)
        } else {
            (mid - 1, mid + 1)
        };
        Some((Point::new(a, start.y), Point::new(b, start.y)))
    }

    /// Trace the outline whose top edge contains `start`.
    #[must_use]
    pub fn trace_from(&self, start: Point) -> TraceReport {
        match self.seed_rails(start) {
            Some((a, b)) => self.trace_rails(a, b),
            None => TraceReport::stuck_without_seed(),
        }
    }

    /// Trace from explicit starting rails.
    #[must_use]
    pub fn trace_rails(&self, a: Point, b: Point) -> TraceReport {
        let searcher = self.searcher();
        let mut context = TraceContext::seed(a, b);
        let mut steps = 0;
        let mut budget_exhausted = false;

        let state = loop {
            if steps >= self.config.max_trace_steps {
                budget_exhausted = true;
                break TraceState::Stuck;
            }
            let Some(step) = searcher.next_move(&context) else {
                break TraceState::Stuck;
            };
            context.apply(step);
            steps += 1;
            if context.is_closed(self.config.tolerance) {
                break TraceState::Closed;
            }
        };

        TraceReport {
            state,
            steps,
            budget_exhausted,
            context: Some(context),
        }
    }
}
