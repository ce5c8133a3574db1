//! Search directions and the moves allowed between them.
//!
//! A direction describes how rail A moves. Rail B mirrors the horizontal
//! component, so `Left` spreads the rails apart and `Right` brings them
//! together, while vertical components move both rails the same way.

use serde::{Deserialize, Serialize};

/// One of the four cardinal or four corner directions.
///
/// The declaration order is the tie-break order when two directions
/// find equally long matches.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Direction {
    /// Up.
    Top,
    /// Rails converge.
    Right,
    /// Down.
    Bottom,
    /// Rails spread apart.
    Left,
    /// Up while converging.
    TopRight,
    /// Up while spreading.
    TopLeft,
    /// Down while converging.
    BottomRight,
    /// Down while spreading.
    BottomLeft,
}

impl Direction {
    /// Every direction in tie-break order.
    pub const ALL: [Self; 8] = [
        Self::Top,
        Self::Right,
        Self::Bottom,
        Self::Left,
        Self::TopRight,
        Self::TopLeft,
        Self::BottomRight,
        Self::BottomLeft,
    ];

    /// Moves available before any direction has been taken: a trace
    /// always starts by spreading along its seed segment.
    pub const INITIAL: &'static [Self] = &[Self::Left];

    /// Whether this is one of the four corner directions.
    #[must_use]
    pub const fn is_corner(self) -> bool {
        matches!(
            self,
            Self::TopRight | Self::TopLeft | Self::BottomRight | Self::BottomLeft
        )
    }

    /// The direction pointing the other way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Top => Self::Bottom,
            Self::Right => Self::Left,
            Self::Bottom => Self::Top,
            Self::Left => Self::Right,
            Self::TopRight => Self::BottomLeft,
            Self::TopLeft => Self::BottomRight,
            Self::BottomRight => Self::TopLeft,
            Self::BottomLeft => Self::TopRight,
        }
    }

    /// Directions that may follow a move in this direction, in
    /// tie-break order.
    ///
    /// A cardinal move turns a quarter either way or rounds a corner
    /// on the side it is heading; a corner move continues as itself or
    /// settles into one of its two components. U-turns never appear.
    #[must_use]
    pub const fn reachable(self) -> &'static [Self] {
        match self {
            Self::Top => &[Self::Right, Self::Left, Self::TopRight, Self::TopLeft],
            Self::Right => &[Self::Top, Self::Bottom, Self::TopRight, Self::BottomRight],
            Self::Bottom => &[
                Self::Right,
                Self::Left,
                Self::BottomRight,
                Self::BottomLeft,
            ],
            Self::Left => &[Self::Top, Self::Bottom, Self::TopLeft, Self::BottomLeft],
            Self::TopRight => &[Self::Top, Self::Right, Self::TopRight],
            Self::TopLeft => &[Self::Top, Self::Left, Self::TopLeft],
            Self::BottomRight => &[Self::Right, Self::Bottom, Self::BottomRight],
            Self::BottomLeft => &[Self::Bottom, Self::Left, Self::BottomLeft],
        }
    }

    /// Unit step `(dx, dy)` for rail A.
    #[must_use]
    pub const fn step(self) -> (i32, i32) {
        match self {
            Self::Top => (0, -1),
            Self::Right => (1, 0),
            Self::Bottom => (0, 1),
            Self::Left => (-1, 0),
            Self::TopRight => (1, -1),
            Self::TopLeft => (-1, -1),
            Self::BottomRight => (1, 1),
            Self::BottomLeft => (-1, 1),
        }
    }

    /// Unit step `(dx, dy)` for rail B: horizontally mirrored.
    #[must_use]
    pub const fn mirrored_step(self) -> (i32, i32) {
        let (dx, dy) = self.step();
        (-dx, dy)
    }

    /// Whether this move brings the rails closer together.
    #[must_use]
    pub const fn converges(self) -> bool {
        self.step().0 > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_is_an_involution() {
        for d in Direction::ALL {
            assert_eq!(d.opposite().opposite(), d);
            assert_ne!(d.opposite(), d);
        }
    }

    #[test]
    fn reachable_never_contains_a_u_turn() {
        for d in Direction::ALL {
            assert!(
                !d.reachable().contains(&d.opposite()),
                "{d:?} can reach its opposite"
            );
        }
    }

    #[test]
    fn reachable_lists_are_in_tie_break_order() {
        for d in Direction::ALL {
            let list = d.reachable();
            assert!(
                list.windows(2).all(|w| w[0] < w[1]),
                "{d:?} -> {list:?} is not sorted"
            );
        }
    }

    #[test]
    fn cardinal_moves_reach_adjacent_corners() {
        assert_eq!(
            Direction::Right.reachable(),
            &[
                Direction::Top,
                Direction::Bottom,
                Direction::TopRight,
                Direction::BottomRight
            ]
        );
        assert!(!Direction::Right.reachable().contains(&Direction::Right));
    }

    #[test]
    fn corner_moves_keep_their_components() {
        for d in Direction::ALL.into_iter().filter(|d| d.is_corner()) {
            let (dx, dy) = d.step();
            for next in d.reachable() {
                let (nx, ny) = next.step();
                assert!(nx == 0 || nx == dx, "{d:?} -> {next:?}");
                assert!(ny == 0 || ny == dy, "{d:?} -> {next:?}");
            }
        }
    }

    #[test]
    fn rail_b_mirrors_horizontally() {
        assert_eq!(Direction::Left.mirrored_step(), (1, 0));
        assert_eq!(Direction::Right.mirrored_step(), (-1, 0));
        assert_eq!(Direction::Bottom.mirrored_step(), (0, 1));
        assert_eq!(Direction::BottomLeft.mirrored_step(), (1, 1));
    }

    #[test]
    fn convergence() {
        assert!(Direction::Right.converges());
        assert!(Direction::BottomRight.converges());
        assert!(!Direction::Left.converges());
        assert!(!Direction::Top.converges());
    }

    #[test]
    fn initial_move_spreads() {
        assert_eq!(Direction::INITIAL, &[Direction::Left]);
    }
}
