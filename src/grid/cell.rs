//! Grid coordinates and the four compass moves.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An integer grid coordinate.
///
/// `x` grows eastward and `y` grows northward, so `(0, 0)` is the
/// south-western corner of a layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    /// Creates a new cell.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Rounds a continuous position to the nearest cell.
    ///
    /// Moving entities are reported between cells while they travel.
    pub fn from_position(x: f64, y: f64) -> Self {
        Self::new(x.round() as i32, y.round() as i32)
    }

    /// The adjacent cell in the direction of `action`.
    pub fn step(self, action: Action) -> Self {
        let (dx, dy) = action.delta();
        Self::new(self.x + dx, self.y + dy)
    }

    /// The four orthogonal neighbours, in [`Action::ALL`] order.
    pub fn neighbours(self) -> [Cell; 4] {
        Action::ALL.map(|action| self.step(action))
    }
}

impl From<(i32, i32)> for Cell {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// One of the four compass moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Action {
    North,
    South,
    East,
    West,
}

impl Action {
    /// All actions, in tie-break priority order (earlier wins).
    pub const ALL: [Action; 4] = [Action::North, Action::South, Action::East, Action::West];

    /// Position of this action in [`Action::ALL`].
    pub fn index(self) -> usize {
        match self {
            Action::North => 0,
            Action::South => 1,
            Action::East => 2,
            Action::West => 3,
        }
    }

    /// Coordinate offset `(dx, dy)` of a successful move.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Action::North => (0, 1),
            Action::South => (0, -1),
            Action::East => (1, 0),
            Action::West => (-1, 0),
        }
    }

    /// The two moves an execution of this action can slip into.
    pub fn perpendicular(self) -> [Action; 2] {
        match self {
            Action::North | Action::South => [Action::West, Action::East],
            Action::East | Action::West => [Action::North, Action::South],
        }
    }

    /// The move pointing the other way.
    pub fn opposite(self) -> Action {
        match self {
            Action::North => Action::South,
            Action::South => Action::North,
            Action::East => Action::West,
            Action::West => Action::East,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::North => write!(f, "north"),
            Action::South => write!(f, "south"),
            Action::East => write!(f, "east"),
            Action::West => write!(f, "west"),
        }
    }
}
