//! Bounded rectangular layouts with permanent obstacles.

use std::collections::HashSet;

use super::cell::{Action, Cell};
use super::error::GridError;

/// Character marking an obstacle in ASCII maps.
pub const OBSTACLE_CHAR: char = '%';

/// A bounded rectangular world with a fixed set of impassable cells.
///
/// Cells range over `0..width` × `0..height`. Anything outside that range is
/// treated exactly like an obstacle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    width: u32,
    height: u32,
    obstacles: HashSet<Cell>,
}

impl Layout {
    /// Creates a layout from its dimensions and obstacle cells.
    pub fn new(width: u32, height: u32, obstacles: impl IntoIterator<Item = Cell>) -> Self {
        Self {
            width,
            height,
            obstacles: obstacles.into_iter().collect(),
        }
    }

    /// A layout without obstacles.
    pub fn open(width: u32, height: u32) -> Self {
        Self::new(width, height, std::iter::empty())
    }

    /// Parses an ASCII map where `%` marks an obstacle.
    ///
    /// The first line is the northern row. Blank lines and surrounding
    /// whitespace on each line are ignored; every other character is free.
    pub fn from_ascii(map: &str) -> Result<Self, GridError> {
        let scanned = scan_ascii(map)?;
        Ok(scanned.layout)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns true if `cell` lies within the layout bounds.
    pub fn in_bounds(&self, cell: Cell) -> bool {
        cell.x >= 0 && cell.y >= 0 && (cell.x as u32) < self.width && (cell.y as u32) < self.height
    }

    /// Returns true if `cell` is a registered obstacle.
    pub fn is_obstacle(&self, cell: Cell) -> bool {
        self.obstacles.contains(&cell)
    }

    /// Returns true if an agent cannot stand on `cell`.
    pub fn is_blocked(&self, cell: Cell) -> bool {
        !self.in_bounds(cell) || self.is_obstacle(cell)
    }

    /// Iterates over the obstacle cells in no particular order.
    pub fn obstacles(&self) -> impl Iterator<Item = &Cell> {
        self.obstacles.iter()
    }

    /// Number of blocked cells orthogonally adjacent to `cell`.
    pub fn adjacent_obstacles(&self, cell: Cell) -> usize {
        cell.neighbours()
            .into_iter()
            .filter(|&n| self.is_blocked(n))
            .count()
    }

    /// Where an attempted move from `cell` ends up: the neighbour, or `cell`
    /// itself when the neighbour is blocked.
    pub fn landing(&self, cell: Cell, action: Action) -> Cell {
        let target = cell.step(action);
        if self.is_blocked(target) {
            cell
        } else {
            target
        }
    }
}

/// Result of scanning an ASCII map: the layout plus every non-obstacle,
/// non-space character with its cell.
#[derive(Debug, Clone)]
pub(crate) struct ScannedMap {
    pub(crate) layout: Layout,
    pub(crate) marks: Vec<(Cell, char)>,
}

pub(crate) fn scan_ascii(map: &str) -> Result<ScannedMap, GridError> {
    let rows: Vec<&str> = map
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    let Some(first) = rows.first() else {
        return Err(GridError::EmptyMap);
    };
    let width = first.chars().count();
    let height = rows.len();

    let mut obstacles = Vec::new();
    let mut marks = Vec::new();
    for (row, line) in rows.iter().enumerate() {
        let found = line.chars().count();
        if found != width {
            return Err(GridError::RaggedRow {
                row,
                expected: width,
                found,
            });
        }
        let y = (height - 1 - row) as i32;
        for (x, ch) in line.chars().enumerate() {
            let cell = Cell::new(x as i32, y);
            match ch {
                OBSTACLE_CHAR => obstacles.push(cell),
                ' ' => {}
                other => marks.push((cell, other)),
            }
        }
    }

    Ok(ScannedMap {
        layout: Layout::new(width as u32, height as u32, obstacles),
        marks,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_bounds_is_blocked() {
        let layout = Layout::open(3, 2);
        assert!(layout.is_blocked(Cell::new(-1, 0)));
        assert!(layout.is_blocked(Cell::new(3, 0)));
        assert!(layout.is_blocked(Cell::new(0, 2)));
        assert!(!layout.is_blocked(Cell::new(2, 1)));
    }

    #[test]
    fn ascii_first_line_is_north() {
        let layout = Layout::from_ascii(
            "
            %%%
            % %
            ",
        )
        .unwrap();
        assert_eq!(layout.width(), 3);
        assert_eq!(layout.height(), 2);
        assert!(layout.is_obstacle(Cell::new(1, 1)));
        assert!(!layout.is_obstacle(Cell::new(1, 0)));
    }

    #[test]
    fn ascii_rejects_ragged_rows() {
        let err = Layout::from_ascii("%%%\n%%").unwrap_err();
        assert_eq!(
            err,
            GridError::RaggedRow {
                row: 1,
                expected: 3,
                found: 2
            }
        );
    }

    #[test]
    fn ascii_rejects_empty_map() {
        assert_eq!(Layout::from_ascii("  \n\n").unwrap_err(), GridError::EmptyMap);
    }

    #[test]
    fn adjacent_obstacles_counts_walls_and_bounds() {
        let layout = Layout::from_ascii(
            "
            %%%%
            % .%
            %%%%
            ",
        )
        .unwrap();
        assert_eq!(layout.adjacent_obstacles(Cell::new(2, 1)), 3);
        assert_eq!(layout.adjacent_obstacles(Cell::new(1, 1)), 3);
        assert_eq!(Layout::open(1, 1).adjacent_obstacles(Cell::new(0, 0)), 4);
    }

    #[test]
    fn landing_bumps_into_walls() {
        let layout = Layout::new(2, 1, [Cell::new(1, 0)]);
        assert_eq!(layout.landing(Cell::new(0, 0), Action::East), Cell::new(0, 0));
        assert_eq!(layout.landing(Cell::new(0, 0), Action::North), Cell::new(0, 0));
    }
}
