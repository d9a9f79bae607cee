//! The reachable state space of a layout.

use std::collections::HashMap;

use petgraph::graphmap::UnGraphMap;

use super::cell::{Action, Cell};
use super::error::GridError;
use super::layout::Layout;

/// Dense index of a reachable cell within a [`GridState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateId(usize);

impl StateId {
    /// Position of this state in the dense cell order.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Every non-obstacle cell of a layout, densely indexed, plus the
/// 4-connected adjacency graph between them.
///
/// # Invariants
///
/// - Cells are stored row by row from the south-western corner, so the
///   [`StateId`] order is stable for a given layout.
/// - No obstacle or out-of-bounds cell is ever a member.
#[derive(Debug, Clone)]
pub struct GridState {
    layout: Layout,
    cells: Vec<Cell>,
    ids: HashMap<Cell, StateId>,
    graph: UnGraphMap<Cell, ()>,
}

impl GridState {
    /// Enumerates the reachable cells of `layout`.
    pub fn new(layout: Layout) -> Self {
        let mut cells = Vec::new();
        for y in 0..layout.height() as i32 {
            for x in 0..layout.width() as i32 {
                let cell = Cell::new(x, y);
                if !layout.is_blocked(cell) {
                    cells.push(cell);
                }
            }
        }

        let ids: HashMap<Cell, StateId> = cells
            .iter()
            .enumerate()
            .map(|(i, &cell)| (cell, StateId(i)))
            .collect();

        let mut graph = UnGraphMap::with_capacity(cells.len(), cells.len() * 2);
        for &cell in &cells {
            graph.add_node(cell);
        }
        for &cell in &cells {
            for action in [Action::North, Action::East] {
                let next = cell.step(action);
                if ids.contains_key(&next) {
                    graph.add_edge(cell, next, ());
                }
            }
        }

        Self {
            layout,
            cells,
            ids,
            graph,
        }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Number of reachable cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Reachable cells in [`StateId`] order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn ids(&self) -> impl Iterator<Item = StateId> {
        (0..self.cells.len()).map(StateId)
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.ids.contains_key(&cell)
    }

    /// Looks up the state of `cell`, if it is reachable.
    pub fn id(&self, cell: Cell) -> Option<StateId> {
        self.ids.get(&cell).copied()
    }

    /// Like [`id`](Self::id), but treats a miss as an invariant violation.
    pub fn require(&self, cell: Cell) -> Result<StateId, GridError> {
        self.id(cell).ok_or(GridError::NotReachable(cell))
    }

    /// The cell behind a state id.
    ///
    /// # Panics
    ///
    /// Panics if `id` was issued by a different grid with more cells.
    pub fn cell(&self, id: StateId) -> Cell {
        self.cells[id.0]
    }

    pub(crate) fn graph(&self) -> &UnGraphMap<Cell, ()> {
        &self.graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn obstacles_are_excluded() {
        let layout = Layout::new(3, 3, [Cell::new(1, 1)]);
        let grid = GridState::new(layout);
        assert_eq!(grid.len(), 8);
        assert!(!grid.contains(Cell::new(1, 1)));
        assert_eq!(
            grid.require(Cell::new(1, 1)),
            Err(GridError::NotReachable(Cell::new(1, 1)))
        );
    }

    #[test]
    fn ids_round_trip_to_cells() {
        let grid = GridState::new(Layout::open(4, 2));
        for id in grid.ids() {
            assert_eq!(grid.id(grid.cell(id)), Some(id));
        }
        assert_eq!(grid.cell(StateId(0)), Cell::new(0, 0));
        assert_eq!(grid.cell(StateId(4)), Cell::new(0, 1));
    }

    #[test]
    fn graph_links_orthogonal_neighbours() {
        let grid = GridState::new(Layout::new(3, 1, [Cell::new(1, 0)]));
        assert_eq!(grid.graph().node_count(), 2);
        assert_eq!(grid.graph().edge_count(), 0);

        let open = GridState::new(Layout::open(2, 2));
        assert_eq!(open.graph().edge_count(), 4);
        assert!(open.graph().contains_edge(Cell::new(0, 0), Cell::new(0, 1)));
        assert!(!open.graph().contains_edge(Cell::new(0, 0), Cell::new(1, 1)));
    }
}
