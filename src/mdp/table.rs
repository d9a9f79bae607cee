//! Per-cell tables keyed by the reachable cells of a grid.

use std::collections::HashMap;
use std::hash::BuildHasher;
use std::ops::{Index, IndexMut};
use std::sync::Arc;

use crate::grid::{Action, Cell, GridError, GridState, StateId};

/// One entry per reachable cell of a [`GridState`].
///
/// Obstacle and out-of-bounds cells never have an entry; looking one up is
/// reported as [`GridError::NotReachable`].
#[derive(Debug, Clone)]
pub struct CellTable<T> {
    grid: Arc<GridState>,
    entries: Vec<T>,
}

/// Scalar reward per reachable cell, rebuilt every turn.
pub type RewardTable = CellTable<f64>;

/// Utility estimate per reachable cell.
pub type ValueTable = CellTable<f64>;

/// Chosen action per reachable cell.
pub type Policy = CellTable<Action>;

impl<T: Clone> CellTable<T> {
    /// A table holding `value` for every reachable cell.
    pub fn filled(grid: Arc<GridState>, value: T) -> Self {
        let entries = vec![value; grid.len()];
        Self { grid, entries }
    }
}

impl<T> CellTable<T> {
    /// Builds a table by evaluating `f` on every reachable cell.
    pub fn from_fn(grid: Arc<GridState>, f: impl FnMut(Cell) -> T) -> Self {
        let entries = grid.cells().iter().copied().map(f).collect();
        Self { grid, entries }
    }

    pub fn grid(&self) -> &Arc<GridState> {
        &self.grid
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, cell: Cell) -> Result<&T, GridError> {
        let id = self.grid.require(cell)?;
        Ok(&self.entries[id.index()])
    }

    pub fn get_mut(&mut self, cell: Cell) -> Result<&mut T, GridError> {
        let id = self.grid.require(cell)?;
        Ok(&mut self.entries[id.index()])
    }

    pub fn set(&mut self, cell: Cell, value: T) -> Result<(), GridError> {
        *self.get_mut(cell)? = value;
        Ok(())
    }

    /// Entries in [`StateId`] order.
    pub fn as_slice(&self) -> &[T] {
        &self.entries
    }

    /// Iterates over `(cell, entry)` pairs in [`StateId`] order.
    pub fn iter(&self) -> impl Iterator<Item = (Cell, &T)> {
        self.grid.cells().iter().copied().zip(self.entries.iter())
    }

    /// Returns true if both tables index the same set of cells.
    pub fn shares_grid_with<U>(&self, other: &CellTable<U>) -> bool {
        same_grid(&self.grid, &other.grid)
    }
}

impl CellTable<f64> {
    /// Largest absolute entry-wise difference to `other`.
    ///
    /// Both tables must cover the same grid.
    pub fn max_abs_diff(&self, other: &CellTable<f64>) -> f64 {
        self.entries
            .iter()
            .zip(other.entries.iter())
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max)
    }
}

impl<T> Index<StateId> for CellTable<T> {
    type Output = T;

    fn index(&self, id: StateId) -> &T {
        &self.entries[id.index()]
    }
}

impl<T> IndexMut<StateId> for CellTable<T> {
    fn index_mut(&mut self, id: StateId) -> &mut T {
        &mut self.entries[id.index()]
    }
}

pub(crate) fn same_grid(a: &Arc<GridState>, b: &Arc<GridState>) -> bool {
    Arc::ptr_eq(a, b) || a.layout() == b.layout()
}

/// Read access to a value function, dense or sparse.
pub trait ValueLookup {
    /// Utility of `cell`, or `None` if the table has no entry for it.
    fn value_at(&self, cell: Cell) -> Option<f64>;
}

impl ValueLookup for CellTable<f64> {
    fn value_at(&self, cell: Cell) -> Option<f64> {
        self.get(cell).ok().copied()
    }
}

impl<S: BuildHasher> ValueLookup for HashMap<Cell, f64, S> {
    fn value_at(&self, cell: Cell) -> Option<f64> {
        self.get(&cell).copied()
    }
}
