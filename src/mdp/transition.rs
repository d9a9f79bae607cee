//! Stochastic transition model over a grid.
//!
//! Every (cell, action) pair maps to three outcomes: the intended neighbour,
//! reached with probability `p`, and the two perpendicular neighbours, each
//! reached with probability `(1 - p) / 2`. Blocked outcomes are remapped to
//! the origin cell, so a wall bump is a self-transition.

use std::sync::Arc;

use rand::Rng;

use super::table::ValueTable;
use crate::grid::{Action, Cell, GridError, GridState, StateId};

/// The cells an action can land in: intended first, then the two side-slips.
pub type Outcomes = [StateId; 3];

/// Precomputed outcomes for every reachable cell and action.
///
/// Purely geometric; it only changes when the layout does.
#[derive(Debug, Clone)]
pub struct TransitionTable {
    grid: Arc<GridState>,
    outcomes: Vec<[Outcomes; 4]>,
}

impl TransitionTable {
    /// Computes the outcome triples of every reachable cell.
    pub fn build(grid: Arc<GridState>) -> Self {
        let layout = grid.layout();
        let outcomes = grid
            .ids()
            .map(|id| {
                let cell = grid.cell(id);
                Action::ALL.map(|action| {
                    let [left, right] = action.perpendicular();
                    [action, left, right].map(|a| grid.id(layout.landing(cell, a)).unwrap_or(id))
                })
            })
            .collect();

        Self { grid, outcomes }
    }

    pub fn grid(&self) -> &Arc<GridState> {
        &self.grid
    }

    /// Outcome triple of `action` taken from state `id`.
    pub fn outcomes(&self, id: StateId, action: Action) -> Outcomes {
        self.outcomes[id.index()][action.index()]
    }

    /// Outcome triple of `action` taken from `cell`, as cells.
    pub fn outcome_cells(&self, cell: Cell, action: Action) -> Result<[Cell; 3], GridError> {
        let id = self.grid.require(cell)?;
        Ok(self.outcomes(id, action).map(|o| self.grid.cell(o)))
    }

    /// Draws where `action` from state `id` actually ends up.
    pub fn sample<R: Rng + ?Sized>(
        &self,
        id: StateId,
        action: Action,
        action_prob: f64,
        rng: &mut R,
    ) -> StateId {
        let [intended, left, right] = self.outcomes(id, action);
        let roll: f64 = rng.gen();
        if roll < action_prob {
            intended
        } else if roll < action_prob + (1.0 - action_prob) / 2.0 {
            left
        } else {
            right
        }
    }
}

/// Expected next-state value `p·V[intended] + q·V[side1] + q·V[side2]`.
pub(crate) fn mixture(values: &ValueTable, outcomes: Outcomes, p: f64, q: f64) -> f64 {
    let [intended, left, right] = outcomes;
    p * values[intended] + q * values[left] + q * values[right]
}
