//! One-step lookahead from a value function to the move for this turn.

use super::config::SolverConfig;
use super::error::MdpError;
use super::table::ValueLookup;
use crate::grid::{Action, Cell, GridError, Layout};

/// A later action must beat the incumbent by more than this to win a tie.
pub const TIE_EPSILON: f64 = 1e-9;

/// Arg-max over per-action utilities indexed like [`Action::ALL`].
///
/// Ties resolve to the earliest action, so North > South > East > West.
pub(crate) fn best_action(utilities: &[f64; 4]) -> (Action, f64) {
    let mut best = (Action::ALL[0], utilities[0]);
    for (&action, &utility) in Action::ALL.iter().zip(utilities.iter()).skip(1) {
        if utility > best.1 + TIE_EPSILON {
            best = (action, utility);
        }
    }
    best
}

/// Picks the action with the highest expected next-cell utility.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolicyExtractor {
    action_prob: f64,
    other_prob: f64,
}

impl PolicyExtractor {
    pub fn new(config: &SolverConfig) -> Self {
        Self::with_probabilities(config.action_prob, config.other_prob())
    }

    pub fn with_probabilities(action_prob: f64, other_prob: f64) -> Self {
        Self {
            action_prob,
            other_prob,
        }
    }

    /// Expected utility of each action from `current`, in [`Action::ALL`] order.
    ///
    /// Neighbours that are obstacles or outside the layout are replaced by
    /// `current`. The reward of `current` is left out; it is common to all
    /// actions.
    ///
    /// # Errors
    ///
    /// `InconsistentState` if `current` is blocked or `values` has no entry
    /// for a cell the lookahead lands on.
    pub fn expected_utilities<V: ValueLookup + ?Sized>(
        &self,
        current: Cell,
        values: &V,
        layout: &Layout,
    ) -> Result<[f64; 4], MdpError> {
        if layout.is_blocked(current) {
            return Err(GridError::NotReachable(current).into());
        }
        let value = |cell: Cell| values.value_at(cell).ok_or(GridError::NotReachable(cell));

        let mut utilities = [0.0; 4];
        for (slot, action) in utilities.iter_mut().zip(Action::ALL) {
            let [left, right] = action.perpendicular();
            *slot = self.action_prob * value(layout.landing(current, action))?
                + self.other_prob * value(layout.landing(current, left))?
                + self.other_prob * value(layout.landing(current, right))?;
        }
        Ok(utilities)
    }

    /// The arg-max action from `current`.
    pub fn choose_action<V: ValueLookup + ?Sized>(
        &self,
        current: Cell,
        values: &V,
        layout: &Layout,
    ) -> Result<Action, MdpError> {
        let utilities = self.expected_utilities(current, values, layout)?;
        Ok(best_action(&utilities).0)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use super::*;
    use crate::grid::GridState;
    use crate::mdp::table::ValueTable;

    fn extractor() -> PolicyExtractor {
        PolicyExtractor::new(&SolverConfig::default())
    }

    #[test]
    fn ties_prefer_north_then_south_then_east() {
        assert_eq!(best_action(&[1.0, 1.0, 1.0, 1.0]).0, Action::North);
        assert_eq!(best_action(&[0.0, 2.0, 2.0, 2.0]).0, Action::South);
        assert_eq!(best_action(&[0.0, 0.0, 3.0, 3.0]).0, Action::East);
        assert_eq!(best_action(&[0.0, 0.0, 0.0, 1.0]).0, Action::West);
    }

    #[test]
    fn near_ties_within_epsilon_keep_priority() {
        let (action, _) = best_action(&[1.0, 1.0 + 1e-12, 1.0, 1.0]);
        assert_eq!(action, Action::North);
    }

    #[test]
    fn chooses_toward_higher_value() {
        let layout = Layout::open(3, 1);
        let grid = Arc::new(GridState::new(layout.clone()));
        let values = ValueTable::from_fn(grid, |c| c.x as f64);
        let action = extractor().choose_action(Cell::new(1, 0), &values, &layout).unwrap();
        assert_eq!(action, Action::East);
    }

    #[test]
    fn blocked_neighbours_count_as_staying() {
        let layout = Layout::open(1, 1);
        let values = HashMap::from([(Cell::new(0, 0), 4.0)]);
        let utilities = extractor()
            .expected_utilities(Cell::new(0, 0), &values, &layout)
            .unwrap();
        for u in utilities {
            assert!((u - 4.0).abs() < 1e-12);
        }
    }

    #[test]
    fn sparse_values_work() {
        let layout = Layout::new(3, 3, [Cell::new(0, 1)]);
        let mut values: HashMap<Cell, f64> = HashMap::new();
        for x in 0..3 {
            for y in 0..3 {
                values.insert(Cell::new(x, y), 0.0);
            }
        }
        values.insert(Cell::new(1, 0), 10.0);
        let action = extractor().choose_action(Cell::new(1, 1), &values, &layout).unwrap();
        assert_eq!(action, Action::South);
    }

    #[test]
    fn missing_value_is_an_error() {
        let layout = Layout::open(2, 1);
        let values = HashMap::from([(Cell::new(0, 0), 1.0)]);
        let err = extractor()
            .choose_action(Cell::new(0, 0), &values, &layout)
            .unwrap_err();
        assert_eq!(
            err,
            MdpError::InconsistentState(GridError::NotReachable(Cell::new(1, 0)))
        );
    }

    #[test]
    fn blocked_current_cell_is_an_error() {
        let layout = Layout::new(2, 1, [Cell::new(1, 0)]);
        let values = HashMap::from([(Cell::new(0, 0), 1.0)]);
        assert!(extractor()
            .choose_action(Cell::new(1, 0), &values, &layout)
            .is_err());
    }
}
