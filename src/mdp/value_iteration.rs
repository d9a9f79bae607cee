//! Value iteration over the stochastic grid model.
//!
//! Each sweep applies the Bellman backup
//!
//! ```text
//! V'(s) = R(s) + γ · max_a [ p·V(a₀) + q·V(a₁) + q·V(a₂) ]
//! ```
//!
//! to every reachable cell, reading only the previous sweep's values
//! (Jacobi ordering). Iteration stops once the largest change in a sweep
//! drops below the tolerance.

use std::sync::Arc;

use super::config::SolverConfig;
use super::error::MdpError;
use super::table::{same_grid, RewardTable, ValueTable};
use super::transition::{mixture, TransitionTable};
use crate::grid::Action;

/// Computes the optimal value function of a reward/transition pair.
#[derive(Debug, Clone)]
pub struct ValueIteration {
    config: SolverConfig,
}

impl ValueIteration {
    pub const NAME: &'static str = "value iteration";

    /// Creates a solver, rejecting invalid parameters.
    pub fn new(config: SolverConfig) -> Result<Self, MdpError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Solves from an all-zero value table.
    ///
    /// # Errors
    ///
    /// - `LayoutMismatch` if rewards and transitions cover different grids
    /// - `NonConvergence` if `max_sweeps` pass without reaching the tolerance
    pub fn solve(
        &self,
        rewards: &RewardTable,
        transitions: &TransitionTable,
    ) -> Result<ValueTable, MdpError> {
        let initial = ValueTable::filled(Arc::clone(rewards.grid()), 0.0);
        self.solve_from(rewards, transitions, initial)
    }

    /// Solves starting from `initial` instead of zeros.
    pub fn solve_from(
        &self,
        rewards: &RewardTable,
        transitions: &TransitionTable,
        initial: ValueTable,
    ) -> Result<ValueTable, MdpError> {
        self.run(rewards, transitions, initial).map(|(values, _)| values)
    }

    /// Runs the sweeps, returning the converged table and the sweep count.
    pub(crate) fn run(
        &self,
        rewards: &RewardTable,
        transitions: &TransitionTable,
        initial: ValueTable,
    ) -> Result<(ValueTable, usize), MdpError> {
        if !rewards.shares_grid_with(&initial) || !same_grid(rewards.grid(), transitions.grid()) {
            return Err(MdpError::LayoutMismatch);
        }

        let SolverConfig {
            gamma,
            action_prob: p,
            tolerance,
            max_sweeps,
            ..
        } = self.config;
        let q = self.config.other_prob();
        let grid = Arc::clone(rewards.grid());

        let mut current = initial;
        let mut next = current.clone();
        let mut delta = f64::INFINITY;

        for sweep in 1..=max_sweeps {
            delta = 0.0;
            for id in grid.ids() {
                let best = Action::ALL
                    .iter()
                    .map(|&a| mixture(&current, transitions.outcomes(id, a), p, q))
                    .fold(f64::NEG_INFINITY, f64::max);
                let updated = rewards[id] + gamma * best;
                delta = delta.max((updated - current[id]).abs());
                next[id] = updated;
            }
            std::mem::swap(&mut current, &mut next);

            if delta < tolerance {
                log::debug!("{} converged after {sweep} sweeps (delta {delta:.3e})", Self::NAME);
                return Ok((current, sweep));
            }
        }

        Err(MdpError::NonConvergence {
            solver: Self::NAME,
            iterations: max_sweeps,
            residual: delta,
        })
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::grid::{Cell, GridState, Layout};

    fn setup(layout: Layout, reward: impl FnMut(Cell) -> f64) -> (RewardTable, TransitionTable) {
        let grid = Arc::new(GridState::new(layout));
        let rewards = RewardTable::from_fn(Arc::clone(&grid), reward);
        (rewards, TransitionTable::build(grid))
    }

    fn tight() -> SolverConfig {
        SolverConfig {
            tolerance: 1e-9,
            ..SolverConfig::default()
        }
    }

    #[test]
    fn rejects_invalid_config() {
        let cfg = SolverConfig {
            gamma: 1.0,
            ..SolverConfig::default()
        };
        assert!(matches!(
            ValueIteration::new(cfg),
            Err(MdpError::InvalidConfig(_))
        ));
    }

    #[test]
    fn single_cell_converges_to_geometric_sum() {
        let (rewards, transitions) = setup(Layout::open(1, 1), |_| 2.0);
        let solver = ValueIteration::new(tight()).unwrap();
        let values = solver.solve(&rewards, &transitions).unwrap();
        assert_abs_diff_eq!(*values.get(Cell::new(0, 0)).unwrap(), 20.0, epsilon = 1e-6);
    }

    #[test]
    fn walled_in_cell_behaves_like_single_cell() {
        let layout = Layout::from_ascii(
            "
            %%%
            % %
            %%%
            ",
        )
        .unwrap();
        let (rewards, transitions) = setup(layout, |_| -1.0);
        let values = ValueIteration::new(tight())
            .unwrap()
            .solve(&rewards, &transitions)
            .unwrap();
        assert_eq!(values.len(), 1);
        assert_abs_diff_eq!(*values.get(Cell::new(1, 1)).unwrap(), -10.0, epsilon = 1e-6);
    }

    #[test]
    fn values_rise_toward_reward() {
        let goal = Cell::new(4, 0);
        let (rewards, transitions) =
            setup(Layout::open(5, 1), |c| if c == goal { 5.0 } else { -1.0 });
        let values = ValueIteration::new(SolverConfig::default())
            .unwrap()
            .solve(&rewards, &transitions)
            .unwrap();
        for x in 0..4 {
            let here = *values.get(Cell::new(x, 0)).unwrap();
            let east = *values.get(Cell::new(x + 1, 0)).unwrap();
            assert!(east > here, "V({}) = {here} not below V({}) = {east}", x, x + 1);
        }
    }

    #[test]
    fn resolving_converged_values_is_idempotent() {
        let goal = Cell::new(2, 2);
        let (rewards, transitions) = setup(Layout::open(4, 4), |c| if c == goal { 3.0 } else { -0.5 });
        let cfg = SolverConfig {
            tolerance: 1e-6,
            ..SolverConfig::default()
        };
        let solver = ValueIteration::new(cfg).unwrap();
        let first = solver.solve(&rewards, &transitions).unwrap();
        let (again, sweeps) = solver.run(&rewards, &transitions, first.clone()).unwrap();
        assert_eq!(sweeps, 1);
        assert!(first.max_abs_diff(&again) < cfg.tolerance);
    }

    #[test]
    fn gamma_zero_values_equal_rewards() {
        let (rewards, transitions) = setup(Layout::open(3, 2), |c| c.x as f64);
        let cfg = SolverConfig {
            gamma: 0.0,
            ..SolverConfig::default()
        };
        let values = ValueIteration::new(cfg)
            .unwrap()
            .solve(&rewards, &transitions)
            .unwrap();
        assert!(values.max_abs_diff(&rewards) < 1e-12);
    }

    #[test]
    fn sweep_cap_is_fatal() {
        let (rewards, transitions) = setup(Layout::open(3, 3), |_| 1.0);
        let cfg = SolverConfig {
            max_sweeps: 3,
            tolerance: 1e-9,
            ..SolverConfig::default()
        };
        let err = ValueIteration::new(cfg)
            .unwrap()
            .solve(&rewards, &transitions)
            .unwrap_err();
        match err {
            MdpError::NonConvergence {
                solver, iterations, ..
            } => {
                assert_eq!(solver, ValueIteration::NAME);
                assert_eq!(iterations, 3);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn mismatched_layouts_are_rejected() {
        let (rewards, _) = setup(Layout::open(2, 2), |_| 0.0);
        let (_, transitions) = setup(Layout::open(3, 2), |_| 0.0);
        let err = ValueIteration::new(SolverConfig::default())
            .unwrap()
            .solve(&rewards, &transitions)
            .unwrap_err();
        assert_eq!(err, MdpError::LayoutMismatch);
    }
}
