//! Policy iteration: exact evaluation of a fixed action map alternated with
//! greedy improvement.
//!
//! ```text
//! Evaluate ──► Improve ──► (no action changed) ──► Done
//!    ▲            │
//!    └────────────┘
//! ```
//!
//! Evaluation uses the same Jacobi sweep ordering as value iteration and is
//! warm-started from the previous round's values.

use std::sync::Arc;

use super::config::SolverConfig;
use super::error::MdpError;
use super::extractor::{best_action, TIE_EPSILON};
use super::table::{same_grid, Policy, RewardTable, ValueTable};
use super::transition::{mixture, TransitionTable};
use crate::grid::Action;

/// Action every cell starts with.
pub const INITIAL_ACTION: Action = Action::North;

/// Computes an optimal policy and its value table.
#[derive(Debug, Clone)]
pub struct PolicyIteration {
    config: SolverConfig,
}

impl PolicyIteration {
    pub const NAME: &'static str = "policy iteration";
    pub const EVALUATION_NAME: &'static str = "policy evaluation";

    /// Creates a solver, rejecting invalid parameters.
    pub fn new(config: SolverConfig) -> Result<Self, MdpError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Runs evaluate/improve rounds until no cell changes its action.
    ///
    /// # Errors
    ///
    /// - `LayoutMismatch` if rewards and transitions cover different grids
    /// - `NonConvergence` if an evaluation exceeds `max_sweeps`, or the policy
    ///   is still changing after `max_policy_rounds`
    pub fn solve(
        &self,
        rewards: &RewardTable,
        transitions: &TransitionTable,
    ) -> Result<(Policy, ValueTable), MdpError> {
        self.run(rewards, transitions)
            .map(|(policy, values, _)| (policy, values))
    }

    /// Like [`solve`](Self::solve), also reporting the number of rounds.
    pub(crate) fn run(
        &self,
        rewards: &RewardTable,
        transitions: &TransitionTable,
    ) -> Result<(Policy, ValueTable, usize), MdpError> {
        if !same_grid(rewards.grid(), transitions.grid()) {
            return Err(MdpError::LayoutMismatch);
        }

        let grid = Arc::clone(rewards.grid());
        let mut policy = Policy::filled(Arc::clone(&grid), INITIAL_ACTION);
        let mut values = ValueTable::filled(grid, 0.0);
        let mut changed = 0;

        for round in 1..=self.config.max_policy_rounds {
            values = self.evaluate(&policy, rewards, transitions, values)?;
            changed = self.improve(&mut policy, &values, transitions)?;
            if changed == 0 {
                log::debug!("{} stable after {round} rounds", Self::NAME);
                return Ok((policy, values, round));
            }
        }

        Err(MdpError::NonConvergence {
            solver: Self::NAME,
            iterations: self.config.max_policy_rounds,
            residual: changed as f64,
        })
    }

    /// Value of following `policy` forever, starting the sweeps from `initial`.
    ///
    /// Each sweep backs every cell up through its assigned action only.
    pub fn evaluate(
        &self,
        policy: &Policy,
        rewards: &RewardTable,
        transitions: &TransitionTable,
        initial: ValueTable,
    ) -> Result<ValueTable, MdpError> {
        if !policy.shares_grid_with(rewards)
            || !initial.shares_grid_with(rewards)
            || !same_grid(rewards.grid(), transitions.grid())
        {
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

        for _ in 0..max_sweeps {
            delta = 0.0;
            for id in grid.ids() {
                let expected = mixture(&current, transitions.outcomes(id, policy[id]), p, q);
                let updated = rewards[id] + gamma * expected;
                delta = delta.max((updated - current[id]).abs());
                next[id] = updated;
            }
            std::mem::swap(&mut current, &mut next);

            if delta < tolerance {
                return Ok(current);
            }
        }

        Err(MdpError::NonConvergence {
            solver: Self::EVALUATION_NAME,
            iterations: max_sweeps,
            residual: delta,
        })
    }

    /// Points every cell at its greedy one-step-lookahead action.
    ///
    /// Ties go to the earlier action in [`Action::ALL`]. Returns how many
    /// cells found a strictly better action; switching between tied actions
    /// does not count as a change.
    pub fn improve(
        &self,
        policy: &mut Policy,
        values: &ValueTable,
        transitions: &TransitionTable,
    ) -> Result<usize, MdpError> {
        if !policy.shares_grid_with(values) || !same_grid(values.grid(), transitions.grid()) {
            return Err(MdpError::LayoutMismatch);
        }

        let p = self.config.action_prob;
        let q = self.config.other_prob();
        let grid = Arc::clone(values.grid());

        let mut changed = 0;
        for id in grid.ids() {
            let utilities = Action::ALL.map(|a| mixture(values, transitions.outcomes(id, a), p, q));
            let (best, best_utility) = best_action(&utilities);
            let current = policy[id];
            if best != current {
                if best_utility > utilities[current.index()] + TIE_EPSILON {
                    changed += 1;
                }
                policy[id] = best;
            }
        }
        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{Cell, GridState, Layout};

    fn setup(layout: Layout, reward: impl FnMut(Cell) -> f64) -> (RewardTable, TransitionTable) {
        let grid = Arc::new(GridState::new(layout));
        let rewards = RewardTable::from_fn(Arc::clone(&grid), reward);
        (rewards, TransitionTable::build(grid))
    }

    #[test]
    fn evaluation_follows_assigned_action_only() {
        // Two cells; the west cell pays 1, the east cell pays 0.
        let (rewards, transitions) = setup(Layout::open(2, 1), |c| if c.x == 0 { 1.0 } else { 0.0 });
        let cfg = SolverConfig {
            action_prob: 1.0,
            tolerance: 1e-10,
            ..SolverConfig::default()
        };
        let solver = PolicyIteration::new(cfg).unwrap();
        let grid = Arc::clone(rewards.grid());

        // Everyone walks east: the west cell pays once, then the agent sits on 0.
        let policy = Policy::filled(Arc::clone(&grid), Action::East);
        let values = solver
            .evaluate(&policy, &rewards, &transitions, ValueTable::filled(grid, 0.0))
            .unwrap();
        assert!((values.get(Cell::new(0, 0)).unwrap() - 1.0).abs() < 1e-8);
        assert!(values.get(Cell::new(1, 0)).unwrap().abs() < 1e-8);
    }

    #[test]
    fn improvement_points_toward_reward() {
        let (rewards, transitions) = setup(Layout::open(3, 1), |c| if c.x == 2 { 5.0 } else { -1.0 });
        let solver = PolicyIteration::new(SolverConfig::default()).unwrap();
        let (policy, _) = solver.solve(&rewards, &transitions).unwrap();
        assert_eq!(policy.get(Cell::new(0, 0)), Ok(&Action::East));
        assert_eq!(policy.get(Cell::new(1, 0)), Ok(&Action::East));
    }

    #[test]
    fn improve_reports_strict_changes_only() {
        let (rewards, transitions) = setup(Layout::open(3, 3), |_| 0.0);
        let solver = PolicyIteration::new(SolverConfig::default()).unwrap();
        let grid = Arc::clone(rewards.grid());
        let values = ValueTable::filled(Arc::clone(&grid), 1.0);

        // Flat values: every action ties, so West cells move to North silently.
        let mut policy = Policy::filled(grid, Action::West);
        let changed = solver.improve(&mut policy, &values, &transitions).unwrap();
        assert_eq!(changed, 0);
        assert!(policy.iter().all(|(_, &a)| a == Action::North));
    }

    #[test]
    fn round_cap_is_fatal() {
        let (rewards, transitions) = setup(Layout::open(4, 1), |c| if c.x == 3 { 5.0 } else { -1.0 });
        let cfg = SolverConfig {
            max_policy_rounds: 1,
            ..SolverConfig::default()
        };
        let err = PolicyIteration::new(cfg)
            .unwrap()
            .solve(&rewards, &transitions)
            .unwrap_err();
        assert!(matches!(
            err,
            MdpError::NonConvergence {
                solver: PolicyIteration::NAME,
                iterations: 1,
                ..
            }
        ));
    }

    #[test]
    fn evaluation_cap_is_fatal() {
        let (rewards, transitions) = setup(Layout::open(2, 2), |_| 1.0);
        let cfg = SolverConfig {
            max_sweeps: 2,
            tolerance: 1e-9,
            ..SolverConfig::default()
        };
        let err = PolicyIteration::new(cfg)
            .unwrap()
            .solve(&rewards, &transitions)
            .unwrap_err();
        assert!(matches!(
            err,
            MdpError::NonConvergence {
                solver: PolicyIteration::EVALUATION_NAME,
                ..
            }
        ));
    }
}
