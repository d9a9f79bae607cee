//! Common interface over the two solvers.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::config::SolverConfig;
use super::error::MdpError;
use super::policy_iteration::PolicyIteration;
use super::table::{Policy, RewardTable, ValueTable};
use super::transition::TransitionTable;
use super::value_iteration::ValueIteration;

/// Output of a solve.
#[derive(Debug, Clone)]
pub struct Solution {
    pub values: ValueTable,
    /// Direct action map, when the solver produces one.
    pub policy: Option<Policy>,
    /// Sweeps (value iteration) or improvement rounds (policy iteration).
    pub iterations: usize,
}

/// A solver for the grid decision process.
pub trait Solver: Send + Sync {
    /// Solves the process described by `rewards` and `transitions`.
    fn solve(
        &self,
        rewards: &RewardTable,
        transitions: &TransitionTable,
    ) -> Result<Solution, MdpError>;

    /// Returns a human-readable name for this solver.
    fn name(&self) -> &str;
}

impl Solver for ValueIteration {
    fn solve(
        &self,
        rewards: &RewardTable,
        transitions: &TransitionTable,
    ) -> Result<Solution, MdpError> {
        let initial = ValueTable::filled(rewards.grid().clone(), 0.0);
        let (values, iterations) = self.run(rewards, transitions, initial)?;
        Ok(Solution {
            values,
            policy: None,
            iterations,
        })
    }

    fn name(&self) -> &str {
        Self::NAME
    }
}

impl Solver for PolicyIteration {
    fn solve(
        &self,
        rewards: &RewardTable,
        transitions: &TransitionTable,
    ) -> Result<Solution, MdpError> {
        let (policy, values, iterations) = self.run(rewards, transitions)?;
        Ok(Solution {
            values,
            policy: Some(policy),
            iterations,
        })
    }

    fn name(&self) -> &str {
        Self::NAME
    }
}

/// Which solver an agent runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SolverKind {
    #[default]
    ValueIteration,
    PolicyIteration,
}

impl SolverKind {
    /// Instantiates the solver with `config`.
    pub fn build(self, config: SolverConfig) -> Result<Box<dyn Solver>, MdpError> {
        Ok(match self {
            SolverKind::ValueIteration => Box::new(ValueIteration::new(config)?),
            SolverKind::PolicyIteration => Box::new(PolicyIteration::new(config)?),
        })
    }
}
