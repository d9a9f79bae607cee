use std::time::Duration;

use thiserror::Error;

use crate::grid::GridError;

/// Errors raised while building or solving the decision process.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MdpError {
    #[error("Invalid solver configuration: {0}")]
    InvalidConfig(String),

    /// `residual` is the last sweep delta, or for policy iteration the number
    /// of cells whose action was still changing.
    #[error("{solver} did not converge within {iterations} iterations (residual {residual})")]
    NonConvergence {
        solver: &'static str,
        iterations: usize,
        residual: f64,
    },

    #[error("Inconsistent state: {0}")]
    InconsistentState(#[from] GridError),

    #[error("Reward and transition tables were built for different layouts")]
    LayoutMismatch,

    #[error("Solve took {elapsed:?}, over the {budget:?} budget")]
    BudgetExceeded { elapsed: Duration, budget: Duration },

    #[error("No layout has been registered")]
    NotRegistered,
}
