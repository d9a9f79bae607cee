//! The grid decision process: rewards, transitions and the two solvers.
//!
//! Transitions depend only on the layout and are built once per game;
//! rewards are rebuilt every turn from the current world features. Either
//! solver turns the pair into a [`Solution`], from which
//! [`PolicyExtractor`] (or the solver's own action map) picks the move.

pub mod config;
pub mod error;
pub mod extractor;
pub mod policy_iteration;
pub mod reward;
pub mod solver;
pub mod table;
pub mod transition;
pub mod value_iteration;


pub use config::{RewardConfig, SolverConfig};
pub use error::MdpError;
pub use extractor::PolicyExtractor;
pub use policy_iteration::PolicyIteration;
pub use reward::{radiate, Features, Hazard, RewardModel, Threat};
pub use solver::{Solution, Solver, SolverKind};
pub use table::{CellTable, Policy, RewardTable, ValueLookup, ValueTable};
pub use transition::{Outcomes, TransitionTable};
pub use value_iteration::ValueIteration;
