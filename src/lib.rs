//! gridmdp - Markov decision process planning for grid-world agents
//!
//! Builds per-turn reward tables and stochastic transition tables over a
//! 4-connected grid, solves them with value iteration or policy iteration,
//! and turns the result into a move for the agent.

pub mod agent;
pub mod grid;
pub mod mdp;

pub use agent::{AgentConfig, MdpAgent, Move, Snapshot, WorldSnapshot};
pub use grid::{Action, Cell, GridError, GridState, Layout};
pub use mdp::{
    MdpError, PolicyExtractor, PolicyIteration, RewardConfig, RewardModel, Solver, SolverConfig,
    SolverKind, TransitionTable, ValueIteration,
};
