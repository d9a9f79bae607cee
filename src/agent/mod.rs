//! Turn-by-turn agent built on the MDP solvers.
//!
//! The host game hands the agent a [`WorldSnapshot`] each turn and receives
//! a [`Move`] back. See [`MdpAgent`] for the lifecycle.

pub mod driver;
pub mod snapshot;
pub mod stats;

pub use driver::{AgentConfig, MdpAgent};
pub use snapshot::{legal_moves_for, Move, Snapshot, WorldSnapshot};
pub use stats::AgentStats;
