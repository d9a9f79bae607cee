//! Grid-world geometry: cells, moves, layouts and hop distances.
//!
//! A [`Layout`] is the immutable world outline registered once per game;
//! [`GridState`] enumerates its reachable cells and answers the distance
//! queries used by reward shaping.

pub mod cell;
pub mod error;
pub mod layout;
mod search;
pub mod state;

pub use cell::{Action, Cell};
pub use error::GridError;
pub use layout::Layout;
pub use state::{GridState, StateId};
