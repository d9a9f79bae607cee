use thiserror::Error;

use super::cell::Cell;

/// Errors raised by grid lookups and map parsing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("Cell {0} is an obstacle or lies outside the layout")]
    NotReachable(Cell),

    #[error("Layout map contains no rows")]
    EmptyMap,

    #[error("Layout row {row} has {found} columns, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Layout map does not mark an agent position")]
    MissingAgent,
}
