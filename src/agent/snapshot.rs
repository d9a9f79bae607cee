//! Read-only view of the world the agent plans against each turn.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::grid::layout::scan_ascii;
use crate::grid::{Action, Cell, GridError, Layout};
use crate::mdp::Hazard;

/// A move the host game accepts: a step or the no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Move {
    Step(Action),
    Stay,
}

impl From<Action> for Move {
    fn from(action: Action) -> Self {
        Move::Step(action)
    }
}

/// What the agent needs to know about the world on its turn.
pub trait WorldSnapshot {
    fn agent_position(&self) -> Cell;
    fn layout(&self) -> &Layout;
    fn collectibles(&self) -> &[Cell];
    fn power_ups(&self) -> &[Cell];
    fn hazards(&self) -> &[Hazard];
    /// Moves the host will accept this turn, possibly including [`Move::Stay`].
    fn legal_moves(&self) -> &[Move];
}

/// A plain owned snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub agent: Cell,
    pub layout: Layout,
    pub collectibles: Vec<Cell>,
    pub power_ups: Vec<Cell>,
    pub hazards: Vec<Hazard>,
    pub legal_moves: Vec<Move>,
}

/// Map character for a collectible.
pub const COLLECTIBLE_CHAR: char = '.';
/// Map character for a power-up.
pub const POWER_UP_CHAR: char = 'o';
/// Map character for a full-threat hazard.
pub const HAZARD_CHAR: char = 'G';
/// Map character for the agent.
pub const AGENT_CHAR: char = 'P';

impl Snapshot {
    /// Reads a map such as
    ///
    /// ```text
    /// %%%%%%
    /// %P. G%
    /// %o%% %
    /// %%%%%%
    /// ```
    ///
    /// Unknown characters are treated as free cells. Legal moves are derived
    /// from the layout.
    pub fn parse(map: &str) -> Result<Self, GridError> {
        let scanned = scan_ascii(map)?;

        let mut agent = None;
        let mut collectibles = Vec::new();
        let mut power_ups = Vec::new();
        let mut hazards = Vec::new();
        for (cell, mark) in scanned.marks {
            match mark {
                AGENT_CHAR => agent = Some(cell),
                COLLECTIBLE_CHAR => collectibles.push(cell),
                POWER_UP_CHAR => power_ups.push(cell),
                HAZARD_CHAR => hazards.push(Hazard::new(cell, 0)),
                _ => {}
            }
        }
        let agent = agent.ok_or(GridError::MissingAgent)?;

        let mut snapshot = Self {
            agent,
            layout: scanned.layout,
            collectibles,
            power_ups,
            hazards,
            legal_moves: Vec::new(),
        };
        snapshot.refresh_legal_moves();
        Ok(snapshot)
    }

    /// Recomputes the legal moves from the layout and the agent position.
    pub fn refresh_legal_moves(&mut self) {
        self.legal_moves = legal_moves_for(&self.layout, self.agent);
    }
}

/// [`Move::Stay`] plus every step that does not run into an obstacle.
pub fn legal_moves_for(layout: &Layout, cell: Cell) -> Vec<Move> {
    std::iter::once(Move::Stay)
        .chain(
            Action::ALL
                .into_iter()
                .filter(|&a| !layout.is_blocked(cell.step(a)))
                .map(Move::Step),
        )
        .collect()
}

impl WorldSnapshot for Snapshot {
    fn agent_position(&self) -> Cell {
        self.agent
    }

    fn layout(&self) -> &Layout {
        &self.layout
    }

    fn collectibles(&self) -> &[Cell] {
        &self.collectibles
    }

    fn power_ups(&self) -> &[Cell] {
        &self.power_ups
    }

    fn hazards(&self) -> &[Hazard] {
        &self.hazards
    }

    fn legal_moves(&self) -> &[Move] {
        &self.legal_moves
    }
}
