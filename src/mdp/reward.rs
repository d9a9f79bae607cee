//! Reward model: raw world features plus shaping.
//!
//! Rules are applied in a fixed order so that later, more important rules
//! are never overwritten by earlier ones:
//!
//! 1. **Living cost** on every reachable cell.
//! 2. **Collectibles**, suppressed in dead ends, with a terminal bonus when
//!    only one remains.
//! 3. **Power-ups**.
//! 4. **Reduced-threat hazards** (timer > 1), boosted and radiated when the
//!    agent can catch them in time.
//! 5. **Full-threat hazards** (timer 0), always radiated to repel.

use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::config::RewardConfig;
use super::table::RewardTable;
use crate::grid::{Cell, GridState};

/// A hazard and its remaining reduced-threat time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Hazard {
    pub cell: Cell,
    /// Turns left before the hazard is dangerous again. 0 means dangerous now.
    pub timer: u32,
}

/// How a hazard is treated by the reward model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Threat {
    /// Timer above 1: the hazard can be chased.
    Reduced,
    /// Timer of exactly 1: about to turn dangerous, left unshaped.
    Waning,
    /// Timer 0: the hazard must be avoided.
    Full,
}

impl Hazard {
    pub fn new(cell: Cell, timer: u32) -> Self {
        Self { cell, timer }
    }

    /// A hazard reported at a continuous position, snapped to the nearest cell.
    pub fn from_position(x: f64, y: f64, timer: u32) -> Self {
        Self::new(Cell::from_position(x, y), timer)
    }

    pub fn threat(&self) -> Threat {
        match self.timer {
            0 => Threat::Full,
            1 => Threat::Waning,
            _ => Threat::Reduced,
        }
    }
}

/// World features that shape this turn's rewards.
#[derive(Debug, Clone, Copy)]
pub struct Features<'a> {
    /// Where the agent stands; used to judge whether a hazard is catchable.
    pub agent: Cell,
    pub collectibles: &'a [Cell],
    pub power_ups: &'a [Cell],
    pub hazards: &'a [Hazard],
}

impl<'a> Features<'a> {
    /// Features with nothing on the board but the agent.
    pub fn new(agent: Cell) -> Self {
        Self {
            agent,
            collectibles: &[],
            power_ups: &[],
            hazards: &[],
        }
    }

    pub fn with_collectibles(mut self, collectibles: &'a [Cell]) -> Self {
        self.collectibles = collectibles;
        self
    }

    pub fn with_power_ups(mut self, power_ups: &'a [Cell]) -> Self {
        self.power_ups = power_ups;
        self
    }

    pub fn with_hazards(mut self, hazards: &'a [Hazard]) -> Self {
        self.hazards = hazards;
        self
    }
}

/// Builds reward tables from world features.
#[derive(Debug, Clone)]
pub struct RewardModel {
    config: RewardConfig,
}

impl RewardModel {
    pub fn new(config: RewardConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RewardConfig {
        &self.config
    }

    /// Computes the reward of every reachable cell of `grid`.
    ///
    /// Features on blocked or out-of-layout cells are ignored.
    pub fn build_rewards(&self, grid: &Arc<GridState>, features: &Features<'_>) -> RewardTable {
        let cfg = &self.config;
        let layout = grid.layout();
        let mut rewards = RewardTable::filled(Arc::clone(grid), cfg.living_cost);

        for &cell in features.collectibles {
            let Some(id) = grid.id(cell) else {
                continue;
            };
            let walls = layout.adjacent_obstacles(cell);
            rewards[id] = if walls <= cfg.crowded_obstacle_count {
                cfg.collectible_reward
            } else {
                cfg.collectible_reward / (1 + walls * walls) as f64
            };
        }
        if let [last] = features.collectibles {
            if let Some(id) = grid.id(*last) {
                rewards[id] += cfg.collectible_reward;
            }
        }

        for &cell in features.power_ups {
            if let Some(id) = grid.id(cell) {
                rewards[id] = cfg.power_up_reward;
            }
        }

        // Reduced-threat hazards first, so repelling penalties are never
        // overwritten by an attracting bonus.
        let mut catchable = 0usize;
        for hazard in features.hazards {
            if hazard.threat() != Threat::Reduced {
                continue;
            }
            let Some(id) = grid.id(hazard.cell) else {
                continue;
            };
            if self.is_catchable(grid, features.agent, hazard) {
                catchable += 1;
                rewards[id] = cfg.reduced_hazard_reward * cfg.reduced_hazard_boost;
                radiate(&mut rewards, hazard.cell, cfg.radius);
            } else {
                rewards[id] = cfg.reduced_hazard_reward;
            }
        }

        for hazard in features.hazards {
            if hazard.threat() != Threat::Full {
                continue;
            }
            let Some(id) = grid.id(hazard.cell) else {
                continue;
            };
            rewards[id] = cfg.hazard_reward;
            radiate(&mut rewards, hazard.cell, cfg.radius);
        }

        log::debug!(
            "built rewards for {} cells: {} collectibles, {} power-ups, {} hazards ({} catchable)",
            rewards.len(),
            features.collectibles.len(),
            features.power_ups.len(),
            features.hazards.len(),
            catchable
        );

        rewards
    }

    /// Whether the agent can reach a reduced-threat hazard before its timer
    /// runs out. An unreachable hazard is never catchable.
    fn is_catchable(&self, grid: &GridState, agent: Cell, hazard: &Hazard) -> bool {
        match grid.distance(agent, hazard.cell) {
            Some(hops) => (hops as f64) / (hazard.timer as f64) < self.config.catchable_threshold,
            None => false,
        }
    }
}

/// Spreads the reward of `origin` to the cells within `radius` hops.
///
/// A cell `i` hops away receives `R - i·(R / radius)` on top of its current
/// reward, where `R` is the origin's reward, decaying linearly to zero at
/// `radius`. Contributions from several origins add up without clamping.
/// The origin itself is left unchanged, as is everything when `origin` is
/// blocked or `radius` is 0.
pub fn radiate(rewards: &mut RewardTable, origin: Cell, radius: usize) {
    if radius == 0 {
        return;
    }
    let grid = Arc::clone(rewards.grid());
    let Some(origin_id) = grid.id(origin) else {
        return;
    };

    let reward = rewards[origin_id];
    let step = reward / radius as f64;
    let layers = grid.bfs_layers(origin, radius);
    for (hops, layer) in layers.iter().enumerate().skip(1) {
        let contribution = reward - hops as f64 * step;
        for &cell in layer {
            if let Some(id) = grid.id(cell) {
                rewards[id] += contribution;
            }
        }
    }
}
