//! Solver parameters and reward-shaping presets.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::error::MdpError;
use crate::grid::Layout;

/// Parameters shared by both solvers and the policy extractor.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SolverConfig {
    /// Discount factor, in `[0, 1)`.
    pub gamma: f64,
    /// Probability that a chosen move is executed as intended, in `(0, 1]`.
    pub action_prob: f64,
    /// Sweeps stop once no value moves by this much or more.
    pub tolerance: f64,
    /// Cap on sweeps per value solve (and per policy evaluation).
    pub max_sweeps: usize,
    /// Cap on evaluate/improve rounds in policy iteration.
    pub max_policy_rounds: usize,
}

impl SolverConfig {
    /// Probability of slipping into each of the two perpendicular moves.
    pub fn other_prob(&self) -> f64 {
        (1.0 - self.action_prob) / 2.0
    }

    /// Rejects parameters the solvers cannot work with. Nothing is clamped.
    pub fn validate(&self) -> Result<(), MdpError> {
        if self.tolerance.is_nan() || self.tolerance <= 0.0 {
            return Err(MdpError::InvalidConfig(format!(
                "tolerance must be positive, got {}",
                self.tolerance
            )));
        }
        if !(0.0..1.0).contains(&self.gamma) {
            return Err(MdpError::InvalidConfig(format!(
                "gamma must lie in [0, 1), got {}",
                self.gamma
            )));
        }
        if self.action_prob.is_nan() || self.action_prob <= 0.0 || self.action_prob > 1.0 {
            return Err(MdpError::InvalidConfig(format!(
                "action_prob must lie in (0, 1], got {}",
                self.action_prob
            )));
        }
        if self.max_sweeps == 0 || self.max_policy_rounds == 0 {
            return Err(MdpError::InvalidConfig(
                "iteration caps must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            gamma: 0.9,
            action_prob: 0.8,
            tolerance: 0.001,
            max_sweeps: 10_000,
            max_policy_rounds: 1_000,
        }
    }
}

/// Reward values and shaping knobs used to build a reward table.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RewardConfig {
    // --- Baseline ---
    /// Reward of every reachable cell before features are applied.
    pub living_cost: f64,

    // --- Collectibles ---
    pub collectible_reward: f64,
    /// Collectibles with more adjacent obstacles than this are suppressed.
    pub crowded_obstacle_count: usize,
    pub power_up_reward: f64,

    // --- Hazards ---
    /// Reward of a full-threat hazard (timer 0).
    pub hazard_reward: f64,
    /// Reward of a reduced-threat hazard (timer > 1).
    pub reduced_hazard_reward: f64,
    /// Multiplier applied to a reduced-threat hazard the agent can catch.
    pub reduced_hazard_boost: f64,
    /// A reduced-threat hazard is catchable when distance / timer is below this.
    pub catchable_threshold: f64,
    /// Hop radius over which hazard rewards are radiated.
    pub radius: usize,
}

impl RewardConfig {
    /// Width + height below which a layout counts as small.
    pub const SMALL_LAYOUT_SPAN: u32 = 20;

    /// Preset tuned for small layouts: stronger collectibles, wide radiation.
    pub fn small() -> Self {
        Self {
            living_cost: -1.0,
            collectible_reward: 11.0,
            crowded_obstacle_count: 2,
            power_up_reward: 9.0,
            hazard_reward: -25.0,
            reduced_hazard_reward: 8.0,
            reduced_hazard_boost: 1.0,
            catchable_threshold: 2.0,
            radius: 17,
        }
    }

    /// Preset tuned for medium and larger layouts.
    pub fn medium() -> Self {
        Self {
            living_cost: -1.0,
            collectible_reward: 5.0,
            crowded_obstacle_count: 2,
            power_up_reward: 8.0,
            hazard_reward: -25.0,
            reduced_hazard_reward: 4.0,
            reduced_hazard_boost: 3.0,
            catchable_threshold: 2.0,
            radius: 5,
        }
    }

    /// Picks the preset matching the size of `layout`.
    pub fn for_layout(layout: &Layout) -> Self {
        if layout.width() + layout.height() < Self::SMALL_LAYOUT_SPAN {
            Self::small()
        } else {
            Self::medium()
        }
    }
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self::medium()
    }
}
