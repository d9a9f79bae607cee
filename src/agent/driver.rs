//! Turn driver: from a world snapshot to the move for this turn.
//!
//! Lifecycle:
//!
//! ```text
//! register_initial_state ──► next_move ──► next_move ──► … ──► final_report
//!  (grid + transitions)      (rewards → solve → pick → legal check)
//! ```
//!
//! A failed turn never aborts the game: the error is logged and the agent
//! repeats its previous move when that is still legal, or stays put.

use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use super::snapshot::{Move, WorldSnapshot};
use super::stats::AgentStats;
use crate::grid::{Action, GridState, Layout};
use crate::mdp::{
    Features, MdpError, PolicyExtractor, RewardConfig, RewardModel, Solver, SolverConfig,
    SolverKind, TransitionTable,
};

/// Configuration of an [`MdpAgent`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentConfig {
    pub solver: SolverConfig,
    pub kind: SolverKind,
    /// Reward values; `None` picks the preset matching the layout size.
    pub rewards: Option<RewardConfig>,
    /// A solve slower than this fails the turn.
    pub time_budget: Option<Duration>,
    /// Seed for the random legal move used when the plan is not legal.
    pub seed: u64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            solver: SolverConfig::default(),
            kind: SolverKind::default(),
            rewards: None,
            time_budget: None,
            seed: 0,
        }
    }
}

/// Per-layout state, built once at registration.
#[derive(Debug)]
struct World {
    grid: Arc<GridState>,
    transitions: TransitionTable,
    rewards: RewardModel,
}

/// An agent that re-plans with an MDP solver every turn.
pub struct MdpAgent {
    config: AgentConfig,
    solver: Box<dyn Solver>,
    extractor: PolicyExtractor,
    world: Option<World>,
    previous: Option<Action>,
    stats: AgentStats,
    rng: StdRng,
}

impl MdpAgent {
    /// Creates an agent, rejecting an invalid solver configuration.
    pub fn new(config: AgentConfig) -> Result<Self, MdpError> {
        let solver = config.kind.build(config.solver)?;
        Ok(Self {
            extractor: PolicyExtractor::new(&config.solver),
            solver,
            world: None,
            previous: None,
            stats: AgentStats::default(),
            rng: StdRng::seed_from_u64(config.seed),
            config,
        })
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn solver_name(&self) -> &str {
        self.solver.name()
    }

    pub fn stats(&self) -> &AgentStats {
        &self.stats
    }

    /// Builds the grid and transition table for the snapshot's layout.
    pub fn register_initial_state<S: WorldSnapshot + ?Sized>(&mut self, snapshot: &S) {
        self.install(snapshot.layout());
        self.previous = None;
    }

    /// The action the solver recommends from the agent's current cell.
    ///
    /// Rewards are rebuilt from the snapshot; the grid and transitions are
    /// rebuilt only when the layout differs from the registered one.
    ///
    /// # Errors
    ///
    /// - `NotRegistered` before [`register_initial_state`](Self::register_initial_state)
    /// - `InconsistentState` if the agent stands on a blocked cell
    /// - `BudgetExceeded` if the solve overran the configured time budget
    /// - any solver error
    pub fn plan<S: WorldSnapshot + ?Sized>(&mut self, snapshot: &S) -> Result<Action, MdpError> {
        let layout = snapshot.layout();
        let stale = match &self.world {
            None => return Err(MdpError::NotRegistered),
            Some(world) => world.grid.layout() != layout,
        };
        if stale {
            log::debug!("layout changed; rebuilding transitions");
            self.install(layout);
        }
        let world = self.world.as_ref().ok_or(MdpError::NotRegistered)?;

        let agent = snapshot.agent_position();
        world.grid.require(agent)?;
        let features = Features::new(agent)
            .with_collectibles(snapshot.collectibles())
            .with_power_ups(snapshot.power_ups())
            .with_hazards(snapshot.hazards());
        let rewards = world.rewards.build_rewards(&world.grid, &features);

        let started = Instant::now();
        let solution = self.solver.solve(&rewards, &world.transitions)?;
        let elapsed = started.elapsed();
        if let Some(budget) = self.config.time_budget {
            if elapsed > budget {
                return Err(MdpError::BudgetExceeded { elapsed, budget });
            }
        }
        self.stats.record_solve(elapsed, solution.iterations);

        let action = match &solution.policy {
            Some(policy) => *policy.get(agent)?,
            None => self
                .extractor
                .choose_action(agent, &solution.values, world.grid.layout())?,
        };
        log::debug!(
            "{} chose {action} at {agent} after {} iterations in {elapsed:?}",
            self.solver.name(),
            solution.iterations
        );
        Ok(action)
    }

    /// The move to send to the host this turn. Never fails.
    ///
    /// The no-op is dropped from the legal set. The planned action is used
    /// when legal, otherwise a random legal step, otherwise [`Move::Stay`].
    pub fn next_move<S: WorldSnapshot + ?Sized>(&mut self, snapshot: &S) -> Move {
        let legal: Vec<Action> = snapshot
            .legal_moves()
            .iter()
            .filter_map(|m| match m {
                Move::Step(action) => Some(*action),
                Move::Stay => None,
            })
            .collect();

        let chosen = match self.plan(snapshot) {
            Ok(action) if legal.contains(&action) => Move::Step(action),
            Ok(action) => {
                log::debug!("planned {action} is not legal; picking a random legal move");
                legal
                    .choose(&mut self.rng)
                    .map_or(Move::Stay, |&a| Move::Step(a))
            }
            Err(err) => {
                log::warn!("turn failed ({err}); falling back");
                self.stats.fallbacks += 1;
                match self.previous {
                    Some(previous) if legal.contains(&previous) => Move::Step(previous),
                    _ => Move::Stay,
                }
            }
        };

        self.previous = match chosen {
            Move::Step(action) => Some(action),
            Move::Stay => None,
        };
        self.stats.moves += 1;
        chosen
    }

    /// Logs the game summary and returns the statistics.
    pub fn final_report(&self) -> &AgentStats {
        log::info!("{}\n{}", self.solver.name(), self.stats);
        &self.stats
    }

    fn install(&mut self, layout: &Layout) {
        let grid = Arc::new(GridState::new(layout.clone()));
        let transitions = TransitionTable::build(Arc::clone(&grid));
        let config = self
            .config
            .rewards
            .unwrap_or_else(|| RewardConfig::for_layout(layout));
        log::info!(
            "registered {}x{} layout with {} reachable cells ({})",
            layout.width(),
            layout.height(),
            grid.len(),
            self.solver.name()
        );
        self.stats.states = grid.len();
        self.world = Some(World {
            grid,
            transitions,
            rewards: RewardModel::new(config),
        });
    }
}
