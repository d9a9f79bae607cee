//! Per-game counters kept by the agent.

use std::fmt;
use std::time::Duration;

/// Running totals over one game.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AgentStats {
    /// Moves returned to the host.
    pub moves: u64,
    /// Successful solves.
    pub solves: u64,
    /// Wall time spent in successful solves.
    pub total_solve_time: Duration,
    /// Sweeps or rounds used by the latest solve.
    pub last_iterations: usize,
    /// Reachable cells of the registered layout.
    pub states: usize,
    /// Turns where planning failed and a fallback move was returned.
    pub fallbacks: u64,
}

impl AgentStats {
    /// Mean wall time of a successful solve.
    pub fn mean_solve_time(&self) -> Duration {
        if self.solves == 0 {
            return Duration::ZERO;
        }
        let nanos = self.total_solve_time.as_nanos() / u128::from(self.solves);
        Duration::from_nanos(nanos as u64)
    }

    pub(crate) fn record_solve(&mut self, elapsed: Duration, iterations: usize) {
        self.solves += 1;
        self.total_solve_time += elapsed;
        self.last_iterations = iterations;
    }
}

impl fmt::Display for AgentStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Agent Summary ===")?;
        writeln!(f, "  States:           {}", self.states)?;
        writeln!(f, "  Moves:            {}", self.moves)?;
        writeln!(f, "  Solves:           {}", self.solves)?;
        writeln!(f, "  Mean solve time:  {:?}", self.mean_solve_time())?;
        writeln!(f, "  Last iterations:  {}", self.last_iterations)?;
        write!(f, "  Fallback moves:   {}", self.fallbacks)
    }
}
