//! Simulation configuration options.

use serde::{Deserialize, Serialize};
use types::Tick;

/// When the simulation ends. Evaluated after each completed tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum StopCriterion {
    /// Terminate once the active set is empty.
    #[default]
    NoAgents,
    /// Terminate once the clock passes the given tick.
    TimeThreshold(Tick),
}

/// Configuration for the auction engine.
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    /// Bound on how far into the future permits are materialized: with
    /// `Some(w)`, only ticks in `[t0, t0 + 1 + w]` are tradeable. `None`
    /// leaves the horizon unbounded.
    pub time_window: Option<Tick>,

    /// Stop criterion.
    pub stop: StopCriterion,

    /// Seed for the engine RNG. Runs with equal seed, factory, and
    /// configuration are bit-identical.
    pub seed: u64,

    /// Keep a permit's trade history when its owner relists it. The
    /// default starts every listing with a fresh history.
    pub retain_history_on_relist: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            time_window: None,
            stop: StopCriterion::default(),
            seed: rand::random(),
            retain_history_on_relist: false,
        }
    }
}

impl SimulationConfig {
    /// Create a configuration with the given stop criterion.
    pub fn new(stop: StopCriterion) -> Self {
        Self {
            stop,
            ..Default::default()
        }
    }

    /// Set the time window.
    pub fn with_time_window(mut self, window: Tick) -> Self {
        self.time_window = Some(window);
        self
    }

    /// Set the stop criterion.
    pub fn with_stop(mut self, stop: StopCriterion) -> Self {
        self.stop = stop;
        self
    }

    /// Set the RNG seed for a deterministic run.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Keep trade histories across relists.
    pub fn with_retained_history(mut self) -> Self {
        self.retain_history_on_relist = true;
        self
    }
}
