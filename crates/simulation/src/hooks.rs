//! Observer hooks for the simulation lifecycle.
//!
//! Hooks watch the market without being able to steer it. They receive
//! either owned snapshots ([`TradeInfo`], copied permit records) or
//! read-only views, so registering a hook never changes a run's outcome —
//! two runs with the same seed produce the same trace whether or not
//! anyone is watching.
//!
//! Hooks are registered as `Arc<dyn SimulationHook<R>>` and invoked in
//! registration order at each lifecycle point. Use interior mutability
//! (`Mutex`, atomics, channels) for hook-owned state.

use std::sync::Arc;

use market_core::{AgentRegistry, PermitLedger};
use serde::{Deserialize, Serialize};
use types::{AgentId, Permit, PermitRecord, Price, Region, Tick};

use crate::runner::SimulationStats;

/// One cleared trade: a permit moving from `from` to `to` at the winning
/// bid. `from` is [`AgentId::NONE`] when the market itself was the seller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeInfo<R> {
    /// Tick at which the trade cleared.
    pub transaction_time: Tick,
    /// Previous owner ([`AgentId::NONE`] for a never-owned permit).
    pub from: AgentId,
    /// Winning bidder.
    pub to: AgentId,
    /// Region of the traded permit.
    pub region: R,
    /// Tick the permit applies to.
    pub time: Tick,
    /// Winning bid.
    pub value: Price,
}

/// Copying reader over the permit ledger, handed to status observers.
///
/// Reads go through the ledger's lazy accessor, so an in-window read may
/// materialize the default listing — exactly as an agent's own read would
/// — but the observer only ever receives a copy and cannot mutate the
/// book.
pub struct LedgerInspector<'a, R: Region> {
    ledger: &'a mut PermitLedger<R>,
}

impl<'a, R: Region> LedgerInspector<'a, R> {
    pub(crate) fn new(ledger: &'a mut PermitLedger<R>) -> Self {
        Self { ledger }
    }

    /// Owned copy of the private record for `(region, time)`.
    pub fn record(&mut self, region: &R, time: Tick) -> PermitRecord {
        self.ledger.snapshot(region, time)
    }

    /// The current tick.
    pub fn now(&self) -> Tick {
        self.ledger.now()
    }

    /// Number of ticks with materialized permit records.
    pub fn materialized_ticks(&self) -> usize {
        self.ledger.len()
    }

    /// Owned copies of every materialized record.
    pub fn records(&self) -> Vec<(Permit<R>, PermitRecord)> {
        self.ledger
            .iter_records()
            .map(|(permit, record)| (permit.clone(), record.clone()))
            .collect()
    }
}

/// Trait for simulation observers.
///
/// All methods default to no-ops; a hook implements the lifecycle points
/// it cares about.
pub trait SimulationHook<R: Region>: Send + Sync {
    /// Human-readable name for logging and debugging.
    fn name(&self) -> &str;

    /// Called at the top of every tick, before new agents are generated —
    /// including the final executed tick.
    #[allow(unused_variables)]
    fn on_tick_start(
        &self,
        tick: Tick,
        agents: &AgentRegistry<R>,
        ledger: &mut LedgerInspector<'_, R>,
    ) {
    }

    /// Called synchronously for every trade, in clearing order.
    #[allow(unused_variables)]
    fn on_trade(&self, trade: &TradeInfo<R>) {}

    /// Called after each tick completes, with cumulative statistics.
    #[allow(unused_variables)]
    fn on_tick_end(&self, stats: &SimulationStats) {}

    /// Called once when the stop criterion fires.
    #[allow(unused_variables)]
    fn on_simulation_end(&self, stats: &SimulationStats) {}
}

/// Manages hook registration and sequential invocation.
pub struct HookRunner<R: Region> {
    hooks: Vec<Arc<dyn SimulationHook<R>>>,
}

impl<R: Region> HookRunner<R> {
    pub fn new() -> Self {
        Self { hooks: Vec::new() }
    }

    /// Register a hook. Hooks are called in registration order.
    pub fn add(&mut self, hook: Arc<dyn SimulationHook<R>>) {
        self.hooks.push(hook);
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Registered hook names, for debugging.
    pub fn hook_names(&self) -> Vec<&str> {
        self.hooks.iter().map(|hook| hook.name()).collect()
    }

    pub(crate) fn on_tick_start(
        &self,
        tick: Tick,
        agents: &AgentRegistry<R>,
        ledger: &mut LedgerInspector<'_, R>,
    ) {
        for hook in &self.hooks {
            hook.on_tick_start(tick, agents, ledger);
        }
    }

    pub(crate) fn on_trade(&self, trade: &TradeInfo<R>) {
        for hook in &self.hooks {
            hook.on_trade(trade);
        }
    }

    pub(crate) fn on_tick_end(&self, stats: &SimulationStats) {
        for hook in &self.hooks {
            hook.on_tick_end(stats);
        }
    }

    pub(crate) fn on_simulation_end(&self, stats: &SimulationStats) {
        for hook in &self.hooks {
            hook.on_simulation_end(stats);
        }
    }
}

impl<R: Region> Default for HookRunner<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Region> std::fmt::Debug for HookRunner<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HookRunner")
            .field("hooks", &self.hook_names())
            .finish()
    }
}

/// A no-op hook useful for testing.
#[derive(Debug, Default)]
pub struct NoOpHook;

impl<R: Region> SimulationHook<R> for NoOpHook {
    fn name(&self) -> &str {
        "NoOp"
    }
}
