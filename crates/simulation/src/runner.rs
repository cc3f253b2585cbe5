//! The auction engine tick loop.
//!
//! One tick, in order:
//! 1. Status observers fire (before anything changes).
//! 2. The factory is polled and new agents join the active set.
//! 3. Bid phase: every active agent, in id order, may place sealed bids.
//!    The first bid a permit receives registers it for clearing; later
//!    bids raise the standing high bid in place.
//! 4. Clearing: every contested permit goes to its highest bidder at the
//!    bid value. Buyers, previous owners, and trade observers are
//!    notified; the record flips to in-use and the sale joins its history.
//! 5. Ask phase: every active agent may queue resale listings.
//! 6. Queued listings are applied, replacing the record with a fresh
//!    listing (history retained only if configured).
//! 7. Agents whose `stop` returns true retire; prefix storage is
//!    reclaimed.
//! 8. The ledger drops the finalized tick and the clock advances.
//!
//! The stop criterion is evaluated after each complete tick, so at least
//! one tick always runs.
//!
//! The engine is single-threaded and cooperative: agent callbacks run to
//! completion on the engine's thread, and within a tick later bidders see
//! the mutations of earlier ones.

use std::sync::Arc;

use market_core::{
    AgentFactory, AgentRegistry, AskMarket, BidMarket, PendingAsk, PermitLedger,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, trace};
use types::{AgentId, ClearedSale, Permit, PermitState, Price, Region, Tick};

use crate::config::{SimulationConfig, StopCriterion};
use crate::hooks::{HookRunner, LedgerInspector, SimulationHook, TradeInfo};

/// Cumulative statistics about a simulation run.
#[derive(Debug, Clone, Default)]
pub struct SimulationStats {
    /// Current tick (the next one to execute).
    pub tick: Tick,
    /// Agents created by the factory so far.
    pub agents_spawned: u64,
    /// Agents whose `stop` returned true.
    pub agents_retired: u64,
    /// Size of the active set after the last completed tick.
    pub active_agents: usize,
    /// Permits that received at least one standing bid.
    pub permits_contested: u64,
    /// Resale listings applied to the book.
    pub permits_listed: u64,
    /// Trades cleared.
    pub total_trades: u64,
}

/// The auction engine.
///
/// Owns the permit ledger, the agent registry, the factory, and a seeded
/// RNG. Given a factory that is a pure function of `(tick, seed)`, two
/// runs with the same configuration produce identical trade sequences.
pub struct Simulation<R: Region> {
    config: SimulationConfig,
    ledger: PermitLedger<R>,
    registry: AgentRegistry<R>,
    factory: Box<dyn AgentFactory<R>>,
    rng: StdRng,
    hooks: HookRunner<R>,
    stats: SimulationStats,
}

impl<R: Region> Simulation<R> {
    /// Create an engine from a configuration and an agent factory.
    pub fn new(config: SimulationConfig, factory: impl AgentFactory<R> + 'static) -> Self {
        let ledger = PermitLedger::new(config.time_window);
        let rng = StdRng::seed_from_u64(config.seed);
        Self {
            config,
            ledger,
            registry: AgentRegistry::new(),
            factory: Box::new(factory),
            rng,
            hooks: HookRunner::new(),
            stats: SimulationStats::default(),
        }
    }

    /// Register an observer hook. Hooks fire in registration order.
    pub fn add_hook(&mut self, hook: Arc<dyn SimulationHook<R>>) {
        self.hooks.add(hook);
    }

    /// Number of registered hooks.
    pub fn hook_count(&self) -> usize {
        self.hooks.len()
    }

    /// The current tick.
    pub fn tick(&self) -> Tick {
        self.ledger.now()
    }

    /// Run statistics so far.
    pub fn stats(&self) -> &SimulationStats {
        &self.stats
    }

    /// The engine configuration.
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Read-only view of the agent registry.
    pub fn registry(&self) -> &AgentRegistry<R> {
        &self.registry
    }

    /// Whether the stop criterion holds right now.
    pub fn stop_reached(&self) -> bool {
        match self.config.stop {
            StopCriterion::NoAgents => self.registry.active_count() == 0,
            StopCriterion::TimeThreshold(threshold) => self.ledger.now() > threshold,
        }
    }

    /// Execute one tick and return the trades it cleared.
    pub fn step(&mut self) -> Vec<TradeInfo<R>> {
        let tick = self.ledger.now();
        trace!(tick, "tick start");

        // Status observers see the market before new agents enter.
        if !self.hooks.is_empty() {
            let mut inspector = LedgerInspector::new(&mut self.ledger);
            self.hooks.on_tick_start(tick, &self.registry, &mut inspector);
        }

        // Agent generation.
        let seed = self.rng.random();
        for agent in self.factory.spawn(tick, seed) {
            let id = self.registry.insert(agent);
            self.stats.agents_spawned += 1;
            debug!(tick, %id, "agent spawned");
        }

        // Bid phase. The pending list records each contested permit once,
        // in first-bid order.
        let mut pending_winners: Vec<Permit<R>> = Vec::new();
        for id in self.registry.active().to_vec() {
            let seed = self.rng.random();
            let Self {
                registry, ledger, ..
            } = self;
            let mut market = BidMarket::new(ledger, &mut pending_winners, id);
            registry.get_mut(id).bid_phase(tick, &mut market, seed);
        }

        // Clearing.
        let trades = self.clear(tick, &pending_winners);

        // Ask phase. Listings are queued and applied afterwards, so no
        // agent observes a mid-phase ask.
        let mut pending_asks: Vec<PendingAsk<R>> = Vec::new();
        for id in self.registry.active().to_vec() {
            let seed = self.rng.random();
            let Self {
                registry, ledger, ..
            } = self;
            let mut market = AskMarket::new(ledger, &mut pending_asks, id);
            registry.get_mut(id).ask_phase(tick, &mut market, seed);
        }

        self.stats.permits_listed += pending_asks.len() as u64;
        for ask in pending_asks {
            if let Some(record) = self.ledger.record_mut(&ask.region, ask.time) {
                record.state = PermitState::OnSale {
                    owner: ask.seller,
                    min_value: ask.min_value,
                    highest_bidder: AgentId::NONE,
                    highest_bid: Price::ZERO,
                };
                if !self.config.retain_history_on_relist {
                    record.history.clear();
                }
            }
        }

        // Stop / cull.
        let mut keep_active = Vec::with_capacity(self.registry.active_count());
        for id in self.registry.active().to_vec() {
            let seed = self.rng.random();
            if self.registry.get_mut(id).stop(tick, seed) {
                self.stats.agents_retired += 1;
                debug!(tick, %id, "agent retired");
            } else {
                keep_active.push(id);
            }
        }
        self.registry.update_active(keep_active);

        // Advance: the finalized tick's records are reclaimed.
        self.ledger.advance();
        self.stats.tick = self.ledger.now();
        self.stats.active_agents = self.registry.active_count();
        self.stats.permits_contested += pending_winners.len() as u64;
        self.stats.total_trades += trades.len() as u64;

        self.hooks.on_tick_end(&self.stats);
        trades
    }

    /// Run until the stop criterion fires; returns the full trade log.
    ///
    /// The criterion is checked after each tick, so at least one tick
    /// executes.
    pub fn run(&mut self) -> Vec<TradeInfo<R>> {
        let mut all_trades = Vec::new();
        loop {
            all_trades.extend(self.step());
            if self.stop_reached() {
                break;
            }
        }
        self.hooks.on_simulation_end(&self.stats);
        all_trades
    }

    /// Clear every contested permit, in first-bid order.
    ///
    /// Sellers are notified through `on_sold` only when their id is at
    /// least the smallest active id: anything below it may already have
    /// been evicted, and a dormant inactive seller below that bound is
    /// skipped as well.
    fn clear(&mut self, tick: Tick, pending_winners: &[Permit<R>]) -> Vec<TradeInfo<R>> {
        let mut trades = Vec::with_capacity(pending_winners.len());
        if pending_winners.is_empty() {
            return trades;
        }
        // Bidders are active agents, so the active set is non-empty here.
        let first_active = self.registry.active()[0];
        let Self {
            registry,
            ledger,
            hooks,
            ..
        } = self;

        for permit in pending_winners {
            let state = ledger
                .record_mut(&permit.region, permit.time)
                .expect("pending permit is inside the window")
                .state;
            let PermitState::OnSale {
                owner,
                min_value,
                highest_bidder,
                highest_bid,
            } = state
            else {
                unreachable!("pending permit must be listed at clearing");
            };

            let trade = TradeInfo {
                transaction_time: tick,
                from: owner,
                to: highest_bidder,
                region: permit.region.clone(),
                time: permit.time,
                value: highest_bid,
            };
            debug!(
                tick,
                from = %trade.from,
                to = %trade.to,
                time = trade.time,
                value = %trade.value,
                "permit cleared"
            );
            hooks.on_trade(&trade);

            registry
                .get_mut(highest_bidder)
                .on_bought(&permit.region, permit.time, highest_bid);
            if !owner.is_none() && owner >= first_active {
                registry
                    .get_mut(owner)
                    .on_sold(&permit.region, permit.time, highest_bid);
            }

            let record = ledger
                .record_mut(&permit.region, permit.time)
                .expect("pending permit is inside the window");
            record.state = PermitState::InUse {
                owner: highest_bidder,
            };
            record.history.push(ClearedSale {
                min_value,
                price: highest_bid,
            });
            trades.push(trade);
        }
        trades
    }
}
