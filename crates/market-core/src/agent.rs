//! The agent protocol and factory abstraction.

use types::{Price, Region, Tick};

use crate::access::{AskMarket, BidMarket};

/// A market participant.
///
/// Only [`stop`](Agent::stop) is mandatory; every other operation defaults
/// to a no-op, so an agent implements exactly the parts of the protocol it
/// cares about. Each callback receives a fresh 32-bit seed drawn from the
/// engine's generator, keeping runs reproducible while letting agents
/// randomize independently.
///
/// The market handles passed to the phase callbacks borrow engine state
/// and are valid only for the duration of the call.
pub trait Agent<R: Region> {
    /// Bid phase: the agent may place any number of bids.
    #[allow(unused_variables)]
    fn bid_phase(&mut self, tick: Tick, market: &mut BidMarket<'_, R>, seed: u32) {}

    /// Ask phase: the agent may offer any number of held permits for
    /// resale. Runs after clearing, so the agent already knows what it
    /// bought this tick.
    #[allow(unused_variables)]
    fn ask_phase(&mut self, tick: Tick, market: &mut AskMarket<'_, R>, seed: u32) {}

    /// Fired during clearing when this agent's bid won `(region, time)`.
    #[allow(unused_variables)]
    fn on_bought(&mut self, region: &R, time: Tick, price: Price) {}

    /// Fired during clearing when a permit this agent owned was resold.
    #[allow(unused_variables)]
    fn on_sold(&mut self, region: &R, time: Tick, price: Price) {}

    /// Whether the agent is finished. Returning `true` removes the agent
    /// from the active set at the end of the tick.
    fn stop(&mut self, tick: Tick, seed: u32) -> bool;
}

/// Source of new agents, polled once per tick.
///
/// Implemented for any `FnMut(Tick, u32) -> Vec<Box<dyn Agent<R>>>`, so a
/// closure is the usual factory. A factory that is a pure function of its
/// arguments makes the whole simulation a pure function of the seed.
pub trait AgentFactory<R: Region> {
    /// Produce the agents entering the market at `tick`.
    fn spawn(&mut self, tick: Tick, seed: u32) -> Vec<Box<dyn Agent<R>>>;
}

impl<R, F> AgentFactory<R> for F
where
    R: Region,
    F: FnMut(Tick, u32) -> Vec<Box<dyn Agent<R>>>,
{
    fn spawn(&mut self, tick: Tick, seed: u32) -> Vec<Box<dyn Agent<R>>> {
        self(tick, seed)
    }
}
