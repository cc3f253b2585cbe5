//! Market mechanics for the permit market simulation.
//!
//! This crate provides the stateful core the auction engine drives:
//! - Sliding-window permit ledger with lazy record creation
//! - Agent registry with stable ids and prefix eviction
//! - Bid/ask market access handles passed to agents during their phases
//! - The `Agent` trait and factory abstraction

mod access;
mod agent;
mod ledger;
mod registry;

pub use access::{AskMarket, BidMarket, PendingAsk};
pub use agent::{Agent, AgentFactory};
pub use ledger::PermitLedger;
pub use registry::{AgentRegistry, AgentStatus};
