//! Identifier and time types for the permit market.

use derive_more::{From, Into};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Simulation tick (discrete time step).
pub type Tick = u64;

/// Unique identifier for a market agent.
///
/// Ids are assigned by the registry in insertion order and are never
/// reused. [`AgentId::NONE`] is the primordial-seller sentinel: the owner
/// of a permit that has never been traded.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Default,
    From,
    Into,
)]
pub struct AgentId(pub u64);

impl AgentId {
    /// Sentinel for "no agent": the market itself as primordial seller.
    pub const NONE: AgentId = AgentId(u64::MAX);

    /// Raw id value.
    #[inline]
    pub fn raw(self) -> u64 {
        self.0
    }

    /// Whether this is the primordial-seller sentinel.
    #[inline]
    pub fn is_none(self) -> bool {
        self == Self::NONE
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() {
            write!(f, "market")
        } else {
            write!(f, "Agent#{}", self.0)
        }
    }
}
