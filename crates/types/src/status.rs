//! Private book records and the public status view derived from them.

use serde::{Deserialize, Serialize};

use crate::{AgentId, Price};

/// One completed sale of a permit: the floor it was listed at and the
/// winning bid it cleared at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearedSale {
    /// Exclusive floor the permit was listed at.
    pub min_value: Price,
    /// Winning bid.
    pub price: Price,
}

/// Tradability of a single permit, as the market itself sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PermitState {
    /// Listed for sale. `owner` is [`AgentId::NONE`] for a permit that has
    /// never been owned (the market is the primordial seller). `min_value`
    /// is an exclusive floor: only bids strictly above it are considered.
    OnSale {
        owner: AgentId,
        min_value: Price,
        highest_bidder: AgentId,
        highest_bid: Price,
    },
    /// Held by an agent; not biddable this tick.
    InUse { owner: AgentId },
    /// Outside the ledger's sliding window.
    OutOfLimits,
}

impl PermitState {
    /// The state of a permit nobody has touched yet: for sale by the
    /// market at an exclusive floor of zero, with no standing bid.
    pub fn initial_sale() -> Self {
        PermitState::OnSale {
            owner: AgentId::NONE,
            min_value: Price::ZERO,
            highest_bidder: AgentId::NONE,
            highest_bid: Price::ZERO,
        }
    }

    /// The holding agent, if any. Listed permits report their seller.
    pub fn owner(&self) -> Option<AgentId> {
        match self {
            PermitState::OnSale { owner, .. } | PermitState::InUse { owner } => Some(*owner),
            PermitState::OutOfLimits => None,
        }
    }
}

/// Full private record of a permit: current state plus trade history.
///
/// The history is append-only while a listing lives: every clearing pushes
/// one [`ClearedSale`]. Relisting a permit starts a fresh history unless
/// the simulation is configured to retain it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermitRecord {
    pub state: PermitState,
    pub history: Vec<ClearedSale>,
}

impl PermitRecord {
    /// Fresh record for a never-touched permit.
    pub fn initial_sale() -> Self {
        Self {
            state: PermitState::initial_sale(),
            history: Vec::new(),
        }
    }

    /// Record reported for permits outside the sliding window.
    pub fn out_of_limits() -> Self {
        Self {
            state: PermitState::OutOfLimits,
            history: Vec::new(),
        }
    }

    /// Whether this record is the out-of-window sentinel.
    pub fn is_out_of_limits(&self) -> bool {
        matches!(self.state, PermitState::OutOfLimits)
    }
}

impl Default for PermitRecord {
    fn default() -> Self {
        Self::initial_sale()
    }
}

/// What one agent is allowed to see about a permit.
///
/// Derived from the private record relative to a viewing agent: holders
/// see `Owned`, everyone else sees `Available` with the listing floor and
/// the trade history, and anything the viewer cannot act on (out of
/// window, held by someone else, or the viewer's own listing) collapses
/// to `Unavailable`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PermitStatus<'a> {
    /// Not biddable by the viewer.
    Unavailable,
    /// Listed by someone else; biddable above the floor.
    Available {
        min_value: Price,
        history: &'a [ClearedSale],
    },
    /// Held by the viewer.
    Owned,
}

impl PermitStatus<'_> {
    /// Whether the viewer could bid on this permit.
    pub fn is_available(&self) -> bool {
        matches!(self, PermitStatus::Available { .. })
    }

    /// Whether the viewer holds this permit.
    pub fn is_owned(&self) -> bool {
        matches!(self, PermitStatus::Owned)
    }
}
