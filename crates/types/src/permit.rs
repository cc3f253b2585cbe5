//! Permit keys and the region abstraction.

use serde::{Deserialize, Serialize};

use crate::Tick;

/// Marker trait for region types.
///
/// The market treats regions as opaque keys: it needs hashing, equality,
/// and cheap cloning, nothing else. Any host type satisfying those bounds
/// is a region — grid cells, graph nodes, string labels.
pub trait Region: Clone + Eq + std::hash::Hash {}

impl<T: Clone + Eq + std::hash::Hash> Region for T {}

/// The right to occupy a region at a given future tick.
///
/// Two permits are equal iff both region and time are equal; the derived
/// hash combines the region hash with the time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Permit<R> {
    /// The region this permit covers.
    pub region: R,
    /// The tick at which the permit applies.
    pub time: Tick,
}

impl<R> Permit<R> {
    /// Create a permit key for `region` at `time`.
    pub fn new(region: R, time: Tick) -> Self {
        Self { region, time }
    }
}
