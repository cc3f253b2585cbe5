//! Sliding-window permit ledger.
//!
//! The ledger keeps one unordered map of permit records per future tick,
//! in a double-ended queue indexed by `t - now`. Records are created
//! lazily on first in-window access; the front bucket is discarded when
//! the clock advances, reclaiming every record of the finalized tick.

use std::collections::{HashMap, VecDeque};

use types::{AgentId, Permit, PermitRecord, PermitState, PermitStatus, Region, Tick};

/// Per-tick permit order book with a bounded time horizon.
///
/// With `time_window = Some(w)`, only ticks in `[now, now + 1 + w]` are
/// materialized; accesses outside that range report out-of-limits. Without
/// a window the ledger grows on demand toward the future, but never into
/// the past.
#[derive(Debug)]
pub struct PermitLedger<R: Region> {
    now: Tick,
    time_window: Option<Tick>,
    slots: VecDeque<HashMap<Permit<R>, PermitRecord>>,
}

impl<R: Region> PermitLedger<R> {
    /// Create an empty ledger starting at tick 0.
    pub fn new(time_window: Option<Tick>) -> Self {
        Self {
            now: 0,
            time_window,
            slots: VecDeque::new(),
        }
    }

    /// The current tick.
    pub fn now(&self) -> Tick {
        self.now
    }

    /// The configured time window, if any.
    pub fn time_window(&self) -> Option<Tick> {
        self.time_window
    }

    /// Whether `t` falls inside the sliding window `[now, now + 1 + w]`.
    pub fn in_window(&self, t: Tick) -> bool {
        t >= self.now && self.time_window.is_none_or(|w| t <= self.now + 1 + w)
    }

    /// Mutable access to the record for `(region, t)`.
    ///
    /// Returns `None` outside the sliding window. Inside it, grows the
    /// bucket queue as needed and creates the record on first access,
    /// defaulting to an unowned zero-floor listing.
    pub fn record_mut(&mut self, region: &R, t: Tick) -> Option<&mut PermitRecord> {
        if !self.in_window(t) {
            return None;
        }
        let slot = (t - self.now) as usize;
        while self.slots.len() <= slot {
            self.slots.push_back(HashMap::new());
        }
        Some(
            self.slots[slot]
                .entry(Permit::new(region.clone(), t))
                .or_default(),
        )
    }

    /// Owned copy of the record for `(region, t)`.
    ///
    /// Out-of-window permits report the out-of-limits record. Like any
    /// in-window read, this may lazily materialize the record, but the
    /// caller receives a copy and cannot mutate the book through it.
    pub fn snapshot(&mut self, region: &R, t: Tick) -> PermitRecord {
        match self.record_mut(region, t) {
            Some(record) => record.clone(),
            None => PermitRecord::out_of_limits(),
        }
    }

    /// The public view of `(region, t)` as seen by `viewer`.
    ///
    /// Holders see `Owned`; a listing by anyone else is `Available` with
    /// its floor and history; everything the viewer cannot act on — out of
    /// window, held by another agent, or the viewer's own listing — is
    /// `Unavailable`.
    pub fn public_status(&mut self, viewer: AgentId, region: &R, t: Tick) -> PermitStatus<'_> {
        let Some(record) = self.record_mut(region, t) else {
            return PermitStatus::Unavailable;
        };
        match record.state {
            PermitState::OutOfLimits => PermitStatus::Unavailable,
            PermitState::InUse { owner } => {
                if owner == viewer {
                    PermitStatus::Owned
                } else {
                    PermitStatus::Unavailable
                }
            }
            PermitState::OnSale {
                owner, min_value, ..
            } => {
                if owner == viewer {
                    PermitStatus::Unavailable
                } else {
                    PermitStatus::Available {
                        min_value,
                        history: &record.history,
                    }
                }
            }
        }
    }

    /// Finalize the current tick: discard the front bucket (reclaiming all
    /// of its records) and advance the clock by one.
    pub fn advance(&mut self) {
        if !self.slots.is_empty() {
            self.slots.pop_front();
        }
        self.now += 1;
    }

    /// Number of materialized buckets.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether no bucket is materialized.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Iterate over every materialized record.
    pub fn iter_records(&self) -> impl Iterator<Item = (&Permit<R>, &PermitRecord)> {
        self.slots.iter().flat_map(|bucket| bucket.iter())
    }
}
