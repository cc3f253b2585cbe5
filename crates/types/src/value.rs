//! Fixed-point value type for bids, floors, and trade prices.

use derive_more::{Add, AddAssign, From, Into, Neg, Sub, SubAssign, Sum};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed-point scale for [`Price`]: 10,000 means 4 decimal places.
/// - `10000` = 1.0
/// - `1` = 0.0001 (smallest increment)
pub const PRICE_SCALE: i64 = 10_000;

/// Fixed-point price with 4 decimal places.
///
/// Bids, ask floors, and trade values all use this type. Comparisons are
/// exact integer comparisons, so the market's strict-`>` rules (exclusive
/// floors, incumbent tie-breaks) have no rounding ambiguity.
///
/// # Examples
/// - `Price(10_000)` = 1.0
/// - `Price(5_000)` = 0.5
#[derive(
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
    Add,
    Sub,
    Neg,
    AddAssign,
    SubAssign,
    Sum,
    From,
    Into,
)]
pub struct Price(pub i64);

impl Price {
    pub const ZERO: Price = Price(0);

    /// Create a Price from a floating-point value.
    #[inline]
    pub fn from_float(v: f64) -> Self {
        Self((v * PRICE_SCALE as f64).round() as i64)
    }

    /// Convert to floating-point for display/calculations.
    #[inline]
    pub fn to_float(self) -> f64 {
        self.0 as f64 / PRICE_SCALE as f64
    }

    /// Raw internal value.
    #[inline]
    pub fn raw(self) -> i64 {
        self.0
    }

    /// Check if the price is strictly positive.
    #[inline]
    pub fn is_positive(self) -> bool {
        self.0 > 0
    }
}

impl fmt::Debug for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Price({:.4})", self.to_float())
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}", self.to_float())
    }
}
