//! Quick ballpark tier prices.
//!
//! A deliberately small sibling of the full engine for surfaces that
//! need an instant "roughly what should this cost?" readout before a
//! full quote exists: three numbers in, three prices out.  It differs
//! from [`crate::engine`] on purpose and must not be merged with it:
//! the overhead share here is a fraction of labor (`0.1`, not `10`),
//! there is no tax, no visit floor and no rounding, and the tier
//! factors are fixed rather than margin-driven.

use serde::{Deserialize, Serialize};

const DESTRUCTIVE_FACTOR: f64 = 1.05;
const MINIMUM_FACTOR: f64 = 1.15;
const RECOMMENDED_FACTOR: f64 = 1.35;

/// The three ballpark sell prices, lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierPrices {
    pub destructive: f64,
    pub minimum: f64,
    pub recommended: f64,
}

/// Ballpark tier prices from a labor cost, a material cost and an
/// overhead fraction of labor.  Values are not rounded; presentation
/// is up to the caller.  Inputs are not validated, so negative values
/// propagate into the prices.
pub fn calculate_tier_prices(labor_cost: f64, material_cost: f64, overhead_pct: f64) -> TierPrices {
    let overhead_cost = labor_cost * overhead_pct;
    let base_cost = labor_cost + material_cost + overhead_cost;
    TierPrices {
        destructive: base_cost * DESTRUCTIVE_FACTOR,
        minimum: base_cost * MINIMUM_FACTOR,
        recommended: base_cost * RECOMMENDED_FACTOR,
    }
}
