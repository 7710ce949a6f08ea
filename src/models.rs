//! Data models for the quote engine.
//!
//! The `models` module defines a set of serialisable structs and
//! enums representing job-cost inputs, quote line items and pricing
//! results.  These data types derive `Serialize` and `Deserialize` so
//! that they can be easily persisted or transmitted over a network.
//! They form the basis of the engine's input and output structures.
//!
//! [`PricingResult`] serialises its fields in camelCase because that
//! is the wire shape the form layer consumes; inputs stay in
//! snake_case to line up with how quotes are stored.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The finish level a job is quoted at.  Selects a labor-cost
/// multiplier from the engine configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityLevel {
    /// Budget work; discounts the labor rate.
    Economy,
    /// The default level; labor is billed as entered.
    Standard,
    /// High-end finish; labor carries a premium.
    Premium,
}

/// Who the work is being done for.  Commercial customers typically
/// carry a labor-cost uplift over residential ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomerType {
    Residential,
    Commercial,
}

/// Which cost bucket a line item belongs to.  Labor-category items
/// are merged into the reported labor figure; materials-category
/// items are merged into the materials figure; everything else is
/// added to direct costs on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineItemCategory {
    Labor,
    Materials,
    Other,
}

/// The trade a quote is written for.  Trades key into a region's
/// hourly-rate table (see [`crate::region::RegionPreset`]) so a new
/// quote can be prefilled with a sensible labor rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeType {
    Masonry,
    Plumbing,
    Electrical,
    Remodeling,
    Landscaping,
    Roofing,
    Painting,
    Hvac,
    Carpentry,
    General,
}

impl TradeType {
    /// All trades, in presentation order.
    pub const ALL: [TradeType; 10] = [
        TradeType::Masonry,
        TradeType::Plumbing,
        TradeType::Electrical,
        TradeType::Remodeling,
        TradeType::Landscaping,
        TradeType::Roofing,
        TradeType::Painting,
        TradeType::Hvac,
        TradeType::Carpentry,
        TradeType::General,
    ];
}

impl fmt::Display for TradeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeType::Masonry => write!(f, "Masonry"),
            TradeType::Plumbing => write!(f, "Plumbing"),
            TradeType::Electrical => write!(f, "Electrical"),
            TradeType::Remodeling => write!(f, "Remodeling"),
            TradeType::Landscaping => write!(f, "Landscaping"),
            TradeType::Roofing => write!(f, "Roofing"),
            TradeType::Painting => write!(f, "Painting"),
            TradeType::Hvac => write!(f, "HVAC"),
            TradeType::Carpentry => write!(f, "Carpentry"),
            TradeType::General => write!(f, "General"),
        }
    }
}

/// A single priced line on a quote.
///
/// Line items let a contractor itemise work beyond the headline labor
/// and materials figures: extra labor, itemised materials, permits,
/// disposal fees and so on.  Each item contributes
/// `quantity * unit_price` to the bucket named by its category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Human-readable description of the item.
    pub description: String,
    /// How many units the item covers.
    pub quantity: f64,
    /// Unit of measure, e.g. `"sq ft"`, `"hour"`, `"each"`.
    pub unit: String,
    /// Price per unit.
    pub unit_price: f64,
    /// Cost bucket this item is aggregated into.
    pub category: LineItemCategory,
}

/// Input to the pricing engine.
///
/// A `QuoteInput` carries everything the engine needs to price one
/// job: base labor, flat added costs, percentage knobs and any extra
/// line items.  The engine treats the whole struct as read-only and
/// never validates it; out-of-range values flow through the
/// arithmetic unchanged, and rejecting them is the caller's business.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteInput {
    /// Residential or commercial customer; selects a labor multiplier.
    pub customer_type: CustomerType,
    /// Finish level; selects a labor multiplier.
    pub quality_level: QualityLevel,
    /// Whether this is an emergency call-out.  Triggers the region's
    /// emergency surcharge on the base labor cost.
    pub is_emergency: bool,
    /// Estimated hours of labor.  Positive values below the region's
    /// minimum billable hours are raised to that minimum; zero stays
    /// zero.
    pub labor_hours: f64,
    /// Hourly labor rate before multipliers.
    pub labor_rate: f64,
    /// Flat materials cost, in addition to any materials line items.
    pub materials_cost: f64,
    /// Flat transportation cost.
    pub transportation_cost: f64,
    /// Sales-tax percentage applied to the overheaded subtotal.
    pub tax_rate: f64,
    /// Administrative overhead percentage applied to direct costs.
    pub admin_overhead_pct: f64,
    /// Flat allowance for wear on tools and equipment.
    pub tool_wear_cost: f64,
    /// Target profit margin percentage.  The engine enforces a floor
    /// on this when computing the recommended price.
    pub profit_margin_pct: f64,
    /// Itemised extras; may be omitted or given an empty vector.
    #[serde(default)]
    pub line_items: Vec<LineItem>,
}

/// The result of pricing one quote.
///
/// Every field is derived from the input and the engine
/// configuration; nothing here has identity or lifecycle, and calling
/// the engine twice with the same input yields an identical result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingResult {
    /// Labor cost after multipliers and any emergency surcharge,
    /// merged with labor-category line items.  The merge happens only
    /// in this reported figure; direct costs keep the two sources
    /// separate internally.
    pub base_labor_cost: f64,
    /// Flat materials cost plus materials-category line items.
    pub materials_cost: f64,
    pub transportation_cost: f64,
    pub tool_wear_cost: f64,
    /// Direct costs: labor, materials, transportation, tool wear and
    /// other-category line items, before overhead and tax.  The field
    /// keeps the name the form layer expects.
    pub subtotal: f64,
    /// Administrative overhead on direct costs.
    pub admin_overhead: f64,
    /// Tax on the overheaded subtotal.
    pub tax_amount: f64,
    /// Total cost after overhead, tax and the minimum-visit floor.
    pub total_cost: f64,
    /// Sell price at the recommended margin, rounded to cents.
    pub recommended_price: f64,
    /// Sell price at the minimum acceptable margin, rounded to cents.
    pub minimum_price: f64,
    /// Sell price at the destructive margin, rounded to cents.
    pub destructive_price: f64,
    /// The margin actually applied to the recommended price, after
    /// enforcing the configured floor.
    pub recommended_margin: f64,
    /// The fixed minimum-tier margin, echoed from configuration.
    pub minimum_margin: f64,
    /// True whenever the emergency flag was set on the input, even if
    /// zero labor meant no surcharge was actually added.
    pub emergency_applied: bool,
    /// True when the minimum-visit floor raised the total cost.
    pub minimum_visit_applied: bool,
    /// True when labor hours were raised to the billable minimum.
    pub minimum_hours_applied: bool,
    /// Hours actually billed after the minimum-hours rule.
    pub effective_labor_hours: f64,
    /// Emergency surcharge amount, rounded to cents.
    pub emergency_surcharge: f64,
    /// The visit floor in force, echoed from configuration.
    pub minimum_visit_rate: f64,
}

/// Where a proposed price lands on the tier scale.
///
/// Boundaries are inclusive upward: a price exactly at a tier's
/// threshold classifies into that tier, not the one below it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceTier {
    /// At or above the recommended price.
    Recommended,
    /// Covers costs with a thin margin.
    Minimum,
    /// Barely above cost; hurts the contractor and the market.
    Destructive,
    /// Below even the destructive price.
    Below,
}

impl PriceTier {
    /// Warning severity a price in this tier deserves, if any.
    pub fn severity(self) -> Option<Severity> {
        match self {
            PriceTier::Recommended => None,
            PriceTier::Minimum => Some(Severity::Warning),
            PriceTier::Destructive | PriceTier::Below => Some(Severity::Danger),
        }
    }
}

/// How loudly a price warning should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Danger,
}

/// Profit a final quote price yields over the computed total cost.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfitSummary {
    /// Final price minus total cost.
    pub profit: f64,
    /// Profit as a percentage of total cost.
    pub margin_pct: f64,
}
