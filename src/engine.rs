//! Quote pricing engine.
//!
//! The `engine` module is responsible for turning a [`QuoteInput`]
//! into a [`PricingResult`].  Pricing is a pure computation: regional
//! defaults and multiplier tables all arrive through an
//! [`EngineConfig`], nothing is read from the environment, and the
//! same input always produces the same result.  Batch re-pricing uses
//! the [`rayon`] crate to spread quotes across multiple CPU cores.
//!
//! Inputs are priced as given.  Negative or out-of-range values are
//! not rejected here; they flow through the arithmetic, and deciding
//! what to do with the outcome is the caller's business.

use crate::models::{
    LineItem, LineItemCategory, PriceTier, PricingResult, ProfitSummary, QuoteInput,
};
use crate::region::EngineConfig;
use rayon::prelude::*;

/// Prices a single quote against a region configuration.
///
/// Labor is billed at the effective hours (raised to the regional
/// minimum when positive but short of it), scaled by the quality and
/// customer multipliers, then surcharged on emergency call-outs.
/// Line items are folded into their cost buckets, overhead and tax
/// are applied on top of direct costs, and the regional visit floor
/// is enforced on the total.  The three sell-price tiers come last,
/// each rounded to cents.
pub fn calculate_pricing(input: &QuoteInput, config: &EngineConfig) -> PricingResult {
    let region = &config.region;
    let quality_mult = config.quality_multiplier(input.quality_level);
    let customer_mult = config.customer_multiplier(input.customer_type);

    // Positive jobs are billed at least the regional minimum; a
    // zero-hour job stays zero so material-only quotes carry no labor.
    let minimum_hours_applied =
        input.labor_hours > 0.0 && input.labor_hours < region.minimum_billable_hours;
    let effective_labor_hours = if input.labor_hours > 0.0 {
        input.labor_hours.max(region.minimum_billable_hours)
    } else {
        0.0
    };

    let mut base_labor_cost =
        effective_labor_hours * input.labor_rate * quality_mult * customer_mult;

    // The flag is echoed even when zero labor left nothing to
    // surcharge.
    let emergency_applied = input.is_emergency;
    let mut emergency_surcharge = 0.0;
    if emergency_applied && base_labor_cost > 0.0 {
        emergency_surcharge = base_labor_cost * (region.emergency_multiplier - 1.0);
        base_labor_cost *= region.emergency_multiplier;
    }

    let line_item_labor = category_total(&input.line_items, LineItemCategory::Labor);
    let line_item_materials = category_total(&input.line_items, LineItemCategory::Materials);
    let line_item_other = category_total(&input.line_items, LineItemCategory::Other);

    let materials_cost = input.materials_cost + line_item_materials;

    let direct_costs = base_labor_cost
        + line_item_labor
        + materials_cost
        + input.transportation_cost
        + input.tool_wear_cost
        + line_item_other;

    let admin_overhead = direct_costs * (input.admin_overhead_pct / 100.0);
    let subtotal = direct_costs + admin_overhead;
    let tax_amount = subtotal * (input.tax_rate / 100.0);
    let mut total_cost = subtotal + tax_amount;

    // Small but positive jobs are floored at the minimum visit rate.
    let minimum_visit_applied = total_cost > 0.0 && total_cost < region.minimum_visit_rate;
    if minimum_visit_applied {
        total_cost = region.minimum_visit_rate;
    }

    let recommended_margin = input.profit_margin_pct.max(config.margins.recommended_floor);
    let recommended_price = total_cost * (1.0 + recommended_margin / 100.0);
    let minimum_price = total_cost * (1.0 + config.margins.minimum / 100.0);
    let destructive_price = total_cost * (1.0 + config.margins.destructive / 100.0);

    PricingResult {
        base_labor_cost: base_labor_cost + line_item_labor,
        materials_cost,
        transportation_cost: input.transportation_cost,
        tool_wear_cost: input.tool_wear_cost,
        subtotal: direct_costs,
        admin_overhead,
        tax_amount,
        total_cost,
        recommended_price: round_to(recommended_price, 2),
        minimum_price: round_to(minimum_price, 2),
        destructive_price: round_to(destructive_price, 2),
        recommended_margin,
        minimum_margin: config.margins.minimum,
        emergency_applied,
        minimum_visit_applied,
        minimum_hours_applied,
        effective_labor_hours,
        emergency_surcharge: round_to(emergency_surcharge, 2),
        minimum_visit_rate: region.minimum_visit_rate,
    }
}

/// Prices a batch of quotes in parallel, preserving input order.
///
/// All quotes in the batch share one configuration, so re-pricing a
/// book of quotes across several regions means one call per region.
pub fn calculate_pricing_batch(inputs: &[QuoteInput], config: &EngineConfig) -> Vec<PricingResult> {
    inputs
        .par_iter()
        .map(|input| calculate_pricing(input, config))
        .collect()
}

/// Classifies a proposed price against the computed tier prices.
///
/// Boundaries are inclusive upward: a price exactly at a tier's
/// threshold lands in that tier, not the one below.
pub fn price_tier(price: f64, pricing: &PricingResult) -> PriceTier {
    if price >= pricing.recommended_price {
        PriceTier::Recommended
    } else if price >= pricing.minimum_price {
        PriceTier::Minimum
    } else if price >= pricing.destructive_price {
        PriceTier::Destructive
    } else {
        PriceTier::Below
    }
}

/// Advisory copy for a proposed price, harshest condition first.
/// Returns `None` at or above the recommended price.
pub fn price_warning(price: f64, pricing: &PricingResult) -> Option<&'static str> {
    if price < pricing.destructive_price {
        Some(
            "You're pricing below your total costs. This isn't just low -- you're literally \
             paying to work. Don't give away your work.",
        )
    } else if price < pricing.minimum_price {
        Some(
            "Pricing below this value not only affects your wallet, it also devalues the \
             profession and puts negative pressure on the local market. Don't give away your work.",
        )
    } else if price < pricing.recommended_price {
        Some(
            "This price covers your costs but leaves a thin margin. One unexpected expense and \
             your profit disappears. Raising your price a little here will protect you all month.",
        )
    } else {
        None
    }
}

/// Profit the contractor keeps at a final price.  Only meaningful
/// when both the price and the computed total cost are positive;
/// returns `None` otherwise.
pub fn profit_summary(final_price: f64, pricing: &PricingResult) -> Option<ProfitSummary> {
    if final_price > 0.0 && pricing.total_cost > 0.0 {
        let profit = final_price - pricing.total_cost;
        Some(ProfitSummary {
            profit,
            margin_pct: profit / pricing.total_cost * 100.0,
        })
    } else {
        None
    }
}

fn category_total(items: &[LineItem], category: LineItemCategory) -> f64 {
    items
        .iter()
        .filter(|item| item.category == category)
        .map(|item| item.quantity * item.unit_price)
        .sum()
}

/// Rounds to `decimals` places, ties away from zero.
fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CustomerType, QualityLevel};
    use crate::region::RegionPreset;

    fn untaxed_input(materials_cost: f64) -> QuoteInput {
        let mut input = RegionPreset::montreal().default_quote_input(crate::models::TradeType::General);
        input.materials_cost = materials_cost;
        input.tax_rate = 0.0;
        input.admin_overhead_pct = 0.0;
        input
    }

    #[test]
    fn test_round_to_cents() {
        assert_eq!(round_to(1106.875, 2), 1106.88);
        assert_eq!(round_to(99.994, 2), 99.99);
        assert_eq!(round_to(99.995, 2), 100.0);
    }

    #[test]
    fn test_category_total_sums_matching_items_only() {
        let items = vec![
            LineItem {
                description: "Pipe".into(),
                quantity: 3.0,
                unit: "each".into(),
                unit_price: 12.5,
                category: LineItemCategory::Materials,
            },
            LineItem {
                description: "Helper".into(),
                quantity: 2.0,
                unit: "hour".into(),
                unit_price: 40.0,
                category: LineItemCategory::Labor,
            },
        ];
        assert_eq!(category_total(&items, LineItemCategory::Materials), 37.5);
        assert_eq!(category_total(&items, LineItemCategory::Labor), 80.0);
        assert_eq!(category_total(&items, LineItemCategory::Other), 0.0);
    }

    #[test]
    fn test_multipliers_scale_base_labor() {
        let mut input = untaxed_input(0.0);
        input.labor_hours = 10.0;
        input.labor_rate = 100.0;
        input.quality_level = QualityLevel::Premium;
        input.customer_type = CustomerType::Commercial;
        let config = EngineConfig::default();

        let pricing = calculate_pricing(&input, &config);
        // 10h * 100 * 1.35 * 1.15
        assert!((pricing.base_labor_cost - 1552.5).abs() < 1e-9);
    }

    #[test]
    fn test_zero_hours_job_has_no_labor_and_no_minimum_hours() {
        let input = untaxed_input(200.0);
        let pricing = calculate_pricing(&input, &EngineConfig::default());
        assert_eq!(pricing.base_labor_cost, 0.0);
        assert_eq!(pricing.effective_labor_hours, 0.0);
        assert!(!pricing.minimum_hours_applied);
        assert_eq!(pricing.subtotal, 200.0);
    }

    #[test]
    fn test_batch_matches_serial_order() {
        let config = EngineConfig::default();
        let inputs: Vec<QuoteInput> = (1..=8)
            .map(|i| {
                let mut input = untaxed_input(0.0);
                input.labor_hours = i as f64;
                input.labor_rate = 90.0 + i as f64;
                input
            })
            .collect();

        let batch = calculate_pricing_batch(&inputs, &config);
        let serial: Vec<PricingResult> = inputs
            .iter()
            .map(|input| calculate_pricing(input, &config))
            .collect();
        assert_eq!(batch, serial);
    }
}
