//! Regional presets and engine configuration.
//!
//! The `region` module defines everything the pricing engine reads
//! besides the quote itself: per-region business defaults (sales tax,
//! minimum visit rate, emergency multiplier, minimum billable hours
//! and an hourly-rate table per trade) plus the multiplier and margin
//! tables that shape the three price tiers.  Presets are expected to
//! be stored externally as JSON files, one region per file, and
//! loaded once at startup; the engine itself never touches the disk.
//!
//! A built-in Montreal preset ships with the crate so the engine is
//! usable with no preset directory configured at all.

use crate::models::{CustomerType, QualityLevel, QuoteInput, TradeType};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default administrative overhead percentage for a new quote.
pub const DEFAULT_ADMIN_OVERHEAD_PCT: f64 = 10.0;

/// Default target profit margin percentage for a new quote.
pub const DEFAULT_PROFIT_MARGIN_PCT: f64 = 25.0;

/// Business defaults for one service region.
///
/// A preset is configuration data, not engine state: the engine reads
/// it through [`EngineConfig`] and never mutates or validates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionPreset {
    /// Short identifier used to request the region, e.g. `"montreal"`.
    pub id: String,
    /// Human-readable name, e.g. `"Montreal, QC"`.
    pub name: String,
    /// ISO currency code quotes in this region are priced in.
    pub currency: String,
    /// Default sales-tax percentage for the region.
    pub tax_rate: f64,
    /// Floor below which no job's total cost may fall.
    pub minimum_visit_rate: f64,
    /// Multiplier applied to base labor on emergency call-outs.
    pub emergency_multiplier: f64,
    /// Smallest labor duration a job is ever charged for.
    pub minimum_billable_hours: f64,
    /// Default hourly labor rate per trade.
    pub rates: HashMap<TradeType, f64>,
}

impl RegionPreset {
    /// The built-in default region.  Used whenever no preset
    /// directory is configured or a requested region is unknown.
    pub fn montreal() -> Self {
        let rates = HashMap::from([
            (TradeType::Masonry, 95.0),
            (TradeType::Plumbing, 135.0),
            (TradeType::Electrical, 135.0),
            (TradeType::Remodeling, 110.0),
            (TradeType::Landscaping, 75.0),
            (TradeType::Roofing, 105.0),
            (TradeType::Painting, 80.0),
            (TradeType::Hvac, 155.0),
            (TradeType::Carpentry, 95.0),
            (TradeType::General, 95.0),
        ]);
        RegionPreset {
            id: "montreal".to_string(),
            name: "Montreal, QC".to_string(),
            currency: "CAD".to_string(),
            tax_rate: 14.975,
            minimum_visit_rate: 140.0,
            emergency_multiplier: 1.5,
            minimum_billable_hours: 1.5,
            rates,
        }
    }

    /// Default hourly rate for a trade, if the region publishes one.
    pub fn default_rate(&self, trade: TradeType) -> Option<f64> {
        self.rates.get(&trade).copied()
    }

    /// Builds a starter quote prefilled with this region's defaults:
    /// the trade's hourly rate, the regional tax rate and the stock
    /// overhead and margin percentages.  A trade the region does not
    /// list falls back to the general-trade rate, then to zero so the
    /// gap is visible instead of silently priced.  Everything else
    /// starts at zero, ready for the caller to fill in.
    pub fn default_quote_input(&self, trade: TradeType) -> QuoteInput {
        QuoteInput {
            customer_type: CustomerType::Residential,
            quality_level: QualityLevel::Standard,
            is_emergency: false,
            labor_hours: 0.0,
            labor_rate: self
                .default_rate(trade)
                .or_else(|| self.default_rate(TradeType::General))
                .unwrap_or(0.0),
            materials_cost: 0.0,
            transportation_cost: 0.0,
            tax_rate: self.tax_rate,
            admin_overhead_pct: DEFAULT_ADMIN_OVERHEAD_PCT,
            tool_wear_cost: 0.0,
            profit_margin_pct: DEFAULT_PROFIT_MARGIN_PCT,
            line_items: Vec::new(),
        }
    }
}

impl Default for RegionPreset {
    fn default() -> Self {
        Self::montreal()
    }
}

/// The three margin percentages that define the sell-price tiers.
///
/// The schedule is meaningful only when
/// `destructive < minimum < recommended_floor`; the engine applies
/// the values as given and does not reorder them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarginSchedule {
    /// Floor for the recommended-tier margin.  A caller-supplied
    /// target margin below this is raised to it.
    pub recommended_floor: f64,
    /// Fixed margin for the minimum acceptable price.
    pub minimum: f64,
    /// Fixed margin for the destructive price.
    pub destructive: f64,
}

impl Default for MarginSchedule {
    fn default() -> Self {
        MarginSchedule {
            recommended_floor: 25.0,
            minimum: 12.0,
            destructive: 3.0,
        }
    }
}

/// Complete configuration for one pricing computation.
///
/// The tables behind this type used to live as process-wide
/// constants; passing them in explicitly keeps the engine a pure
/// function and lets tests price against synthetic regions.  The
/// configuration must be treated as read-only for the lifetime of a
/// computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// The region whose business defaults govern this computation.
    pub region: RegionPreset,
    /// Labor multiplier per finish level.
    pub quality_multipliers: HashMap<QualityLevel, f64>,
    /// Labor multiplier per customer type.
    pub customer_multipliers: HashMap<CustomerType, f64>,
    /// Margin percentages for the three price tiers.
    pub margins: MarginSchedule,
}

impl EngineConfig {
    /// Standard multiplier tables and margins around the given region.
    pub fn for_region(region: RegionPreset) -> Self {
        EngineConfig {
            region,
            quality_multipliers: HashMap::from([
                (QualityLevel::Economy, 0.85),
                (QualityLevel::Standard, 1.0),
                (QualityLevel::Premium, 1.35),
            ]),
            customer_multipliers: HashMap::from([
                (CustomerType::Residential, 1.0),
                (CustomerType::Commercial, 1.15),
            ]),
            margins: MarginSchedule::default(),
        }
    }

    /// Labor multiplier for a finish level, defaulting to 1 when the
    /// table has no entry for it.
    pub fn quality_multiplier(&self, level: QualityLevel) -> f64 {
        self.quality_multipliers.get(&level).copied().unwrap_or(1.0)
    }

    /// Labor multiplier for a customer type, defaulting to 1 when the
    /// table has no entry for it.
    pub fn customer_multiplier(&self, customer: CustomerType) -> f64 {
        self.customer_multipliers.get(&customer).copied().unwrap_or(1.0)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::for_region(RegionPreset::montreal())
    }
}

/// Error loading region presets from disk.
#[derive(Debug, Error)]
pub enum RegionLoadError {
    /// The preset directory or one of its files could not be read.
    #[error("failed to read region preset data at {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Load all region presets from a directory.
///
/// This helper scans a directory and attempts to parse any `.json`
/// files as [`RegionPreset`] objects.  Files that fail to parse are
/// logged and skipped, so one malformed preset cannot take the whole
/// catalogue down; I/O failures are returned to the caller.  A
/// missing directory yields an empty vector rather than an error,
/// since the built-in default region keeps the engine usable.
/// Duplicate ids are not checked here; if you need deduplication you
/// should perform it on the caller side.
pub fn load_region_presets_from_dir(path: &Path) -> Result<Vec<RegionPreset>, RegionLoadError> {
    let mut presets = Vec::new();
    if !path.is_dir() {
        return Ok(presets);
    }
    let entries = std::fs::read_dir(path).map_err(|source| RegionLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    for entry in entries {
        let entry = entry.map_err(|source| RegionLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let file_type = entry.file_type().map_err(|source| RegionLoadError::Io {
            path: entry.path(),
            source,
        })?;
        if !file_type.is_file() {
            continue;
        }
        let file_path = entry.path();
        if file_path.extension().map_or(true, |ext| ext != "json") {
            continue;
        }
        let data = std::fs::read_to_string(&file_path).map_err(|source| RegionLoadError::Io {
            path: file_path.clone(),
            source,
        })?;
        match serde_json::from_str::<RegionPreset>(&data) {
            Ok(preset) => presets.push(preset),
            Err(err) => {
                tracing::warn!(
                    path = %file_path.display(),
                    error = %err,
                    "skipping region preset that failed to parse"
                );
            }
        }
    }
    Ok(presets)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_montreal_preset_values() {
        let region = RegionPreset::montreal();
        assert_eq!(region.id, "montreal");
        assert_eq!(region.currency, "CAD");
        assert_eq!(region.tax_rate, 14.975);
        assert_eq!(region.minimum_visit_rate, 140.0);
        assert_eq!(region.emergency_multiplier, 1.5);
        assert_eq!(region.minimum_billable_hours, 1.5);
        assert_eq!(region.default_rate(TradeType::Masonry), Some(95.0));
        assert_eq!(region.default_rate(TradeType::Hvac), Some(155.0));
    }

    #[test]
    fn test_multiplier_lookup_defaults_to_one() {
        let mut config = EngineConfig::default();
        assert_eq!(config.quality_multiplier(QualityLevel::Economy), 0.85);
        assert_eq!(config.customer_multiplier(CustomerType::Commercial), 1.15);

        config.quality_multipliers.remove(&QualityLevel::Premium);
        config.customer_multipliers.clear();
        assert_eq!(config.quality_multiplier(QualityLevel::Premium), 1.0);
        assert_eq!(config.customer_multiplier(CustomerType::Residential), 1.0);
    }

    #[test]
    fn test_default_quote_input_prefills_regional_values() {
        let region = RegionPreset::montreal();
        let input = region.default_quote_input(TradeType::Plumbing);
        assert_eq!(input.labor_rate, 135.0);
        assert_eq!(input.tax_rate, 14.975);
        assert_eq!(input.admin_overhead_pct, DEFAULT_ADMIN_OVERHEAD_PCT);
        assert_eq!(input.profit_margin_pct, DEFAULT_PROFIT_MARGIN_PCT);
        assert_eq!(input.labor_hours, 0.0);
        assert!(!input.is_emergency);
        assert!(input.line_items.is_empty());
    }

    #[test]
    fn test_prefill_rate_falls_back_to_general_then_zero() {
        let mut region = RegionPreset::montreal();
        region.rates.remove(&TradeType::Plumbing);
        region.rates.insert(TradeType::General, 101.0);
        let input = region.default_quote_input(TradeType::Plumbing);
        assert_eq!(input.labor_rate, 101.0);

        region.rates.clear();
        let input = region.default_quote_input(TradeType::Plumbing);
        assert_eq!(input.labor_rate, 0.0);
    }

    #[test]
    fn test_preset_serialises_trade_keys_lowercase() {
        let json = serde_json::to_value(RegionPreset::montreal()).unwrap();
        assert_eq!(json["rates"]["hvac"], serde_json::json!(155.0));
        assert_eq!(json["tax_rate"], serde_json::json!(14.975));
    }

    #[test]
    fn test_load_presets_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        let toronto = serde_json::json!({
            "id": "toronto",
            "name": "Toronto, ON",
            "currency": "CAD",
            "tax_rate": 13.0,
            "minimum_visit_rate": 160.0,
            "emergency_multiplier": 1.75,
            "minimum_billable_hours": 2.0,
            "rates": { "plumbing": 150.0 }
        });
        std::fs::write(dir.path().join("toronto.json"), toronto.to_string()).unwrap();
        std::fs::write(dir.path().join("broken.json"), "{not json").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignore me").unwrap();

        let presets = load_region_presets_from_dir(dir.path()).unwrap();
        assert_eq!(presets.len(), 1);
        assert_eq!(presets[0].id, "toronto");
        assert_eq!(presets[0].default_rate(TradeType::Plumbing), Some(150.0));
        assert_eq!(presets[0].default_rate(TradeType::Roofing), None);
    }

    #[test]
    fn test_load_presets_missing_dir_is_empty() {
        let presets = load_region_presets_from_dir(Path::new("does/not/exist")).unwrap();
        assert!(presets.is_empty());
    }
}
