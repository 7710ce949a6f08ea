//! HTTP API for the quote engine.
//!
//! This module exposes a minimal REST API around the pricing engine
//! using the [`axum`](https://crates.io/crates/axum) framework.  The
//! API lets clients price quotes, preview ballpark tiers, assess a
//! proposed final price and browse the region catalogue, all in
//! JSON.  The server relies on the same region presets used by the
//! core engine.

use crate::engine::{
    calculate_pricing, calculate_pricing_batch, price_tier, price_warning, profit_summary,
};
use crate::models::{PriceTier, PricingResult, ProfitSummary, QuoteInput, Severity, TradeType};
use crate::preview::{calculate_tier_prices, TierPrices};
use crate::region::{load_region_presets_from_dir, EngineConfig, RegionPreset};
use anyhow::Result;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::trace::TraceLayer;

/// Application state shared across requests.
pub struct AppState {
    /// Region presets by id.  Always contains the default region.
    pub regions: RwLock<HashMap<String, RegionPreset>>,
    /// Id of the region used when a request names none, or names one
    /// the catalogue does not have.
    pub default_region: String,
}

/// Body for `POST /api/estimate`.
#[derive(Debug, Deserialize)]
pub struct EstimateRequest {
    /// Region preset to price against; the default region when omitted.
    pub region: Option<String>,
    pub quote: QuoteInput,
}

/// Body for `POST /api/estimate/batch`.
#[derive(Debug, Deserialize)]
pub struct BatchEstimateRequest {
    pub region: Option<String>,
    pub quotes: Vec<QuoteInput>,
}

/// Body for `POST /api/preview`.
#[derive(Debug, Deserialize)]
pub struct PreviewRequest {
    pub labor_cost: f64,
    pub material_cost: f64,
    /// Overhead as a fraction of labor, e.g. `0.1` for 10%.
    pub overhead_pct: f64,
}

/// Body for `POST /api/assess`.
#[derive(Debug, Deserialize)]
pub struct AssessRequest {
    pub region: Option<String>,
    pub quote: QuoteInput,
    /// The final price the contractor intends to charge.
    pub price: f64,
}

/// Response for `POST /api/assess`: where the proposed price lands
/// and the full pricing breakdown behind the judgement.
#[derive(Debug, Serialize)]
pub struct AssessResponse {
    pub tier: PriceTier,
    pub severity: Option<Severity>,
    pub warning: Option<&'static str>,
    pub profit: Option<ProfitSummary>,
    pub pricing: PricingResult,
}

/// One selectable trade for a region, with its default hourly rate.
#[derive(Debug, Serialize)]
pub struct TradeOption {
    pub trade: TradeType,
    pub label: String,
    pub default_rate: Option<f64>,
}

/// Build the API router and initialise the region catalogue from the
/// given directory.  Returns the router and a handle to the state.
pub async fn build_router(region_dir: PathBuf) -> Result<(Router, Arc<AppState>)> {
    // The built-in default ships first so the engine always has a
    // region to fall back on; presets loaded from disk override it
    // by id.
    let default = RegionPreset::default();
    let default_region = default.id.clone();
    let mut region_map = HashMap::new();
    region_map.insert(default.id.clone(), default);
    for preset in load_region_presets_from_dir(&region_dir)? {
        region_map.insert(preset.id.clone(), preset);
    }
    tracing::info!(regions = region_map.len(), "region catalogue ready");
    let state = Arc::new(AppState {
        regions: RwLock::new(region_map),
        default_region,
    });
    // Construct router
    let router = Router::new()
        .route("/api/estimate", post(estimate_handler))
        .route("/api/estimate/batch", post(estimate_batch_handler))
        .route("/api/preview", post(preview_handler))
        .route("/api/assess", post(assess_handler))
        .route("/api/regions", get(regions_handler))
        .route("/api/regions/:id/trades", get(trades_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state.clone());
    Ok((router, state))
}

/// Resolves the engine configuration for an optional region id,
/// falling back to the default region when the id is missing or
/// unknown.
async fn engine_config_for(state: &AppState, region_id: Option<&str>) -> EngineConfig {
    let regions = state.regions.read().await;
    if let Some(id) = region_id {
        if let Some(preset) = regions.get(id) {
            return EngineConfig::for_region(preset.clone());
        }
        tracing::debug!(region = id, "unknown region requested, using default");
    }
    let preset = regions
        .get(&state.default_region)
        .cloned()
        .unwrap_or_default();
    EngineConfig::for_region(preset)
}

/// Handler for POST /api/estimate
async fn estimate_handler(
    State(app_state): State<Arc<AppState>>,
    Json(request): Json<EstimateRequest>,
) -> Json<PricingResult> {
    let config = engine_config_for(&app_state, request.region.as_deref()).await;
    Json(calculate_pricing(&request.quote, &config))
}

/// Handler for POST /api/estimate/batch
async fn estimate_batch_handler(
    State(app_state): State<Arc<AppState>>,
    Json(request): Json<BatchEstimateRequest>,
) -> Json<Vec<PricingResult>> {
    let config = engine_config_for(&app_state, request.region.as_deref()).await;
    Json(calculate_pricing_batch(&request.quotes, &config))
}

/// Handler for POST /api/preview
async fn preview_handler(Json(request): Json<PreviewRequest>) -> Json<TierPrices> {
    Json(calculate_tier_prices(
        request.labor_cost,
        request.material_cost,
        request.overhead_pct,
    ))
}

/// Handler for POST /api/assess
async fn assess_handler(
    State(app_state): State<Arc<AppState>>,
    Json(request): Json<AssessRequest>,
) -> Json<AssessResponse> {
    let config = engine_config_for(&app_state, request.region.as_deref()).await;
    let pricing = calculate_pricing(&request.quote, &config);
    let tier = price_tier(request.price, &pricing);
    Json(AssessResponse {
        tier,
        severity: tier.severity(),
        warning: price_warning(request.price, &pricing),
        profit: profit_summary(request.price, &pricing),
        pricing,
    })
}

/// Handler for GET /api/regions
async fn regions_handler(State(app_state): State<Arc<AppState>>) -> Json<Vec<RegionPreset>> {
    let regions = app_state.regions.read().await;
    let mut presets: Vec<RegionPreset> = regions.values().cloned().collect();
    // Map order is arbitrary; keep the listing stable for clients.
    presets.sort_by(|a, b| a.id.cmp(&b.id));
    Json(presets)
}

/// Handler for GET /api/regions/:id/trades
async fn trades_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let regions = app_state.regions.read().await;
    match regions.get(&id) {
        Some(preset) => {
            let options: Vec<TradeOption> = TradeType::ALL
                .iter()
                .map(|&trade| TradeOption {
                    trade,
                    label: trade.to_string(),
                    default_rate: preset.default_rate(trade),
                })
                .collect();
            Json(options).into_response()
        }
        None => {
            let body = Json(serde_json::json!({"error": format!("unknown region: {}", id)}));
            (StatusCode::NOT_FOUND, body).into_response()
        }
    }
}

/// Launch the API server.  This function builds the router from the
/// given region preset directory and binds to the supplied address.
/// It blocks until the server terminates (e.g. when interrupted).
pub async fn serve(addr: &str, region_dir: PathBuf) -> Result<()> {
    let (router, _state) = build_router(region_dir).await?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "server listening");
    axum::serve(listener, router).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Catalogue with the built-in default plus one extra region whose
    /// visit floor differs, so tests can tell which preset was used.
    async fn seeded_state() -> Arc<AppState> {
        let (_router, state) = build_router(PathBuf::from("no/such/dir")).await.unwrap();
        let mut lakeside = RegionPreset::montreal();
        lakeside.id = "lakeside".to_string();
        lakeside.minimum_visit_rate = 160.0;
        state
            .regions
            .write()
            .await
            .insert(lakeside.id.clone(), lakeside);
        state
    }

    #[tokio::test]
    async fn test_named_region_selects_its_preset() {
        let state = seeded_state().await;
        let config = engine_config_for(&state, Some("lakeside")).await;
        assert_eq!(config.region.id, "lakeside");
        assert_eq!(config.region.minimum_visit_rate, 160.0);
    }

    #[tokio::test]
    async fn test_unknown_or_omitted_region_falls_back_to_default() {
        let state = seeded_state().await;
        let unknown = engine_config_for(&state, Some("atlantis")).await;
        assert_eq!(unknown.region.id, state.default_region);
        let omitted = engine_config_for(&state, None).await;
        assert_eq!(omitted.region, unknown.region);
    }

    #[tokio::test]
    async fn test_estimate_handler_prices_against_named_region() {
        let state = seeded_state().await;
        let quote = RegionPreset::montreal().default_quote_input(TradeType::Plumbing);
        let request = EstimateRequest {
            region: Some("lakeside".to_string()),
            quote,
        };
        let Json(pricing) = estimate_handler(State(state), Json(request)).await;
        assert_eq!(pricing.minimum_visit_rate, 160.0);
    }

    #[tokio::test]
    async fn test_trades_listing_for_known_region() {
        let state = seeded_state().await;
        let response = trades_handler(State(state), Path("montreal".to_string()))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let options: Vec<serde_json::Value> = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(options.len(), TradeType::ALL.len());
        assert!(options
            .iter()
            .any(|option| option["trade"] == "hvac" && option["default_rate"] == 155.0));
    }

    #[tokio::test]
    async fn test_trades_listing_unknown_region_is_not_found() {
        let state = seeded_state().await;
        let response = trades_handler(State(state), Path("atlantis".to_string()))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert!(body["error"]
            .as_str()
            .is_some_and(|message| message.contains("atlantis")));
    }
}
