//! Recommendation Ranker
//!
//! Runs the scoring engine once per catalog crop under a synthetic
//! best-practice input (the crop's own optimal fertilizer and water as the
//! applied quantities) and returns the crops sorted by expected yield,
//! highest first. A crop whose scoring call fails is skipped rather than
//! aborting the ranking — partial results beat none.

use std::cmp::Ordering;

use rand::Rng;
use serde::Serialize;

use crate::catalog::CropCatalog;
use crate::engine::{self, PredictionInput, Suitability};
use crate::factors::{ExperienceLevel, IrrigationType, Region, Season, SoilType, WaterQuality};

/// Farm context shared by every candidate crop in one ranking call.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecommendationContext {
    pub soil: Option<SoilType>,
    pub irrigation: Option<IrrigationType>,
    pub season: Option<Season>,
    pub farm_area: f64,
}

/// One ranked crop, in the wire shape the frontend consumes.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CropRecommendation {
    pub crop: String,
    pub suitability: Suitability,
    pub expected_yield: f64,
    pub net_profit: i64,
    pub roi: u8,
    pub risk: String,
    pub season: String,
    pub water_need: String,
    pub duration: String,
    pub profitability: String,
    pub market_demand: String,
}

/// Fixed monetary margin assumption in the net-profit heuristic: unit-area
/// yield × 1000, priced at market, at a 30% margin. A coarse planning
/// figure, not a financial model.
const PROFIT_MARGIN: f64 = 0.3;
const YIELD_SCALE: f64 = 1000.0;

/// Rank every catalog crop for the given context, best expected yield first.
///
/// Assumes best-practice application: each crop is scored with its own
/// optimal fertilizer/water, Intermediate experience, Good water quality,
/// North region, no organic/IPM adoption, and a previous yield of 80% of
/// base. Ties keep catalog order (stable sort).
pub fn rank<R: Rng + ?Sized>(
    context: &RecommendationContext,
    catalog: &CropCatalog,
    rng: &mut R,
) -> Vec<CropRecommendation> {
    let mut recommendations = Vec::with_capacity(catalog.len());

    for crop in catalog.iter() {
        let input = PredictionInput {
            crop_type: crop.name.clone(),
            irrigation: context.irrigation,
            soil: context.soil,
            season: context.season,
            farm_area: context.farm_area,
            fertilizer: crop.optimal_fertilizer,
            water_usage: crop.optimal_water,
            experience: Some(ExperienceLevel::Intermediate),
            water_quality: Some(WaterQuality::Good),
            region: Some(Region::North),
            organic_fertilizer: false,
            ipm_approach: false,
            previous_yield: crop.base_yield * 0.8,
        };

        let prediction = match engine::score(&input, catalog, rng) {
            Ok(p) => p,
            Err(e) => {
                // Skip, don't abort: one bad entry must not empty the list.
                tracing::warn!("Skipping {} in ranking: {}", crop.name, e);
                continue;
            }
        };

        let net_profit =
            (prediction.predicted_yield * YIELD_SCALE * crop.market_price * PROFIT_MARGIN) as i64;

        recommendations.push(CropRecommendation {
            crop: crop.name.clone(),
            suitability: prediction.suitability,
            expected_yield: prediction.predicted_yield,
            net_profit,
            roi: prediction.optimization_score,
            risk: crop.risk.clone(),
            season: crop.season.clone(),
            water_need: crop.water_need.clone(),
            duration: crop.duration.clone(),
            profitability: crop.profitability.clone(),
            market_demand: crop.market_demand.clone(),
        });
    }

    recommendations.sort_by(|a, b| {
        b.expected_yield
            .partial_cmp(&a.expected_yield)
            .unwrap_or(Ordering::Equal)
    });

    recommendations
}
