//! Crop Parameter Catalog
//!
//! Static lookup table of supported crops. Each entry carries the reference
//! quantities the scoring engine works against (`base_yield`,
//! `optimal_fertilizer`, `optimal_water`), the market price used by the
//! ranker's profit estimate, and descriptive metadata surfaced verbatim to
//! the frontend.
//!
//! Lookup by crop name is strict: a request naming a crop that is not in the
//! catalog is rejected, never silently defaulted. Iteration order is
//! insertion order, which makes ranking tie-breaks deterministic.

use rustc_hash::FxHashMap;
use serde::Serialize;

/// Parameters for one supported crop.
#[derive(Debug, Clone, Serialize)]
pub struct CropParameters {
    /// Crop name, the catalog key
    pub name: String,

    /// Growing season label (display only)
    pub season: String,

    /// Water-need category (display only)
    pub water_need: String,

    /// Growth duration range (display only)
    pub duration: String,

    /// Profitability tier (display only)
    pub profitability: String,

    /// Risk tier (display only)
    pub risk: String,

    /// Market-demand tier (display only)
    pub market_demand: String,

    /// Ideal soil description (display only)
    pub ideal_soil: String,

    /// Free-text cultivation notes (display only)
    pub special_notes: String,

    /// Yield in tons per unit area at reference conditions
    pub base_yield: f64,

    /// Fertilizer application rate (tons) at which the fertilizer effect peaks
    pub optimal_fertilizer: f64,

    /// Water volume (m³) at which the water effect peaks
    pub optimal_water: f64,

    /// Market price per unit, used only in net-profit estimates
    pub market_price: f64,
}

/// Ordered, immutable catalog of supported crops.
///
/// Read-only after construction and safe to share across request handlers.
#[derive(Debug, Clone)]
pub struct CropCatalog {
    crops: Vec<CropParameters>,
    by_name: FxHashMap<String, usize>,
}

impl CropCatalog {
    /// Build a catalog from a list of crop entries. Later duplicates replace
    /// earlier index entries but keep the original position.
    pub fn new(crops: Vec<CropParameters>) -> Self {
        let by_name = crops
            .iter()
            .enumerate()
            .map(|(idx, crop)| (crop.name.clone(), idx))
            .collect();
        Self { crops, by_name }
    }

    /// Strict lookup by crop name. `None` means the request must be rejected.
    pub fn get(&self, name: &str) -> Option<&CropParameters> {
        self.by_name.get(name).map(|&idx| &self.crops[idx])
    }

    /// Iterate crops in catalog (insertion) order.
    pub fn iter(&self) -> impl Iterator<Item = &CropParameters> {
        self.crops.iter()
    }

    /// Crop names in catalog order.
    pub fn names(&self) -> Vec<&str> {
        self.crops.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.crops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.crops.is_empty()
    }

    /// The built-in five-crop catalog.
    pub fn builtin() -> Self {
        Self::new(vec![
            CropParameters {
                name: "Rice".to_string(),
                season: "Kharif".to_string(),
                water_need: "High".to_string(),
                duration: "90-120 days".to_string(),
                profitability: "High".to_string(),
                risk: "Medium".to_string(),
                market_demand: "High".to_string(),
                ideal_soil: "Clayey Loam".to_string(),
                special_notes: "Requires standing water, high labor".to_string(),
                base_yield: 4.0,
                optimal_fertilizer: 2.5,
                optimal_water: 6000.0,
                market_price: 25.0,
            },
            CropParameters {
                name: "Wheat".to_string(),
                season: "Rabi".to_string(),
                water_need: "Medium".to_string(),
                duration: "110-130 days".to_string(),
                profitability: "Medium".to_string(),
                risk: "Low".to_string(),
                market_demand: "High".to_string(),
                ideal_soil: "Well-drained Loam".to_string(),
                special_notes: "Cold weather crop, frost tolerant".to_string(),
                base_yield: 3.5,
                optimal_fertilizer: 2.0,
                optimal_water: 4000.0,
                market_price: 22.0,
            },
            CropParameters {
                name: "Maize".to_string(),
                season: "Kharif".to_string(),
                water_need: "Medium".to_string(),
                duration: "80-100 days".to_string(),
                profitability: "Medium".to_string(),
                risk: "Medium".to_string(),
                market_demand: "High".to_string(),
                ideal_soil: "Well-drained Sandy Loam".to_string(),
                special_notes: "Quick growing, multiple varieties".to_string(),
                base_yield: 2.8,
                optimal_fertilizer: 1.8,
                optimal_water: 3500.0,
                market_price: 18.0,
            },
            CropParameters {
                name: "Cotton".to_string(),
                season: "Kharif".to_string(),
                water_need: "Medium-High".to_string(),
                duration: "150-170 days".to_string(),
                profitability: "High".to_string(),
                risk: "High".to_string(),
                market_demand: "Medium".to_string(),
                ideal_soil: "Black Cotton Soil".to_string(),
                special_notes: "Long duration, pest sensitive".to_string(),
                base_yield: 1.8,
                optimal_fertilizer: 2.2,
                optimal_water: 4500.0,
                market_price: 65.0,
            },
            CropParameters {
                name: "Sugarcane".to_string(),
                season: "Throughout Year".to_string(),
                water_need: "Very High".to_string(),
                duration: "10-12 months".to_string(),
                profitability: "Very High".to_string(),
                risk: "Medium".to_string(),
                market_demand: "Medium".to_string(),
                ideal_soil: "Deep Loamy Soil".to_string(),
                special_notes: "Long term investment, high water need".to_string(),
                base_yield: 70.0,
                optimal_fertilizer: 3.0,
                optimal_water: 8000.0,
                market_price: 3.5,
            },
        ])
    }
}
