//! Axum API Server Module
//!
//! REST layer over the scoring engine and ranker. Handlers validate the
//! request, run the pure core with a thread-local generator, and hand the
//! interaction to the result store best-effort when a `userId` is present.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};

use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use crate::catalog::CropCatalog;
use crate::chat;
use crate::engine::{self, PredictionInput, UnknownCropError};
use crate::factors::{
    ExperienceLevel, IrrigationType, Region, Season, SoilType, WaterQuality,
};
use crate::ranker::{self, RecommendationContext};
use crate::storage::{store_best_effort, MemoryStore, RecordKind, ResultStore, StoredRecord};

// ============================================================================
// Application State
// ============================================================================

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<CropCatalog>,
    pub store: Arc<dyn ResultStore>,
}

impl AppState {
    pub fn new(catalog: CropCatalog, store: Arc<dyn ResultStore>) -> Self {
        Self {
            catalog: Arc::new(catalog),
            store,
        }
    }

    /// Built-in catalog with an in-memory store. What the server binary and
    /// the integration tests run.
    pub fn with_builtin_catalog() -> Self {
        Self::new(CropCatalog::builtin(), Arc::new(MemoryStore::new()))
    }
}

// ============================================================================
// Router
// ============================================================================

pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Service info + health
        .route("/", get(root))
        .route("/health", get(health_check))

        // Core endpoints
        .route("/api/predict-yield", post(predict_yield))
        .route("/api/recommendations", post(get_recommendations))

        // Crop catalog (JSON)
        .route("/api/crop-database", get(get_crop_database))
        .route("/api/crop/:name", get(get_crop_detail))

        // Advisory chat
        .route("/api/chat", post(chat_assistant))

        // Middleware (applied in reverse order)
        .layer(CompressionLayer::new()) // gzip + brotli compression
        .layer(CorsLayer::permissive()) // Allow all origins (adjust for production)
        .layer(TraceLayer::new_for_http()) // Request logging
        .with_state(state)
}

// ============================================================================
// Request Types
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictYieldRequest {
    crop_type: Option<String>,
    irrigation_type: Option<String>,
    soil_type: Option<String>,
    season: Option<String>,
    farm_area: Option<f64>,
    fertilizer: Option<f64>,
    water_usage: Option<f64>,
    experience_level: Option<String>,
    water_quality: Option<String>,
    region: Option<String>,
    organic_fertilizer: Option<bool>,
    ipm_approach: Option<bool>,
    previous_yield: Option<f64>,
    user_id: Option<String>,
}

impl PredictYieldRequest {
    /// Check the required fields in declaration order and report the first
    /// one missing by its wire name.
    fn check_required(&self) -> Result<(), AppError> {
        let required: [(&str, bool); 5] = [
            ("cropType", self.crop_type.is_some()),
            ("irrigationType", self.irrigation_type.is_some()),
            ("soilType", self.soil_type.is_some()),
            ("season", self.season.is_some()),
            ("farmArea", self.farm_area.is_some()),
        ];
        for (name, present) in required {
            if !present {
                return Err(AppError::Validation(format!(
                    "Missing required field: {name}"
                )));
            }
        }
        Ok(())
    }

    /// Range checks on the numeric fields, applied before the engine runs.
    fn check_ranges(&self) -> Result<(), AppError> {
        check_range("farmArea", self.farm_area, 0.1, 1000.0)?;
        check_range("fertilizer", self.fertilizer, 0.0, 10.0)?;
        check_range("waterUsage", self.water_usage, 0.0, 20000.0)?;
        check_range("previousYield", self.previous_yield, 0.0, 100.0)?;
        Ok(())
    }

    /// Normalize into an engine input: defaults applied, categorical labels
    /// parsed permissively.
    fn to_input(&self) -> PredictionInput {
        PredictionInput {
            crop_type: self.crop_type.clone().unwrap_or_default(),
            irrigation: self
                .irrigation_type
                .as_deref()
                .and_then(IrrigationType::parse),
            soil: self.soil_type.as_deref().and_then(SoilType::parse),
            season: self.season.as_deref().and_then(Season::parse),
            farm_area: self.farm_area.unwrap_or(10.0),
            fertilizer: self.fertilizer.unwrap_or(2.0),
            water_usage: self.water_usage.unwrap_or(5000.0),
            experience: Some(
                self.experience_level
                    .as_deref()
                    .and_then(ExperienceLevel::parse)
                    .unwrap_or(ExperienceLevel::Intermediate),
            ),
            water_quality: Some(
                self.water_quality
                    .as_deref()
                    .and_then(WaterQuality::parse)
                    .unwrap_or(WaterQuality::Good),
            ),
            region: Some(
                self.region
                    .as_deref()
                    .and_then(Region::parse)
                    .unwrap_or(Region::North),
            ),
            organic_fertilizer: self.organic_fertilizer.unwrap_or(false),
            ipm_approach: self.ipm_approach.unwrap_or(false),
            previous_yield: self.previous_yield.unwrap_or(3.5),
        }
    }
}

fn check_range(name: &str, value: Option<f64>, min: f64, max: f64) -> Result<(), AppError> {
    if let Some(v) = value {
        if v < min || v > max {
            return Err(AppError::Validation(format!(
                "{name} must be between {min} and {max}"
            )));
        }
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationRequest {
    soil_type: Option<String>,
    irrigation_type: Option<String>,
    season: Option<String>,
    farm_area: Option<f64>,
    user_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    message: Option<String>,
    user_id: Option<String>,
}

// ============================================================================
// Endpoint Handlers
// ============================================================================

async fn root() -> impl IntoResponse {
    Json(json!({
        "app": "Crop Advisor Backend",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "crops_available": state.catalog.names(),
        "stored_records": state.store.stored_count(),
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

async fn predict_yield(
    State(state): State<AppState>,
    Json(request): Json<PredictYieldRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    request.check_required()?;
    request.check_ranges()?;

    let input = request.to_input();
    let mut rng = rand::thread_rng();
    let prediction = engine::score(&input, &state.catalog, &mut rng)?;

    // Crop is known to exist once score() succeeded.
    let crop = state
        .catalog
        .get(&input.crop_type)
        .ok_or_else(|| AppError::Internal("catalog lookup failed after scoring".into()))?;

    let inputs_used = json!({
        "cropType": input.crop_type,
        "irrigationType": request.irrigation_type,
        "soilType": request.soil_type,
        "season": request.season,
        "farmArea": input.farm_area,
        "fertilizer": input.fertilizer,
        "waterUsage": input.water_usage,
        "experienceLevel": request.experience_level.as_deref().unwrap_or("Intermediate"),
        "waterQuality": request.water_quality.as_deref().unwrap_or("Good"),
        "region": request.region.as_deref().unwrap_or("North"),
        "organicFertilizer": input.organic_fertilizer,
        "ipmApproach": input.ipm_approach,
        "previousYield": input.previous_yield,
    });

    let response = json!({
        "predicted_yield": prediction.predicted_yield,
        "margin_error": prediction.margin_error,
        "confidence": prediction.confidence,
        "suitability": prediction.suitability,
        "yield_range": prediction.yield_range,
        "crop_info": {
            "season": crop.season,
            "water_need": crop.water_need,
            "duration": crop.duration,
            "risk": crop.risk,
        },
        "optimization_score": prediction.optimization_score,
        "risk_factors": prediction.risk_factors,
        "recommendations": prediction.recommendations,
        "inputs_used": inputs_used,
        "message": "Yield prediction calculated from the agronomic factor model",
    });

    if let Some(user_id) = &request.user_id {
        store_best_effort(
            state.store.as_ref(),
            StoredRecord::new(
                RecordKind::YieldPrediction,
                user_id,
                response["inputs_used"].clone(),
                response.clone(),
            ),
        );
    }

    tracing::debug!(
        "Prediction for {}: {} tons (confidence {})",
        input.crop_type,
        prediction.predicted_yield,
        prediction.confidence
    );

    Ok(Json(response))
}

async fn get_recommendations(
    State(state): State<AppState>,
    Json(request): Json<RecommendationRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    check_range("farmArea", request.farm_area, 0.1, 1000.0)?;

    let context = RecommendationContext {
        soil: request
            .soil_type
            .as_deref()
            .and_then(SoilType::parse)
            .or(Some(SoilType::Loamy)),
        irrigation: request
            .irrigation_type
            .as_deref()
            .and_then(IrrigationType::parse)
            .or(Some(IrrigationType::Canal)),
        season: request
            .season
            .as_deref()
            .and_then(Season::parse)
            .or(Some(Season::Kharif)),
        farm_area: request.farm_area.unwrap_or(10.0),
    };

    let mut rng = rand::thread_rng();
    let recommendations = ranker::rank(&context, &state.catalog, &mut rng);
    let total = recommendations.len();

    let response = json!({
        "recommendations": recommendations,
        "total_crops_evaluated": total,
        "message": "Recommendations based on your farm conditions",
    });

    if let Some(user_id) = &request.user_id {
        store_best_effort(
            state.store.as_ref(),
            StoredRecord::new(
                RecordKind::CropRecommendation,
                user_id,
                json!({
                    "soilType": request.soil_type,
                    "irrigationType": request.irrigation_type,
                    "season": request.season,
                    "farmArea": context.farm_area,
                }),
                response.clone(),
            ),
        );
    }

    Ok(Json(response))
}

async fn get_crop_database(State(state): State<AppState>) -> impl IntoResponse {
    let mut database = serde_json::Map::new();
    for crop in state.catalog.iter() {
        database.insert(
            crop.name.clone(),
            serde_json::to_value(crop).unwrap_or(serde_json::Value::Null),
        );
    }
    Json(serde_json::Value::Object(database))
}

async fn get_crop_detail(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let crop = state
        .catalog
        .get(&name)
        .ok_or_else(|| AppError::NotFound("Crop not found".to_string()))?;
    Ok(Json(json!(crop)))
}

async fn chat_assistant(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let message = request
        .message
        .as_deref()
        .map(str::trim)
        .unwrap_or_default();
    if message.is_empty() {
        return Err(AppError::Validation("Message cannot be empty".to_string()));
    }

    let (reply, source) = chat::reply(&state.catalog, message);

    if let Some(user_id) = &request.user_id {
        store_best_effort(
            state.store.as_ref(),
            StoredRecord::new(
                RecordKind::ChatMessage,
                user_id,
                json!({ "message": message }),
                json!({ "response": reply, "source": source.as_str() }),
            ),
        );
    }

    Ok(Json(json!({ "response": reply, "source": source.as_str() })))
}

// ============================================================================
// Error Handling
// ============================================================================

#[derive(Debug)]
pub enum AppError {
    /// Request rejected before the engine ran (missing field, bad range)
    Validation(String),
    /// Crop name absent from the catalog
    UnknownCrop(String),
    NotFound(String),
    Internal(String),
}

impl From<UnknownCropError> for AppError {
    fn from(err: UnknownCropError) -> Self {
        AppError::UnknownCrop(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::UnknownCrop(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
