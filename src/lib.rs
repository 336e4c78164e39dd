//! Crop Advisor Backend
//!
//! Web backend for a farming-advisory frontend: deterministic yield
//! prediction and crop recommendation over a static crop catalog, plus
//! best-effort persistence of interaction history.
//!
//! The core is a pure scoring engine (`engine`) driven by a multiplicative
//! factor model, with a ranker (`ranker`) that evaluates every catalog crop
//! under best-practice assumptions. The HTTP layer (`api_server`) is a thin
//! axum shell around those two calls.

pub mod api_server;
pub mod catalog;
pub mod chat;
pub mod engine;
pub mod factors;
pub mod ranker;
pub mod storage;

// Re-export commonly used types
pub use api_server::{create_router, AppState};
pub use catalog::{CropCatalog, CropParameters};
pub use engine::{score, PredictionInput, PredictionResult, Suitability, UnknownCropError};
pub use ranker::{rank, CropRecommendation, RecommendationContext};
pub use storage::{MemoryStore, RecordKind, ResultStore, StoredRecord};
