//! Advisory Chat Responder
//!
//! Deterministic fallback assistant: if the message mentions a catalog crop,
//! answer with that crop's cultivation profile; otherwise point the user at
//! what the assistant can actually answer. No external model calls.

use crate::catalog::CropCatalog;

/// Where a chat answer came from, recorded alongside stored messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatSource {
    /// Answered from a specific catalog entry
    CropInfo,
    /// Generic guidance fallback
    General,
}

impl ChatSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatSource::CropInfo => "crop_info",
            ChatSource::General => "general",
        }
    }
}

/// Answer a chat message from the catalog. Matching is case-insensitive on
/// crop names; the first catalog crop mentioned wins.
pub fn reply(catalog: &CropCatalog, message: &str) -> (String, ChatSource) {
    let lowered = message.to_lowercase();

    for crop in catalog.iter() {
        if lowered.contains(&crop.name.to_lowercase()) {
            let lines = vec![
                format!("For {} cultivation:", crop.name),
                format!("• Season: {}", crop.season),
                format!("• Water Need: {}", crop.water_need),
                format!("• Duration: {}", crop.duration),
                format!("• Ideal Soil: {}", crop.ideal_soil),
                format!("• Risk Level: {}", crop.risk),
                format!("• Special Notes: {}", crop.special_notes),
                format!(
                    "Optimal fertilizer: {} tons, Water: {}m³",
                    crop.optimal_fertilizer, crop.optimal_water
                ),
            ];
            return (lines.join("\n"), ChatSource::CropInfo);
        }
    }

    let crop_list = catalog.names().join(", ");
    let lines = vec![
        "I can provide detailed farming advice! Ask me about:".to_string(),
        format!("• Specific crops ({})", crop_list),
        "• Soil preparation techniques".to_string(),
        "• Irrigation methods".to_string(),
        "• Pest management".to_string(),
        "• Yield optimization".to_string(),
        "Just mention a crop name or ask a specific question!".to_string(),
    ];
    (lines.join("\n"), ChatSource::General)
}
