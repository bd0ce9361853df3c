//! Identification API Data Transfer Objects
//!
//! These types match what the plant.id v2 `identify` endpoint sends and
//! receives. Fields we don't use are left out and ignored on parse.
//! DO NOT use these types outside the identification module - convert to
//! domain types.
//!
//! Example response:
//! ```json
//! {
//!   "id": 123456,
//!   "suggestions": [{
//!     "id": 1,
//!     "plant_name": "Rosa",
//!     "plant_details": {"scientific_name": "Rosa"},
//!     "probability": 0.92
//!   }],
//!   "images": [{"file_name": "abc.jpg", "url": "https://plant.id/media/images/abc.jpg"}]
//! }
//! ```

use serde::{Deserialize, Serialize};

/// Request body: one or more images as `data:` URIs
#[derive(Debug, Clone, Serialize)]
pub struct IdentifyRequest {
    pub images: Vec<String>,
}

/// Top-level identify response
#[derive(Debug, Clone, Deserialize)]
pub struct IdentifyResponse {
    pub suggestions: Vec<SuggestionDto>,
    #[serde(default)]
    pub images: Vec<ImageDto>,
}

/// A single species suggestion
#[derive(Debug, Clone, Deserialize)]
pub struct SuggestionDto {
    pub plant_name: String,
    pub plant_details: PlantDetails,
    pub probability: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlantDetails {
    pub scientific_name: String,
}

/// Echo of an uploaded image, hosted by the service
#[derive(Debug, Clone, Deserialize)]
pub struct ImageDto {
    pub url: String,
}

// ============================================================================
// CONTRACT TESTS
// These verify our DTOs match what the real API returns.
// If these fail, the API has changed and we need to update our DTOs.
// ============================================================================
