//! Internal domain models for plant identification.
//!
//! These types are OUR types - they don't change when the identification
//! API changes. Responses get converted into these types by the adapter.

use serde::Serialize;

/// What the identification service made of one photo.
///
/// Suggestions keep the service's order; nothing here re-ranks them.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct IdentificationResult {
    /// Candidate species, best first according to the service
    pub suggestions: Vec<Suggestion>,
    /// Representative image URLs returned alongside the suggestions
    pub images: Vec<String>,
}

/// One species guess
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Suggestion {
    /// Common name, e.g. "Rose"
    pub plant_name: String,
    /// Scientific name, e.g. "Rosa"
    pub scientific_name: String,
    /// Confidence (0.0 to 1.0)
    pub probability: f64,
}

impl IdentificationResult {
    /// The service's top candidate, if it returned any.
    pub fn top_suggestion(&self) -> Option<&Suggestion> {
        self.suggestions.first()
    }
}

/// Ways a single identification transfer can fail
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransferFailure {
    /// No response could be obtained (connect error, DNS, timeout)
    #[error("Network error: {0}")]
    NetworkUnreachable(String),

    /// The service answered with a non-success status
    #[error("Identification service returned HTTP {status}")]
    ServiceError { status: u16 },

    /// Success status but the body was not the expected shape
    #[error("Invalid API response: {0}")]
    MalformedResponse(String),
}
