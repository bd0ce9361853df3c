//! Adapter layer: Convert identification DTOs to domain models
//!
//! This is the ONLY place where DTO types are converted to domain types.
//! Shape checks that serde can't express (probability range) live here too,
//! so a body that parses but makes no sense is still `MalformedResponse`.

use super::dto;
use crate::identification::domain::{IdentificationResult, Suggestion, TransferFailure};

/// Parse a success response body into a domain result
pub fn parse_body(body: &[u8]) -> Result<IdentificationResult, TransferFailure> {
    let response: dto::IdentifyResponse = serde_json::from_slice(body)
        .map_err(|e| TransferFailure::MalformedResponse(e.to_string()))?;
    to_result(response)
}

/// Convert a parsed response to a domain result, preserving order
pub fn to_result(response: dto::IdentifyResponse) -> Result<IdentificationResult, TransferFailure> {
    let suggestions = response
        .suggestions
        .into_iter()
        .map(convert_suggestion)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(IdentificationResult {
        suggestions,
        images: response.images.into_iter().map(|i| i.url).collect(),
    })
}

fn convert_suggestion(suggestion: dto::SuggestionDto) -> Result<Suggestion, TransferFailure> {
    let probability = suggestion.probability;
    if !(0.0..=1.0).contains(&probability) {
        return Err(TransferFailure::MalformedResponse(format!(
            "probability {} for {:?} is outside 0..=1",
            probability, suggestion.plant_name
        )));
    }

    Ok(Suggestion {
        plant_name: suggestion.plant_name,
        scientific_name: suggestion.plant_details.scientific_name,
        probability,
    })
}
