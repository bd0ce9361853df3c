//! Test utilities and fixtures for plant-scan tests.
//!
//! Shared payloads, handles and identification results so the workflow,
//! client and presenter tests agree on what "a rose" looks like.
//!
//! # Example
//!
//! ```ignore
//! use crate::test_utils::{rose_result, sample_handle};
//!
//! let source = MockImageSource::acquiring(sample_handle());
//! let client = MockIdentification::succeeding(rose_result());
//! ```

use crate::acquisition::{EncodedImage, ImageHandle, ImageRef};
use crate::identification::{IdentificationResult, Suggestion};

/// A recorded identification response with one confident match.
///
/// Carries a few fields we don't read, like the live service does.
pub const ROSE_RESPONSE: &str = r#"{
    "id": 1234567,
    "suggestions": [
        {
            "id": 98765,
            "plant_name": "Rose",
            "plant_details": {
                "scientific_name": "Rosa",
                "structured_name": {"genus": "rosa"}
            },
            "probability": 0.92,
            "confirmed": false
        }
    ],
    "images": [
        {
            "file_name": "rose.jpg",
            "url": "https://plant.id/media/images/rose.jpg"
        }
    ],
    "is_plant": true
}"#;

/// Representative image URL in [`ROSE_RESPONSE`]
pub const ROSE_IMAGE_URL: &str = "https://plant.id/media/images/rose.jpg";

/// A tiny base64 payload ("ABC").
pub fn sample_payload() -> EncodedImage {
    EncodedImage::new("QUJD").expect("fixture payload is non-empty")
}

/// An acquired photo as a source would hand it over.
pub fn sample_handle() -> ImageHandle {
    ImageHandle {
        preview: ImageRef::new("/photos/rose.jpg"),
        payload: sample_payload(),
    }
}

/// The domain form of [`ROSE_RESPONSE`].
pub fn rose_result() -> IdentificationResult {
    IdentificationResult {
        images: vec![ROSE_IMAGE_URL.to_string()],
        ..result_with(&[("Rose", "Rosa", 0.92)])
    }
}

/// Build a result from `(plant_name, scientific_name, probability)` triples,
/// kept in the given order. No images.
///
/// ```ignore
/// let empty = result_with(&[]);
/// let two = result_with(&[("Fern", "Polypodiopsida", 0.3), ("Rose", "Rosa", 0.9)]);
/// ```
pub fn result_with(suggestions: &[(&str, &str, f64)]) -> IdentificationResult {
    IdentificationResult {
        suggestions: suggestions
            .iter()
            .map(|&(plant_name, scientific_name, probability)| Suggestion {
                plant_name: plant_name.to_string(),
                scientific_name: scientific_name.to_string(),
                probability,
            })
            .collect(),
        images: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identification::adapter::parse_body;

    #[test]
    fn test_rose_fixtures_agree() {
        let parsed = parse_body(ROSE_RESPONSE.as_bytes()).unwrap();
        assert_eq!(parsed, rose_result());
    }

    #[test]
    fn test_sample_handle_defaults() {
        let handle = sample_handle();
        assert_eq!(handle.preview.as_str(), "/photos/rose.jpg");
        assert_eq!(handle.payload.as_str(), "QUJD");
    }

    #[test]
    fn test_result_with_keeps_order() {
        let result = result_with(&[("A", "Aa", 0.1), ("B", "Bb", 0.9)]);
        assert_eq!(result.suggestions[0].plant_name, "A");
        assert_eq!(result.suggestions[1].plant_name, "B");
        assert!(result.images.is_empty());
    }
}
