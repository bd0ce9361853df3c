//! Shaping workflow state for display.
//!
//! Everything here is a pure function of its input. The view layer decides
//! how to draw; this module decides what the words and numbers are.

use crate::identification::IdentificationResult;
use crate::workflow::{ScanError, ScanErrorKind, ScanSession, ScanState};

/// Fields a result card needs
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayFields {
    pub name: String,
    pub scientific_name: String,
    /// Confidence as a percentage, rounded to two decimals
    pub percentage: f64,
    /// First representative image, if the service sent any
    pub image_url: Option<String>,
}

/// What to show for a successful identification
#[derive(Debug, Clone, PartialEq)]
pub enum Presentation {
    Match(DisplayFields),
    /// The service answered but had no candidates
    AbsentData,
}

/// Project the top suggestion of a result into display fields.
pub fn present(result: &IdentificationResult) -> Presentation {
    let Some(top) = result.top_suggestion() else {
        return Presentation::AbsentData;
    };

    Presentation::Match(DisplayFields {
        name: top.plant_name.clone(),
        scientific_name: top.scientific_name.clone(),
        percentage: display_percentage(top.probability),
        image_url: result.images.first().cloned(),
    })
}

/// `probability * 100`, rounded to two decimal places.
pub fn display_percentage(probability: f64) -> f64 {
    (probability * 10_000.0).round() / 100.0
}

/// User-facing text for a failed scan. Each kind reads differently.
pub fn error_message(error: &ScanError) -> String {
    match error.kind {
        ScanErrorKind::PermissionDenied => {
            "Photo access was refused. Allow access to your photos and try again.".to_string()
        }
        ScanErrorKind::NetworkUnreachable => {
            "Couldn't reach the identification service. Check your connection and try again."
                .to_string()
        }
        ScanErrorKind::ServiceError { status } => format!(
            "The identification service reported an error (HTTP {}). Please try again.",
            status
        ),
        ScanErrorKind::MalformedResponse => {
            "The identification service sent a response we couldn't understand.".to_string()
        }
    }
}

/// Text shown when the service found no candidates.
pub const NO_MATCH_MESSAGE: &str = "No match found for this photo.";

/// One-line status for the current session.
pub fn status_line(session: &ScanSession) -> String {
    match session.state() {
        ScanState::Idle => "Pick a photo to identify a plant.".to_string(),
        ScanState::Acquiring => "Waiting for a photo...".to_string(),
        ScanState::Uploading { image } => format!("Identifying {}...", image),
        ScanState::Succeeded { result, .. } => match present(result) {
            Presentation::Match(fields) => format!(
                "{} ({}) - {:.2}%",
                fields.name, fields.scientific_name, fields.percentage
            ),
            Presentation::AbsentData => NO_MATCH_MESSAGE.to_string(),
        },
        ScanState::Failed { error, .. } => error_message(error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::acquisition::ImageRef;
    use crate::identification::TransferFailure;
    use crate::test_utils::{result_with, rose_result};

    #[test]
    fn test_present_top_suggestion() {
        let presentation = present(&rose_result());
        assert_eq!(
            presentation,
            Presentation::Match(DisplayFields {
                name: "Rose".to_string(),
                scientific_name: "Rosa".to_string(),
                percentage: 92.0,
                image_url: Some("https://plant.id/media/images/rose.jpg".to_string()),
            })
        );
    }

    #[test]
    fn test_present_uses_first_not_highest() {
        let result = result_with(&[("Fern", "Polypodiopsida", 0.3), ("Rose", "Rosa", 0.9)]);
        let Presentation::Match(fields) = present(&result) else {
            panic!("expected a match");
        };
        assert_eq!(fields.name, "Fern");
    }

    #[test]
    fn test_present_empty_is_absent() {
        assert_eq!(present(&result_with(&[])), Presentation::AbsentData);
    }

    #[test]
    fn test_present_without_images_omits_url() {
        let Presentation::Match(fields) = present(&result_with(&[("Rose", "Rosa", 0.92)])) else {
            panic!("expected a match");
        };
        assert!(fields.image_url.is_none());
    }

    #[test]
    fn test_percentage_rounding() {
        assert!((display_percentage(0.8765) - 87.65).abs() < 1e-9);
        assert_eq!(format!("{:.2}", display_percentage(0.8765)), "87.65");
        assert_eq!(format!("{:.2}", display_percentage(0.92)), "92.00");
        assert_eq!(format!("{:.2}", display_percentage(0.123456)), "12.35");
        assert_eq!(display_percentage(1.0), 100.0);
        assert_eq!(display_percentage(0.0), 0.0);
    }

    #[test]
    fn test_error_messages_are_distinct() {
        let errors: Vec<ScanError> = vec![
            ScanError::permission_denied(),
            TransferFailure::NetworkUnreachable("down".into()).into(),
            TransferFailure::ServiceError { status: 500 }.into(),
            TransferFailure::MalformedResponse("eof".into()).into(),
        ];
        let mut messages: Vec<String> = errors.iter().map(error_message).collect();
        messages.push(NO_MATCH_MESSAGE.to_string());

        let mut unique = messages.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), messages.len());
        assert!(messages.iter().all(|m| !m.is_empty()));
        assert!(messages[2].contains("500"));
    }

    #[test]
    fn test_status_lines() {
        let image = ImageRef::new("/photos/rose.jpg");

        let uploading = ScanSession::new(1, ScanState::Uploading { image: image.clone() });
        assert!(status_line(&uploading).contains("/photos/rose.jpg"));

        let matched = ScanSession::new(
            1,
            ScanState::Succeeded {
                image: image.clone(),
                result: rose_result(),
            },
        );
        assert_eq!(status_line(&matched), "Rose (Rosa) - 92.00%");

        let empty = ScanSession::new(
            1,
            ScanState::Succeeded {
                image,
                result: result_with(&[]),
            },
        );
        assert_eq!(status_line(&empty), NO_MATCH_MESSAGE);
    }
}
