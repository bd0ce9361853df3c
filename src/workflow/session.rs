//! Scan session state.
//!
//! The session is an enum so each phase carries exactly the fields that may
//! be set in it. Accessors give the flat view (image / result / error) the
//! presentation layer wants.

use serde::Serialize;

use crate::acquisition::ImageRef;
use crate::identification::{IdentificationResult, TransferFailure};

/// Which step of the scan we're in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanPhase {
    Idle,
    Acquiring,
    Uploading,
    Succeeded,
    Failed,
}

/// Failure kinds a session can end in.
///
/// `Cancelled` is absent on purpose (it returns to Idle) and "no match" is
/// a presentation concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanErrorKind {
    PermissionDenied,
    NetworkUnreachable,
    ServiceError { status: u16 },
    MalformedResponse,
}

/// Error recorded in a failed session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanError {
    pub kind: ScanErrorKind,
    /// Technical detail, for logs and `--json` output
    pub message: Option<String>,
}

impl ScanError {
    pub fn permission_denied() -> Self {
        Self {
            kind: ScanErrorKind::PermissionDenied,
            message: None,
        }
    }
}

impl From<TransferFailure> for ScanError {
    fn from(failure: TransferFailure) -> Self {
        let message = Some(failure.to_string());
        let kind = match failure {
            TransferFailure::NetworkUnreachable(_) => ScanErrorKind::NetworkUnreachable,
            TransferFailure::ServiceError { status } => ScanErrorKind::ServiceError { status },
            TransferFailure::MalformedResponse(_) => ScanErrorKind::MalformedResponse,
        };
        Self { kind, message }
    }
}

/// Phase plus the data that phase owns
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ScanState {
    #[default]
    Idle,
    Acquiring,
    Uploading {
        image: ImageRef,
    },
    Succeeded {
        image: ImageRef,
        result: IdentificationResult,
    },
    Failed {
        /// `None` when acquisition itself was refused
        image: Option<ImageRef>,
        error: ScanError,
    },
}

/// One scan attempt, tagged with its generation.
///
/// The generation goes up on every accepted StartScan and every Reset, so
/// completions from an abandoned attempt can be told apart.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ScanSession {
    generation: u64,
    #[serde(flatten)]
    state: ScanState,
}

impl ScanSession {
    pub(crate) fn new(generation: u64, state: ScanState) -> Self {
        Self { generation, state }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn state(&self) -> &ScanState {
        &self.state
    }

    pub(crate) fn set_state(&mut self, state: ScanState) {
        self.state = state;
    }

    pub fn phase(&self) -> ScanPhase {
        match self.state {
            ScanState::Idle => ScanPhase::Idle,
            ScanState::Acquiring => ScanPhase::Acquiring,
            ScanState::Uploading { .. } => ScanPhase::Uploading,
            ScanState::Succeeded { .. } => ScanPhase::Succeeded,
            ScanState::Failed { .. } => ScanPhase::Failed,
        }
    }

    /// The acquired image, once acquisition has handed one over.
    pub fn acquired_image(&self) -> Option<&ImageRef> {
        match &self.state {
            ScanState::Uploading { image } | ScanState::Succeeded { image, .. } => Some(image),
            ScanState::Failed { image, .. } => image.as_ref(),
            ScanState::Idle | ScanState::Acquiring => None,
        }
    }

    pub fn result(&self) -> Option<&IdentificationResult> {
        match &self.state {
            ScanState::Succeeded { result, .. } => Some(result),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ScanError> {
        match &self.state {
            ScanState::Failed { error, .. } => Some(error),
            _ => None,
        }
    }

    /// An acquisition or transfer is in flight.
    pub fn is_busy(&self) -> bool {
        matches!(self.phase(), ScanPhase::Acquiring | ScanPhase::Uploading)
    }

    /// Nothing in flight; a new scan may start.
    pub fn is_settled(&self) -> bool {
        !self.is_busy()
    }

    /// Verify the field-level invariants through the public accessors.
    pub fn check_invariants(&self) -> Result<(), String> {
        let phase = self.phase();

        match (phase, self.result().is_some(), self.error().is_some()) {
            (ScanPhase::Succeeded, true, false) | (ScanPhase::Failed, false, true) => {}
            (ScanPhase::Idle | ScanPhase::Acquiring | ScanPhase::Uploading, false, false) => {}
            (phase, result, error) => {
                return Err(format!(
                    "{:?}: result set = {}, error set = {}",
                    phase, result, error
                ));
            }
        }

        let image_expected = match phase {
            ScanPhase::Idle | ScanPhase::Acquiring => false,
            ScanPhase::Uploading | ScanPhase::Succeeded => true,
            // Only a transfer failure happens after an image was acquired
            ScanPhase::Failed => self
                .error()
                .is_some_and(|e| e.kind != ScanErrorKind::PermissionDenied),
        };
        if self.acquired_image().is_some() != image_expected {
            return Err(format!(
                "{:?}: acquired image set = {}, expected {}",
                phase,
                self.acquired_image().is_some(),
                image_expected
            ));
        }

        Ok(())
    }
}
