//! The scan state machine.
//!
//! [`ScanController::update`] is pure: it applies one event to the session
//! and says what long-running work to start next. It never awaits. The
//! runner performs the [`Effect`] and feeds its completion back in as
//! another event carrying the generation it was started for.

use tracing::{debug, info, warn};

use super::session::{ScanError, ScanPhase, ScanSession, ScanState};
use crate::acquisition::{AcquisitionOutcome, EncodedImage};
use crate::identification::{IdentificationResult, TransferFailure};

/// Inputs to the state machine
#[derive(Debug)]
pub enum ScanEvent {
    /// User asked for a scan
    StartScan,
    /// User asked to clear everything
    Reset,
    AcquisitionFinished {
        generation: u64,
        outcome: AcquisitionOutcome,
    },
    TransferFinished {
        generation: u64,
        outcome: Result<IdentificationResult, TransferFailure>,
    },
}

/// Work the runner must start after a transition
#[derive(Debug, PartialEq, Eq)]
pub enum Effect {
    Nothing,
    Acquire { generation: u64 },
    Transfer { generation: u64, payload: EncodedImage },
}

/// Sole owner of the [`ScanSession`].
#[derive(Debug, Default)]
pub struct ScanController {
    session: ScanSession,
    /// Generation of the image request still outstanding, if any. Survives
    /// Reset: the source only ever serves one request at a time.
    pending_acquisition: Option<u64>,
}

impl ScanController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> &ScanSession {
        &self.session
    }

    /// Apply one event.
    ///
    /// Returns `None` when the event was ignored (re-entrant StartScan,
    /// stale completion), otherwise the effect of the transition.
    pub fn update(&mut self, event: ScanEvent) -> Option<Effect> {
        match event {
            ScanEvent::StartScan => self.start_scan(),
            ScanEvent::Reset => Some(self.reset()),
            ScanEvent::AcquisitionFinished {
                generation,
                outcome,
            } => self.acquisition_finished(generation, outcome),
            ScanEvent::TransferFinished {
                generation,
                outcome,
            } => self.transfer_finished(generation, outcome),
        }
    }

    fn start_scan(&mut self) -> Option<Effect> {
        if self.session.is_busy() {
            debug!(
                "Scan {} already in progress, ignoring StartScan",
                self.session.generation()
            );
            return None;
        }

        // A finished attempt is discarded before the next one begins
        let generation = self.session.generation() + 1;
        self.session = ScanSession::new(generation, ScanState::Acquiring);
        info!("Scan {} started", generation);

        if let Some(pending) = self.pending_acquisition {
            debug!(
                "Scan {} waits for the image request of scan {} to finish",
                generation, pending
            );
            return Some(Effect::Nothing);
        }
        self.pending_acquisition = Some(generation);
        Some(Effect::Acquire { generation })
    }

    fn reset(&mut self) -> Effect {
        let generation = self.session.generation() + 1;
        if self.session.is_busy() {
            info!(
                "Reset while scan {} is in flight, its result will be discarded",
                self.session.generation()
            );
        }
        self.session = ScanSession::new(generation, ScanState::Idle);
        Effect::Nothing
    }

    fn is_current(&self, generation: u64, phase: ScanPhase) -> bool {
        if generation == self.session.generation() && self.session.phase() == phase {
            return true;
        }
        debug!(
            "Discarding stale completion for scan {} (current scan {}, {:?})",
            generation,
            self.session.generation(),
            self.session.phase()
        );
        false
    }

    fn acquisition_finished(
        &mut self,
        generation: u64,
        outcome: AcquisitionOutcome,
    ) -> Option<Effect> {
        if self.pending_acquisition == Some(generation) {
            self.pending_acquisition = None;
        }
        if !self.is_current(generation, ScanPhase::Acquiring) {
            return self.resume_deferred_acquisition();
        }

        match outcome {
            AcquisitionOutcome::Cancelled => {
                info!("Scan {} cancelled during acquisition", generation);
                self.session.set_state(ScanState::Idle);
                Some(Effect::Nothing)
            }
            AcquisitionOutcome::PermissionDenied => {
                warn!("Scan {} failed: photo access refused", generation);
                self.session.set_state(ScanState::Failed {
                    image: None,
                    error: ScanError::permission_denied(),
                });
                Some(Effect::Nothing)
            }
            AcquisitionOutcome::Acquired(handle) => {
                info!("Scan {} uploading {}", generation, handle.preview);
                self.session.set_state(ScanState::Uploading {
                    image: handle.preview,
                });
                Some(Effect::Transfer {
                    generation,
                    payload: handle.payload,
                })
            }
        }
    }

    /// Issue the request a StartScan had to hold back while an abandoned
    /// one was still open.
    fn resume_deferred_acquisition(&mut self) -> Option<Effect> {
        if self.pending_acquisition.is_some() || self.session.phase() != ScanPhase::Acquiring {
            return None;
        }
        let generation = self.session.generation();
        debug!("Scan {} requesting its image now", generation);
        self.pending_acquisition = Some(generation);
        Some(Effect::Acquire { generation })
    }

    fn transfer_finished(
        &mut self,
        generation: u64,
        outcome: Result<IdentificationResult, TransferFailure>,
    ) -> Option<Effect> {
        if !self.is_current(generation, ScanPhase::Uploading) {
            return None;
        }
        let image = self.session.acquired_image().cloned()?;

        let state = match outcome {
            Ok(result) => {
                info!(
                    "Scan {} succeeded with {} suggestion(s)",
                    generation,
                    result.suggestions.len()
                );
                ScanState::Succeeded { image, result }
            }
            Err(failure) => {
                warn!("Scan {} failed: {}", generation, failure);
                ScanState::Failed {
                    image: Some(image),
                    error: failure.into(),
                }
            }
        };
        self.session.set_state(state);
        Some(Effect::Nothing)
    }
}
