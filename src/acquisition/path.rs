//! Non-interactive source: the photo was chosen on the command line.

use std::path::PathBuf;

use async_trait::async_trait;

use super::encode::{acquire_file, is_image_file};
use super::{AcquisitionOutcome, ImageSource};

/// Serves one fixed file. Every request re-reads it, so a repeated scan
/// sees edits made in between.
pub struct PathImageSource {
    path: PathBuf,
    quality: u8,
}

impl PathImageSource {
    pub fn new(path: impl Into<PathBuf>, quality: u8) -> Self {
        Self {
            path: path.into(),
            quality,
        }
    }
}

#[async_trait]
impl ImageSource for PathImageSource {
    async fn request_image(&self) -> AcquisitionOutcome {
        if !is_image_file(&self.path) {
            tracing::debug!("{:?} has no image extension, trying to decode anyway", self.path);
        }

        let outcome = acquire_file(self.path.clone(), self.quality).await;
        if outcome == AcquisitionOutcome::PermissionDenied {
            tracing::warn!(
                "Access to {:?} was refused. Check the file permissions and try again.",
                self.path
            );
        }
        outcome
    }
}
