//! Interactive source backed by the native file dialog.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::encode::{IMAGE_EXTENSIONS, acquire_file};
use super::{AcquisitionOutcome, ImageSource};

const REFUSED_NOTICE: &str = "You've refused to allow this app to access your photos!";

/// Opens the system file picker on the user's pictures folder.
///
/// The desktop picker has no crop step; the quality hint is applied when
/// the chosen file is re-encoded.
pub struct DialogImageSource {
    quality: u8,
    library: Option<PathBuf>,
}

impl DialogImageSource {
    pub fn new(quality: u8) -> Self {
        Self {
            quality,
            library: dirs::picture_dir(),
        }
    }

    /// Start the picker somewhere other than the pictures folder.
    pub fn with_library(mut self, library: impl Into<PathBuf>) -> Self {
        self.library = Some(library.into());
        self
    }

    async fn show_refusal_notice(&self) {
        tracing::warn!("{}", REFUSED_NOTICE);
        rfd::AsyncMessageDialog::new()
            .set_level(rfd::MessageLevel::Warning)
            .set_title("Photo access refused")
            .set_description(REFUSED_NOTICE)
            .set_buttons(rfd::MessageButtons::Ok)
            .show()
            .await;
    }
}

/// Whether the OS lets us list the photo library.
///
/// A library folder that doesn't exist is not a refusal; the picker just
/// opens in its default location.
pub(crate) fn library_access_granted(library: &Path) -> bool {
    match std::fs::read_dir(library) {
        Ok(_) => true,
        Err(e) => e.kind() != std::io::ErrorKind::PermissionDenied,
    }
}

#[async_trait]
impl ImageSource for DialogImageSource {
    async fn request_image(&self) -> AcquisitionOutcome {
        if let Some(library) = &self.library
            && !library_access_granted(library)
        {
            self.show_refusal_notice().await;
            return AcquisitionOutcome::PermissionDenied;
        }

        let mut dialog = rfd::AsyncFileDialog::new()
            .set_title("Choose a plant photo")
            .add_filter("Images", IMAGE_EXTENSIONS);
        if let Some(library) = self.library.as_deref().filter(|p| p.is_dir()) {
            dialog = dialog.set_directory(library);
        }

        let Some(picked) = dialog.pick_file().await else {
            tracing::info!("Image picking was cancelled");
            return AcquisitionOutcome::Cancelled;
        };

        let outcome = acquire_file(picked.path().to_path_buf(), self.quality).await;
        if outcome == AcquisitionOutcome::PermissionDenied {
            self.show_refusal_notice().await;
        }
        outcome
    }
}
