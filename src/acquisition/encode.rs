//! Turning a picked file into an uploadable payload.
//!
//! The picker on a phone hands back a re-compressed JPEG plus its base64
//! text. On the desktop we do the same step ourselves: decode whatever image
//! format was picked, re-encode as JPEG at the configured quality and
//! base64 it. Anything that can't be decoded produces no payload.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::codecs::jpeg::JpegEncoder;

use super::{AcquisitionOutcome, EncodedImage, ImageHandle, ImageRef};
use crate::error::{Error, Result, ResultExt};

/// Extensions offered by the pickers.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "gif", "bmp"];

/// Re-encode raw image bytes as JPEG at `quality` (1-100).
pub fn reencode_jpeg(bytes: &[u8], quality: u8) -> Result<Vec<u8>> {
    let decoded = image::load_from_memory(bytes)?;
    // JPEG has no alpha channel
    let rgb = decoded.to_rgb8();

    let mut out = Cursor::new(Vec::new());
    let mut encoder = JpegEncoder::new_with_quality(&mut out, quality.clamp(1, 100));
    encoder.encode_image(&rgb)?;
    Ok(out.into_inner())
}

/// Read, re-encode and base64 a file.
///
/// `Ok(None)` means the file was readable but produced no payload.
pub fn encode_file(path: &Path, quality: u8) -> Result<Option<EncodedImage>> {
    let bytes = std::fs::read(path).map_err(|e| read_error(path, e))?;
    if bytes.is_empty() {
        return Ok(None);
    }

    let jpeg = reencode_jpeg(&bytes, quality)
        .with_context(format!("encoding {}", path.display()))?;
    Ok(EncodedImage::new(STANDARD.encode(&jpeg)))
}

/// A missing file becomes `NotFound`; every other kind, permission
/// refusals included, is kept as I/O.
fn read_error(path: &Path, error: std::io::Error) -> Error {
    if error.kind() == std::io::ErrorKind::NotFound {
        Error::not_found(path)
    } else {
        Error::Io(error).context(format!("reading {}", path.display()))
    }
}

/// Acquire the image at `path` off the async runtime.
///
/// A missing or undecodable file degrades to `Cancelled`; an OS refusal
/// becomes `PermissionDenied`. Callers are responsible for the notice.
pub async fn acquire_file(path: PathBuf, quality: u8) -> AcquisitionOutcome {
    let task_path = path.clone();
    let encoded = tokio::task::spawn_blocking(move || encode_file(&task_path, quality))
        .await
        .map_err(|e| Error::TaskJoin(e.to_string()))
        .and_then(|r| r);

    match encoded {
        Ok(Some(payload)) => {
            tracing::info!(
                "Acquired {:?} ({} bytes encoded)",
                path,
                payload.as_str().len()
            );
            AcquisitionOutcome::Acquired(ImageHandle {
                preview: ImageRef::new(path.display().to_string()),
                payload,
            })
        }
        Ok(None) => {
            tracing::warn!("{:?} produced no image data, treating as cancelled", path);
            AcquisitionOutcome::Cancelled
        }
        Err(e) if e.is_permission_denied() => AcquisitionOutcome::PermissionDenied,
        Err(e) => {
            tracing::warn!("Could not use {:?}: {}", path, e);
            AcquisitionOutcome::Cancelled
        }
    }
}

/// Whether a path carries one of the accepted image extensions.
pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_lowercase())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}
