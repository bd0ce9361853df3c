//! Image acquisition - obtaining a photo from the user's device.
//!
//! # Architecture
//!
//! - [`ImageSource`] is the port the scan workflow talks to. A request
//!   either yields an [`ImageHandle`], or the user cancelled, or the
//!   platform refused access to the photo library.
//! - [`DialogImageSource`] opens the native file dialog.
//! - [`PathImageSource`] serves a path chosen up front (command line).
//! - [`encode`] holds the shared "read, re-encode as JPEG, base64" step.
//!
//! Refusals are not errors from the caller's point of view: a source shows
//! (or logs) its own notice and returns [`AcquisitionOutcome::PermissionDenied`].

mod dialog;
pub mod encode;
mod path;

use std::fmt;

use async_trait::async_trait;
use serde::Serialize;

pub use dialog::DialogImageSource;
pub use path::PathImageSource;

/// Reference to the acquired image that a view can display (path or URI).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ImageRef(String);

impl ImageRef {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Base64-encoded JPEG bytes, guaranteed non-empty.
#[derive(Clone, PartialEq, Eq)]
pub struct EncodedImage(String);

impl EncodedImage {
    /// Wrap an encoded payload. Returns `None` for an empty payload, which
    /// can never be identified.
    pub fn new(base64: impl Into<String>) -> Option<Self> {
        let base64 = base64.into();
        (!base64.is_empty()).then_some(Self(base64))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The payload as the `data:` URI the identification endpoint expects.
    pub fn to_data_uri(&self) -> String {
        format!("data:image/jpeg;base64,{}", self.0)
    }
}

// Payloads run to hundreds of kilobytes; keep them out of logs.
impl fmt::Debug for EncodedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EncodedImage({} bytes)", self.0.len())
    }
}

/// A successfully acquired image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageHandle {
    /// Local reference for an immediate preview
    pub preview: ImageRef,
    /// Payload for the transfer
    pub payload: EncodedImage,
}

/// Result of one acquisition request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AcquisitionOutcome {
    Acquired(ImageHandle),
    /// User backed out, or the pick produced no usable bytes
    Cancelled,
    /// The platform refused access to the photo library
    PermissionDenied,
}

/// A device capability that can hand over one photo.
///
/// Implementations perform their own permission check and notice. Callers
/// must not issue a second request while one is outstanding.
#[async_trait]
pub trait ImageSource: Send + Sync {
    async fn request_image(&self) -> AcquisitionOutcome;
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_payload_is_rejected() {
        assert!(EncodedImage::new("").is_none());
        assert!(EncodedImage::new("QUJD").is_some());
    }

    #[test]
    fn test_data_uri() {
        let payload = EncodedImage::new("QUJD").unwrap();
        assert_eq!(payload.to_data_uri(), "data:image/jpeg;base64,QUJD");
    }

    #[test]
    fn test_debug_hides_payload() {
        let payload = EncodedImage::new("QUJDREVG").unwrap();
        let debug = format!("{:?}", payload);
        assert!(!debug.contains("QUJDREVG"));
        assert!(debug.contains("8 bytes"));
    }
}
