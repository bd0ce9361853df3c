//! Trait definition for the identification service.
//!
//! This trait enables dependency injection and mocking for tests.
//! Production code uses [`PlantIdClient`](super::PlantIdClient), while
//! workflow tests substitute [`mocks::MockIdentification`].

use async_trait::async_trait;

use super::domain::{IdentificationResult, TransferFailure};
use crate::acquisition::EncodedImage;

/// Trait for the remote identification call.
///
/// One invocation means exactly one outbound transfer.
#[async_trait]
pub trait IdentificationApi: Send + Sync {
    async fn identify(
        &self,
        image: &EncodedImage,
    ) -> Result<IdentificationResult, TransferFailure>;
}

#[async_trait]
impl IdentificationApi for super::client::PlantIdClient {
    async fn identify(
        &self,
        image: &EncodedImage,
    ) -> Result<IdentificationResult, TransferFailure> {
        self.identify(image).await
    }
}

/// Mock identification client for testing.
#[cfg(test)]
pub mod mocks {
    use std::collections::VecDeque;
    use std::sync::Arc;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use tokio::sync::Notify;

    use super::*;

    /// Returns queued responses in order; an exhausted queue answers with
    /// an empty result.
    pub struct MockIdentification {
        responses: Mutex<VecDeque<Result<IdentificationResult, TransferFailure>>>,
        calls: AtomicUsize,
        gate: Option<Arc<Notify>>,
    }

    impl MockIdentification {
        pub fn with_responses(
            responses: Vec<Result<IdentificationResult, TransferFailure>>,
        ) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                calls: AtomicUsize::new(0),
                gate: None,
            }
        }

        pub fn succeeding(result: IdentificationResult) -> Self {
            Self::with_responses(vec![Ok(result)])
        }

        pub fn failing(failure: TransferFailure) -> Self {
            Self::with_responses(vec![Err(failure)])
        }

        /// Each call waits for [`MockIdentification::release`].
        pub fn gated(mut self) -> Self {
            self.gate = Some(Arc::new(Notify::new()));
            self
        }

        pub fn release(&self) {
            if let Some(gate) = &self.gate {
                gate.notify_one();
            }
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl IdentificationApi for MockIdentification {
        async fn identify(
            &self,
            _image: &EncodedImage,
        ) -> Result<IdentificationResult, TransferFailure> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(IdentificationResult::default()))
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::test_utils::{rose_result, sample_payload};

        #[tokio::test]
        async fn test_mock_success() {
            let mock = MockIdentification::succeeding(rose_result());
            let result = mock.identify(&sample_payload()).await.unwrap();
            assert_eq!(result.suggestions[0].plant_name, "Rose");
            assert_eq!(mock.calls(), 1);
        }

        #[tokio::test]
        async fn test_mock_failure() {
            let mock = MockIdentification::failing(TransferFailure::ServiceError { status: 500 });
            let result = mock.identify(&sample_payload()).await;
            assert!(matches!(
                result,
                Err(TransferFailure::ServiceError { status: 500 })
            ));
        }
    }
}
