//! Plant identification - sends a photo to the remote service and
//! interprets the answer.
//!
//! # Architecture
//!
//! - **Domain models** (`domain.rs`) - what the rest of the app sees
//! - **API DTOs** (`dto.rs`) - exact request/response shapes
//! - **Adapter** (`adapter.rs`) - DTO → domain conversion and validation
//! - **Client** (`client.rs`) - the single HTTP transfer
//! - **Traits** (`traits.rs`) - seam for mocking the service in tests
//!
//! # Usage
//!
//! ```ignore
//! let settings = config::load().identification_settings()?;
//! let client = PlantIdClient::new(&settings)?;
//! let result = client.identify(&handle.payload).await?;
//! ```

pub(crate) mod adapter;
mod client;
pub mod domain;
pub mod dto;
pub mod traits;

pub use client::PlantIdClient;
pub use domain::{IdentificationResult, Suggestion, TransferFailure};
pub use traits::IdentificationApi;
