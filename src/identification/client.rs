//! Identification HTTP client
//!
//! One POST per photo, no retries. The service is a black box to us: we
//! send the photo as a `data:` URI inside a JSON body and map whatever
//! comes back onto [`TransferFailure`] or a validated result.
//!
//! ## Failure mapping
//! - request never got a response (connect error, timeout) → `NetworkUnreachable`
//! - non-2xx status → `ServiceError { status }`
//! - 2xx with a body that doesn't match the DTOs → `MalformedResponse`

use super::{adapter, dto};
use crate::acquisition::EncodedImage;
use crate::config::IdentificationSettings;
use crate::identification::domain::{IdentificationResult, TransferFailure};

/// Plant identification API client
pub struct PlantIdClient {
    api_key: String,
    http_client: reqwest::Client,
    endpoint: String,
}

impl PlantIdClient {
    /// Create a new client from validated settings
    ///
    /// The client is configured to:
    /// - Give up on a transfer after `settings.timeout`
    /// - Accept gzip-compressed responses
    /// - Send User-Agent header identifying the application
    pub fn new(settings: &IdentificationSettings) -> crate::error::Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .gzip(true)
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()?;

        Ok(Self {
            api_key: settings.api_key.clone(),
            http_client,
            endpoint: settings.endpoint.clone(),
        })
    }

    /// Send one photo for identification
    pub async fn identify(
        &self,
        image: &EncodedImage,
    ) -> Result<IdentificationResult, TransferFailure> {
        let body = dto::IdentifyRequest {
            images: vec![image.to_data_uri()],
        };

        tracing::info!(
            "Uploading {} bytes to {}",
            image.as_str().len(),
            self.endpoint
        );

        // .json() also sets Content-Type: application/json
        let response = self
            .http_client
            .post(&self.endpoint)
            .header("Api-Key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!("Identification request failed: {}", e);
                TransferFailure::NetworkUnreachable(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(
                "Identification service returned HTTP {} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            );
            return Err(TransferFailure::ServiceError {
                status: status.as_u16(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| TransferFailure::NetworkUnreachable(e.to_string()))?;

        let result = adapter::parse_body(&bytes)?;
        tracing::info!(
            "Identification returned {} suggestion(s)",
            result.suggestions.len()
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::test_utils::{ROSE_RESPONSE, sample_payload};

    fn settings(endpoint: String, timeout: Duration) -> IdentificationSettings {
        IdentificationSettings {
            endpoint,
            api_key: "test-key".to_string(),
            timeout,
        }
    }

    fn client_for(server: &mockito::ServerGuard) -> PlantIdClient {
        PlantIdClient::new(&settings(
            format!("{}/v2/identify", server.url()),
            Duration::from_secs(5),
        ))
        .unwrap()
    }

    #[test]
    fn test_client_creation() {
        let client = PlantIdClient::new(&settings(
            "https://plants.example.com/v2/identify".to_string(),
            Duration::from_secs(30),
        ))
        .unwrap();
        assert_eq!(client.api_key, "test-key");
        assert_eq!(client.endpoint, "https://plants.example.com/v2/identify");
    }

    #[tokio::test]
    async fn test_identify_sends_key_and_data_uri() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v2/identify")
            .match_header("api-key", "test-key")
            .match_header("content-type", "application/json")
            .match_body(mockito::Matcher::Json(serde_json::json!({
                "images": ["data:image/jpeg;base64,QUJD"]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(ROSE_RESPONSE)
            .create_async()
            .await;

        let client = client_for(&server);
        let result = client.identify(&sample_payload()).await.unwrap();

        assert_eq!(result.suggestions[0].plant_name, "Rose");
        assert_eq!(result.suggestions[0].scientific_name, "Rosa");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_server_error_maps_status() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v2/identify")
            .with_status(500)
            .with_body("internal error")
            .expect(1)
            .create_async()
            .await;

        let client = client_for(&server);
        let err = client.identify(&sample_payload()).await.unwrap_err();

        assert_eq!(err, TransferFailure::ServiceError { status: 500 });
        // exactly one call, no retry
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_unauthorized_maps_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v2/identify")
            .with_status(401)
            .create_async()
            .await;

        let client = client_for(&server);
        let err = client.identify(&sample_payload()).await.unwrap_err();
        assert_eq!(err, TransferFailure::ServiceError { status: 401 });
    }

    #[tokio::test]
    async fn test_wrong_shape_is_malformed() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v2/identify")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error": "quota exceeded"}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        let err = client.identify(&sample_payload()).await.unwrap_err();
        assert!(matches!(err, TransferFailure::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_empty_suggestions_is_success() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v2/identify")
            .with_status(200)
            .with_body(r#"{"suggestions": [], "images": []}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        let result = client.identify(&sample_payload()).await.unwrap();
        assert!(result.suggestions.is_empty());
    }

    #[tokio::test]
    async fn test_connection_refused_is_unreachable() {
        // Grab a free port, then close it so nothing is listening
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };

        let client = PlantIdClient::new(&settings(
            format!("http://127.0.0.1:{}/v2/identify", port),
            Duration::from_secs(5),
        ))
        .unwrap();

        let err = client.identify(&sample_payload()).await.unwrap_err();
        assert!(matches!(err, TransferFailure::NetworkUnreachable(_)));
    }

    #[tokio::test]
    async fn test_timeout_is_unreachable() {
        // Listener that never accepts: the kernel completes the handshake
        // but no response ever arrives.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();

        let client = PlantIdClient::new(&settings(
            format!("http://127.0.0.1:{}/v2/identify", port),
            Duration::from_millis(300),
        ))
        .unwrap();

        let err = client.identify(&sample_payload()).await.unwrap_err();
        assert!(matches!(err, TransferFailure::NetworkUnreachable(_)));
        drop(listener);
    }
}
