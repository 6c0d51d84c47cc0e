//! Subsonic REST client.
//!
//! Issues exactly one signed `GET {base_url}/rest/{endpoint}` per call and
//! unwraps the `subsonic-response` envelope. No retries.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::auth::{Credentials, SignedRequest};
use super::wire::{
    AlbumListPayload, AlbumPayload, ArtistsPayload, Envelope, EnvelopeError, RandomSongsPayload,
    ScanStatusPayload,
};
use crate::telemetry;
use crate::traits::LibrarySource;
use crate::version;
use crate::{HuginnError, Result};

/// Default per-call upstream timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for a Subsonic-compatible server (Navidrome, Airsonic, ...).
#[derive(Clone)]
pub struct SubsonicClient {
    credentials: Credentials,
    http: Client,
    base_url: String,
}

impl SubsonicClient {
    /// Create a client with the default 30 second timeout.
    pub fn new(base_url: impl Into<String>, credentials: Credentials) -> Result<Self> {
        Self::with_timeout(base_url, credentials, DEFAULT_TIMEOUT)
    }

    /// Create a client with a custom per-call timeout.
    pub fn with_timeout(
        base_url: impl Into<String>,
        credentials: Credentials,
        timeout: Duration,
    ) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(version::user_agent())
            .build()
            .map_err(|e| HuginnError::Configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            credentials,
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Upstream base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}/rest/{}", self.base_url, endpoint)
    }

    /// Call an endpoint and decode the envelope payload into `T`.
    ///
    /// # Arguments
    /// * `endpoint` - Subsonic method name, e.g. `getArtists`
    /// * `extra` - Endpoint parameters; identity parameters cannot be overridden
    pub async fn call<T: DeserializeOwned>(&self, endpoint: &str, extra: &[(&str, &str)]) -> Result<T> {
        let signed = SignedRequest::new(endpoint, extra, &self.credentials);
        let result = self.send(&signed).await;

        let status = if result.is_ok() { "ok" } else { "error" };
        metrics::counter!(
            telemetry::UPSTREAM_REQUESTS_TOTAL,
            "endpoint" => endpoint.to_string(),
            "status" => status
        )
        .increment(1);

        result
    }

    async fn send<T: DeserializeOwned>(&self, signed: &SignedRequest) -> Result<T> {
        let response = self
            .http
            .get(self.endpoint_url(&signed.endpoint))
            .query(signed.query())
            .send()
            .await
            .map_err(|e| HuginnError::Http(e.to_string()))?;

        Self::handle_response_errors(&response, &signed.endpoint)?;

        let body = response
            .bytes()
            .await
            .map_err(|e| HuginnError::Http(e.to_string()))?;
        let envelope: Envelope = serde_json::from_slice(&body)?;

        let payload = envelope.response.ok_or_else(|| HuginnError::Upstream {
            code: 0,
            message: "response has no subsonic-response envelope".to_string(),
        })?;

        if payload.get("status").and_then(Value::as_str) == Some("failed") {
            let error = payload
                .get("error")
                .cloned()
                .and_then(|e| serde_json::from_value::<EnvelopeError>(e).ok())
                .unwrap_or_default();
            return Err(HuginnError::Upstream {
                code: error.code,
                message: error.message,
            });
        }

        Ok(serde_json::from_value(Value::Object(payload))?)
    }

    /// Check response status and map to appropriate error.
    fn handle_response_errors(response: &reqwest::Response, endpoint: &str) -> Result<()> {
        let status = response.status();

        if status.is_success() {
            return Ok(());
        }

        Err(HuginnError::Api {
            status: status.as_u16(),
            message: format!("{endpoint} returned {status}"),
        })
    }
}

// ============================================================================
// LibrarySource Implementation
// ============================================================================

#[async_trait]
impl LibrarySource for SubsonicClient {
    fn name(&self) -> &str {
        "subsonic"
    }

    async fn artists(&self) -> Result<ArtistsPayload> {
        self.call("getArtists", &[]).await
    }

    async fn album_list(&self, size: usize) -> Result<AlbumListPayload> {
        let size = size.to_string();
        self.call(
            "getAlbumList2",
            &[("type", "alphabeticalByName"), ("size", &size)],
        )
        .await
    }

    async fn random_songs(&self, size: usize) -> Result<RandomSongsPayload> {
        let size = size.to_string();
        self.call("getRandomSongs", &[("size", &size)]).await
    }

    async fn album(&self, id: &str) -> Result<AlbumPayload> {
        self.call("getAlbum", &[("id", id)]).await
    }

    async fn scan_status(&self) -> Result<ScanStatusPayload> {
        self.call("getScanStatus", &[]).await
    }
}
