//! Remote media retrieval with bounded wait
//!
//! Fetch failures surface as typed [`FetchError`] outcomes; the
//! orchestrator degrades them to a fallback category instead of aborting
//! the submission.

use super::{FetchError, MediaFetcher};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

const USER_AGENT: &str = concat!("CIRS/", env!("CARGO_PKG_VERSION"));

/// Media fetcher backed by a shared reqwest client
///
/// The per-call timeout bounds the whole request, connect through body.
/// No retries: a flaky media host must not stall issue intake.
pub struct HttpMediaFetcher {
    client: reqwest::Client,
}

impl HttpMediaFetcher {
    pub fn new() -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| FetchError::Network {
                url: String::new(),
                reason: e.to_string(),
            })?;

        Ok(Self { client })
    }
}

#[async_trait]
impl MediaFetcher for HttpMediaFetcher {
    async fn fetch(&self, url: &str, timeout: Duration) -> Result<Vec<u8>, FetchError> {
        debug!(url = %url, timeout_secs = timeout.as_secs(), "Fetching media payload");

        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| FetchError::Network {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await.map_err(|e| FetchError::Network {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        debug!(url = %url, size_bytes = bytes.len(), "Media payload fetched");

        Ok(bytes.to_vec())
    }
}
