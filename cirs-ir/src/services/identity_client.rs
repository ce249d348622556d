//! Identity provider client
//!
//! The identity provider is an external collaborator: given a bearer
//! token it resolves the subject identity or rejects. Token issuance and
//! session management live entirely on the provider's side.

use async_trait::async_trait;
use cirs_common::Subject;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

const USER_AGENT: &str = concat!("CIRS/", env!("CARGO_PKG_VERSION"));
const VERIFY_TIMEOUT: Duration = Duration::from_secs(10);

/// Token verification errors
#[derive(Debug, Error)]
pub enum AuthError {
    /// Token rejected by the identity provider
    #[error("Token rejected by identity provider")]
    Rejected,

    /// Provider unreachable or returned an unexpected response
    #[error("Identity provider error: {0}")]
    Provider(String),
}

/// Resolves a bearer token to a subject identity
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<Subject, AuthError>;
}

/// HTTP client for the identity provider's user-info endpoint
pub struct IdentityClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl IdentityClient {
    pub fn new(base_url: String) -> Result<Self, AuthError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(VERIFY_TIMEOUT)
            .build()
            .map_err(|e| AuthError::Provider(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url,
        })
    }
}

#[async_trait]
impl TokenVerifier for IdentityClient {
    async fn verify(&self, token: &str) -> Result<Subject, AuthError> {
        let url = format!("{}/auth/v1/user", self.base_url);

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| AuthError::Provider(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(AuthError::Rejected);
        }
        if !status.is_success() {
            return Err(AuthError::Provider(format!("HTTP {}", status.as_u16())));
        }

        let subject: Subject = response
            .json()
            .await
            .map_err(|e| AuthError::Provider(format!("Malformed user response: {}", e)))?;

        debug!(subject_id = %subject.id, "Token verified");

        Ok(subject)
    }
}
