//! Categorization pipeline services
//!
//! The intake pipeline is a chain of fallible strategies behind small
//! traits: fetch the media payload, classify it (vision or speech), and
//! fall back to keyword categorization of whatever text is available.
//! Every failure degrades to a fallback category; a submission is never
//! rejected because its media could not be classified.

pub mod identity_client;
pub mod media_fetcher;
pub mod orchestrator;
pub mod speech_client;
pub mod text_categorizer;
pub mod vision_client;

pub use identity_client::{AuthError, IdentityClient, TokenVerifier};
pub use media_fetcher::HttpMediaFetcher;
pub use orchestrator::CategorizationOrchestrator;
pub use speech_client::SpeechClient;
pub use vision_client::VisionClient;

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Fallback category when fetch or inference fails outright
pub const CATEGORY_UNCATEGORIZED: &str = "Uncategorized";

/// Fallback category when the detector ran but found nothing above its
/// confidence floor. Observably distinct from [`CATEGORY_UNCATEGORIZED`].
pub const CATEGORY_UNCATEGORIZED_IMAGE: &str = "Uncategorized Image";

/// Category label plus optional model confidence
///
/// `category` is never empty: classifiers always resolve to a fallback
/// label rather than omit one. `confidence` is present for model-based
/// classification and absent for keyword classification.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationResult {
    pub category: String,
    pub confidence: Option<f32>,
}

impl ClassificationResult {
    /// Keyword-derived result (no confidence)
    pub fn keyword(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            confidence: None,
        }
    }

    /// Model-derived result with a confidence score
    pub fn scored(category: impl Into<String>, confidence: f32) -> Self {
        Self {
            category: category.into(),
            confidence: Some(confidence),
        }
    }
}

/// Media fetch errors
///
/// A non-2xx status is a failure, never an empty success.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Network error fetching {url}: {reason}")]
    Network { url: String, reason: String },

    #[error("Fetch of {url} returned HTTP {status}")]
    Status { url: String, status: u16 },
}

/// Inference service errors
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Inference service returned HTTP {0}")]
    Status(u16),

    #[error("Malformed inference response: {0}")]
    Protocol(String),
}

/// Retrieves a remote media resource with a bounded wait
#[async_trait]
pub trait MediaFetcher: Send + Sync {
    async fn fetch(&self, url: &str, timeout: Duration) -> Result<Vec<u8>, FetchError>;
}

/// Produces a candidate label with confidence from image bytes
#[async_trait]
pub trait ImageClassifier: Send + Sync {
    async fn classify(&self, image: &[u8]) -> Result<ClassificationResult, ModelError>;
}

/// Produces a best-effort transcript from audio/video bytes
#[async_trait]
pub trait SpeechTranscriber: Send + Sync {
    async fn transcribe(&self, media: &[u8]) -> Result<String, ModelError>;
}
