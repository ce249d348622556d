//! Speech-to-text inference client
//!
//! Whole-buffer-in, whole-string-out: the media payload is posted to the
//! transcription sidecar and its best transcript comes back in one piece.
//! No streaming, no partial results, no language detection beyond the
//! model's default behavior.

use super::{ModelError, SpeechTranscriber};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

const USER_AGENT: &str = concat!("CIRS/", env!("CARGO_PKG_VERSION"));

/// Transcription of a long clip is slow; allow more than the vision path
const INFERENCE_TIMEOUT: Duration = Duration::from_secs(120);

/// Transcription service response
#[derive(Debug, Deserialize)]
struct TranscribeResponse {
    text: String,
}

/// Transcription inference client
pub struct SpeechClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl SpeechClient {
    pub fn new(base_url: String) -> Result<Self, ModelError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(INFERENCE_TIMEOUT)
            .build()
            .map_err(|e| ModelError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url,
        })
    }
}

#[async_trait]
impl SpeechTranscriber for SpeechClient {
    async fn transcribe(&self, media: &[u8]) -> Result<String, ModelError> {
        let url = format!("{}/v1/transcribe", self.base_url);

        debug!(size_bytes = media.len(), "Requesting transcription");

        let response = self
            .http_client
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(media.to_vec())
            .send()
            .await
            .map_err(|e| ModelError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ModelError::Status(status.as_u16()));
        }

        let transcribed: TranscribeResponse = response
            .json()
            .await
            .map_err(|e| ModelError::Protocol(e.to_string()))?;

        info!(
            transcript_chars = transcribed.text.len(),
            "Transcription completed"
        );

        Ok(transcribed.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transcribe_response_parsing() {
        let json_str = r#"{"text": "there is a pothole on elm street"}"#;
        let response: TranscribeResponse = serde_json::from_str(json_str).unwrap();
        assert_eq!(response.text, "there is a pothole on elm street");
    }

    #[test]
    fn test_empty_transcript_is_valid() {
        // Silence comes back as an empty string, which is a success shape
        let json_str = r#"{"text": ""}"#;
        let response: TranscribeResponse = serde_json::from_str(json_str).unwrap();
        assert_eq!(response.text, "");
    }
}
