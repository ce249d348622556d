//! Categorization orchestrator
//!
//! Selects and sequences classification strategies by media kind, composes
//! the final description, and resolves the category. Every fetch or model
//! failure is a visible branch that degrades to a fallback category: a
//! malformed or unreachable media reference must not block the citizen's
//! report from being stored.

use super::{
    text_categorizer, ImageClassifier, MediaFetcher, SpeechTranscriber, CATEGORY_UNCATEGORIZED,
};
use crate::models::{Categorization, MediaKind, Submission};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Bounded wait for image payloads
pub const IMAGE_FETCH_TIMEOUT: Duration = Duration::from_secs(15);

/// Audio/video payloads run larger; allow a longer wait
pub const AV_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Orchestrates the intake categorization pipeline
///
/// Stateless apart from its injected collaborators; safe to share across
/// concurrent requests.
pub struct CategorizationOrchestrator {
    fetcher: Arc<dyn MediaFetcher>,
    classifier: Arc<dyn ImageClassifier>,
    transcriber: Arc<dyn SpeechTranscriber>,
}

impl CategorizationOrchestrator {
    pub fn new(
        fetcher: Arc<dyn MediaFetcher>,
        classifier: Arc<dyn ImageClassifier>,
        transcriber: Arc<dyn SpeechTranscriber>,
    ) -> Self {
        Self {
            fetcher,
            classifier,
            transcriber,
        }
    }

    /// Resolve the final description and category for a submission.
    ///
    /// Always succeeds: classification failures degrade to fallback
    /// categories and are logged, never propagated.
    pub async fn categorize_submission(&self, submission: &Submission) -> Categorization {
        match submission.media_kind {
            MediaKind::Image => self.categorize_image(submission).await,
            MediaKind::Audio | MediaKind::Video => self.categorize_audio_video(submission).await,
            MediaKind::None => self.categorize_text_only(submission),
        }
    }

    async fn categorize_image(&self, submission: &Submission) -> Categorization {
        let category = match &submission.media_url {
            Some(url) => match self.fetcher.fetch(url, IMAGE_FETCH_TIMEOUT).await {
                Ok(image) => match self.classifier.classify(&image).await {
                    Ok(result) => result.category,
                    Err(e) => {
                        warn!(error = %e, "Image classification failed, using fallback category");
                        CATEGORY_UNCATEGORIZED.to_string()
                    }
                },
                Err(e) => {
                    warn!(error = %e, "Image fetch failed, using fallback category");
                    CATEGORY_UNCATEGORIZED.to_string()
                }
            },
            None => {
                warn!("Image submission without media_url, using fallback category");
                CATEGORY_UNCATEGORIZED.to_string()
            }
        };

        // Image path leaves the user text untouched
        Categorization {
            final_description: submission.description_text.clone(),
            category,
        }
    }

    async fn categorize_audio_video(&self, submission: &Submission) -> Categorization {
        let transcript = match &submission.media_url {
            Some(url) => match self.fetcher.fetch(url, AV_FETCH_TIMEOUT).await {
                Ok(media) => match self.transcriber.transcribe(&media).await {
                    Ok(text) => text,
                    Err(e) => {
                        warn!(error = %e, "Transcription failed, continuing with empty transcript");
                        String::new()
                    }
                },
                Err(e) => {
                    warn!(error = %e, "Media fetch failed, continuing with empty transcript");
                    String::new()
                }
            },
            None => {
                warn!("Audio/video submission without media_url");
                String::new()
            }
        };

        // Always composed, even when either half is empty
        let final_description = format!(
            "User Text: {}\n\nAudio Transcription: {}",
            submission.description_text, transcript
        );

        // Categorize the composed description so user text still counts
        // when the transcript is empty or useless
        let category = text_categorizer::categorize(&final_description).category;

        debug!(category = %category, transcript_chars = transcript.len(), "Audio/video submission categorized");

        Categorization {
            final_description,
            category,
        }
    }

    fn categorize_text_only(&self, submission: &Submission) -> Categorization {
        let category = if submission.description_text.is_empty() {
            CATEGORY_UNCATEGORIZED.to_string()
        } else {
            text_categorizer::categorize(&submission.description_text).category
        };

        Categorization {
            final_description: submission.description_text.clone(),
            category,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{ClassificationResult, FetchError, ModelError};
    use async_trait::async_trait;

    struct StaticFetcher {
        payload: Vec<u8>,
    }

    #[async_trait]
    impl MediaFetcher for StaticFetcher {
        async fn fetch(&self, _url: &str, _timeout: Duration) -> Result<Vec<u8>, FetchError> {
            Ok(self.payload.clone())
        }
    }

    struct UnreachableFetcher;

    #[async_trait]
    impl MediaFetcher for UnreachableFetcher {
        async fn fetch(&self, url: &str, _timeout: Duration) -> Result<Vec<u8>, FetchError> {
            Err(FetchError::Network {
                url: url.to_string(),
                reason: "connection refused".to_string(),
            })
        }
    }

    struct StaticClassifier {
        result: ClassificationResult,
    }

    #[async_trait]
    impl ImageClassifier for StaticClassifier {
        async fn classify(&self, _image: &[u8]) -> Result<ClassificationResult, ModelError> {
            Ok(self.result.clone())
        }
    }

    struct FailingClassifier;

    #[async_trait]
    impl ImageClassifier for FailingClassifier {
        async fn classify(&self, _image: &[u8]) -> Result<ClassificationResult, ModelError> {
            Err(ModelError::Status(500))
        }
    }

    struct StaticTranscriber {
        text: String,
    }

    #[async_trait]
    impl SpeechTranscriber for StaticTranscriber {
        async fn transcribe(&self, _media: &[u8]) -> Result<String, ModelError> {
            Ok(self.text.clone())
        }
    }

    struct FailingTranscriber;

    #[async_trait]
    impl SpeechTranscriber for FailingTranscriber {
        async fn transcribe(&self, _media: &[u8]) -> Result<String, ModelError> {
            Err(ModelError::Network("connection reset".to_string()))
        }
    }

    fn orchestrator(
        fetcher: impl MediaFetcher + 'static,
        classifier: impl ImageClassifier + 'static,
        transcriber: impl SpeechTranscriber + 'static,
    ) -> CategorizationOrchestrator {
        CategorizationOrchestrator::new(
            Arc::new(fetcher),
            Arc::new(classifier),
            Arc::new(transcriber),
        )
    }

    fn submission(text: &str, url: Option<&str>, kind: MediaKind) -> Submission {
        Submission {
            description_text: text.to_string(),
            media_url: url.map(String::from),
            media_kind: kind,
        }
    }

    #[tokio::test]
    async fn test_image_classification_result_used_as_category() {
        let orch = orchestrator(
            StaticFetcher { payload: vec![1, 2, 3] },
            StaticClassifier {
                result: ClassificationResult::scored("Social Issue", 0.9),
            },
            FailingTranscriber,
        );

        let result = orch
            .categorize_submission(&submission(
                "crowd blocking the sidewalk",
                Some("http://media.example/photo.jpg"),
                MediaKind::Image,
            ))
            .await;

        assert_eq!(result.category, "Social Issue");
        // Image path must not rewrite the description
        assert_eq!(result.final_description, "crowd blocking the sidewalk");
    }

    #[tokio::test]
    async fn test_unreachable_image_url_is_uncategorized() {
        let orch = orchestrator(
            UnreachableFetcher,
            StaticClassifier {
                result: ClassificationResult::scored("car", 0.8),
            },
            FailingTranscriber,
        );

        let result = orch
            .categorize_submission(&submission(
                "",
                Some("http://nowhere.invalid/photo.jpg"),
                MediaKind::Image,
            ))
            .await;

        assert_eq!(result.category, "Uncategorized");
    }

    #[tokio::test]
    async fn test_classifier_failure_is_uncategorized() {
        let orch = orchestrator(
            StaticFetcher { payload: vec![0u8; 16] },
            FailingClassifier,
            FailingTranscriber,
        );

        let result = orch
            .categorize_submission(&submission(
                "",
                Some("http://media.example/photo.jpg"),
                MediaKind::Image,
            ))
            .await;

        assert_eq!(result.category, "Uncategorized");
    }

    #[tokio::test]
    async fn test_image_without_url_is_uncategorized() {
        let orch = orchestrator(
            StaticFetcher { payload: vec![] },
            StaticClassifier {
                result: ClassificationResult::scored("car", 0.8),
            },
            FailingTranscriber,
        );

        let result = orch
            .categorize_submission(&submission("some text", None, MediaKind::Image))
            .await;

        assert_eq!(result.category, "Uncategorized");
        assert_eq!(result.final_description, "some text");
    }

    #[tokio::test]
    async fn test_audio_transcript_appended_and_categorized() {
        let orch = orchestrator(
            StaticFetcher { payload: vec![0u8; 16] },
            FailingClassifier,
            StaticTranscriber {
                text: "big pothole near the bridge".to_string(),
            },
        );

        let result = orch
            .categorize_submission(&submission(
                "see attached recording",
                Some("http://media.example/report.ogg"),
                MediaKind::Audio,
            ))
            .await;

        assert_eq!(
            result.final_description,
            "User Text: see attached recording\n\nAudio Transcription: big pothole near the bridge"
        );
        assert_eq!(result.category, "Pothole");
    }

    #[tokio::test]
    async fn test_composed_description_categorized_not_transcript_alone() {
        // Transcript matches nothing, but the user text names garbage; the
        // composed description must carry the category
        let orch = orchestrator(
            StaticFetcher { payload: vec![0u8; 16] },
            FailingClassifier,
            StaticTranscriber {
                text: "please come quickly".to_string(),
            },
        );

        let result = orch
            .categorize_submission(&submission(
                "overflowing garbage container",
                Some("http://media.example/report.mp4"),
                MediaKind::Video,
            ))
            .await;

        assert_eq!(result.category, "Waste Management");
    }

    #[tokio::test]
    async fn test_transcription_failure_still_composes_markers() {
        let orch = orchestrator(
            StaticFetcher { payload: vec![0u8; 16] },
            FailingClassifier,
            FailingTranscriber,
        );

        let result = orch
            .categorize_submission(&submission(
                "",
                Some("http://media.example/report.ogg"),
                MediaKind::Audio,
            ))
            .await;

        // Both markers present even when both halves are empty
        assert!(result.final_description.contains("User Text:"));
        assert!(result.final_description.contains("Audio Transcription:"));
        assert_eq!(result.category, "General Inquiry");
    }

    #[tokio::test]
    async fn test_audio_fetch_failure_degrades_to_empty_transcript() {
        let orch = orchestrator(
            UnreachableFetcher,
            FailingClassifier,
            StaticTranscriber {
                text: "never reached".to_string(),
            },
        );

        let result = orch
            .categorize_submission(&submission(
                "street lamp is dark",
                Some("http://nowhere.invalid/report.ogg"),
                MediaKind::Audio,
            ))
            .await;

        assert_eq!(
            result.final_description,
            "User Text: street lamp is dark\n\nAudio Transcription: "
        );
        // User text still drives the category
        assert_eq!(result.category, "Streetlight Issue");
    }

    #[tokio::test]
    async fn test_text_only_submission() {
        let orch = orchestrator(UnreachableFetcher, FailingClassifier, FailingTranscriber);

        let result = orch
            .categorize_submission(&submission("trash piling up", None, MediaKind::None))
            .await;

        assert_eq!(result.category, "Waste Management");
        assert_eq!(result.final_description, "trash piling up");
    }

    #[tokio::test]
    async fn test_empty_submission_is_uncategorized() {
        let orch = orchestrator(UnreachableFetcher, FailingClassifier, FailingTranscriber);

        let result = orch
            .categorize_submission(&submission("", None, MediaKind::None))
            .await;

        assert_eq!(result.category, "Uncategorized");
        assert_eq!(result.final_description, "");
    }
}
