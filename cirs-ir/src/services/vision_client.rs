//! Object-detection inference client
//!
//! Posts image bytes to the detection sidecar and reduces its detections
//! to a single category label: discard boxes below the confidence floor,
//! keep the maximum-confidence box (first occurrence wins a tie), resolve
//! its class index through the label table, then apply the configured
//! substring remap.

use super::{ClassificationResult, ImageClassifier, ModelError, CATEGORY_UNCATEGORIZED_IMAGE};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

const USER_AGENT: &str = concat!("CIRS/", env!("CARGO_PKG_VERSION"));
const INFERENCE_TIMEOUT: Duration = Duration::from_secs(60);

/// Detections at or below this confidence are treated as noise
const DEFAULT_CONFIDENCE_FLOOR: f32 = 0.25;

/// COCO class labels, indexed by the detector's class id
const COCO_LABELS: [&str; 80] = [
    "person", "bicycle", "car", "motorcycle", "airplane", "bus", "train", "truck", "boat",
    "traffic light", "fire hydrant", "stop sign", "parking meter", "bench", "bird", "cat", "dog",
    "horse", "sheep", "cow", "elephant", "bear", "zebra", "giraffe", "backpack", "umbrella",
    "handbag", "tie", "suitcase", "frisbee", "skis", "snowboard", "sports ball", "kite",
    "baseball bat", "baseball glove", "skateboard", "surfboard", "tennis racket", "bottle",
    "wine glass", "cup", "fork", "knife", "spoon", "bowl", "banana", "apple", "sandwich",
    "orange", "broccoli", "carrot", "hot dog", "pizza", "donut", "cake", "chair", "couch",
    "potted plant", "bed", "dining table", "toilet", "tv", "laptop", "mouse", "remote",
    "keyboard", "cell phone", "microwave", "oven", "toaster", "sink", "refrigerator", "book",
    "clock", "vase", "scissors", "teddy bear", "hair drier", "toothbrush",
];

/// One substring→category remap entry, matched case-insensitively against
/// the resolved detector label
#[derive(Debug, Clone)]
pub struct LabelRemapRule {
    pub pattern: String,
    pub category: String,
}

impl LabelRemapRule {
    pub fn new(pattern: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            category: category.into(),
        }
    }
}

/// Default remap table. Deliberately short; grows as the municipality
/// adds detector classes worth special-casing.
fn default_label_remap() -> Vec<LabelRemapRule> {
    vec![
        LabelRemapRule::new("pothole", "Pothole"),
        LabelRemapRule::new("person", "Social Issue"),
    ]
}

/// One detected bounding box from the detection service
#[derive(Debug, Clone, Deserialize)]
pub struct Detection {
    pub class_id: usize,
    pub confidence: f32,
    #[serde(default)]
    pub bbox: Option<[f32; 4]>,
}

/// Detection service response
#[derive(Debug, Deserialize)]
struct DetectResponse {
    detections: Vec<Detection>,
}

/// Detection inference client
pub struct VisionClient {
    http_client: reqwest::Client,
    base_url: String,
    confidence_floor: f32,
    labels: &'static [&'static str],
    remap: Vec<LabelRemapRule>,
}

impl VisionClient {
    pub fn new(base_url: String) -> Result<Self, ModelError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(INFERENCE_TIMEOUT)
            .build()
            .map_err(|e| ModelError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url,
            confidence_floor: DEFAULT_CONFIDENCE_FLOOR,
            labels: &COCO_LABELS,
            remap: default_label_remap(),
        })
    }

    /// Override the confidence floor (0.0 disables filtering)
    pub fn with_confidence_floor(mut self, floor: f32) -> Self {
        self.confidence_floor = floor.clamp(0.0, 1.0);
        self
    }

    /// Replace the substring remap table
    pub fn with_label_remap(mut self, remap: Vec<LabelRemapRule>) -> Self {
        self.remap = remap;
        self
    }

    /// Reduce raw detections to a single classification
    fn resolve_detections(
        &self,
        detections: &[Detection],
    ) -> Result<ClassificationResult, ModelError> {
        // Keep the maximum-confidence detection above the floor; on a tie
        // the first occurrence in detection order wins
        let mut best: Option<&Detection> = None;
        for detection in detections {
            if detection.confidence < self.confidence_floor {
                continue;
            }
            if best.map_or(true, |b| detection.confidence > b.confidence) {
                best = Some(detection);
            }
        }

        let Some(winner) = best else {
            debug!("No detections above confidence floor");
            return Ok(ClassificationResult {
                category: CATEGORY_UNCATEGORIZED_IMAGE.to_string(),
                confidence: None,
            });
        };

        let label = self
            .labels
            .get(winner.class_id)
            .copied()
            .ok_or_else(|| {
                ModelError::Protocol(format!(
                    "Class id {} outside label table (len {})",
                    winner.class_id,
                    self.labels.len()
                ))
            })?;

        let label_lower = label.to_lowercase();
        let category = self
            .remap
            .iter()
            .find(|rule| label_lower.contains(&rule.pattern.to_lowercase()))
            .map(|rule| rule.category.clone())
            .unwrap_or_else(|| label.to_string());

        Ok(ClassificationResult::scored(category, winner.confidence))
    }
}

#[async_trait]
impl ImageClassifier for VisionClient {
    async fn classify(&self, image: &[u8]) -> Result<ClassificationResult, ModelError> {
        let url = format!("{}/v1/detect", self.base_url);

        debug!(size_bytes = image.len(), "Requesting object detection");

        let response = self
            .http_client
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(image.to_vec())
            .send()
            .await
            .map_err(|e| ModelError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ModelError::Status(status.as_u16()));
        }

        let detect: DetectResponse = response
            .json()
            .await
            .map_err(|e| ModelError::Protocol(e.to_string()))?;

        let result = self.resolve_detections(&detect.detections)?;

        info!(
            category = %result.category,
            confidence = ?result.confidence,
            detections = detect.detections.len(),
            "Image classification completed"
        );

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> VisionClient {
        VisionClient::new("http://127.0.0.1:5761".to_string()).expect("Should build client")
    }

    fn detection(class_id: usize, confidence: f32) -> Detection {
        Detection {
            class_id,
            confidence,
            bbox: None,
        }
    }

    #[test]
    fn test_no_detections_is_uncategorized_image() {
        let result = client().resolve_detections(&[]).unwrap();
        assert_eq!(result.category, CATEGORY_UNCATEGORIZED_IMAGE);
        assert_eq!(result.confidence, None);
    }

    #[test]
    fn test_all_below_floor_is_uncategorized_image() {
        let result = client()
            .resolve_detections(&[detection(2, 0.10), detection(7, 0.20)])
            .unwrap();
        assert_eq!(result.category, CATEGORY_UNCATEGORIZED_IMAGE);
    }

    #[test]
    fn test_max_confidence_detection_wins() {
        // class 2 = "car", class 7 = "truck"
        let result = client()
            .resolve_detections(&[detection(2, 0.60), detection(7, 0.90), detection(13, 0.40)])
            .unwrap();
        assert_eq!(result.category, "truck");
        assert_eq!(result.confidence, Some(0.90));
    }

    #[test]
    fn test_tie_keeps_first_occurrence() {
        // class 2 = "car", class 5 = "bus", equal confidence
        let result = client()
            .resolve_detections(&[detection(2, 0.80), detection(5, 0.80)])
            .unwrap();
        assert_eq!(result.category, "car");
    }

    #[test]
    fn test_person_remaps_to_social_issue() {
        // class 0 = "person"
        let result = client().resolve_detections(&[detection(0, 0.95)]).unwrap();
        assert_eq!(result.category, "Social Issue");
        assert_eq!(result.confidence, Some(0.95));
    }

    #[test]
    fn test_unmapped_label_passes_through_raw() {
        // class 10 = "fire hydrant"
        let result = client().resolve_detections(&[detection(10, 0.70)]).unwrap();
        assert_eq!(result.category, "fire hydrant");
    }

    #[test]
    fn test_custom_remap_rule_applies() {
        // class 9 = "traffic light"
        let client = client().with_label_remap(vec![LabelRemapRule::new(
            "light",
            "Streetlight Issue",
        )]);
        let result = client.resolve_detections(&[detection(9, 0.55)]).unwrap();
        assert_eq!(result.category, "Streetlight Issue");
    }

    #[test]
    fn test_out_of_range_class_id_is_protocol_error() {
        let err = client().resolve_detections(&[detection(999, 0.80)]).unwrap_err();
        assert!(matches!(err, ModelError::Protocol(_)));
    }

    #[test]
    fn test_detect_response_parsing() {
        let json_str = r#"{
            "detections": [
                {"class_id": 0, "confidence": 0.91, "bbox": [0.1, 0.2, 0.5, 0.8]},
                {"class_id": 2, "confidence": 0.44}
            ]
        }"#;

        let response: DetectResponse = serde_json::from_str(json_str).unwrap();
        assert_eq!(response.detections.len(), 2);
        assert_eq!(response.detections[0].class_id, 0);
        assert!(response.detections[0].bbox.is_some());
        assert!(response.detections[1].bbox.is_none());
    }
}
