//! Core domain types for issue intake

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Status written to every newly created issue. The status column is an
/// open set; operators and admins move issues through whatever workflow
/// states the front end defines.
pub const STATUS_PENDING: &str = "Pending";

/// Declared kind of an attached media resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MediaKind {
    #[default]
    None,
    Image,
    Audio,
    Video,
}

impl MediaKind {
    /// Parse the request's `media_type` string. Absent or unrecognized
    /// values mean "no media" rather than an error.
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("image") => MediaKind::Image,
            Some("audio") => MediaKind::Audio,
            Some("video") => MediaKind::Video,
            _ => MediaKind::None,
        }
    }
}

/// A citizen-provided issue report prior to categorization
#[derive(Debug, Clone)]
pub struct Submission {
    /// User-authored free text (possibly empty)
    pub description_text: String,
    /// Dereferenceable locator for the media payload
    pub media_url: Option<String>,
    /// Declared media kind, parsed from the request
    pub media_kind: MediaKind,
}

/// Outcome of the categorization pipeline: the description to store and
/// the resolved category label
#[derive(Debug, Clone, PartialEq)]
pub struct Categorization {
    pub final_description: String,
    pub category: String,
}

/// Persisted issue record
#[derive(Debug, Clone, Serialize)]
pub struct Issue {
    /// Storage-assigned row id
    pub id: i64,
    /// Storage-assigned creation timestamp (UTC)
    pub created_at: DateTime<Utc>,
    pub description_text: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub media_url: Option<String>,
    pub media_type: Option<String>,
    pub status: String,
    pub category: String,
    /// Operator subject id the issue is assigned to
    pub assigned_to: Option<String>,
    /// Subject id of the reporting citizen
    pub submitted_by: Option<String>,
}

/// Profile record: role plus the operator's last reported location
#[derive(Debug, Clone, Serialize)]
pub struct Profile {
    pub user_id: String,
    pub role: String,
    pub display_name: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub location_updated_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_kind_parse_known_values() {
        assert_eq!(MediaKind::parse(Some("image")), MediaKind::Image);
        assert_eq!(MediaKind::parse(Some("audio")), MediaKind::Audio);
        assert_eq!(MediaKind::parse(Some("video")), MediaKind::Video);
    }

    #[test]
    fn test_media_kind_parse_absent_or_unknown() {
        assert_eq!(MediaKind::parse(None), MediaKind::None);
        assert_eq!(MediaKind::parse(Some("")), MediaKind::None);
        assert_eq!(MediaKind::parse(Some("gif")), MediaKind::None);
        // Parsing is exact; the client sends lowercase kinds
        assert_eq!(MediaKind::parse(Some("Image")), MediaKind::None);
    }
}
