//! Keyword-based text categorization
//!
//! The single shared fallback every other classification path routes
//! through. Pure function of the input string: case-insensitive substring
//! match over an ordered rule table, first matching rule wins.

use super::ClassificationResult;

/// One keyword rule: any listed keyword matching assigns the category
struct KeywordRule {
    keywords: &'static [&'static str],
    category: &'static str,
}

/// Ordered rule table. Priority is the table order, not keyword position
/// in the input text.
const KEYWORD_RULES: &[KeywordRule] = &[
    KeywordRule {
        keywords: &["pothole", "road broken"],
        category: "Pothole",
    },
    KeywordRule {
        keywords: &["streetlight", "light", "lamp"],
        category: "Streetlight Issue",
    },
    KeywordRule {
        keywords: &["trash", "garbage"],
        category: "Waste Management",
    },
];

/// Category when no rule matches
const DEFAULT_CATEGORY: &str = "General Inquiry";

/// Categorize free text. Total: always returns one of the four labels.
pub fn categorize(text: &str) -> ClassificationResult {
    let lower = text.to_lowercase();

    for rule in KEYWORD_RULES {
        if rule.keywords.iter().any(|keyword| lower.contains(keyword)) {
            return ClassificationResult::keyword(rule.category);
        }
    }

    ClassificationResult::keyword(DEFAULT_CATEGORY)
}
