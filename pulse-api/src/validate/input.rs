//! Structural validation of review submissions
//!
//! All violated fields are reported together so the caller sees every
//! problem at once; the pipeline still stops at the first failed stage.

use serde::Deserialize;

/// Lowest accepted star rating
pub const MIN_RATING: i64 = 1;

/// Highest accepted star rating
pub const MAX_RATING: i64 = 5;

/// Minimum review length in characters
pub const MIN_REVIEW_CHARS: usize = 5;

/// Maximum review length in characters
pub const MAX_REVIEW_CHARS: usize = 1000;

/// Raw request body for POST /submit-review.
///
/// Fields stay loosely typed here so the validator can report a
/// non-integer rating as a field message instead of a deserialization
/// failure.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitReviewRequest {
    #[serde(default)]
    pub rating: Option<serde_json::Value>,
    #[serde(default)]
    pub review: Option<String>,
}

/// A submission that passed validation. Immutable from here on.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewSubmission {
    pub rating: i64,
    pub text: String,
}

/// Validate a raw submission, collecting every violated-field message.
pub fn validate_submission(raw: &SubmitReviewRequest) -> Result<ReviewSubmission, Vec<String>> {
    let mut messages = Vec::new();

    let rating = match raw.rating.as_ref().and_then(|v| v.as_i64()) {
        Some(r) if (MIN_RATING..=MAX_RATING).contains(&r) => Some(r),
        _ => {
            messages.push(format!(
                "rating must be an integer between {} and {}",
                MIN_RATING, MAX_RATING
            ));
            None
        }
    };

    let text = match raw.review.as_deref() {
        Some(t) if (MIN_REVIEW_CHARS..=MAX_REVIEW_CHARS).contains(&t.chars().count()) => {
            Some(t.to_string())
        }
        _ => {
            messages.push(format!(
                "review must be between {} and {} characters",
                MIN_REVIEW_CHARS, MAX_REVIEW_CHARS
            ));
            None
        }
    };

    match (rating, text) {
        (Some(rating), Some(text)) if messages.is_empty() => {
            Ok(ReviewSubmission { rating, text })
        }
        _ => Err(messages),
    }
}
