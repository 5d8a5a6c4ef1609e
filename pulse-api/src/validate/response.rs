//! Parsing and schema validation of the model's structured output
//!
//! The model is asked for JSON matching a declared schema, but nothing it
//! returns is trusted until every field has been checked here. Parse and
//! schema failures are distinct outcomes; both carry detail for the log
//! and neither is ever surfaced to the end user.

use super::{MAX_TAGS, TAG_VOCABULARY};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// A validated analysis of one review
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AiAnalysis {
    /// Customer-facing reply text
    pub reply_text: String,
    /// Short summary of the review
    pub summary: String,
    /// Suggested follow-up action
    pub action: String,
    /// Sentiment in [0, 100]
    pub sentiment_score: i64,
    /// Up to three tags from the fixed vocabulary
    pub tags: Vec<String>,
}

/// Why an AI response was rejected
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The response body was not valid JSON
    #[error("AI response is not valid JSON: {0}")]
    Parse(String),

    /// The parsed value violated the schema; carries every violation
    #[error("AI response failed schema validation: {0:?}")]
    Schema(Vec<String>),
}

/// Parse raw model output and check it field by field against the schema.
pub fn parse_analysis(raw: &str) -> Result<AiAnalysis, AnalysisError> {
    let value: Value =
        serde_json::from_str(raw).map_err(|e| AnalysisError::Parse(e.to_string()))?;

    let mut violations = Vec::new();

    if !value.is_object() {
        return Err(AnalysisError::Schema(vec![
            "response body must be a JSON object".to_string(),
        ]));
    }

    let reply_text = require_nonempty_string(&value, "response", &mut violations);
    let summary = require_nonempty_string(&value, "summary", &mut violations);
    let action = require_nonempty_string(&value, "action", &mut violations);

    let sentiment_score = match value.get("sentiment_score").and_then(Value::as_f64) {
        Some(score) if (0.0..=100.0).contains(&score) => Some(score.round() as i64),
        Some(score) => {
            violations.push(format!("sentiment_score {} outside [0, 100]", score));
            None
        }
        None => {
            violations.push("sentiment_score must be a number".to_string());
            None
        }
    };

    let tags = match value.get("tags") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => {
            if items.len() > MAX_TAGS {
                violations.push(format!(
                    "tags has {} entries (maximum {})",
                    items.len(),
                    MAX_TAGS
                ));
            }
            let mut tags = Vec::with_capacity(items.len().min(MAX_TAGS));
            for item in items {
                match item.as_str() {
                    Some(tag) if TAG_VOCABULARY.contains(&tag) => tags.push(tag.to_string()),
                    Some(tag) => violations.push(format!("unknown tag \"{}\"", tag)),
                    None => violations.push("tags entries must be strings".to_string()),
                }
            }
            tags
        }
        Some(_) => {
            violations.push("tags must be an array".to_string());
            Vec::new()
        }
    };

    if !violations.is_empty() {
        return Err(AnalysisError::Schema(violations));
    }

    Ok(AiAnalysis {
        reply_text: reply_text.unwrap_or_default(),
        summary: summary.unwrap_or_default(),
        action: action.unwrap_or_default(),
        sentiment_score: sentiment_score.unwrap_or_default(),
        tags,
    })
}

fn require_nonempty_string(
    value: &Value,
    field: &str,
    violations: &mut Vec<String>,
) -> Option<String> {
    match value.get(field).and_then(Value::as_str) {
        Some(s) if !s.is_empty() => Some(s.to_string()),
        Some(_) => {
            violations.push(format!("{} must not be empty", field));
            None
        }
        None => {
            violations.push(format!("{} must be a string", field));
            None
        }
    }
}
