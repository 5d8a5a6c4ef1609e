//! Database models

use serde::{Deserialize, Serialize};

/// A persisted review document: the customer submission enriched with the
/// AI analysis and call latency.
///
/// Serialized field names are the store contract and must not change.
/// Deserialization also accepts the legacy names `review` (for
/// `reviewText`) and `timestamp` (for `createdAt`) so records written by
/// earlier deployments still load; the `ai_*` fields default when a legacy
/// record predates analysis enrichment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReviewRecord {
    pub rating: i64,
    #[serde(rename = "reviewText", alias = "review")]
    pub review_text: String,
    #[serde(default)]
    pub ai_response: String,
    #[serde(default)]
    pub ai_summary: String,
    #[serde(default)]
    pub ai_action: String,
    #[serde(default)]
    pub ai_sentiment: i64,
    #[serde(default)]
    pub ai_tags: Vec<String>,
    #[serde(default)]
    pub latency_ms: i64,
    #[serde(rename = "createdAt", alias = "timestamp")]
    pub created_at: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_store_field_names() {
        let record = ReviewRecord {
            rating: 4,
            review_text: "Solid product".to_string(),
            ai_response: "Thank you!".to_string(),
            ai_summary: "Satisfied customer".to_string(),
            ai_action: "None".to_string(),
            ai_sentiment: 80,
            ai_tags: vec!["Quality".to_string()],
            latency_ms: 120,
            created_at: 1_700_000_000_000,
        };

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["reviewText"], "Solid product");
        assert_eq!(value["createdAt"], 1_700_000_000_000_i64);
        assert_eq!(value["ai_sentiment"], 80);
        assert!(value.get("review_text").is_none());
    }

    #[test]
    fn test_accepts_legacy_field_names() {
        let legacy = r#"{
            "rating": 2,
            "review": "Arrived late",
            "timestamp": 1650000000000,
            "ai_sentiment": 25,
            "ai_tags": ["Delivery"]
        }"#;

        let record: ReviewRecord = serde_json::from_str(legacy).unwrap();
        assert_eq!(record.review_text, "Arrived late");
        assert_eq!(record.created_at, 1_650_000_000_000);
        assert_eq!(record.ai_sentiment, 25);
        assert_eq!(record.ai_tags, vec!["Delivery".to_string()]);
        assert_eq!(record.ai_response, "");
        assert_eq!(record.latency_ms, 0);
    }
}
