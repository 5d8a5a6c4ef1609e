//! Gemini API client
//!
//! Two call modes: structured analysis of a single review, where the
//! response is constrained by a declared JSON schema, and free-form
//! summarization for report generation, where the prompt alone shapes the
//! output. Structured mode trades prompt flexibility for a
//! machine-checkable contract; free-form mode keeps narrative flexibility
//! for text meant to be read by a human.
//!
//! The client is built once at startup from the resolved API key and
//! shared read-only across requests. The 30 second request timeout bounds
//! a hung upstream call, which then surfaces as an `AiError`.

use crate::validate::{MAX_TAGS, TAG_VOCABULARY};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::debug;

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const GEMINI_MODEL: &str = "gemini-2.0-flash";
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Gemini client errors
#[derive(Debug, Error)]
pub enum AiError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Malformed API response: {0}")]
    MalformedResponse(String),

    #[error("Model returned no text")]
    EmptyResponse,
}

/// Structured-mode result: the raw model text plus wall-clock call latency
#[derive(Debug, Clone)]
pub struct RawAnalysis {
    pub raw: String,
    pub latency_ms: i64,
}

/// Free-form generation knobs
#[derive(Debug, Clone, Copy)]
pub struct GenerationOptions {
    pub temperature: f32,
    pub max_output_tokens: u32,
}

/// Seam between the pipeline and the generative model, so tests can
/// inject a canned implementation.
#[async_trait]
pub trait ReviewAnalyzer: Send + Sync {
    /// Analyze one review under the structured-output schema.
    async fn analyze(&self, rating: i64, text: &str) -> Result<RawAnalysis, AiError>;

    /// Free-form generation. May legitimately return an empty string;
    /// the caller decides what stands in for missing output.
    async fn summarize(&self, prompt: &str, options: &GenerationOptions)
        -> Result<String, AiError>;
}

/// Gemini generateContent response envelope
#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    parts: Option<Vec<Part>>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

/// Gemini API client
pub struct GeminiClient {
    api_key: String,
    http_client: reqwest::Client,
}

impl GeminiClient {
    pub fn new(api_key: String) -> Result<Self, AiError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| AiError::Network(e.to_string()))?;

        Ok(Self {
            api_key,
            http_client,
        })
    }

    async fn generate_content(&self, body: &Value) -> Result<GenerateContentResponse, AiError> {
        let url = format!(
            "{}/{}:generateContent?key={}",
            GEMINI_BASE_URL, GEMINI_MODEL, self.api_key
        );

        let response = self
            .http_client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| AiError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(AiError::Api(status.as_u16(), error_text));
        }

        response
            .json()
            .await
            .map_err(|e| AiError::MalformedResponse(e.to_string()))
    }
}

#[async_trait]
impl ReviewAnalyzer for GeminiClient {
    async fn analyze(&self, rating: i64, text: &str) -> Result<RawAnalysis, AiError> {
        let prompt = build_analysis_prompt(rating, text);
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": analysis_response_schema(),
            }
        });

        debug!(rating, "Requesting structured review analysis");

        let started = Instant::now();
        let response = self.generate_content(&body).await?;
        let latency_ms = started.elapsed().as_millis() as i64;

        let raw = extract_text(&response).ok_or(AiError::EmptyResponse)?;

        debug!(latency_ms, "Analysis response received");

        Ok(RawAnalysis { raw, latency_ms })
    }

    async fn summarize(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<String, AiError> {
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "temperature": options.temperature,
                "maxOutputTokens": options.max_output_tokens,
            }
        });

        debug!(
            temperature = options.temperature,
            max_output_tokens = options.max_output_tokens,
            "Requesting free-form summary"
        );

        let response = self.generate_content(&body).await?;

        Ok(extract_text(&response).unwrap_or_default())
    }
}

/// Instruction for structured analysis of one review
fn build_analysis_prompt(rating: i64, text: &str) -> String {
    format!(
        "A customer left a {rating}-star review of our product:\n\n\
         \"{text}\"\n\n\
         Write a short, courteous reply to the customer, summarize the \
         review in at most 10 words, suggest one concrete follow-up action \
         for the business, score the sentiment from 0 (very negative) to \
         100 (very positive), and pick up to {MAX_TAGS} topic tags."
    )
}

/// Structured-output descriptor for review analysis.
///
/// Exactly these five properties, all required. The schema is the
/// contract the response validator checks against.
fn analysis_response_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "response": { "type": "string" },
            "summary": { "type": "string" },
            "action": { "type": "string" },
            "sentiment_score": {
                "type": "integer",
                "minimum": 0,
                "maximum": 100
            },
            "tags": {
                "type": "array",
                "items": {
                    "type": "string",
                    "enum": TAG_VOCABULARY
                },
                "maxItems": MAX_TAGS
            }
        },
        "required": ["response", "summary", "action", "sentiment_score", "tags"]
    })
}

/// Concatenate the text parts of the first candidate, if any.
fn extract_text(response: &GenerateContentResponse) -> Option<String> {
    let parts = response
        .candidates
        .as_ref()?
        .first()?
        .content
        .as_ref()?
        .parts
        .as_ref()?;

    let text: String = parts
        .iter()
        .filter_map(|p| p.text.as_deref())
        .collect();

    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = GeminiClient::new("test-key".to_string());
        assert!(client.is_ok());
    }

    #[test]
    fn test_analysis_prompt_embeds_rating_and_text() {
        let prompt = build_analysis_prompt(2, "Shipping took forever");
        assert!(prompt.contains("2-star"));
        assert!(prompt.contains("Shipping took forever"));
    }

    #[test]
    fn test_response_schema_shape() {
        let schema = analysis_response_schema();

        let required = schema["required"].as_array().unwrap();
        assert_eq!(required.len(), 5);

        assert_eq!(schema["properties"]["sentiment_score"]["minimum"], 0);
        assert_eq!(schema["properties"]["sentiment_score"]["maximum"], 100);
        assert_eq!(schema["properties"]["tags"]["maxItems"], 3);

        let tag_enum = schema["properties"]["tags"]["items"]["enum"]
            .as_array()
            .unwrap();
        assert_eq!(tag_enum.len(), 5);
        assert!(tag_enum.contains(&serde_json::json!("App Experience")));
    }

    #[test]
    fn test_extract_text_concatenates_parts() {
        let response: GenerateContentResponse = serde_json::from_value(serde_json::json!({
            "candidates": [{
                "content": { "parts": [{ "text": "Hello " }, { "text": "world" }] }
            }]
        }))
        .unwrap();
        assert_eq!(extract_text(&response).as_deref(), Some("Hello world"));
    }

    #[test]
    fn test_extract_text_empty_candidates() {
        let response: GenerateContentResponse =
            serde_json::from_value(serde_json::json!({ "candidates": [] })).unwrap();
        assert!(extract_text(&response).is_none());

        let response: GenerateContentResponse =
            serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(extract_text(&response).is_none());
    }
}
