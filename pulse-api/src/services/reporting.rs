//! Narrative report generation over recent reviews
//!
//! Reads a bounded snapshot of the newest records, reduces each to the
//! handful of fields the report needs, and asks the model for a fixed
//! four-section markdown document. Low temperature and a bounded output
//! budget keep the report short and stable between runs.

use crate::db::recent_reviews;
use crate::services::gemini::{AiError, GenerationOptions, ReviewAnalyzer};
use pulse_common::db::models::ReviewRecord;
use serde::Serialize;
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{debug, info};

/// How many of the newest records feed one report
pub const REPORT_SOURCE_LIMIT: i64 = 50;

/// Stand-in text when the model returns nothing
pub const REPORT_FALLBACK: &str = "No report could be generated from the stored reviews.";

const REPORT_TEMPERATURE: f32 = 0.2;
const REPORT_MAX_OUTPUT_TOKENS: u32 = 800;

/// Report generation errors
#[derive(Debug, Error)]
pub enum ReportError {
    /// No records exist yet; precondition for a report not met
    #[error("no reviews stored yet")]
    NoData,

    #[error("storage error: {0}")]
    Storage(#[from] pulse_common::Error),

    #[error("AI error: {0}")]
    Ai(#[from] AiError),
}

/// One review reduced to the fields the report prompt needs
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ReportEntry {
    pub rating: i64,
    pub text: String,
    pub date: String,
    pub sentiment: i64,
    pub tags: Vec<String>,
}

/// Generate a markdown report over the most recent reviews.
pub async fn generate_report(
    pool: &SqlitePool,
    analyzer: &dyn ReviewAnalyzer,
) -> Result<String, ReportError> {
    let records = recent_reviews(pool, REPORT_SOURCE_LIMIT).await?;
    if records.is_empty() {
        return Err(ReportError::NoData);
    }

    debug!(count = records.len(), "Building report input");
    let entries: Vec<ReportEntry> = records.iter().map(normalize_record).collect();

    let prompt = build_report_prompt(&entries);
    let options = GenerationOptions {
        temperature: REPORT_TEMPERATURE,
        max_output_tokens: REPORT_MAX_OUTPUT_TOKENS,
    };

    let markdown = analyzer.summarize(&prompt, &options).await?;

    if markdown.trim().is_empty() {
        info!("Model returned no report content, using fallback text");
        return Ok(REPORT_FALLBACK.to_string());
    }

    info!(source_reviews = entries.len(), "Report generated");
    Ok(markdown)
}

/// Reduce a stored record to report input. Legacy field names were
/// already normalized when the record was deserialized.
pub fn normalize_record(record: &ReviewRecord) -> ReportEntry {
    ReportEntry {
        rating: record.rating,
        text: record.review_text.clone(),
        date: format_date(record.created_at),
        sentiment: record.ai_sentiment,
        tags: record.ai_tags.clone(),
    }
}

fn format_date(epoch_ms: i64) -> String {
    chrono::DateTime::from_timestamp_millis(epoch_ms)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// One prompt mandating the four-section structure and excluding raw data
/// from the output.
pub fn build_report_prompt(entries: &[ReportEntry]) -> String {
    let data = serde_json::to_string(entries).unwrap_or_else(|_| "[]".to_string());

    format!(
        "You are a customer experience analyst. Based on the customer \
         reviews provided below, write a concise markdown report with \
         exactly these four sections:\n\n\
         ## Overall Sentiment Trend\n\
         ## Top Complaint Theme\n\
         ## Top Delight Theme\n\
         ## Recommended Action\n\n\
         Do not include the raw review data or individual reviews in the \
         report.\n\n\
         Reviews (JSON):\n{data}"
    )
}
