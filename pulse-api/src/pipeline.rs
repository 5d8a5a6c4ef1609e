//! Submission pipeline
//!
//! One submission moves through admission control, input validation, the
//! structured AI call, response validation, and persistence, in that
//! order. Every stage failure is terminal for the submission; nothing is
//! retried here. The rate-limiter lock is released before the AI and
//! persistence awaits begin.

use crate::db::append_review;
use crate::error::ApiError;
use crate::services::rate_limiter::Admission;
use crate::validate::{parse_analysis, validate_submission, AnalysisError, SubmitReviewRequest};
use crate::AppState;
use chrono::Utc;
use pulse_common::db::models::ReviewRecord;
use tracing::{debug, error, info, warn};

/// Run one submission through the full pipeline.
///
/// Returns the AI-generated reply text for the customer.
pub async fn process_submission(
    state: &AppState,
    client_id: &str,
    raw: &SubmitReviewRequest,
) -> Result<String, ApiError> {
    let now_ms = Utc::now().timestamp_millis();

    if let Admission::Denied { retry_after_secs } = state.limiter.admit(client_id, now_ms).await {
        info!(client_id, retry_after_secs, "Submission rate limited");
        return Err(ApiError::RateLimited { retry_after_secs });
    }

    let submission = validate_submission(raw).map_err(|messages| {
        debug!(?messages, "Submission failed validation");
        ApiError::InvalidInput(messages)
    })?;

    let analysis_raw = state
        .analyzer
        .analyze(submission.rating, &submission.text)
        .await
        .map_err(|e| {
            error!("AI analysis failed: {}", e);
            ApiError::AiUnavailable
        })?;

    let analysis = parse_analysis(&analysis_raw.raw).map_err(|e| {
        match &e {
            AnalysisError::Parse(detail) => {
                // Raw model output goes to the log only, never to the client.
                warn!(%detail, raw = %analysis_raw.raw, "AI response was not parseable");
            }
            AnalysisError::Schema(violations) => {
                warn!(?violations, "AI response violated the output schema");
            }
        }
        ApiError::BadAiOutput
    })?;

    let record = ReviewRecord {
        rating: submission.rating,
        review_text: submission.text,
        ai_response: analysis.reply_text.clone(),
        ai_summary: analysis.summary,
        ai_action: analysis.action,
        ai_sentiment: analysis.sentiment_score,
        ai_tags: analysis.tags,
        latency_ms: analysis_raw.latency_ms,
        created_at: now_ms,
    };

    let guid = append_review(&state.db, &record).await.map_err(|e| {
        error!("Failed to persist review record: {}", e);
        ApiError::Storage
    })?;

    info!(
        guid = %guid,
        rating = record.rating,
        sentiment = record.ai_sentiment,
        latency_ms = record.latency_ms,
        "Review processed and stored"
    );

    Ok(analysis.reply_text)
}
