//! HTTP-facing error taxonomy
//!
//! Rate limiting and input validation are user-actionable and carry
//! detail; everything that went wrong on our side of the fence maps to a
//! generic 500 string. Internal diagnostic detail stays in the log and is
//! never echoed back to the client.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Terminal pipeline and report outcomes surfaced over HTTP
#[derive(Debug, Error)]
pub enum ApiError {
    /// Submission denied by admission control (429)
    #[error("rate limited, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: i64 },

    /// Submission failed structural validation (400)
    #[error("invalid input")]
    InvalidInput(Vec<String>),

    /// The AI call failed or returned nothing (500)
    #[error("AI service unavailable")]
    AiUnavailable,

    /// The AI responded but its output failed parse or schema checks (500)
    #[error("AI output rejected")]
    BadAiOutput,

    /// Persisting the record failed (500)
    #[error("storage failure")]
    Storage,

    /// Report requested before any review exists (404)
    #[error("no reviews stored yet")]
    NoReportData,

    /// Report generation failed (500)
    #[error("report generation failed")]
    ReportFailed,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::RateLimited { retry_after_secs } => {
                let body = Json(json!({
                    "success": false,
                    "error": "Too many requests. Please wait before submitting another review.",
                    "retryAfterSec": retry_after_secs,
                }));
                let mut response = (StatusCode::TOO_MANY_REQUESTS, body).into_response();
                response
                    .headers_mut()
                    .insert(header::RETRY_AFTER, HeaderValue::from(retry_after_secs));
                response
            }
            ApiError::InvalidInput(details) => {
                let body = Json(json!({
                    "success": false,
                    "error": "Invalid input",
                    "details": details,
                }));
                (StatusCode::BAD_REQUEST, body).into_response()
            }
            ApiError::AiUnavailable => submit_failure("AI analysis service is unavailable"),
            ApiError::BadAiOutput => submit_failure("AI response could not be processed"),
            ApiError::Storage => submit_failure("Failed to save review"),
            ApiError::NoReportData => {
                let body = Json(json!({
                    "message": "No reviews available to generate a report.",
                }));
                (StatusCode::NOT_FOUND, body).into_response()
            }
            ApiError::ReportFailed => {
                let body = Json(json!({ "error": "Failed to generate report" }));
                (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
            }
        }
    }
}

fn submit_failure(message: &str) -> Response {
    let body = Json(json!({
        "success": false,
        "error": message,
    }));
    (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
