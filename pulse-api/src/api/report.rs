//! Report generation endpoint

use axum::{extract::State, Json};
use serde::Serialize;
use tracing::error;

use crate::error::{ApiError, ApiResult};
use crate::services::reporting::{self, ReportError};
use crate::AppState;

/// Success response for POST /generate-report
#[derive(Debug, Serialize)]
pub struct ReportResponse {
    /// Markdown report text
    pub report: String,
}

/// POST /generate-report
///
/// Aggregates the most recent reviews into a narrative markdown report.
pub async fn generate_report(State(state): State<AppState>) -> ApiResult<Json<ReportResponse>> {
    match reporting::generate_report(&state.db, state.analyzer.as_ref()).await {
        Ok(report) => Ok(Json(ReportResponse { report })),
        Err(ReportError::NoData) => Err(ApiError::NoReportData),
        Err(e) => {
            error!("Report generation failed: {}", e);
            Err(ApiError::ReportFailed)
        }
    }
}
