//! Review submission endpoint

use axum::{
    extract::{ConnectInfo, State},
    http::HeaderMap,
    Json,
};
use serde::Serialize;
use std::net::SocketAddr;

use crate::error::ApiResult;
use crate::pipeline::process_submission;
use crate::validate::SubmitReviewRequest;
use crate::AppState;

/// Success response for POST /submit-review
#[derive(Debug, Serialize)]
pub struct SubmitReviewResponse {
    pub success: bool,
    /// The AI-generated reply shown to the customer
    pub message: String,
}

/// POST /submit-review
///
/// Runs one submission through the pipeline and returns the AI reply.
pub async fn submit_review(
    State(state): State<AppState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    Json(payload): Json<SubmitReviewRequest>,
) -> ApiResult<Json<SubmitReviewResponse>> {
    let client = client_id(&headers, connect_info.map(|ConnectInfo(addr)| addr));

    let message = process_submission(&state, &client, &payload).await?;

    Ok(Json(SubmitReviewResponse {
        success: true,
        message,
    }))
}

/// Derive the rate-limiting client identity from the request.
///
/// Order: first entry of `x-forwarded-for`, then `x-real-ip`, then the
/// peer socket address. Requests with none of these share one "unknown"
/// bucket; that coarsening is deliberate.
pub(crate) fn client_id(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    if let Some(forwarded) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
        if let Some(first) = forwarded.split(',').next() {
            let first = first.trim();
            if !first.is_empty() {
                return first.to_string();
            }
        }
    }

    if let Some(real_ip) = headers.get("x-real-ip").and_then(|v| v.to_str().ok()) {
        let real_ip = real_ip.trim();
        if !real_ip.is_empty() {
            return real_ip.to_string();
        }
    }

    if let Some(addr) = peer {
        return addr.ip().to_string();
    }

    "unknown".to_string()
}
