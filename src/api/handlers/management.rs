/*
 * Responsibility
 * - GET /management/security-metrics (admin only)
 */
use axum::{Json, extract::State};
use serde::Serialize;

use crate::services::metrics::InvalidTokenCounts;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityMetricsResponse {
    pub invalid_tokens: InvalidTokenCounts,
    pub total: u64,
}

pub async fn security_metrics(State(state): State<AppState>) -> Json<SecurityMetricsResponse> {
    let invalid_tokens = state.meters.snapshot();
    Json(SecurityMetricsResponse {
        total: invalid_tokens.total(),
        invalid_tokens,
    })
}
