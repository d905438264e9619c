use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use crate::aggregate::{team_report, TeamReport};
use crate::api::state::AppState;
use crate::api::{ApiError, ApiJson};
use crate::calculate::FormField;

pub const MISSING_TEAM_MESSAGE: &str = "Please provide a team ID (e.g., 123456).";

/// Team lookup request.
///
/// `top_n` falls back to the configured default when missing or not an
/// integer, and negative values select nothing. `include_hosted` follows
/// checkbox semantics, so `"on"` and `true` both enable it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TeamRequest {
    #[serde(default)]
    pub team_id: Option<String>,
    #[serde(default)]
    pub top_n: Option<FormField>,
    #[serde(default)]
    pub include_hosted: Option<FormField>,
    #[serde(default)]
    pub event_id: Option<String>,
}

impl TeamRequest {
    pub fn top_n(&self, default_top_n: i64) -> i64 {
        self.top_n
            .as_ref()
            .and_then(|v| v.as_text().parse::<i64>().ok())
            .unwrap_or(default_top_n)
            .max(0)
    }

    pub fn include_hosted(&self) -> bool {
        self.include_hosted
            .as_ref()
            .is_some_and(FormField::is_truthy)
    }

    pub fn team_id(&self) -> Option<&str> {
        self.team_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }
}

pub async fn team_events(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<TeamRequest>,
) -> Result<Json<TeamReport>, ApiError> {
    let team_id = request
        .team_id()
        .ok_or_else(|| ApiError::BadRequest(MISSING_TEAM_MESSAGE.to_string()))?;
    let top_n = request.top_n(state.config.ranking.default_top_n);

    let report = team_report(
        state.source.as_ref(),
        team_id,
        top_n,
        request.event_id.as_deref(),
        request.include_hosted(),
    )
    .await
    .map_err(|e| ApiError::Upstream(format!("Failed to fetch team data: {}", e)))?;

    Ok(Json(report))
}
