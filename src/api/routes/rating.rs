use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::{ApiError, ApiJson};
use crate::calculate::{RatingForm, RatingInputs};
use crate::scrape::EventWeightSource;

#[derive(Debug, Serialize)]
pub struct CalcEventResponse {
    pub result: f64,
    pub inputs: RatingInputs,
}

pub async fn calc_event(
    ApiJson(form): ApiJson<RatingForm>,
) -> Result<Json<CalcEventResponse>, ApiError> {
    let inputs = form.parse().map_err(|e| {
        debug!("Rejected rating form: {}", e);
        ApiError::BadRequest(e.user_message().to_string())
    })?;

    Ok(Json(CalcEventResponse {
        result: inputs.rate(),
        inputs,
    }))
}

#[derive(Debug, Deserialize)]
pub struct EventWeightParams {
    pub id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct EventWeightResponse {
    pub event_id: String,
    pub weight: Option<f64>,
}

pub async fn event_weight(
    State(state): State<AppState>,
    Query(params): Query<EventWeightParams>,
) -> Result<Json<EventWeightResponse>, ApiError> {
    let event_id = params
        .id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Missing id".to_string()))?;

    let weight = state
        .source
        .fetch_event_weight(event_id)
        .await
        .map_err(|e| ApiError::Upstream(e.to_string()))?;

    Ok(Json(EventWeightResponse {
        event_id: event_id.to_string(),
        weight,
    }))
}
