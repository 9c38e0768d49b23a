//! Axum route handlers for the Campaign API.

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde_json::Value;

use crate::campaign::generator::generate_campaign;
use crate::campaign::models::CampaignRequest;
use crate::campaign::schema::CampaignResponse;
use crate::errors::AppError;
use crate::state::AppState;

/// POST /api/generate
///
/// Validates the campaign parameters, makes one completion call, and returns
/// the normalized asset bundle. Invalid requests never reach the provider.
pub async fn handle_generate(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<CampaignResponse>, AppError> {
    let Json(body) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let request = CampaignRequest::from_value(&body)?;

    let response = generate_campaign(state.provider.as_ref(), &state.settings, &request).await?;

    Ok(Json(response))
}
