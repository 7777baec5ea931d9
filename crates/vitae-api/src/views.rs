//! Handlers for `/notifications/views`.

use axum::{
  Json,
  extract::{Query, State},
};
use serde::Deserialize;
use serde_json::{Value, json};
use vitae_core::{activity::ViewRange, now_secs, store::PortfolioStore};

use crate::{ApiState, auth::CurrentOwner, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct CountParams {
  pub range: Option<String>,
}

/// `GET /notifications/views[?range=7d|30d|90d]` → `{count, range}`
pub async fn count<S>(
  State(state): State<ApiState<S>>,
  CurrentOwner(owner): CurrentOwner,
  Query(params): Query<CountParams>,
) -> Result<Json<Value>, ApiError>
where
  S: PortfolioStore + 'static,
{
  let range = ViewRange::parse(params.range.as_deref());
  let count = state
    .store
    .count_profile_views(&owner.id, range.since(now_secs()))
    .await
    .map_err(ApiError::store)?;
  Ok(Json(json!({ "count": count, "range": range })))
}

/// `POST /notifications/views` — record one view of the owner's profile.
pub async fn record<S>(
  State(state): State<ApiState<S>>,
  CurrentOwner(owner): CurrentOwner,
) -> Result<Json<Value>, ApiError>
where
  S: PortfolioStore + 'static,
{
  state
    .store
    .record_profile_view(&owner.id, now_secs())
    .await
    .map_err(ApiError::store)?;
  Ok(Json(json!({ "success": true })))
}
