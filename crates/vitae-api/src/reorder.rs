//! `POST /reorder` — rewrite one kind's display order in a single batch.

use axum::{Json, extract::State};
use serde::Deserialize;
use serde_json::{Value, json};
use vitae_core::{RecordId, reorder::ReorderCoordinator, store::PortfolioStore};

use crate::{
  ApiState,
  auth::CurrentOwner,
  error::{ApiError, JsonBody},
};

#[derive(Debug, Deserialize)]
pub struct ReorderBody {
  /// Table name of the kind being reordered.
  pub table: String,
  /// Every id of the kind, in the new order.
  #[serde(default)]
  pub items: Vec<RecordId>,
}

/// `POST /reorder` — body: `{"table":"projects","items":["id3","id1"]}`
///
/// 400 `{"error":"Invalid table"}` for a table outside the reorderable set;
/// 500 with `succeeded`/`total` when the store applied only part of the
/// batch.
pub async fn handler<S>(
  State(state): State<ApiState<S>>,
  CurrentOwner(owner): CurrentOwner,
  JsonBody(body): JsonBody<ReorderBody>,
) -> Result<Json<Value>, ApiError>
where
  S: PortfolioStore + 'static,
{
  ReorderCoordinator::new(state.store.as_ref())
    .reorder(&owner.id, &body.table, body.items)
    .await?;
  Ok(Json(json!({ "success": true })))
}
