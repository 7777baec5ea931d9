//! Handlers for the per-kind record endpoints.
//!
//! | Method   | Path           | Notes |
//! |----------|----------------|-------|
//! | `GET`    | `/{kind}`      | Raw rows, in display order |
//! | `POST`   | `/{kind}`      | camelCase body; returns `{success, id}` |
//! | `PUT`    | `/{kind}/{id}` | Full replace; success whether or not a row matched |
//! | `DELETE` | `/{kind}/{id}` | Success whether or not a row matched |
//!
//! `{kind}` is one of `experiences`, `education`, `certifications`,
//! `projects`, `publications`, `skills`; anything else is a 404.

use axum::{
  Json,
  extract::{Path, State},
};
use serde_json::{Map, Value, json};
use vitae_core::{
  EntityKind, Record, RecordFields, RecordId, repository::Repository,
  store::PortfolioStore,
};

use crate::{
  ApiState,
  auth::CurrentOwner,
  error::{ApiError, JsonBody},
};

fn parse_kind(raw: &str) -> Result<EntityKind, ApiError> {
  raw
    .parse()
    .map_err(|_| ApiError::NotFound(format!("unknown record kind: {raw}")))
}

// ─── List ────────────────────────────────────────────────────────────────────

/// `GET /{kind}`
pub async fn list<S>(
  State(state): State<ApiState<S>>,
  CurrentOwner(owner): CurrentOwner,
  Path(kind): Path<String>,
) -> Result<Json<Vec<Record>>, ApiError>
where
  S: PortfolioStore + 'static,
{
  let kind = parse_kind(&kind)?;
  let records = Repository::new(state.store.as_ref())
    .list(&owner.id, kind)
    .await?;
  Ok(Json(records))
}

// ─── Create ──────────────────────────────────────────────────────────────────

/// `POST /{kind}` — body: the kind's fields, camelCase.
pub async fn create<S>(
  State(state): State<ApiState<S>>,
  CurrentOwner(owner): CurrentOwner,
  Path(kind): Path<String>,
  JsonBody(body): JsonBody<Map<String, Value>>,
) -> Result<Json<Value>, ApiError>
where
  S: PortfolioStore + 'static,
{
  let kind = parse_kind(&kind)?;
  let id = Repository::new(state.store.as_ref())
    .create(&owner.id, kind, RecordFields::from_body(kind, &body))
    .await?;
  Ok(Json(json!({ "success": true, "id": id })))
}

// ─── Update ──────────────────────────────────────────────────────────────────

/// `PUT /{kind}/{id}`
pub async fn update<S>(
  State(state): State<ApiState<S>>,
  CurrentOwner(owner): CurrentOwner,
  Path((kind, id)): Path<(String, String)>,
  JsonBody(body): JsonBody<Map<String, Value>>,
) -> Result<Json<Value>, ApiError>
where
  S: PortfolioStore + 'static,
{
  let kind = parse_kind(&kind)?;
  Repository::new(state.store.as_ref())
    .update(&owner.id, kind, &RecordId::from(id), RecordFields::from_body(kind, &body))
    .await?;
  Ok(Json(json!({ "success": true })))
}

// ─── Delete ──────────────────────────────────────────────────────────────────

/// `DELETE /{kind}/{id}`
pub async fn delete_one<S>(
  State(state): State<ApiState<S>>,
  CurrentOwner(owner): CurrentOwner,
  Path((kind, id)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError>
where
  S: PortfolioStore + 'static,
{
  let kind = parse_kind(&kind)?;
  Repository::new(state.store.as_ref())
    .delete(&owner.id, kind, &RecordId::from(id))
    .await?;
  Ok(Json(json!({ "success": true })))
}
