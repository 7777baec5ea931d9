//! Handlers for `/profile`.
//!
//! | Method | Path       | Notes |
//! |--------|------------|-------|
//! | `GET`  | `/profile` | 404 if the owner has not saved one |
//! | `POST` | `/profile` | Upsert; every field is replaced |

use axum::{Json, extract::State};
use serde_json::{Value, json};
use vitae_core::{
  now_millis,
  profile::{Profile, ProfileUpdate},
  store::PortfolioStore,
};

use crate::{
  ApiState,
  auth::CurrentOwner,
  error::{ApiError, JsonBody},
};

/// `GET /profile`
pub async fn get_one<S>(
  State(state): State<ApiState<S>>,
  CurrentOwner(owner): CurrentOwner,
) -> Result<Json<Profile>, ApiError>
where
  S: PortfolioStore + 'static,
{
  let profile = state
    .store
    .get_profile(&owner.id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound("Profile not found".into()))?;
  Ok(Json(profile))
}

/// `POST /profile` — body: `{name, headline, location, about, photoUrl,
/// bannerUrl}`
pub async fn upsert<S>(
  State(state): State<ApiState<S>>,
  CurrentOwner(owner): CurrentOwner,
  JsonBody(update): JsonBody<ProfileUpdate>,
) -> Result<Json<Value>, ApiError>
where
  S: PortfolioStore + 'static,
{
  state
    .store
    .upsert_profile(&owner.id, update, now_millis())
    .await
    .map_err(ApiError::store)?;
  Ok(Json(json!({ "success": true })))
}
