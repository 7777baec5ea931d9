//! Handlers for `/posts`.
//!
//! | Method   | Path          | Notes |
//! |----------|---------------|-------|
//! | `GET`    | `/posts`      | Every post, newest first, with author details |
//! | `POST`   | `/posts`      | Body: `{content, imageUrl}`; returns `{success, id}` |
//! | `DELETE` | `/posts/{id}` | Only the author's own posts; success regardless |

use axum::{
  Json,
  extract::{Path, State},
};
use serde_json::{Value, json};
use vitae_core::{
  RecordId,
  activity::{NewPost, Post, PostView},
  now_secs,
  store::PortfolioStore,
};

use crate::{
  ApiState,
  auth::CurrentOwner,
  error::{ApiError, JsonBody},
};

/// `GET /posts`
pub async fn list<S>(
  State(state): State<ApiState<S>>,
) -> Result<Json<Vec<PostView>>, ApiError>
where
  S: PortfolioStore + 'static,
{
  let posts = state.store.list_posts().await.map_err(ApiError::store)?;
  Ok(Json(posts))
}

/// `POST /posts`
pub async fn create<S>(
  State(state): State<ApiState<S>>,
  CurrentOwner(owner): CurrentOwner,
  JsonBody(body): JsonBody<NewPost>,
) -> Result<Json<Value>, ApiError>
where
  S: PortfolioStore + 'static,
{
  let post = Post {
    id:         RecordId::generate(),
    user_id:    owner.id,
    content:    body.content,
    image_url:  body.image_url,
    created_at: now_secs(),
  };
  let id = post.id.clone();

  state.store.insert_post(post).await.map_err(ApiError::store)?;
  tracing::debug!(%id, "post created");
  Ok(Json(json!({ "success": true, "id": id })))
}

/// `DELETE /posts/{id}`
pub async fn delete_one<S>(
  State(state): State<ApiState<S>>,
  CurrentOwner(owner): CurrentOwner,
  Path(id): Path<String>,
) -> Result<Json<Value>, ApiError>
where
  S: PortfolioStore + 'static,
{
  state
    .store
    .delete_post(&owner.id, &RecordId::from(id))
    .await
    .map_err(ApiError::store)?;
  Ok(Json(json!({ "success": true })))
}
