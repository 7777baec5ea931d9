//! JSON REST API for Vitae.
//!
//! Exposes an axum [`Router`] backed by any
//! [`vitae_core::store::PortfolioStore`]. The owner of every request is
//! resolved once by the configured [`Authenticator`] and passed explicitly
//! into the repository and coordinator. TLS and transport concerns are the
//! caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", vitae_api::api_router(state))
//! ```

pub mod assets;
pub mod auth;
pub mod error;
pub mod posts;
pub mod profile;
pub mod records;
pub mod reorder;
pub mod views;

use std::sync::Arc;

use axum::{
  Router,
  extract::DefaultBodyLimit,
  routing::{delete, get, post, put},
};
use vitae_core::{auth::Authenticator, store::PortfolioStore};

pub use auth::CurrentOwner;
pub use error::{ApiError, JsonBody};

/// Default cap on `POST /upload` bodies.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

// ─── Application state ───────────────────────────────────────────────────────

/// Shared state threaded through all handlers.
pub struct ApiState<S> {
  pub store:            Arc<S>,
  pub auth:             Arc<dyn Authenticator>,
  pub max_upload_bytes: usize,
}

impl<S> ApiState<S> {
  pub fn new(store: Arc<S>, auth: Arc<dyn Authenticator>) -> Self {
    Self { store, auth, max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES }
  }

  pub fn with_max_upload_bytes(mut self, max: usize) -> Self {
    self.max_upload_bytes = max;
    self
  }
}

impl<S> Clone for ApiState<S> {
  fn clone(&self) -> Self {
    Self {
      store:            Arc::clone(&self.store),
      auth:             Arc::clone(&self.auth),
      max_upload_bytes: self.max_upload_bytes,
    }
  }
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type. Literal segments take priority over the `{kind}`
/// capture, so `/reorder` and friends never reach the record handlers.
pub fn api_router<S>(state: ApiState<S>) -> Router<()>
where
  S: PortfolioStore + 'static,
{
  let upload_limit = state.max_upload_bytes;

  Router::new()
    // Auth
    .route("/auth/login", post(auth::login::<S>))
    // Profile
    .route("/profile", get(profile::get_one::<S>).post(profile::upsert::<S>))
    // Posts
    .route("/posts", get(posts::list::<S>).post(posts::create::<S>))
    .route("/posts/{id}", delete(posts::delete_one::<S>))
    // Profile views
    .route(
      "/notifications/views",
      get(views::count::<S>).post(views::record::<S>),
    )
    // Blobs
    .route(
      "/upload",
      post(assets::upload::<S>).layer(DefaultBodyLimit::max(upload_limit)),
    )
    .route("/assets/{key}", get(assets::download::<S>))
    // Ordering
    .route("/reorder", post(reorder::handler::<S>))
    // Records, one route family for every kind
    .route("/{kind}", get(records::list::<S>).post(records::create::<S>))
    .route(
      "/{kind}/{id}",
      put(records::update::<S>).delete(records::delete_one::<S>),
    )
    .with_state(state)
}

#[cfg(test)]
pub(crate) mod testing {
  use std::sync::Arc;

  use axum::{
    body::Body,
    http::{Request, Response, header},
  };
  use serde_json::Value;
  use tower::ServiceExt as _;
  use vitae_core::{
    OwnerId,
    auth::{FixedPrincipal, Principal},
  };
  use vitae_store_sqlite::SqliteStore;

  use super::*;

  pub fn owner() -> Principal {
    Principal {
      id:       OwnerId::from("owner-1"),
      username: "owner".into(),
      email:    Some("owner@example.com".into()),
    }
  }

  pub async fn state() -> ApiState<SqliteStore> {
    let store = SqliteStore::open_in_memory().await.expect("in-memory store");
    ApiState::new(
      Arc::new(store),
      Arc::new(FixedPrincipal::new(owner(), vec!["owner".into()])),
    )
  }

  pub async fn send(
    state: ApiState<SqliteStore>,
    method: &str,
    uri: &str,
    body: Option<Value>,
  ) -> Response<Body> {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
      Some(v) => builder
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(v.to_string()))
        .unwrap(),
      None => builder.body(Body::empty()).unwrap(),
    };
    api_router(state).oneshot(req).await.unwrap()
  }

  pub async fn json(resp: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
      .await
      .unwrap();
    serde_json::from_slice(&bytes).unwrap()
  }
}
