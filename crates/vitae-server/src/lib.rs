//! Wiring for the Vitae HTTP server: configuration, the single-owner
//! authenticator, and the top-level router.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
use axum::Router;
use rand_core::OsRng;
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use vitae_api::{ApiState, DEFAULT_MAX_UPLOAD_BYTES};
use vitae_core::{
  OwnerId, now_millis,
  auth::{FixedPrincipal, Principal, User},
  store::PortfolioStore,
};

// ─── Configuration ───────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `VITAE_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
  pub host:             String,
  pub port:             u16,
  pub store_path:       PathBuf,
  /// Principal every request resolves to.
  pub owner_id:         String,
  pub owner_username:   String,
  pub owner_email:      Option<String>,
  /// Usernames that log in without a password check.
  pub bypass_usernames: Vec<String>,
  pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:             "127.0.0.1".into(),
      port:             8787,
      store_path:       PathBuf::from("~/.local/share/vitae/vitae.db"),
      owner_id:         "owner".into(),
      owner_username:   "owner".into(),
      owner_email:      None,
      bypass_usernames: Vec::new(),
      max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
    }
  }
}

impl ServerConfig {
  pub fn principal(&self) -> Principal {
    Principal {
      id:       OwnerId::new(self.owner_id.clone()),
      username: self.owner_username.clone(),
      email:    self.owner_email.clone(),
    }
  }

  pub fn authenticator(&self) -> FixedPrincipal {
    FixedPrincipal::new(self.principal(), self.bypass_usernames.clone())
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// The full application: every API route under `/api`, with request tracing.
pub fn app<S>(store: Arc<S>, config: &ServerConfig) -> Router
where
  S: PortfolioStore + 'static,
{
  let state = ApiState::new(store, Arc::new(config.authenticator()))
    .with_max_upload_bytes(config.max_upload_bytes);

  Router::new()
    .nest("/api", vitae_api::api_router(state))
    .layer(TraceLayer::new_for_http())
}

// ─── Users ───────────────────────────────────────────────────────────────────

/// argon2 PHC string for `password`.
pub fn hash_password(password: &str) -> anyhow::Result<String> {
  let salt = SaltString::generate(&mut OsRng);
  Ok(
    Argon2::default()
      .hash_password(password.as_bytes(), &salt)
      .map_err(|e| anyhow::anyhow!("argon2 error: {e}"))?
      .to_string(),
  )
}

/// Store a new user with a hashed password. The user's id is its username.
pub async fn add_user<S>(
  store: &S,
  username: &str,
  email: Option<String>,
  password: &str,
) -> anyhow::Result<User>
where
  S: PortfolioStore,
{
  let user = User {
    id: OwnerId::new(username),
    username: username.to_owned(),
    email,
    password_hash: hash_password(password)?,
    created_at: now_millis(),
  };
  store
    .insert_user(user.clone())
    .await
    .with_context(|| format!("failed to add user {username:?}"))?;
  Ok(user)
}
