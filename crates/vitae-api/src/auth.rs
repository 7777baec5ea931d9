//! Request principal resolution and `POST /auth/login`.

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use axum::{
  Json,
  extract::{FromRequestParts, State},
  http::{header, request::Parts},
};
use serde::Deserialize;
use serde_json::{Value, json};
use vitae_core::{auth::Principal, store::PortfolioStore};

use crate::{
  ApiState,
  error::{ApiError, JsonBody},
};

/// The principal behind the current request, as resolved by the configured
/// authenticator.
pub struct CurrentOwner(pub Principal);

impl<S> FromRequestParts<ApiState<S>> for CurrentOwner
where
  S: PortfolioStore + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &ApiState<S>,
  ) -> Result<Self, Self::Rejection> {
    let credential = parts
      .headers
      .get(header::AUTHORIZATION)
      .and_then(|v| v.to_str().ok());
    state
      .auth
      .resolve(credential)
      .map(CurrentOwner)
      .ok_or_else(|| ApiError::Unauthorized("Unauthorized".into()))
  }
}

/// Check `password` against an argon2 PHC string.
pub fn verify_password(password: &str, phc: &str) -> bool {
  let Ok(parsed) = PasswordHash::new(phc) else {
    tracing::warn!("stored password hash is not a valid PHC string");
    return false;
  };
  Argon2::default()
    .verify_password(password.as_bytes(), &parsed)
    .is_ok()
}

// ─── Login ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LoginBody {
  pub username: Option<String>,
  pub password: Option<String>,
}

/// `POST /auth/login` — body: `{"username":"...","password":"..."}`
///
/// `username` may also be an email address.
pub async fn login<S>(
  State(state): State<ApiState<S>>,
  JsonBody(body): JsonBody<LoginBody>,
) -> Result<Json<Value>, ApiError>
where
  S: PortfolioStore + 'static,
{
  let username = body.username.unwrap_or_default();
  let password = body.password.unwrap_or_default();
  if username.is_empty() || password.is_empty() {
    return Err(ApiError::BadRequest("Username and password required".into()));
  }

  if let Some(principal) = state.auth.bypass(&username) {
    tracing::info!(%username, "login bypassed password check");
    return Ok(Json(json!({ "success": true, "user": principal })));
  }

  let user = state
    .store
    .find_user(&username)
    .await
    .map_err(ApiError::store)?;

  match user {
    Some(user) if verify_password(&password, &user.password_hash) => {
      tracing::info!(%username, "login succeeded");
      Ok(Json(json!({ "success": true, "user": user.principal() })))
    }
    _ => {
      tracing::info!(%username, "login rejected");
      Err(ApiError::Unauthorized("Invalid credentials".into()))
    }
  }
}

#[cfg(test)]
mod tests {
  use argon2::{PasswordHasher, password_hash::SaltString};
  use axum::http::StatusCode;
  use rand_core::OsRng;
  use serde_json::json;
  use vitae_core::{OwnerId, auth::User};

  use super::*;
  use crate::testing::{json as body_json, send, state};

  fn hash(password: &str) -> String {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
      .hash_password(password.as_bytes(), &salt)
      .unwrap()
      .to_string()
  }

  async fn with_user() -> ApiState<vitae_store_sqlite::SqliteStore> {
    let state = state().await;
    state
      .store
      .insert_user(User {
        id:            OwnerId::from("u-2"),
        username:      "carol".into(),
        email:         Some("carol@example.com".into()),
        password_hash: hash("hunter2"),
        created_at:    0,
      })
      .await
      .unwrap();
    state
  }

  #[test]
  fn verify_password_round_trip() {
    let phc = hash("secret");
    assert!(verify_password("secret", &phc));
    assert!(!verify_password("wrong", &phc));
    assert!(!verify_password("secret", "not a hash"));
  }

  #[tokio::test]
  async fn bypass_username_skips_password_check() {
    let resp = send(
      state().await,
      "POST",
      "/auth/login",
      Some(json!({ "username": "owner", "password": "anything" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["user"]["id"], "owner-1");
  }

  #[tokio::test]
  async fn stored_user_logs_in_by_username_or_email() {
    for login in ["carol", "carol@example.com"] {
      let resp = send(
        with_user().await,
        "POST",
        "/auth/login",
        Some(json!({ "username": login, "password": "hunter2" })),
      )
      .await;
      assert_eq!(resp.status(), StatusCode::OK, "{login}");
      assert_eq!(body_json(resp).await["user"]["username"], "carol");
    }
  }

  #[tokio::test]
  async fn wrong_password_is_unauthorized() {
    let resp = send(
      with_user().await,
      "POST",
      "/auth/login",
      Some(json!({ "username": "carol", "password": "nope" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(resp).await["error"], "Invalid credentials");
  }

  #[tokio::test]
  async fn missing_password_is_bad_request() {
    for username in ["someone", "owner"] {
      let resp = send(
        state().await,
        "POST",
        "/auth/login",
        Some(json!({ "username": username })),
      )
      .await;
      assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{username}");
      assert_eq!(
        body_json(resp).await["error"],
        "Username and password required"
      );
    }
  }
}
