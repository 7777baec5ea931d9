//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  extract::{FromRequest, Request},
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler. Every variant renders as a JSON
/// `{"error": ...}` body.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("{0}")]
  NotFound(String),

  #[error("{0}")]
  BadRequest(String),

  #[error("{0}")]
  Unauthorized(String),

  #[error("{succeeded} of {total} order updates applied")]
  PartialFailure { succeeded: usize, total: usize },

  #[error("{0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  pub fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    tracing::error!(error = %e, "store call failed");
    Self::Store(Box::new(e))
  }
}

impl From<vitae_core::Error> for ApiError {
  fn from(e: vitae_core::Error) -> Self {
    match e {
      vitae_core::Error::InvalidKind(_) => Self::BadRequest("Invalid table".into()),
      vitae_core::Error::PartialFailure { succeeded, total } => {
        Self::PartialFailure { succeeded, total }
      }
      vitae_core::Error::Ordering(m) => Self::BadRequest(m),
      vitae_core::Error::Storage { kind, operation, source } => {
        tracing::error!(%kind, %operation, error = %source, "store call failed");
        Self::Store(source)
      }
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let message = self.to_string();
    match self {
      ApiError::NotFound(_) => {
        (StatusCode::NOT_FOUND, Json(json!({ "error": message }))).into_response()
      }
      ApiError::BadRequest(_) => {
        (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
      }
      ApiError::Unauthorized(_) => {
        (StatusCode::UNAUTHORIZED, Json(json!({ "error": message }))).into_response()
      }
      ApiError::PartialFailure { succeeded, total } => (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": message, "succeeded": succeeded, "total": total })),
      )
        .into_response(),
      ApiError::Store(_) => (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": message })),
      )
        .into_response(),
    }
  }
}

// ─── JSON bodies ─────────────────────────────────────────────────────────────

/// [`Json`] whose rejections render as an `{"error": ...}` 400.
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
  T: DeserializeOwned,
  S: Send + Sync,
{
  type Rejection = ApiError;

  async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
    let Json(value) = Json::<T>::from_request(req, state)
      .await
      .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    Ok(Self(value))
  }
}
