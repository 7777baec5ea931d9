//! Blob upload and download.
//!
//! | Method | Path            | Notes |
//! |--------|-----------------|-------|
//! | `POST` | `/upload`       | multipart field `file`; returns `{key, url}` |
//! | `GET`  | `/assets/{key}` | Stored bytes with `Content-Type` and `ETag`; 404 if absent |

use axum::{
  Json,
  body::Body,
  extract::{Multipart, Path, State},
  http::{HeaderMap, HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use sha2::{Digest, Sha256};
use uuid::Uuid;
use vitae_core::{blob::Blob, now_millis, store::PortfolioStore};

use crate::{ApiState, error::ApiError};

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// Quoted SHA-256 hex digest of `data`.
pub fn compute_etag(data: &[u8]) -> String {
  format!("\"{}\"", hex::encode(Sha256::digest(data)))
}

/// `{uuid}-{filename}`, with path separators in the filename flattened.
fn blob_key(filename: &str) -> String {
  let name: String = filename
    .chars()
    .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
    .collect();
  if name.is_empty() {
    Uuid::new_v4().to_string()
  } else {
    format!("{}-{name}", Uuid::new_v4())
  }
}

// ─── Upload ──────────────────────────────────────────────────────────────────

/// `POST /upload`
pub async fn upload<S>(
  State(state): State<ApiState<S>>,
  mut multipart: Multipart,
) -> Result<Json<Value>, ApiError>
where
  S: PortfolioStore + 'static,
{
  while let Some(field) = multipart
    .next_field()
    .await
    .map_err(|e| ApiError::BadRequest(e.body_text()))?
  {
    if field.name() != Some("file") {
      continue;
    }

    let key = blob_key(field.file_name().unwrap_or_default());
    let content_type = field.content_type().map(str::to_owned);
    let data = field
      .bytes()
      .await
      .map_err(|e| ApiError::BadRequest(e.body_text()))?
      .to_vec();

    let blob = Blob {
      key: key.clone(),
      content_type,
      etag: compute_etag(&data),
      data,
      created_at: now_millis(),
    };
    let size = blob.data.len();
    state.store.put_blob(blob).await.map_err(ApiError::store)?;

    tracing::info!(%key, size, "blob uploaded");
    return Ok(Json(json!({ "key": key, "url": format!("/api/assets/{key}") })));
  }

  Err(ApiError::BadRequest("No file uploaded".into()))
}

// ─── Download ────────────────────────────────────────────────────────────────

/// `GET /assets/{key}`
///
/// Honours `If-None-Match` with a 304.
pub async fn download<S>(
  State(state): State<ApiState<S>>,
  Path(key): Path<String>,
  headers: HeaderMap,
) -> Result<Response, ApiError>
where
  S: PortfolioStore + 'static,
{
  let blob = state
    .store
    .get_blob(&key)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound("Not found".into()))?;

  let etag = HeaderValue::from_str(&blob.etag)
    .map_err(|_| ApiError::store(BadStoredHeader("etag")))?;

  let not_modified = headers
    .get(header::IF_NONE_MATCH)
    .is_some_and(|v| v.as_bytes() == etag.as_bytes());
  if not_modified {
    return Ok((StatusCode::NOT_MODIFIED, [(header::ETAG, etag)]).into_response());
  }

  let content_type = blob
    .content_type
    .as_deref()
    .and_then(|ct| HeaderValue::from_str(ct).ok())
    .unwrap_or(HeaderValue::from_static(FALLBACK_CONTENT_TYPE));

  Ok(
    (
      StatusCode::OK,
      [
        (header::CONTENT_TYPE, content_type),
        (header::ETAG, etag),
        (header::CONTENT_LENGTH, HeaderValue::from(blob.data.len())),
      ],
      Body::from(blob.data),
    )
      .into_response(),
  )
}

#[derive(Debug, thiserror::Error)]
#[error("stored {0} is not a valid header value")]
struct BadStoredHeader(&'static str);
