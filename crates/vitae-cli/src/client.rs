//! Async HTTP client wrapping the vitae JSON API.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use reqwest::{Client, Response};
use serde_json::{Value, json};
use vitae_core::{EntityKind, Record, RecordId, ReorderTarget};

/// Connection settings for the vitae API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
  /// Sent verbatim as the `Authorization` header when set.
  pub token:    Option<String>,
}

/// Async HTTP client for the vitae JSON REST API.
///
/// Wraps a [`reqwest::Client`], which is `Arc`-based inside.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!("{}/api{}", self.config.base_url.trim_end_matches('/'), path)
  }

  fn auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
    match &self.config.token {
      Some(token) => req.header(reqwest::header::AUTHORIZATION, token),
      None => req,
    }
  }

  /// Turn a non-2xx response into an error carrying the server's `{error}`
  /// message.
  async fn check(what: &str, resp: Response) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
      return Ok(resp);
    }
    let message = resp
      .json::<Value>()
      .await
      .ok()
      .and_then(|v| v.get("error").and_then(Value::as_str).map(str::to_owned))
      .unwrap_or_default();
    Err(anyhow!("{what} → {status} {message}"))
  }

  // ── Records ───────────────────────────────────────────────────────────────

  /// `GET /api/{kind}`
  pub async fn list(&self, kind: EntityKind) -> Result<Vec<Record>> {
    let what = format!("GET /{kind}");
    let resp = self
      .auth(self.client.get(self.url(&format!("/{kind}"))))
      .send()
      .await
      .with_context(|| format!("{what} failed"))?;
    Self::check(&what, resp)
      .await?
      .json()
      .await
      .with_context(|| format!("deserialising {kind}"))
  }

  /// `DELETE /api/{kind}/{id}`
  pub async fn delete(&self, kind: EntityKind, id: &RecordId) -> Result<()> {
    let what = format!("DELETE /{kind}/{id}");
    let resp = self
      .auth(self.client.delete(self.url(&format!("/{kind}/{id}"))))
      .send()
      .await
      .with_context(|| format!("{what} failed"))?;
    Self::check(&what, resp).await?;
    Ok(())
  }

  // ── Ordering ──────────────────────────────────────────────────────────────

  /// `POST /api/reorder`
  pub async fn reorder(&self, target: ReorderTarget, items: &[RecordId]) -> Result<()> {
    let resp = self
      .auth(self.client.post(self.url("/reorder")))
      .json(&json!({ "table": target.to_string(), "items": items }))
      .send()
      .await
      .context("POST /reorder failed")?;
    Self::check("POST /reorder", resp).await?;
    Ok(())
  }
}
