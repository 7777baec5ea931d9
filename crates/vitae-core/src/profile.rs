//! The profile header: one row per owner.

use serde::{Deserialize, Serialize};

use crate::record::OwnerId;

/// The stored profile header, serialised as its raw row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
  pub user_id:    OwnerId,
  pub name:       Option<String>,
  pub headline:   Option<String>,
  pub location:   Option<String>,
  pub about:      Option<String>,
  pub photo_url:  Option<String>,
  pub banner_url: Option<String>,
  /// Epoch milliseconds.
  pub updated_at: i64,
}

/// Body of `POST /profile`; every field is replaced on upsert.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
  pub name:       Option<String>,
  pub headline:   Option<String>,
  pub location:   Option<String>,
  pub about:      Option<String>,
  pub photo_url:  Option<String>,
  pub banner_url: Option<String>,
}
