//! Feed posts and profile-view counts.

use serde::{Deserialize, Serialize};

use crate::record::{OwnerId, RecordId};

// ─── Posts ───────────────────────────────────────────────────────────────────

/// A feed post. `created_at` is in epoch seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
  pub id:         RecordId,
  pub user_id:    OwnerId,
  pub content:    String,
  pub image_url:  Option<String>,
  pub created_at: i64,
}

/// Body of `POST /posts`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPost {
  #[serde(default)]
  pub content:   String,
  pub image_url: Option<String>,
}

/// A post joined with its author's username and profile header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostView {
  #[serde(flatten)]
  pub post:      Post,
  pub username:  Option<String>,
  pub name:      Option<String>,
  pub headline:  Option<String>,
  pub photo_url: Option<String>,
}

// ─── Profile views ───────────────────────────────────────────────────────────

/// Look-back window for profile-view counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ViewRange {
  #[serde(rename = "7d")]
  Week,
  #[serde(rename = "30d")]
  Month,
  #[serde(rename = "90d")]
  Quarter,
}

impl ViewRange {
  /// Parse a `range` query value. Absent or empty means `7d`; unrecognised
  /// values fall back to `90d`.
  pub fn parse(raw: Option<&str>) -> Self {
    match raw {
      None | Some("" | "7d") => Self::Week,
      Some("30d") => Self::Month,
      Some(_) => Self::Quarter,
    }
  }

  pub fn as_str(self) -> &'static str {
    match self {
      Self::Week => "7d",
      Self::Month => "30d",
      Self::Quarter => "90d",
    }
  }

  pub fn seconds(self) -> i64 {
    const DAY: i64 = 24 * 60 * 60;
    match self {
      Self::Week => 7 * DAY,
      Self::Month => 30 * DAY,
      Self::Quarter => 90 * DAY,
    }
  }

  /// Epoch-second lower bound for a count taken at `now`.
  pub fn since(self, now: i64) -> i64 { now - self.seconds() }
}
