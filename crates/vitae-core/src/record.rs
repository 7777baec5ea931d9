//! Records: one row of a kind's table.
//!
//! A record is an owner-scoped bag of free-form text fields plus the
//! bookkeeping columns every kind shares (`id`, `user_id`, `display_order`,
//! `created_at`, `updated_at`). Kind-specific fields are never validated;
//! absent fields are stored as `NULL`.

use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::kind::EntityKind;

// ─── Identifiers ─────────────────────────────────────────────────────────────

/// Opaque record identifier. Minted as a UUID v4 at creation, but any string
/// is accepted on the wire so that unknown ids can be passed through verbatim.
#[derive(
  Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
  pub fn new(id: impl Into<String>) -> Self { Self(id.into()) }

  /// Mint a fresh, globally unique identifier.
  pub fn generate() -> Self { Self(Uuid::new_v4().hyphenated().to_string()) }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for RecordId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

impl From<&str> for RecordId {
  fn from(s: &str) -> Self { Self(s.to_owned()) }
}

impl From<String> for RecordId {
  fn from(s: String) -> Self { Self(s) }
}

/// The principal that owns a record. Every read and write is scoped by it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(String);

impl OwnerId {
  pub fn new(id: impl Into<String>) -> Self { Self(id.into()) }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for OwnerId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

impl From<&str> for OwnerId {
  fn from(s: &str) -> Self { Self(s.to_owned()) }
}

// ─── Fields ──────────────────────────────────────────────────────────────────

/// Kind-specific column values keyed by column name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordFields(BTreeMap<String, Option<String>>);

impl RecordFields {
  pub fn new() -> Self { Self::default() }

  /// Builder-style setter for a present value.
  pub fn with(mut self, column: &str, value: impl Into<String>) -> Self {
    self.0.insert(column.to_owned(), Some(value.into()));
    self
  }

  pub fn set(&mut self, column: &str, value: Option<String>) {
    self.0.insert(column.to_owned(), value);
  }

  /// The value of `column`, or `None` if absent or `NULL`.
  pub fn get(&self, column: &str) -> Option<&str> {
    self.0.get(column).and_then(|v| v.as_deref())
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
    self.0.iter().map(|(k, v)| (k.as_str(), v.as_deref()))
  }

  /// Pick `kind`'s fields out of a camelCase request body.
  ///
  /// Strings are taken as-is, `null` and missing keys become `NULL`, and any
  /// other JSON value is stored as its JSON text. Unknown keys are ignored.
  pub fn from_body(
    kind: EntityKind,
    body: &serde_json::Map<String, serde_json::Value>,
  ) -> Self {
    let mut fields = Self::new();
    for spec in kind.schema().fields {
      let value = match body.get(spec.key) {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(s.clone()),
        Some(other) => Some(other.to_string()),
      };
      fields.set(spec.column, value);
    }
    fields
  }

  /// Values for every column of `kind`, in schema order. Columns not present
  /// in `self` come back as `None`, so an update replaces every field.
  pub fn values_for(&self, kind: EntityKind) -> Vec<Option<String>> {
    kind
      .schema()
      .columns()
      .map(|c| self.get(c).map(str::to_owned))
      .collect()
  }
}

// ─── Record ──────────────────────────────────────────────────────────────────

/// A stored record, serialised as the raw snake_case row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
  pub id:            RecordId,
  #[serde(rename = "user_id")]
  pub owner_id:      OwnerId,
  #[serde(flatten)]
  pub fields:        RecordFields,
  /// `None` for kinds without a `display_order` column.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub display_order: Option<i64>,
  /// Epoch milliseconds; set by the repository.
  pub created_at:    i64,
  pub updated_at:    i64,
}

impl Record {
  /// The headline value for display, per the kind's schema.
  pub fn title(&self, kind: EntityKind) -> &str {
    self.fields.get(kind.schema().title).unwrap_or_default()
  }

  pub fn subtitle(&self, kind: EntityKind) -> Option<&str> {
    kind.schema().subtitle.and_then(|c| self.fields.get(c))
  }
}
