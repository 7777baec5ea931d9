//! SQL text generation and row decoding.
//!
//! Record statements are built from the static kind descriptors, so every
//! identifier interpolated into SQL comes from `vitae_core::kind` and never
//! from a request.

use vitae_core::{
  EntityKind, OwnerId, Record, RecordFields, RecordId,
  activity::{Post, PostView},
  auth::User,
  blob::Blob,
  profile::Profile,
};

use crate::{Error, Result};

// ─── Record statements ───────────────────────────────────────────────────────

fn column_list(kind: EntityKind) -> String {
  kind.schema().columns().collect::<Vec<_>>().join(", ")
}

/// `SELECT` for one owner's records. Columns come back as `id, user_id,
/// <fields…>, [display_order,] created_at, updated_at`.
pub fn select_records(kind: EntityKind) -> String {
  let schema = kind.schema();
  let direction = if schema.sort_desc { "DESC" } else { "ASC" };
  if kind.is_ordered() {
    format!(
      "SELECT id, user_id, {cols}, display_order, created_at, updated_at
       FROM {table} WHERE user_id = ?1
       ORDER BY display_order ASC, {sort} {direction}",
      cols = column_list(kind),
      table = kind.table(),
      sort = schema.sort_column,
    )
  } else {
    format!(
      "SELECT id, user_id, {cols}, created_at, updated_at
       FROM {table} WHERE user_id = ?1
       ORDER BY {sort} {direction}",
      cols = column_list(kind),
      table = kind.table(),
      sort = schema.sort_column,
    )
  }
}

pub fn max_display_order(kind: EntityKind) -> String {
  format!("SELECT MAX(display_order) FROM {} WHERE user_id = ?1", kind.table())
}

/// Parameters: `id, user_id, <fields…>, [display_order,] created_at,
/// updated_at`.
pub fn insert_record(kind: EntityKind) -> String {
  let mut names = vec!["id", "user_id"];
  names.extend(kind.schema().columns());
  if kind.is_ordered() {
    names.push("display_order");
  }
  names.extend(["created_at", "updated_at"]);

  let placeholders = (1..=names.len())
    .map(|i| format!("?{i}"))
    .collect::<Vec<_>>()
    .join(", ");
  format!(
    "INSERT INTO {} ({}) VALUES ({placeholders})",
    kind.table(),
    names.join(", ")
  )
}

/// Parameters: `<fields…>, updated_at, id, user_id`.
pub fn update_record(kind: EntityKind) -> String {
  let columns: Vec<_> = kind.schema().columns().collect();
  let n = columns.len();
  let sets = columns
    .iter()
    .enumerate()
    .map(|(i, c)| format!("{c} = ?{}", i + 1))
    .collect::<Vec<_>>()
    .join(", ");
  format!(
    "UPDATE {} SET {sets}, updated_at = ?{} WHERE id = ?{} AND user_id = ?{}",
    kind.table(),
    n + 1,
    n + 2,
    n + 3,
  )
}

pub fn delete_record(kind: EntityKind) -> String {
  format!("DELETE FROM {} WHERE id = ?1 AND user_id = ?2", kind.table())
}

pub fn set_display_order(kind: EntityKind) -> String {
  format!(
    "UPDATE {} SET display_order = ?1 WHERE id = ?2 AND user_id = ?3",
    kind.table()
  )
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read from one record row.
pub struct RawRecord {
  pub id:            String,
  pub user_id:       String,
  pub values:        Vec<Option<String>>,
  pub display_order: Option<i64>,
  pub created_at:    i64,
  pub updated_at:    i64,
}

impl RawRecord {
  /// Read a row produced by [`select_records`].
  pub fn read(kind: EntityKind, row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    let n = kind.schema().fields.len();
    let values = (0..n)
      .map(|i| row.get(2 + i))
      .collect::<rusqlite::Result<Vec<_>>>()?;
    let (display_order, ts) = if kind.is_ordered() {
      (Some(row.get(2 + n)?), 3 + n)
    } else {
      (None, 2 + n)
    };
    Ok(Self {
      id: row.get(0)?,
      user_id: row.get(1)?,
      values,
      display_order,
      created_at: row.get(ts)?,
      updated_at: row.get(ts + 1)?,
    })
  }

  pub fn into_record(self, kind: EntityKind) -> Record {
    let mut fields = RecordFields::new();
    for (column, value) in kind.schema().columns().zip(self.values) {
      fields.set(column, value);
    }
    Record {
      id: RecordId::from(self.id),
      owner_id: OwnerId::new(self.user_id),
      fields,
      display_order: self.display_order,
      created_at: self.created_at,
      updated_at: self.updated_at,
    }
  }
}

/// Raw values read from a `profiles` row.
pub struct RawProfile {
  pub user_id:    String,
  pub name:       Option<String>,
  pub headline:   Option<String>,
  pub location:   Option<String>,
  pub about:      Option<String>,
  pub photo_url:  Option<String>,
  pub banner_url: Option<String>,
  pub updated_at: i64,
}

impl RawProfile {
  pub fn into_profile(self) -> Profile {
    Profile {
      user_id:    OwnerId::new(self.user_id),
      name:       self.name,
      headline:   self.headline,
      location:   self.location,
      about:      self.about,
      photo_url:  self.photo_url,
      banner_url: self.banner_url,
      updated_at: self.updated_at,
    }
  }
}

/// Raw values read from a `posts` row joined with `users` and `profiles`.
pub struct RawPostView {
  pub id:         String,
  pub user_id:    String,
  pub content:    String,
  pub image_url:  Option<String>,
  pub created_at: i64,
  pub username:   Option<String>,
  pub name:       Option<String>,
  pub headline:   Option<String>,
  pub photo_url:  Option<String>,
}

impl RawPostView {
  pub fn into_view(self) -> PostView {
    PostView {
      post:      Post {
        id:         RecordId::from(self.id),
        user_id:    OwnerId::new(self.user_id),
        content:    self.content,
        image_url:  self.image_url,
        created_at: self.created_at,
      },
      username:  self.username,
      name:      self.name,
      headline:  self.headline,
      photo_url: self.photo_url,
    }
  }
}

/// Raw values read from a `users` row.
pub struct RawUser {
  pub id:            String,
  pub username:      String,
  pub email:         Option<String>,
  pub password_hash: String,
  pub created_at:    i64,
}

impl RawUser {
  pub fn into_user(self) -> User {
    User {
      id:            OwnerId::new(self.id),
      username:      self.username,
      email:         self.email,
      password_hash: self.password_hash,
      created_at:    self.created_at,
    }
  }
}

/// Raw values read from a `blobs` row.
pub struct RawBlob {
  pub key:          String,
  pub content_type: Option<String>,
  pub etag:         String,
  pub size:         i64,
  pub data:         Vec<u8>,
  pub created_at:   i64,
}

impl RawBlob {
  pub fn into_blob(self) -> Result<Blob> {
    if usize::try_from(self.size).ok() != Some(self.data.len()) {
      return Err(Error::Decode(format!(
        "blob {:?}: stored size {} does not match {} bytes",
        self.key,
        self.size,
        self.data.len()
      )));
    }
    Ok(Blob {
      key:          self.key,
      content_type: self.content_type,
      etag:         self.etag,
      data:         self.data,
      created_at:   self.created_at,
    })
  }
}

/// Convert a `COUNT(*)` result.
pub fn decode_count(n: i64) -> Result<u64> {
  u64::try_from(n).map_err(|_| Error::Decode(format!("negative count: {n}")))
}
