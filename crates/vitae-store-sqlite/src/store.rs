//! [`SqliteStore`] — the SQLite implementation of [`PortfolioStore`].

use std::path::Path;

use rusqlite::{OptionalExtension as _, types::Value};

use vitae_core::{
  EntityKind, OwnerId, Record, RecordFields, RecordId, ReorderTarget,
  activity::{Post, PostView},
  auth::User,
  blob::Blob,
  profile::{Profile, ProfileUpdate},
  reorder::{BatchReport, OrderAssignment},
  store::PortfolioStore,
};

use crate::{
  Error, Result,
  encode::{self, RawBlob, RawPostView, RawProfile, RawRecord, RawUser, decode_count},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Vitae store backed by a single SQLite file.
///
/// Clones share one background connection.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    tracing::debug!(path = %path.display(), "sqlite store opened");
    Ok(store)
  }

  /// Open a fresh in-memory store.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Column names of `table`, in declaration order.
  #[cfg(test)]
  pub(crate) async fn table_columns(&self, table: &'static str) -> Result<Vec<String>> {
    Ok(
      self
        .conn
        .call(move |conn| {
          let mut stmt = conn.prepare(&format!("PRAGMA table_info({table})"))?;
          let names = stmt
            .query_map([], |r| r.get::<_, String>(1))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
          Ok(names)
        })
        .await?,
    )
  }
}

fn text(value: Option<String>) -> Value { value.map_or(Value::Null, Value::Text) }

// ─── PortfolioStore impl ─────────────────────────────────────────────────────

impl PortfolioStore for SqliteStore {
  type Error = Error;

  // ── Records ───────────────────────────────────────────────────────────────

  async fn list_records(&self, owner: &OwnerId, kind: EntityKind) -> Result<Vec<Record>> {
    let sql = encode::select_records(kind);
    let owner = owner.as_str().to_owned();

    let raws: Vec<RawRecord> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params![owner], |r| RawRecord::read(kind, r))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(raws.into_iter().map(|r| r.into_record(kind)).collect())
  }

  async fn max_display_order(&self, owner: &OwnerId, kind: EntityKind) -> Result<Option<i64>> {
    if !kind.is_ordered() {
      return Ok(None);
    }
    let sql = encode::max_display_order(kind);
    let owner = owner.as_str().to_owned();

    Ok(
      self
        .conn
        .call(move |conn| {
          let max: Option<i64> =
            conn.query_row(&sql, rusqlite::params![owner], |r| r.get(0))?;
          Ok(max)
        })
        .await?,
    )
  }

  async fn insert_record(&self, kind: EntityKind, record: Record) -> Result<()> {
    let sql = encode::insert_record(kind);

    let mut values = vec![
      Value::Text(record.id.as_str().to_owned()),
      Value::Text(record.owner_id.as_str().to_owned()),
    ];
    values.extend(record.fields.values_for(kind).into_iter().map(text));
    if kind.is_ordered() {
      values.push(Value::Integer(record.display_order.unwrap_or(0)));
    }
    values.push(Value::Integer(record.created_at));
    values.push(Value::Integer(record.updated_at));

    self
      .conn
      .call(move |conn| {
        conn.execute(&sql, rusqlite::params_from_iter(values))?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn update_record(
    &self,
    owner: &OwnerId,
    kind: EntityKind,
    id: &RecordId,
    fields: RecordFields,
    updated_at: i64,
  ) -> Result<usize> {
    let sql = encode::update_record(kind);

    let mut values: Vec<Value> =
      fields.values_for(kind).into_iter().map(text).collect();
    values.push(Value::Integer(updated_at));
    values.push(Value::Text(id.as_str().to_owned()));
    values.push(Value::Text(owner.as_str().to_owned()));

    Ok(
      self
        .conn
        .call(move |conn| Ok(conn.execute(&sql, rusqlite::params_from_iter(values))?))
        .await?,
    )
  }

  async fn delete_record(&self, owner: &OwnerId, kind: EntityKind, id: &RecordId) -> Result<usize> {
    let sql = encode::delete_record(kind);
    let id = id.as_str().to_owned();
    let owner = owner.as_str().to_owned();

    Ok(
      self
        .conn
        .call(move |conn| Ok(conn.execute(&sql, rusqlite::params![id, owner])?))
        .await?,
    )
  }

  /// Runs every assignment inside one transaction, so the batch either
  /// applies completely or not at all.
  async fn apply_order_batch(
    &self,
    owner: &OwnerId,
    target: ReorderTarget,
    assignments: Vec<OrderAssignment>,
  ) -> Result<BatchReport> {
    let sql = encode::set_display_order(target.kind());
    let owner = owner.as_str().to_owned();
    let total = assignments.len();

    Ok(
      self
        .conn
        .call(move |conn| {
          let tx = conn.transaction()?;
          {
            let mut stmt = tx.prepare(&sql)?;
            for a in &assignments {
              stmt.execute(rusqlite::params![a.position, a.id.as_str(), owner])?;
            }
          }
          tx.commit()?;
          Ok(BatchReport::complete(total))
        })
        .await?,
    )
  }

  // ── Profile ───────────────────────────────────────────────────────────────

  async fn get_profile(&self, owner: &OwnerId) -> Result<Option<Profile>> {
    let owner = owner.as_str().to_owned();

    let raw: Option<RawProfile> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT user_id, name, headline, location, about, photo_url,
                      banner_url, updated_at
               FROM profiles WHERE user_id = ?1",
              rusqlite::params![owner],
              |r| {
                Ok(RawProfile {
                  user_id:    r.get(0)?,
                  name:       r.get(1)?,
                  headline:   r.get(2)?,
                  location:   r.get(3)?,
                  about:      r.get(4)?,
                  photo_url:  r.get(5)?,
                  banner_url: r.get(6)?,
                  updated_at: r.get(7)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    Ok(raw.map(RawProfile::into_profile))
  }

  async fn upsert_profile(
    &self,
    owner: &OwnerId,
    update: ProfileUpdate,
    updated_at: i64,
  ) -> Result<()> {
    let owner = owner.as_str().to_owned();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO profiles (
             user_id, name, headline, location, about, photo_url, banner_url,
             updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
           ON CONFLICT(user_id) DO UPDATE SET
             name       = excluded.name,
             headline   = excluded.headline,
             location   = excluded.location,
             about      = excluded.about,
             photo_url  = excluded.photo_url,
             banner_url = excluded.banner_url,
             updated_at = excluded.updated_at",
          rusqlite::params![
            owner,
            update.name,
            update.headline,
            update.location,
            update.about,
            update.photo_url,
            update.banner_url,
            updated_at,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Posts ─────────────────────────────────────────────────────────────────

  async fn list_posts(&self) -> Result<Vec<PostView>> {
    let raws: Vec<RawPostView> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT p.id, p.user_id, p.content, p.image_url, p.created_at,
                  u.username, pr.name, pr.headline, pr.photo_url
           FROM posts p
           LEFT JOIN users u     ON u.id = p.user_id
           LEFT JOIN profiles pr ON pr.user_id = p.user_id
           ORDER BY p.created_at DESC, p.rowid DESC",
        )?;
        let rows = stmt
          .query_map([], |r| {
            Ok(RawPostView {
              id:         r.get(0)?,
              user_id:    r.get(1)?,
              content:    r.get(2)?,
              image_url:  r.get(3)?,
              created_at: r.get(4)?,
              username:   r.get(5)?,
              name:       r.get(6)?,
              headline:   r.get(7)?,
              photo_url:  r.get(8)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(raws.into_iter().map(RawPostView::into_view).collect())
  }

  async fn insert_post(&self, post: Post) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO posts (id, user_id, content, image_url, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![
            post.id.as_str(),
            post.user_id.as_str(),
            post.content,
            post.image_url,
            post.created_at,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn delete_post(&self, owner: &OwnerId, id: &RecordId) -> Result<usize> {
    let id = id.as_str().to_owned();
    let owner = owner.as_str().to_owned();

    Ok(
      self
        .conn
        .call(move |conn| {
          Ok(conn.execute(
            "DELETE FROM posts WHERE id = ?1 AND user_id = ?2",
            rusqlite::params![id, owner],
          )?)
        })
        .await?,
    )
  }

  // ── Profile views ─────────────────────────────────────────────────────────

  async fn record_profile_view(&self, owner: &OwnerId, at: i64) -> Result<()> {
    let owner = owner.as_str().to_owned();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO profile_views (user_id, viewed_at) VALUES (?1, ?2)",
          rusqlite::params![owner, at],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn count_profile_views(&self, owner: &OwnerId, since: i64) -> Result<u64> {
    let owner = owner.as_str().to_owned();

    let n: i64 = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          "SELECT COUNT(*) FROM profile_views WHERE user_id = ?1 AND viewed_at >= ?2",
          rusqlite::params![owner, since],
          |r| r.get(0),
        )?)
      })
      .await?;

    decode_count(n)
  }

  // ── Users ─────────────────────────────────────────────────────────────────

  async fn find_user(&self, login: &str) -> Result<Option<User>> {
    let login = login.to_owned();

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT id, username, email, password_hash, created_at
               FROM users WHERE username = ?1 OR email = ?1
               LIMIT 1",
              rusqlite::params![login],
              |r| {
                Ok(RawUser {
                  id:            r.get(0)?,
                  username:      r.get(1)?,
                  email:         r.get(2)?,
                  password_hash: r.get(3)?,
                  created_at:    r.get(4)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    Ok(raw.map(RawUser::into_user))
  }

  async fn insert_user(&self, user: User) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO users (id, username, email, password_hash, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![
            user.id.as_str(),
            user.username,
            user.email,
            user.password_hash,
            user.created_at,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Blobs ─────────────────────────────────────────────────────────────────

  async fn put_blob(&self, blob: Blob) -> Result<()> {
    let size = i64::try_from(blob.data.len())
      .map_err(|_| Error::Decode(format!("blob {:?} too large", blob.key)))?;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT OR REPLACE INTO blobs (key, content_type, etag, size, data, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![
            blob.key,
            blob.content_type,
            blob.etag,
            size,
            blob.data,
            blob.created_at,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn get_blob(&self, key: &str) -> Result<Option<Blob>> {
    let key = key.to_owned();

    let raw: Option<RawBlob> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT key, content_type, etag, size, data, created_at
               FROM blobs WHERE key = ?1",
              rusqlite::params![key],
              |r| {
                Ok(RawBlob {
                  key:          r.get(0)?,
                  content_type: r.get(1)?,
                  etag:         r.get(2)?,
                  size:         r.get(3)?,
                  data:         r.get(4)?,
                  created_at:   r.get(5)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawBlob::into_blob).transpose()
  }
}
