//! In-memory `PortfolioStore` used by this crate's unit tests.

use std::{
  cmp::Ordering,
  sync::{
    Mutex,
    atomic::{AtomicBool, AtomicUsize, Ordering as AtomicOrdering},
  },
};

use thiserror::Error;

use crate::{
  activity::{Post, PostView},
  auth::User,
  blob::Blob,
  kind::{EntityKind, ReorderTarget},
  profile::{Profile, ProfileUpdate},
  record::{OwnerId, Record, RecordFields, RecordId},
  reorder::{BatchReport, OrderAssignment},
  store::PortfolioStore,
};

#[derive(Debug, Error)]
#[error("injected failure")]
pub struct MemoryError;

#[derive(Default)]
pub struct MemoryStore {
  records:  Mutex<Vec<(EntityKind, Record)>>,
  fail:     AtomicBool,
  truncate: Mutex<Option<usize>>,
  batches:  AtomicUsize,
}

impl MemoryStore {
  /// Make the next store call fail.
  pub fn fail_next(&self) { self.fail.store(true, AtomicOrdering::SeqCst); }

  /// Make the next batch execute only its first `n` statements.
  pub fn truncate_next_batch(&self, n: usize) {
    *self.truncate.lock().unwrap() = Some(n);
  }

  pub fn batches_submitted(&self) -> usize { self.batches.load(AtomicOrdering::SeqCst) }

  pub fn display_order(&self, kind: EntityKind, id: &RecordId) -> Option<i64> {
    self
      .records
      .lock()
      .unwrap()
      .iter()
      .find(|(k, r)| *k == kind && &r.id == id)
      .and_then(|(_, r)| r.display_order)
  }

  fn check(&self) -> Result<(), MemoryError> {
    if self.fail.swap(false, AtomicOrdering::SeqCst) {
      Err(MemoryError)
    } else {
      Ok(())
    }
  }
}

fn compare(kind: EntityKind, a: &Record, b: &Record) -> Ordering {
  let schema = kind.schema();
  let by_date = a
    .fields
    .get(schema.sort_column)
    .cmp(&b.fields.get(schema.sort_column));
  let by_date = if schema.sort_desc { by_date.reverse() } else { by_date };
  a.display_order.cmp(&b.display_order).then(by_date)
}

impl PortfolioStore for MemoryStore {
  type Error = MemoryError;

  async fn list_records(&self, owner: &OwnerId, kind: EntityKind) -> Result<Vec<Record>, MemoryError> {
    self.check()?;
    let mut out: Vec<Record> = self
      .records
      .lock()
      .unwrap()
      .iter()
      .filter(|(k, r)| *k == kind && &r.owner_id == owner)
      .map(|(_, r)| r.clone())
      .collect();
    out.sort_by(|a, b| compare(kind, a, b));
    Ok(out)
  }

  async fn max_display_order(&self, owner: &OwnerId, kind: EntityKind) -> Result<Option<i64>, MemoryError> {
    self.check()?;
    Ok(
      self
        .records
        .lock()
        .unwrap()
        .iter()
        .filter(|(k, r)| *k == kind && &r.owner_id == owner)
        .filter_map(|(_, r)| r.display_order)
        .max(),
    )
  }

  async fn insert_record(&self, kind: EntityKind, record: Record) -> Result<(), MemoryError> {
    self.check()?;
    self.records.lock().unwrap().push((kind, record));
    Ok(())
  }

  async fn update_record(
    &self,
    owner: &OwnerId,
    kind: EntityKind,
    id: &RecordId,
    fields: RecordFields,
    updated_at: i64,
  ) -> Result<usize, MemoryError> {
    self.check()?;
    let mut records = self.records.lock().unwrap();
    let mut affected = 0;
    for (_, r) in records
      .iter_mut()
      .filter(|(k, r)| *k == kind && &r.id == id && &r.owner_id == owner)
    {
      r.fields = fields.clone();
      r.updated_at = updated_at;
      affected += 1;
    }
    Ok(affected)
  }

  async fn delete_record(&self, owner: &OwnerId, kind: EntityKind, id: &RecordId) -> Result<usize, MemoryError> {
    self.check()?;
    let mut records = self.records.lock().unwrap();
    let before = records.len();
    records.retain(|(k, r)| !(*k == kind && &r.id == id && &r.owner_id == owner));
    Ok(before - records.len())
  }

  async fn apply_order_batch(
    &self,
    owner: &OwnerId,
    target: ReorderTarget,
    assignments: Vec<OrderAssignment>,
  ) -> Result<BatchReport, MemoryError> {
    self.check()?;
    self.batches.fetch_add(1, AtomicOrdering::SeqCst);
    let total = assignments.len();
    let limit = self.truncate.lock().unwrap().take().unwrap_or(total);

    let mut records = self.records.lock().unwrap();
    for a in assignments.iter().take(limit) {
      for (_, r) in records.iter_mut().filter(|(k, r)| {
        *k == target.kind() && r.id == a.id && &r.owner_id == owner
      }) {
        r.display_order = Some(a.position);
      }
    }
    Ok(BatchReport { succeeded: limit.min(total), total })
  }

  async fn get_profile(&self, _: &OwnerId) -> Result<Option<Profile>, MemoryError> { Ok(None) }

  async fn upsert_profile(&self, _: &OwnerId, _: ProfileUpdate, _: i64) -> Result<(), MemoryError> {
    Ok(())
  }

  async fn list_posts(&self) -> Result<Vec<PostView>, MemoryError> { Ok(Vec::new()) }

  async fn insert_post(&self, _: Post) -> Result<(), MemoryError> { Ok(()) }

  async fn delete_post(&self, _: &OwnerId, _: &RecordId) -> Result<usize, MemoryError> { Ok(0) }

  async fn record_profile_view(&self, _: &OwnerId, _: i64) -> Result<(), MemoryError> { Ok(()) }

  async fn count_profile_views(&self, _: &OwnerId, _: i64) -> Result<u64, MemoryError> { Ok(0) }

  async fn find_user(&self, _: &str) -> Result<Option<User>, MemoryError> { Ok(None) }

  async fn insert_user(&self, _: User) -> Result<(), MemoryError> { Ok(()) }

  async fn put_blob(&self, _: Blob) -> Result<(), MemoryError> { Ok(()) }

  async fn get_blob(&self, _: &str) -> Result<Option<Blob>, MemoryError> { Ok(None) }
}
