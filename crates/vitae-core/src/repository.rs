//! The generic record repository.
//!
//! One implementation serves every [`EntityKind`]; the kind's schema
//! descriptor supplies the differences. The repository owns the record-model
//! invariants the store does not: it mints ids, computes the next
//! `display_order`, stamps timestamps, and wraps every backend failure in
//! [`Error::Storage`].

use crate::{
  Error, Operation, Result, now_millis,
  kind::EntityKind,
  record::{OwnerId, Record, RecordFields, RecordId},
  store::PortfolioStore,
};

/// Owner-scoped CRUD over any kind, backed by `S`.
pub struct Repository<'s, S> {
  store: &'s S,
}

impl<'s, S: PortfolioStore> Repository<'s, S> {
  pub fn new(store: &'s S) -> Self { Self { store } }

  /// All of `owner`'s records of `kind`, in display order. Empty, never an
  /// error, when the owner has none.
  pub async fn list(&self, owner: &OwnerId, kind: EntityKind) -> Result<Vec<Record>> {
    self
      .store
      .list_records(owner, kind)
      .await
      .map_err(storage(kind, Operation::List))
  }

  /// Persist a new record and return its freshly minted id.
  ///
  /// Ordered kinds get `max(display_order) + 1`, or `1` for the owner's
  /// first record. The max lookup and the insert are separate calls, so two
  /// concurrent creates may land on the same order value.
  pub async fn create(
    &self,
    owner: &OwnerId,
    kind: EntityKind,
    fields: RecordFields,
  ) -> Result<RecordId> {
    let display_order = if kind.is_ordered() {
      let max = self
        .store
        .max_display_order(owner, kind)
        .await
        .map_err(storage(kind, Operation::Create))?;
      Some(next_display_order(max))
    } else {
      None
    };

    let now = now_millis();
    let record = Record {
      id: RecordId::generate(),
      owner_id: owner.clone(),
      fields: normalise(kind, fields),
      display_order,
      created_at: now,
      updated_at: now,
    };
    let id = record.id.clone();

    self
      .store
      .insert_record(kind, record)
      .await
      .map_err(storage(kind, Operation::Create))?;

    tracing::debug!(%owner, %kind, %id, ?display_order, "record created");
    Ok(id)
  }

  /// Replace every field of the record matching `id` and `owner`.
  ///
  /// Returns the number of rows affected. Zero means no such record for this
  /// owner and is not an error.
  pub async fn update(
    &self,
    owner: &OwnerId,
    kind: EntityKind,
    id: &RecordId,
    fields: RecordFields,
  ) -> Result<usize> {
    let affected = self
      .store
      .update_record(owner, kind, id, normalise(kind, fields), now_millis())
      .await
      .map_err(storage(kind, Operation::Update))?;
    if affected == 0 {
      tracing::debug!(%owner, %kind, %id, "update matched no record");
    }
    Ok(affected)
  }

  /// Delete the record matching `id` and `owner`. Zero rows is not an error.
  pub async fn delete(
    &self,
    owner: &OwnerId,
    kind: EntityKind,
    id: &RecordId,
  ) -> Result<usize> {
    self
      .store
      .delete_record(owner, kind, id)
      .await
      .map_err(storage(kind, Operation::Delete))
  }
}

/// `max + 1`, treating a missing or zero maximum as "start at 1".
pub fn next_display_order(max: Option<i64>) -> i64 { max.unwrap_or(0).max(0) + 1 }

/// Keep only `kind`'s columns, filling absent ones with `NULL`.
fn normalise(kind: EntityKind, fields: RecordFields) -> RecordFields {
  let mut out = RecordFields::new();
  for (column, value) in kind.schema().columns().zip(fields.values_for(kind)) {
    out.set(column, value);
  }
  out
}

/// Adapter turning a backend error into [`Error::Storage`], logging it on the
/// way through.
pub(crate) fn storage<E>(
  kind: EntityKind,
  operation: Operation,
) -> impl FnOnce(E) -> Error
where
  E: std::error::Error + Send + Sync + 'static,
{
  move |e| {
    tracing::error!(%kind, %operation, error = %e, "storage call failed");
    Error::Storage { kind, operation, source: Box::new(e) }
  }
}
