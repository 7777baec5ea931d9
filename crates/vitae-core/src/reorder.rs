//! The reorder coordinator.
//!
//! A reorder request names a table and the complete new sequence of record
//! ids. The coordinator validates the table against the reorderable kinds,
//! assigns each id its zero-based position, and submits every assignment to
//! the store as one batch.
//!
//! The id list is trusted verbatim: unknown ids update nothing, omitted ids
//! keep their old `display_order`, and a duplicated id ends up at its last
//! position.

use serde::{Deserialize, Serialize};

use crate::{
  Error, Operation, Result,
  kind::ReorderTarget,
  record::{OwnerId, RecordId},
  repository::storage,
  store::PortfolioStore,
};

/// One `SET display_order = position WHERE id = ? AND user_id = ?` statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderAssignment {
  pub id:       RecordId,
  pub position: i64,
}

/// How many statements of a batch the backend executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchReport {
  pub succeeded: usize,
  pub total:     usize,
}

impl BatchReport {
  pub fn complete(total: usize) -> Self { Self { succeeded: total, total } }

  pub fn is_complete(&self) -> bool { self.succeeded == self.total }
}

/// Assign each id its index in `ids`.
pub fn plan(ids: Vec<RecordId>) -> Vec<OrderAssignment> {
  ids
    .into_iter()
    .zip(0_i64..)
    .map(|(id, position)| OrderAssignment { id, position })
    .collect()
}

pub struct ReorderCoordinator<'s, S> {
  store: &'s S,
}

impl<'s, S: PortfolioStore> ReorderCoordinator<'s, S> {
  pub fn new(store: &'s S) -> Self { Self { store } }

  /// Rewrite `display_order` for `owner`'s records in `table` to follow
  /// `items`.
  ///
  /// Fails with [`Error::InvalidKind`] before any write when `table` is not
  /// reorderable, and with [`Error::PartialFailure`] when the backend
  /// executed only part of the batch.
  pub async fn reorder(
    &self,
    owner: &OwnerId,
    table: &str,
    items: Vec<RecordId>,
  ) -> Result<()> {
    let target = table.parse::<ReorderTarget>().inspect_err(|_| {
      tracing::warn!(%owner, table, "reorder rejected: invalid table");
    })?;

    tracing::info!(%owner, kind = %target, items = items.len(), "reordering");

    if items.is_empty() {
      return Ok(());
    }

    let report = self
      .store
      .apply_order_batch(owner, target, plan(items))
      .await
      .map_err(storage(target.kind(), Operation::Reorder))?;

    if !report.is_complete() {
      tracing::warn!(
        %owner,
        kind = %target,
        succeeded = report.succeeded,
        total = report.total,
        "reorder batch partially applied"
      );
      return Err(Error::PartialFailure {
        succeeded: report.succeeded,
        total:     report.total,
      });
    }

    Ok(())
  }
}
