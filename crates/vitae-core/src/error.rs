//! Error types for `vitae-core`.

use strum::Display;
use thiserror::Error;

use crate::kind::EntityKind;

/// The repository or coordinator operation that was running when a storage
/// call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Operation {
  List,
  Create,
  Update,
  Delete,
  Reorder,
}

#[derive(Debug, Error)]
pub enum Error {
  /// The backing store call itself failed.
  #[error("storage error during {operation} on {kind}: {source}")]
  Storage {
    kind:      EntityKind,
    operation: Operation,
    #[source]
    source:    Box<dyn std::error::Error + Send + Sync>,
  },

  /// The reorder target does not name a reorderable kind.
  #[error("invalid table: {0:?}")]
  InvalidKind(String),

  /// The store executed only part of a reorder batch.
  #[error("reorder partially applied: {succeeded} of {total} updates succeeded")]
  PartialFailure { succeeded: usize, total: usize },

  /// A client-side ordering action was issued in the wrong phase.
  #[error("ordering state: {0}")]
  Ordering(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
