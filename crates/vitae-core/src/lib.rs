//! Core types and trait definitions for Vitae.
//!
//! Nothing here talks HTTP or SQL. The crate owns the record model, the
//! per-kind schema descriptors, the generic record repository, the reorder
//! coordinator and the client-side ordering state machine. Storage backends
//! implement [`store::PortfolioStore`].

// `PortfolioStore` spells out `Send` futures itself.
#![allow(async_fn_in_trait)]

pub mod activity;
pub mod auth;
pub mod blob;
pub mod error;
pub mod kind;
pub mod ordering;
pub mod profile;
pub mod record;
pub mod reorder;
pub mod repository;
pub mod store;

pub use error::{Error, Operation, Result};
pub use kind::{EntityKind, ReorderTarget};
pub use record::{OwnerId, Record, RecordFields, RecordId};

/// Current wall-clock time as epoch milliseconds.
pub fn now_millis() -> i64 { chrono::Utc::now().timestamp_millis() }

/// Current wall-clock time as epoch seconds.
pub fn now_secs() -> i64 { chrono::Utc::now().timestamp() }

#[cfg(test)]
pub(crate) mod testing;
