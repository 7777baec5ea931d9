//! The `PortfolioStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `vitae-store-sqlite`).
//! It exposes only storage primitives; the invariants of the record model
//! (id minting, next-order computation, timestamps, owner scoping policy)
//! are enforced by [`crate::repository::Repository`] and
//! [`crate::reorder::ReorderCoordinator`] on top of it.

use std::future::Future;

use crate::{
  activity::{Post, PostView},
  auth::User,
  blob::Blob,
  kind::{EntityKind, ReorderTarget},
  profile::{Profile, ProfileUpdate},
  record::{OwnerId, Record, RecordFields, RecordId},
  reorder::{BatchReport, OrderAssignment},
};

/// Abstraction over a Vitae storage backend.
///
/// Mutations that match on `id` and `owner` report the number of rows
/// affected; zero is never an error at this layer.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait PortfolioStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Records ───────────────────────────────────────────────────────────

  /// All records of `kind` owned by `owner`, ordered by `display_order`
  /// ascending then the kind's secondary sort column.
  fn list_records<'a>(
    &'a self,
    owner: &'a OwnerId,
    kind: EntityKind,
  ) -> impl Future<Output = Result<Vec<Record>, Self::Error>> + Send + 'a;

  /// The largest `display_order` among `owner`'s records of `kind`, or
  /// `None` when there are none (or the kind is unordered).
  fn max_display_order<'a>(
    &'a self,
    owner: &'a OwnerId,
    kind: EntityKind,
  ) -> impl Future<Output = Result<Option<i64>, Self::Error>> + Send + 'a;

  /// Persist a fully-built record.
  fn insert_record(
    &self,
    kind: EntityKind,
    record: Record,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Replace every kind-specific field and `updated_at` of the row matching
  /// `id` and `owner`.
  fn update_record<'a>(
    &'a self,
    owner: &'a OwnerId,
    kind: EntityKind,
    id: &'a RecordId,
    fields: RecordFields,
    updated_at: i64,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + 'a;

  /// Delete the row matching `id` and `owner`.
  fn delete_record<'a>(
    &'a self,
    owner: &'a OwnerId,
    kind: EntityKind,
    id: &'a RecordId,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + 'a;

  /// Submit one `display_order` update per assignment as a single batch.
  ///
  /// The report counts statements the backend executed, not rows matched.
  fn apply_order_batch<'a>(
    &'a self,
    owner: &'a OwnerId,
    target: ReorderTarget,
    assignments: Vec<OrderAssignment>,
  ) -> impl Future<Output = Result<BatchReport, Self::Error>> + Send + 'a;

  // ── Profile ───────────────────────────────────────────────────────────

  fn get_profile<'a>(
    &'a self,
    owner: &'a OwnerId,
  ) -> impl Future<Output = Result<Option<Profile>, Self::Error>> + Send + 'a;

  /// Insert or replace the owner's profile header.
  fn upsert_profile<'a>(
    &'a self,
    owner: &'a OwnerId,
    update: ProfileUpdate,
    updated_at: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  // ── Posts ─────────────────────────────────────────────────────────────

  /// Every post, newest first, joined with author details.
  fn list_posts(
    &self,
  ) -> impl Future<Output = Result<Vec<PostView>, Self::Error>> + Send + '_;

  fn insert_post(
    &self,
    post: Post,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn delete_post<'a>(
    &'a self,
    owner: &'a OwnerId,
    id: &'a RecordId,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + 'a;

  // ── Profile views ─────────────────────────────────────────────────────

  /// Record one view of `owner`'s profile at `at` (epoch seconds).
  fn record_profile_view<'a>(
    &'a self,
    owner: &'a OwnerId,
    at: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Number of views of `owner`'s profile at or after `since`.
  fn count_profile_views<'a>(
    &'a self,
    owner: &'a OwnerId,
    since: i64,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + 'a;

  // ── Users ─────────────────────────────────────────────────────────────

  /// Look a user up by username or email.
  fn find_user<'a>(
    &'a self,
    login: &'a str,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + 'a;

  fn insert_user(
    &self,
    user: User,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Blobs ─────────────────────────────────────────────────────────────

  /// Store `blob` under its key, replacing any previous object.
  fn put_blob(
    &self,
    blob: Blob,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn get_blob<'a>(
    &'a self,
    key: &'a str,
  ) -> impl Future<Output = Result<Option<Blob>, Self::Error>> + Send + 'a;
}
