//! Uploaded objects (profile photos, logos, banners).

/// An opaque object keyed by a string, with the metadata replayed on
/// download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
  pub key:          String,
  pub content_type: Option<String>,
  /// Quoted hex digest of `data`, suitable for an `ETag` header.
  pub etag:         String,
  pub data:         Vec<u8>,
  /// Epoch milliseconds.
  pub created_at:   i64,
}
