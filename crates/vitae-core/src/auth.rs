//! Principals, stored users and the pluggable authenticator seam.
//!
//! Handlers never read an ambient "current user"; the HTTP layer asks an
//! [`Authenticator`] once per request and threads the resulting
//! [`OwnerId`] into every repository call.

use serde::{Deserialize, Serialize};

use crate::record::OwnerId;

/// An authenticated identity, as returned by `POST /auth/login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
  pub id:       OwnerId,
  pub username: String,
  pub email:    Option<String>,
}

/// A row of the `users` table.
#[derive(Debug, Clone)]
pub struct User {
  pub id:            OwnerId,
  pub username:      String,
  pub email:         Option<String>,
  /// argon2 PHC string.
  pub password_hash: String,
  /// Epoch milliseconds.
  pub created_at:    i64,
}

impl User {
  pub fn principal(&self) -> Principal {
    Principal {
      id:       self.id.clone(),
      username: self.username.clone(),
      email:    self.email.clone(),
    }
  }
}

/// Resolves the principal behind a request.
pub trait Authenticator: Send + Sync {
  /// The principal for a request carrying `credential` (the raw
  /// `Authorization` header value, if any). `None` rejects the request.
  fn resolve(&self, credential: Option<&str>) -> Option<Principal>;

  /// The principal granted to `username` at login without a password check,
  /// if any.
  fn bypass(&self, username: &str) -> Option<Principal>;
}

/// The single-user stand-in: every request resolves to one fixed principal,
/// and a configured set of usernames logs in without a password.
#[derive(Debug, Clone)]
pub struct FixedPrincipal {
  principal:        Principal,
  bypass_usernames: Vec<String>,
}

impl FixedPrincipal {
  pub fn new(principal: Principal, bypass_usernames: Vec<String>) -> Self {
    Self { principal, bypass_usernames }
  }

  pub fn principal(&self) -> &Principal { &self.principal }
}

impl Authenticator for FixedPrincipal {
  fn resolve(&self, _credential: Option<&str>) -> Option<Principal> {
    Some(self.principal.clone())
  }

  fn bypass(&self, username: &str) -> Option<Principal> {
    self
      .bypass_usernames
      .iter()
      .any(|u| u == username)
      .then(|| self.principal.clone())
  }
}
