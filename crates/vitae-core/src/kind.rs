//! Entity kinds and their static schema descriptors.
//!
//! Every kind of profile record shares one repository implementation; the
//! differences between kinds (table name, columns, secondary sort, whether a
//! `display_order` column exists) live in the [`KindSchema`] tables below.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::{Error, Result};

// ─── Kind ────────────────────────────────────────────────────────────────────

/// One category of profile record. The string form is the table name and the
/// URL segment under `/api`.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  EnumIter,
  IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EntityKind {
  Experiences,
  Education,
  Certifications,
  Projects,
  Publications,
  Skills,
}

impl EntityKind {
  /// The SQL table backing this kind.
  pub fn table(self) -> &'static str { self.into() }

  pub fn schema(self) -> &'static KindSchema {
    match self {
      Self::Experiences => &EXPERIENCES,
      Self::Education => &EDUCATION,
      Self::Certifications => &CERTIFICATIONS,
      Self::Projects => &PROJECTS,
      Self::Publications => &PUBLICATIONS,
      Self::Skills => &SKILLS,
    }
  }

  /// Whether records of this kind carry a `display_order` column.
  pub fn is_ordered(self) -> bool { self.schema().ordered }

  /// Human-readable panel title.
  pub fn label(self) -> &'static str {
    match self {
      Self::Experiences => "Experience",
      Self::Education => "Education",
      Self::Certifications => "Licenses & certifications",
      Self::Projects => "Projects",
      Self::Publications => "Publications",
      Self::Skills => "Skills",
    }
  }
}

// ─── Schema descriptors ──────────────────────────────────────────────────────

/// A kind-specific column and the camelCase key it is read from in request
/// bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
  pub column: &'static str,
  pub key:    &'static str,
}

const fn field(column: &'static str, key: &'static str) -> FieldSpec {
  FieldSpec { column, key }
}

/// Static description of one kind's table.
#[derive(Debug)]
pub struct KindSchema {
  /// Kind-specific columns, in insertion order.
  pub fields:      &'static [FieldSpec],
  /// Column used to break `display_order` ties (or the only sort key for
  /// unordered kinds).
  pub sort_column: &'static str,
  pub sort_desc:   bool,
  /// `true` when the table has a `display_order` column.
  pub ordered:     bool,
  /// Column shown as an item's headline.
  pub title:       &'static str,
  /// Column shown under the headline, if any.
  pub subtitle:    Option<&'static str>,
}

impl KindSchema {
  pub fn columns(&self) -> impl Iterator<Item = &'static str> + '_ {
    self.fields.iter().map(|f| f.column)
  }
}

static EXPERIENCES: KindSchema = KindSchema {
  fields:      &[
    field("title", "title"),
    field("company", "company"),
    field("location", "location"),
    field("start_date", "startDate"),
    field("end_date", "endDate"),
    field("description", "description"),
    field("logo_url", "logoUrl"),
  ],
  sort_column: "start_date",
  sort_desc:   true,
  ordered:     true,
  title:       "title",
  subtitle:    Some("company"),
};

static EDUCATION: KindSchema = KindSchema {
  fields:      &[
    field("school", "school"),
    field("degree", "degree"),
    field("field_of_study", "fieldOfStudy"),
    field("start_date", "startDate"),
    field("end_date", "endDate"),
    field("description", "description"),
    field("logo_url", "logoUrl"),
  ],
  sort_column: "start_date",
  sort_desc:   true,
  ordered:     true,
  title:       "school",
  subtitle:    Some("degree"),
};

static CERTIFICATIONS: KindSchema = KindSchema {
  fields:      &[
    field("name", "name"),
    field("organization", "organization"),
    field("issue_date", "issueDate"),
    field("expiration_date", "expirationDate"),
    field("credential_id", "credentialId"),
    field("credential_url", "credentialUrl"),
    field("logo_url", "logoUrl"),
  ],
  sort_column: "issue_date",
  sort_desc:   true,
  ordered:     true,
  title:       "name",
  subtitle:    Some("organization"),
};

static PROJECTS: KindSchema = KindSchema {
  fields:      &[
    field("name", "name"),
    field("description", "description"),
    field("start_date", "startDate"),
    field("end_date", "endDate"),
    field("url", "url"),
    field("logo_url", "logoUrl"),
  ],
  sort_column: "start_date",
  sort_desc:   true,
  ordered:     true,
  title:       "name",
  subtitle:    Some("url"),
};

static PUBLICATIONS: KindSchema = KindSchema {
  fields:      &[
    field("title", "title"),
    field("publisher", "publisher"),
    field("date", "date"),
    field("url", "url"),
    field("description", "description"),
    field("logo_url", "logoUrl"),
  ],
  sort_column: "date",
  sort_desc:   true,
  ordered:     true,
  title:       "title",
  subtitle:    Some("publisher"),
};

// Skills have no `display_order` column and cannot be reordered.
static SKILLS: KindSchema = KindSchema {
  fields:      &[field("name", "name"), field("endorsement", "endorsement")],
  sort_column: "name",
  sort_desc:   false,
  ordered:     false,
  title:       "name",
  subtitle:    Some("endorsement"),
};

// ─── Reorder target ──────────────────────────────────────────────────────────

/// A kind that accepts reorder requests. Constructing one is the only
/// validation the reorder coordinator performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ReorderTarget(EntityKind);

impl ReorderTarget {
  pub fn new(kind: EntityKind) -> Option<Self> {
    kind.is_ordered().then_some(Self(kind))
  }

  pub fn kind(self) -> EntityKind { self.0 }
}

impl std::fmt::Display for ReorderTarget {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    std::fmt::Display::fmt(&self.0, f)
  }
}

impl FromStr for ReorderTarget {
  type Err = Error;

  fn from_str(table: &str) -> Result<Self> {
    table
      .parse::<EntityKind>()
      .ok()
      .and_then(Self::new)
      .ok_or_else(|| Error::InvalidKind(table.to_owned()))
  }
}
