//! Relation facts — the timestamped owner/tenant history.
//!
//! A fact asserts "person P held role R for house H during
//! [since, until?]". Facts form a directed graph between the two entity
//! tables; relations are resolved by querying the fact store from either
//! endpoint, never by following in-memory back-references. An open-ended
//! `until` denotes a currently active relation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The role a person held with respect to a house.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
  Owner,
  Tenant,
}

/// One entry in the house/person history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationFact {
  /// Surrogate row id, assigned by the store. Not part of the wire form.
  #[serde(skip)]
  pub id:          i64,
  pub house_uuid:  Uuid,
  pub person_uuid: Uuid,
  pub role:        Role,
  pub since:       DateTime<Utc>,
  pub until:       Option<DateTime<Utc>>,
}

impl RelationFact {
  pub fn is_active(&self) -> bool { self.until.is_none() }
}

/// Collapse a fact scan into the distinct counterpart ids, preserving
/// first-seen order.
///
/// Pagination is applied to this id set rather than to the raw fact list,
/// so multiple facts referencing the same counterpart never duplicate a
/// page entry, and an unchanged fact set always yields the same page
/// contents in the same order.
pub fn distinct_counterparts<I>(ids: I) -> Vec<Uuid>
where
  I: IntoIterator<Item = Uuid>,
{
  let mut seen = std::collections::HashSet::new();
  ids.into_iter().filter(|id| seen.insert(*id)).collect()
}
