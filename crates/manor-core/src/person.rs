//! Person — a registered individual with a unique passport.
//!
//! The passport (series, number) pair is the natural key: no two persons
//! may ever share one. The house reference is a weak link to the person's
//! current residence and is changed only through dedicated operations,
//! never via patch.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
  Male,
  Female,
}

/// The uniqueness-bearing natural key, distinct from the surrogate UUID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passport {
  pub series: String,
  pub number: String,
}

/// A registered person. `create_date` is set once; `update_date` moves on
/// every full update and on every successful patch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
  /// Surrogate row id, assigned by the store. Not part of the wire form.
  #[serde(skip)]
  pub id:          i64,
  pub uuid:        Uuid,
  pub name:        String,
  pub surname:     String,
  pub sex:         Sex,
  pub passport:    Passport,
  pub create_date: DateTime<Utc>,
  pub update_date: DateTime<Utc>,
  /// Current residence; `None` once the house has been deleted.
  pub house_uuid:  Option<Uuid>,
}

/// Input to [`crate::store::EstateStore::add_person`].
/// Identity and both timestamps are always set by the store.
#[derive(Debug, Clone, Deserialize)]
pub struct NewPerson {
  pub name:       String,
  pub surname:    String,
  pub sex:        Sex,
  pub passport:   Passport,
  /// The house the person moves into on registration.
  pub house_uuid: Uuid,
}
