//! House — an addressable property with a stable external identity.
//!
//! The surrogate `id` is a storage detail and never leaves the service;
//! callers address houses by UUID only.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered house. Identity (`id`, `uuid`) and `create_date` are
/// assigned by the store and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct House {
  /// Surrogate row id, assigned by the store. Not part of the wire form.
  #[serde(skip)]
  pub id:          i64,
  pub uuid:        Uuid,
  pub country:     String,
  pub city:        String,
  pub street:      String,
  pub number:      String,
  pub area:        String,
  pub create_date: DateTime<Utc>,
}

/// Input to [`crate::store::EstateStore::add_house`].
/// Identity and `create_date` are always set by the store.
#[derive(Debug, Clone, Deserialize)]
pub struct NewHouse {
  pub country: String,
  pub city:    String,
  pub street:  String,
  pub number:  String,
  pub area:    String,
}
