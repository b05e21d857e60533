//! Error types for `manor-core`.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("house not found: {0}")]
  HouseNotFound(Uuid),

  #[error("person not found: {0}")]
  PersonNotFound(Uuid),

  #[error("field {field:?} cannot be patched")]
  UnsupportedField { field: String },

  #[error("field {field:?} expects {expected}")]
  TypeCoercion {
    field:    String,
    expected: &'static str,
  },

  #[error("passport {series} {number} is already registered")]
  DuplicatePassport { series: String, number: String },

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
