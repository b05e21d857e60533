//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("conflict: {0}")]
  Conflict(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Wrap a backend failure. Storage errors are never masked or retried;
  /// they surface as 500 for the current request.
  pub fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(e))
  }
}

impl From<manor_core::Error> for ApiError {
  fn from(e: manor_core::Error) -> Self {
    use manor_core::Error;
    match e {
      Error::HouseNotFound(_) | Error::PersonNotFound(_) => {
        Self::NotFound(e.to_string())
      }
      Error::UnsupportedField { .. } | Error::TypeCoercion { .. } => {
        Self::BadRequest(e.to_string())
      }
      Error::DuplicatePassport { .. } => Self::Conflict(e.to_string()),
      Error::Serialization(_) => Self::Store(Box::new(e)),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Conflict(m) => (StatusCode::CONFLICT, m.clone()),
      ApiError::Store(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}

#[cfg(test)]
mod tests {
  use axum::{http::StatusCode, response::IntoResponse};
  use uuid::Uuid;

  use super::ApiError;

  #[test]
  fn core_errors_map_to_http_statuses() {
    let id = Uuid::new_v4();

    let not_found: ApiError = manor_core::Error::HouseNotFound(id).into();
    assert_eq!(not_found.into_response().status(), StatusCode::NOT_FOUND);

    let bad: ApiError = manor_core::Error::UnsupportedField {
      field: "bogus".into(),
    }
    .into();
    assert_eq!(bad.into_response().status(), StatusCode::BAD_REQUEST);

    let conflict: ApiError = manor_core::Error::DuplicatePassport {
      series: "MP".into(),
      number: "1234567".into(),
    }
    .into();
    assert_eq!(conflict.into_response().status(), StatusCode::CONFLICT);
  }
}
