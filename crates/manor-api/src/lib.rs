//! JSON REST API for the manor registry.
//!
//! Exposes an axum [`Router`] backed by any
//! [`manor_core::store::EstateStore`]. Auth, TLS, and transport concerns
//! are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", manor_api::api_router(store.clone()))
//! ```

pub mod error;
pub mod history;
pub mod houses;
pub mod people;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use manor_core::{
  page::{DEFAULT_PAGE_SIZE, PageRequest},
  store::EstateStore,
};
use serde::Deserialize;

pub use error::ApiError;

/// Pagination query parameters shared by every list and history endpoint.
/// `page_number` is 1-based; out-of-range values are normalised, a page
/// past the end is empty rather than an error.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageParams {
  pub page_size:   Option<u32>,
  pub page_number: Option<u32>,
}

impl PageParams {
  pub fn request(self) -> PageRequest {
    PageRequest::new(
      self.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
      self.page_number.unwrap_or(1),
    )
  }
}

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router
/// regardless of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: EstateStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Router::new()
    // Houses
    .route("/houses", get(houses::list::<S>).post(houses::create::<S>))
    .route(
      "/houses/{id}",
      get(houses::get_one::<S>)
        .put(houses::update::<S>)
        .patch(houses::patch_one::<S>)
        .delete(houses::delete_one::<S>),
    )
    .route("/houses/{id}/residents", get(houses::residents::<S>))
    .route("/houses/{id}/relations", post(houses::add_relation::<S>))
    // People
    .route("/people", get(people::list::<S>).post(people::create::<S>))
    .route(
      "/people/{id}",
      get(people::get_one::<S>)
        .put(people::update::<S>)
        .patch(people::patch_one::<S>)
        .delete(people::delete_one::<S>),
    )
    // Relation history
    .route(
      "/history/houses/{role}/{person_id}",
      get(history::houses_for_person::<S>),
    )
    .route(
      "/history/people/{role}/{house_id}",
      get(history::people_for_house::<S>),
    )
    .with_state(store)
}
