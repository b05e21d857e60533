//! Handlers for `/houses` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/houses` | Paged; `?page_size=&page_number=` |
//! | `POST`   | `/houses` | Body: [`NewHouse`]; returns 201 |
//! | `GET`    | `/houses/:id` | 404 if not found |
//! | `PUT`    | `/houses/:id` | Full replace of editable fields |
//! | `PATCH`  | `/houses/:id` | Sparse whitelisted update |
//! | `DELETE` | `/houses/:id` | 204; history survives |
//! | `GET`    | `/houses/:id/residents` | Current occupants |
//! | `POST`   | `/houses/:id/relations` | Body: `{"person_uuid":..,"role":..}` |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use manor_core::{
  Error as CoreError,
  house::{House, NewHouse},
  page::Page,
  patch::{PatchMap, patch_house},
  person::Person,
  relation::Role,
  store::EstateStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{PageParams, error::ApiError};

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /houses[?page_size=..][&page_number=..]`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<PageParams>,
) -> Result<Json<Page<House>>, ApiError>
where
  S: EstateStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let req = params.request();
  let (content, total) = store
    .list_houses(req.offset(), req.limit())
    .await
    .map_err(ApiError::store)?;
  Ok(Json(Page::new(content, req, total)))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /houses` — returns 201 + the stored [`House`].
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewHouse>,
) -> Result<impl IntoResponse, ApiError>
where
  S: EstateStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let house = store.add_house(body).await.map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(house)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /houses/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<House>, ApiError>
where
  S: EstateStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let house = store
    .get_house(id)
    .await
    .map_err(ApiError::store)?
    .ok_or(CoreError::HouseNotFound(id))?;
  Ok(Json(house))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /houses/:id` — replaces every editable field. Identity and
/// `create_date` are untouched.
pub async fn update<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<NewHouse>,
) -> Result<Json<House>, ApiError>
where
  S: EstateStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let mut house = store
    .get_house(id)
    .await
    .map_err(ApiError::store)?
    .ok_or(CoreError::HouseNotFound(id))?;

  house.country = body.country;
  house.city = body.city;
  house.street = body.street;
  house.number = body.number;
  house.area = body.area;

  let house = store.save_house(house).await.map_err(ApiError::store)?;
  Ok(Json(house))
}

// ─── Patch ────────────────────────────────────────────────────────────────────

/// `PATCH /houses/:id` — body is a sparse field map. The whole call fails
/// before any write if a key is not whitelisted or a value does not
/// coerce.
pub async fn patch_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  Json(updates): Json<PatchMap>,
) -> Result<Json<House>, ApiError>
where
  S: EstateStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let mut house = store
    .get_house(id)
    .await
    .map_err(ApiError::store)?
    .ok_or(CoreError::HouseNotFound(id))?;

  patch_house(&mut house, &updates)?;

  let house = store.save_house(house).await.map_err(ApiError::store)?;
  Ok(Json(house))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /houses/:id`
pub async fn delete_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: EstateStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let deleted = store.delete_house(id).await.map_err(ApiError::store)?;
  if !deleted {
    return Err(CoreError::HouseNotFound(id).into());
  }
  Ok(StatusCode::NO_CONTENT)
}

// ─── Residents ────────────────────────────────────────────────────────────────

/// `GET /houses/:id/residents` — the people currently living here,
/// independent of the owner/tenant history.
pub async fn residents<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Vec<Person>>, ApiError>
where
  S: EstateStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  store
    .get_house(id)
    .await
    .map_err(ApiError::store)?
    .ok_or(CoreError::HouseNotFound(id))?;

  let people = store.list_residents(id).await.map_err(ApiError::store)?;
  Ok(Json(people))
}

// ─── Add relation ─────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AddRelationBody {
  pub person_uuid: Uuid,
  pub role:        Role,
}

/// `POST /houses/:id/relations` — records an open-ended owner/tenant
/// fact. Idempotent: repeating the call never duplicates the fact.
pub async fn add_relation<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<AddRelationBody>,
) -> Result<Json<House>, ApiError>
where
  S: EstateStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let house = store
    .get_house(id)
    .await
    .map_err(ApiError::store)?
    .ok_or(CoreError::HouseNotFound(id))?;

  store
    .get_person(body.person_uuid)
    .await
    .map_err(ApiError::store)?
    .ok_or(CoreError::PersonNotFound(body.person_uuid))?;

  store
    .add_relation_fact(house.uuid, body.person_uuid, body.role)
    .await
    .map_err(ApiError::store)?;

  Ok(Json(house))
}
