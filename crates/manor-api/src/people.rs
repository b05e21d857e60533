//! Handlers for `/people` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/people` | Paged; `?page_size=&page_number=` |
//! | `POST`   | `/people` | Body: [`NewPerson`]; returns 201 |
//! | `GET`    | `/people/:id` | 404 if not found |
//! | `PUT`    | `/people/:id` | Full replace of editable fields |
//! | `PATCH`  | `/people/:id` | Sparse whitelisted update |
//! | `DELETE` | `/people/:id` | 204; history survives |
//!
//! Passport uniqueness is enforced here, against the natural-key lookup,
//! before any save is attempted.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use manor_core::{
  Error as CoreError,
  page::Page,
  patch::{PatchMap, patch_person},
  person::{NewPerson, Passport, Person, Sex},
  store::EstateStore,
  time,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{PageParams, error::ApiError};

/// Fail with a conflict if `passport` is already held by a person other
/// than `holder`.
async fn ensure_passport_free<S>(
  store: &S,
  passport: &Passport,
  holder: Option<Uuid>,
) -> Result<(), ApiError>
where
  S: EstateStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let existing = store
    .find_person_by_passport(&passport.series, &passport.number)
    .await
    .map_err(ApiError::store)?;

  if let Some(other) = existing
    && holder != Some(other.uuid)
  {
    return Err(
      CoreError::DuplicatePassport {
        series: passport.series.clone(),
        number: passport.number.clone(),
      }
      .into(),
    );
  }
  Ok(())
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /people[?page_size=..][&page_number=..]`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<PageParams>,
) -> Result<Json<Page<Person>>, ApiError>
where
  S: EstateStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let req = params.request();
  let (content, total) = store
    .list_people(req.offset(), req.limit())
    .await
    .map_err(ApiError::store)?;
  Ok(Json(Page::new(content, req, total)))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /people` — returns 201 + the stored [`Person`]. Fails with 404
/// if the house does not exist and 409 if the passport is taken; neither
/// failure reaches the store's save.
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewPerson>,
) -> Result<impl IntoResponse, ApiError>
where
  S: EstateStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  store
    .get_house(body.house_uuid)
    .await
    .map_err(ApiError::store)?
    .ok_or(CoreError::HouseNotFound(body.house_uuid))?;

  ensure_passport_free(store.as_ref(), &body.passport, None).await?;

  let person = store.add_person(body).await.map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(person)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /people/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Person>, ApiError>
where
  S: EstateStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let person = store
    .get_person(id)
    .await
    .map_err(ApiError::store)?
    .ok_or(CoreError::PersonNotFound(id))?;
  Ok(Json(person))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `PUT /people/:id` — every editable field. The
/// house reference is changed only through the dedicated relation and
/// residency operations.
#[derive(Debug, Deserialize)]
pub struct UpdatePersonBody {
  pub name:     String,
  pub surname:  String,
  pub sex:      Sex,
  pub passport: Passport,
}

/// `PUT /people/:id`
pub async fn update<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<UpdatePersonBody>,
) -> Result<Json<Person>, ApiError>
where
  S: EstateStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let mut person = store
    .get_person(id)
    .await
    .map_err(ApiError::store)?
    .ok_or(CoreError::PersonNotFound(id))?;

  ensure_passport_free(store.as_ref(), &body.passport, Some(person.uuid))
    .await?;

  person.name = body.name;
  person.surname = body.surname;
  person.sex = body.sex;
  person.passport = body.passport;
  person.update_date = time::now();

  let person = store.save_person(person).await.map_err(ApiError::store)?;
  Ok(Json(person))
}

// ─── Patch ────────────────────────────────────────────────────────────────────

/// `PATCH /people/:id` — body is a sparse field map. Every key is
/// validated before any field is applied; a successful patch also moves
/// `update_date`.
pub async fn patch_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  Json(updates): Json<PatchMap>,
) -> Result<Json<Person>, ApiError>
where
  S: EstateStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let mut person = store
    .get_person(id)
    .await
    .map_err(ApiError::store)?
    .ok_or(CoreError::PersonNotFound(id))?;

  patch_person(&mut person, &updates)?;

  // A patched passport must still be unique before the save goes out.
  ensure_passport_free(store.as_ref(), &person.passport, Some(person.uuid))
    .await?;

  let person = store.save_person(person).await.map_err(ApiError::store)?;
  Ok(Json(person))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /people/:id`
pub async fn delete_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: EstateStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let deleted = store.delete_person(id).await.map_err(ApiError::store)?;
  if !deleted {
    return Err(CoreError::PersonNotFound(id).into());
  }
  Ok(StatusCode::NO_CONTENT)
}
