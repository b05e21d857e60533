//! Handlers for `/history` endpoints — the paginated relation resolver.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET` | `/history/houses/:role/:person_id` | Houses the person holds `role` for |
//! | `GET` | `/history/people/:role/:house_id` | People holding `role` for the house |
//!
//! Only currently-active relations are exposed; closed facts stay in
//! storage but no endpoint reads them.
//!
//! Pagination is applied to the distinct, resolved counterpart set, not
//! to the raw fact list: repeated facts against the same counterpart
//! never duplicate a page entry, a counterpart whose entity row was
//! deleted counts toward neither the page nor `total_pages`, and an
//! unchanged fact set always produces the same page in the same order.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
};
use manor_core::{
  Error as CoreError,
  house::House,
  page::Page,
  person::Person,
  relation::{Role, distinct_counterparts},
  store::EstateStore,
};
use uuid::Uuid;

use crate::{PageParams, error::ApiError};

/// `GET /history/houses/{owner|tenant}/:person_id`
pub async fn houses_for_person<S>(
  State(store): State<Arc<S>>,
  Path((role, person_id)): Path<(Role, Uuid)>,
  Query(params): Query<PageParams>,
) -> Result<Json<Page<House>>, ApiError>
where
  S: EstateStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  store
    .get_person(person_id)
    .await
    .map_err(ApiError::store)?
    .ok_or(CoreError::PersonNotFound(person_id))?;

  let facts = store
    .facts_for_person(person_id, role)
    .await
    .map_err(ApiError::store)?;
  let ids = distinct_counterparts(facts.into_iter().map(|f| f.house_uuid));

  // Resolve before paginating: a house deleted after the fact was
  // recorded drops out of the page and the count alike, so a page is
  // never shorter than `total_pages` promises.
  let mut houses = Vec::with_capacity(ids.len());
  for id in ids {
    if let Some(house) = store.get_house(id).await.map_err(ApiError::store)? {
      houses.push(house);
    }
  }

  let req = params.request();
  let total = houses.len() as u64;
  let content = req.slice(&houses).to_vec();
  Ok(Json(Page::new(content, req, total)))
}

/// `GET /history/people/{owner|tenant}/:house_id`
pub async fn people_for_house<S>(
  State(store): State<Arc<S>>,
  Path((role, house_id)): Path<(Role, Uuid)>,
  Query(params): Query<PageParams>,
) -> Result<Json<Page<Person>>, ApiError>
where
  S: EstateStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  store
    .get_house(house_id)
    .await
    .map_err(ApiError::store)?
    .ok_or(CoreError::HouseNotFound(house_id))?;

  let facts = store
    .facts_for_house(house_id, role)
    .await
    .map_err(ApiError::store)?;
  let ids = distinct_counterparts(facts.into_iter().map(|f| f.person_uuid));

  let mut people = Vec::with_capacity(ids.len());
  for id in ids {
    if let Some(person) =
      store.get_person(id).await.map_err(ApiError::store)?
    {
      people.push(person);
    }
  }

  let req = params.request();
  let total = people.len() as u64;
  let content = req.slice(&people).to_vec();
  Ok(Json(Page::new(content, req, total)))
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use axum::extract::{Path, Query, State};
  use manor_core::{
    house::NewHouse,
    person::{NewPerson, Passport, Sex},
    relation::Role,
    store::EstateStore,
  };
  use manor_store_sqlite::SqliteStore;

  use crate::PageParams;

  fn new_house(city: &str) -> NewHouse {
    NewHouse {
      country: "Belarus".into(),
      city:    city.into(),
      street:  "Lenina".into(),
      number:  "12".into(),
      area:    "72.5".into(),
    }
  }

  fn page(size: u32, number: u32) -> Query<PageParams> {
    Query(PageParams {
      page_size:   Some(size),
      page_number: Some(number),
    })
  }

  #[tokio::test]
  async fn deleted_counterparts_shrink_page_and_count_together() {
    let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
    let kept = store.add_house(new_house("Minsk")).await.unwrap();
    let razed = store.add_house(new_house("Grodno")).await.unwrap();
    let person = store
      .add_person(NewPerson {
        name: "Ivan".into(),
        surname: "Ivanov".into(),
        sex: Sex::Male,
        passport: Passport {
          series: "MP".into(),
          number: "1234567".into(),
        },
        house_uuid: kept.uuid,
      })
      .await
      .unwrap();

    store
      .add_relation_fact(kept.uuid, person.uuid, Role::Owner)
      .await
      .unwrap();
    store
      .add_relation_fact(razed.uuid, person.uuid, Role::Owner)
      .await
      .unwrap();
    store.delete_house(razed.uuid).await.unwrap();

    // One of two owned houses is gone: with page_size 1 the first page
    // holds the survivor and is also the last page.
    let first = super::houses_for_person(
      State(Arc::clone(&store)),
      Path((Role::Owner, person.uuid)),
      page(1, 1),
    )
    .await
    .unwrap()
    .0;
    assert_eq!(first.total_pages, 1);
    assert_eq!(first.content.len(), 1);
    assert_eq!(first.content[0].uuid, kept.uuid);

    let second = super::houses_for_person(
      State(store),
      Path((Role::Owner, person.uuid)),
      page(1, 2),
    )
    .await
    .unwrap()
    .0;
    assert!(second.content.is_empty());
    assert_eq!(second.total_pages, 1);
  }
}
