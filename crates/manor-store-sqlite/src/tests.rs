//! Integration tests for `SqliteStore` against an in-memory database.

use manor_core::{
  house::NewHouse,
  person::{NewPerson, Passport, Sex},
  relation::Role,
  store::EstateStore,
};
use uuid::Uuid;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn new_house(city: &str) -> NewHouse {
  NewHouse {
    country: "Belarus".into(),
    city:    city.into(),
    street:  "Lenina".into(),
    number:  "12".into(),
    area:    "72.5".into(),
  }
}

fn new_person(house_uuid: Uuid, number: &str) -> NewPerson {
  NewPerson {
    name: "Ivan".into(),
    surname: "Ivanov".into(),
    sex: Sex::Male,
    passport: Passport {
      series: "MP".into(),
      number: number.into(),
    },
    house_uuid,
  }
}

// ─── Houses ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_and_get_house_roundtrip() {
  let s = store().await;

  let house = s.add_house(new_house("Minsk")).await.unwrap();
  assert!(house.id > 0);

  let fetched = s.get_house(house.uuid).await.unwrap().unwrap();
  assert_eq!(fetched.uuid, house.uuid);
  assert_eq!(fetched.country, "Belarus");
  assert_eq!(fetched.city, "Minsk");
  assert_eq!(fetched.street, "Lenina");
  assert_eq!(fetched.number, "12");
  assert_eq!(fetched.area, "72.5");
  assert_eq!(fetched.create_date, house.create_date);
}

#[tokio::test]
async fn created_entities_compare_equal_to_a_subsequent_get() {
  let s = store().await;

  // The timestamps minted at creation already carry the stored
  // precision, so the returned entity and the read-back entity match
  // field for field.
  let house = s.add_house(new_house("Minsk")).await.unwrap();
  let fetched = s.get_house(house.uuid).await.unwrap().unwrap();
  assert_eq!(fetched, house);

  let person = s
    .add_person(new_person(house.uuid, "1234567"))
    .await
    .unwrap();
  let fetched = s.get_person(person.uuid).await.unwrap().unwrap();
  assert_eq!(fetched.create_date, person.create_date);
  assert_eq!(fetched.update_date, person.update_date);
}

#[tokio::test]
async fn get_house_missing_returns_none() {
  let s = store().await;
  assert!(s.get_house(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn save_house_overwrites_mutable_fields() {
  let s = store().await;
  let mut house = s.add_house(new_house("Minsk")).await.unwrap();

  house.city = "Grodno".into();
  house.area = "100".into();
  s.save_house(house.clone()).await.unwrap();

  let fetched = s.get_house(house.uuid).await.unwrap().unwrap();
  assert_eq!(fetched.city, "Grodno");
  assert_eq!(fetched.area, "100");
  assert_eq!(fetched.create_date, house.create_date);
}

#[tokio::test]
async fn delete_house_then_get_returns_none() {
  let s = store().await;
  let house = s.add_house(new_house("Minsk")).await.unwrap();

  assert!(s.delete_house(house.uuid).await.unwrap());
  assert!(s.get_house(house.uuid).await.unwrap().is_none());

  // A second delete is a no-op.
  assert!(!s.delete_house(house.uuid).await.unwrap());
}

#[tokio::test]
async fn delete_house_detaches_residents_and_keeps_facts() {
  let s = store().await;
  let house = s.add_house(new_house("Minsk")).await.unwrap();
  let person = s
    .add_person(new_person(house.uuid, "1000001"))
    .await
    .unwrap();
  s.add_relation_fact(house.uuid, person.uuid, Role::Owner)
    .await
    .unwrap();

  s.delete_house(house.uuid).await.unwrap();

  let fetched = s.get_person(person.uuid).await.unwrap().unwrap();
  assert_eq!(fetched.house_uuid, None);

  let facts = s.facts_for_person(person.uuid, Role::Owner).await.unwrap();
  assert_eq!(facts.len(), 1);
  assert_eq!(facts[0].house_uuid, house.uuid);
}

#[tokio::test]
async fn list_houses_pages_in_insertion_order() {
  let s = store().await;
  let first = s.add_house(new_house("Minsk")).await.unwrap();
  let second = s.add_house(new_house("Grodno")).await.unwrap();
  let third = s.add_house(new_house("Brest")).await.unwrap();

  let (page, total) = s.list_houses(1, 1).await.unwrap();
  assert_eq!(total, 3);
  assert_eq!(page.len(), 1);
  assert_eq!(page[0].uuid, second.uuid);

  let (all, _) = s.list_houses(0, 10).await.unwrap();
  let uuids: Vec<_> = all.iter().map(|h| h.uuid).collect();
  assert_eq!(uuids, vec![first.uuid, second.uuid, third.uuid]);
}

#[tokio::test]
async fn list_houses_past_the_end_is_empty() {
  let s = store().await;
  s.add_house(new_house("Minsk")).await.unwrap();

  let (page, total) = s.list_houses(10, 5).await.unwrap();
  assert_eq!(total, 1);
  assert!(page.is_empty());
}

#[tokio::test]
async fn list_houses_offset_beyond_i64_is_still_past_the_end() {
  let s = store().await;
  s.add_house(new_house("Minsk")).await.unwrap();

  // An offset that does not fit in i64 must not wrap into a negative
  // value SQLite reads as offset 0.
  let (page, total) = s.list_houses(u64::MAX, 5).await.unwrap();
  assert_eq!(total, 1);
  assert!(page.is_empty());
}

// ─── People ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_and_get_person_roundtrip() {
  let s = store().await;
  let house = s.add_house(new_house("Minsk")).await.unwrap();

  let person = s
    .add_person(new_person(house.uuid, "1234567"))
    .await
    .unwrap();
  assert!(person.id > 0);
  assert_eq!(person.create_date, person.update_date);

  let fetched = s.get_person(person.uuid).await.unwrap().unwrap();
  assert_eq!(fetched.uuid, person.uuid);
  assert_eq!(fetched.name, "Ivan");
  assert_eq!(fetched.sex, Sex::Male);
  assert_eq!(fetched.passport.series, "MP");
  assert_eq!(fetched.passport.number, "1234567");
  assert_eq!(fetched.house_uuid, Some(house.uuid));
}

#[tokio::test]
async fn save_person_overwrites_mutable_fields() {
  let s = store().await;
  let house = s.add_house(new_house("Minsk")).await.unwrap();
  let mut person = s
    .add_person(new_person(house.uuid, "1234567"))
    .await
    .unwrap();

  person.name = "Pyotr".into();
  person.sex = Sex::Female;
  person.passport.number = "7654321".into();
  s.save_person(person.clone()).await.unwrap();

  let fetched = s.get_person(person.uuid).await.unwrap().unwrap();
  assert_eq!(fetched.name, "Pyotr");
  assert_eq!(fetched.sex, Sex::Female);
  assert_eq!(fetched.passport.number, "7654321");
  assert_eq!(fetched.create_date, person.create_date);
}

#[tokio::test]
async fn delete_person_then_get_returns_none() {
  let s = store().await;
  let house = s.add_house(new_house("Minsk")).await.unwrap();
  let person = s
    .add_person(new_person(house.uuid, "1234567"))
    .await
    .unwrap();

  assert!(s.delete_person(person.uuid).await.unwrap());
  assert!(s.get_person(person.uuid).await.unwrap().is_none());
  assert!(!s.delete_person(person.uuid).await.unwrap());
}

#[tokio::test]
async fn list_people_second_page_of_size_one() {
  let s = store().await;
  let house = s.add_house(new_house("Minsk")).await.unwrap();
  s.add_person(new_person(house.uuid, "0000001"))
    .await
    .unwrap();
  let second = s
    .add_person(new_person(house.uuid, "0000002"))
    .await
    .unwrap();
  s.add_person(new_person(house.uuid, "0000003"))
    .await
    .unwrap();

  // pageSize = 1, pageNumber = 2 → offset 1, limit 1: exactly the second
  // record in stable order; total equals the record count.
  let (page, total) = s.list_people(1, 1).await.unwrap();
  assert_eq!(total, 3);
  assert_eq!(page.len(), 1);
  assert_eq!(page[0].uuid, second.uuid);
}

#[tokio::test]
async fn find_person_by_passport_matches_exact_pair() {
  let s = store().await;
  let house = s.add_house(new_house("Minsk")).await.unwrap();
  let person = s
    .add_person(new_person(house.uuid, "1234567"))
    .await
    .unwrap();

  let found = s
    .find_person_by_passport("MP", "1234567")
    .await
    .unwrap()
    .unwrap();
  assert_eq!(found.uuid, person.uuid);

  assert!(
    s.find_person_by_passport("MP", "9999999")
      .await
      .unwrap()
      .is_none()
  );
  assert!(
    s.find_person_by_passport("XX", "1234567")
      .await
      .unwrap()
      .is_none()
  );
}

#[tokio::test]
async fn duplicate_passport_violates_unique_index() {
  let s = store().await;
  let house = s.add_house(new_house("Minsk")).await.unwrap();
  s.add_person(new_person(house.uuid, "1234567"))
    .await
    .unwrap();

  let err = s
    .add_person(new_person(house.uuid, "1234567"))
    .await
    .unwrap_err();
  assert!(matches!(err, crate::Error::Database(_)));
}

#[tokio::test]
async fn list_residents_returns_current_occupants_only() {
  let s = store().await;
  let minsk = s.add_house(new_house("Minsk")).await.unwrap();
  let grodno = s.add_house(new_house("Grodno")).await.unwrap();

  let a = s.add_person(new_person(minsk.uuid, "0000001")).await.unwrap();
  let b = s.add_person(new_person(minsk.uuid, "0000002")).await.unwrap();
  s.add_person(new_person(grodno.uuid, "0000003"))
    .await
    .unwrap();

  let residents = s.list_residents(minsk.uuid).await.unwrap();
  let uuids: Vec<_> = residents.iter().map(|p| p.uuid).collect();
  assert_eq!(uuids, vec![a.uuid, b.uuid]);
}

// ─── Relation facts ──────────────────────────────────────────────────────────

#[tokio::test]
async fn add_relation_fact_is_open_ended() {
  let s = store().await;
  let house = s.add_house(new_house("Minsk")).await.unwrap();
  let person = s
    .add_person(new_person(house.uuid, "1234567"))
    .await
    .unwrap();

  let fact = s
    .add_relation_fact(house.uuid, person.uuid, Role::Owner)
    .await
    .unwrap();
  assert_eq!(fact.house_uuid, house.uuid);
  assert_eq!(fact.person_uuid, person.uuid);
  assert_eq!(fact.role, Role::Owner);
  assert!(fact.is_active());
}

#[tokio::test]
async fn add_relation_fact_twice_leaves_one_active_fact() {
  let s = store().await;
  let house = s.add_house(new_house("Minsk")).await.unwrap();
  let person = s
    .add_person(new_person(house.uuid, "1234567"))
    .await
    .unwrap();

  let first = s
    .add_relation_fact(house.uuid, person.uuid, Role::Owner)
    .await
    .unwrap();
  let second = s
    .add_relation_fact(house.uuid, person.uuid, Role::Owner)
    .await
    .unwrap();
  assert_eq!(second.id, first.id);

  let facts = s.facts_for_person(person.uuid, Role::Owner).await.unwrap();
  assert_eq!(facts.len(), 1);
}

#[tokio::test]
async fn roles_are_tracked_independently() {
  let s = store().await;
  let house = s.add_house(new_house("Minsk")).await.unwrap();
  let person = s
    .add_person(new_person(house.uuid, "1234567"))
    .await
    .unwrap();

  s.add_relation_fact(house.uuid, person.uuid, Role::Owner)
    .await
    .unwrap();
  s.add_relation_fact(house.uuid, person.uuid, Role::Tenant)
    .await
    .unwrap();

  let owned = s.facts_for_person(person.uuid, Role::Owner).await.unwrap();
  let rented = s.facts_for_person(person.uuid, Role::Tenant).await.unwrap();
  assert_eq!(owned.len(), 1);
  assert_eq!(rented.len(), 1);
  assert_eq!(owned[0].role, Role::Owner);
  assert_eq!(rented[0].role, Role::Tenant);
}

#[tokio::test]
async fn facts_resolve_from_either_endpoint() {
  let s = store().await;
  let minsk = s.add_house(new_house("Minsk")).await.unwrap();
  let grodno = s.add_house(new_house("Grodno")).await.unwrap();
  let person = s
    .add_person(new_person(minsk.uuid, "1234567"))
    .await
    .unwrap();

  s.add_relation_fact(minsk.uuid, person.uuid, Role::Owner)
    .await
    .unwrap();
  s.add_relation_fact(grodno.uuid, person.uuid, Role::Owner)
    .await
    .unwrap();

  let by_person = s.facts_for_person(person.uuid, Role::Owner).await.unwrap();
  let houses: Vec<_> = by_person.iter().map(|f| f.house_uuid).collect();
  assert_eq!(houses, vec![minsk.uuid, grodno.uuid]);

  let by_house = s.facts_for_house(minsk.uuid, Role::Owner).await.unwrap();
  assert_eq!(by_house.len(), 1);
  assert_eq!(by_house[0].person_uuid, person.uuid);
}

#[tokio::test]
async fn facts_for_unrelated_subject_are_empty() {
  let s = store().await;
  let facts = s.facts_for_person(Uuid::new_v4(), Role::Tenant).await.unwrap();
  assert!(facts.is_empty());
}
