//! The `EstateStore` trait — persistence primitives for the registry.
//!
//! The trait is implemented by storage backends (e.g.
//! `manor-store-sqlite`). Higher layers (`manor-api`, `manor-server`)
//! depend on this abstraction, not on any concrete backend.
//!
//! The store exposes fetch/save/delete/scan primitives only; the patch
//! engine and the relation resolver compose them. Fetch-then-save is two
//! separate calls, so a lost-update race between concurrent patches of
//! the same entity is an accepted property of the contract — callers
//! must not assume stronger guarantees.

use std::future::Future;

use uuid::Uuid;

use crate::{
  house::{House, NewHouse},
  person::{NewPerson, Person},
  relation::{RelationFact, Role},
};

/// Abstraction over a registry storage backend.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait EstateStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Houses ────────────────────────────────────────────────────────────

  /// Persist a new house; the store assigns UUID and creation timestamp.
  fn add_house(
    &self,
    input: NewHouse,
  ) -> impl Future<Output = Result<House, Self::Error>> + Send + '_;

  /// Retrieve a house by UUID. Returns `None` if not found.
  fn get_house(
    &self,
    uuid: Uuid,
  ) -> impl Future<Output = Result<Option<House>, Self::Error>> + Send + '_;

  /// Write back the mutable fields of a previously fetched house.
  fn save_house(
    &self,
    house: House,
  ) -> impl Future<Output = Result<House, Self::Error>> + Send + '_;

  /// Delete a house by UUID, detaching current residents. Historical
  /// relation facts survive. Returns `false` if no such house existed.
  fn delete_house(
    &self,
    uuid: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// A page of houses in insertion order, plus the total row count.
  fn list_houses(
    &self,
    offset: u64,
    limit: u64,
  ) -> impl Future<Output = Result<(Vec<House>, u64), Self::Error>> + Send + '_;

  // ── People ────────────────────────────────────────────────────────────

  /// Persist a new person; the store assigns UUID and both timestamps.
  ///
  /// The store does not enforce passport uniqueness beyond its own
  /// constraint; callers check the natural key first to fail before any
  /// write is attempted.
  fn add_person(
    &self,
    input: NewPerson,
  ) -> impl Future<Output = Result<Person, Self::Error>> + Send + '_;

  /// Retrieve a person by UUID. Returns `None` if not found.
  fn get_person(
    &self,
    uuid: Uuid,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + '_;

  /// Write back the mutable fields of a previously fetched person.
  fn save_person(
    &self,
    person: Person,
  ) -> impl Future<Output = Result<Person, Self::Error>> + Send + '_;

  /// Delete a person by UUID. Historical relation facts survive.
  /// Returns `false` if no such person existed.
  fn delete_person(
    &self,
    uuid: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// A page of people in insertion order, plus the total row count.
  fn list_people(
    &self,
    offset: u64,
    limit: u64,
  ) -> impl Future<Output = Result<(Vec<Person>, u64), Self::Error>> + Send + '_;

  /// Natural-key lookup: the person holding this exact passport, if any.
  fn find_person_by_passport<'a>(
    &'a self,
    series: &'a str,
    number: &'a str,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + 'a;

  /// All people whose current house reference equals `house_uuid`.
  fn list_residents(
    &self,
    house_uuid: Uuid,
  ) -> impl Future<Output = Result<Vec<Person>, Self::Error>> + Send + '_;

  // ── Relation facts ────────────────────────────────────────────────────

  /// Active facts where `person_uuid` held `role`, in stable insertion
  /// order (the determinism anchor for history pagination).
  fn facts_for_person(
    &self,
    person_uuid: Uuid,
    role: Role,
  ) -> impl Future<Output = Result<Vec<RelationFact>, Self::Error>> + Send + '_;

  /// Active facts where someone held `role` for `house_uuid`, in stable
  /// insertion order.
  fn facts_for_house(
    &self,
    house_uuid: Uuid,
    role: Role,
  ) -> impl Future<Output = Result<Vec<RelationFact>, Self::Error>> + Send + '_;

  /// Record an open-ended relation fact. Idempotent in effect: if an
  /// identical active fact already exists it is returned unchanged and
  /// no duplicate is written.
  fn add_relation_fact(
    &self,
    house_uuid: Uuid,
    person_uuid: Uuid,
    role: Role,
  ) -> impl Future<Output = Result<RelationFact, Self::Error>> + Send + '_;
}
