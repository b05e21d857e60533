//! The generic partial-update engine.
//!
//! A patch arrives as an untyped JSON map. Each entity kind declares a
//! field table — the whitelist — pairing a key with a coercion rule into
//! the field's native type. The engine resolves and coerces every key
//! before applying any of them (validate-all-then-apply-all), so a bad
//! key or value can never leave an entity half-mutated in memory and
//! leak into a subsequent save.
//!
//! Identity fields, timestamps, and the person's house reference are
//! deliberately absent from the whitelists.

use serde_json::Value;

use crate::{
  Error, Result,
  house::House,
  person::{Person, Sex},
  time,
};

/// The untyped body of a `PATCH` request.
pub type PatchMap = serde_json::Map<String, Value>;

/// Field names accepted by a house patch.
pub const HOUSE_FIELDS: &[&str] =
  &["country", "city", "street", "number", "area"];

/// Field names accepted by a person patch.
pub const PERSON_FIELDS: &[&str] =
  &["name", "surname", "sex", "passport_series", "passport_number"];

// ─── Coercion ────────────────────────────────────────────────────────────────

fn as_string(field: &str, value: &Value) -> Result<String> {
  value
    .as_str()
    .map(str::to_owned)
    .ok_or_else(|| Error::TypeCoercion {
      field:    field.to_owned(),
      expected: "a string",
    })
}

fn as_sex(field: &str, value: &Value) -> Result<Sex> {
  serde_json::from_value(value.clone()).map_err(|_| Error::TypeCoercion {
    field:    field.to_owned(),
    expected: "\"male\" or \"female\"",
  })
}

// ─── House ───────────────────────────────────────────────────────────────────

/// A single coerced house mutation, staged before application.
enum HouseUpdate {
  Country(String),
  City(String),
  Street(String),
  Number(String),
  Area(String),
}

fn resolve_house(field: &str, value: &Value) -> Result<HouseUpdate> {
  match field {
    "country" => Ok(HouseUpdate::Country(as_string(field, value)?)),
    "city" => Ok(HouseUpdate::City(as_string(field, value)?)),
    "street" => Ok(HouseUpdate::Street(as_string(field, value)?)),
    "number" => Ok(HouseUpdate::Number(as_string(field, value)?)),
    "area" => Ok(HouseUpdate::Area(as_string(field, value)?)),
    other => Err(Error::UnsupportedField { field: other.to_owned() }),
  }
}

/// Apply a sparse update map to `house`.
///
/// Every key is resolved against the whitelist and coerced before any
/// field is written; on any error the house is untouched.
pub fn patch_house(house: &mut House, updates: &PatchMap) -> Result<()> {
  let staged = updates
    .iter()
    .map(|(field, value)| resolve_house(field, value))
    .collect::<Result<Vec<_>>>()?;

  for update in staged {
    match update {
      HouseUpdate::Country(v) => house.country = v,
      HouseUpdate::City(v) => house.city = v,
      HouseUpdate::Street(v) => house.street = v,
      HouseUpdate::Number(v) => house.number = v,
      HouseUpdate::Area(v) => house.area = v,
    }
  }
  Ok(())
}

// ─── Person ──────────────────────────────────────────────────────────────────

/// A single coerced person mutation, staged before application.
enum PersonUpdate {
  Name(String),
  Surname(String),
  Sex(Sex),
  PassportSeries(String),
  PassportNumber(String),
}

fn resolve_person(field: &str, value: &Value) -> Result<PersonUpdate> {
  match field {
    "name" => Ok(PersonUpdate::Name(as_string(field, value)?)),
    "surname" => Ok(PersonUpdate::Surname(as_string(field, value)?)),
    "sex" => Ok(PersonUpdate::Sex(as_sex(field, value)?)),
    "passport_series" => {
      Ok(PersonUpdate::PassportSeries(as_string(field, value)?))
    }
    "passport_number" => {
      Ok(PersonUpdate::PassportNumber(as_string(field, value)?))
    }
    other => Err(Error::UnsupportedField { field: other.to_owned() }),
  }
}

/// Apply a sparse update map to `person` and move `update_date` to now.
///
/// Same atomicity contract as [`patch_house`]: on any error the person
/// (including `update_date`) is untouched.
pub fn patch_person(person: &mut Person, updates: &PatchMap) -> Result<()> {
  let staged = updates
    .iter()
    .map(|(field, value)| resolve_person(field, value))
    .collect::<Result<Vec<_>>>()?;

  for update in staged {
    match update {
      PersonUpdate::Name(v) => person.name = v,
      PersonUpdate::Surname(v) => person.surname = v,
      PersonUpdate::Sex(v) => person.sex = v,
      PersonUpdate::PassportSeries(v) => person.passport.series = v,
      PersonUpdate::PassportNumber(v) => person.passport.number = v,
    }
  }
  person.update_date = time::now();
  Ok(())
}
