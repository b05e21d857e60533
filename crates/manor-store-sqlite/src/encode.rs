//! Encoding and decoding helpers between Rust domain types and the
//! plain-text representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings at millisecond
//! precision. UUIDs are stored as hyphenated lowercase strings. Enum
//! columns store their lowercase wire names.

use chrono::{DateTime, SecondsFormat, Utc};
use manor_core::{
  house::House,
  person::{Passport, Person, Sex},
  relation::{RelationFact, Role},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Sex ─────────────────────────────────────────────────────────────────────

pub fn encode_sex(sex: Sex) -> &'static str {
  match sex {
    Sex::Male => "male",
    Sex::Female => "female",
  }
}

pub fn decode_sex(s: &str) -> Result<Sex> {
  match s {
    "male" => Ok(Sex::Male),
    "female" => Ok(Sex::Female),
    other => Err(Error::UnknownValue(format!("sex: {other:?}"))),
  }
}

// ─── Role ────────────────────────────────────────────────────────────────────

pub fn encode_role(role: Role) -> &'static str {
  match role {
    Role::Owner => "owner",
    Role::Tenant => "tenant",
  }
}

pub fn decode_role(s: &str) -> Result<Role> {
  match s {
    "owner" => Ok(Role::Owner),
    "tenant" => Ok(Role::Tenant),
    other => Err(Error::UnknownValue(format!("role: {other:?}"))),
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `houses` row.
pub struct RawHouse {
  pub id:          i64,
  pub uuid:        String,
  pub country:     String,
  pub city:        String,
  pub street:      String,
  pub number:      String,
  pub area:        String,
  pub create_date: String,
}

impl RawHouse {
  pub fn into_house(self) -> Result<House> {
    Ok(House {
      id:          self.id,
      uuid:        decode_uuid(&self.uuid)?,
      country:     self.country,
      city:        self.city,
      street:      self.street,
      number:      self.number,
      area:        self.area,
      create_date: decode_dt(&self.create_date)?,
    })
  }
}

/// Raw strings read directly from a `people` row.
pub struct RawPerson {
  pub id:              i64,
  pub uuid:            String,
  pub name:            String,
  pub surname:         String,
  pub sex:             String,
  pub passport_series: String,
  pub passport_number: String,
  pub create_date:     String,
  pub update_date:     String,
  pub house_uuid:      Option<String>,
}

impl RawPerson {
  pub fn into_person(self) -> Result<Person> {
    Ok(Person {
      id:          self.id,
      uuid:        decode_uuid(&self.uuid)?,
      name:        self.name,
      surname:     self.surname,
      sex:         decode_sex(&self.sex)?,
      passport:    Passport {
        series: self.passport_series,
        number: self.passport_number,
      },
      create_date: decode_dt(&self.create_date)?,
      update_date: decode_dt(&self.update_date)?,
      house_uuid:  self.house_uuid.as_deref().map(decode_uuid).transpose()?,
    })
  }
}

/// Raw strings read directly from a `relation_facts` row.
pub struct RawFact {
  pub id:          i64,
  pub house_uuid:  String,
  pub person_uuid: String,
  pub role:        String,
  pub since:       String,
  pub until:       Option<String>,
}

impl RawFact {
  pub fn into_fact(self) -> Result<RelationFact> {
    Ok(RelationFact {
      id:          self.id,
      house_uuid:  decode_uuid(&self.house_uuid)?,
      person_uuid: decode_uuid(&self.person_uuid)?,
      role:        decode_role(&self.role)?,
      since:       decode_dt(&self.since)?,
      until:       self.until.as_deref().map(decode_dt).transpose()?,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::{decode_dt, encode_dt};

  #[test]
  fn timestamps_roundtrip_at_millisecond_precision() {
    // The precision used by the data this service was seeded from.
    let dt = decode_dt("2024-01-16T14:18:08.537Z").unwrap();
    assert_eq!(encode_dt(dt), "2024-01-16T14:18:08.537Z");
    assert_eq!(decode_dt(&encode_dt(dt)).unwrap(), dt);
  }
}
