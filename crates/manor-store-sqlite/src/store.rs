//! [`SqliteStore`] — the SQLite implementation of [`EstateStore`].

use std::path::Path;

use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use manor_core::{
  house::{House, NewHouse},
  person::{NewPerson, Person},
  relation::{RelationFact, Role},
  store::EstateStore,
  time,
};

use crate::{
  Error, Result,
  encode::{
    RawFact, RawHouse, RawPerson, encode_dt, encode_role, encode_sex,
    encode_uuid,
  },
  schema::SCHEMA,
};

const HOUSE_COLS: &str =
  "id, uuid, country, city, street, number, area, create_date";
const PERSON_COLS: &str = "id, uuid, name, surname, sex, passport_series, \
                           passport_number, create_date, update_date, \
                           house_uuid";
const FACT_COLS: &str = "id, house_uuid, person_uuid, role, since, until";

// ─── Row mappers ─────────────────────────────────────────────────────────────

fn house_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawHouse> {
  Ok(RawHouse {
    id:          row.get(0)?,
    uuid:        row.get(1)?,
    country:     row.get(2)?,
    city:        row.get(3)?,
    street:      row.get(4)?,
    number:      row.get(5)?,
    area:        row.get(6)?,
    create_date: row.get(7)?,
  })
}

fn person_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawPerson> {
  Ok(RawPerson {
    id:              row.get(0)?,
    uuid:            row.get(1)?,
    name:            row.get(2)?,
    surname:         row.get(3)?,
    sex:             row.get(4)?,
    passport_series: row.get(5)?,
    passport_number: row.get(6)?,
    create_date:     row.get(7)?,
    update_date:     row.get(8)?,
    house_uuid:      row.get(9)?,
  })
}

fn fact_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawFact> {
  Ok(RawFact {
    id:          row.get(0)?,
    house_uuid:  row.get(1)?,
    person_uuid: row.get(2)?,
    role:        row.get(3)?,
    since:       row.get(4)?,
    until:       row.get(5)?,
  })
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A manor registry store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── EstateStore impl ────────────────────────────────────────────────────────

impl EstateStore for SqliteStore {
  type Error = Error;

  // ── Houses ────────────────────────────────────────────────────────────────

  async fn add_house(&self, input: NewHouse) -> Result<House> {
    let mut house = House {
      id:          0,
      uuid:        Uuid::new_v4(),
      country:     input.country,
      city:        input.city,
      street:      input.street,
      number:      input.number,
      area:        input.area,
      create_date: time::now(),
    };

    let uuid_str = encode_uuid(house.uuid);
    let at_str   = encode_dt(house.create_date);
    let country  = house.country.clone();
    let city     = house.city.clone();
    let street   = house.street.clone();
    let number   = house.number.clone();
    let area     = house.area.clone();

    house.id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO houses (uuid, country, city, street, number, area, create_date)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          rusqlite::params![uuid_str, country, city, street, number, area, at_str],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(house)
  }

  async fn get_house(&self, uuid: Uuid) -> Result<Option<House>> {
    let uuid_str = encode_uuid(uuid);

    let raw: Option<RawHouse> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {HOUSE_COLS} FROM houses WHERE uuid = ?1"),
              rusqlite::params![uuid_str],
              house_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawHouse::into_house).transpose()
  }

  async fn save_house(&self, house: House) -> Result<House> {
    let uuid_str = encode_uuid(house.uuid);
    let country  = house.country.clone();
    let city     = house.city.clone();
    let street   = house.street.clone();
    let number   = house.number.clone();
    let area     = house.area.clone();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE houses
           SET country = ?2, city = ?3, street = ?4, number = ?5, area = ?6
           WHERE uuid = ?1",
          rusqlite::params![uuid_str, country, city, street, number, area],
        )?;
        Ok(())
      })
      .await?;

    Ok(house)
  }

  async fn delete_house(&self, uuid: Uuid) -> Result<bool> {
    let uuid_str = encode_uuid(uuid);

    // ON DELETE SET NULL detaches current residents; relation facts have
    // no foreign key and survive as history.
    let deleted = self
      .conn
      .call(move |conn| {
        let n = conn.execute(
          "DELETE FROM houses WHERE uuid = ?1",
          rusqlite::params![uuid_str],
        )?;
        Ok(n > 0)
      })
      .await?;

    Ok(deleted)
  }

  async fn list_houses(
    &self,
    offset: u64,
    limit: u64,
  ) -> Result<(Vec<House>, u64)> {
    // An offset past i64::MAX must stay a too-large offset, not wrap
    // into a negative one SQLite reads as 0.
    let offset = i64::try_from(offset).unwrap_or(i64::MAX);
    let limit  = i64::try_from(limit).unwrap_or(i64::MAX);

    let (raws, total): (Vec<RawHouse>, i64) = self
      .conn
      .call(move |conn| {
        let total: i64 =
          conn.query_row("SELECT COUNT(*) FROM houses", [], |r| r.get(0))?;

        let mut stmt = conn.prepare(&format!(
          "SELECT {HOUSE_COLS} FROM houses ORDER BY id LIMIT ?1 OFFSET ?2"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![limit, offset], house_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok((rows, total))
      })
      .await?;

    let houses = raws
      .into_iter()
      .map(RawHouse::into_house)
      .collect::<Result<_>>()?;
    Ok((houses, total as u64))
  }

  // ── People ────────────────────────────────────────────────────────────────

  async fn add_person(&self, input: NewPerson) -> Result<Person> {
    let now = time::now();
    let mut person = Person {
      id:          0,
      uuid:        Uuid::new_v4(),
      name:        input.name,
      surname:     input.surname,
      sex:         input.sex,
      passport:    input.passport,
      create_date: now,
      update_date: now,
      house_uuid:  Some(input.house_uuid),
    };

    let uuid_str  = encode_uuid(person.uuid);
    let name      = person.name.clone();
    let surname   = person.surname.clone();
    let sex_str   = encode_sex(person.sex).to_owned();
    let series    = person.passport.series.clone();
    let number    = person.passport.number.clone();
    let at_str    = encode_dt(now);
    let house_str = person.house_uuid.map(encode_uuid);

    person.id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO people (uuid, name, surname, sex, passport_series,
             passport_number, create_date, update_date, house_uuid)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7, ?8)",
          rusqlite::params![
            uuid_str, name, surname, sex_str, series, number, at_str,
            house_str,
          ],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(person)
  }

  async fn get_person(&self, uuid: Uuid) -> Result<Option<Person>> {
    let uuid_str = encode_uuid(uuid);

    let raw: Option<RawPerson> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {PERSON_COLS} FROM people WHERE uuid = ?1"),
              rusqlite::params![uuid_str],
              person_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawPerson::into_person).transpose()
  }

  async fn save_person(&self, person: Person) -> Result<Person> {
    let uuid_str   = encode_uuid(person.uuid);
    let name       = person.name.clone();
    let surname    = person.surname.clone();
    let sex_str    = encode_sex(person.sex).to_owned();
    let series     = person.passport.series.clone();
    let number     = person.passport.number.clone();
    let update_str = encode_dt(person.update_date);
    let house_str  = person.house_uuid.map(encode_uuid);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE people
           SET name = ?2, surname = ?3, sex = ?4, passport_series = ?5,
               passport_number = ?6, update_date = ?7, house_uuid = ?8
           WHERE uuid = ?1",
          rusqlite::params![
            uuid_str, name, surname, sex_str, series, number, update_str,
            house_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(person)
  }

  async fn delete_person(&self, uuid: Uuid) -> Result<bool> {
    let uuid_str = encode_uuid(uuid);

    let deleted = self
      .conn
      .call(move |conn| {
        let n = conn.execute(
          "DELETE FROM people WHERE uuid = ?1",
          rusqlite::params![uuid_str],
        )?;
        Ok(n > 0)
      })
      .await?;

    Ok(deleted)
  }

  async fn list_people(
    &self,
    offset: u64,
    limit: u64,
  ) -> Result<(Vec<Person>, u64)> {
    let offset = i64::try_from(offset).unwrap_or(i64::MAX);
    let limit  = i64::try_from(limit).unwrap_or(i64::MAX);

    let (raws, total): (Vec<RawPerson>, i64) = self
      .conn
      .call(move |conn| {
        let total: i64 =
          conn.query_row("SELECT COUNT(*) FROM people", [], |r| r.get(0))?;

        let mut stmt = conn.prepare(&format!(
          "SELECT {PERSON_COLS} FROM people ORDER BY id LIMIT ?1 OFFSET ?2"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![limit, offset], person_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok((rows, total))
      })
      .await?;

    let people = raws
      .into_iter()
      .map(RawPerson::into_person)
      .collect::<Result<_>>()?;
    Ok((people, total as u64))
  }

  async fn find_person_by_passport(
    &self,
    series: &str,
    number: &str,
  ) -> Result<Option<Person>> {
    let series = series.to_owned();
    let number = number.to_owned();

    let raw: Option<RawPerson> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {PERSON_COLS} FROM people
                 WHERE passport_series = ?1 AND passport_number = ?2"
              ),
              rusqlite::params![series, number],
              person_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawPerson::into_person).transpose()
  }

  async fn list_residents(&self, house_uuid: Uuid) -> Result<Vec<Person>> {
    let house_str = encode_uuid(house_uuid);

    let raws: Vec<RawPerson> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {PERSON_COLS} FROM people WHERE house_uuid = ?1 ORDER BY id"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![house_str], person_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPerson::into_person).collect()
  }

  // ── Relation facts ────────────────────────────────────────────────────────

  async fn facts_for_person(
    &self,
    person_uuid: Uuid,
    role: Role,
  ) -> Result<Vec<RelationFact>> {
    let person_str = encode_uuid(person_uuid);
    let role_str   = encode_role(role).to_owned();

    let raws: Vec<RawFact> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {FACT_COLS} FROM relation_facts
           WHERE person_uuid = ?1 AND role = ?2 AND until IS NULL
           ORDER BY since, id"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![person_str, role_str], fact_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawFact::into_fact).collect()
  }

  async fn facts_for_house(
    &self,
    house_uuid: Uuid,
    role: Role,
  ) -> Result<Vec<RelationFact>> {
    let house_str = encode_uuid(house_uuid);
    let role_str  = encode_role(role).to_owned();

    let raws: Vec<RawFact> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {FACT_COLS} FROM relation_facts
           WHERE house_uuid = ?1 AND role = ?2 AND until IS NULL
           ORDER BY since, id"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![house_str, role_str], fact_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawFact::into_fact).collect()
  }

  async fn add_relation_fact(
    &self,
    house_uuid: Uuid,
    person_uuid: Uuid,
    role: Role,
  ) -> Result<RelationFact> {
    let house_str  = encode_uuid(house_uuid);
    let person_str = encode_uuid(person_uuid);
    let role_str   = encode_role(role).to_owned();
    let since_str  = encode_dt(time::now());

    // The lookup and the insert run in the same closure, i.e. on the same
    // connection with no interleaved call: an identical active fact is
    // returned unchanged instead of being duplicated.
    let raw = self
      .conn
      .call(move |conn| {
        let existing = conn
          .query_row(
            &format!(
              "SELECT {FACT_COLS} FROM relation_facts
               WHERE house_uuid = ?1 AND person_uuid = ?2 AND role = ?3
                 AND until IS NULL"
            ),
            rusqlite::params![house_str, person_str, role_str],
            fact_row,
          )
          .optional()?;

        if let Some(raw) = existing {
          return Ok(raw);
        }

        conn.execute(
          "INSERT INTO relation_facts (house_uuid, person_uuid, role, since)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![house_str, person_str, role_str, since_str],
        )?;

        Ok(RawFact {
          id:          conn.last_insert_rowid(),
          house_uuid:  house_str,
          person_uuid: person_str,
          role:        role_str,
          since:       since_str,
          until:       None,
        })
      })
      .await?;

    raw.into_fact()
  }
}
