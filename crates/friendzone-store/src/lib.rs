//! Friendzone Storage Layer
//!
//! Implements the [`RelationshipStore`] and [`PersonStore`] query traits, plus
//! CRUD for persons and friendships, on top of SQLite.
//!
//! # Architecture
//!
//! - Persons and relationships live in two tables
//! - Each relationship also stores its parties in canonical order
//!   (`pair_low`, `pair_high`), which makes pair lookups direction-insensitive
//!   and lets a unique index reject duplicate friendships even when two
//!   writers race past validation
//!
//! # Examples
//!
//! ```no_run
//! use friendzone_store::SqliteStore;
//!
//! let store = SqliteStore::new(":memory:").unwrap();
//! // Store is now ready for person and friendship operations
//! ```

#![warn(missing_docs)]

use chrono::NaiveDate;
use friendzone_domain::traits::{PersonStore, RelationshipStore};
use friendzone_domain::{Person, PersonId, PersonPair, Relationship, RelationshipId};
use rusqlite::{ffi, params, Connection, OptionalExtension, Row};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Record not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid data format
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// A uniqueness constraint rejected the write
    #[error("Duplicate record rejected by the database")]
    Duplicate,
}

/// SQLite-based store for persons and friendships
///
/// # Thread Safety
///
/// SQLite connections are not thread-safe. Each thread should have its own SqliteStore instance.
pub struct SqliteStore {
    conn: Connection,
}

const SELECT_RELATIONSHIP: &str = "
    SELECT r.id, a.id, a.name, b.id, b.name, r.met_date, i.id, i.name
    FROM relationships r
    JOIN persons a ON a.id = r.party_a
    JOIN persons b ON b.id = r.party_b
    LEFT JOIN persons i ON i.id = r.introducer";

impl SqliteStore {
    /// Open (or create) a store at the given database path
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use friendzone_store::SqliteStore;
    ///
    /// let store = SqliteStore::new("friendzone.db").unwrap();
    /// ```
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        let mut store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    fn initialize_schema(&mut self) -> Result<(), StoreError> {
        self.conn.execute_batch(include_str!("schema.sql"))?;
        Ok(())
    }

    fn id_to_bytes(value: u128) -> Vec<u8> {
        value.to_be_bytes().to_vec()
    }

    fn bytes_to_id(bytes: &[u8]) -> Result<u128, StoreError> {
        let arr: [u8; 16] = bytes.try_into().map_err(|_| {
            StoreError::InvalidData(format!("Expected 16 bytes for id, got {}", bytes.len()))
        })?;
        Ok(u128::from_be_bytes(arr))
    }

    /// Read a 16-byte id column, reporting bad data as a conversion failure
    fn id_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<u128> {
        let bytes: Vec<u8> = row.get(idx)?;
        Self::bytes_to_id(&bytes).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Blob, Box::new(e))
        })
    }

    fn row_to_person(row: &Row<'_>) -> rusqlite::Result<Person> {
        let id = PersonId::from_value(Self::id_column(row, 0)?);
        Ok(Person::with_id(id, row.get::<_, String>(1)?))
    }

    fn row_to_relationship(row: &Row<'_>) -> rusqlite::Result<Relationship> {
        let id = RelationshipId::from_value(Self::id_column(row, 0)?);
        let party_a = Person::with_id(PersonId::from_value(Self::id_column(row, 1)?), row.get::<_, String>(2)?);
        let party_b = Person::with_id(PersonId::from_value(Self::id_column(row, 3)?), row.get::<_, String>(4)?);
        let met_date: NaiveDate = row.get(5)?;

        let introducer_id: Option<Vec<u8>> = row.get(6)?;
        let introducer = match introducer_id {
            Some(bytes) => {
                let value = Self::bytes_to_id(&bytes).map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(6, rusqlite::types::Type::Blob, Box::new(e))
                })?;
                Some(Person::with_id(PersonId::from_value(value), row.get::<_, String>(7)?))
            }
            None => None,
        };

        Ok(Relationship {
            id: Some(id),
            party_a: Some(party_a),
            party_b: Some(party_b),
            met_date: Some(met_date),
            introducer,
        })
    }

    /// Map unique-constraint failures to [`StoreError::Duplicate`] and
    /// dangling references to [`StoreError::NotFound`]
    fn map_write_error(e: rusqlite::Error) -> StoreError {
        if let rusqlite::Error::SqliteFailure(err, _) = &e {
            match err.extended_code {
                ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
                    warn!("Write rejected by unique constraint: {}", e);
                    return StoreError::Duplicate;
                }
                ffi::SQLITE_CONSTRAINT_FOREIGNKEY => {
                    debug!("Write references a missing person: {}", e);
                    return StoreError::NotFound("Referenced person does not exist".to_string());
                }
                _ => {}
            }
        }
        StoreError::Database(e)
    }

    // ---- persons ----

    /// Insert a new person
    pub fn insert_person(&mut self, person: &Person) -> Result<PersonId, StoreError> {
        self.conn
            .execute(
                "INSERT INTO persons (id, name) VALUES (?1, ?2)",
                params![Self::id_to_bytes(person.id.value()), &person.name],
            )
            .map_err(Self::map_write_error)?;
        debug!("Inserted person '{}' ({})", person.name, person.id);
        Ok(person.id)
    }

    /// Get a person by id
    pub fn get_person(&self, id: PersonId) -> Result<Option<Person>, StoreError> {
        let person = self
            .conn
            .query_row(
                "SELECT id, name FROM persons WHERE id = ?1",
                params![Self::id_to_bytes(id.value())],
                Self::row_to_person,
            )
            .optional()?;
        Ok(person)
    }

    /// Find a person by exact name
    pub fn find_person_by_name(&self, name: &str) -> Result<Option<Person>, StoreError> {
        let person = self
            .conn
            .query_row(
                "SELECT id, name FROM persons WHERE name = ?1",
                params![name],
                Self::row_to_person,
            )
            .optional()?;
        Ok(person)
    }

    /// All persons, ordered by name
    pub fn list_persons(&self) -> Result<Vec<Person>, StoreError> {
        let mut stmt = self.conn.prepare("SELECT id, name FROM persons ORDER BY name")?;
        let persons = stmt
            .query_map([], Self::row_to_person)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(persons)
    }

    /// Change a person's name
    pub fn rename_person(&mut self, id: PersonId, name: &str) -> Result<(), StoreError> {
        let changed = self
            .conn
            .execute(
                "UPDATE persons SET name = ?1 WHERE id = ?2",
                params![name, Self::id_to_bytes(id.value())],
            )
            .map_err(Self::map_write_error)?;
        if changed == 0 {
            return Err(StoreError::NotFound(format!("person {}", id)));
        }
        Ok(())
    }

    /// Delete a person and every friendship they are a party to
    ///
    /// Friendships they introduced are kept, with the introducer cleared.
    /// Returns false if no such person existed.
    pub fn delete_person(&mut self, id: PersonId) -> Result<bool, StoreError> {
        let changed = self.conn.execute(
            "DELETE FROM persons WHERE id = ?1",
            params![Self::id_to_bytes(id.value())],
        )?;
        debug!("Deleted person {} ({} row(s))", id, changed);
        Ok(changed > 0)
    }

    // ---- relationships ----

    /// Insert or update a friendship
    ///
    /// A relationship without an id is inserted and given a fresh id, which
    /// is written back into `relationship`. One with an id is updated in
    /// place. Both parties and the met-date must be set.
    pub fn save_relationship(&mut self, relationship: &mut Relationship) -> Result<RelationshipId, StoreError> {
        let (party_a, party_b) = relationship
            .parties()
            .ok_or_else(|| StoreError::InvalidData("relationship requires both parties".to_string()))?;
        let met_date = relationship
            .met_date
            .ok_or_else(|| StoreError::InvalidData("relationship requires a met-date".to_string()))?;
        let pair = PersonPair::new(party_a.id, party_b.id);
        let introducer = relationship
            .introducer
            .as_ref()
            .map(|p| Self::id_to_bytes(p.id.value()));

        let a_bytes = Self::id_to_bytes(party_a.id.value());
        let b_bytes = Self::id_to_bytes(party_b.id.value());
        let low_bytes = Self::id_to_bytes(pair.low().value());
        let high_bytes = Self::id_to_bytes(pair.high().value());

        let id = match relationship.id {
            None => {
                let id = RelationshipId::new();
                self.conn
                    .execute(
                        "INSERT INTO relationships (id, party_a, party_b, pair_low, pair_high, met_date, introducer)
                         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                        params![
                            Self::id_to_bytes(id.value()),
                            a_bytes,
                            b_bytes,
                            low_bytes,
                            high_bytes,
                            met_date,
                            introducer,
                        ],
                    )
                    .map_err(Self::map_write_error)?;
                debug!("Inserted relationship {}", id);
                id
            }
            Some(id) => {
                let changed = self
                    .conn
                    .execute(
                        "UPDATE relationships
                         SET party_a = ?2, party_b = ?3, pair_low = ?4, pair_high = ?5, met_date = ?6, introducer = ?7
                         WHERE id = ?1",
                        params![
                            Self::id_to_bytes(id.value()),
                            a_bytes,
                            b_bytes,
                            low_bytes,
                            high_bytes,
                            met_date,
                            introducer,
                        ],
                    )
                    .map_err(Self::map_write_error)?;
                if changed == 0 {
                    return Err(StoreError::NotFound(format!("relationship {}", id)));
                }
                debug!("Updated relationship {}", id);
                id
            }
        };

        relationship.id = Some(id);
        Ok(id)
    }

    /// Get a friendship by id
    pub fn get_relationship(&self, id: RelationshipId) -> Result<Option<Relationship>, StoreError> {
        let sql = format!("{} WHERE r.id = ?1", SELECT_RELATIONSHIP);
        let relationship = self
            .conn
            .query_row(&sql, params![Self::id_to_bytes(id.value())], Self::row_to_relationship)
            .optional()?;
        Ok(relationship)
    }

    /// Get the friendship between two persons, in either direction
    pub fn find_relationship(&self, x: PersonId, y: PersonId) -> Result<Option<Relationship>, StoreError> {
        let pair = PersonPair::new(x, y);
        let sql = format!("{} WHERE r.pair_low = ?1 AND r.pair_high = ?2", SELECT_RELATIONSHIP);
        let relationship = self
            .conn
            .query_row(
                &sql,
                params![Self::id_to_bytes(pair.low().value()), Self::id_to_bytes(pair.high().value())],
                Self::row_to_relationship,
            )
            .optional()?;
        Ok(relationship)
    }

    /// All friendships, oldest met-date first
    pub fn list_relationships(&self) -> Result<Vec<Relationship>, StoreError> {
        let sql = format!("{} ORDER BY r.met_date, a.name", SELECT_RELATIONSHIP);
        let mut stmt = self.conn.prepare(&sql)?;
        let relationships = stmt
            .query_map([], Self::row_to_relationship)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(relationships)
    }

    /// Friendships a person is a party to, oldest met-date first
    pub fn relationships_of(&self, id: PersonId) -> Result<Vec<Relationship>, StoreError> {
        let sql = format!(
            "{} WHERE r.party_a = ?1 OR r.party_b = ?1 ORDER BY r.met_date, a.name",
            SELECT_RELATIONSHIP
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let relationships = stmt
            .query_map(params![Self::id_to_bytes(id.value())], Self::row_to_relationship)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(relationships)
    }

    /// Delete a friendship; returns false if it did not exist
    pub fn delete_relationship(&mut self, id: RelationshipId) -> Result<bool, StoreError> {
        let changed = self.conn.execute(
            "DELETE FROM relationships WHERE id = ?1",
            params![Self::id_to_bytes(id.value())],
        )?;
        debug!("Deleted relationship {} ({} row(s))", id, changed);
        Ok(changed > 0)
    }
}

impl RelationshipStore for SqliteStore {
    type Error = StoreError;

    fn exists_between(
        &self,
        x: PersonId,
        y: PersonId,
        excluding: Option<RelationshipId>,
    ) -> Result<bool, Self::Error> {
        let pair = PersonPair::new(x, y);
        let exists: bool = self.conn.query_row(
            "SELECT EXISTS(
                 SELECT 1 FROM relationships
                 WHERE pair_low = ?1 AND pair_high = ?2 AND (?3 IS NULL OR id != ?3)
             )",
            params![
                Self::id_to_bytes(pair.low().value()),
                Self::id_to_bytes(pair.high().value()),
                excluding.map(|id| Self::id_to_bytes(id.value())),
            ],
            |row| row.get(0),
        )?;
        Ok(exists)
    }
}

impl PersonStore for SqliteStore {
    type Error = StoreError;

    fn name_taken(&self, name: &str, excluding: Option<PersonId>) -> Result<bool, Self::Error> {
        let taken: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM persons WHERE name = ?1 AND (?2 IS NULL OR id != ?2))",
            params![name, excluding.map(|id| Self::id_to_bytes(id.value()))],
            |row| row.get(0),
        )?;
        Ok(taken)
    }
}
