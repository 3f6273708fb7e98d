//! Person module - the parties that friendships connect

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a person based on UUIDv7
///
/// UUIDv7 keeps identifiers sortable by creation time, which gives the
/// canonical ordering used by [`crate::PersonPair`] a stable meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct PersonId(u128);

impl PersonId {
    /// Generate a new UUIDv7-based PersonId
    ///
    /// # Examples
    ///
    /// ```
    /// use friendzone_domain::PersonId;
    ///
    /// let id = PersonId::new();
    /// assert!(id.value() > 0);
    /// ```
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7().as_u128())
    }

    /// Create a PersonId from a raw u128 value
    ///
    /// This is primarily for storage layer deserialization.
    pub fn from_value(value: u128) -> Self {
        Self(value)
    }

    /// Parse a PersonId from its hyphenated UUID form
    pub fn parse(s: &str) -> Result<Self, String> {
        uuid::Uuid::parse_str(s)
            .map(|u| Self(u.as_u128()))
            .map_err(|e| format!("Invalid person id '{}': {}", s, e))
    }

    /// Get the raw u128 value
    pub fn value(&self) -> u128 {
        self.0
    }
}

impl Default for PersonId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", uuid::Uuid::from_u128(self.0))
    }
}

impl From<PersonId> for String {
    fn from(id: PersonId) -> Self {
        id.to_string()
    }
}

impl TryFrom<String> for PersonId {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

/// A named party ("friend")
///
/// The name is unique across all persons; that rule is enforced by the
/// validator against a [`crate::PersonStore`], not by this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    /// Unique identifier
    pub id: PersonId,

    /// Display name
    pub name: String,
}

impl Person {
    /// Create a person with a freshly minted id
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id(PersonId::new(), name)
    }

    /// Create a person with a known id (e.g. loaded from storage)
    pub fn with_id(id: PersonId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// Whether both values refer to the same person
    ///
    /// Identity is the id; two records carrying the same name but different
    /// ids are different people as far as relational checks go.
    pub fn same_as(&self, other: &Person) -> bool {
        self.id == other.id
    }
}

impl fmt::Display for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
