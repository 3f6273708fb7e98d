//! Relationship module - pairwise friendships between persons

use crate::{Person, PersonId};
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How far back (in days) a met-date still counts as "recent"
pub const RECENT_WINDOW_DAYS: u64 = 30;

/// Unique identifier for a persisted relationship (UUIDv7)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct RelationshipId(u128);

impl RelationshipId {
    /// Generate a new UUIDv7-based RelationshipId
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7().as_u128())
    }

    /// Create a RelationshipId from a raw u128 value
    pub fn from_value(value: u128) -> Self {
        Self(value)
    }

    /// Parse a RelationshipId from its hyphenated UUID form
    pub fn parse(s: &str) -> Result<Self, String> {
        uuid::Uuid::parse_str(s)
            .map(|u| Self(u.as_u128()))
            .map_err(|e| format!("Invalid relationship id '{}': {}", s, e))
    }

    /// Get the raw u128 value
    pub fn value(&self) -> u128 {
        self.0
    }
}

impl Default for RelationshipId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RelationshipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", uuid::Uuid::from_u128(self.0))
    }
}

impl From<RelationshipId> for String {
    fn from(id: RelationshipId) -> Self {
        id.to_string()
    }
}

impl TryFrom<String> for RelationshipId {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

/// An unordered pair of persons
///
/// Stored in canonical order (`low <= high`), so `new(a, b) == new(b, a)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PersonPair {
    low: PersonId,
    high: PersonId,
}

impl PersonPair {
    /// Build the canonical pair for two persons, in either order
    pub fn new(x: PersonId, y: PersonId) -> Self {
        if x <= y {
            Self { low: x, high: y }
        } else {
            Self { low: y, high: x }
        }
    }

    /// The smaller id of the pair
    pub fn low(&self) -> PersonId {
        self.low
    }

    /// The larger id of the pair
    pub fn high(&self) -> PersonId {
        self.high
    }

    /// Whether the given person is one of the pair
    pub fn contains(&self, id: PersonId) -> bool {
        self.low == id || self.high == id
    }
}

/// A friendship between two persons
///
/// Every field is optional because a candidate is built from user input
/// before validation; presence of the parties and met-date is checked by the
/// validator's field-presence layer. `id == None` means not yet persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    /// Storage id, `None` until first saved
    pub id: Option<RelationshipId>,

    /// First party (legacy "friend1")
    pub party_a: Option<Person>,

    /// Second party (legacy "friend2")
    pub party_b: Option<Person>,

    /// Calendar date the two met
    pub met_date: Option<NaiveDate>,

    /// Optional third person who introduced the two (the "conduit")
    pub introducer: Option<Person>,
}

impl Relationship {
    /// Create an empty candidate
    pub fn new() -> Self {
        Self::default()
    }

    /// Set both parties
    pub fn between(mut self, party_a: Person, party_b: Person) -> Self {
        self.party_a = Some(party_a);
        self.party_b = Some(party_b);
        self
    }

    /// Set the met-date
    pub fn met_on(mut self, date: NaiveDate) -> Self {
        self.met_date = Some(date);
        self
    }

    /// Set the introducer
    pub fn introduced_by(mut self, introducer: Person) -> Self {
        self.introducer = Some(introducer);
        self
    }

    /// Set the storage id (for revalidating an existing record)
    pub fn with_id(mut self, id: RelationshipId) -> Self {
        self.id = Some(id);
        self
    }

    /// Both parties, if both are set
    pub fn parties(&self) -> Option<(&Person, &Person)> {
        match (&self.party_a, &self.party_b) {
            (Some(a), Some(b)) => Some((a, b)),
            _ => None,
        }
    }

    /// The canonical unordered pair, if both parties are set
    pub fn pair(&self) -> Option<PersonPair> {
        self.parties().map(|(a, b)| PersonPair::new(a.id, b.id))
    }

    /// Whether the two met within the last [`RECENT_WINDOW_DAYS`] days
    pub fn met_recently(&self, today: NaiveDate) -> bool {
        let Some(met) = self.met_date else {
            return false;
        };
        match today.checked_sub_days(Days::new(RECENT_WINDOW_DAYS)) {
            Some(cutoff) => met >= cutoff,
            None => true,
        }
    }
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = |p: &Option<Person>| p.as_ref().map_or("?".to_string(), |p| p.name.clone());
        let date = self
            .met_date
            .map_or("?".to_string(), |d| d.format("%B %d, %Y").to_string());
        write!(f, "{} met {} on {}", name(&self.party_a), name(&self.party_b), date)
    }
}
