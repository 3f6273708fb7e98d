//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! Infrastructure implementations live in other crates.

use crate::{PersonId, RelationshipId};
use chrono::NaiveDate;

/// Read-only query over existing relationships
///
/// Implemented by the infrastructure layer (friendzone-store)
pub trait RelationshipStore {
    /// Error type for store operations
    type Error;

    /// Does any relationship connect `x` and `y`, in either direction?
    ///
    /// The record identified by `excluding` is ignored, so a persisted
    /// relationship can be revalidated against the store without matching
    /// itself.
    fn exists_between(
        &self,
        x: PersonId,
        y: PersonId,
        excluding: Option<RelationshipId>,
    ) -> Result<bool, Self::Error>;
}

/// Read-only query over existing persons
///
/// Implemented by the infrastructure layer (friendzone-store)
pub trait PersonStore {
    /// Error type for store operations
    type Error;

    /// Is `name` already used by a person other than `excluding`?
    fn name_taken(&self, name: &str, excluding: Option<PersonId>) -> Result<bool, Self::Error>;
}

/// Source of "today" for temporal checks
pub trait Clock {
    /// The current calendar date
    fn today(&self) -> NaiveDate;
}
