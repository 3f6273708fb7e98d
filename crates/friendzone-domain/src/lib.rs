//! Friendzone Domain Layer
//!
//! This crate contains the core domain model for Friendzone: the people being
//! tracked and the friendships between them. It defines the value objects and
//! the trait interfaces that the storage and validation layers depend upon.
//!
//! ## Key Concepts
//!
//! - **Person**: A named party eligible to have friendships
//! - **Relationship**: A link between two persons with a met-date and an
//!   optional introducer (the "conduit")
//! - **PersonPair**: An unordered pair of persons, so (A, B) and (B, A) are
//!   the same friendship
//!
//! ## Architecture
//!
//! - Pure domain logic only, no I/O
//! - Infrastructure implementations live in other crates
//! - Trait definitions for all external interactions (stores, the clock)

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod clock;
pub mod person;
pub mod relationship;
pub mod traits;

// Re-exports for convenience
pub use clock::{FixedClock, SystemClock};
pub use person::{Person, PersonId};
pub use relationship::{PersonPair, Relationship, RelationshipId, RECENT_WINDOW_DAYS};
pub use traits::{Clock, PersonStore, RelationshipStore};
