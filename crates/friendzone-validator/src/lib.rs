//! Friendzone Validator
//!
//! Checks proposed friendships and persons before they are persisted.
//!
//! The validator provides:
//! - Met-date bounds checking (no dates after today)
//! - Self-friendship rejection
//! - Direction-insensitive duplicate detection
//! - Introducer ("conduit") verification: the introducer must already be
//!   friends with both parties
//! - Person name checks (blank, length, uniqueness)
//!
//! Failures are collected into a field-keyed [`ValidationErrors`] map rather
//! than returned one at a time. Store failures are a separate channel
//! ([`ValidatorError`]).
//!
//! # Examples
//!
//! ```no_run
//! use friendzone_validator::{RelationshipValidator, ValidationConfig};
//!
//! let validator = RelationshipValidator::new(ValidationConfig::default());
//!
//! // Validate a friendship before storing
//! // let result = validator.validate(&candidate, &store)?;
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod person;
mod report;
mod validator;

pub use config::ValidationConfig;
pub use error::ValidatorError;
pub use person::PersonValidator;
pub use report::{ErrorKind, Field, FieldError, ValidationErrors, ValidationResult};
pub use validator::RelationshipValidator;
