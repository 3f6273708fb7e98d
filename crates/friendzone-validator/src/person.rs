//! Person validation

use crate::{ErrorKind, Field, ValidationConfig, ValidationErrors, ValidationResult, ValidatorError};
use friendzone_domain::traits::PersonStore;
use friendzone_domain::Person;
use std::fmt::Display;
use tracing::debug;

const BLANK: &str = "This field cannot be blank.";
const NAME_TAKEN: &str = "Friend with this Name already exists.";

/// Validates persons before they are saved
pub struct PersonValidator {
    config: ValidationConfig,
}

impl PersonValidator {
    /// Create a new PersonValidator with the given configuration
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Check the name: non-blank, within the length limit, unused by
    /// anyone else. The person's own id is excluded from the uniqueness
    /// lookup so a saved person revalidates cleanly.
    pub fn validate<S>(&self, person: &Person, store: &S) -> Result<ValidationResult, ValidatorError>
    where
        S: PersonStore,
        S::Error: Display,
    {
        let mut errors = ValidationErrors::new();

        if person.name.trim().is_empty() {
            errors.add(Field::Name, ErrorKind::Blank, BLANK);
            return Ok(errors.into());
        }

        let length = person.name.chars().count();
        if length > self.config.max_name_length {
            errors.add(
                Field::Name,
                ErrorKind::TooLong,
                format!(
                    "Ensure this value has at most {} characters (it has {}).",
                    self.config.max_name_length, length
                ),
            );
        }

        let taken = store
            .name_taken(&person.name, Some(person.id))
            .map_err(|e| ValidatorError::Store(format!("Failed to query persons: {}", e)))?;
        if taken {
            debug!("Name '{}' is already in use", person.name);
            errors.add(Field::Name, ErrorKind::DuplicateName, NAME_TAKEN);
        }

        Ok(errors.into())
    }
}
