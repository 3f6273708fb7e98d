//! Field-keyed validation errors

use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;

/// A field that validation errors are reported against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// First party of a relationship
    PartyA,
    /// Second party of a relationship
    PartyB,
    /// Date the parties met
    MetDate,
    /// A person's name
    Name,
}

impl Field {
    /// Key used by the presentation layer
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::PartyA => "party_a",
            Field::PartyB => "party_b",
            Field::MetDate => "met_date",
            Field::Name => "name",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category of a validation failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A required field is unset
    FieldRequired,
    /// A text field is empty
    Blank,
    /// A text field exceeds its length limit
    TooLong,
    /// Another person already has this name
    DuplicateName,
    /// A person appears in two roles that must differ
    InvalidRelation,
    /// The unordered pair is already connected
    DuplicateRelationship,
    /// The met-date is after today
    TemporalViolation,
    /// The introducer is not friends with a party
    UnverifiedIntroducer,
}

/// One failure on one field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Failure category
    pub kind: ErrorKind,
    /// User-facing message
    pub message: String,
}

/// Ordered map of field -> messages, built up across independent checks
///
/// Fields keep the order in which they first failed; messages on a field
/// keep the order in which they were added. Nothing is ever overwritten.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    entries: Vec<(Field, Vec<FieldError>)>,
}

impl ValidationErrors {
    /// Create an empty accumulator
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an error to a field
    pub fn add(&mut self, field: Field, kind: ErrorKind, message: impl Into<String>) {
        let error = FieldError {
            kind,
            message: message.into(),
        };
        match self.entries.iter_mut().find(|(f, _)| *f == field) {
            Some((_, errors)) => errors.push(error),
            None => self.entries.push((field, vec![error])),
        }
    }

    /// Append every error from `other`
    pub fn merge(&mut self, other: ValidationErrors) {
        for (field, errors) in other.entries {
            for error in errors {
                self.add(field, error.kind, error.message);
            }
        }
    }

    /// True when no check failed
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of errors across all fields
    pub fn len(&self) -> usize {
        self.entries.iter().map(|(_, errors)| errors.len()).sum()
    }

    /// Fields with at least one error, in first-failure order
    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.entries.iter().map(|(field, _)| *field)
    }

    /// Errors recorded against a field
    pub fn get(&self, field: Field) -> &[FieldError] {
        self.entries
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, errors)| errors.as_slice())
            .unwrap_or(&[])
    }

    /// Messages recorded against a field
    pub fn messages(&self, field: Field) -> Vec<&str> {
        self.get(field).iter().map(|e| e.message.as_str()).collect()
    }

    /// Whether a field carries an error of the given kind
    pub fn has(&self, field: Field, kind: ErrorKind) -> bool {
        self.get(field).iter().any(|e| e.kind == kind)
    }

    /// `Ok(())` when empty, otherwise the whole map as one error
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, errors) in &self.entries {
            for error in errors {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{}: {}", field, error.message)?;
                first = false;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl Serialize for ValidationErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (field, errors) in &self.entries {
            let messages: Vec<&str> = errors.iter().map(|e| e.message.as_str()).collect();
            map.serialize_entry(field.as_str(), &messages)?;
        }
        map.end()
    }
}

/// Outcome of validating one candidate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    /// Every check passed
    Valid,
    /// At least one check failed
    Invalid(ValidationErrors),
}

impl ValidationResult {
    /// Whether every check passed
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }

    /// The error map, if any check failed
    pub fn errors(&self) -> Option<&ValidationErrors> {
        match self {
            ValidationResult::Valid => None,
            ValidationResult::Invalid(errors) => Some(errors),
        }
    }

    /// Convert into a `Result` for `?` propagation
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        match self {
            ValidationResult::Valid => Ok(()),
            ValidationResult::Invalid(errors) => Err(errors),
        }
    }
}

impl From<ValidationErrors> for ValidationResult {
    fn from(errors: ValidationErrors) -> Self {
        if errors.is_empty() {
            ValidationResult::Valid
        } else {
            ValidationResult::Invalid(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_appends() {
        let mut errors = ValidationErrors::new();
        errors.add(Field::PartyA, ErrorKind::InvalidRelation, "first");
        errors.add(Field::PartyA, ErrorKind::DuplicateRelationship, "second");

        assert_eq!(errors.messages(Field::PartyA), vec!["first", "second"]);
        assert_eq!(errors.len(), 2);
        assert!(errors.has(Field::PartyA, ErrorKind::DuplicateRelationship));
        assert!(errors.messages(Field::PartyB).is_empty());
    }

    #[test]
    fn test_field_order_is_first_failure() {
        let mut errors = ValidationErrors::new();
        errors.add(Field::MetDate, ErrorKind::TemporalViolation, "a");
        errors.add(Field::PartyA, ErrorKind::InvalidRelation, "b");
        errors.add(Field::MetDate, ErrorKind::FieldRequired, "c");

        let fields: Vec<Field> = errors.fields().collect();
        assert_eq!(fields, vec![Field::MetDate, Field::PartyA]);
    }

    #[test]
    fn test_merge() {
        let mut left = ValidationErrors::new();
        left.add(Field::PartyA, ErrorKind::FieldRequired, "missing");
        let mut right = ValidationErrors::new();
        right.add(Field::PartyA, ErrorKind::InvalidRelation, "self");
        right.add(Field::MetDate, ErrorKind::TemporalViolation, "future");

        left.merge(right);
        assert_eq!(left.messages(Field::PartyA), vec!["missing", "self"]);
        assert_eq!(left.messages(Field::MetDate), vec!["future"]);
    }

    #[test]
    fn test_serialize_as_field_map() {
        let mut errors = ValidationErrors::new();
        errors.add(Field::MetDate, ErrorKind::TemporalViolation, "Date cannot be in the future.");
        errors.add(Field::PartyA, ErrorKind::InvalidRelation, "x");

        let json = serde_json::to_string(&errors).unwrap();
        assert_eq!(json, r#"{"met_date":["Date cannot be in the future."],"party_a":["x"]}"#);
    }

    #[test]
    fn test_display() {
        let mut errors = ValidationErrors::new();
        errors.add(Field::Name, ErrorKind::Blank, "This field cannot be blank.");
        errors.add(Field::MetDate, ErrorKind::TemporalViolation, "Date cannot be in the future.");
        assert_eq!(
            errors.to_string(),
            "name: This field cannot be blank.; met_date: Date cannot be in the future."
        );
    }

    #[test]
    fn test_result_conversion() {
        assert!(ValidationResult::from(ValidationErrors::new()).is_valid());

        let mut errors = ValidationErrors::new();
        errors.add(Field::Name, ErrorKind::Blank, "blank");
        let result = ValidationResult::from(errors.clone());
        assert!(!result.is_valid());
        assert_eq!(result.errors(), Some(&errors));
        assert_eq!(result.into_result(), Err(errors));
    }
}
