//! Shared state for command execution.

use crate::error::{CliError, Result};
use crate::output::Formatter;
use chrono::NaiveDate;
use friendzone_domain::traits::Clock;
use friendzone_domain::{Person, SystemClock};
use friendzone_store::SqliteStore;
use friendzone_validator::{PersonValidator, RelationshipValidator, ValidationConfig};
use std::rc::Rc;

/// Everything a command needs: the store, the validators and the formatter.
pub struct Context {
    /// Backing store
    pub store: SqliteStore,
    /// Friendship rules
    pub relationships: RelationshipValidator<Rc<dyn Clock>>,
    /// Person rules
    pub persons: PersonValidator,
    /// Output formatter
    pub formatter: Formatter,
    clock: Rc<dyn Clock>,
}

impl Context {
    /// Build a context from a store, validation config and formatter.
    pub fn new(store: SqliteStore, validation: ValidationConfig, formatter: Formatter) -> Self {
        Self::with_clock(store, validation, formatter, Rc::new(SystemClock))
    }

    /// Build a context whose notion of "today" comes from `clock`.
    pub fn with_clock(
        store: SqliteStore,
        validation: ValidationConfig,
        formatter: Formatter,
        clock: Rc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            relationships: RelationshipValidator::with_clock(validation.clone(), Rc::clone(&clock)),
            persons: PersonValidator::new(validation),
            formatter,
            clock,
        }
    }

    /// Today's date, as the validators see it.
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Look up a person by name.
    pub fn resolve(&self, name: &str) -> Result<Person> {
        self.store
            .find_person_by_name(name)?
            .ok_or_else(|| CliError::UnknownPerson(name.to_string()))
    }
}
