//! Friendship validation logic

use crate::{ErrorKind, Field, ValidationConfig, ValidationErrors, ValidationResult, ValidatorError};
use friendzone_domain::traits::{Clock, RelationshipStore};
use friendzone_domain::{Person, Relationship, SystemClock};
use std::fmt::Display;
use tracing::debug;

const REQUIRED: &str = "This field cannot be null.";
const FUTURE_DATE: &str = "Date cannot be in the future.";
const PARTY_A_IS_CONDUIT: &str = "Friend1 cannot also be conduit.";
const PARTY_B_IS_CONDUIT: &str = "Friend2 cannot also be conduit.";

/// Validates friendships before they are saved
///
/// Stateless apart from its configuration and clock; every call reads the
/// store as it is at call time and never writes to it.
pub struct RelationshipValidator<C = SystemClock> {
    config: ValidationConfig,
    clock: C,
}

impl RelationshipValidator<SystemClock> {
    /// Create a validator that reads "today" from the system clock
    pub fn new(config: ValidationConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }

    /// Create a validator with default configuration
    pub fn default_config() -> Self {
        Self::new(ValidationConfig::default())
    }
}

impl<C: Clock> RelationshipValidator<C> {
    /// Create a validator with an explicit clock
    pub fn with_clock(config: ValidationConfig, clock: C) -> Self {
        Self { config, clock }
    }

    /// Run the relational and temporal checks on a candidate
    ///
    /// The met-date check always runs. The remaining checks only run once
    /// both parties are set, and all of them run: a candidate can fail
    /// several at once, and every failure is reported.
    ///
    /// # Errors
    ///
    /// Returns [`ValidatorError::Store`] if the store cannot be queried.
    /// Rule violations are never errors; they come back as
    /// [`ValidationResult::Invalid`].
    pub fn validate<S>(
        &self,
        candidate: &Relationship,
        store: &S,
    ) -> Result<ValidationResult, ValidatorError>
    where
        S: RelationshipStore,
        S::Error: Display,
    {
        let mut errors = ValidationErrors::new();

        self.check_met_date(candidate, &mut errors);

        if let Some((party_a, party_b)) = candidate.parties() {
            self.check_distinct_parties(party_a, party_b, &mut errors);
            self.check_unique(candidate, party_a, party_b, store, &mut errors)?;

            if let Some(introducer) = &candidate.introducer {
                self.check_introducer(party_a, party_b, introducer, store, &mut errors)?;
            }
        }

        debug!(
            "Validated friendship '{}': {} error(s)",
            candidate,
            errors.len()
        );

        Ok(errors.into())
    }

    /// Field-presence checks followed by [`Self::validate`]
    ///
    /// Both parties and the met-date are required. Presence errors come
    /// first in the map; semantic errors are merged after them.
    pub fn full_clean<S>(
        &self,
        candidate: &Relationship,
        store: &S,
    ) -> Result<ValidationResult, ValidatorError>
    where
        S: RelationshipStore,
        S::Error: Display,
    {
        let mut errors = ValidationErrors::new();

        if candidate.party_a.is_none() {
            errors.add(Field::PartyA, ErrorKind::FieldRequired, REQUIRED);
        }
        if candidate.party_b.is_none() {
            errors.add(Field::PartyB, ErrorKind::FieldRequired, REQUIRED);
        }
        if candidate.met_date.is_none() {
            errors.add(Field::MetDate, ErrorKind::FieldRequired, REQUIRED);
        }

        if let ValidationResult::Invalid(semantic) = self.validate(candidate, store)? {
            errors.merge(semantic);
        }

        Ok(errors.into())
    }

    fn check_met_date(&self, candidate: &Relationship, errors: &mut ValidationErrors) {
        if !self.config.reject_future_dates {
            return;
        }
        let Some(met_date) = candidate.met_date else {
            return;
        };
        let today = self.clock.today();
        if met_date > today {
            debug!("Met-date {} is after today ({})", met_date, today);
            errors.add(Field::MetDate, ErrorKind::TemporalViolation, FUTURE_DATE);
        }
    }

    fn check_distinct_parties(&self, party_a: &Person, party_b: &Person, errors: &mut ValidationErrors) {
        if party_a.same_as(party_b) {
            errors.add(
                Field::PartyA,
                ErrorKind::InvalidRelation,
                format!("{} cannot be both friends.", party_a),
            );
        }
    }

    fn check_unique<S>(
        &self,
        candidate: &Relationship,
        party_a: &Person,
        party_b: &Person,
        store: &S,
        errors: &mut ValidationErrors,
    ) -> Result<(), ValidatorError>
    where
        S: RelationshipStore,
        S::Error: Display,
    {
        if query(store, party_a, party_b, candidate)? {
            debug!("{} and {} are already connected", party_a, party_b);
            errors.add(
                Field::PartyA,
                ErrorKind::DuplicateRelationship,
                format!("{} and {} are already friends.", party_a, party_b),
            );
        }
        Ok(())
    }

    /// The introducer must be a third person, already friends with both
    /// parties. If the introducer is one of the parties only the role
    /// errors are reported; otherwise each side is checked on its own.
    ///
    /// These lookups do not exclude the candidate's own id.
    fn check_introducer<S>(
        &self,
        party_a: &Person,
        party_b: &Person,
        introducer: &Person,
        store: &S,
        errors: &mut ValidationErrors,
    ) -> Result<(), ValidatorError>
    where
        S: RelationshipStore,
        S::Error: Display,
    {
        let is_party_a = introducer.same_as(party_a);
        let is_party_b = introducer.same_as(party_b);

        if is_party_a {
            errors.add(Field::PartyA, ErrorKind::InvalidRelation, PARTY_A_IS_CONDUIT);
        }
        if is_party_b {
            errors.add(Field::PartyB, ErrorKind::InvalidRelation, PARTY_B_IS_CONDUIT);
        }
        if is_party_a || is_party_b {
            return Ok(());
        }

        let sides = [(Field::PartyA, party_a), (Field::PartyB, party_b)];
        for (field, party) in sides {
            if !query_unscoped(store, party, introducer)? {
                debug!("Introducer {} is not friends with {}", introducer, party);
                errors.add(
                    field,
                    ErrorKind::UnverifiedIntroducer,
                    format!("{} and {} are not friends.", party, introducer),
                );
            }
        }
        Ok(())
    }
}

fn query<S>(store: &S, x: &Person, y: &Person, candidate: &Relationship) -> Result<bool, ValidatorError>
where
    S: RelationshipStore,
    S::Error: Display,
{
    store
        .exists_between(x.id, y.id, candidate.id)
        .map_err(|e| ValidatorError::Store(format!("Failed to query relationships: {}", e)))
}

fn query_unscoped<S>(store: &S, x: &Person, y: &Person) -> Result<bool, ValidatorError>
where
    S: RelationshipStore,
    S::Error: Display,
{
    store
        .exists_between(x.id, y.id, None)
        .map_err(|e| ValidatorError::Store(format!("Failed to query relationships: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use friendzone_domain::{FixedClock, PersonId, RelationshipId};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn today() -> NaiveDate {
        date("2024-06-01")
    }

    fn validator() -> RelationshipValidator<FixedClock> {
        RelationshipValidator::with_clock(ValidationConfig::default(), FixedClock(today()))
    }

    struct People {
        fallon: Person,
        hagan: Person,
        wiedemann: Person,
    }

    fn people() -> People {
        People {
            fallon: Person::new("Jordan Fallon"),
            hagan: Person::new("Jordan Hagan"),
            wiedemann: Person::new("Scott Wiedemann"),
        }
    }

    // Mock store: a list of (id, x, y) edges, no actual storage
    #[derive(Default)]
    struct MockStore {
        edges: Vec<(RelationshipId, PersonId, PersonId)>,
    }

    impl MockStore {
        fn connect(&mut self, x: &Person, y: &Person) -> RelationshipId {
            let id = RelationshipId::new();
            self.edges.push((id, x.id, y.id));
            id
        }
    }

    impl RelationshipStore for MockStore {
        type Error = String;

        fn exists_between(
            &self,
            x: PersonId,
            y: PersonId,
            excluding: Option<RelationshipId>,
        ) -> Result<bool, Self::Error> {
            Ok(self.edges.iter().any(|(id, a, b)| {
                Some(*id) != excluding && ((*a == x && *b == y) || (*a == y && *b == x))
            }))
        }
    }

    struct BrokenStore;

    impl RelationshipStore for BrokenStore {
        type Error = String;

        fn exists_between(
            &self,
            _x: PersonId,
            _y: PersonId,
            _excluding: Option<RelationshipId>,
        ) -> Result<bool, Self::Error> {
            Err("database is locked".to_string())
        }
    }

    fn errors_of(result: ValidationResult) -> ValidationErrors {
        match result {
            ValidationResult::Invalid(errors) => errors,
            ValidationResult::Valid => panic!("Expected validation errors"),
        }
    }

    #[test]
    fn test_valid_friendship() {
        let p = people();
        let candidate = Relationship::new()
            .between(p.fallon, p.hagan)
            .met_on(date("2017-05-05"));

        let result = validator().validate(&candidate, &MockStore::default()).unwrap();
        assert!(result.is_valid());
    }

    #[test]
    fn test_cannot_befriend_self() {
        let p = people();
        let candidate = Relationship::new()
            .between(p.fallon.clone(), p.fallon)
            .met_on(date("2017-05-05"));

        let errors = errors_of(validator().validate(&candidate, &MockStore::default()).unwrap());
        assert_eq!(errors.messages(Field::PartyA), vec!["Jordan Fallon cannot be both friends."]);
        assert!(errors.messages(Field::PartyB).is_empty());
    }

    #[test]
    fn test_duplicate_in_reverse_direction() {
        let p = people();
        let mut store = MockStore::default();
        store.connect(&p.hagan, &p.fallon);

        let candidate = Relationship::new()
            .between(p.fallon, p.hagan)
            .met_on(date("2017-05-05"));

        let errors = errors_of(validator().validate(&candidate, &store).unwrap());
        assert_eq!(
            errors.messages(Field::PartyA),
            vec!["Jordan Fallon and Jordan Hagan are already friends."]
        );
    }

    #[test]
    fn test_revalidating_self_is_not_duplicate() {
        let p = people();
        let mut store = MockStore::default();
        let id = store.connect(&p.fallon, &p.hagan);

        let persisted = Relationship::new()
            .between(p.fallon, p.hagan)
            .met_on(date("2017-05-05"))
            .with_id(id);

        assert!(validator().validate(&persisted, &store).unwrap().is_valid());
    }

    #[test]
    fn test_future_date() {
        let p = people();
        let candidate = Relationship::new()
            .between(p.fallon, p.hagan)
            .met_on(date("3000-01-01"));

        let errors = errors_of(validator().validate(&candidate, &MockStore::default()).unwrap());
        assert_eq!(errors.messages(Field::MetDate), vec!["Date cannot be in the future."]);
    }

    #[test]
    fn test_today_is_valid_tomorrow_is_not() {
        let p = people();
        let base = Relationship::new().between(p.fallon, p.hagan);
        let store = MockStore::default();

        let on_today = base.clone().met_on(today());
        assert!(validator().validate(&on_today, &store).unwrap().is_valid());

        let tomorrow = today().succ_opt().unwrap();
        let on_tomorrow = base.met_on(tomorrow);
        let errors = errors_of(validator().validate(&on_tomorrow, &store).unwrap());
        assert!(errors.has(Field::MetDate, ErrorKind::TemporalViolation));
    }

    #[test]
    fn test_future_date_allowed_when_disabled() {
        let p = people();
        let validator = RelationshipValidator::with_clock(ValidationConfig::permissive(), FixedClock(today()));
        let candidate = Relationship::new()
            .between(p.fallon, p.hagan)
            .met_on(date("3000-01-01"));

        assert!(validator.validate(&candidate, &MockStore::default()).unwrap().is_valid());
    }

    #[test]
    fn test_date_checked_without_parties() {
        let candidate = Relationship::new().met_on(date("3000-01-01"));

        let errors = errors_of(validator().validate(&candidate, &BrokenStore).unwrap());
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec![Field::MetDate]);
    }

    #[test]
    fn test_date_and_party_errors_accumulate() {
        let p = people();
        let mut store = MockStore::default();
        store.connect(&p.fallon, &p.fallon);

        let candidate = Relationship::new()
            .between(p.fallon.clone(), p.fallon)
            .met_on(date("3000-01-01"));

        let errors = errors_of(validator().validate(&candidate, &store).unwrap());
        assert_eq!(errors.messages(Field::MetDate), vec!["Date cannot be in the future."]);
        assert_eq!(
            errors.messages(Field::PartyA),
            vec![
                "Jordan Fallon cannot be both friends.",
                "Jordan Fallon and Jordan Fallon are already friends.",
            ]
        );
    }

    #[test]
    fn test_introducer_not_friends_with_party_a() {
        let p = people();
        let mut store = MockStore::default();
        store.connect(&p.hagan, &p.wiedemann);

        let candidate = Relationship::new()
            .between(p.fallon, p.hagan)
            .met_on(date("2017-05-05"))
            .introduced_by(p.wiedemann);

        let errors = errors_of(validator().validate(&candidate, &store).unwrap());
        assert_eq!(
            errors.messages(Field::PartyA),
            vec!["Jordan Fallon and Scott Wiedemann are not friends."]
        );
        assert!(errors.messages(Field::PartyB).is_empty());
    }

    #[test]
    fn test_introducer_not_friends_with_either() {
        let p = people();
        let candidate = Relationship::new()
            .between(p.fallon, p.hagan)
            .met_on(date("2017-05-05"))
            .introduced_by(p.wiedemann);

        let errors = errors_of(validator().validate(&candidate, &MockStore::default()).unwrap());
        assert_eq!(
            errors.messages(Field::PartyA),
            vec!["Jordan Fallon and Scott Wiedemann are not friends."]
        );
        assert_eq!(
            errors.messages(Field::PartyB),
            vec!["Jordan Hagan and Scott Wiedemann are not friends."]
        );
        let fields: Vec<Field> = errors.fields().collect();
        assert_eq!(fields, vec![Field::PartyA, Field::PartyB]);
    }

    #[test]
    fn test_verified_introducer() {
        let p = people();
        let mut store = MockStore::default();
        store.connect(&p.wiedemann, &p.fallon);
        store.connect(&p.hagan, &p.wiedemann);

        let candidate = Relationship::new()
            .between(p.fallon, p.hagan)
            .met_on(date("2017-05-05"))
            .introduced_by(p.wiedemann);

        assert!(validator().validate(&candidate, &store).unwrap().is_valid());
    }

    #[test]
    fn test_introducer_is_party_a() {
        let p = people();
        let candidate = Relationship::new()
            .between(p.fallon.clone(), p.hagan)
            .met_on(date("2017-05-05"))
            .introduced_by(p.fallon);

        let errors = errors_of(validator().validate(&candidate, &MockStore::default()).unwrap());
        assert_eq!(errors.messages(Field::PartyA), vec!["Friend1 cannot also be conduit."]);
        assert!(!errors.has(Field::PartyA, ErrorKind::UnverifiedIntroducer));
    }

    #[test]
    fn test_introducer_is_party_b() {
        let p = people();
        let candidate = Relationship::new()
            .between(p.fallon, p.hagan.clone())
            .met_on(date("2017-05-05"))
            .introduced_by(p.hagan);

        let errors = errors_of(validator().validate(&candidate, &MockStore::default()).unwrap());
        assert_eq!(errors.messages(Field::PartyB), vec!["Friend2 cannot also be conduit."]);
        assert!(errors.messages(Field::PartyA).is_empty());
    }

    #[test]
    fn test_introducer_check_does_not_exclude_own_id() {
        let p = people();
        let mut store = MockStore::default();
        let own = store.connect(&p.fallon, &p.wiedemann);
        store.connect(&p.hagan, &p.wiedemann);

        // Revalidating with the id of the Fallon/Wiedemann link must still
        // see that link when verifying the introducer.
        let candidate = Relationship::new()
            .between(p.fallon, p.hagan)
            .met_on(date("2017-05-05"))
            .introduced_by(p.wiedemann)
            .with_id(own);

        assert!(validator().validate(&candidate, &store).unwrap().is_valid());
    }

    #[test]
    fn test_store_failure_is_hard_error() {
        let p = people();
        let candidate = Relationship::new()
            .between(p.fallon, p.hagan)
            .met_on(date("2017-05-05"));

        let result = validator().validate(&candidate, &BrokenStore);
        match result {
            Err(ValidatorError::Store(msg)) => assert!(msg.contains("database is locked")),
            other => panic!("Expected store error, got {:?}", other),
        }
    }

    #[test]
    fn test_full_clean_requires_fields() {
        let p = people();
        let candidate = Relationship {
            party_b: Some(p.hagan),
            met_date: Some(date("2017-05-05")),
            ..Relationship::default()
        };

        let errors = errors_of(validator().full_clean(&candidate, &MockStore::default()).unwrap());
        assert_eq!(errors.messages(Field::PartyA), vec!["This field cannot be null."]);
        assert!(errors.messages(Field::PartyB).is_empty());
        assert!(errors.messages(Field::MetDate).is_empty());
    }

    #[test]
    fn test_full_clean_merges_presence_and_semantic() {
        let p = people();
        let candidate = Relationship::new().between(p.fallon.clone(), p.fallon);

        let errors = errors_of(validator().full_clean(&candidate, &MockStore::default()).unwrap());
        assert_eq!(errors.messages(Field::MetDate), vec!["This field cannot be null."]);
        assert_eq!(errors.messages(Field::PartyA), vec!["Jordan Fallon cannot be both friends."]);
    }

    #[test]
    fn test_full_clean_valid() {
        let p = people();
        let candidate = Relationship::new()
            .between(p.fallon, p.hagan)
            .met_on(date("2017-05-05"));

        assert!(validator().full_clean(&candidate, &MockStore::default()).unwrap().is_valid());
    }
}
