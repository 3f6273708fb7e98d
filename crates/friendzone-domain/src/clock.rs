//! Clock implementations

use crate::traits::Clock;
use chrono::{NaiveDate, Utc};
use std::rc::Rc;

/// Wall clock; "today" is the UTC calendar date at call time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}

/// A clock pinned to one date, for deterministic validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// A clock shared between several owners
impl<C: Clock + ?Sized> Clock for Rc<C> {
    fn today(&self) -> NaiveDate {
        (**self).today()
    }
}
