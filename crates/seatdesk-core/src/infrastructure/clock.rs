//! Clock adapters

use chrono::{Days, Local, NaiveDate};
use parking_lot::RwLock;

use crate::ports::outbound::Clock;

/// Server-local calendar day
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Settable clock for tests and replays
#[derive(Debug)]
pub struct FixedClock {
    today: RwLock<NaiveDate>,
}

impl FixedClock {
    pub fn new(today: NaiveDate) -> Self {
        Self { today: RwLock::new(today) }
    }

    pub fn set(&self, today: NaiveDate) {
        *self.today.write() = today;
    }

    /// Move the clock forward; saturates at the last representable day
    pub fn advance(&self, days: u64) {
        let mut today = self.today.write();
        *today = today.checked_add_days(Days::new(days)).unwrap_or(NaiveDate::MAX);
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        *self.today.read()
    }
}
