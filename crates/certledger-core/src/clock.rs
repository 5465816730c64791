//! Calendar clock used for expiry arithmetic.

use chrono::{Days, NaiveDate, Utc};

/// Length of one certification period.
pub const CERTIFICATION_PERIOD: Days = Days::new(365);

/// Source of the current calendar date.
pub trait Clock: Send + Sync {
    /// Returns today's date.
    fn today(&self) -> NaiveDate;
}

/// Wall clock in UTC.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}

/// Clock pinned to a fixed date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Returns `date` advanced by one certification period, saturating at the
/// maximum representable date.
#[must_use]
pub fn one_period_after(date: NaiveDate) -> NaiveDate {
    date.checked_add_days(CERTIFICATION_PERIOD)
        .unwrap_or(NaiveDate::MAX)
}

/// Returns the day before `date`, saturating at the minimum representable
/// date.
#[must_use]
pub fn day_before(date: NaiveDate) -> NaiveDate {
    date.pred_opt().unwrap_or(NaiveDate::MIN)
}
