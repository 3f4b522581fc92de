use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;

/// Source of "today" for due-date checks and day counts.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Current date in a fixed time zone.
pub struct ZonedClock {
    tz: Tz,
}

impl ZonedClock {
    pub fn new(tz: Tz) -> Self {
        ZonedClock { tz }
    }
}

impl Clock for ZonedClock {
    fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.tz).date_naive()
    }
}

/// Always the same date.
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
