//! Trading calendar - classifies dates with no expected market activity.

use chrono::{Datelike, NaiveDate, Weekday};
use std::collections::HashSet;

/// Contract the engine requires from the non-activity calendar.
pub trait TradingCalendarTrait: Send + Sync {
    /// True for weekends and configured holidays.
    fn is_non_activity_day(&self, date: NaiveDate) -> bool;
}

/// Calendar treating weekends plus a fixed holiday list as non-activity days.
pub struct WeekendHolidayCalendar {
    holidays: HashSet<NaiveDate>,
}

impl WeekendHolidayCalendar {
    pub fn new(holidays: Vec<NaiveDate>) -> Self {
        Self {
            holidays: holidays.into_iter().collect(),
        }
    }

    /// Weekends only, no holiday calendar.
    pub fn weekends_only() -> Self {
        Self::new(Vec::new())
    }
}

impl TradingCalendarTrait for WeekendHolidayCalendar {
    fn is_non_activity_day(&self, date: NaiveDate) -> bool {
        matches!(date.weekday(), Weekday::Sat | Weekday::Sun) || self.holidays.contains(&date)
    }
}
