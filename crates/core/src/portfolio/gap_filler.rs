//! Gap filler - carries the last known record forward across dates with no
//! recorded activity, so charts stay continuous over weekends and holidays.

use chrono::NaiveDate;
use std::collections::BTreeMap;

use crate::calendar::TradingCalendarTrait;
use crate::utils::time_utils::get_days_between;

/// A dated record that can be cloned forward onto a later date.
pub trait Carryable: Clone {
    fn date(&self) -> NaiveDate;

    /// A copy of this record re-dated to `date`, with any derived identity
    /// fields updated to match.
    fn carried_to(&self, date: NaiveDate) -> Self;
}

/// Produces a dense series from a sparse one over `[start, end]`.
///
/// Every date absent from the input and classified as a non-activity day is
/// covered by a clone of the most recent prior record. Absent dates that are
/// activity days stay absent - the caller decides whether that means an
/// error or an implicit "unchanged" day. Idempotent: re-running on an
/// already-dense series is a no-op.
pub fn fill<T: Carryable>(
    series: &[T],
    start: NaiveDate,
    end: NaiveDate,
    calendar: &dyn TradingCalendarTrait,
) -> Vec<T> {
    let by_date: BTreeMap<NaiveDate, &T> = series.iter().map(|r| (r.date(), r)).collect();

    let mut filled = Vec::with_capacity(by_date.len());
    let mut last: Option<&T> = None;

    for date in get_days_between(start, end) {
        match by_date.get(&date) {
            Some(record) => {
                filled.push((*record).clone());
                last = Some(*record);
            }
            None => {
                if calendar.is_non_activity_day(date) {
                    if let Some(prior) = last {
                        filled.push(prior.carried_to(date));
                    }
                }
            }
        }
    }

    filled
}

#[cfg(test)]
mod gap_filler_tests {
    use super::*;
    use crate::calendar::WeekendHolidayCalendar;

    #[derive(Debug, Clone, PartialEq)]
    struct Sample {
        date: NaiveDate,
        value: i64,
    }

    impl Carryable for Sample {
        fn date(&self) -> NaiveDate {
            self.date
        }

        fn carried_to(&self, date: NaiveDate) -> Self {
            Sample {
                date,
                value: self.value,
            }
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_fills_weekend_from_prior_record() {
        // 2024-03-01 is a Friday; 03-02/03-03 are the weekend.
        let series = vec![
            Sample {
                date: date(2024, 3, 1),
                value: 10,
            },
            Sample {
                date: date(2024, 3, 4),
                value: 20,
            },
        ];
        let calendar = WeekendHolidayCalendar::weekends_only();

        let filled = fill(&series, date(2024, 3, 1), date(2024, 3, 4), &calendar);

        assert_eq!(filled.len(), 4);
        assert_eq!(filled[1].date, date(2024, 3, 2));
        assert_eq!(filled[1].value, 10);
        assert_eq!(filled[2].date, date(2024, 3, 3));
        assert_eq!(filled[2].value, 10);
        assert_eq!(filled[3].value, 20);
    }

    #[test]
    fn test_absent_activity_days_stay_absent() {
        // A missing Tuesday is not a calendar gap; leave it to the caller.
        let series = vec![
            Sample {
                date: date(2024, 3, 4),
                value: 10,
            },
            Sample {
                date: date(2024, 3, 6),
                value: 30,
            },
        ];
        let calendar = WeekendHolidayCalendar::weekends_only();

        let filled = fill(&series, date(2024, 3, 4), date(2024, 3, 6), &calendar);

        assert_eq!(filled.len(), 2);
        assert_eq!(filled[0].date, date(2024, 3, 4));
        assert_eq!(filled[1].date, date(2024, 3, 6));
    }

    #[test]
    fn test_no_fill_before_first_record() {
        let series = vec![Sample {
            date: date(2024, 3, 4),
            value: 10,
        }];
        let calendar = WeekendHolidayCalendar::weekends_only();

        // Window opens on a Saturday with nothing to carry forward.
        let filled = fill(&series, date(2024, 3, 2), date(2024, 3, 4), &calendar);

        assert_eq!(filled.len(), 1);
        assert_eq!(filled[0].date, date(2024, 3, 4));
    }

    #[test]
    fn test_fill_is_idempotent() {
        let series = vec![
            Sample {
                date: date(2024, 3, 1),
                value: 10,
            },
            Sample {
                date: date(2024, 3, 4),
                value: 20,
            },
        ];
        let calendar = WeekendHolidayCalendar::weekends_only();

        let once = fill(&series, date(2024, 3, 1), date(2024, 3, 4), &calendar);
        let twice = fill(&once, date(2024, 3, 1), date(2024, 3, 4), &calendar);

        assert_eq!(once, twice);
    }

    #[test]
    fn test_empty_series_yields_empty() {
        let calendar = WeekendHolidayCalendar::weekends_only();
        let filled: Vec<Sample> = fill(&[], date(2024, 3, 1), date(2024, 3, 4), &calendar);
        assert!(filled.is_empty());
    }
}
