use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

/// Default timezone for ledger dates.
/// This is the canonical timezone used to convert UTC instants to domain dates.
pub const DEFAULT_LEDGER_TZ: Tz = chrono_tz::America::New_York;

/// Converts a UTC instant to a ledger date in the given timezone.
///
/// This is the single source of truth for converting instants to domain dates.
/// Use this whenever you need to derive a "business date" from a timestamp.
pub fn ledger_date_from_utc(instant: DateTime<Utc>, tz: Tz) -> NaiveDate {
    instant.with_timezone(&tz).date_naive()
}

/// Convenience function that uses the default ledger timezone.
/// Equivalent to `ledger_date_from_utc(instant, DEFAULT_LEDGER_TZ)`.
pub fn ledger_date_today() -> NaiveDate {
    ledger_date_from_utc(Utc::now(), DEFAULT_LEDGER_TZ)
}

pub fn get_days_between(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    if start > end {
        return Vec::new();
    }
    let mut days = Vec::new();
    let mut current = start;
    while current <= end {
        days.push(current);
        if let Some(next) = current.succ_opt() {
            current = next;
        } else {
            // Should not happen for typical date ranges
            break;
        }
    }
    days
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_days_between_inclusive() {
        let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        let days = get_days_between(start, end);
        assert_eq!(days.len(), 5);
        assert_eq!(days.first(), Some(&start));
        assert_eq!(days.last(), Some(&end));
    }

    #[test]
    fn test_get_days_between_inverted_is_empty() {
        let start = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert!(get_days_between(start, end).is_empty());
    }
}
