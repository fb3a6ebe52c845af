use std::fmt::{Display, Formatter};

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::format_description::FormatItem;
use time::macros::format_description;
use time::{Date, Duration};

use crate::ValidationError;

/// Lookback used when the caller does not choose a range.
pub const DEFAULT_LOOKBACK_DAYS: u16 = 7;

const DATE_FORMAT: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Half-open calendar date range `[start, end)` over which prices are averaged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Interval {
    start: Date,
    end: Date,
}

impl Interval {
    pub fn new(start: Date, end: Date) -> Result<Self, ValidationError> {
        if start >= end {
            return Err(ValidationError::InvalidInterval { start, end });
        }
        Ok(Self { start, end })
    }

    /// `[today - days, today)`, counted in calendar days.
    pub fn trailing_days(today: Date, days: u16) -> Result<Self, ValidationError> {
        if days == 0 {
            return Err(ValidationError::EmptyLookback);
        }
        Self::new(shift_back(today, Duration::days(i64::from(days)))?, today)
    }

    /// Fills whichever bound is missing from `lookback_days` around the other one.
    pub fn resolve(
        start: Option<Date>,
        end: Option<Date>,
        today: Date,
        lookback_days: u16,
    ) -> Result<Self, ValidationError> {
        if lookback_days == 0 {
            return Err(ValidationError::EmptyLookback);
        }
        let span = Duration::days(i64::from(lookback_days));
        match (start, end) {
            (Some(start), Some(end)) => Self::new(start, end),
            (Some(start), None) => Self::new(start, shift_forward(start, span)?),
            (None, Some(end)) => Self::new(shift_back(end, span)?, end),
            (None, None) => Self::trailing_days(today, lookback_days),
        }
    }

    pub const fn start(&self) -> Date {
        self.start
    }

    pub const fn end(&self) -> Date {
        self.end
    }

    pub fn contains(&self, date: Date) -> bool {
        self.start <= date && date < self.end
    }

    /// Number of calendar days covered by the range.
    pub fn days(&self) -> i64 {
        (self.end - self.start).whole_days()
    }
}

impl Display for Interval {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", format_date(self.start), format_date(self.end))
    }
}

fn shift_forward(date: Date, span: Duration) -> Result<Date, ValidationError> {
    date.checked_add(span).ok_or(ValidationError::DateOutOfRange {
        date,
        days: span.whole_days(),
    })
}

fn shift_back(date: Date, span: Duration) -> Result<Date, ValidationError> {
    date.checked_sub(span).ok_or(ValidationError::DateOutOfRange {
        date,
        days: -span.whole_days(),
    })
}

/// Formats a date as `YYYY-MM-DD`.
pub fn format_date(date: Date) -> String {
    date.format(DATE_FORMAT)
        .unwrap_or_else(|_| String::from("<unformattable>"))
}

/// Parses a `YYYY-MM-DD` date.
pub fn parse_date(input: &str) -> Result<Date, ValidationError> {
    Date::parse(input.trim(), DATE_FORMAT).map_err(|_| ValidationError::InvalidDate {
        value: input.to_owned(),
    })
}

#[derive(Serialize, Deserialize)]
struct IntervalRepr {
    start: String,
    end: String,
}

impl Serialize for Interval {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        IntervalRepr {
            start: format_date(self.start),
            end: format_date(self.end),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Interval {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let repr = IntervalRepr::deserialize(deserializer)?;
        let start = parse_date(&repr.start).map_err(D::Error::custom)?;
        let end = parse_date(&repr.end).map_err(D::Error::custom)?;
        Self::new(start, end).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn rejects_start_not_before_end() {
        let err = Interval::new(date!(2024-01-08), date!(2024-01-08)).expect_err("must fail");
        assert!(matches!(err, ValidationError::InvalidInterval { .. }));

        let err = Interval::new(date!(2024-01-09), date!(2024-01-08)).expect_err("must fail");
        assert!(matches!(err, ValidationError::InvalidInterval { .. }));
    }

    #[test]
    fn end_is_exclusive() {
        let interval = Interval::new(date!(2024-01-01), date!(2024-01-08)).expect("valid");
        assert!(interval.contains(date!(2024-01-01)));
        assert!(interval.contains(date!(2024-01-07)));
        assert!(!interval.contains(date!(2024-01-08)));
        assert!(!interval.contains(date!(2023-12-31)));
        assert_eq!(interval.days(), 7);
    }

    #[test]
    fn default_lookback_is_seven_calendar_days() {
        let interval =
            Interval::trailing_days(date!(2024-03-15), DEFAULT_LOOKBACK_DAYS).expect("valid");
        assert_eq!(interval.start(), date!(2024-03-08));
        assert_eq!(interval.end(), date!(2024-03-15));
    }

    #[test]
    fn resolve_derives_missing_bound() {
        let today = date!(2024-03-15);
        let from_start = Interval::resolve(Some(date!(2024-02-01)), None, today, 7).expect("valid");
        assert_eq!(from_start.end(), date!(2024-02-08));

        let from_end = Interval::resolve(None, Some(date!(2024-02-08)), today, 7).expect("valid");
        assert_eq!(from_end.start(), date!(2024-02-01));

        let err = Interval::resolve(None, None, today, 0).expect_err("must fail");
        assert_eq!(err, ValidationError::EmptyLookback);
    }

    #[test]
    fn resolve_reports_bounds_past_calendar_limits() {
        let today = date!(2024-01-08);
        let far_future = parse_date("9999-12-30").expect("valid date");
        let err = Interval::resolve(Some(far_future), None, today, 7).expect_err("must fail");
        assert_eq!(
            err,
            ValidationError::DateOutOfRange {
                date: far_future,
                days: 7
            }
        );

        let err = Interval::resolve(None, Some(Date::MIN), today, 7).expect_err("must fail");
        assert!(matches!(err, ValidationError::DateOutOfRange { days: -7, .. }));
    }

    #[test]
    fn serializes_as_iso_dates() {
        let interval = Interval::new(date!(2024-01-01), date!(2024-01-08)).expect("valid");
        let json = serde_json::to_value(interval).expect("serialize");
        assert_eq!(json["start"], "2024-01-01");
        assert_eq!(json["end"], "2024-01-08");

        let back: Interval = serde_json::from_value(json).expect("deserialize");
        assert_eq!(back, interval);
    }

    #[test]
    fn parse_date_reports_raw_input() {
        let err = parse_date("01/02/2024").expect_err("must fail");
        assert_eq!(
            err,
            ValidationError::InvalidDate {
                value: String::from("01/02/2024")
            }
        );
    }
}
