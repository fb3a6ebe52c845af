use std::fmt::{Display, Formatter};

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::format_description::FormatItem;
use time::macros::format_description;
use time::{Date, PrimitiveDateTime, Time, Weekday};

use crate::ValidationError;

const DATETIME_FORMAT: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
const DATE_FORMAT: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Observation time in the exchange's local clock, as reported by the provider.
///
/// Providers such as Alpha Vantage publish naive `YYYY-MM-DD HH:MM:SS` stamps in
/// the listing exchange's time zone; keeping them naive means the trading date
/// of a bar is exactly the date the provider printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MarketTime(PrimitiveDateTime);

impl MarketTime {
    pub const fn new(value: PrimitiveDateTime) -> Self {
        Self(value)
    }

    /// Midnight of a trading date, used for daily bars.
    pub const fn from_date(date: Date) -> Self {
        Self(PrimitiveDateTime::new(date, Time::MIDNIGHT))
    }

    /// Accepts `YYYY-MM-DD HH:MM:SS` or a bare `YYYY-MM-DD`.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        if let Ok(value) = PrimitiveDateTime::parse(trimmed, DATETIME_FORMAT) {
            return Ok(Self(value));
        }
        Date::parse(trimmed, DATE_FORMAT)
            .map(Self::from_date)
            .map_err(|_| ValidationError::InvalidDate {
                value: input.to_owned(),
            })
    }

    pub const fn date(self) -> Date {
        self.0.date()
    }

    pub fn is_weekend(self) -> bool {
        matches!(self.0.weekday(), Weekday::Saturday | Weekday::Sunday)
    }

    pub const fn into_inner(self) -> PrimitiveDateTime {
        self.0
    }

    pub fn format(self) -> String {
        self.0
            .format(DATETIME_FORMAT)
            .unwrap_or_else(|_| String::from("<unformattable>"))
    }
}

impl Display for MarketTime {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.format())
    }
}

impl Serialize for MarketTime {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.format())
    }
}

impl<'de> Deserialize<'de> for MarketTime {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::parse(&value).map_err(D::Error::custom)
    }
}
