use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Interval, MarketTime, ProviderId, Symbol, ValidationError};

/// Which bar value becomes the observed price.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceField {
    #[default]
    Close,
    /// Mean of open, high, low and close.
    Typical,
}

impl PriceField {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Close => "close",
            Self::Typical => "typical",
        }
    }

    pub fn select(self, open: f64, high: f64, low: f64, close: f64) -> f64 {
        match self {
            Self::Close => close,
            Self::Typical => (open + high + low + close) / 4.0,
        }
    }
}

impl Display for PriceField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PriceField {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "close" => Ok(Self::Close),
            "typical" | "ohlc" => Ok(Self::Typical),
            other => Err(ValidationError::InvalidPriceField {
                value: other.to_owned(),
            }),
        }
    }
}

/// A single dated price observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub observed_at: MarketTime,
    pub price: f64,
}

impl PricePoint {
    pub fn new(observed_at: MarketTime, price: f64) -> Result<Self, ValidationError> {
        validate_non_negative("price", price)?;
        Ok(Self { observed_at, price })
    }

    pub const fn date(&self) -> time::Date {
        self.observed_at.date()
    }
}

/// Mean price of one symbol over one interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AverageResult {
    pub symbol: Symbol,
    pub interval: Interval,
    pub average: f64,
    pub points: usize,
    pub first_observed: MarketTime,
    pub last_observed: MarketTime,
    pub source: ProviderId,
}

fn validate_non_negative(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFiniteValue { field });
    }
    if value < 0.0 {
        return Err(ValidationError::NegativeValue { field });
    }
    Ok(())
}
