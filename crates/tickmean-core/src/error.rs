use thiserror::Error;
use time::Date;

/// Validation and contract errors exposed by `tickmean-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("symbol cannot be empty")]
    EmptySymbol,
    #[error("symbol length {len} exceeds max {max}")]
    SymbolTooLong { len: usize, max: usize },
    #[error("symbol must start with an ASCII letter: '{ch}'")]
    SymbolInvalidStart { ch: char },
    #[error("symbol contains invalid character '{ch}' at index {index}")]
    SymbolInvalidChar { ch: char, index: usize },

    #[error("interval start {start} must be before end {end}")]
    InvalidInterval { start: Date, end: Date },
    #[error("lookback must cover at least one day")]
    EmptyLookback,
    #[error("date {date} shifted by {days} days leaves the supported calendar range")]
    DateOutOfRange { date: Date, days: i64 },
    #[error("date must be formatted YYYY-MM-DD: '{value}'")]
    InvalidDate { value: String },

    #[error("invalid resolution '{value}', expected one of 1d, 5m")]
    InvalidResolution { value: String },
    #[error("invalid price field '{value}', expected one of close, typical")]
    InvalidPriceField { value: String },

    #[error("field '{field}' must be finite")]
    NonFiniteValue { field: &'static str },
    #[error("field '{field}' must be non-negative")]
    NegativeValue { field: &'static str },
}
