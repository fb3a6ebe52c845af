//! # Domain Models
//!
//! Canonical types for interval price averaging.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Symbol`] | Validated stock/ETF ticker |
//! | [`Interval`] | Half-open calendar date range `[start, end)` |
//! | [`Resolution`] | Bar granularity requested from a provider (1d, 5m) |
//! | [`PriceField`] | Bar value used as the observed price |
//! | [`PricePoint`] | A single dated price observation |
//! | [`MarketTime`] | Exchange-local observation timestamp |
//! | [`AverageResult`] | Mean price of a symbol over an interval |
//!
//! ## Validation
//!
//! Construction enforces invariants, so a value that exists is valid:
//!
//! ```rust
//! use tickmean_core::{Interval, Symbol, ValidationError};
//! use time::macros::date;
//!
//! assert_eq!(Symbol::parse(" aapl ").unwrap().as_str(), "AAPL");
//! assert!(matches!(Symbol::parse(""), Err(ValidationError::EmptySymbol)));
//!
//! let err = Interval::new(date!(2024-01-08), date!(2024-01-01)).unwrap_err();
//! assert!(matches!(err, ValidationError::InvalidInterval { .. }));
//! ```

mod interval;
mod models;
mod resolution;
mod symbol;
mod timestamp;

pub use interval::{format_date, parse_date, Interval, DEFAULT_LOOKBACK_DAYS};
pub use models::{AverageResult, PriceField, PricePoint};
pub use resolution::Resolution;
pub use symbol::Symbol;
pub use timestamp::MarketTime;
