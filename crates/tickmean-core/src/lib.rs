//! # Tickmean Core
//!
//! Core contracts and domain types for the tickmean interval price calculator.
//!
//! ## Overview
//!
//! - **Domain models** for symbols, date intervals, price points and results
//! - **Price source trait** consumed by the averager
//! - **Provider adapters** for Alpha Vantage and offline fixtures
//! - **Interval averager** reducing a price series to its arithmetic mean
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | Provider adapters (Alpha Vantage, fixture) |
//! | [`averaging`] | Interval averager and its error type |
//! | [`data_source`] | Price source trait and request/response types |
//! | [`domain`] | Domain models (Symbol, Interval, PricePoint, AverageResult) |
//! | [`error`] | Validation errors |
//! | [`http_client`] | HTTP client abstraction |
//! | [`provider_policy`] | Per-provider quota and timeout settings |
//! | [`source`] | Provider identifiers |
//! | [`throttling`] | Client-side rate limiting |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tickmean_core::{AlphaVantageAdapter, Interval, IntervalAverager, DEFAULT_LOOKBACK_DAYS};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let averager = IntervalAverager::new(Arc::new(AlphaVantageAdapter::from_env()));
//!     let today = time::OffsetDateTime::now_utc().date();
//!     let interval = Interval::trailing_days(today, DEFAULT_LOOKBACK_DAYS)?;
//!
//!     let result = averager.compute_average("AAPL", interval).await?;
//!     println!("{} {}: ${:.2}", result.symbol, result.interval, result.average);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │  Web UI / API   │
//! └────────┬────────┘
//!          │ symbol, interval
//!          ▼
//! ┌─────────────────┐
//! │ IntervalAverager│
//! └────────┬────────┘
//!          │ PriceRequest
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │ PriceSource     │────▶│ HTTP Client      │
//! │ (Adapter Trait) │     │ (reqwest)        │
//! └─────────────────┘     └──────────────────┘
//! ```
//!
//! ## Error Handling
//!
//! ```rust
//! use tickmean_core::AverageError;
//!
//! fn message_for(error: &AverageError) -> String {
//!     match error {
//!         AverageError::InvalidSymbol(reason) => format!("Please enter a valid symbol: {reason}"),
//!         AverageError::NoData { symbol, .. } => format!("No trading data for {symbol}"),
//!         AverageError::Provider(source) => format!("Data provider error: {}", source.message()),
//!     }
//! }
//! ```
//!
//! ## Security
//!
//! - The Alpha Vantage key is read from configuration or the environment and never logged

pub mod adapters;
pub mod averaging;
pub mod data_source;
pub mod domain;
pub mod error;
pub mod http_client;
pub mod provider_policy;
pub mod source;
pub mod throttling;

// Adapter implementations
pub use adapters::{AlphaVantageAdapter, FixtureSource};

// Averaging
pub use averaging::{mean, AverageError, IntervalAverager};

// Price source trait and types
pub use data_source::{PriceRequest, PriceSeries, PriceSource, SourceError, SourceErrorKind};

// Domain models
pub use domain::{
    format_date, parse_date, AverageResult, Interval, MarketTime, PriceField, PricePoint,
    Resolution, Symbol, DEFAULT_LOOKBACK_DAYS,
};

// Error types
pub use error::ValidationError;

// HTTP client types
pub use http_client::{HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient};

// Provider policies
pub use provider_policy::ProviderPolicy;

// Source identifiers
pub use source::ProviderId;

// Throttling
pub use throttling::Throttle;
