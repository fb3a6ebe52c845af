//! Price source adapters.
//!
//! | Adapter | Provider |
//! |---------|----------|
//! | [`AlphaVantageAdapter`] | Alpha Vantage `TIME_SERIES_DAILY` / `TIME_SERIES_INTRADAY` |
//! | [`FixtureSource`] | In-memory or JSON-file observations for offline use |

pub mod alphavantage;
pub mod fixture;

pub use alphavantage::AlphaVantageAdapter;
pub use fixture::FixtureSource;
