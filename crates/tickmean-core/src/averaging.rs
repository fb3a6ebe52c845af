//! Interval averaging.
//!
//! [`IntervalAverager`] validates the symbol, fetches observations from a
//! [`PriceSource`] once, and reduces them to an arithmetic mean.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::data_source::{PriceRequest, PriceSource, SourceError};
use crate::{AverageResult, Interval, PriceField, PricePoint, Resolution, Symbol, ValidationError};

/// Failures surfaced to the user by [`IntervalAverager::compute_average`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AverageError {
    /// Malformed symbol or date range; nothing was fetched.
    #[error("invalid input: {0}")]
    InvalidSymbol(#[from] ValidationError),

    /// The provider answered, but no observation fell inside the interval.
    #[error("no price data for {symbol} in {interval}")]
    NoData { symbol: Symbol, interval: Interval },

    /// The provider call itself failed; carries the provider's classification.
    #[error("price provider failed: {0}")]
    Provider(#[from] SourceError),
}

impl AverageError {
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidSymbol(_) => "invalid_symbol",
            Self::NoData { .. } => "no_data",
            Self::Provider(_) => "provider_error",
        }
    }
}

/// Arithmetic mean of the prices, summed in order. `None` when empty.
pub fn mean(points: &[PricePoint]) -> Option<f64> {
    if points.is_empty() {
        return None;
    }
    let sum: f64 = points.iter().map(|point| point.price).sum();
    Some(sum / points.len() as f64)
}

/// Computes mean prices over date ranges using a shared price source.
#[derive(Clone)]
pub struct IntervalAverager {
    source: Arc<dyn PriceSource>,
    resolution: Resolution,
    field: PriceField,
}

impl IntervalAverager {
    pub fn new(source: Arc<dyn PriceSource>) -> Self {
        Self {
            source,
            resolution: Resolution::default(),
            field: PriceField::default(),
        }
    }

    pub fn with_resolution(mut self, resolution: Resolution) -> Self {
        self.resolution = resolution;
        self
    }

    pub fn with_field(mut self, field: PriceField) -> Self {
        self.field = field;
        self
    }

    /// Mean price of `symbol` over `interval`.
    ///
    /// The symbol is validated before any provider call. Observations the
    /// source returns outside `interval` are ignored.
    pub async fn compute_average(
        &self,
        symbol: &str,
        interval: Interval,
    ) -> Result<AverageResult, AverageError> {
        let symbol = Symbol::parse(symbol)?;
        debug!(%symbol, %interval, resolution = %self.resolution, "computing interval average");

        let request = PriceRequest::new(symbol.clone(), interval)
            .with_resolution(self.resolution)
            .with_field(self.field);
        let series = self.source.prices(request).await.map_err(|error| {
            warn!(%symbol, code = error.code(), "price source failed: {}", error.message());
            AverageError::Provider(error)
        })?;

        let points: Vec<PricePoint> = series
            .points
            .into_iter()
            .filter(|point| interval.contains(point.date()))
            .collect();

        let (Some(average), Some(first), Some(last)) =
            (mean(&points), points.first(), points.last())
        else {
            info!(%symbol, %interval, "no price data in interval");
            return Err(AverageError::NoData { symbol, interval });
        };

        let result = AverageResult {
            symbol,
            interval,
            average,
            points: points.len(),
            first_observed: first.observed_at,
            last_observed: last.observed_at,
            source: self.source.id(),
        };
        info!(
            symbol = %result.symbol,
            %interval,
            points = result.points,
            average = result.average,
            "computed interval average"
        );
        Ok(result)
    }
}
