use std::collections::HashMap;
use std::future::Future;
use std::path::Path;
use std::pin::Pin;

use crate::data_source::{PriceRequest, PriceSeries, PriceSource, SourceError};
use crate::{PricePoint, ProviderId, Symbol};

/// Offline price source backed by an in-memory table.
///
/// The JSON form maps tickers to observations:
///
/// ```json
/// { "AAPL": [{ "observed_at": "2024-01-02", "price": 180.0 }] }
/// ```
#[derive(Debug, Clone, Default)]
pub struct FixtureSource {
    series: HashMap<Symbol, Vec<PricePoint>>,
}

impl FixtureSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_series(mut self, symbol: Symbol, mut points: Vec<PricePoint>) -> Self {
        points.sort_by_key(|point| point.observed_at);
        self.series.insert(symbol, points);
        self
    }

    pub fn from_json(json: &str) -> Result<Self, SourceError> {
        let raw: HashMap<Symbol, Vec<PricePoint>> = serde_json::from_str(json)
            .map_err(|e| SourceError::invalid_request(format!("invalid fixture: {e}")))?;

        raw.into_iter().try_fold(Self::new(), |fixture, (symbol, points)| {
            let points = points
                .into_iter()
                .map(|point| PricePoint::new(point.observed_at, point.price))
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| {
                    SourceError::invalid_request(format!("invalid fixture point for {symbol}: {e}"))
                })?;
            Ok(fixture.with_series(symbol, points))
        })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            SourceError::unavailable(format!("cannot read fixture {}: {e}", path.display()))
        })?;
        Self::from_json(&json)
    }

    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.series.keys()
    }
}

impl PriceSource for FixtureSource {
    fn id(&self) -> ProviderId {
        ProviderId::Fixture
    }

    fn prices<'a>(
        &'a self,
        req: PriceRequest,
    ) -> Pin<Box<dyn Future<Output = Result<PriceSeries, SourceError>> + Send + 'a>> {
        Box::pin(async move {
            let points = self
                .series
                .get(&req.symbol)
                .map(|points| {
                    points
                        .iter()
                        .filter(|point| req.interval.contains(point.date()))
                        .copied()
                        .collect()
                })
                .unwrap_or_default();

            Ok(PriceSeries::new(req.symbol, points))
        })
    }
}
