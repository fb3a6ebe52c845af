//! Price source trait and request/response types.
//!
//! [`PriceSource`] is the collaborator the interval averager consumes: given a
//! symbol and a date range it returns dated price observations. Adapters
//! translate provider failures into a [`SourceError`] with a stable code.
//!
//! # Example
//!
//! ```rust,ignore
//! use tickmean_core::{AlphaVantageAdapter, Interval, PriceRequest, PriceSource, Symbol};
//!
//! async fn closes(adapter: &AlphaVantageAdapter, interval: Interval) -> Result<(), SourceError> {
//!     let request = PriceRequest::new(Symbol::parse("AAPL")?, interval);
//!     let series = adapter.prices(request).await?;
//!     for point in &series.points {
//!         println!("{}: ${:.2}", point.observed_at, point.price);
//!     }
//!     Ok(())
//! }
//! ```

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::{Interval, PriceField, PricePoint, ProviderId, Resolution, Symbol};

/// Adapter-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    Unavailable,
    RateLimited,
    UnknownSymbol,
    InvalidRequest,
    Internal,
}

/// Structured error reported by a price source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
    retryable: bool,
}

impl SourceError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Unavailable,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::RateLimited,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn unknown_symbol(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::UnknownSymbol,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::InvalidRequest,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Internal,
            message: message.into(),
            retryable: false,
        }
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn retryable(&self) -> bool {
        self.retryable
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            SourceErrorKind::Unavailable => "source.unavailable",
            SourceErrorKind::RateLimited => "source.rate_limited",
            SourceErrorKind::UnknownSymbol => "source.unknown_symbol",
            SourceErrorKind::InvalidRequest => "source.invalid_request",
            SourceErrorKind::Internal => "source.internal",
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for SourceError {}

/// Request payload for a price lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceRequest {
    pub symbol: Symbol,
    pub interval: Interval,
    pub resolution: Resolution,
    pub field: PriceField,
}

impl PriceRequest {
    pub fn new(symbol: Symbol, interval: Interval) -> Self {
        Self {
            symbol,
            interval,
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
}

/// Price observations for one symbol, oldest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    pub symbol: Symbol,
    pub points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(symbol: Symbol, points: Vec<PricePoint>) -> Self {
        Self { symbol, points }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Price provider contract.
///
/// Implementations must be `Send + Sync`; the web service shares a single
/// instance across request handlers.
pub trait PriceSource: Send + Sync {
    /// Returns the provider identifier.
    fn id(&self) -> ProviderId;

    /// Fetches price observations for `req.symbol` within `req.interval`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if:
    /// - The provider is unreachable or answers with a non-success status
    /// - The provider (or the local throttle) reports a rate limit
    /// - The provider does not know the symbol
    /// - The response cannot be parsed
    fn prices<'a>(
        &'a self,
        req: PriceRequest,
    ) -> Pin<Box<dyn Future<Output = Result<PriceSeries, SourceError>> + Send + 'a>>;
}
