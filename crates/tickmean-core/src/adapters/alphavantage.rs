use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::{Map, Value};
use time::{Date, Month, OffsetDateTime};
use tracing::{debug, warn};

use crate::data_source::{PriceRequest, PriceSeries, PriceSource, SourceError};
use crate::http_client::{HttpClient, HttpRequest, ReqwestHttpClient};
use crate::provider_policy::ProviderPolicy;
use crate::throttling::Throttle;
use crate::{Interval, MarketTime, PriceField, PricePoint, ProviderId, Resolution};

pub const ALPHAVANTAGE_BASE_URL: &str = "https://www.alphavantage.co/query";
pub const API_KEY_ENV: &str = "ALPHA_VANTAGE_API_KEY";

/// Calendar days covered by `outputsize=compact` (about 100 sessions).
const COMPACT_HORIZON_DAYS: i64 = 140;
/// Calendar days covered by intraday output without a `month` parameter.
const INTRADAY_HORIZON_DAYS: i64 = 30;

/// Alpha Vantage time series adapter.
#[derive(Clone)]
pub struct AlphaVantageAdapter {
    http_client: Arc<dyn HttpClient>,
    api_key: String,
    base_url: String,
    throttle: Throttle,
    timeout_ms: u64,
}

impl AlphaVantageAdapter {
    pub fn new(http_client: Arc<dyn HttpClient>, api_key: impl Into<String>) -> Self {
        Self::with_policy(
            http_client,
            api_key,
            &ProviderPolicy::alphavantage_default(),
        )
    }

    pub fn with_policy(
        http_client: Arc<dyn HttpClient>,
        api_key: impl Into<String>,
        policy: &ProviderPolicy,
    ) -> Self {
        Self {
            http_client,
            api_key: api_key.into(),
            base_url: String::from(ALPHAVANTAGE_BASE_URL),
            throttle: Throttle::from_policy(policy),
            timeout_ms: policy.timeout_ms,
        }
    }

    /// Reqwest transport with the key from `ALPHA_VANTAGE_API_KEY`, falling back to `demo`.
    pub fn from_env() -> Self {
        let api_key = std::env::var(API_KEY_ENV).unwrap_or_else(|_| String::from("demo"));
        Self::new(Arc::new(ReqwestHttpClient::new()), api_key)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn fetch_series(&self, req: &PriceRequest) -> Result<PriceSeries, SourceError> {
        let today = OffsetDateTime::now_utc().date();
        let mut points = Vec::new();
        for window in history_windows(req, today) {
            points.extend(self.fetch_window(req, &window).await?);
        }

        points.sort_by_key(|point| point.observed_at);
        points.dedup_by_key(|point| point.observed_at);
        Ok(PriceSeries::new(req.symbol.clone(), points))
    }

    async fn fetch_window(
        &self,
        req: &PriceRequest,
        window: &[(&'static str, String)],
    ) -> Result<Vec<PricePoint>, SourceError> {
        if let Err(wait) = self.throttle.acquire() {
            return Err(SourceError::rate_limited(format!(
                "alphavantage free-tier limit exceeded; retry in {:.2}s",
                wait.as_secs_f64()
            )));
        }

        let function = function_for(req.resolution);
        let request = window.iter().fold(
            HttpRequest::get(&self.base_url)
                .with_query("function", function)
                .with_query("symbol", req.symbol.as_str()),
            |request, (name, value)| request.with_query(*name, value.as_str()),
        );
        let request = request
            .with_query("apikey", self.api_key.as_str())
            .with_timeout_ms(self.timeout_ms);

        debug!(symbol = %req.symbol, function, "requesting alphavantage time series");

        let response = self.http_client.execute(request).await.map_err(|e| {
            warn!(symbol = %req.symbol, error = e.message(), "alphavantage transport failure");
            if e.timed_out() {
                SourceError::unavailable(format!("alphavantage timed out: {}", e.message()))
            } else {
                SourceError::unavailable(format!("alphavantage transport error: {}", e.message()))
            }
        })?;

        if !response.is_success() {
            return Err(SourceError::unavailable(format!(
                "alphavantage returned status {}",
                response.status
            )));
        }

        let body: Map<String, Value> = serde_json::from_str(&response.body).map_err(|e| {
            SourceError::internal(format!("failed to parse alphavantage response: {e}"))
        })?;
        let series = extract_time_series(body)?;
        normalize_series(series, req)
    }
}

impl PriceSource for AlphaVantageAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::Alphavantage
    }

    fn prices<'a>(
        &'a self,
        req: PriceRequest,
    ) -> Pin<Box<dyn Future<Output = Result<PriceSeries, SourceError>> + Send + 'a>> {
        Box::pin(async move { self.fetch_series(&req).await })
    }
}

const fn function_for(resolution: Resolution) -> &'static str {
    match resolution {
        Resolution::Daily => "TIME_SERIES_DAILY",
        Resolution::FiveMinutes => "TIME_SERIES_INTRADAY",
    }
}

/// Query parameters for each call needed to cover `req.interval`.
///
/// `compact` daily output holds roughly the last 100 sessions and plain
/// intraday output roughly the last 30 days; older ranges ask for the full
/// daily history or one intraday month per call.
fn history_windows(req: &PriceRequest, today: Date) -> Vec<Vec<(&'static str, String)>> {
    let age_days = (today - req.interval.start()).whole_days();
    match req.resolution {
        Resolution::Daily => {
            let size = if age_days > COMPACT_HORIZON_DAYS {
                "full"
            } else {
                "compact"
            };
            vec![vec![("outputsize", String::from(size))]]
        }
        Resolution::FiveMinutes if age_days <= INTRADAY_HORIZON_DAYS => vec![vec![
            ("interval", String::from("5min")),
            ("outputsize", String::from("full")),
        ]],
        Resolution::FiveMinutes => covered_months(req.interval)
            .into_iter()
            .map(|month| {
                vec![
                    ("interval", String::from("5min")),
                    ("month", month),
                    ("outputsize", String::from("full")),
                ]
            })
            .collect(),
    }
}

/// `YYYY-MM` for every calendar month touched by the interval.
fn covered_months(interval: Interval) -> Vec<String> {
    let last = interval.end().previous_day().unwrap_or(interval.start());
    let (mut year, mut month) = (interval.start().year(), interval.start().month());
    let mut months = Vec::new();
    while (year, month as u8) <= (last.year(), last.month() as u8) {
        months.push(format!("{year:04}-{:02}", month as u8));
        if month == Month::December {
            year += 1;
        }
        month = month.next();
    }
    months
}

/// One bar as Alpha Vantage prints it: every value is a decimal string.
#[derive(Debug, Clone, Deserialize)]
struct AlphaVantageBar {
    #[serde(rename = "1. open")]
    open: String,
    #[serde(rename = "2. high")]
    high: String,
    #[serde(rename = "3. low")]
    low: String,
    #[serde(rename = "4. close")]
    close: String,
}

impl AlphaVantageBar {
    fn price(&self, field: PriceField, stamp: &str) -> Result<f64, SourceError> {
        let close = parse_decimal(&self.close, stamp)?;
        match field {
            PriceField::Close => Ok(close),
            PriceField::Typical => Ok(field.select(
                parse_decimal(&self.open, stamp)?,
                parse_decimal(&self.high, stamp)?,
                parse_decimal(&self.low, stamp)?,
                close,
            )),
        }
    }
}

fn parse_decimal(raw: &str, stamp: &str) -> Result<f64, SourceError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| SourceError::internal(format!("invalid price '{raw}' at {stamp}")))
}

/// Maps provider-level complaints onto error kinds, then pulls out the
/// `Time Series (...)` object whatever its resolution suffix.
fn extract_time_series(
    mut body: Map<String, Value>,
) -> Result<BTreeMap<String, AlphaVantageBar>, SourceError> {
    if let Some(message) = body.get("Error Message") {
        return Err(SourceError::unknown_symbol(format!(
            "alphavantage rejected the request: {}",
            message.as_str().unwrap_or("unknown error")
        )));
    }

    if body.contains_key("Note") {
        return Err(SourceError::rate_limited(
            "alphavantage call frequency limit reached; try again later",
        ));
    }

    if body.contains_key("Information") {
        return Err(SourceError::rate_limited(
            "alphavantage rate limit exceeded; wait before making another request",
        ));
    }

    let key = body
        .keys()
        .find(|key| key.starts_with("Time Series"))
        .cloned()
        .ok_or_else(|| SourceError::internal("no time series in alphavantage response"))?;
    let value = body.remove(&key).unwrap_or(Value::Null);

    serde_json::from_value(value)
        .map_err(|e| SourceError::internal(format!("failed to parse alphavantage bars: {e}")))
}

/// Keeps weekday bars inside the requested interval.
fn normalize_series(
    series: BTreeMap<String, AlphaVantageBar>,
    req: &PriceRequest,
) -> Result<Vec<PricePoint>, SourceError> {
    let mut points = Vec::with_capacity(series.len());
    for (stamp, bar) in &series {
        let observed_at = MarketTime::parse(stamp)
            .map_err(|e| SourceError::internal(format!("invalid timestamp: {e}")))?;
        if observed_at.is_weekend() || !req.interval.contains(observed_at.date()) {
            continue;
        }

        let price = bar.price(req.field, stamp)?;
        let point = PricePoint::new(observed_at, price)
            .map_err(|e| SourceError::internal(format!("invalid bar at {stamp}: {e}")))?;
        points.push(point);
    }

    Ok(points)
}
