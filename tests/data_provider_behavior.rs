//! Behavior-driven tests for Data Provider behavior
//!
//! These tests verify HOW the Alpha Vantage adapter turns provider responses
//! into price observations, and how it treats weekends, time zones and quota.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tickmean_core::{
    AlphaVantageAdapter, HttpClient, HttpError, HttpRequest, HttpResponse, Interval,
    IntervalAverager, PriceField, PriceRequest, PriceSource, ProviderPolicy, Resolution,
    SourceErrorKind, Symbol,
};
use time::macros::date;

struct RecordingHttpClient {
    body: String,
    requests: Mutex<Vec<HttpRequest>>,
}

impl RecordingHttpClient {
    fn with_body(body: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            body: body.into(),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn request_count(&self) -> usize {
        self.requests.lock().expect("not poisoned").len()
    }
}

impl HttpClient for RecordingHttpClient {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        self.requests.lock().expect("not poisoned").push(request);
        let body = self.body.clone();
        Box::pin(async move { Ok(HttpResponse::ok_json(body)) })
    }
}

const INTRADAY_BODY: &str = r#"{
    "Meta Data": {
        "1. Information": "Intraday (5min) open, high, low, close prices and volume",
        "2. Symbol": "NVDA",
        "3. Last Refreshed": "2024-05-28 19:55:00",
        "4. Interval": "5min",
        "5. Output Size": "Full size",
        "6. Time Zone": "US/Eastern"
    },
    "Time Series (5min)": {
        "2024-05-28 19:55:00": {"1. open": "1149.7200", "2. high": "1150.0000", "3. low": "1148.7300", "4. close": "1149.9900", "5. volume": "42000"},
        "2024-05-28 19:50:00": {"1. open": "1149.0400", "2. high": "1149.9800", "3. low": "1149.0100", "4. close": "1149.7500", "5. volume": "30271"},
        "2024-05-28 00:05:00": {"1. open": "1100.0000", "2. high": "1100.0000", "3. low": "1100.0000", "4. close": "1100.0000", "5. volume": "10"},
        "2024-05-27 19:45:00": {"1. open": "1.0", "2. high": "1.0", "3. low": "1.0", "4. close": "1.0", "5. volume": "1"},
        "2024-05-26 12:00:00": {"1. open": "2.0", "2. high": "2.0", "3. low": "2.0", "4. close": "2.0", "5. volume": "1"}
    }
}"#;

fn nvda_request(interval: Interval) -> PriceRequest {
    PriceRequest::new(Symbol::parse("NVDA").expect("valid"), interval)
        .with_resolution(Resolution::FiveMinutes)
}

// =============================================================================
// Data Provider: Valid Response Handling
// =============================================================================

#[tokio::test]
async fn when_alphavantage_returns_intraday_bars_they_are_dated_in_exchange_time() {
    // Given: Intraday bars stamped in US/Eastern
    let client = RecordingHttpClient::with_body(INTRADAY_BODY);
    let adapter = AlphaVantageAdapter::new(client, "key");

    // When: The user asks for 2024-05-28 only
    let interval = Interval::new(date!(2024-05-28), date!(2024-05-29)).expect("valid");
    let series = adapter
        .prices(nvda_request(interval))
        .await
        .expect("intraday series should parse");

    // Then: The just-after-midnight bar still belongs to the 28th, and nothing from the 27th leaks in
    assert_eq!(series.points.len(), 3);
    assert!(series.points.iter().all(|p| p.date() == date!(2024-05-28)));
    assert_eq!(series.points[0].observed_at.format(), "2024-05-28 00:05:00");
}

#[tokio::test]
async fn when_series_contains_weekend_bars_they_are_excluded() {
    // Given: A response including a Sunday (2024-05-26) bar
    let client = RecordingHttpClient::with_body(INTRADAY_BODY);
    let adapter = AlphaVantageAdapter::new(client, "key");

    // When: The interval spans the weekend
    let interval = Interval::new(date!(2024-05-25), date!(2024-05-28)).expect("valid");
    let series = adapter
        .prices(nvda_request(interval))
        .await
        .expect("intraday series should parse");

    // Then: Only the Monday bar survives
    assert_eq!(series.points.len(), 1);
    assert_eq!(series.points[0].date(), date!(2024-05-27));
}

#[tokio::test]
async fn typical_price_is_mean_of_ohlc_per_bar() {
    // Given: An adapter asked for typical prices
    let client = RecordingHttpClient::with_body(INTRADAY_BODY);
    let adapter = AlphaVantageAdapter::new(client, "key");
    let interval = Interval::new(date!(2024-05-28), date!(2024-05-29)).expect("valid");

    // When: The series is fetched
    let series = adapter
        .prices(nvda_request(interval).with_field(PriceField::Typical))
        .await
        .expect("intraday series should parse");

    // Then: The last bar is (open + high + low + close) / 4
    let last = series.points.last().expect("has points");
    assert_eq!(last.price, (1149.72 + 1150.0 + 1148.73 + 1149.99) / 4.0);
}

#[tokio::test]
async fn averager_over_alphavantage_uses_only_requested_day() {
    // Given: An averager backed by Alpha Vantage intraday data
    let client = RecordingHttpClient::with_body(INTRADAY_BODY);
    let averager = IntervalAverager::new(Arc::new(AlphaVantageAdapter::new(client, "key")))
        .with_resolution(Resolution::FiveMinutes);

    // When: The 28th is averaged
    let interval = Interval::new(date!(2024-05-28), date!(2024-05-29)).expect("valid");
    let result = averager
        .compute_average("nvda", interval)
        .await
        .expect("average should be computed");

    // Then: The mean covers the three bars of that day
    assert_eq!(result.points, 3);
    assert_eq!(result.average, (1100.0 + 1149.75 + 1149.99) / 3.0);
}

// =============================================================================
// Data Provider: Rate Limiting
// =============================================================================

#[tokio::test]
async fn when_quota_is_exhausted_no_network_call_is_made() {
    // Given: A policy allowing a single call per minute
    let client = RecordingHttpClient::with_body(INTRADAY_BODY);
    let policy = ProviderPolicy::alphavantage_default().with_quota(Duration::from_secs(60), 1);
    let adapter = AlphaVantageAdapter::with_policy(client.clone(), "key", &policy);
    let interval = Interval::new(date!(2024-05-28), date!(2024-05-29)).expect("valid");

    // When: Two calls are made back to back
    adapter
        .prices(nvda_request(interval))
        .await
        .expect("first call within budget");
    let error = adapter
        .prices(nvda_request(interval))
        .await
        .expect_err("second call should be throttled");

    // Then: The second is rejected locally with retry guidance
    assert_eq!(error.kind(), SourceErrorKind::RateLimited);
    assert!(error.retryable());
    assert!(error.message().contains("retry in"));
    assert_eq!(client.request_count(), 1);
}

#[tokio::test]
async fn cloned_adapters_share_the_same_quota() {
    let client = RecordingHttpClient::with_body(INTRADAY_BODY);
    let policy = ProviderPolicy::alphavantage_default().with_quota(Duration::from_secs(60), 1);
    let adapter = AlphaVantageAdapter::with_policy(client.clone(), "key", &policy);
    let clone = adapter.clone();
    let interval = Interval::new(date!(2024-05-28), date!(2024-05-29)).expect("valid");

    adapter
        .prices(nvda_request(interval))
        .await
        .expect("first call within budget");
    let error = clone
        .prices(nvda_request(interval))
        .await
        .expect_err("clone should see spent budget");

    assert_eq!(error.kind(), SourceErrorKind::RateLimited);
    assert_eq!(client.request_count(), 1);
}

#[tokio::test]
async fn custom_base_url_and_timeout_are_used() {
    let client = RecordingHttpClient::with_body(INTRADAY_BODY);
    let policy = ProviderPolicy::alphavantage_default().with_timeout_ms(1_500);
    let adapter = AlphaVantageAdapter::with_policy(client.clone(), "key", &policy)
        .with_base_url("http://localhost:9999/query");
    let interval = Interval::new(date!(2024-05-28), date!(2024-05-29)).expect("valid");

    adapter
        .prices(nvda_request(interval))
        .await
        .expect("series should parse");

    let requests = client.requests.lock().expect("not poisoned");
    assert_eq!(requests[0].url, "http://localhost:9999/query");
    assert_eq!(requests[0].timeout_ms, 1_500);
}
