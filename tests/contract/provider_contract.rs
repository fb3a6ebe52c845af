use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};

use tickmean_core::{
    AlphaVantageAdapter, FixtureSource, HttpClient, HttpError, HttpRequest, HttpResponse,
    Interval, MarketTime, PricePoint, PriceRequest, PriceSource, ProviderId, Symbol,
};
use time::macros::date;

const ALPHAVANTAGE_BODY: &str = r#"{
    "Meta Data": {"2. Symbol": "AAPL", "6. Time Zone": "US/Eastern"},
    "Time Series (Daily)": {
        "2024-01-09": {"1. open": "184", "2. high": "186", "3. low": "183", "4. close": "185", "5. volume": "9"},
        "2024-01-05": {"1. open": "181", "2. high": "182", "3. low": "179", "4. close": "179", "5. volume": "9"},
        "2024-01-04": {"1. open": "182", "2. high": "184", "3. low": "180", "4. close": "183", "5. volume": "9"},
        "2024-01-02": {"1. open": "187", "2. high": "188", "3. low": "179", "4. close": "180", "5. volume": "9"}
    }
}"#;

struct StaticHttpClient(&'static str);

impl HttpClient for StaticHttpClient {
    fn execute<'a>(
        &'a self,
        _request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        let body = self.0;
        Box::pin(async move { Ok(HttpResponse::ok_json(body)) })
    }
}

#[derive(Clone)]
struct ProviderCase {
    id: ProviderId,
    source: Arc<dyn PriceSource>,
}

fn provider_cases() -> Vec<ProviderCase> {
    let point = |date, price| PricePoint::new(MarketTime::from_date(date), price).expect("valid");
    let fixture = FixtureSource::new().with_series(
        Symbol::parse("AAPL").expect("valid symbol"),
        vec![
            point(date!(2024-01-09), 185.0),
            point(date!(2024-01-04), 183.0),
            point(date!(2024-01-02), 180.0),
            point(date!(2024-01-05), 179.0),
        ],
    );

    vec![
        ProviderCase {
            id: ProviderId::Alphavantage,
            source: Arc::new(AlphaVantageAdapter::new(
                Arc::new(StaticHttpClient(ALPHAVANTAGE_BODY)),
                "contract-key",
            )),
        },
        ProviderCase {
            id: ProviderId::Fixture,
            source: Arc::new(fixture),
        },
    ]
}

fn request() -> PriceRequest {
    let interval = Interval::new(date!(2024-01-01), date!(2024-01-08)).expect("valid interval");
    PriceRequest::new(Symbol::parse("AAPL").expect("valid symbol"), interval)
}

#[test]
fn every_provider_reports_its_own_id() {
    for case in provider_cases() {
        assert_eq!(case.source.id(), case.id);
    }
}

#[test]
fn series_echoes_requested_symbol() {
    for case in provider_cases() {
        let series = block_on(case.source.prices(request()))
            .unwrap_or_else(|error| panic!("provider '{}' failed: {error}", case.id));
        assert_eq!(series.symbol.as_str(), "AAPL", "provider '{}': symbol", case.id);
    }
}

#[test]
fn series_stays_inside_half_open_interval() {
    let req = request();
    for case in provider_cases() {
        let series = block_on(case.source.prices(req.clone()))
            .unwrap_or_else(|error| panic!("provider '{}' failed: {error}", case.id));

        assert!(!series.is_empty(), "provider '{}': expected points", case.id);
        for point in &series.points {
            assert!(
                req.interval.contains(point.date()),
                "provider '{}': {} outside {}",
                case.id,
                point.observed_at,
                req.interval
            );
        }
    }
}

#[test]
fn series_is_oldest_first_with_valid_prices() {
    for case in provider_cases() {
        let series = block_on(case.source.prices(request()))
            .unwrap_or_else(|error| panic!("provider '{}' failed: {error}", case.id));

        let stamps: Vec<_> = series.points.iter().map(|p| p.observed_at).collect();
        let mut sorted = stamps.clone();
        sorted.sort();
        assert_eq!(stamps, sorted, "provider '{}': ordering", case.id);

        for point in &series.points {
            assert!(
                point.price.is_finite() && point.price >= 0.0,
                "provider '{}': price {}",
                case.id,
                point.price
            );
        }
    }
}

#[test]
fn providers_agree_on_closing_prices() {
    let closes: Vec<Vec<f64>> = provider_cases()
        .into_iter()
        .map(|case| {
            block_on(case.source.prices(request()))
                .expect("provider should succeed")
                .points
                .iter()
                .map(|p| p.price)
                .collect()
        })
        .collect();

    assert_eq!(closes[0], vec![180.0, 183.0, 179.0]);
    assert_eq!(closes[0], closes[1]);
}

fn block_on<F>(future: F) -> F::Output
where
    F: Future,
{
    let waker = noop_waker();
    let mut context = Context::from_waker(&waker);
    let mut future = std::pin::pin!(future);

    loop {
        match future.as_mut().poll(&mut context) {
            Poll::Ready(output) => return output,
            Poll::Pending => std::thread::yield_now(),
        }
    }
}

fn noop_waker() -> Waker {
    // SAFETY: The vtable functions never dereference the data pointer and are no-op operations.
    unsafe { Waker::from_raw(noop_raw_waker()) }
}

fn noop_raw_waker() -> RawWaker {
    RawWaker::new(std::ptr::null(), &NOOP_RAW_WAKER_VTABLE)
}

unsafe fn noop_raw_waker_clone(_: *const ()) -> RawWaker {
    noop_raw_waker()
}

unsafe fn noop_raw_waker_wake(_: *const ()) {}

unsafe fn noop_raw_waker_wake_by_ref(_: *const ()) {}

unsafe fn noop_raw_waker_drop(_: *const ()) {}

static NOOP_RAW_WAKER_VTABLE: RawWakerVTable = RawWakerVTable::new(
    noop_raw_waker_clone,
    noop_raw_waker_wake,
    noop_raw_waker_wake_by_ref,
    noop_raw_waker_drop,
);
