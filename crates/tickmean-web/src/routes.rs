//! HTTP routes.
//!
//! | Route | Description |
//! |-------|-------------|
//! | `GET /` | Calculator page with sidebar form |
//! | `GET /api/average` | JSON average for `symbol`, `start`, `end` |
//! | `GET /api/average.csv` | Same average as a CSV download |
//! | `GET /health` | Liveness check |

use axum::extract::{Query, State};
use axum::http::header;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tickmean_core::{
    parse_date, AverageError, AverageResult, Interval, IntervalAverager, ValidationError,
};
use time::{Date, OffsetDateTime};
use tower_http::trace::TraceLayer;
use tracing::debug;

use crate::error::ApiError;
use crate::render::{self, FormValues, Panel};

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    averager: IntervalAverager,
    lookback_days: u16,
    today: fn() -> Date,
}

impl AppState {
    pub fn new(averager: IntervalAverager, lookback_days: u16) -> Self {
        Self {
            averager,
            lookback_days,
            today: utc_today,
        }
    }

    /// Replaces the clock used for default date ranges.
    #[cfg(test)]
    pub fn with_today(mut self, today: fn() -> Date) -> Self {
        self.today = today;
        self
    }

    async fn average(&self, query: &AverageQuery) -> Result<AverageResult, AverageError> {
        let interval = query.interval((self.today)(), self.lookback_days)?;
        self.averager
            .compute_average(query.symbol.as_deref().unwrap_or_default(), interval)
            .await
    }
}

fn utc_today() -> Date {
    OffsetDateTime::now_utc().date()
}

/// Query string shared by the page and the API routes.
///
/// Empty values count as absent, which is what an HTML form submits for
/// untouched date inputs.
#[derive(Debug, Default, Deserialize)]
pub struct AverageQuery {
    pub symbol: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
}

impl AverageQuery {
    fn interval(&self, today: Date, lookback_days: u16) -> Result<Interval, ValidationError> {
        let start = non_empty(self.start.as_deref()).map(parse_date).transpose()?;
        let end = non_empty(self.end.as_deref()).map(parse_date).transpose()?;
        Interval::resolve(start, end, today, lookback_days)
    }

    fn form_values(&self) -> FormValues<'_> {
        FormValues {
            symbol: self.symbol.as_deref().unwrap_or_default(),
            start: self.start.as_deref().unwrap_or_default(),
            end: self.end.as_deref().unwrap_or_default(),
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/average", get(api_average))
        .route("/api/average.csv", get(api_average_csv))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn index(State(state): State<AppState>, Query(query): Query<AverageQuery>) -> Html<String> {
    let form = query.form_values();
    if query.symbol.is_none() {
        return Html(render::page(
            &form,
            Panel::Instructions {
                lookback_days: state.lookback_days,
            },
        ));
    }

    let html = match state.average(&query).await {
        Ok(result) => render::page(&form, Panel::Result(&result)),
        Err(error) => {
            debug!(code = error.code(), "rendering error panel");
            render::page(&form, Panel::Error(&error))
        }
    };
    Html(html)
}

async fn api_average(
    State(state): State<AppState>,
    Query(query): Query<AverageQuery>,
) -> Result<Json<AverageResult>, ApiError> {
    Ok(Json(state.average(&query).await?))
}

async fn api_average_csv(
    State(state): State<AppState>,
    Query(query): Query<AverageQuery>,
) -> Result<Response, ApiError> {
    let result = state.average(&query).await?;
    let disposition = format!(
        "attachment; filename=\"{}\"",
        render::csv_filename(&result, (state.today)())
    );
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (header::CONTENT_DISPOSITION, disposition.as_str()),
        ],
        render::csv(&result),
    )
        .into_response())
}

async fn health() -> &'static str {
    "ok"
}
