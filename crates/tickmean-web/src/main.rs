mod config;
mod error;
mod render;
mod routes;

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tickmean_core::{
    AlphaVantageAdapter, FixtureSource, IntervalAverager, PriceSource, ProviderPolicy,
    ReqwestHttpClient,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::error::ServerError;
use crate::routes::AppState;

const DEFAULT_LOG_FILTER: &str = "tickmean=info,tower_http=info";

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_target(true)
        .init();

    match run(Config::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::from(err.exit_code())
        }
    }
}

async fn run(config: Config) -> Result<(), ServerError> {
    let source = price_source(&config)?;
    info!(
        provider = %source.id(),
        resolution = %config.resolution,
        price_field = %config.price_field,
        lookback_days = config.lookback_days,
        "price source ready"
    );

    let averager = IntervalAverager::new(source)
        .with_resolution(config.resolution)
        .with_field(config.price_field);
    let app = routes::router(AppState::new(averager, config.lookback_days));

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .map_err(|source| ServerError::Bind {
            addr: config.bind,
            source,
        })?;
    info!("📈 tickmean listening on http://{}", config.bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("tickmean stopped");
    Ok(())
}

fn price_source(config: &Config) -> Result<Arc<dyn PriceSource>, ServerError> {
    if let Some(path) = &config.fixture {
        let fixture = FixtureSource::from_path(path)?;
        info!(path = %path.display(), symbols = fixture.symbols().count(), "loaded price fixture");
        return Ok(Arc::new(fixture));
    }

    let policy = ProviderPolicy::alphavantage_default().with_timeout_ms(config.timeout_ms);
    Ok(Arc::new(AlphaVantageAdapter::with_policy(
        Arc::new(ReqwestHttpClient::new()),
        config.api_key.as_str(),
        &policy,
    )))
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
}
