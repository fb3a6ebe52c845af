//! Server configuration for tickmean.
//!
//! Every option can be given as a flag or through the environment; a `.env`
//! file in the working directory is loaded before parsing.
//!
//! | Option | Environment | Default |
//! |--------|-------------|---------|
//! | `--bind` | `TICKMEAN_BIND` | `0.0.0.0:8501` |
//! | `--api-key` | `ALPHA_VANTAGE_API_KEY` | `demo` |
//! | `--lookback-days` | `TICKMEAN_LOOKBACK_DAYS` | `7` |
//! | `--resolution` | `TICKMEAN_RESOLUTION` | `1d` |
//! | `--price-field` | `TICKMEAN_PRICE_FIELD` | `close` |
//! | `--timeout-ms` | `TICKMEAN_TIMEOUT_MS` | `30000` |
//! | `--fixture` | `TICKMEAN_FIXTURE` | unset (use Alpha Vantage) |

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tickmean_core::http_client::DEFAULT_TIMEOUT_MS;
use tickmean_core::{PriceField, Resolution, DEFAULT_LOOKBACK_DAYS};

/// 📈 tickmean - mean stock price over a date interval
#[derive(Parser)]
#[command(
    name = "tickmean",
    author,
    version,
    about = "Serve mean stock/ETF prices over a date interval"
)]
pub struct Config {
    /// Address the web server listens on.
    #[arg(long, env = "TICKMEAN_BIND", default_value = "0.0.0.0:8501")]
    pub bind: SocketAddr,

    /// Alpha Vantage API key.
    #[arg(
        long,
        env = "ALPHA_VANTAGE_API_KEY",
        default_value = "demo",
        hide_env_values = true,
        hide_default_value = true
    )]
    pub api_key: String,

    /// Calendar days averaged when the user gives no start date.
    #[arg(
        long,
        env = "TICKMEAN_LOOKBACK_DAYS",
        default_value_t = DEFAULT_LOOKBACK_DAYS,
        value_parser = clap::value_parser!(u16).range(1..)
    )]
    pub lookback_days: u16,

    /// Bar resolution requested from the provider (1d, 5m).
    #[arg(long, env = "TICKMEAN_RESOLUTION", default_value_t = Resolution::Daily)]
    pub resolution: Resolution,

    /// Price taken from each bar (close, typical).
    #[arg(long, env = "TICKMEAN_PRICE_FIELD", default_value_t = PriceField::Close)]
    pub price_field: PriceField,

    /// Provider request timeout in milliseconds.
    #[arg(long, env = "TICKMEAN_TIMEOUT_MS", default_value_t = DEFAULT_TIMEOUT_MS)]
    pub timeout_ms: u64,

    /// Serve prices from a JSON fixture instead of Alpha Vantage.
    #[arg(long, env = "TICKMEAN_FIXTURE")]
    pub fixture: Option<PathBuf>,
}
