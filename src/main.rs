use std::sync::Arc;

use anyhow::{anyhow, Context, Result};

use coin_forecast::binance::BinanceRestClient;
use coin_forecast::cli::{self, CliCommand, ForecastArgs};
use coin_forecast::config::Config;
use coin_forecast::error::ErrorResponse;
use coin_forecast::forecast::OracleRegistry;
use coin_forecast::logging;
use coin_forecast::service::{ForecastService, ServiceSettings};
use coin_forecast::source::BinanceWindowSource;

#[tokio::main]
async fn main() -> Result<()> {
    // Install rustls crypto provider (required by rustls 0.23+)
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow!("failed to install rustls crypto provider"))?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = cli::parse_args(&args)?;
    if !command.needs_config() {
        cli::print_usage();
        return Ok(());
    }

    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {:#}", e);
            std::process::exit(1);
        }
    };
    logging::init(&config.logging)?;

    let instruments = Arc::new(config.instrument_table()?);
    let forecast_args = match command {
        CliCommand::Help => return Ok(()),
        CliCommand::ListSymbols => {
            for symbol in instruments.symbols() {
                let pair = instruments.pair_for(&symbol).unwrap_or_default();
                println!("{:<6} {}", symbol, pair);
            }
            return Ok(());
        }
        CliCommand::Forecast(f) => f,
    };

    tracing::info!(
        rest_url = %config.binance.rest_base_url,
        models = %config.models.dir.display(),
        instruments = instruments.len(),
        "Starting coin-forecast"
    );

    let registry = OracleRegistry::load_dir(
        &config.models.dir,
        &config.models.quote_currency,
        &instruments,
    )
    .with_context(|| format!("failed to load models from {}", config.models.dir.display()))?;

    let client = Arc::new(BinanceRestClient::new(
        &config.binance.rest_base_url,
        config.binance.http_timeout(),
    )?);
    let source = BinanceWindowSource::new(client, config.binance.window_limit);
    let settings = ServiceSettings {
        min_window: config.forecast.lookback,
        request_timeout: config.forecast.request_timeout(),
        confidence: config.forecast.confidence(),
    };
    let service = ForecastService::new(instruments.clone(), Arc::new(registry), source, settings);

    let ok = run_forecasts(&service, &forecast_args).await?;
    if !ok {
        std::process::exit(2);
    }
    Ok(())
}

/// Prints one JSON document per request; returns false if any request failed.
async fn run_forecasts(
    service: &ForecastService<BinanceWindowSource>,
    args: &ForecastArgs,
) -> Result<bool> {
    let requests = args.requests(&service.instruments().symbols());
    let results = service.forecast_many(&requests).await;

    let mut ok = true;
    for result in results {
        let line = match result {
            Ok(output) => serde_json::to_string_pretty(&output)?,
            Err(e) => {
                ok = false;
                serde_json::to_string_pretty(&ErrorResponse::from(&e))?
            }
        };
        println!("{}", line);
    }
    Ok(ok)
}
