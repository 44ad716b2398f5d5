use anyhow::{anyhow, bail, Context, Result};
use serde::Serialize;

use coin_forecast::binance::BinanceRestClient;
use coin_forecast::config::Config;
use coin_forecast::evaluation::{walk_forward, EvaluationReport};
use coin_forecast::forecast::OracleRegistry;
use coin_forecast::logging;
use coin_forecast::model::horizon::Granularity;

const DEFAULT_FETCH: usize = 500;
const DEFAULT_TEST_STEPS: usize = 100;

#[derive(Debug, Serialize)]
struct EvaluationOutput {
    symbol: String,
    pair: String,
    mode: Granularity,
    model: String,
    window_len: usize,
    #[serde(flatten)]
    report: EvaluationReport,
}

#[tokio::main]
async fn main() -> Result<()> {
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow!("failed to install rustls crypto provider"))?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() < 2 || args.iter().any(|a| a == "--help" || a == "-h") {
        println!("usage: evaluate <SYMBOL> <daily|hourly> [--fetch N] [--test-steps N]");
        return Ok(());
    }
    let mode: Granularity = args[1].parse()?;
    let mut fetch = DEFAULT_FETCH;
    let mut test_steps = DEFAULT_TEST_STEPS;
    let mut it = args[2..].iter();
    while let Some(flag) = it.next() {
        let value = it
            .next()
            .ok_or_else(|| anyhow!("`{}` requires a value", flag))?;
        let n: usize = value
            .parse()
            .with_context(|| format!("`{}` value `{}` is not a count", flag, value))?;
        match flag.as_str() {
            "--fetch" => fetch = n,
            "--test-steps" => test_steps = n,
            other => bail!("unknown flag `{}`", other),
        }
    }

    let config = Config::load()?;
    logging::init(&config.logging)?;

    let instruments = config.instrument_table()?;
    let (symbol, pair) = instruments.resolve(&args[0])?;
    let registry = OracleRegistry::load_dir(
        &config.models.dir,
        &config.models.quote_currency,
        &instruments,
    )?;
    let oracle = registry.get(&symbol, mode)?;

    let client = BinanceRestClient::new(&config.binance.rest_base_url, config.binance.http_timeout())?;
    let candles = client
        .get_klines(pair, mode.kline_interval(), fetch)
        .await
        .with_context(|| format!("failed to fetch {} {} candles", pair, mode))?;
    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();

    // Same window length as live forecasts, capped by what history allows.
    let window_len = config
        .binance
        .window_limit
        .min(closes.len().saturating_sub(test_steps))
        .max(oracle.lookback());
    let metrics = walk_forward(&closes, oracle.as_ref(), window_len, test_steps)?;

    let output = EvaluationOutput {
        model: registry.key_for(&symbol, mode),
        pair: pair.to_string(),
        symbol,
        mode,
        window_len,
        report: EvaluationReport::from(&metrics),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
