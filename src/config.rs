use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::forecast::confidence::ConfidenceConfig;
use crate::instrument::{InstrumentSpec, InstrumentTable};

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub binance: BinanceConfig,
    pub models: ModelsConfig,
    pub forecast: ForecastConfig,
    #[serde(default)]
    pub instruments: Vec<InstrumentSpec>,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BinanceConfig {
    pub rest_base_url: String,
    /// Candles requested per window; the normalizer is fit over all of them.
    pub window_limit: usize,
    #[serde(default = "default_http_timeout_ms")]
    pub http_timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelsConfig {
    pub dir: PathBuf,
    pub quote_currency: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ForecastConfig {
    pub lookback: usize,
    pub confidence_samples: usize,
    pub jitter_scale: f64,
    pub baseline_fraction: f64,
    pub request_timeout_ms: u64,
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    #[serde(default)]
    pub file: Option<PathBuf>,
}

fn default_http_timeout_ms() -> u64 {
    10_000
}

impl BinanceConfig {
    pub fn http_timeout(&self) -> Duration {
        Duration::from_millis(self.http_timeout_ms)
    }
}

impl ForecastConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn confidence(&self) -> ConfidenceConfig {
        ConfidenceConfig {
            samples: self.confidence_samples,
            jitter_scale: self.jitter_scale,
            baseline_fraction: self.baseline_fraction,
            seed: self.seed,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new(DEFAULT_CONFIG_PATH))
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        dotenvy::dotenv().ok();

        let config_str = std::fs::read_to_string(config_path)
            .with_context(|| format!("failed to read {}", config_path.display()))?;

        let mut config: Config = toml::from_str(&config_str)
            .with_context(|| format!("failed to parse {}", config_path.display()))?;

        if let Ok(dir) = std::env::var("FORECAST_MODEL_DIR") {
            config.models.dir = PathBuf::from(dir);
        }
        if let Ok(url) = std::env::var("BINANCE_REST_BASE_URL") {
            config.binance.rest_base_url = url;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Config = toml::from_str(raw).context("failed to parse config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let f = &self.forecast;
        if f.lookback == 0 {
            bail!("forecast.lookback must be > 0");
        }
        if self.binance.window_limit < f.lookback {
            bail!(
                "binance.window_limit ({}) must be >= forecast.lookback ({})",
                self.binance.window_limit,
                f.lookback
            );
        }
        if !f.jitter_scale.is_finite() || f.jitter_scale < 0.0 {
            bail!("forecast.jitter_scale must be >= 0, got {}", f.jitter_scale);
        }
        if !f.baseline_fraction.is_finite() || f.baseline_fraction <= 0.0 {
            bail!(
                "forecast.baseline_fraction must be > 0, got {}",
                f.baseline_fraction
            );
        }
        if f.request_timeout_ms == 0 {
            bail!("forecast.request_timeout_ms must be > 0");
        }
        if self.models.quote_currency.trim().is_empty() {
            bail!("models.quote_currency must be set");
        }
        let mut seen = HashSet::new();
        for spec in &self.instruments {
            if !seen.insert(spec.symbol.trim().to_ascii_uppercase()) {
                bail!("instrument {} listed twice", spec.symbol);
            }
        }
        Ok(())
    }

    /// Configured instruments, or the default eight coins when none are listed.
    pub fn instrument_table(&self) -> Result<InstrumentTable> {
        if self.instruments.is_empty() {
            return Ok(InstrumentTable::default());
        }
        InstrumentTable::from_specs(&self.instruments).context("invalid [[instruments]] table")
    }
}
