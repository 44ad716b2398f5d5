use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::binance::BinanceRestClient;
use crate::error::{ForecastError, Result};
use crate::model::candle::Candle;
use crate::model::horizon::Granularity;
use crate::model::window::PriceWindow;

/// Supplies the recent OHLC window the forecast is computed from.
#[async_trait]
pub trait WindowSource: Send + Sync {
    async fn fetch(
        &self,
        pair: &str,
        granularity: Granularity,
        minimum_length: usize,
    ) -> Result<PriceWindow>;
}

/// Live candles from the public Binance klines endpoint. One request, no retry.
pub struct BinanceWindowSource {
    client: Arc<BinanceRestClient>,
    limit: usize,
}

impl BinanceWindowSource {
    pub fn new(client: Arc<BinanceRestClient>, limit: usize) -> Self {
        Self { client, limit }
    }
}

#[async_trait]
impl WindowSource for BinanceWindowSource {
    async fn fetch(
        &self,
        pair: &str,
        granularity: Granularity,
        minimum_length: usize,
    ) -> Result<PriceWindow> {
        let limit = self.limit.max(minimum_length);
        let candles = self
            .client
            .get_klines(pair, granularity.kline_interval(), limit)
            .await
            .map_err(|e| ForecastError::DataSource(format!("{}: {:#}", pair, e)))?;
        PriceWindow::from_candles(&candles, minimum_length)
    }
}

/// Fixed candles keyed by (pair, granularity); serves the trailing `limit` bars.
#[derive(Debug, Clone, Default)]
pub struct StaticWindowSource {
    candles: HashMap<(String, Granularity), Vec<Candle>>,
    limit: Option<usize>,
}

impl StaticWindowSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn insert(&mut self, pair: &str, granularity: Granularity, candles: Vec<Candle>) {
        self.candles
            .insert((pair.trim().to_ascii_uppercase(), granularity), candles);
    }

    /// Convenience for close-only series: each bar is flat at its close.
    pub fn insert_closes(&mut self, pair: &str, granularity: Granularity, closes: &[f64]) {
        let candles = closes
            .iter()
            .enumerate()
            .map(|(i, close)| Candle {
                open: *close,
                high: *close,
                low: *close,
                close: *close,
                open_time: i as u64,
                close_time: i as u64 + 1,
            })
            .collect();
        self.insert(pair, granularity, candles);
    }
}

#[async_trait]
impl WindowSource for StaticWindowSource {
    async fn fetch(
        &self,
        pair: &str,
        granularity: Granularity,
        minimum_length: usize,
    ) -> Result<PriceWindow> {
        let key = (pair.trim().to_ascii_uppercase(), granularity);
        let candles = self.candles.get(&key).ok_or_else(|| {
            ForecastError::DataSource(format!("no {} candles for {}", granularity, pair))
        })?;
        let take = self
            .limit
            .map(|l| l.max(minimum_length))
            .unwrap_or(candles.len())
            .min(candles.len());
        PriceWindow::from_candles(&candles[candles.len() - take..], minimum_length)
    }
}
