use crate::error::{ForecastError, Result};
use crate::model::candle::Candle;

/// Number of trailing observations the oracles are trained on.
pub const DEFAULT_LOOKBACK: usize = 60;

/// Latest bar of a window, reported alongside the forecast.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarketSnapshot {
    pub close: f64,
    pub high: f64,
    pub low: f64,
}

/// Ordered closing prices, most recent last. Immutable once captured.
#[derive(Debug, Clone)]
pub struct PriceWindow {
    closes: Vec<f64>,
    latest: MarketSnapshot,
}

impl PriceWindow {
    pub fn from_candles(candles: &[Candle], min_len: usize) -> Result<Self> {
        let Some(last) = candles.last() else {
            return Err(ForecastError::DataSource(
                "window source returned no candles".to_string(),
            ));
        };
        if let Some(bad) = candles.iter().find(|c| !c.is_well_formed()) {
            return Err(ForecastError::DataSource(format!(
                "malformed candle at open_time {}",
                bad.open_time
            )));
        }
        let closes = candles.iter().map(|c| c.close).collect::<Vec<_>>();
        Self::check_len(closes.len(), min_len)?;
        Ok(Self {
            closes,
            latest: MarketSnapshot {
                close: last.close,
                high: last.high,
                low: last.low,
            },
        })
    }

    /// Build a window from closes only; the snapshot high/low collapse to the last close.
    pub fn from_closes(closes: Vec<f64>, min_len: usize) -> Result<Self> {
        Self::check_len(closes.len(), min_len)?;
        if closes.iter().any(|v| !v.is_finite()) {
            return Err(ForecastError::DataSource(
                "window contains non-finite prices".to_string(),
            ));
        }
        let last = closes[closes.len() - 1];
        Ok(Self {
            closes,
            latest: MarketSnapshot {
                close: last,
                high: last,
                low: last,
            },
        })
    }

    fn check_len(len: usize, min_len: usize) -> Result<()> {
        if len == 0 || len < min_len {
            return Err(ForecastError::DataSource(format!(
                "window has {} observations, need at least {}",
                len, min_len
            )));
        }
        Ok(())
    }

    pub fn closes(&self) -> &[f64] {
        &self.closes
    }

    pub fn len(&self) -> usize {
        self.closes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.closes.is_empty()
    }

    pub fn latest(&self) -> MarketSnapshot {
        self.latest
    }

    pub fn current_price(&self) -> f64 {
        self.latest.close
    }
}
