use anyhow::{anyhow, bail, Result};
use serde::Deserialize;
use serde_json::Value;

use crate::model::candle::Candle;

/// Binance encodes prices as strings and times as numbers; accept either.
pub fn value_to_f64(v: &Value) -> Option<f64> {
    match v {
        Value::String(s) => s.parse::<f64>().ok(),
        Value::Number(n) => n.as_f64(),
        _ => None,
    }
}

fn value_to_u64(v: &Value) -> Option<u64> {
    match v {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.parse::<u64>().ok(),
        _ => None,
    }
}

/// Parse one `/api/v3/klines` row:
/// `[open_time, open, high, low, close, volume, close_time, ...]`.
pub fn parse_kline_row(row: &Value) -> Result<Candle> {
    let cols = row
        .as_array()
        .ok_or_else(|| anyhow!("kline row is not an array"))?;
    if cols.len() < 7 {
        bail!("kline row has {} columns, expected at least 7", cols.len());
    }
    let num = |idx: usize, name: &str| {
        value_to_f64(&cols[idx]).ok_or_else(|| anyhow!("kline {} is not numeric", name))
    };
    let time = |idx: usize, name: &str| {
        value_to_u64(&cols[idx]).ok_or_else(|| anyhow!("kline {} is not a timestamp", name))
    };
    Ok(Candle {
        open_time: time(0, "open_time")?,
        open: num(1, "open")?,
        high: num(2, "high")?,
        low: num(3, "low")?,
        close: num(4, "close")?,
        close_time: time(6, "close_time")?,
    })
}

/// Parse a klines body into candles sorted by open time.
pub fn parse_klines(body: &Value) -> Result<Vec<Candle>> {
    let rows = body
        .as_array()
        .ok_or_else(|| anyhow!("klines response is not an array"))?;
    let mut candles = rows.iter().map(parse_kline_row).collect::<Result<Vec<_>>>()?;
    candles.sort_by_key(|c| c.open_time);
    Ok(candles)
}

/// Binance API error response.
#[derive(Debug, Deserialize)]
pub struct BinanceApiErrorResponse {
    pub code: i64,
    pub msg: String,
}
