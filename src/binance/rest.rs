use anyhow::{anyhow, Context, Result};
use std::time::Duration;

use crate::model::candle::Candle;

use super::types::{parse_klines, BinanceApiErrorResponse};

/// Binance caps a single klines request at 1000 rows.
pub const MAX_KLINES_PER_REQUEST: usize = 1000;

pub struct BinanceRestClient {
    http: reqwest::Client,
    base_url: String,
}

impl BinanceRestClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn klines_url(&self, symbol: &str, interval: &str, limit: usize) -> String {
        format!(
            "{}/api/v3/klines?symbol={}&interval={}&limit={}",
            self.base_url,
            symbol.trim().to_ascii_uppercase(),
            interval,
            limit.clamp(1, MAX_KLINES_PER_REQUEST)
        )
    }

    /// Most recent `limit` candles for `symbol`, oldest first.
    pub async fn get_klines(&self, symbol: &str, interval: &str, limit: usize) -> Result<Vec<Candle>> {
        let url = self.klines_url(symbol, interval, limit);

        tracing::debug!(symbol, interval, limit, "Fetching klines");

        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .context("get_klines HTTP failed")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            if let Ok(err) = serde_json::from_str::<BinanceApiErrorResponse>(&body) {
                return Err(anyhow!(
                    "binance API error (code {}): {}",
                    err.code,
                    err.msg
                ));
            }
            return Err(anyhow!("klines request failed with {}: {}", status, body));
        }

        let body: serde_json::Value = resp
            .json()
            .await
            .context("get_klines JSON parse failed")?;
        let candles = parse_klines(&body)?;
        tracing::debug!(symbol, interval, count = candles.len(), "Fetched klines");
        Ok(candles)
    }
}
