use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::{ForecastError, Result};

/// One supported coin and the exchange pair its candles are fetched from.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InstrumentSpec {
    pub symbol: String,
    pub pair: String,
}

/// Immutable symbol -> exchange pair mapping, passed to whoever needs it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstrumentTable {
    by_symbol: BTreeMap<String, String>,
}

const DEFAULT_COINS: [&str; 8] = ["BNB", "BTC", "ETH", "SOL", "XRP", "DOGE", "DOT", "TRX"];

impl Default for InstrumentTable {
    fn default() -> Self {
        let by_symbol = DEFAULT_COINS
            .iter()
            .map(|s| (s.to_string(), format!("{}USDT", s)))
            .collect();
        Self { by_symbol }
    }
}

impl InstrumentTable {
    pub fn from_specs(specs: &[InstrumentSpec]) -> Result<Self> {
        let mut by_symbol = BTreeMap::new();
        for spec in specs {
            let symbol = normalize_symbol(&spec.symbol);
            let pair = spec.pair.trim().to_ascii_uppercase();
            if symbol.is_empty() || pair.is_empty() {
                return Err(ForecastError::InvalidParameter(
                    "instrument symbol and pair must be non-empty".to_string(),
                ));
            }
            if by_symbol.insert(symbol.clone(), pair).is_some() {
                return Err(ForecastError::InvalidParameter(format!(
                    "instrument {} listed twice",
                    symbol
                )));
            }
        }
        Ok(Self { by_symbol })
    }

    /// Resolve a user-facing symbol (case-insensitive) to its canonical form and pair.
    pub fn resolve(&self, symbol: &str) -> Result<(String, &str)> {
        let key = normalize_symbol(symbol);
        self.by_symbol
            .get(&key)
            .map(|pair| (key.clone(), pair.as_str()))
            .ok_or_else(|| ForecastError::UnsupportedInstrument(symbol.trim().to_string()))
    }

    pub fn pair_for(&self, symbol: &str) -> Option<&str> {
        self.by_symbol
            .get(&normalize_symbol(symbol))
            .map(String::as_str)
    }

    /// Symbols in deterministic lexical order.
    pub fn symbols(&self) -> Vec<String> {
        self.by_symbol.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.by_symbol.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_symbol.is_empty()
    }
}

fn normalize_symbol(symbol: &str) -> String {
    symbol.trim().to_ascii_uppercase()
}
