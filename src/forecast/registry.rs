use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use crate::error::{ForecastError, Result};
use crate::forecast::oracle::{LinearOracle, Oracle};
use crate::instrument::InstrumentTable;
use crate::model::horizon::Granularity;

pub const ARTIFACT_EXTENSION: &str = "json";

/// (instrument, granularity) -> oracle, built once at startup.
#[derive(Default, Clone)]
pub struct OracleRegistry {
    quote_currency: String,
    oracles: HashMap<(String, Granularity), Arc<dyn Oracle>>,
}

impl std::fmt::Debug for OracleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OracleRegistry")
            .field("quote_currency", &self.quote_currency)
            .field("keys", &self.keys())
            .finish()
    }
}

impl OracleRegistry {
    pub fn new(quote_currency: impl Into<String>) -> Self {
        Self {
            quote_currency: quote_currency.into().trim().to_ascii_uppercase(),
            oracles: HashMap::new(),
        }
    }

    /// Artifact key, e.g. `BTC-INR_daily`.
    pub fn key_for(&self, instrument: &str, granularity: Granularity) -> String {
        format!(
            "{}-{}_{}",
            instrument.trim().to_ascii_uppercase(),
            self.quote_currency,
            granularity.as_str()
        )
    }

    pub fn register(
        &mut self,
        instrument: impl Into<String>,
        granularity: Granularity,
        oracle: Arc<dyn Oracle>,
    ) {
        let instrument = instrument.into().trim().to_ascii_uppercase();
        self.oracles.insert((instrument, granularity), oracle);
    }

    pub fn get(&self, instrument: &str, granularity: Granularity) -> Result<Arc<dyn Oracle>> {
        let id = (instrument.trim().to_ascii_uppercase(), granularity);
        self.oracles
            .get(&id)
            .cloned()
            .ok_or_else(|| ForecastError::OracleNotFound {
                key: self.key_for(instrument, granularity),
            })
    }

    pub fn contains(&self, instrument: &str, granularity: Granularity) -> bool {
        self.oracles
            .contains_key(&(instrument.trim().to_ascii_uppercase(), granularity))
    }

    /// Registered keys in deterministic lexical order.
    pub fn keys(&self) -> Vec<String> {
        let mut keys = self
            .oracles
            .keys()
            .map(|(instrument, granularity)| self.key_for(instrument, *granularity))
            .collect::<Vec<_>>();
        keys.sort();
        keys
    }

    /// Keys the instrument table expects but no artifact was registered for.
    pub fn missing(&self, instruments: &InstrumentTable) -> Vec<String> {
        let mut out = Vec::new();
        for symbol in instruments.symbols() {
            for granularity in Granularity::ALL {
                if !self.contains(&symbol, granularity) {
                    out.push(self.key_for(&symbol, granularity));
                }
            }
        }
        out
    }

    pub fn len(&self) -> usize {
        self.oracles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.oracles.is_empty()
    }

    /// Load `{key}.json` artifacts for every instrument and granularity under `dir`.
    ///
    /// Missing artifacts are logged and left unregistered; an artifact that exists
    /// but does not parse fails the whole load.
    pub fn load_dir(
        dir: &Path,
        quote_currency: &str,
        instruments: &InstrumentTable,
    ) -> Result<Self> {
        let mut registry = Self::new(quote_currency);
        for symbol in instruments.symbols() {
            for granularity in Granularity::ALL {
                let key = registry.key_for(&symbol, granularity);
                let path = dir.join(format!("{}.{}", key, ARTIFACT_EXTENSION));
                if !path.is_file() {
                    continue;
                }
                let oracle = LinearOracle::load(&path)?;
                tracing::debug!(
                    key = %key,
                    lookback = oracle.lookback(),
                    path = %path.display(),
                    "Loaded oracle artifact"
                );
                registry.register(symbol.clone(), granularity, Arc::new(oracle));
            }
        }

        let missing = registry.missing(instruments);
        if !missing.is_empty() {
            tracing::warn!(
                dir = %dir.display(),
                missing = ?missing,
                "Some instrument/granularity pairs have no oracle artifact"
            );
        }
        tracing::info!(
            dir = %dir.display(),
            loaded = registry.len(),
            "Oracle registry ready"
        );
        Ok(registry)
    }
}
