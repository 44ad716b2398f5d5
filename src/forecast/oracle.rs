use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ForecastError, Result};

/// One-step predictor over a fixed-length scaled buffer.
///
/// Implementations are trained elsewhere; the engine only invokes them.
pub trait Oracle: Send + Sync {
    /// Predict the next scaled value from exactly `lookback()` scaled observations.
    fn predict(&self, buffer: &[f64]) -> Result<f64>;

    /// Length of the input buffer the oracle was trained on.
    fn lookback(&self) -> usize;

    fn name(&self) -> &str {
        "oracle"
    }
}

/// Linear autoregressive artifact: `bias + sum(w_i * x_i)` over the trailing window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearOracle {
    #[serde(default)]
    pub name: String,
    pub lookback: usize,
    pub weights: Vec<f64>,
    #[serde(default)]
    pub bias: f64,
}

impl LinearOracle {
    pub fn new(weights: Vec<f64>, bias: f64) -> Result<Self> {
        let oracle = Self {
            name: "linear".to_string(),
            lookback: weights.len(),
            weights,
            bias,
        };
        oracle.validate()?;
        Ok(oracle)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let oracle: Self = serde_json::from_str(raw)
            .map_err(|e| ForecastError::InvalidParameter(format!("oracle artifact: {}", e)))?;
        oracle.validate()?;
        Ok(oracle)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            ForecastError::InvalidParameter(format!("failed to read {}: {}", path.display(), e))
        })?;
        let mut oracle = Self::from_json(&raw)?;
        if oracle.name.is_empty() {
            oracle.name = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
        }
        Ok(oracle)
    }

    fn validate(&self) -> Result<()> {
        if self.lookback == 0 {
            return Err(ForecastError::InvalidParameter(
                "oracle lookback must be > 0".to_string(),
            ));
        }
        if self.weights.len() != self.lookback {
            return Err(ForecastError::InvalidParameter(format!(
                "oracle has {} weights for lookback {}",
                self.weights.len(),
                self.lookback
            )));
        }
        if !self.bias.is_finite() || self.weights.iter().any(|w| !w.is_finite()) {
            return Err(ForecastError::InvalidParameter(
                "oracle weights must be finite".to_string(),
            ));
        }
        Ok(())
    }
}

impl Oracle for LinearOracle {
    fn predict(&self, buffer: &[f64]) -> Result<f64> {
        if buffer.len() != self.lookback {
            return Err(ForecastError::Oracle(format!(
                "{} expects {} inputs, got {}",
                self.name,
                self.lookback,
                buffer.len()
            )));
        }
        let out = self
            .weights
            .iter()
            .zip(buffer)
            .fold(self.bias, |acc, (w, x)| acc + w * x);
        if !out.is_finite() {
            return Err(ForecastError::Oracle(format!(
                "{} produced a non-finite value",
                self.name
            )));
        }
        Ok(out)
    }

    fn lookback(&self) -> usize {
        self.lookback
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_oracle_is_weighted_sum_plus_bias() {
        let oracle = LinearOracle::new(vec![0.5, 0.25, 0.25], 0.1).unwrap();
        let out = oracle.predict(&[0.2, 0.4, 0.8]).unwrap();
        assert!((out - (0.1 + 0.1 + 0.1 + 0.2)).abs() < 1e-12);
    }

    #[test]
    fn wrong_buffer_length_is_an_oracle_failure() {
        let oracle = LinearOracle::new(vec![1.0; 4], 0.0).unwrap();
        assert!(matches!(
            oracle.predict(&[0.0; 3]),
            Err(ForecastError::Oracle(_))
        ));
    }

    #[test]
    fn artifact_with_mismatched_weights_is_rejected() {
        let raw = r#"{ "lookback": 3, "weights": [0.1, 0.2], "bias": 0.0 }"#;
        assert!(LinearOracle::from_json(raw).is_err());

        let raw = r#"{ "lookback": 2, "weights": [0.1, 0.9] }"#;
        let oracle = LinearOracle::from_json(raw).unwrap();
        assert_eq!(oracle.lookback(), 2);
        assert_eq!(oracle.bias, 0.0);
    }
}
