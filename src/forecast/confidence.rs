use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use rayon::prelude::*;

use crate::error::{ForecastError, Result};
use crate::forecast::engine::{initial_buffer, rollout};
use crate::forecast::normalizer::{ScaledWindow, Transform};
use crate::forecast::oracle::Oracle;

pub const MIN_TRIALS: usize = 3;
pub const CONFIDENCE_MIN: f64 = 5.0;
pub const CONFIDENCE_MAX: f64 = 99.0;
pub const BASELINE_FLOOR: f64 = 1e-6;

#[derive(Debug, Clone)]
pub struct ConfidenceConfig {
    /// Number of jittered rollouts; values below `MIN_TRIALS` are raised to it.
    pub samples: usize,
    /// Std-dev of the Gaussian noise added in scaled space.
    pub jitter_scale: f64,
    /// Fraction of the current price treated as full disagreement.
    pub baseline_fraction: f64,
    /// Fixed base seed for reproducible scores.
    pub seed: Option<u64>,
}

impl Default for ConfidenceConfig {
    fn default() -> Self {
        Self {
            samples: 20,
            jitter_scale: 0.003,
            baseline_fraction: 0.02,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceEstimate {
    pub score: f64,
    pub dispersion: f64,
    pub mean_endpoint: f64,
    pub trials: usize,
}

/// Monte Carlo jitter around the initial buffer; dispersion of endpoints -> score.
pub struct ConfidenceEstimator {
    cfg: ConfidenceConfig,
}

impl ConfidenceEstimator {
    pub fn new(cfg: ConfidenceConfig) -> Self {
        Self { cfg }
    }

    pub fn config(&self) -> &ConfidenceConfig {
        &self.cfg
    }

    pub fn estimate(
        &self,
        scaled: &ScaledWindow,
        transform: &Transform,
        oracle: &dyn Oracle,
        steps: usize,
        current_price: f64,
    ) -> Result<ConfidenceEstimate> {
        if steps == 0 {
            return Err(ForecastError::InvalidHorizon(
                "confidence requires at least one step".to_string(),
            ));
        }
        if !current_price.is_finite() {
            return Err(ForecastError::InvalidParameter(format!(
                "current price {} is not finite",
                current_price
            )));
        }
        let jitter = self.cfg.jitter_scale;
        if !jitter.is_finite() || jitter < 0.0 {
            return Err(ForecastError::InvalidParameter(format!(
                "jitter_scale must be a finite value >= 0, got {}",
                jitter
            )));
        }
        let noise = Normal::new(0.0, jitter)
            .map_err(|e| ForecastError::InvalidParameter(format!("jitter_scale: {}", e)))?;

        let initial = initial_buffer(scaled, oracle)?;
        let trials = self.cfg.samples.max(MIN_TRIALS);
        let base_seed = self.cfg.seed.unwrap_or_else(|| rand::rng().random());

        let endpoints = (0..trials)
            .into_par_iter()
            .map(|trial| {
                let mut rng = StdRng::seed_from_u64(base_seed.wrapping_add(trial as u64));
                let jittered = initial
                    .iter()
                    .map(|v| (v + noise.sample(&mut rng)).clamp(0.0, 1.0))
                    .collect::<Vec<_>>();
                rollout(&jittered, transform, oracle, steps, |_| {}).map(|last| last.price)
            })
            .collect::<Result<Vec<f64>>>()?;

        let dispersion = std_dev(&endpoints);
        let mean_endpoint = mean(&endpoints);
        let score = confidence_from_dispersion(dispersion, current_price, self.cfg.baseline_fraction);

        tracing::debug!(
            trials,
            jitter_scale = jitter,
            dispersion,
            mean_endpoint,
            score,
            "Confidence estimated"
        );

        Ok(ConfidenceEstimate {
            score,
            dispersion,
            mean_endpoint,
            trials,
        })
    }
}

/// `100 * (1 - min(1, sigma / baseline))`, clamped to [5, 99] and rounded to one decimal.
pub fn confidence_from_dispersion(std_dev: f64, current_price: f64, baseline_fraction: f64) -> f64 {
    let baseline = (baseline_fraction * current_price).max(BASELINE_FLOOR);
    let ratio = if std_dev.is_finite() {
        (std_dev / baseline).min(1.0)
    } else {
        1.0
    };
    let confidence = (100.0 * (1.0 - ratio)).clamp(CONFIDENCE_MIN, CONFIDENCE_MAX);
    (confidence * 10.0).round() / 10.0
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation.
pub fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let var = values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / values.len() as f64;
    var.max(0.0).sqrt()
}
