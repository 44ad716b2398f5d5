use std::collections::VecDeque;

use crate::error::{ForecastError, Result};
use crate::forecast::normalizer::{ScaledWindow, Transform};
use crate::forecast::oracle::Oracle;

/// One oracle invocation: its scaled output and the real price it maps to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastStep {
    pub scaled: f64,
    pub price: f64,
}

/// Ordered per-step forecasts; the last one is the endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastResult {
    steps: Vec<ForecastStep>,
}

impl ForecastResult {
    pub fn steps(&self) -> &[ForecastStep] {
        &self.steps
    }

    pub fn prices(&self) -> Vec<f64> {
        self.steps.iter().map(|s| s.price).collect()
    }

    pub fn endpoint(&self) -> f64 {
        self.steps.last().map(|s| s.price).unwrap_or(f64::NAN)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Autoregressive driver: the oracle's own output is fed back as the next input.
pub struct ForecastEngine;

impl ForecastEngine {
    pub fn run(scaled: &ScaledWindow, oracle: &dyn Oracle, steps: usize) -> Result<ForecastResult> {
        check_steps(steps)?;
        let initial = initial_buffer(scaled, oracle)?;
        let mut out = Vec::with_capacity(steps);
        rollout(initial, &scaled.transform(), oracle, steps, |step| out.push(step))?;
        Ok(ForecastResult { steps: out })
    }

    /// Same rollout, keeping only the final price.
    pub fn run_endpoint(scaled: &ScaledWindow, oracle: &dyn Oracle, steps: usize) -> Result<f64> {
        check_steps(steps)?;
        let initial = initial_buffer(scaled, oracle)?;
        let last = rollout(initial, &scaled.transform(), oracle, steps, |_| {})?;
        Ok(last.price)
    }
}

/// A zero-step horizon is rejected before the window is looked at.
pub(crate) fn check_steps(steps: usize) -> Result<()> {
    if steps == 0 {
        return Err(ForecastError::InvalidHorizon(
            "forecast requires at least one step".to_string(),
        ));
    }
    Ok(())
}

pub(crate) fn initial_buffer<'a>(scaled: &'a ScaledWindow, oracle: &dyn Oracle) -> Result<&'a [f64]> {
    let lookback = oracle.lookback();
    scaled.tail(lookback).ok_or_else(|| {
        ForecastError::DataSource(format!(
            "window has {} observations, {} needs {}",
            scaled.len(),
            oracle.name(),
            lookback
        ))
    })
}

/// Run `steps` oracle invocations starting from `initial`.
///
/// The transform is the one fit at the start; predictions are re-scaled through it
/// without clipping, so the buffer may leave [0, 1].
pub(crate) fn rollout<F>(
    initial: &[f64],
    transform: &Transform,
    oracle: &dyn Oracle,
    steps: usize,
    mut record: F,
) -> Result<ForecastStep>
where
    F: FnMut(ForecastStep),
{
    check_steps(steps)?;
    let mut buffer: VecDeque<f64> = initial.iter().copied().collect();
    let mut last = None;
    for _ in 0..steps {
        let predicted = oracle.predict(buffer.make_contiguous())?;
        let price = transform.inverse(predicted);
        let next = transform.transform(price);
        buffer.pop_front();
        buffer.push_back(next);

        let step = ForecastStep {
            scaled: predicted,
            price,
        };
        record(step);
        last = Some(step);
    }
    last.ok_or_else(|| ForecastError::InvalidHorizon("empty rollout".to_string()))
}
