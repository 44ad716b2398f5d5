use std::collections::VecDeque;

pub const FORECAST_METRIC_WINDOW: usize = 1200;

#[derive(Debug, Clone, Copy)]
struct Observation {
    reference: f64,
    actual: f64,
    predicted: f64,
}

/// Bounded online error statistics for forecasts against realized prices.
#[derive(Debug, Clone)]
pub struct ForecastMetrics {
    window: usize,
    obs: VecDeque<Observation>,
}

impl Default for ForecastMetrics {
    fn default() -> Self {
        Self {
            window: FORECAST_METRIC_WINDOW,
            obs: VecDeque::with_capacity(FORECAST_METRIC_WINDOW),
        }
    }
}

impl ForecastMetrics {
    pub fn with_window(window: usize) -> Self {
        Self {
            window: window.max(2),
            obs: VecDeque::with_capacity(window.max(2)),
        }
    }

    /// Record one forecast. `reference` is the last known price when it was made.
    pub fn observe(&mut self, reference: f64, actual: f64, predicted: f64) {
        if !reference.is_finite() || !actual.is_finite() || !predicted.is_finite() {
            return;
        }
        self.obs.push_back(Observation {
            reference,
            actual,
            predicted,
        });
        if self.obs.len() > self.window {
            let _ = self.obs.pop_front();
        }
    }

    pub fn sample_count(&self) -> u64 {
        self.obs.len() as u64
    }

    pub fn mae(&self) -> Option<f64> {
        let n = self.obs.len();
        if n == 0 {
            return None;
        }
        let sum_abs = self
            .obs
            .iter()
            .map(|o| (o.actual - o.predicted).abs())
            .sum::<f64>();
        Some(sum_abs / n as f64)
    }

    pub fn rmse(&self) -> Option<f64> {
        let n = self.obs.len();
        if n == 0 {
            return None;
        }
        let sse = self
            .obs
            .iter()
            .map(|o| {
                let err = o.actual - o.predicted;
                err * err
            })
            .sum::<f64>();
        Some((sse / n as f64).sqrt())
    }

    /// Mean absolute percentage error, in percent. Zero actuals are skipped.
    pub fn mape(&self) -> Option<f64> {
        let pct = self
            .obs
            .iter()
            .filter(|o| o.actual.abs() > f64::EPSILON)
            .map(|o| ((o.actual - o.predicted) / o.actual).abs())
            .collect::<Vec<_>>();
        if pct.is_empty() {
            return None;
        }
        Some(pct.iter().sum::<f64>() / pct.len() as f64 * 100.0)
    }

    /// Share of forecasts whose move from the reference price had the right sign.
    pub fn hit_rate(&self) -> Option<f64> {
        let n = self.obs.len();
        if n == 0 {
            return None;
        }
        let hit = self
            .obs
            .iter()
            .filter(|o| (o.actual - o.reference) * (o.predicted - o.reference) > 0.0)
            .count() as f64;
        Some(hit / n as f64)
    }
}
