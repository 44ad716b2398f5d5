use serde::Serialize;

use crate::error::{ForecastError, Result};
use crate::forecast::{fit_transform, ForecastEngine, ForecastMetrics, Oracle};
use crate::model::window::PriceWindow;

#[derive(Debug, Clone, Serialize)]
pub struct EvaluationReport {
    pub samples: u64,
    pub mae: Option<f64>,
    pub rmse: Option<f64>,
    pub mape_pct: Option<f64>,
    pub hit_rate: Option<f64>,
}

impl From<&ForecastMetrics> for EvaluationReport {
    fn from(m: &ForecastMetrics) -> Self {
        Self {
            samples: m.sample_count(),
            mae: m.mae(),
            rmse: m.rmse(),
            mape_pct: m.mape(),
            hit_rate: m.hit_rate(),
        }
    }
}

/// Walk-forward backtest of one-step forecasts over the last `test_steps` closes.
///
/// Each forecast sees only the `window_len` closes before its target, refits the
/// normalizer on them, and is scored against the realized close.
pub fn walk_forward(
    closes: &[f64],
    oracle: &dyn Oracle,
    window_len: usize,
    test_steps: usize,
) -> Result<ForecastMetrics> {
    if test_steps == 0 {
        return Err(ForecastError::InvalidParameter(
            "test_steps must be > 0".to_string(),
        ));
    }
    if window_len < oracle.lookback() {
        return Err(ForecastError::InvalidParameter(format!(
            "window_len {} is shorter than oracle lookback {}",
            window_len,
            oracle.lookback()
        )));
    }
    let needed = window_len + test_steps;
    if closes.len() < needed {
        return Err(ForecastError::DataSource(format!(
            "evaluation needs {} closes, got {}",
            needed,
            closes.len()
        )));
    }

    let mut metrics = ForecastMetrics::with_window(test_steps);
    for target in closes.len() - test_steps..closes.len() {
        let history = closes[target - window_len..target].to_vec();
        let window = PriceWindow::from_closes(history, oracle.lookback())?;
        let (scaled, _) = fit_transform(&window);
        let predicted = ForecastEngine::run_endpoint(&scaled, oracle, 1)?;
        metrics.observe(window.current_price(), closes[target], predicted);
    }

    tracing::info!(
        samples = metrics.sample_count(),
        mae = ?metrics.mae(),
        mape = ?metrics.mape(),
        "Walk-forward evaluation finished"
    );
    Ok(metrics)
}
