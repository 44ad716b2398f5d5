use coin_forecast::error::{ErrorKind, Result};
use coin_forecast::evaluation::{walk_forward, EvaluationReport};
use coin_forecast::forecast::Oracle;

/// Predicts the last observed value: a naive persistence forecast.
struct Persistence {
    lookback: usize,
}

impl Oracle for Persistence {
    fn predict(&self, buffer: &[f64]) -> Result<f64> {
        Ok(buffer[buffer.len() - 1])
    }

    fn lookback(&self) -> usize {
        self.lookback
    }
}

#[test]
fn persistence_on_a_linear_ramp_is_off_by_one_step() {
    let closes: Vec<f64> = (0..40).map(|i| 100.0 + i as f64).collect();
    let metrics = walk_forward(&closes, &Persistence { lookback: 5 }, 10, 20).unwrap();

    assert_eq!(metrics.sample_count(), 20);
    assert!((metrics.mae().unwrap() - 1.0).abs() < 1e-9);
    assert!((metrics.rmse().unwrap() - 1.0).abs() < 1e-9);
    assert!(metrics.mape().unwrap() > 0.0);

    let report = EvaluationReport::from(&metrics);
    assert_eq!(report.samples, 20);
    let json = serde_json::to_value(&report).unwrap();
    assert!(json.get("mape_pct").is_some());
}

#[test]
fn rejects_short_history_and_bad_parameters() {
    let closes: Vec<f64> = (0..15).map(|i| i as f64 + 1.0).collect();
    let oracle = Persistence { lookback: 5 };

    let err = walk_forward(&closes, &oracle, 10, 10).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DataSourceFailure);

    let err = walk_forward(&closes, &oracle, 10, 0).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidParameter);

    let err = walk_forward(&closes, &oracle, 3, 2).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidParameter);
}
