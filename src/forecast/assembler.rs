use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::horizon::{Granularity, Horizon};
use crate::model::window::MarketSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Direction {
    #[serde(rename = "UP")]
    Up,
    #[serde(rename = "DOWN")]
    Down,
}

impl Direction {
    /// Strictly above the current price is UP; a tie is DOWN.
    pub fn classify(endpoint: f64, current_price: f64) -> Self {
        if endpoint > current_price {
            Self::Up
        } else {
            Self::Down
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Up => "UP",
            Self::Down => "DOWN",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Response record for one forecast request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastOutput {
    pub symbol: String,
    pub pair: String,
    pub mode: Granularity,
    pub value: usize,
    pub timeframe: String,
    pub current_price: f64,
    pub predicted_price: f64,
    pub high: f64,
    pub low: f64,
    pub direction: Direction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub predicted_series: Option<Vec<f64>>,
    pub generated_at: DateTime<Utc>,
}

pub struct ResultAssembler;

impl ResultAssembler {
    pub fn assemble(
        instrument: &str,
        pair: &str,
        horizon: &Horizon,
        snapshot: MarketSnapshot,
        endpoint_forecast: f64,
        confidence: Option<f64>,
    ) -> ForecastOutput {
        ForecastOutput {
            symbol: instrument.to_string(),
            pair: pair.to_string(),
            mode: horizon.granularity(),
            value: horizon.steps(),
            timeframe: horizon.descriptor(),
            current_price: snapshot.close,
            predicted_price: endpoint_forecast,
            high: snapshot.high,
            low: snapshot.low,
            direction: Direction::classify(endpoint_forecast, snapshot.close),
            confidence,
            predicted_series: None,
            generated_at: Utc::now(),
        }
    }
}

impl ForecastOutput {
    pub fn with_series(mut self, series: Vec<f64>) -> Self {
        self.predicted_series = Some(series);
        self
    }
}
