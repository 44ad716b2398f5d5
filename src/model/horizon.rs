use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ForecastError, Result};

/// Sampling cadence of the series; selects the oracle variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Daily,
    Hourly,
}

impl Granularity {
    pub const ALL: [Granularity; 2] = [Granularity::Daily, Granularity::Hourly];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Hourly => "hourly",
        }
    }

    /// Binance kline interval for this cadence.
    pub fn kline_interval(self) -> &'static str {
        match self {
            Self::Daily => "1d",
            Self::Hourly => "1h",
        }
    }
}

impl std::fmt::Display for Granularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Granularity {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" | "day" | "days" | "1d" => Ok(Self::Daily),
            "hourly" | "hour" | "hours" | "1h" => Ok(Self::Hourly),
            other => Err(ForecastError::InvalidHorizon(format!(
                "mode '{}' must be 'daily' or 'hourly'",
                other
            ))),
        }
    }
}

/// Requested forecast horizon: a positive number of steps at one granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Horizon {
    granularity: Granularity,
    steps: usize,
}

impl Horizon {
    pub fn new(granularity: Granularity, value: i64) -> Result<Self> {
        if value <= 0 {
            return Err(ForecastError::InvalidHorizon(format!(
                "{} horizon must be greater than 0, got {}",
                granularity, value
            )));
        }
        let steps = usize::try_from(value).map_err(|_| {
            ForecastError::InvalidHorizon(format!("horizon {} is too large", value))
        })?;
        Ok(Self { granularity, steps })
    }

    /// Days take precedence over hours; both absent or zero is rejected.
    pub fn from_days_hours(days: i64, hours: i64) -> Result<Self> {
        if days > 0 {
            Self::new(Granularity::Daily, days)
        } else if hours > 0 {
            Self::new(Granularity::Hourly, hours)
        } else {
            Err(ForecastError::InvalidHorizon(
                "either days or hours must be greater than 0".to_string(),
            ))
        }
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn days(&self) -> usize {
        match self.granularity {
            Granularity::Daily => self.steps,
            Granularity::Hourly => 0,
        }
    }

    pub fn hours(&self) -> usize {
        match self.granularity {
            Granularity::Daily => 0,
            Granularity::Hourly => self.steps,
        }
    }

    pub fn descriptor(&self) -> String {
        format!("{} days {} hours", self.days(), self.hours())
    }
}
