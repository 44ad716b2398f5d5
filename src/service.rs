use std::sync::Arc;
use std::time::{Duration, Instant};

use futures_util::future::join_all;
use tracing::Instrument;
use uuid::Uuid;

use crate::error::{ForecastError, Result};
use crate::forecast::{
    fit_transform, ConfidenceConfig, ConfidenceEstimate, ConfidenceEstimator, ForecastEngine,
    ForecastOutput, ForecastResult, Oracle, OracleRegistry, ResultAssembler,
};
use crate::instrument::InstrumentTable;
use crate::model::horizon::{Granularity, Horizon};
use crate::model::window::{PriceWindow, DEFAULT_LOOKBACK};
use crate::source::WindowSource;

#[derive(Debug, Clone)]
pub struct ForecastRequest {
    pub symbol: String,
    pub mode: Granularity,
    pub value: i64,
    pub include_confidence: bool,
    pub include_series: bool,
}

impl ForecastRequest {
    pub fn new(symbol: impl Into<String>, mode: Granularity, value: i64) -> Self {
        Self {
            symbol: symbol.into(),
            mode,
            value,
            include_confidence: true,
            include_series: false,
        }
    }

    pub fn with_confidence(mut self, on: bool) -> Self {
        self.include_confidence = on;
        self
    }

    pub fn with_series(mut self, on: bool) -> Self {
        self.include_series = on;
        self
    }
}

#[derive(Debug, Clone)]
pub struct ServiceSettings {
    /// Minimum window length requested from the source, regardless of oracle lookback.
    pub min_window: usize,
    pub request_timeout: Duration,
    pub confidence: ConfidenceConfig,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            min_window: DEFAULT_LOOKBACK,
            request_timeout: Duration::from_secs(30),
            confidence: ConfidenceConfig::default(),
        }
    }
}

/// Rollout output before it is joined with the market snapshot.
#[derive(Debug, Clone)]
pub struct Computation {
    pub result: ForecastResult,
    pub confidence: Option<ConfidenceEstimate>,
}

/// Fit, roll out, and optionally score one window. Blocking; runs off the async runtime.
pub fn compute(
    window: &PriceWindow,
    oracle: &dyn Oracle,
    steps: usize,
    confidence: Option<&ConfidenceEstimator>,
) -> Result<Computation> {
    let (scaled, transform) = fit_transform(window);
    let result = ForecastEngine::run(&scaled, oracle, steps)?;
    let confidence = match confidence {
        Some(estimator) => Some(estimator.estimate(
            &scaled,
            &transform,
            oracle,
            steps,
            window.current_price(),
        )?),
        None => None,
    };
    Ok(Computation { result, confidence })
}

pub struct ForecastService<S> {
    instruments: Arc<InstrumentTable>,
    registry: Arc<OracleRegistry>,
    source: S,
    settings: ServiceSettings,
}

impl<S: WindowSource> ForecastService<S> {
    pub fn new(
        instruments: Arc<InstrumentTable>,
        registry: Arc<OracleRegistry>,
        source: S,
        settings: ServiceSettings,
    ) -> Self {
        Self {
            instruments,
            registry,
            source,
            settings,
        }
    }

    pub fn instruments(&self) -> &InstrumentTable {
        &self.instruments
    }

    pub fn registry(&self) -> &OracleRegistry {
        &self.registry
    }

    pub async fn forecast(&self, req: &ForecastRequest) -> Result<ForecastOutput> {
        let request_id = Uuid::new_v4();
        let span = tracing::info_span!(
            "forecast",
            %request_id,
            symbol = %req.symbol,
            mode = %req.mode,
            value = req.value
        );
        async move {
            let started = Instant::now();
            let out = self.forecast_inner(req).await;
            match &out {
                Ok(o) => tracing::info!(
                    current_price = o.current_price,
                    predicted_price = o.predicted_price,
                    direction = %o.direction,
                    confidence = ?o.confidence,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Forecast complete"
                ),
                Err(e) => tracing::warn!(kind = %e.kind(), error = %e, "Forecast failed"),
            }
            out
        }
        .instrument(span)
        .await
    }

    /// Per-step forecast prices only; confidence is skipped.
    pub async fn predicted_series(&self, req: &ForecastRequest) -> Result<Vec<f64>> {
        let req = req.clone().with_confidence(false).with_series(true);
        let out = self.forecast(&req).await?;
        Ok(out.predicted_series.unwrap_or_default())
    }

    /// Run independent requests concurrently; results keep the input order.
    pub async fn forecast_many(&self, requests: &[ForecastRequest]) -> Vec<Result<ForecastOutput>> {
        join_all(requests.iter().map(|r| self.forecast(r))).await
    }

    async fn forecast_inner(&self, req: &ForecastRequest) -> Result<ForecastOutput> {
        let (symbol, pair) = self.instruments.resolve(&req.symbol)?;
        let pair = pair.to_string();
        let horizon = Horizon::new(req.mode, req.value)?;
        let oracle = self.registry.get(&symbol, horizon.granularity())?;
        let min_len = self.settings.min_window.max(oracle.lookback());
        let estimator = req
            .include_confidence
            .then(|| ConfidenceEstimator::new(self.settings.confidence.clone()));

        let timeout = self.settings.request_timeout;
        let work = async {
            let window = self
                .source
                .fetch(&pair, horizon.granularity(), min_len)
                .await?;
            tracing::debug!(observations = window.len(), "Window fetched");

            let steps = horizon.steps();
            let snapshot = window.latest();
            let computation = tokio::task::spawn_blocking(move || {
                compute(&window, oracle.as_ref(), steps, estimator.as_ref())
            })
            .await
            .map_err(|e| ForecastError::Oracle(format!("forecast worker failed: {}", e)))??;
            Ok::<_, ForecastError>((snapshot, computation))
        };

        let (snapshot, computation) = tokio::time::timeout(timeout, work)
            .await
            .map_err(|_| ForecastError::Timeout {
                timeout_ms: timeout.as_millis() as u64,
            })??;

        let mut out = ResultAssembler::assemble(
            &symbol,
            &pair,
            &horizon,
            snapshot,
            computation.result.endpoint(),
            computation.confidence.map(|c| c.score),
        );
        if req.include_series {
            out = out.with_series(computation.result.prices());
        }
        Ok(out)
    }
}
