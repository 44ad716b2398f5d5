pub mod assembler;
pub mod confidence;
pub mod engine;
pub mod metrics;
pub mod normalizer;
pub mod oracle;
pub mod registry;

pub use assembler::{Direction, ForecastOutput, ResultAssembler};
pub use confidence::{
    confidence_from_dispersion, ConfidenceConfig, ConfidenceEstimate, ConfidenceEstimator,
    CONFIDENCE_MAX, CONFIDENCE_MIN, MIN_TRIALS,
};
pub use engine::{ForecastEngine, ForecastResult, ForecastStep};
pub use metrics::ForecastMetrics;
pub use normalizer::{fit_transform, inverse, transform, ScaledWindow, Transform};
pub use oracle::{LinearOracle, Oracle};
pub use registry::OracleRegistry;
