use serde::Serialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ForecastError>;

#[derive(Error, Debug)]
pub enum ForecastError {
    #[error("symbol {0} not supported")]
    UnsupportedInstrument(String),

    #[error("invalid horizon: {0}")]
    InvalidHorizon(String),

    #[error("model not found: {key}")]
    OracleNotFound { key: String },

    #[error("data source error: {0}")]
    DataSource(String),

    #[error("oracle invocation failed: {0}")]
    Oracle(String),

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    UnsupportedInstrument,
    InvalidHorizon,
    OracleNotFound,
    DataSourceFailure,
    OracleFailure,
    InvalidParameter,
    Timeout,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::UnsupportedInstrument => "UnsupportedInstrument",
            Self::InvalidHorizon => "InvalidHorizon",
            Self::OracleNotFound => "OracleNotFound",
            Self::DataSourceFailure => "DataSourceFailure",
            Self::OracleFailure => "OracleFailure",
            Self::InvalidParameter => "InvalidParameter",
            Self::Timeout => "Timeout",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ForecastError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnsupportedInstrument(_) => ErrorKind::UnsupportedInstrument,
            Self::InvalidHorizon(_) => ErrorKind::InvalidHorizon,
            Self::OracleNotFound { .. } => ErrorKind::OracleNotFound,
            Self::DataSource(_) => ErrorKind::DataSourceFailure,
            Self::Oracle(_) => ErrorKind::OracleFailure,
            Self::InvalidParameter(_) => ErrorKind::InvalidParameter,
            Self::Timeout { .. } => ErrorKind::Timeout,
        }
    }
}

/// Structured failure returned to callers in place of a forecast.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub kind: ErrorKind,
    pub message: String,
}

impl From<&ForecastError> for ErrorResponse {
    fn from(err: &ForecastError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}
