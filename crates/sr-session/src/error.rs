use sr_core::CoreError;
use sr_risk::RiskError;
use sr_spatial::SpatialError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("configuration error: {0}")]
    Core(#[from] CoreError),

    #[error("routing error: {0}")]
    Spatial(#[from] SpatialError),

    #[error("risk data error: {0}")]
    Risk(#[from] RiskError),

    /// A risk-aware query was made before any weather condition was chosen.
    #[error("no weather condition selected")]
    NoWeather,
}

pub type SessionResult<T> = Result<T, SessionError>;
