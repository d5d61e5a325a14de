use std::path::PathBuf;

use thiserror::Error;

use sr_core::WeatherCondition;
use sr_spatial::SpatialError;

/// Errors produced by the risk pipeline and risk-table storage.
#[derive(Debug, Error)]
pub enum RiskError {
    /// Accident or risk-table input is missing a required column or holds
    /// a value that cannot be interpreted.
    #[error("data format error: {0}")]
    DataFormat(String),

    #[error("no risk table for {condition:?} at {}", path.display())]
    MissingTable { condition: WeatherCondition, path: PathBuf },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Spatial(#[from] SpatialError),
}

pub type RiskResult<T> = Result<T, RiskError>;
