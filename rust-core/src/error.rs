//! Crate-level error type

use crate::acquisition::AcquisitionError;
use crate::spectrum::SpectralError;
use crate::telemetry::TelemetryError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Spectral(#[from] SpectralError),

    #[error(transparent)]
    Acquisition(#[from] AcquisitionError),

    #[error(transparent)]
    Telemetry(#[from] TelemetryError),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
