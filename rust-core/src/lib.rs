//! EEG Bandstream - headband EEG to band-power telemetry
//!
//! Pulls samples from a Lab Streaming Layer EEG outlet, computes short-time
//! spectra over sliding channel windows, and forwards Theta/Alpha/Beta band
//! powers (or the raw samples) to HTTP endpoints and a local table.

pub mod acquisition;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod spectrum;
pub mod telemetry;
pub mod timestamp;

pub use acquisition::{Acquisition, Electrode, RunStats, Sample};
pub use config::{BandStreamConfig, CaptureConfig, Credentials, SpectralConfig};
pub use error::{Error, Result};
pub use pipeline::{BandPipeline, RawCapturePipeline};
pub use spectrum::{BandTable, SpectralAnalyzer, WindowType};
