//! Immutable configuration objects
//!
//! Everything the pipelines need is passed in at construction; nothing is
//! read from ambient module state.

use crate::acquisition::Electrode;
use crate::spectrum::{BandTable, StftParams, WindowType};
use crate::{Error, Result};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Stream type declared by EEG headband outlets
pub const EEG_STREAM_TYPE: &str = "EEG";

/// Stream discovery and pull settings
#[derive(Debug, Clone, PartialEq)]
pub struct AcquisitionConfig {
    /// Declared stream type to resolve
    pub stream_type: String,

    /// How long discovery waits for a matching stream
    pub resolve_timeout: Duration,

    /// Upper bound on one blocking pull before the stop flag is re-checked
    pub pull_timeout: Duration,
}

impl Default for AcquisitionConfig {
    fn default() -> Self {
        Self {
            stream_type: EEG_STREAM_TYPE.to_string(),
            resolve_timeout: Duration::from_secs(5),
            pull_timeout: Duration::from_secs(1),
        }
    }
}

impl AcquisitionConfig {
    pub fn validate(&self) -> Result<()> {
        if self.stream_type.trim().is_empty() {
            return Err(Error::Config("stream type is empty".to_string()));
        }
        validate_timeout("resolve timeout", self.resolve_timeout)?;
        validate_timeout("pull timeout", self.pull_timeout)
    }
}

/// Windowed spectral analysis settings
#[derive(Debug, Clone, PartialEq)]
pub struct SpectralConfig {
    /// Sample rate in Hz
    pub sample_rate: f64,

    /// Samples per analysis window (buffer capacity)
    pub window_size: usize,

    /// STFT segment length
    pub segment_len: usize,

    /// STFT segment overlap
    pub overlap: usize,

    /// Segment taper
    pub window_type: WindowType,

    /// Zero-extend the window at both ends before segmenting
    pub boundary_zeros: bool,

    /// The two electrodes whose band powers are averaged
    pub channels: [Electrode; 2],

    /// Reported bands
    pub bands: BandTable,
}

impl Default for SpectralConfig {
    fn default() -> Self {
        Self {
            sample_rate: 256.0,
            window_size: 256,
            segment_len: 256,
            overlap: 128,
            window_type: WindowType::Hann,
            boundary_zeros: false,
            channels: [Electrode::Af7, Electrode::Af8],
            bands: BandTable::default(),
        }
    }
}

impl SpectralConfig {
    pub fn validate(&self) -> Result<()> {
        self.stft_params().validate()?;

        if self.window_size < self.segment_len {
            return Err(Error::Config(format!(
                "window size ({}) must be at least the segment length ({})",
                self.window_size, self.segment_len
            )));
        }
        if self.channels[0] == self.channels[1] {
            return Err(Error::Config(format!(
                "analysis channels must differ (both are {})",
                self.channels[0]
            )));
        }
        Ok(())
    }

    pub fn stft_params(&self) -> StftParams {
        StftParams {
            sample_rate: self.sample_rate,
            segment_len: self.segment_len,
            overlap: self.overlap,
            window_type: self.window_type,
            boundary_zeros: self.boundary_zeros,
        }
    }
}

/// Basic-auth credentials for the document index
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Band-power stream (variant A)
#[derive(Debug, Clone)]
pub struct BandStreamConfig {
    pub acquisition: AcquisitionConfig,
    pub spectral: SpectralConfig,

    /// Endpoint receiving one JSON POST per analysis tick
    pub endpoint: String,

    /// Per-request timeout
    pub request_timeout: Duration,
}

impl BandStreamConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            acquisition: AcquisitionConfig::default(),
            spectral: SpectralConfig::default(),
            endpoint: endpoint.into(),
            request_timeout: Duration::from_secs(10),
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.acquisition.validate()?;
        self.spectral.validate()?;
        validate_timeout("request timeout", self.request_timeout)?;
        validate_url(&self.endpoint)
    }
}

/// Raw capture (variant B)
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    pub acquisition: AcquisitionConfig,

    /// Document index URL (e.g. `http://host:9200/eeg-stream-data/_doc`)
    pub index_url: String,

    pub credentials: Credentials,

    /// Local table, truncated at startup
    pub table_path: PathBuf,

    /// Per-request timeout
    pub request_timeout: Duration,
}

impl CaptureConfig {
    pub fn new(index_url: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            acquisition: AcquisitionConfig::default(),
            index_url: index_url.into(),
            credentials,
            table_path: PathBuf::from("eeg_data_stream_all.csv"),
            request_timeout: Duration::from_secs(10),
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.acquisition.validate()?;
        validate_timeout("request timeout", self.request_timeout)?;
        validate_url(&self.index_url)?;
        if self.credentials.username.is_empty() {
            return Err(Error::Config("index username is empty".to_string()));
        }
        Ok(())
    }
}

fn validate_timeout(name: &str, timeout: Duration) -> Result<()> {
    if timeout.is_zero() {
        return Err(Error::Config(format!("{} must be positive", name)));
    }
    Ok(())
}

fn validate_url(url: &str) -> Result<()> {
    reqwest::Url::parse(url)
        .map(|_| ())
        .map_err(|e| Error::Config(format!("invalid URL '{}': {}", url, e)))
}
