//! Short-time spectral analysis and band-power aggregation

pub mod analysis;
pub mod bands;
pub mod fft;
pub mod stft;
pub mod windowing;

pub use analysis::SpectralAnalyzer;
pub use bands::{Band, BandReading, BandTable, DEFAULT_BANDS};
pub use fft::FftEngine;
pub use stft::{ShortTimeTransform, Spectrogram, StftParams};
pub use windowing::WindowType;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SpectralError {
    #[error("Invalid transform parameters: {0}")]
    InvalidParameters(String),

    #[error("Invalid band table: {0}")]
    InvalidBands(String),

    #[error("Signal of {len} samples is shorter than one segment ({segment_len} samples)")]
    SignalTooShort { len: usize, segment_len: usize },

    #[error("FFT processing failed: {0}")]
    Fft(String),
}
