//! Windowed band-power analyzer
//!
//! Runs the short-time transform over one channel window, keeps the most
//! recent time slice and reduces it to band means.

use super::bands::{BandReading, BandTable};
use super::stft::ShortTimeTransform;
use super::SpectralError;
use crate::config::SpectralConfig;

/// Spectral analyzer for one parameter set
pub struct SpectralAnalyzer {
    stft: ShortTimeTransform,
    bands: BandTable,
    frequencies: Vec<f64>,
}

impl SpectralAnalyzer {
    /// Create analyzer from configuration
    pub fn new(config: &SpectralConfig) -> Result<Self, SpectralError> {
        let stft = ShortTimeTransform::new(config.stft_params())?;
        let frequencies = stft.frequencies();

        Ok(Self {
            stft,
            bands: config.bands.clone(),
            frequencies,
        })
    }

    /// Band means of one channel window
    pub fn analyze(&mut self, window: &[f64]) -> Result<BandReading, SpectralError> {
        let spectrogram = self.stft.transform(window)?;
        let magnitudes = spectrogram.latest_magnitudes();
        Ok(self.bands.band_means(&self.frequencies, &magnitudes))
    }

    /// Band means of two channel windows, averaged band by band
    pub fn analyze_pair(
        &mut self,
        first: &[f64],
        second: &[f64],
    ) -> Result<BandReading, SpectralError> {
        let a = self.analyze(first)?;
        let b = self.analyze(second)?;
        Ok(a.average(&b))
    }
}
