//! FFT engine using realfft for real-valued signals
//!
//! Plans are built once per segment length and reused for every segment.

use super::SpectralError;
use num_complex::Complex64;
use realfft::{RealFftPlanner, RealToComplex};
use std::sync::Arc;

/// FFT engine for real-valued segments
pub struct FftEngine {
    /// FFT size (number of samples)
    fft_size: usize,

    /// Real FFT processor
    r2c: Arc<dyn RealToComplex<f64>>,

    /// Reusable input buffer (realfft uses it as scratch)
    input_buffer: Vec<f64>,

    /// Reusable output buffer (one-sided complex spectrum)
    output_buffer: Vec<Complex64>,
}

impl FftEngine {
    /// Create new FFT engine
    ///
    /// # Arguments
    /// * `fft_size` - FFT size (number of samples)
    pub fn new(fft_size: usize) -> Self {
        let mut planner = RealFftPlanner::<f64>::new();
        let r2c = planner.plan_fft_forward(fft_size);

        let input_buffer = r2c.make_input_vec();
        let output_buffer = r2c.make_output_vec();

        Self {
            fft_size,
            r2c,
            input_buffer,
            output_buffer,
        }
    }

    /// Compute the one-sided complex spectrum of a segment
    ///
    /// # Arguments
    /// * `segment` - Input samples (zero-padded if shorter than fft_size)
    ///
    /// # Returns
    /// X[k] for k = 0..=fft_size/2
    pub fn compute_spectrum(&mut self, segment: &[f64]) -> Result<&[Complex64], SpectralError> {
        let copy_len = segment.len().min(self.fft_size);
        self.input_buffer[..copy_len].copy_from_slice(&segment[..copy_len]);
        if copy_len < self.fft_size {
            self.input_buffer[copy_len..].fill(0.0);
        }

        self.r2c
            .process(&mut self.input_buffer, &mut self.output_buffer)
            .map_err(|e| SpectralError::Fft(e.to_string()))?;

        Ok(&self.output_buffer)
    }

    /// Get number of frequency bins (fft_size/2 + 1 for real FFT)
    pub fn num_bins(&self) -> usize {
        self.fft_size / 2 + 1
    }

    /// Frequency axis in Hz for a given sample rate
    pub fn frequency_axis_hz(&self, sample_rate: f64) -> Vec<f64> {
        (0..self.num_bins())
            .map(|bin| bin as f64 * sample_rate / self.fft_size as f64)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn magnitudes(fft: &mut FftEngine, signal: &[f64]) -> Vec<f64> {
        fft.compute_spectrum(signal)
            .unwrap()
            .iter()
            .map(|c| c.norm())
            .collect()
    }

    #[test]
    fn test_fft_dc_signal() {
        let mut fft = FftEngine::new(256);
        let spectrum = magnitudes(&mut fft, &[1.0; 256]);

        assert!((spectrum[0] - 256.0).abs() < 1e-9);
        assert!(spectrum[1..].iter().all(|&m| m < 1e-9));
    }

    #[test]
    fn test_fft_short_segment_is_zero_padded() {
        let mut fft = FftEngine::new(1024);
        let spectrum = magnitudes(&mut fft, &[1.0; 100]);

        // Rectangular pulse of 100 samples: |X[k]| = |sin(pi k 100 / N) / sin(pi k / N)|
        let dirichlet =
            |k: f64| ((PI * k * 100.0 / 1024.0).sin() / (PI * k / 1024.0).sin()).abs();

        assert!((spectrum[0] - 100.0).abs() < 1e-9);
        for k in [1usize, 10, 57, 300] {
            assert!((spectrum[k] - dirichlet(k as f64)).abs() < 1e-9, "bin {}", k);
        }
    }

    #[test]
    fn test_fft_sine_on_bin() {
        let mut fft = FftEngine::new(256);

        // 10 cycles over 256 samples lands exactly on bin 10
        let signal: Vec<f64> = (0..256)
            .map(|n| (2.0 * PI * 10.0 * n as f64 / 256.0).sin())
            .collect();

        let spectrum = magnitudes(&mut fft, &signal);

        let (peak_bin, &peak_mag) = spectrum
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap())
            .unwrap();

        assert_eq!(peak_bin, 10);
        assert!((peak_mag - 128.0).abs() < 1e-6);
    }

    #[test]
    fn test_frequency_axis() {
        let fft = FftEngine::new(256);
        let freqs = fft.frequency_axis_hz(256.0);

        assert_eq!(freqs.len(), 129);
        assert_eq!(freqs[0], 0.0);
        assert!((freqs[1] - 1.0).abs() < 1e-12);
        assert!((freqs[128] - 128.0).abs() < 1e-12);
    }
}
