//! Short-time Fourier transform
//!
//! One-sided STFT with amplitude ("spectrum") scaling and no detrending.
//! Segments start every `segment_len - overlap` samples; a signal exactly one
//! segment long produces a single time slice.

use super::fft::FftEngine;
use super::windowing::{apply_window_inplace, generate_periodic_window, spectrum_scale, WindowType};
use super::SpectralError;
use ndarray::{Array2, ArrayView1, Axis};
use num_complex::Complex64;

/// STFT parameters
#[derive(Debug, Clone, PartialEq)]
pub struct StftParams {
    /// Sample rate in Hz
    pub sample_rate: f64,

    /// Samples per segment
    pub segment_len: usize,

    /// Samples shared by consecutive segments (must be < segment_len)
    pub overlap: usize,

    /// Taper applied to each segment
    pub window_type: WindowType,

    /// Extend the signal with segment_len/2 zeros on both sides and pad the
    /// tail to a whole number of hops before segmenting
    pub boundary_zeros: bool,
}

impl Default for StftParams {
    fn default() -> Self {
        Self {
            sample_rate: 256.0,
            segment_len: 256,
            overlap: 128,
            window_type: WindowType::Hann,
            boundary_zeros: false,
        }
    }
}

impl StftParams {
    /// Check parameter consistency
    pub fn validate(&self) -> Result<(), SpectralError> {
        if self.segment_len == 0 {
            return Err(SpectralError::InvalidParameters(
                "segment length must be positive".to_string(),
            ));
        }
        if self.overlap >= self.segment_len {
            return Err(SpectralError::InvalidParameters(format!(
                "overlap ({}) must be less than segment length ({})",
                self.overlap, self.segment_len
            )));
        }
        if !(self.sample_rate.is_finite() && self.sample_rate > 0.0) {
            return Err(SpectralError::InvalidParameters(format!(
                "sample rate must be positive (got {})",
                self.sample_rate
            )));
        }
        Ok(())
    }

    /// Distance between consecutive segment starts
    pub fn hop(&self) -> usize {
        self.segment_len - self.overlap
    }
}

/// Time-frequency grid produced by one STFT call
#[derive(Debug, Clone)]
pub struct Spectrogram {
    /// Bin centre frequencies in Hz, ascending from 0 to fs/2
    pub frequencies: Vec<f64>,

    /// Segment centre times in seconds
    pub times: Vec<f64>,

    /// Complex amplitudes indexed (frequency bin, time slice)
    pub values: Array2<Complex64>,
}

impl Spectrogram {
    /// Number of time slices
    pub fn num_slices(&self) -> usize {
        self.values.ncols()
    }

    /// Magnitude grid |Z| indexed (frequency bin, time slice)
    pub fn magnitudes(&self) -> Array2<f64> {
        self.values.mapv(|c| c.norm())
    }

    /// Magnitude column of the most recent time slice
    pub fn latest_magnitudes(&self) -> Vec<f64> {
        match self.num_slices() {
            0 => Vec::new(),
            n => column_norms(self.values.index_axis(Axis(1), n - 1)),
        }
    }
}

fn column_norms(column: ArrayView1<'_, Complex64>) -> Vec<f64> {
    column.iter().map(|c| c.norm()).collect()
}

/// Reusable short-time transform
///
/// Holds the FFT plan, window and scratch buffer for one parameter set; no
/// signal state survives between calls.
pub struct ShortTimeTransform {
    params: StftParams,
    fft_engine: FftEngine,
    window: Vec<f64>,
    scale: f64,
    segment: Vec<f64>,
}

impl ShortTimeTransform {
    /// Create a transform for the given parameters
    pub fn new(params: StftParams) -> Result<Self, SpectralError> {
        params.validate()?;

        let window = generate_periodic_window(params.window_type, params.segment_len);
        let scale = spectrum_scale(&window);

        Ok(Self {
            fft_engine: FftEngine::new(params.segment_len),
            segment: vec![0.0; params.segment_len],
            window,
            scale,
            params,
        })
    }

    /// Get parameters
    pub fn params(&self) -> &StftParams {
        &self.params
    }

    /// Bin centre frequencies in Hz
    pub fn frequencies(&self) -> Vec<f64> {
        self.fft_engine.frequency_axis_hz(self.params.sample_rate)
    }

    /// Number of time slices produced for a signal of `len` samples
    pub fn num_slices(&self, len: usize) -> usize {
        let len = self.extended_len(len);
        if len < self.params.segment_len {
            0
        } else {
            1 + (len - self.params.segment_len) / self.params.hop()
        }
    }

    fn extended_len(&self, len: usize) -> usize {
        if !self.params.boundary_zeros {
            return len;
        }
        let extended = len + 2 * (self.params.segment_len / 2);
        let hop = self.params.hop();
        let excess = extended.saturating_sub(self.params.segment_len) % hop;
        if excess == 0 {
            extended
        } else {
            extended + hop - excess
        }
    }

    fn extend(&self, signal: &[f64]) -> Vec<f64> {
        let half = self.params.segment_len / 2;
        let mut extended = vec![0.0; self.extended_len(signal.len())];
        extended[half..half + signal.len()].copy_from_slice(signal);
        extended
    }

    /// Transform a signal into a spectrogram
    ///
    /// # Arguments
    /// * `signal` - Real-valued samples, at least one segment long
    pub fn transform(&mut self, signal: &[f64]) -> Result<Spectrogram, SpectralError> {
        if signal.len() < self.params.segment_len {
            return Err(SpectralError::SignalTooShort {
                len: signal.len(),
                segment_len: self.params.segment_len,
            });
        }

        let extended;
        let input = if self.params.boundary_zeros {
            extended = self.extend(signal);
            extended.as_slice()
        } else {
            signal
        };

        let seg_len = self.params.segment_len;
        let hop = self.params.hop();
        let num_slices = self.num_slices(signal.len());
        let num_bins = self.fft_engine.num_bins();
        let mut values = Array2::<Complex64>::zeros((num_bins, num_slices));

        for slice in 0..num_slices {
            let start = slice * hop;
            self.segment.copy_from_slice(&input[start..start + seg_len]);
            apply_window_inplace(&mut self.segment, &self.window);

            let spectrum = self.fft_engine.compute_spectrum(&self.segment)?;
            for (bin, &z) in spectrum.iter().enumerate() {
                values[[bin, slice]] = z * self.scale;
            }
        }

        let offset = if self.params.boundary_zeros { seg_len / 2 } else { 0 };
        let times = (0..num_slices)
            .map(|slice| {
                let centre = (slice * hop + seg_len / 2) as f64 - offset as f64;
                centre / self.params.sample_rate
            })
            .collect();

        Ok(Spectrogram {
            frequencies: self.frequencies(),
            times,
            values,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn sine(freq_hz: f64, sample_rate: f64, len: usize) -> Vec<f64> {
        (0..len)
            .map(|n| (2.0 * PI * freq_hz * n as f64 / sample_rate).sin())
            .collect()
    }

    #[test]
    fn test_single_segment_shape() {
        let mut stft = ShortTimeTransform::new(StftParams::default()).unwrap();
        let spec = stft.transform(&vec![0.5; 256]).unwrap();

        assert_eq!(spec.frequencies.len(), 129);
        assert_eq!(spec.num_slices(), 1);
        assert_eq!(spec.values.dim(), (129, 1));
        assert_eq!(spec.times, vec![0.5]);
    }

    #[test]
    fn test_shape_for_other_sizes() {
        for n in [64usize, 128, 512] {
            let params = StftParams {
                sample_rate: 256.0,
                segment_len: n,
                overlap: n / 2,
                ..StftParams::default()
            };
            let mut stft = ShortTimeTransform::new(params).unwrap();
            let spec = stft.transform(&vec![1.0; n]).unwrap();

            assert_eq!(spec.frequencies.len(), n / 2 + 1);
            assert_eq!(spec.num_slices(), 1);
        }
    }

    #[test]
    fn test_frequencies_evenly_spaced_to_nyquist() {
        let stft = ShortTimeTransform::new(StftParams::default()).unwrap();
        let freqs = stft.frequencies();

        assert_eq!(freqs[0], 0.0);
        assert_eq!(*freqs.last().unwrap(), 128.0);
        for pair in freqs.windows(2) {
            assert!((pair[1] - pair[0] - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_longer_signal_slices() {
        let mut stft = ShortTimeTransform::new(StftParams::default()).unwrap();
        let spec = stft.transform(&vec![0.0; 512]).unwrap();

        // Segments start at 0, 128, 256
        assert_eq!(spec.num_slices(), 3);
        assert_eq!(spec.times, vec![0.5, 1.0, 1.5]);
    }

    #[test]
    fn test_boundary_zeros_slices() {
        let params = StftParams {
            boundary_zeros: true,
            ..StftParams::default()
        };
        let mut stft = ShortTimeTransform::new(params).unwrap();
        let spec = stft.transform(&vec![1.0; 256]).unwrap();

        assert_eq!(spec.num_slices(), 3);
        assert_eq!(spec.times, vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn test_sine_amplitude_scaling() {
        let mut stft = ShortTimeTransform::new(StftParams::default()).unwrap();
        let spec = stft.transform(&sine(10.0, 256.0, 256)).unwrap();
        let mags = spec.latest_magnitudes();

        // Unit sine on a bin centre reads 0.5 with spectrum scaling
        assert!((mags[10] - 0.5).abs() < 1e-9);
        // Hann leakage reaches only the adjacent bins
        assert!((mags[9] - 0.25).abs() < 1e-9);
        assert!((mags[11] - 0.25).abs() < 1e-9);
        assert!(mags[20] < 1e-9);
    }

    #[test]
    fn test_latest_column_matches_grid() {
        let mut stft = ShortTimeTransform::new(StftParams::default()).unwrap();
        let signal: Vec<f64> = (0..640).map(|n| ((n * 7) % 13) as f64).collect();
        let spec = stft.transform(&signal).unwrap();
        let grid = spec.magnitudes();
        let latest = spec.latest_magnitudes();

        let last = spec.num_slices() - 1;
        for (bin, &mag) in latest.iter().enumerate() {
            assert_eq!(mag, grid[[bin, last]]);
        }
    }

    #[test]
    fn test_deterministic_across_calls() {
        let mut stft = ShortTimeTransform::new(StftParams::default()).unwrap();
        let signal = sine(6.0, 256.0, 256);

        let first = stft.transform(&signal).unwrap();
        let _ = stft.transform(&vec![3.0; 256]).unwrap();
        let second = stft.transform(&signal).unwrap();

        assert_eq!(first.values, second.values);
    }

    #[test]
    fn test_invalid_parameters() {
        let overlap_too_big = StftParams {
            overlap: 256,
            ..StftParams::default()
        };
        assert!(matches!(
            ShortTimeTransform::new(overlap_too_big),
            Err(SpectralError::InvalidParameters(_))
        ));

        let empty = StftParams {
            segment_len: 0,
            overlap: 0,
            ..StftParams::default()
        };
        assert!(ShortTimeTransform::new(empty).is_err());
    }

    #[test]
    fn test_signal_too_short() {
        let mut stft = ShortTimeTransform::new(StftParams::default()).unwrap();
        let err = stft.transform(&vec![0.0; 100]).unwrap_err();

        assert!(matches!(
            err,
            SpectralError::SignalTooShort { len: 100, segment_len: 256 }
        ));
    }
}
