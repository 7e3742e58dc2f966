//! Window functions for short-time spectral analysis
//!
//! Segments are tapered before the FFT to reduce spectral leakage. STFT
//! segments use the periodic (DFT-even) form of the window.

use std::f64::consts::PI;

/// Window function types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindowType {
    /// Hann window: w[n] = 0.5 - 0.5*cos(2πn/(M-1))
    #[default]
    Hann,

    /// Hamming window: w[n] = 0.54 - 0.46*cos(2πn/(M-1))
    Hamming,

    /// Blackman window: w[n] = 0.42 - 0.5*cos(2πn/(M-1)) + 0.08*cos(4πn/(M-1))
    Blackman,

    /// Rectangular window (no tapering)
    Rectangular,
}

impl WindowType {
    /// Parse a window name as accepted on the command line
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "hann" | "hanning" => Some(WindowType::Hann),
            "hamming" => Some(WindowType::Hamming),
            "blackman" => Some(WindowType::Blackman),
            "rectangular" | "boxcar" => Some(WindowType::Rectangular),
            _ => None,
        }
    }
}

/// Generate symmetric window coefficients
///
/// # Arguments
/// * `window_type` - Type of window function
/// * `length` - Number of samples (M)
///
/// # Returns
/// Vector of window coefficients w[n] for n = 0..M-1
pub fn generate_window(window_type: WindowType, length: usize) -> Vec<f64> {
    if length == 1 {
        return vec![1.0];
    }

    let m = length as f64;
    let mut window = Vec::with_capacity(length);

    match window_type {
        WindowType::Hann => {
            for n in 0..length {
                let angle = 2.0 * PI * n as f64 / (m - 1.0);
                window.push(0.5 - 0.5 * angle.cos());
            }
        }

        WindowType::Hamming => {
            for n in 0..length {
                let angle = 2.0 * PI * n as f64 / (m - 1.0);
                window.push(0.54 - 0.46 * angle.cos());
            }
        }

        WindowType::Blackman => {
            for n in 0..length {
                let angle1 = 2.0 * PI * n as f64 / (m - 1.0);
                let angle2 = 4.0 * PI * n as f64 / (m - 1.0);
                window.push(0.42 - 0.5 * angle1.cos() + 0.08 * angle2.cos());
            }
        }

        WindowType::Rectangular => {
            window.resize(length, 1.0);
        }
    }

    window
}

/// Generate periodic window coefficients
///
/// A periodic window of length M is the symmetric window of length M+1 with
/// the last sample dropped, so that it tiles exactly over consecutive DFT
/// frames.
pub fn generate_periodic_window(window_type: WindowType, length: usize) -> Vec<f64> {
    let mut window = generate_window(window_type, length + 1);
    window.truncate(length);
    window
}

/// Multiply a segment by window coefficients in-place
pub fn apply_window_inplace(segment: &mut [f64], window: &[f64]) {
    for (s, w) in segment.iter_mut().zip(window.iter()) {
        *s *= w;
    }
}

/// Amplitude ("spectrum") scaling factor for a window
///
/// Multiplying an FFT of a windowed segment by this factor makes a sinusoid
/// of amplitude A that falls on a bin centre read as A/2.
pub fn spectrum_scale(window: &[f64]) -> f64 {
    let sum: f64 = window.iter().sum();
    if sum == 0.0 {
        1.0
    } else {
        1.0 / sum
    }
}
