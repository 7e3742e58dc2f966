//! Frequency band aggregation
//!
//! A band reading is the mean magnitude of every bin whose centre frequency
//! falls in the band's half-open interval `[low, high)`. A band that contains
//! no bin reads `NaN`.

use super::SpectralError;

/// Named half-open frequency interval in Hz
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub name: &'static str,
    pub low: f64,
    pub high: f64,
}

impl Band {
    pub const fn new(name: &'static str, low: f64, high: f64) -> Self {
        Self { name, low, high }
    }

    /// Whether a frequency lies in `[low, high)`
    pub fn contains(&self, freq: f64) -> bool {
        freq >= self.low && freq < self.high
    }
}

pub const THETA: Band = Band::new("Theta", 4.0, 8.0);
pub const ALPHA: Band = Band::new("Alpha", 8.0, 13.0);
pub const BETA: Band = Band::new("Beta", 13.0, 30.0);

/// Bands reported by the band-power stream
pub const DEFAULT_BANDS: [Band; 3] = [THETA, ALPHA, BETA];

/// Validated, ordered set of disjoint bands
#[derive(Debug, Clone, PartialEq)]
pub struct BandTable {
    bands: Vec<Band>,
}

impl Default for BandTable {
    fn default() -> Self {
        Self {
            bands: DEFAULT_BANDS.to_vec(),
        }
    }
}

impl BandTable {
    /// Build a table, rejecting empty, inverted, unordered or overlapping bands
    pub fn new(bands: Vec<Band>) -> Result<Self, SpectralError> {
        if bands.is_empty() {
            return Err(SpectralError::InvalidBands("band table is empty".to_string()));
        }

        for band in &bands {
            if !(band.low < band.high) {
                return Err(SpectralError::InvalidBands(format!(
                    "{} has low {} >= high {}",
                    band.name, band.low, band.high
                )));
            }
        }

        for pair in bands.windows(2) {
            if pair[1].low < pair[0].high {
                return Err(SpectralError::InvalidBands(format!(
                    "{} [{}, {}) overlaps or precedes {} [{}, {})",
                    pair[1].name, pair[1].low, pair[1].high, pair[0].name, pair[0].low, pair[0].high
                )));
            }
        }

        Ok(Self { bands })
    }

    pub fn bands(&self) -> &[Band] {
        &self.bands
    }

    /// Mean magnitude per band
    ///
    /// # Arguments
    /// * `frequencies` - Bin centre frequencies in Hz
    /// * `magnitudes` - Magnitude per bin (same order as `frequencies`)
    ///
    /// Only the common prefix of the two slices is considered.
    pub fn band_means(&self, frequencies: &[f64], magnitudes: &[f64]) -> BandReading {
        let values = self
            .bands
            .iter()
            .map(|band| {
                let (sum, count) = frequencies
                    .iter()
                    .zip(magnitudes.iter())
                    .filter(|&(&f, _)| band.contains(f))
                    .fold((0.0, 0usize), |(sum, count), (_, &m)| (sum + m, count + 1));

                let mean = if count == 0 { f64::NAN } else { sum / count as f64 };
                (band.name, mean)
            })
            .collect();

        BandReading { values }
    }
}

/// Band name to mean magnitude, in table order
#[derive(Debug, Clone, PartialEq)]
pub struct BandReading {
    values: Vec<(&'static str, f64)>,
}

impl BandReading {
    /// Value for a band, if the reading has it
    pub fn get(&self, name: &str) -> Option<f64> {
        self.values
            .iter()
            .find(|(band, _)| *band == name)
            .map(|&(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        self.values.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Elementwise mean of two readings, band by band
    ///
    /// Bands missing from `other` carry over from `self` unchanged.
    pub fn average(&self, other: &BandReading) -> BandReading {
        let values = self
            .values
            .iter()
            .map(|&(name, value)| match other.get(name) {
                Some(other_value) => (name, (value + other_value) / 2.0),
                None => (name, value),
            })
            .collect();

        BandReading { values }
    }
}
