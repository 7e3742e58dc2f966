//! EEG samples and the Muse electrode layout

use super::AcquisitionError;
use std::fmt;

/// Electrode sites in stream order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Electrode {
    Tp9,
    Af7,
    Af8,
    Tp10,
    RightAux,
}

impl Electrode {
    /// All sites, in the order they appear in a sample
    pub const ALL: [Electrode; 5] = [
        Electrode::Tp9,
        Electrode::Af7,
        Electrode::Af8,
        Electrode::Tp10,
        Electrode::RightAux,
    ];

    /// Position of this electrode's value within a sample
    pub fn index(self) -> usize {
        match self {
            Electrode::Tp9 => 0,
            Electrode::Af7 => 1,
            Electrode::Af8 => 2,
            Electrode::Tp10 => 3,
            Electrode::RightAux => 4,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Electrode::Tp9 => "TP9",
            Electrode::Af7 => "AF7",
            Electrode::Af8 => "AF8",
            Electrode::Tp10 => "TP10",
            Electrode::RightAux => "Right AUX",
        }
    }

    /// Look up an electrode by label (case-insensitive)
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|e| e.label().eq_ignore_ascii_case(label.trim()))
    }
}

impl fmt::Display for Electrode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One multi-channel reading
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    values: Vec<f64>,
    timestamp: f64,
}

impl Sample {
    /// # Arguments
    /// * `values` - One voltage per channel, in stream order
    /// * `timestamp` - Acquisition time in seconds since the Unix epoch
    pub fn new(values: Vec<f64>, timestamp: f64) -> Self {
        Self { values, timestamp }
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn timestamp(&self) -> f64 {
        self.timestamp
    }

    /// Value recorded at an electrode
    pub fn value(&self, electrode: Electrode) -> Result<f64, AcquisitionError> {
        self.values
            .get(electrode.index())
            .copied()
            .ok_or(AcquisitionError::MissingChannel {
                channel: electrode.label(),
                count: self.values.len(),
            })
    }
}
