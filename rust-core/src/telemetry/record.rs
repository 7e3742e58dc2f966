//! Output record layouts

use crate::acquisition::{ChannelBuffers, Electrode};
use crate::spectrum::BandReading;
use crate::timestamp;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Column order of the raw capture table (after `timestamp`)
pub const RAW_COLUMNS: [Electrode; 5] = Electrode::ALL;

/// Averaged band powers for one analysis tick
///
/// Serializes as `{"timestamp": ..., "<band>": ..., ...}` in band table order.
/// `NaN` band values serialize as `null`.
#[derive(Debug, Clone, PartialEq)]
pub struct BandRecord {
    pub timestamp: String,
    pub bands: BandReading,
}

impl BandRecord {
    pub fn new(sample_time: f64, bands: BandReading) -> Self {
        Self {
            timestamp: timestamp::format_local(sample_time),
            bands,
        }
    }
}

impl Serialize for BandRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.bands.len() + 1))?;
        map.serialize_entry("timestamp", &self.timestamp)?;
        for (name, value) in self.bands.iter() {
            map.serialize_entry(name, &value)?;
        }
        map.end()
    }
}

/// One raw five-channel sample
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawRecord {
    pub timestamp: String,
    #[serde(rename = "TP9")]
    pub tp9: f64,
    #[serde(rename = "AF7")]
    pub af7: f64,
    #[serde(rename = "AF8")]
    pub af8: f64,
    #[serde(rename = "TP10")]
    pub tp10: f64,
    #[serde(rename = "Right AUX")]
    pub right_aux: f64,
}

impl RawRecord {
    /// Build from the latest buffered value of every raw column
    ///
    /// `None` while any of the five channels is still empty.
    pub fn from_latest(buffers: &ChannelBuffers, sample_time: f64) -> Option<Self> {
        Some(Self {
            timestamp: timestamp::format_local(sample_time),
            tp9: buffers.latest(Electrode::Tp9)?,
            af7: buffers.latest(Electrode::Af7)?,
            af8: buffers.latest(Electrode::Af8)?,
            tp10: buffers.latest(Electrode::Tp10)?,
            right_aux: buffers.latest(Electrode::RightAux)?,
        })
    }

    /// Table header row
    pub fn header() -> Vec<&'static str> {
        std::iter::once("timestamp")
            .chain(RAW_COLUMNS.iter().map(|e| e.label()))
            .collect()
    }
}
