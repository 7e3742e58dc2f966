//! Lab Streaming Layer inlet
//!
//! Resolves outlets by their declared `type` property and pulls one sample at
//! a time. LSL stamps samples with the sender's local clock; timestamps are
//! mapped onto the Unix epoch using the inlet's clock correction and the
//! offset between this machine's LSL clock and wall time.

use super::source::{Discovery, Pulled, StreamSource};
use super::{AcquisitionError, Sample};
use crate::timestamp;
use lsl::{Pullable, StreamInfo, StreamInlet};
use std::time::Duration;

/// Inlet history kept by liblsl, in seconds
const MAX_BUFFERED_SECS: i32 = 360;

/// Resolver for LSL outlets on the local network
#[derive(Debug, Clone, Default)]
pub struct LslDiscovery;

impl Discovery for LslDiscovery {
    type Candidate = StreamInfo;
    type Source = LslSource;

    fn discover(
        &self,
        stream_type: &str,
        timeout: Duration,
    ) -> Result<Vec<StreamInfo>, AcquisitionError> {
        log::debug!("Resolving LSL outlets with type='{}'", stream_type);

        lsl::resolve_byprop("type", stream_type, 1, timeout.as_secs_f64())
            .map_err(|e| AcquisitionError::Open(format!("LSL resolve failed: {:?}", e)))
    }

    fn open(&self, info: StreamInfo) -> Result<LslSource, AcquisitionError> {
        LslSource::open(&info)
    }
}

/// Connected LSL inlet
pub struct LslSource {
    name: String,
    channel_count: usize,
    nominal_rate: f64,
    inlet: StreamInlet,
    /// Seconds to add to a local LSL timestamp to get epoch seconds
    epoch_offset: f64,
}

impl LslSource {
    pub fn open(info: &StreamInfo) -> Result<Self, AcquisitionError> {
        let inlet = StreamInlet::new(info, MAX_BUFFERED_SECS, 0, true)
            .map_err(|e| AcquisitionError::Open(format!("Failed to create inlet: {:?}", e)))?;

        // First estimate needs a round trip; later calls return the cached value
        if let Err(e) = inlet.time_correction(1.0) {
            log::warn!("LSL clock correction unavailable: {:?}", e);
        }
        let epoch_offset = timestamp::epoch_now() - lsl::local_clock();

        Ok(Self {
            name: info.stream_name(),
            channel_count: info.channel_count().max(0) as usize,
            nominal_rate: info.nominal_srate(),
            inlet,
            epoch_offset,
        })
    }

    fn to_epoch(&self, lsl_timestamp: f64) -> f64 {
        // Remote-to-local clock correction; zero if the outlet cannot be reached
        let correction = self.inlet.time_correction(0.0).unwrap_or(0.0);
        lsl_timestamp + correction + self.epoch_offset
    }
}

impl StreamSource for LslSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn channel_count(&self) -> usize {
        self.channel_count
    }

    fn nominal_rate(&self) -> f64 {
        self.nominal_rate
    }

    fn pull(&mut self, timeout: Duration) -> Result<Pulled, AcquisitionError> {
        let (values, lsl_timestamp): (Vec<f32>, f64) = self
            .inlet
            .pull_sample(timeout.as_secs_f64())
            .map_err(|e| AcquisitionError::Pull(format!("{:?}", e)))?;

        // liblsl reports a timeout as timestamp 0 with no values
        if lsl_timestamp == 0.0 || values.is_empty() {
            return Ok(Pulled::Timeout);
        }

        let values = values.into_iter().map(f64::from).collect();
        Ok(Pulled::Sample(Sample::new(values, self.to_epoch(lsl_timestamp))))
    }
}
