//! Per-sample pipelines driven by the acquisition loop
//!
//! * [`BandPipeline`] buffers two channels, and once both windows are full
//!   sends averaged band powers on every sample.
//! * [`RawCapturePipeline`] tracks all five channels with a window of one
//!   and builds each record from those rings.
//!
//! Delivery failures are logged and counted; they never stop the loop.

use crate::acquisition::{ChannelBuffers, Electrode, Outcome, Sample, SampleHandler};
use crate::config::SpectralConfig;
use crate::spectrum::{BandReading, SpectralAnalyzer};
use crate::telemetry::{BandRecord, RawRecord, RecordSink, RAW_COLUMNS};
use crate::Result;

/// Band-power stream: sample → windows → STFT → band means → sink
pub struct BandPipeline<S> {
    channels: [Electrode; 2],
    buffers: ChannelBuffers,
    analyzer: SpectralAnalyzer,
    sink: S,
}

impl<S: RecordSink<BandRecord>> BandPipeline<S> {
    pub fn new(config: &SpectralConfig, sink: S) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            channels: config.channels,
            buffers: ChannelBuffers::new(&config.channels, config.window_size)?,
            analyzer: SpectralAnalyzer::new(config)?,
            sink,
        })
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Averaged band reading over the current windows, once they are full
    pub fn current_reading(&mut self) -> Result<Option<BandReading>> {
        if !self.buffers.is_ready() {
            return Ok(None);
        }

        let first = self.buffers.window(self.channels[0]);
        let second = self.buffers.window(self.channels[1]);
        Ok(Some(self.analyzer.analyze_pair(&first, &second)?))
    }
}

impl<S: RecordSink<BandRecord>> SampleHandler for BandPipeline<S> {
    fn on_sample(&mut self, sample: &Sample) -> Outcome {
        for electrode in self.channels {
            if let Err(e) = sample.value(electrode) {
                log::warn!("Dropping sample: {}", e);
                return Outcome::Skipped;
            }
        }
        self.buffers.append_sample(sample);

        let reading = match self.current_reading() {
            Ok(Some(reading)) => reading,
            Ok(None) => {
                let first = self.channels[0];
                log::trace!("Buffered {} values on {}", self.buffers.len(first), first);
                return Outcome::Buffered;
            }
            Err(e) => {
                log::warn!("Spectral analysis failed: {}", e);
                return Outcome::Skipped;
            }
        };

        let record = BandRecord::new(sample.timestamp(), reading);
        match self.sink.deliver(&record) {
            Ok(()) => {
                log::debug!("Sent band powers: {:?}", record);
                Outcome::Emitted
            }
            Err(e) => {
                log::warn!("Failed to send band powers: {}", e);
                Outcome::Failed
            }
        }
    }
}

/// Raw capture: sample → record → sink
pub struct RawCapturePipeline<S> {
    buffers: ChannelBuffers,
    sink: S,
}

impl<S: RecordSink<RawRecord>> RawCapturePipeline<S> {
    pub fn new(sink: S) -> Result<Self> {
        Ok(Self {
            buffers: ChannelBuffers::new(&RAW_COLUMNS, 1)?,
            sink,
        })
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}

impl<S: RecordSink<RawRecord>> SampleHandler for RawCapturePipeline<S> {
    fn on_sample(&mut self, sample: &Sample) -> Outcome {
        for electrode in RAW_COLUMNS {
            if let Err(e) = sample.value(electrode) {
                log::warn!("Dropping sample: {}", e);
                return Outcome::Skipped;
            }
        }
        self.buffers.append_sample(sample);

        let Some(record) = RawRecord::from_latest(&self.buffers, sample.timestamp()) else {
            return Outcome::Skipped;
        };

        match self.sink.deliver(&record) {
            Ok(()) => {
                log::debug!("Data indexed successfully: {:?}", record);
                Outcome::Emitted
            }
            Err(e) => {
                log::warn!("Failed to index data: {}", e);
                Outcome::Failed
            }
        }
    }
}
