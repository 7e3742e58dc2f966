//! Acquisition loop
//!
//! Discovering → Connected → Stopped. Each pulled sample is handed to a
//! [`SampleHandler`] and runs to completion before the next pull. The loop
//! ends when the stop flag is raised or a finite source closes; pull errors
//! are fatal and there is no reconnection.

use super::source::{connect_first, Discovery, Pulled, StreamSource};
use super::{AcquisitionError, Sample};
use crate::config::AcquisitionConfig;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// What a handler did with one sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Buffered, nothing emitted yet
    Buffered,

    /// A record was delivered
    Emitted,

    /// A record was built but delivery failed (already logged)
    Failed,

    /// The sample was unusable and dropped (already logged)
    Skipped,
}

/// Per-sample processing stage driven by the loop
pub trait SampleHandler {
    fn on_sample(&mut self, sample: &Sample) -> Outcome;
}

/// Loop state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    Discovering,
    Connected,
    Stopped,
}

/// Why the loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StopReason {
    #[default]
    Interrupted,
    SourceClosed,
}

/// Counters for one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStats {
    pub samples: u64,
    pub buffered: u64,
    pub emitted: u64,
    pub failed: u64,
    pub skipped: u64,
    pub stop_reason: StopReason,
}

impl RunStats {
    fn record(&mut self, outcome: Outcome) {
        self.samples += 1;
        match outcome {
            Outcome::Buffered => self.buffered += 1,
            Outcome::Emitted => self.emitted += 1,
            Outcome::Failed => self.failed += 1,
            Outcome::Skipped => self.skipped += 1,
        }
    }
}

/// Single-threaded acquisition loop
pub struct Acquisition {
    config: AcquisitionConfig,
    stop: Arc<AtomicBool>,
    state: LoopState,
}

impl Acquisition {
    /// # Arguments
    /// * `config` - Discovery and pull settings
    /// * `stop` - Raised (e.g. by a SIGINT handler) to end the loop
    pub fn new(config: AcquisitionConfig, stop: Arc<AtomicBool>) -> Self {
        Self {
            config,
            stop,
            state: LoopState::Idle,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    fn transition(&mut self, next: LoopState) {
        log::debug!("Acquisition {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    /// Discover a stream, connect to the first match and process samples
    /// until stopped
    pub fn run<D, H>(
        &mut self,
        discovery: &D,
        handler: &mut H,
    ) -> Result<RunStats, AcquisitionError>
    where
        D: Discovery,
        H: SampleHandler,
    {
        self.transition(LoopState::Discovering);

        let connected = connect_first(
            discovery,
            &self.config.stream_type,
            self.config.resolve_timeout,
        );
        let mut source = match connected {
            Ok(source) => source,
            Err(e) => {
                self.transition(LoopState::Stopped);
                return Err(e);
            }
        };

        self.pump(&mut source, handler)
    }

    /// Process samples from an already connected source until stopped
    pub fn pump<S, H>(
        &mut self,
        source: &mut S,
        handler: &mut H,
    ) -> Result<RunStats, AcquisitionError>
    where
        S: StreamSource,
        H: SampleHandler,
    {
        self.transition(LoopState::Connected);
        log::info!("Streaming from '{}' started", source.name());

        let result = self.pull_loop(source, handler);
        self.transition(LoopState::Stopped);

        let stats = result?;
        log::info!(
            "Processed {} samples: {} records sent, {} failed, {} skipped",
            stats.samples,
            stats.emitted,
            stats.failed,
            stats.skipped
        );
        Ok(stats)
    }

    fn pull_loop<S, H>(&self, source: &mut S, handler: &mut H) -> Result<RunStats, AcquisitionError>
    where
        S: StreamSource,
        H: SampleHandler,
    {
        let mut stats = RunStats::default();

        loop {
            if self.stop.load(Ordering::SeqCst) {
                log::warn!("Streaming stopped by user.");
                stats.stop_reason = StopReason::Interrupted;
                return Ok(stats);
            }

            match source.pull(self.config.pull_timeout)? {
                Pulled::Sample(sample) => stats.record(handler.on_sample(&sample)),
                Pulled::Timeout => log::trace!("No sample within {:?}", self.config.pull_timeout),
                Pulled::Closed => {
                    log::info!("Stream '{}' closed", source.name());
                    stats.stop_reason = StopReason::SourceClosed;
                    return Ok(stats);
                }
            }
        }
    }
}
