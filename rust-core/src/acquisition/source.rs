//! Stream discovery and the blocking pull primitive

use super::{AcquisitionError, Sample};
use std::time::Duration;

/// Outcome of one pull
#[derive(Debug, Clone, PartialEq)]
pub enum Pulled {
    /// A sample arrived
    Sample(Sample),

    /// Nothing arrived within the pull timeout
    Timeout,

    /// The source has no more samples (finite sources only)
    Closed,
}

/// A connected stream delivering one sample per pull
pub trait StreamSource {
    /// Human-readable stream name for logs
    fn name(&self) -> &str;

    /// Number of values per sample
    fn channel_count(&self) -> usize;

    /// Nominal sample rate in Hz (0 if irregular or unknown)
    fn nominal_rate(&self) -> f64;

    /// Block until a sample arrives or `timeout` elapses
    fn pull(&mut self, timeout: Duration) -> Result<Pulled, AcquisitionError>;
}

/// Resolves streams by declared type and opens them
pub trait Discovery {
    type Candidate;
    type Source: StreamSource;

    /// All currently visible streams of the given type
    fn discover(
        &self,
        stream_type: &str,
        timeout: Duration,
    ) -> Result<Vec<Self::Candidate>, AcquisitionError>;

    /// Open a pull connection to a discovered stream
    fn open(&self, candidate: Self::Candidate) -> Result<Self::Source, AcquisitionError>;
}

/// First candidate in discovery order, or `NoStreamFound`
pub fn select_first<T>(candidates: Vec<T>, stream_type: &str) -> Result<T, AcquisitionError> {
    let count = candidates.len();
    let first = candidates
        .into_iter()
        .next()
        .ok_or_else(|| AcquisitionError::NoStreamFound(stream_type.to_string()))?;

    if count > 1 {
        log::warn!(
            "Found {} streams of type '{}', using the first one",
            count,
            stream_type
        );
    }

    Ok(first)
}

/// Discover streams of a type and connect to the first one
pub fn connect_first<D: Discovery>(
    discovery: &D,
    stream_type: &str,
    timeout: Duration,
) -> Result<D::Source, AcquisitionError> {
    log::info!("Looking for an {} stream...", stream_type);

    let candidates = discovery.discover(stream_type, timeout)?;
    let candidate = select_first(candidates, stream_type)?;
    let source = discovery.open(candidate)?;

    log::info!(
        "Connected to '{}' ({} channels, {} Hz)",
        source.name(),
        source.channel_count(),
        source.nominal_rate()
    );

    Ok(source)
}
