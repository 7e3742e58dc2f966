//! Bounded per-channel sample windows
//!
//! Each tracked channel keeps a ring of exactly `window_size` slots; pushing
//! into a full ring overwrites the oldest value, so memory stays constant over
//! arbitrarily long sessions.

use super::{AcquisitionError, Electrode, Sample};
use ringbuf::{HeapRb, Rb};

/// Sliding window for one channel
struct ChannelRing {
    electrode: Electrode,
    ring: HeapRb<f64>,
}

/// Sliding windows for a fixed set of channels
pub struct ChannelBuffers {
    channels: Vec<ChannelRing>,
    window_size: usize,
}

impl ChannelBuffers {
    /// Create buffers for the given channels
    ///
    /// # Arguments
    /// * `electrodes` - Channels to track (duplicates are ignored)
    /// * `window_size` - Values per window (must be non-zero)
    pub fn new(electrodes: &[Electrode], window_size: usize) -> Result<Self, AcquisitionError> {
        if window_size == 0 {
            return Err(AcquisitionError::EmptyWindow);
        }

        let mut channels: Vec<ChannelRing> = Vec::with_capacity(electrodes.len());
        for &electrode in electrodes {
            if channels.iter().all(|c| c.electrode != electrode) {
                channels.push(ChannelRing {
                    electrode,
                    ring: HeapRb::new(window_size),
                });
            }
        }

        Ok(Self {
            channels,
            window_size,
        })
    }

    fn ring(&self, electrode: Electrode) -> Option<&HeapRb<f64>> {
        self.channels
            .iter()
            .find(|c| c.electrode == electrode)
            .map(|c| &c.ring)
    }

    /// Append one value to a channel; untracked channels are ignored
    pub fn append(&mut self, electrode: Electrode, value: f64) {
        if let Some(channel) = self.channels.iter_mut().find(|c| c.electrode == electrode) {
            channel.ring.push_overwrite(value);
        }
    }

    /// Append every tracked channel's value from a sample
    ///
    /// Channels absent from the sample are left untouched.
    pub fn append_sample(&mut self, sample: &Sample) {
        for channel in &mut self.channels {
            if let Ok(value) = sample.value(channel.electrode) {
                channel.ring.push_overwrite(value);
            }
        }
    }

    /// True once every tracked channel holds a full window
    pub fn is_ready(&self) -> bool {
        self.channels.iter().all(|c| c.ring.len() >= self.window_size)
    }

    /// Latest values of a channel, oldest first
    ///
    /// Returns at most `window_size` values; fewer while the channel is still
    /// filling. Untracked channels yield an empty window.
    pub fn window(&self, electrode: Electrode) -> Vec<f64> {
        self.ring(electrode)
            .map(|ring| ring.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Number of values currently held for a channel
    pub fn len(&self, electrode: Electrode) -> usize {
        self.ring(electrode).map(|ring| ring.len()).unwrap_or(0)
    }

    /// Most recent value of a channel
    pub fn latest(&self, electrode: Electrode) -> Option<f64> {
        self.ring(electrode).and_then(|ring| ring.iter().last().copied())
    }
}
