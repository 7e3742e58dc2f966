//! Sample acquisition: stream discovery, pulling, buffering and the
//! acquisition loop

pub mod buffer;
pub mod replay;
pub mod runner;
pub mod sample;
pub mod source;

#[cfg(feature = "lsl-support")]
pub mod lsl_source;

pub use buffer::ChannelBuffers;
pub use replay::{ReplayDiscovery, ReplaySource};
pub use runner::{Acquisition, LoopState, Outcome, RunStats, SampleHandler, StopReason};
pub use sample::{Electrode, Sample};
pub use source::{connect_first, select_first, Discovery, Pulled, StreamSource};

#[cfg(feature = "lsl-support")]
pub use lsl_source::{LslDiscovery, LslSource};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AcquisitionError {
    #[error("No matching stream found (type '{0}')")]
    NoStreamFound(String),

    #[error("Failed to open stream: {0}")]
    Open(String),

    #[error("Stream pull failed: {0}")]
    Pull(String),

    #[error("Channel window must hold at least one value")]
    EmptyWindow,

    #[error("Sample has {count} channels, {channel} is missing")]
    MissingChannel { channel: &'static str, count: usize },

    #[error("Malformed replay row {row}: {reason}")]
    Replay { row: usize, reason: String },

    #[error("Replay I/O error: {0}")]
    Csv(#[from] csv::Error),
}
