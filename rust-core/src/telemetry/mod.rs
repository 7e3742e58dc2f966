//! Output records and the sinks that deliver them
//!
//! Delivery is at-most-once: a sink makes a single attempt per record and
//! reports failure to the caller, which logs it and moves on.

pub mod http;
pub mod record;
pub mod table;

pub use http::JsonPoster;
pub use record::{BandRecord, RawRecord, RAW_COLUMNS};
pub use table::{CsvTable, IndexedTableSink};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to build HTTP client: {0}")]
    Client(String),

    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Unexpected status {status} from {url} (expected {expected}): {body}")]
    Status {
        url: String,
        status: u16,
        expected: u16,
        body: String,
    },

    #[error("Table write failed: {0}")]
    Table(#[from] csv::Error),

    #[error("Table I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Destination for output records
pub trait RecordSink<R> {
    /// Make one delivery attempt
    fn deliver(&mut self, record: &R) -> Result<(), TelemetryError>;
}

impl<R, S: RecordSink<R> + ?Sized> RecordSink<R> for Box<S> {
    fn deliver(&mut self, record: &R) -> Result<(), TelemetryError> {
        (**self).deliver(record)
    }
}
