//! Replay of a captured sample table as a finite stream
//!
//! Reads the CSV written by the raw-capture pipeline (`timestamp` column
//! followed by one column per channel) and yields its rows as samples. Rows
//! are delivered as fast as they are pulled; the stream closes at end of file.

use super::source::{Discovery, Pulled, StreamSource};
use super::{AcquisitionError, Sample};
use crate::config::EEG_STREAM_TYPE;
use crate::timestamp;
use csv::StringRecord;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Exposes a single table file as a stream of the declared type
#[derive(Debug, Clone)]
pub struct ReplayDiscovery {
    path: PathBuf,
    stream_type: String,
    nominal_rate: f64,
}

impl ReplayDiscovery {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            stream_type: EEG_STREAM_TYPE.to_string(),
            nominal_rate: 256.0,
        }
    }

    /// Override the nominal rate reported by the opened source
    pub fn with_nominal_rate(mut self, rate: f64) -> Self {
        self.nominal_rate = rate;
        self
    }
}

impl Discovery for ReplayDiscovery {
    type Candidate = PathBuf;
    type Source = ReplaySource;

    fn discover(
        &self,
        stream_type: &str,
        _timeout: Duration,
    ) -> Result<Vec<PathBuf>, AcquisitionError> {
        if stream_type == self.stream_type && self.path.is_file() {
            Ok(vec![self.path.clone()])
        } else {
            Ok(Vec::new())
        }
    }

    fn open(&self, candidate: PathBuf) -> Result<ReplaySource, AcquisitionError> {
        ReplaySource::open(&candidate, self.nominal_rate)
    }
}

/// Finite stream over a captured table
pub struct ReplaySource {
    name: String,
    reader: csv::Reader<File>,
    channel_count: usize,
    nominal_rate: f64,
    record: StringRecord,
    row: usize,
}

impl ReplaySource {
    /// Open a table and read its header
    pub fn open(path: &Path, nominal_rate: f64) -> Result<Self, AcquisitionError> {
        let mut reader = csv::Reader::from_path(path)?;
        let headers = reader.headers()?.clone();

        if headers.get(0).map(str::trim) != Some("timestamp") || headers.len() < 2 {
            return Err(AcquisitionError::Open(format!(
                "{} does not look like a sample table (header: {:?})",
                path.display(),
                headers.iter().collect::<Vec<_>>()
            )));
        }

        Ok(Self {
            name: path.display().to_string(),
            reader,
            channel_count: headers.len() - 1,
            nominal_rate,
            record: StringRecord::new(),
            row: 0,
        })
    }

    fn parse_record(&self) -> Result<Sample, AcquisitionError> {
        let malformed = |reason: String| AcquisitionError::Replay {
            row: self.row,
            reason,
        };

        let stamp = self.record.get(0).unwrap_or_default();
        let timestamp = timestamp::parse_local(stamp)
            .ok_or_else(|| malformed(format!("bad timestamp '{}'", stamp)))?;

        let values = self
            .record
            .iter()
            .skip(1)
            .map(|field| {
                field
                    .trim()
                    .parse::<f64>()
                    .map_err(|e| malformed(format!("bad value '{}': {}", field, e)))
            })
            .collect::<Result<Vec<_>, _>>()?;

        if values.len() != self.channel_count {
            return Err(malformed(format!(
                "expected {} values, found {}",
                self.channel_count,
                values.len()
            )));
        }

        Ok(Sample::new(values, timestamp))
    }
}

impl StreamSource for ReplaySource {
    fn name(&self) -> &str {
        &self.name
    }

    fn channel_count(&self) -> usize {
        self.channel_count
    }

    fn nominal_rate(&self) -> f64 {
        self.nominal_rate
    }

    fn pull(&mut self, _timeout: Duration) -> Result<Pulled, AcquisitionError> {
        if !self.reader.read_record(&mut self.record)? {
            return Ok(Pulled::Closed);
        }
        self.row += 1;
        self.parse_record().map(Pulled::Sample)
    }
}
