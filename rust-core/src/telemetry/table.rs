//! Local sample table and the index-then-append sink

use super::record::RawRecord;
use super::{RecordSink, TelemetryError};
use csv::{Writer, WriterBuilder};
use std::fs::File;
use std::path::{Path, PathBuf};

/// Append-only CSV table of raw samples
///
/// The file is truncated and the header written once on creation. Each row is
/// flushed as soon as it is written.
pub struct CsvTable {
    path: PathBuf,
    writer: Writer<File>,
    rows: u64,
}

impl CsvTable {
    pub fn create(path: impl AsRef<Path>) -> Result<Self, TelemetryError> {
        let path = path.as_ref().to_path_buf();
        let mut writer = WriterBuilder::new().has_headers(false).from_path(&path)?;

        writer.write_record(RawRecord::header())?;
        writer.flush()?;

        log::info!("Writing samples to {}", path.display());

        Ok(Self {
            path,
            writer,
            rows: 0,
        })
    }

    /// Append and flush one row
    pub fn append(&mut self, record: &RawRecord) -> Result<(), TelemetryError> {
        self.writer.serialize(record)?;
        self.writer.flush()?;
        self.rows += 1;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Data rows written since creation
    pub fn rows(&self) -> u64 {
        self.rows
    }
}

/// Indexes each record remotely, then appends it locally
///
/// A record reaches the table only after the index accepted it.
pub struct IndexedTableSink<I> {
    index: I,
    table: CsvTable,
}

impl<I: RecordSink<RawRecord>> IndexedTableSink<I> {
    pub fn new(index: I, table: CsvTable) -> Self {
        Self { index, table }
    }

    pub fn table(&self) -> &CsvTable {
        &self.table
    }
}

impl<I: RecordSink<RawRecord>> RecordSink<RawRecord> for IndexedTableSink<I> {
    fn deliver(&mut self, record: &RawRecord) -> Result<(), TelemetryError> {
        self.index.deliver(record)?;
        self.table.append(record)
    }
}
