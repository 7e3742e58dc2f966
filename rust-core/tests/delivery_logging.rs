//! Warnings that must survive `--quiet`; this binary installs a capturing logger.

mod common;

use common::{acquisition, frontal_samples, VecSource};
use eeg_bandstream::telemetry::{BandRecord, RawRecord, RecordSink, TelemetryError};
use eeg_bandstream::acquisition::StopReason;
use eeg_bandstream::config::AcquisitionConfig;
use eeg_bandstream::{Acquisition, BandPipeline, RawCapturePipeline, Sample, SpectralConfig};
use log::{Level, LevelFilter, Log, Metadata, Record};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

struct CaptureLogger {
    lines: Mutex<Vec<(Level, String)>>,
}

impl Log for CaptureLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= Level::Warn
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            self.lines
                .lock()
                .unwrap()
                .push((record.level(), record.args().to_string()));
        }
    }

    fn flush(&self) {}
}

static LOGGER: CaptureLogger = CaptureLogger {
    lines: Mutex::new(Vec::new()),
};

fn install_logger() {
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(LevelFilter::Warn);
}

fn warnings_containing(text: &str) -> usize {
    LOGGER
        .lines
        .lock()
        .unwrap()
        .iter()
        .filter(|(level, line)| *level == Level::Warn && line.contains(text))
        .count()
}

struct Refuse;

impl<R> RecordSink<R> for Refuse {
    fn deliver(&mut self, _record: &R) -> Result<(), TelemetryError> {
        Err(TelemetryError::Status {
            url: "http://localhost:5000/muse2".to_string(),
            status: 503,
            expected: 200,
            body: "unavailable".to_string(),
        })
    }
}

#[test]
fn test_failed_deliveries_are_logged_and_counted() {
    install_logger();

    let config = SpectralConfig {
        window_size: 16,
        segment_len: 16,
        overlap: 8,
        sample_rate: 16.0,
        ..SpectralConfig::default()
    };
    let sink: Box<dyn RecordSink<BandRecord>> = Box::new(Refuse);
    let mut bands = BandPipeline::new(&config, sink).unwrap();
    let mut source = VecSource::new(frontal_samples(20, |n| (n % 4) as f64));

    let stats = acquisition().pump(&mut source, &mut bands).unwrap();
    assert_eq!(stats.samples, 20);
    assert_eq!(stats.failed, 5);
    assert_eq!(warnings_containing("Failed to send band powers"), 5);
    assert!(warnings_containing("503") >= 5);

    let sink: Box<dyn RecordSink<RawRecord>> = Box::new(Refuse);
    let mut raw = RawCapturePipeline::new(sink).unwrap();
    let mut source = VecSource::new(vec![
        Sample::new(vec![1.0, 2.0, 3.0, 4.0, 5.0], 1_700_000_000.0),
        Sample::new(vec![1.0, 2.0], 1_700_000_001.0),
    ]);

    let stats = acquisition().pump(&mut source, &mut raw).unwrap();
    assert_eq!(stats.failed, 1);
    assert_eq!(stats.skipped, 1);
    assert_eq!(warnings_containing("Failed to index data"), 1);
    assert_eq!(warnings_containing("Dropping sample"), 1);
}

#[test]
fn test_user_stop_is_a_warning() {
    install_logger();

    let stop = Arc::new(AtomicBool::new(true));
    let mut acquisition = Acquisition::new(AcquisitionConfig::default(), stop);
    let sink: Box<dyn RecordSink<RawRecord>> = Box::new(Refuse);
    let mut raw = RawCapturePipeline::new(sink).unwrap();
    let mut source = VecSource::new(frontal_samples(3, |_| 1.0));

    let stats = acquisition.pump(&mut source, &mut raw).unwrap();
    assert_eq!(stats.stop_reason, StopReason::Interrupted);
    assert_eq!(stats.samples, 0);
    assert_eq!(warnings_containing("Streaming stopped by user."), 1);
}
