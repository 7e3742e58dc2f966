use anyhow::{Context, Result};
use clap::Parser;
use eeg_bandstream::acquisition::{ReplayDiscovery, SampleHandler};
use eeg_bandstream::config::{BandStreamConfig, CaptureConfig, Credentials};
use eeg_bandstream::telemetry::http::{STATUS_CREATED, STATUS_OK};
use eeg_bandstream::telemetry::{CsvTable, IndexedTableSink, JsonPoster};
use eeg_bandstream::{Acquisition, BandPipeline, RawCapturePipeline, RunStats};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

mod cli;

use cli::{BandsArgs, CaptureArgs, Cli, Command, SourceArgs};

fn main() {
    // Credentials and endpoints may live in a .env file
    let dotenv = dotenvy::dotenv();

    let cli = Cli::parse();

    let log_level = match (cli.quiet, cli.verbose) {
        (true, _) => log::LevelFilter::Warn,
        (false, 0) => log::LevelFilter::Info,
        (false, 1) => log::LevelFilter::Debug,
        (false, _) => log::LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(log_level)
        .parse_default_env()
        .init();

    if let Ok(path) = dotenv {
        log::debug!("Loaded environment from {}", path.display());
    }

    let stop = Arc::new(AtomicBool::new(false));
    let handler_flag = stop.clone();
    if let Err(e) = ctrlc::set_handler(move || handler_flag.store(true, Ordering::SeqCst)) {
        log::warn!("Could not install interrupt handler: {}", e);
    }

    let result = match cli.command {
        Command::Bands(args) => run_bands(args, stop),
        Command::Capture(args) => run_capture(args, stop),
    };

    if let Err(e) = result {
        log::error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run_bands(args: BandsArgs, stop: Arc<AtomicBool>) -> Result<()> {
    let spectral = args.spectral_config().map_err(anyhow::Error::msg)?;
    let config = BandStreamConfig {
        acquisition: args.source.acquisition_config(),
        spectral,
        request_timeout: args.source.request_timeout,
        ..BandStreamConfig::new(args.endpoint.clone())
    };
    config.validate().context("invalid band stream settings")?;

    let poster = JsonPoster::new(&config.endpoint, STATUS_OK, config.request_timeout)?;
    log::info!("Sending band powers to {}", poster.url());
    for band in config.spectral.bands.bands() {
        log::debug!("Band {} [{}, {}) Hz", band.name, band.low, band.high);
    }
    let mut pipeline = BandPipeline::new(&config.spectral, poster)?;

    let mut acquisition = Acquisition::new(config.acquisition.clone(), stop);
    run_loop(&mut acquisition, &args.source, &mut pipeline)?;
    Ok(())
}

fn run_capture(args: CaptureArgs, stop: Arc<AtomicBool>) -> Result<()> {
    let config = CaptureConfig {
        acquisition: args.source.acquisition_config(),
        table_path: args.output.clone(),
        request_timeout: args.source.request_timeout,
        ..CaptureConfig::new(
            args.index_url.clone(),
            Credentials::new(args.username.clone(), args.password.clone()),
        )
    };
    config.validate().context("invalid capture settings")?;

    if let Some(replay) = &args.source.replay {
        if same_file(replay, &config.table_path) {
            anyhow::bail!(
                "replay input and output table are the same file ({})",
                replay.display()
            );
        }
    }

    let index = JsonPoster::new(&config.index_url, STATUS_CREATED, config.request_timeout)?
        .with_basic_auth(config.credentials.clone());
    let table = CsvTable::create(&config.table_path)
        .with_context(|| format!("cannot create {}", config.table_path.display()))?;
    log::info!(
        "Streaming data to {} and saving to {}... Press Ctrl+C to stop.",
        index.url(),
        table.path().display()
    );
    let mut pipeline = RawCapturePipeline::new(IndexedTableSink::new(index, table))?;

    let mut acquisition = Acquisition::new(config.acquisition.clone(), stop);
    run_loop(&mut acquisition, &args.source, &mut pipeline)?;
    Ok(())
}

fn run_loop<H: SampleHandler>(
    acquisition: &mut Acquisition,
    source: &SourceArgs,
    handler: &mut H,
) -> Result<RunStats> {
    if let Some(path) = &source.replay {
        let discovery = ReplayDiscovery::new(path).with_nominal_rate(source.sample_rate);
        return Ok(acquisition.run(&discovery, handler)?);
    }

    run_live(acquisition, handler)
}

#[cfg(feature = "lsl-support")]
fn run_live<H: SampleHandler>(acquisition: &mut Acquisition, handler: &mut H) -> Result<RunStats> {
    let discovery = eeg_bandstream::acquisition::LslDiscovery;
    Ok(acquisition.run(&discovery, handler)?)
}

#[cfg(not(feature = "lsl-support"))]
fn run_live<H: SampleHandler>(
    _acquisition: &mut Acquisition,
    _handler: &mut H,
) -> Result<RunStats> {
    anyhow::bail!(
        "built without Lab Streaming Layer support; pass --replay <FILE> \
         or rebuild with `--features lsl-support`"
    )
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
