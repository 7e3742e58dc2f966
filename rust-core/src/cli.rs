use clap::{Args, Parser, Subcommand};
use eeg_bandstream::config::{AcquisitionConfig, SpectralConfig, EEG_STREAM_TYPE};
use eeg_bandstream::{Electrode, WindowType};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(
    name = "eeg-bandstream",
    version,
    about = "Stream EEG headband data to HTTP telemetry endpoints",
    long_about = "Connects to an EEG stream on the local network (Lab Streaming Layer) and either \
                  sends Theta/Alpha/Beta band powers to an HTTP endpoint, or indexes raw samples \
                  into a document store while saving them to a CSV table.\n\
                  Settings may also come from the environment or a .env file."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Send averaged AF7/AF8 band powers to an HTTP endpoint
    Bands(BandsArgs),
    /// Index raw samples and save them to a CSV table
    Capture(CaptureArgs),
}

#[derive(Args)]
pub struct SourceArgs {
    /// Stream type to resolve
    #[arg(long, default_value = EEG_STREAM_TYPE)]
    pub stream_type: String,

    /// Seconds to wait for a matching stream
    #[arg(long, default_value = "5", value_parser = parse_seconds)]
    pub resolve_timeout: Duration,

    /// Stream sample rate in Hz (also reported by a replayed table)
    #[arg(long, default_value_t = 256.0)]
    pub sample_rate: f64,

    /// Replay a captured CSV table instead of resolving a live stream
    #[arg(long, value_name = "FILE")]
    pub replay: Option<PathBuf>,

    /// HTTP request timeout in seconds
    #[arg(long, default_value = "10", value_parser = parse_seconds)]
    pub request_timeout: Duration,
}

impl SourceArgs {
    pub fn acquisition_config(&self) -> AcquisitionConfig {
        AcquisitionConfig {
            stream_type: self.stream_type.clone(),
            resolve_timeout: self.resolve_timeout,
            ..AcquisitionConfig::default()
        }
    }
}

#[derive(Args)]
pub struct BandsArgs {
    /// Endpoint receiving band-power records
    #[arg(long, env = "BANDSTREAM_ENDPOINT")]
    pub endpoint: String,

    #[command(flatten)]
    pub source: SourceArgs,

    /// The two electrodes whose band powers are averaged
    #[arg(
        long,
        default_value = "AF7,AF8",
        value_delimiter = ',',
        value_parser = parse_electrode
    )]
    pub channels: Vec<Electrode>,

    /// Samples per analysis window (also the STFT segment length)
    #[arg(long, default_value_t = 256)]
    pub window_size: usize,

    /// Samples shared by consecutive STFT segments
    #[arg(long, default_value_t = 128)]
    pub overlap: usize,

    /// Segment taper: hann, hamming, blackman or rectangular
    #[arg(long, default_value = "hann", value_parser = parse_window)]
    pub window: WindowType,

    /// Zero-extend each window at both ends before segmenting
    #[arg(long)]
    pub boundary_zeros: bool,
}

impl BandsArgs {
    pub fn spectral_config(&self) -> Result<SpectralConfig, String> {
        let channels: [Electrode; 2] = self.channels.as_slice().try_into().map_err(|_| {
            format!(
                "--channels takes exactly two electrodes, got {}",
                self.channels.len()
            )
        })?;

        Ok(SpectralConfig {
            sample_rate: self.source.sample_rate,
            window_size: self.window_size,
            segment_len: self.window_size,
            overlap: self.overlap,
            window_type: self.window,
            boundary_zeros: self.boundary_zeros,
            channels,
            ..SpectralConfig::default()
        })
    }
}

#[derive(Args)]
pub struct CaptureArgs {
    /// Document index URL, e.g. http://localhost:9200/eeg-stream-data/_doc
    #[arg(long, env = "EEG_INDEX_URL")]
    pub index_url: String,

    /// Index user name
    #[arg(long, env = "EEG_INDEX_USERNAME")]
    pub username: String,

    /// Index password
    #[arg(long, env = "EEG_INDEX_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// CSV table to write (truncated at startup)
    #[arg(short, long, default_value = "eeg_data_stream_all.csv")]
    pub output: PathBuf,

    #[command(flatten)]
    pub source: SourceArgs,
}

fn parse_window(name: &str) -> Result<WindowType, String> {
    WindowType::from_name(name).ok_or_else(|| format!("unknown window '{}'", name))
}

fn parse_electrode(label: &str) -> Result<Electrode, String> {
    Electrode::from_label(label).ok_or_else(|| {
        let known: Vec<&str> = Electrode::ALL.iter().map(|e| e.label()).collect();
        format!("unknown electrode '{}' (expected one of {})", label, known.join(", "))
    })
}

fn parse_seconds(text: &str) -> Result<Duration, String> {
    let value: f64 = text
        .trim()
        .parse()
        .map_err(|e| format!("'{}' is not a number: {}", text, e))?;
    if !(value.is_finite() && value > 0.0) {
        return Err(format!("timeout must be a positive number of seconds (got {})", text));
    }
    Duration::try_from_secs_f64(value).map_err(|e| e.to_string())
}
