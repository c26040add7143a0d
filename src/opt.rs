use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(
    name = "jetcone",
    about = "Jets and underlying-event cones in generated collider events"
)]
pub struct Opt {
    /// Verbosity level: 'off', 'error', 'warn', 'info', 'debug', 'trace'
    #[arg(short, long, default_value = "info")]
    pub verbosity: String,

    /// Analysis configuration in TOML format
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory with calibration histograms
    #[arg(long)]
    pub calibration: Option<PathBuf>,

    /// Random number seed, overrides the configuration
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Event files to analyse
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}
