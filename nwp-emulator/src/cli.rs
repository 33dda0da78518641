use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Cli {
    /// Plugin configuration file (YAML)
    #[arg(value_name = "CONFIG")]
    pub config_file: PathBuf,
    /// Number of internal model steps to emulate
    #[arg(short = 'n', long, default_value_t = 10)]
    pub steps: i64,
    /// Model time step in seconds
    #[arg(short, long, default_value_t = 60.0)]
    pub time_step: f64,
    /// Grid points along a latitude circle
    #[arg(long, default_value_t = 64)]
    pub lon_points: usize,
    /// Grid points along a meridian
    #[arg(long, default_value_t = 32)]
    pub lat_points: usize,
    /// Vertical levels of the profile fields
    #[arg(long, default_value_t = 4)]
    pub levels: usize,
    /// Seed for the background wind jitter; entropy when omitted
    #[arg(long)]
    pub seed: Option<u64>,
    /// Folder to write one polygon SVG per step to
    #[arg(short = 'o', long, value_name = "FOLDER")]
    pub svg_folder: Option<PathBuf>,
    #[arg(short, long, default_value_t = log::LevelFilter::Info)]
    pub log_level: log::LevelFilter,
}
