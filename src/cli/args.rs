//! CLI argument definitions using clap

use crate::config::Settings;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "esp-certkit")]
#[command(version)]
#[command(about = "Normalize, validate and generate PEM certificates for ESP32 projects", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<SubCommand>,

    /// Settings file (default: config/default.toml when present)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory uploaded to the ESP32 filesystem
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum SubCommand {
    /// Normalize and validate certificate/key files in place
    Fix(FixArgs),

    /// Analyze certificate/key files without modifying them
    Analyze(AnalyzeArgs),

    /// Copy the ESP32 server certificate into the Android app
    Copy(CopyArgs),

    /// Generate a self-signed certificate and key with openssl
    Generate(GenerateArgs),

    /// Check staged git changes for certificates, keys and secrets
    Scan(ScanArgs),

    /// Interactive menu (default when no command is given)
    Menu,
}

#[derive(Args, Debug)]
pub struct FixArgs {
    /// Files to fix (default: server.crt and server.key in the data directory)
    #[arg(value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Write the result here instead of overwriting the input
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Keep a .backup copy of each file before overwriting it
    #[arg(long)]
    pub backup: bool,

    /// Show what would change without writing anything
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Files to analyze (default: server.crt and server.key in the data directory)
    #[arg(value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct CopyArgs {
    /// Certificate to copy (read from stdin when the file is missing)
    #[arg(long, value_name = "FILE")]
    pub from: Option<PathBuf>,

    /// Destination inside the app tree
    #[arg(long, value_name = "FILE")]
    pub to: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Output directory (default: the data directory)
    #[arg(long, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Skip re-validating the generated files with openssl
    #[arg(long)]
    pub no_verify: bool,
}

#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Repository to scan
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub repo: PathBuf,
}

impl Cli {
    /// Apply command-line overrides on top of loaded settings
    pub fn apply_overrides(&self, settings: &mut Settings) {
        if let Some(dir) = &self.data_dir {
            settings.paths.data_dir = dir.clone();
        }
    }

    /// Log filter used when `RUST_LOG` is not set
    pub fn default_log_filter(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "warn"
        }
    }
}

impl FixArgs {
    /// `--output` only makes sense for a single input
    pub fn output_conflicts(&self) -> bool {
        self.output.is_some() && self.files.len() != 1
    }
}
