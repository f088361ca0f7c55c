//! CLI command definitions using clap

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Cotejador: visual regression checks against stored baselines
#[derive(Parser, Debug)]
#[command(name = "cotejador")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output
    #[arg(long, value_enum, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Color output argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorArg {
    /// Auto-detect terminal support
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compare a captured PNG against the stored baseline
    ///
    /// The first comparison for a check name stores the capture as its
    /// baseline and passes. Later runs count differing pixels; a failed
    /// comparison writes a diff image into the store and exits with
    /// status 1.
    Compare(CompareArgs),

    /// Overwrite the stored baseline with a captured PNG
    Update(UpdateArgs),

    /// List checks that have a stored baseline
    List(ListArgs),
}

/// Arguments for the compare command
#[derive(Parser, Debug)]
pub struct CompareArgs {
    /// PNG file holding the fresh capture
    pub actual: PathBuf,

    /// Check name the capture belongs to
    #[arg(short, long)]
    pub name: String,

    /// Directory holding baselines and artifacts
    #[arg(short, long, default_value = cotejar::DirStore::DEFAULT_ROOT)]
    pub store: PathBuf,

    /// Passing threshold, in percent of differing pixels
    #[arg(short, long, default_value_t = cotejar::DEFAULT_THRESHOLD_PERCENT)]
    pub threshold: f64,
}

/// Arguments for the update command
#[derive(Parser, Debug)]
pub struct UpdateArgs {
    /// PNG file holding the new baseline content
    pub actual: PathBuf,

    /// Check name to update
    #[arg(short, long)]
    pub name: String,

    /// Directory holding baselines and artifacts
    #[arg(short, long, default_value = cotejar::DirStore::DEFAULT_ROOT)]
    pub store: PathBuf,
}

/// Arguments for the list command
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Directory holding baselines and artifacts
    #[arg(short, long, default_value = cotejar::DirStore::DEFAULT_ROOT)]
    pub store: PathBuf,

    /// Emit JSON instead of plain lines
    #[arg(long)]
    pub json: bool,
}
