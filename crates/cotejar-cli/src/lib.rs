//! Cotejador CLI library
//!
//! Command-line front end for the [`cotejar`] visual regression
//! library. Captures live as PNG files on disk; baselines and diff
//! artifacts live in a directory store managed by the library.

#![warn(missing_docs)]
#![allow(clippy::module_name_repetitions)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

mod commands;
mod config;
mod error;
mod handlers;

pub use commands::{Cli, ColorArg, Commands, CompareArgs, ListArgs, UpdateArgs};
pub use config::{CliConfig, ColorChoice, Verbosity};
pub use error::{CliError, CliResult};

use clap::Parser;
use std::process::ExitCode;

/// Parse arguments, install the output configuration, run the subcommand
///
/// # Errors
///
/// Returns any handler error. Argument parsing failures exit the
/// process through clap before this function returns.
pub fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    let config = CliConfig::from_cli(&cli);
    config.install();
    handlers::dispatch(&cli, &config)
}
