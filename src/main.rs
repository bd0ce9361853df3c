//! Plant Scan - identify a plant from a photo.
//!
//! Picks or loads a photo, sends it to a plant identification service and
//! shows the best match. All functionality is exposed through CLI commands.

pub mod acquisition;
pub mod cli;
pub mod config;
pub mod error;
pub mod identification;
pub mod presenter;
#[cfg(test)]
pub mod test_utils;
pub mod workflow;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> anyhow::Result<ExitCode> {
    let args = cli::Cli::parse();

    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("plant_scan=info".parse()?))
        .init();

    cli::run_command(&args)
}
