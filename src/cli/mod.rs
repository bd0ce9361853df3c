//! Command-line interface for plant-scan.
//!
//! This module provides commands for identifying a plant from a photo
//! (given on the command line or picked interactively) and for managing
//! the config file.

mod commands;

pub use commands::{Cli, Commands, run_command};
