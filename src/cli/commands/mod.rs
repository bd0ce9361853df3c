//! CLI command definitions and dispatch.
//!
//! Each subcommand is implemented in its own submodule:
//! - `scan`: one scan attempt from a file or the photo picker
//! - `config`: config file inspection and setup

mod config;
mod scan;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use tokio::runtime::Runtime;

pub use config::{cmd_config_init, cmd_config_path, cmd_config_show};
pub use scan::{cmd_identify, cmd_pick};

/// Plant Scan CLI
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Identify the plant in a photo file
    Identify {
        /// Path to the photo
        path: PathBuf,
        #[command(flatten)]
        service: ServiceArgs,
    },
    /// Pick a photo with the system file dialog and identify it
    Pick {
        /// Folder to open the picker in (defaults to your pictures folder)
        #[arg(long)]
        library: Option<PathBuf>,
        #[command(flatten)]
        service: ServiceArgs,
    },
    /// Inspect or create the config file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Options shared by the scan commands
#[derive(Args, Clone, Debug, Default)]
pub struct ServiceArgs {
    /// Identification API key (or set PLANT_ID_API_KEY env var)
    #[arg(short, long, env = "PLANT_ID_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,
    /// Identification endpoint URL (or set PLANT_ID_ENDPOINT env var)
    #[arg(long, env = "PLANT_ID_ENDPOINT")]
    pub endpoint: Option<String>,
    /// Transfer timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,
    /// Print the final session as JSON
    #[arg(long)]
    pub json: bool,
}

/// Config file actions
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration (API key masked)
    Show,
    /// Print where the config file lives
    Path,
    /// Write a config file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Run the specified CLI command.
///
/// Returns the process exit code: failure when a scan ends in the Failed
/// state.
pub fn run_command(cli: &Cli) -> anyhow::Result<ExitCode> {
    match &cli.command {
        Commands::Identify { path, service } => {
            let rt = Runtime::new()?;
            cmd_identify(&rt, path, service)
        }
        Commands::Pick { library, service } => {
            let rt = Runtime::new()?;
            cmd_pick(&rt, library.as_ref(), service)
        }
        Commands::Config { action } => {
            match action {
                ConfigAction::Show => cmd_config_show()?,
                ConfigAction::Path => cmd_config_path()?,
                ConfigAction::Init { force } => cmd_config_init(*force)?,
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}
