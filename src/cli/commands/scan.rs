//! Scan commands: one acquisition → identification attempt.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use tokio::runtime::Runtime;
use tracing::info;

use super::ServiceArgs;
use crate::acquisition::{DialogImageSource, ImageSource, PathImageSource};
use crate::config::{self, Config};
use crate::identification::PlantIdClient;
use crate::presenter::{self, Presentation};
use crate::workflow::{ScanPhase, ScanSession, ScanState, ScanWorkflow};

/// Identify the plant in a photo file
pub fn cmd_identify(rt: &Runtime, path: &Path, service: &ServiceArgs) -> anyhow::Result<ExitCode> {
    let config = effective_config(service);
    let source = PathImageSource::new(path, config.jpeg_quality());
    run_scan(rt, source, &config, service.json)
}

/// Pick a photo interactively and identify it
pub fn cmd_pick(
    rt: &Runtime,
    library: Option<&PathBuf>,
    service: &ServiceArgs,
) -> anyhow::Result<ExitCode> {
    let config = effective_config(service);
    let mut source = DialogImageSource::new(config.jpeg_quality());
    if let Some(library) = library {
        source = source.with_library(library);
    }
    run_scan(rt, source, &config, service.json)
}

fn effective_config(service: &ServiceArgs) -> Config {
    config::load().with_overrides(
        service.api_key.clone(),
        service.endpoint.clone(),
        service.timeout,
    )
}

fn run_scan<S>(rt: &Runtime, source: S, config: &Config, json: bool) -> anyhow::Result<ExitCode>
where
    S: ImageSource + 'static,
{
    let settings = config.identification_settings()?;

    let session = rt.block_on(async {
        let client = PlantIdClient::new(&settings)?;
        info!("Using identification endpoint {}", settings.endpoint);

        let handle = ScanWorkflow::spawn(Arc::new(source), Arc::new(client));
        let session = handle
            .scan(|s| {
                // Progress goes to stderr so --json output stays clean
                if s.is_busy() {
                    eprintln!("{}", presenter::status_line(s));
                }
            })
            .await;
        handle.shutdown().await;
        anyhow::Ok(session)
    })?;

    if json {
        println!("{}", serde_json::to_string_pretty(&session)?);
    } else {
        print_outcome(&session);
    }

    Ok(exit_code(&session))
}

fn print_outcome(session: &ScanSession) {
    match session.state() {
        ScanState::Idle => println!("No photo chosen."),
        ScanState::Succeeded { image, result } => {
            println!("Photo: {}", image);
            match presenter::present(result) {
                Presentation::Match(fields) => {
                    println!("Plant:      {}", fields.name);
                    println!("Scientific: {}", fields.scientific_name);
                    println!("Confidence: {:.2}%", fields.percentage);
                    if let Some(url) = fields.image_url {
                        println!("Image:      {}", url);
                    }
                    if result.suggestions.len() > 1 {
                        println!();
                        println!("Other candidates:");
                        for s in result.suggestions.iter().skip(1).take(4) {
                            println!(
                                "  {} ({}) - {:.2}%",
                                s.plant_name,
                                s.scientific_name,
                                presenter::display_percentage(s.probability)
                            );
                        }
                    }
                }
                Presentation::AbsentData => println!("{}", presenter::NO_MATCH_MESSAGE),
            }
        }
        ScanState::Failed { error, .. } => {
            eprintln!("Error: {}", presenter::error_message(error));
            if let Some(detail) = &error.message {
                eprintln!("  ({})", detail);
            }
        }
        // scan() only returns settled sessions
        ScanState::Acquiring | ScanState::Uploading { .. } => {
            println!("{}", presenter::status_line(session));
        }
    }
}

fn exit_code(session: &ScanSession) -> ExitCode {
    if scan_failed(session) {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn scan_failed(session: &ScanSession) -> bool {
    session.phase() == ScanPhase::Failed
}
