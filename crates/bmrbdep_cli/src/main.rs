//! Deployment probe for the deposition backend.
//!
//! # Responsibility
//! - Load configuration and bring the deposition log online, as the server
//!   does at startup.
//! - Print a short, deterministic status report.

use bmrbdep_core::logging::init_from_config;
use bmrbdep_core::{core_version, ensure_log_exists, read_release, AppConfig};
use log::warn;
use std::process::ExitCode;

const DEFAULT_CONFIG_PATH: &str = "configuration.json";

fn main() -> ExitCode {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

    match run(&config_path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("bmrbdep: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(config_path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load(config_path)?;
    init_from_config(&config)?;
    ensure_log_exists(&config)?;

    let release = read_release(&config).unwrap_or_else(|err| {
        warn!("event=release_read module=cli status=error error={err}");
        "unknown".to_string()
    });

    println!("bmrbdep_core version={}", core_version());
    println!("bmrbdep release={release}");
    println!("bmrbdep database={}", config.database_path().display());
    Ok(())
}
