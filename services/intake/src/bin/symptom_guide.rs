//! services/intake/src/bin/symptom_guide.rs

use clap::Parser;
use intake_lib::{
    config::Config,
    console::{run, AppState, Cli},
    error::AppError,
};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<ExitCode, AppError> {
    let cli = Cli::parse();

    // --- 1. Load Configuration & Set Up Logging ---
    let config = Config::from_env()?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
    info!("Configuration loaded: {:?}", config);

    // --- 2. Wire Adapters Into the Shared AppState ---
    let app_state = AppState::from_config(config)?;

    // --- 3. Dispatch ---
    match run(cli, &app_state).await {
        Ok(outcome) => Ok(outcome.into()),
        Err(e) => {
            error!("Command failed: {:?}", e);
            eprintln!("Error: {}", e);
            Ok(ExitCode::FAILURE)
        }
    }
}
