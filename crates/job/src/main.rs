//! cloudopt-job - batch cost optimization between blob containers
//!
//! Downloads the resource table, runs the optimize pipeline and uploads
//! the report. Exit codes match the `cloudopt` CLI.

use cloudopt_lib::{CloudOptError, ExitStatus};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod config;
mod runner;

const JOB_VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize tracing with JSON output and env filter
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().json().with_writer(std::io::stderr))
        .init();

    info!(version = JOB_VERSION, "Starting cloudopt-job");

    let status = match execute().await {
        Ok(status) => status,
        Err(e) => {
            error!(error = %format!("{:#}", e), "Job failed");
            e.downcast_ref::<CloudOptError>()
                .map(CloudOptError::exit_status)
                .unwrap_or(ExitStatus::Failure)
        }
    };

    info!(status = ?status, code = status.code(), "Job finished");
    ExitCode::from(status.code())
}

async fn execute() -> anyhow::Result<ExitStatus> {
    let config = match config::JobConfig::load() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %format!("{:#}", e), "Invalid job configuration");
            return Ok(ExitStatus::BadInput);
        }
    };
    info!(
        account = %config.azure_storage_account,
        input = %format!("{}/{}", config.input_container, config.input_blob),
        output = %format!("{}/{}", config.output_container, config.output_blob),
        "Job configured"
    );

    let store = runner::blob_store(&config)?;
    runner::run(&config, &store).await
}
