//! Download → optimize → upload

use anyhow::{Context, Result};
use cloudopt_lib::storage::{AzureBlobStore, BlobStore};
use cloudopt_lib::table::TableReader;
use cloudopt_lib::{ExitStatus, Optimizer, RunLogger, RunOutcome, Thresholds};
use tracing::info;

use crate::config::JobConfig;

/// Blob store described by the job configuration
pub fn blob_store(config: &JobConfig) -> Result<AzureBlobStore> {
    let store = match &config.blob_endpoint {
        Some(endpoint) => AzureBlobStore::with_endpoint(endpoint, config.sas_token.clone())?,
        None => AzureBlobStore::new(&config.azure_storage_account, config.sas_token.clone())?,
    };
    Ok(store)
}

/// Run one optimize job against blob storage
///
/// The report is uploaded only when the run has findings.
pub async fn run(config: &JobConfig, store: &dyn BlobStore) -> Result<ExitStatus> {
    let thresholds = Thresholds::load(config.thresholds_config.as_deref())?;

    let source = store.location(&config.input_container, &config.input_blob);
    let input = store
        .download(&config.input_container, &config.input_blob)
        .await
        .with_context(|| format!("Failed to download {}", source))?;
    info!(location = %source, bytes = input.len(), "Input downloaded");

    let logger = RunLogger::new("job", source);
    logger.log_run_started(false);

    let optimizer = Optimizer::new(thresholds, logger.clone());
    let report = tokio::task::spawn_blocking(move || {
        let reader = TableReader::from_bytes(&input)?;
        optimizer.run(reader)
    })
    .await
    .context("Optimize task panicked")??;

    if report.outcome() == RunOutcome::NoFindings {
        return Ok(ExitStatus::NoFindings);
    }

    let destination = store.location(&config.output_container, &config.output_blob);
    store
        .upload(
            &config.output_container,
            &config.output_blob,
            report.to_csv_bytes()?,
        )
        .await
        .with_context(|| format!("Failed to upload {}", destination))?;
    logger.log_report_written(&destination, report.rows.len());

    Ok(ExitStatus::Success)
}
