//! Job configuration

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;

/// Job configuration, read from environment variables
#[derive(Debug, Clone, Deserialize)]
pub struct JobConfig {
    /// Storage account name
    pub azure_storage_account: String,

    /// Container and blob holding the input table
    pub input_container: String,
    pub input_blob: String,

    /// Container and blob receiving the report
    pub output_container: String,
    pub output_blob: String,

    /// SAS token appended to every blob URL
    #[serde(default)]
    pub sas_token: Option<String>,

    /// Overrides `https://<account>.blob.core.windows.net`
    #[serde(default)]
    pub blob_endpoint: Option<String>,

    /// Threshold config file
    #[serde(default)]
    pub thresholds_config: Option<PathBuf>,
}

impl JobConfig {
    /// Load configuration from the environment
    ///
    /// Fails if any required variable is missing.
    pub fn load() -> Result<Self> {
        let config = config::Config::builder()
            .add_source(config::Environment::default())
            .build()?;

        config
            .try_deserialize()
            .context("Missing or invalid job environment variables")
    }
}
