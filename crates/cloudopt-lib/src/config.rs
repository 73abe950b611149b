//! Threshold configuration
//!
//! Thresholds come from an optional config file layered under
//! `CLOUDOPT_*` environment variables. Keys missing from both take defaults.

use crate::error::Result;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

/// Environment variable prefix for threshold overrides
pub const ENV_PREFIX: &str = "CLOUDOPT";

/// Usage cutoffs that parameterize the rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Downsize when usage_percent is below this value
    #[serde(default = "default_downsize_usage_lt")]
    pub downsize_usage_lt: Decimal,

    /// Stop when usage_percent is below this value
    #[serde(default = "default_stop_usage_lt")]
    pub stop_usage_lt: Decimal,
}

fn default_downsize_usage_lt() -> Decimal {
    Decimal::new(300, 1)
}

fn default_stop_usage_lt() -> Decimal {
    Decimal::new(50, 1)
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            downsize_usage_lt: default_downsize_usage_lt(),
            stop_usage_lt: default_stop_usage_lt(),
        }
    }
}

impl Thresholds {
    pub fn new(downsize_usage_lt: Decimal, stop_usage_lt: Decimal) -> Self {
        Self {
            downsize_usage_lt,
            stop_usage_lt,
        }
    }

    /// Load thresholds from an optional config file and the environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_prefix(path, ENV_PREFIX)
    }

    fn load_with_prefix(path: Option<&Path>, env_prefix: &str) -> Result<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            debug!(path = %path.display(), "Loading threshold config");
            builder = builder.add_source(
                config::File::from(path)
                    .format(file_format(path))
                    .required(true),
            );
        }

        let thresholds: Thresholds = builder
            .add_source(config::Environment::with_prefix(env_prefix))
            .build()?
            .try_deserialize()?;

        if thresholds.stop_usage_lt > thresholds.downsize_usage_lt {
            warn!(
                stop_usage_lt = %thresholds.stop_usage_lt,
                downsize_usage_lt = %thresholds.downsize_usage_lt,
                "stop threshold exceeds downsize threshold; downsize can never match"
            );
        }

        Ok(thresholds)
    }
}

/// Pick the config format from the file extension (JSON when unknown)
fn file_format(path: &Path) -> config::FileFormat {
    match path.extension().and_then(|e| e.to_str()) {
        Some("toml") => config::FileFormat::Toml,
        Some("yaml") | Some("yml") => config::FileFormat::Yaml,
        _ => config::FileFormat::Json,
    }
}
