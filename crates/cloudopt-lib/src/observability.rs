//! Structured logging for optimization runs
//!
//! A [`RunLogger`] is an explicit handle owned by whoever drives a run; it
//! only emits `tracing` events and holds no global state.

use crate::models::{Recommendation, Resource, ResourceError};
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

/// Structured logger for one run
///
/// Every event carries the command and input name so logs from batch jobs
/// can be correlated.
#[derive(Debug, Clone)]
pub struct RunLogger {
    command: String,
    input: String,
}

impl RunLogger {
    pub fn new(command: impl Into<String>, input: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            input: input.into(),
        }
    }

    /// Log run start
    pub fn log_run_started(&self, dry_run: bool) {
        info!(
            event = "run_started",
            command = %self.command,
            input = %self.input,
            dry_run = dry_run,
            "Run started"
        );
    }

    /// Log a row that could not become a resource
    pub fn log_row_skipped(&self, row: usize, error: &ResourceError) {
        debug!(
            event = "row_skipped",
            command = %self.command,
            input = %self.input,
            row = row,
            error = %error,
            "Skipping row"
        );
    }

    /// Log a row rejected by an aggregation
    pub fn log_row_rejected(&self, row: usize, reason: &str) {
        warn!(
            event = "row_skipped",
            command = %self.command,
            input = %self.input,
            row = row,
            reason = %reason,
            "Skipping row with missing or invalid field"
        );
    }

    /// Log a generated recommendation
    pub fn log_recommendation(&self, row: usize, resource: &Resource, rec: &Recommendation) {
        debug!(
            event = "recommendation",
            command = %self.command,
            row = row,
            provider = %resource.provider,
            region = %resource.region,
            sku = %resource.sku,
            usage_percent = %resource.usage_percent,
            rule_id = %rec.rule_id,
            action = %rec.action,
            savings = %rec.savings,
            "Recommendation generated"
        );
    }

    /// Log run completion
    pub fn log_run_finished(&self, findings: usize, skipped: usize, total_savings: Decimal) {
        if findings == 0 {
            warn!(
                event = "run_finished",
                command = %self.command,
                input = %self.input,
                findings = findings,
                skipped = skipped,
                "Run produced no findings"
            );
        } else {
            info!(
                event = "run_finished",
                command = %self.command,
                input = %self.input,
                findings = findings,
                skipped = skipped,
                total_savings = %total_savings,
                "Run finished"
            );
        }
    }

    /// Log a persisted report
    pub fn log_report_written(&self, destination: &str, rows: usize) {
        info!(
            event = "report_written",
            command = %self.command,
            input = %self.input,
            destination = %destination,
            rows = rows,
            "Report written"
        );
    }
}
