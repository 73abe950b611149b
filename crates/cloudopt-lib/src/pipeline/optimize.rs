//! The optimize pipeline driver

use super::RunOutcome;
use crate::config::Thresholds;
use crate::error::{CloudOptError, Result};
use crate::models::{Action, Recommendation, Resource, Row};
use crate::observability::RunLogger;
use crate::rules::RuleEngine;
use crate::table;
use rust_decimal::Decimal;
use serde::Serialize;
use std::path::Path;

/// Count and savings for one action
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionSummary {
    pub action: Action,
    pub count: usize,
    pub savings: Decimal,
}

/// Result of one optimize pass
#[derive(Debug, Clone, Serialize)]
pub struct OptimizeReport {
    /// Input rows augmented with the recommendation columns, in input order
    #[serde(skip)]
    pub rows: Vec<Row>,
    /// Rows that produced a recommendation
    pub findings: usize,
    /// Rows that could not be parsed into a resource
    pub skipped: usize,
    /// Sum of `savings` over all report rows
    pub total_savings: Decimal,
    /// Breakdown in the order Stop, Downsize, Keep
    pub by_action: Vec<ActionSummary>,
}

impl OptimizeReport {
    fn new() -> Self {
        Self {
            rows: Vec::new(),
            findings: 0,
            skipped: 0,
            total_savings: Decimal::ZERO,
            by_action: Action::ALL
                .iter()
                .map(|&action| ActionSummary {
                    action,
                    count: 0,
                    savings: Decimal::ZERO,
                })
                .collect(),
        }
    }

    fn record(&mut self, mut row: Row, rec: &Recommendation, row_number: usize) -> Result<()> {
        let overflow = || CloudOptError::AmountOverflow {
            row: row_number,
            field: "savings",
        };
        self.total_savings = self
            .total_savings
            .checked_add(rec.savings)
            .ok_or_else(overflow)?;
        if let Some(summary) = self.by_action.iter_mut().find(|s| s.action == rec.action) {
            summary.savings = summary.savings.checked_add(rec.savings).ok_or_else(overflow)?;
            summary.count += 1;
        }

        rec.apply_to(&mut row);
        self.rows.push(row);
        self.findings += 1;
        Ok(())
    }

    pub fn outcome(&self) -> RunOutcome {
        if self.rows.is_empty() {
            RunOutcome::NoFindings
        } else {
            RunOutcome::Success
        }
    }

    /// Report rows as CSV bytes
    pub fn to_csv_bytes(&self) -> Result<Vec<u8>> {
        table::to_csv_bytes(&self.rows)
    }
}

/// Drives rows through the rule engine
pub struct Optimizer {
    engine: RuleEngine,
    logger: RunLogger,
}

impl Optimizer {
    /// Optimizer with the standard Stop/Downsize rules
    pub fn new(thresholds: Thresholds, logger: RunLogger) -> Self {
        Self::with_engine(RuleEngine::standard(thresholds), logger)
    }

    pub fn with_engine(engine: RuleEngine, logger: RunLogger) -> Self {
        Self { engine, logger }
    }

    /// Evaluate every row, skipping rows that are not valid resources
    ///
    /// Only a failure of the row source itself (unreadable CSV) or a savings
    /// total past the decimal range aborts the run.
    pub fn run<I>(&self, rows: I) -> Result<OptimizeReport>
    where
        I: IntoIterator<Item = Result<Row>>,
    {
        let mut report = OptimizeReport::new();

        for (idx, row) in rows.into_iter().enumerate() {
            let row = row?;
            let row_number = idx + 1;

            let resource = match Resource::from_row(&row) {
                Ok(resource) => resource,
                Err(e) => {
                    self.logger.log_row_skipped(row_number, &e);
                    report.skipped += 1;
                    continue;
                }
            };

            let rec = self.engine.run(&resource);
            self.logger.log_recommendation(row_number, &resource, &rec);
            report.record(row, &rec, row_number)?;
        }

        self.logger
            .log_run_finished(report.findings, report.skipped, report.total_savings);
        Ok(report)
    }

    /// Persist report rows as CSV at `path`
    pub fn write_report(&self, report: &OptimizeReport, path: &Path) -> Result<()> {
        table::write_file(path, &report.rows)?;
        self.logger
            .log_report_written(&path.display().to_string(), report.rows.len());
        Ok(())
    }
}
