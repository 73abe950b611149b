//! Run drivers over a stream of rows
//!
//! - `optimize`: rows → resources → recommendations → augmented report rows
//! - `aggregate`: read-only cost sums for `simulate` and `stats`

mod aggregate;
mod optimize;

#[cfg(test)]
mod tests;

pub use aggregate::{simulate, stats, summarize, CostSummary, RowPolicy};
pub use optimize::{ActionSummary, OptimizeReport, Optimizer};

use crate::error::ExitStatus;

/// Terminal outcome of a completed optimize run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// At least one recommendation was produced
    Success,
    /// Every row was skipped, or the input had none
    NoFindings,
}

impl From<RunOutcome> for ExitStatus {
    fn from(outcome: RunOutcome) -> Self {
        match outcome {
            RunOutcome::Success => ExitStatus::Success,
            RunOutcome::NoFindings => ExitStatus::NoFindings,
        }
    }
}
