//! Cost aggregations without rule logic

use crate::error::{CloudOptError, Result};
use crate::models::{parse_decimal, ResourceError, Row};
use crate::observability::RunLogger;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

/// How aggregations treat rows lacking the group or cost field
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RowPolicy {
    /// Warn and leave the row out of the sums
    #[default]
    Skip,
    /// Abort the run on the first such row
    Strict,
}

/// Monthly cost totals, grouped by one field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CostSummary {
    pub group_by: String,
    /// Rows included in the sums
    pub count: usize,
    pub skipped: usize,
    pub total_cost: Decimal,
    /// Sorted by group key
    pub groups: BTreeMap<String, Decimal>,
}

/// Total and per-provider cost
pub fn simulate<I>(rows: I, policy: RowPolicy, logger: &RunLogger) -> Result<CostSummary>
where
    I: IntoIterator<Item = Result<Row>>,
{
    summarize(rows, "provider", policy, logger)
}

/// Cost grouped by an arbitrary field
pub fn stats<I>(rows: I, group_by: &str, policy: RowPolicy, logger: &RunLogger) -> Result<CostSummary>
where
    I: IntoIterator<Item = Result<Row>>,
{
    summarize(rows, group_by, policy, logger)
}

/// Sum `cost_per_month` over all rows and per value of `group_by`
pub fn summarize<I>(
    rows: I,
    group_by: &str,
    policy: RowPolicy,
    logger: &RunLogger,
) -> Result<CostSummary>
where
    I: IntoIterator<Item = Result<Row>>,
{
    let mut summary = CostSummary {
        group_by: group_by.to_string(),
        count: 0,
        skipped: 0,
        total_cost: Decimal::ZERO,
        groups: BTreeMap::new(),
    };

    for (idx, row) in rows.into_iter().enumerate() {
        let row = row?;
        let row_number = idx + 1;

        match group_and_cost(&row, group_by, row_number) {
            Ok((key, cost)) => {
                let overflow = || CloudOptError::AmountOverflow {
                    row: row_number,
                    field: "cost_per_month",
                };
                summary.total_cost = summary.total_cost.checked_add(cost).ok_or_else(overflow)?;
                let group = summary.groups.entry(key.to_string()).or_insert(Decimal::ZERO);
                *group = group.checked_add(cost).ok_or_else(overflow)?;
                summary.count += 1;
            }
            Err(e) if policy == RowPolicy::Skip => {
                logger.log_row_rejected(row_number, &e.to_string());
                summary.skipped += 1;
            }
            Err(e) => return Err(e),
        }
    }

    Ok(summary)
}

fn group_and_cost<'a>(row: &'a Row, group_by: &str, row_number: usize) -> Result<(&'a str, Decimal)> {
    let key = row.get(group_by).ok_or_else(|| CloudOptError::MissingField {
        row: row_number,
        field: group_by.to_string(),
    })?;

    let cost = parse_decimal("cost_per_month", row.get("cost_per_month")).map_err(|e| match e {
        ResourceError::InvalidNumber { field, value } => CloudOptError::InvalidNumber {
            row: row_number,
            field: field.to_string(),
            value,
        },
        _ => CloudOptError::MissingField {
            row: row_number,
            field: "cost_per_month".to_string(),
        },
    })?;

    Ok((key, cost))
}
