//! Cost aggregation commands (simulate, stats)

use anyhow::Result;
use cloudopt_lib::table::TableReader;
use cloudopt_lib::{pipeline, CostSummary, RowPolicy, RunLogger};
use std::path::Path;
use tabled::Tabled;

use crate::output::{format_currency, print_heading, print_json, print_table, print_warning, OutputFormat};

/// Row for grouped cost tables
#[derive(Tabled)]
struct GroupCostRow {
    #[tabled(rename = "Group")]
    group: String,
    #[tabled(rename = "Monthly Cost")]
    cost: String,
}

/// Total monthly cost and cost per provider
pub fn simulate(input: &Path, policy: RowPolicy, format: OutputFormat, currency: &str) -> Result<()> {
    let logger = RunLogger::new("simulate", input.display().to_string());
    logger.log_run_started(true);

    let summary = pipeline::simulate(TableReader::open(input)?, policy, &logger)?;

    match format {
        OutputFormat::Json => print_json(&summary)?,
        OutputFormat::Table => {
            print_heading("Simulation Report");
            println!("Resources:              {}", summary.count);
            println!(
                "Total monthly cost:     {}",
                format_currency(summary.total_cost, currency)
            );
            println!();
            println!("Cost per provider:");
            print_groups(&summary, currency);
        }
    }

    Ok(())
}

/// Monthly cost grouped by any column
pub fn stats(
    input: &Path,
    group_by: &str,
    policy: RowPolicy,
    format: OutputFormat,
    currency: &str,
) -> Result<()> {
    let logger = RunLogger::new("stats", input.display().to_string());
    logger.log_run_started(true);

    let summary = pipeline::stats(TableReader::open(input)?, group_by, policy, &logger)?;

    match format {
        OutputFormat::Json => print_json(&summary)?,
        OutputFormat::Table => {
            print_heading(&format!("Stats per {}", group_by));
            print_groups(&summary, currency);
        }
    }

    Ok(())
}

fn print_groups(summary: &CostSummary, currency: &str) {
    let rows: Vec<GroupCostRow> = summary
        .groups
        .iter()
        .map(|(group, cost)| GroupCostRow {
            group: group.clone(),
            cost: format_currency(*cost, currency),
        })
        .collect();
    print_table(&rows);

    if summary.skipped > 0 {
        print_warning(&format!(
            "Skipped {} rows missing `{}` or `cost_per_month`",
            summary.skipped, summary.group_by
        ));
    }
}
