//! The optimize command

use anyhow::Result;
use cloudopt_lib::table::TableReader;
use cloudopt_lib::{ExitStatus, OptimizeReport, Optimizer, RunLogger, RunOutcome, Thresholds};
use serde::Serialize;
use std::path::Path;
use tabled::Tabled;

use crate::output::{
    color_action, format_currency, print_info, print_json, print_success, print_table,
    print_warning, OutputFormat,
};

/// Row for the per-action breakdown table
#[derive(Tabled)]
struct ActionRow {
    #[tabled(rename = "Action")]
    action: String,
    #[tabled(rename = "Resources")]
    count: usize,
    #[tabled(rename = "Savings")]
    savings: String,
}

/// JSON form of an optimize run
#[derive(Serialize)]
struct OptimizeOutput<'a> {
    #[serde(flatten)]
    report: &'a OptimizeReport,
    dry_run: bool,
    output: Option<String>,
}

/// Options for one optimize run
#[derive(Clone, Copy)]
pub struct OptimizeArgs<'a> {
    pub input: &'a Path,
    pub output: &'a Path,
    pub config: Option<&'a Path>,
    pub dry_run: bool,
}

/// Evaluate every resource and write the report
pub fn optimize(args: OptimizeArgs<'_>, format: OutputFormat, currency: &str) -> Result<ExitStatus> {
    let thresholds = Thresholds::load(args.config)?;

    let logger = RunLogger::new("optimize", args.input.display().to_string());
    logger.log_run_started(args.dry_run);

    let optimizer = Optimizer::new(thresholds, logger);
    let report = optimizer.run(TableReader::open(args.input)?)?;

    let outcome = report.outcome();
    let persist = outcome == RunOutcome::Success && !args.dry_run;
    if persist {
        optimizer.write_report(&report, args.output)?;
    }

    match format {
        OutputFormat::Json => print_json(&OptimizeOutput {
            report: &report,
            dry_run: args.dry_run,
            output: persist.then(|| args.output.display().to_string()),
        })?,
        OutputFormat::Table => print_summary(&report, args, persist, currency),
    }

    Ok(outcome.into())
}

fn print_summary(report: &OptimizeReport, args: OptimizeArgs<'_>, persisted: bool, currency: &str) {
    if report.outcome() == RunOutcome::NoFindings {
        print_warning("No optimizations found");
        return;
    }

    print_success(&format!(
        "Findings: {} | Total savings: {}",
        report.findings,
        format_currency(report.total_savings, currency)
    ));
    if report.skipped > 0 {
        print_warning(&format!("Skipped {} unparseable rows", report.skipped));
    }

    let rows: Vec<ActionRow> = report
        .by_action
        .iter()
        .filter(|s| s.count > 0)
        .map(|s| ActionRow {
            action: color_action(s.action),
            count: s.count,
            savings: format_currency(s.savings, currency),
        })
        .collect();
    print_table(&rows);

    if args.dry_run {
        print_info("Dry-run: no file written");
    } else if persisted {
        print_success(&format!("Report saved to: {}", args.output.display()));
    }
}
