//! Cloud cost optimization CLI
//!
//! Reads a CSV snapshot of cloud resources and reports which ones to stop
//! or downsize, and what that saves.

mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use cloudopt_lib::{CloudOptError, ExitStatus, RowPolicy};
use commands::{costs, optimize};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Cloud cost optimization CLI
#[derive(Parser)]
#[command(name = "cloudopt")]
#[command(author, version, about = "Cloud cost optimization advisor", long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(long, short, global = true, default_value = "table")]
    pub format: output::OutputFormat,

    /// Currency code used when printing amounts
    #[arg(long, global = true, env = "CLOUDOPT_CURRENCY", default_value = "EUR")]
    pub currency: String,

    /// Enable verbose output
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show total monthly cost and cost per provider
    Simulate {
        /// Input CSV file
        #[arg(long)]
        input: PathBuf,

        /// Fail on rows missing provider or cost instead of skipping them
        #[arg(long)]
        strict: bool,
    },

    /// Recommend stop/downsize/keep per resource and write a report
    Optimize {
        /// Input CSV file
        #[arg(long)]
        input: PathBuf,

        /// Report CSV file
        #[arg(long)]
        output: PathBuf,

        /// Threshold config file (JSON, TOML or YAML)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Report findings without writing the output file
        #[arg(long)]
        dry_run: bool,
    },

    /// Show monthly cost grouped by a column
    Stats {
        /// Input CSV file
        #[arg(long)]
        input: PathBuf,

        /// Column to group by
        #[arg(long)]
        group_by: String,

        /// Fail on rows missing the group column or cost instead of skipping them
        #[arg(long)]
        strict: bool,
    },
}

fn row_policy(strict: bool) -> RowPolicy {
    if strict {
        RowPolicy::Strict
    } else {
        RowPolicy::Skip
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Simulate { .. } => "simulate",
            Commands::Optimize { .. } => "optimize",
            Commands::Stats { .. } => "stats",
        }
    }
}

fn execute(cli: Cli) -> Result<ExitStatus> {
    debug!(
        command = cli.command.name(),
        format = ?cli.format,
        currency = %cli.currency,
        "Dispatching command"
    );
    match cli.command {
        Commands::Simulate { input, strict } => {
            costs::simulate(&input, row_policy(strict), cli.format, &cli.currency)?;
            Ok(ExitStatus::Success)
        }
        Commands::Optimize {
            input,
            output,
            config,
            dry_run,
        } => optimize::optimize(
            optimize::OptimizeArgs {
                input: &input,
                output: &output,
                config: config.as_deref(),
                dry_run,
            },
            cli.format,
            &cli.currency,
        ),
        Commands::Stats {
            input,
            group_by,
            strict,
        } => {
            costs::stats(&input, &group_by, row_policy(strict), cli.format, &cli.currency)?;
            Ok(ExitStatus::Success)
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let status = match execute(cli) {
        Ok(status) => status,
        Err(e) => {
            output::print_error(&format!("{:#}", e));
            let status = e
                .downcast_ref::<CloudOptError>()
                .map(CloudOptError::exit_status)
                .unwrap_or(ExitStatus::Failure);
            debug!(error = %format!("{:#}", e), "Command failed");
            status
        }
    };
    debug!(exit_code = status.code(), "Command finished");

    ExitCode::from(status.code())
}
