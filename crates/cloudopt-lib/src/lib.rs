//! Cloud cost optimization library
//!
//! This crate provides the core functionality for:
//! - Parsing tabular billing/usage rows into resource records
//! - Rule-based recommendations (stop, downsize, keep)
//! - The optimize pipeline and cost aggregations
//! - Blob storage transfer for batch jobs
//! - Structured run logging

pub mod config;
pub mod error;
pub mod models;
pub mod observability;
pub mod pipeline;
pub mod rules;
pub mod storage;
pub mod table;

pub use config::Thresholds;
pub use error::{CloudOptError, ExitStatus, Result};
pub use models::*;
pub use observability::RunLogger;
pub use pipeline::{CostSummary, OptimizeReport, Optimizer, RowPolicy, RunOutcome};
pub use rules::{Rule, RuleEngine, RuleKind};
