//! First-match-wins rule dispatch

use super::{DownsizeRule, Rule, RuleKind, StopIdleRule};
use crate::config::Thresholds;
use crate::models::{Action, Recommendation, Resource};
use rust_decimal::Decimal;

/// Rule id reported when no rule matched
pub const KEEP_RULE_ID: &str = "R000_KEEP";

/// Applies an ordered rule list to resources
///
/// The list is fixed at construction; `run` takes `&self` and never mutates,
/// so one engine can serve any number of resources, across threads if needed.
#[derive(Debug, Clone)]
pub struct RuleEngine {
    rules: Vec<RuleKind>,
}

impl RuleEngine {
    pub fn new(rules: impl IntoIterator<Item = RuleKind>) -> Self {
        Self {
            rules: rules.into_iter().collect(),
        }
    }

    /// Stop before downsize: idle is the stronger signal
    pub fn standard(thresholds: Thresholds) -> Self {
        Self::new([
            StopIdleRule::new(thresholds).into(),
            DownsizeRule::new(thresholds).into(),
        ])
    }

    /// Recommendation from the first matching rule, or Keep
    pub fn run(&self, resource: &Resource) -> Recommendation {
        self.rules
            .iter()
            .find_map(|rule| rule.evaluate(resource))
            .unwrap_or_else(|| keep(resource))
    }
}

fn keep(resource: &Resource) -> Recommendation {
    Recommendation {
        rule_id: KEEP_RULE_ID.to_string(),
        action: Action::Keep,
        optimized_cost: resource.cost_per_month,
        savings: Decimal::ZERO,
        reason: "no rule matched".to_string(),
    }
}
