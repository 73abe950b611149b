//! Downsize under-used resources

use super::{format_threshold, Rule};
use crate::config::Thresholds;
use crate::models::{round_currency, Action, Recommendation, Resource};
use rust_decimal::Decimal;

/// Recommends halving a resource whose usage is below `downsize_usage_lt`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DownsizeRule {
    thresholds: Thresholds,
}

impl DownsizeRule {
    pub const ID: &'static str = "R002_DOWNSIZE";

    pub fn new(thresholds: Thresholds) -> Self {
        Self { thresholds }
    }

    /// Fraction of the current cost kept after downsizing
    fn cost_factor() -> Decimal {
        Decimal::new(5, 1)
    }
}

impl Rule for DownsizeRule {
    fn rule_id(&self) -> &'static str {
        Self::ID
    }

    fn evaluate(&self, resource: &Resource) -> Option<Recommendation> {
        if resource.usage_percent >= self.thresholds.downsize_usage_lt {
            return None;
        }

        let optimized_cost = round_currency(resource.cost_per_month * Self::cost_factor());
        Some(Recommendation {
            rule_id: Self::ID.to_string(),
            action: Action::Downsize,
            optimized_cost,
            savings: round_currency(resource.cost_per_month - optimized_cost),
            reason: format!(
                "usage_percent < {}",
                format_threshold(self.thresholds.downsize_usage_lt)
            ),
        })
    }
}
