//! Stop resources that are idle

use super::{format_threshold, Rule};
use crate::config::Thresholds;
use crate::models::{round_currency, Action, Recommendation, Resource};
use rust_decimal::Decimal;

/// Recommends stopping a resource whose usage is below `stop_usage_lt`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StopIdleRule {
    thresholds: Thresholds,
}

impl StopIdleRule {
    pub const ID: &'static str = "R001_STOP_IDLE";

    pub fn new(thresholds: Thresholds) -> Self {
        Self { thresholds }
    }
}

impl Rule for StopIdleRule {
    fn rule_id(&self) -> &'static str {
        Self::ID
    }

    fn evaluate(&self, resource: &Resource) -> Option<Recommendation> {
        if resource.usage_percent >= self.thresholds.stop_usage_lt {
            return None;
        }

        let optimized_cost = Decimal::ZERO;
        Some(Recommendation {
            rule_id: Self::ID.to_string(),
            action: Action::Stop,
            optimized_cost,
            savings: round_currency(resource.cost_per_month - optimized_cost),
            reason: format!(
                "usage_percent < {}",
                format_threshold(self.thresholds.stop_usage_lt)
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resource(cost: Decimal, usage: Decimal) -> Resource {
        Resource {
            provider: "aws".to_string(),
            region: "eu-west-1".to_string(),
            resource_type: "vm".to_string(),
            sku: "t3.large".to_string(),
            cost_per_month: cost,
            usage_percent: usage,
        }
    }

    #[test]
    fn test_idle_resource_is_stopped() {
        let rule = StopIdleRule::new(Thresholds::default());
        let rec = rule
            .evaluate(&resource(Decimal::from(100), Decimal::from(2)))
            .unwrap();

        assert_eq!(rec.rule_id, "R001_STOP_IDLE");
        assert_eq!(rec.action, Action::Stop);
        assert_eq!(rec.optimized_cost, Decimal::ZERO);
        assert_eq!(rec.savings, Decimal::from(100));
        assert_eq!(rec.reason, "usage_percent < 5.0");
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let rule = StopIdleRule::new(Thresholds::default());
        assert!(rule
            .evaluate(&resource(Decimal::from(100), Decimal::from(5)))
            .is_none());
        assert!(rule
            .evaluate(&resource(Decimal::from(100), Decimal::new(4999, 3)))
            .is_some());
    }

    #[test]
    fn test_savings_rounded_to_cents() {
        let rule = StopIdleRule::new(Thresholds::default());
        let rec = rule
            .evaluate(&resource(Decimal::new(1234567, 4), Decimal::ZERO))
            .unwrap();
        assert_eq!(rec.savings, Decimal::new(12346, 2));
    }

    #[test]
    fn test_negative_usage_still_matches() {
        let rule = StopIdleRule::new(Thresholds::default());
        assert!(rule
            .evaluate(&resource(Decimal::from(10), Decimal::from(-3)))
            .is_some());
    }
}
