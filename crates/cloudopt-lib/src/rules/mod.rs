//! Cost-optimization rules
//!
//! Rules are pure: given a resource they either produce a recommendation or
//! decline. The [`RuleEngine`] applies them in priority order, first match wins.

mod downsize;
mod engine;
mod stop_idle;

pub use downsize::DownsizeRule;
pub use engine::{RuleEngine, KEEP_RULE_ID};
pub use stop_idle::StopIdleRule;

use crate::models::{Recommendation, Resource};
use rust_decimal::Decimal;

/// A named condition-action pair
pub trait Rule {
    /// Stable identifier written to the report
    fn rule_id(&self) -> &'static str;

    /// Recommendation for the resource, or `None` if the rule does not apply
    fn evaluate(&self, resource: &Resource) -> Option<Recommendation>;
}

/// The registered rule set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    StopIdle(StopIdleRule),
    Downsize(DownsizeRule),
}

impl Rule for RuleKind {
    fn rule_id(&self) -> &'static str {
        match self {
            RuleKind::StopIdle(rule) => rule.rule_id(),
            RuleKind::Downsize(rule) => rule.rule_id(),
        }
    }

    fn evaluate(&self, resource: &Resource) -> Option<Recommendation> {
        match self {
            RuleKind::StopIdle(rule) => rule.evaluate(resource),
            RuleKind::Downsize(rule) => rule.evaluate(resource),
        }
    }
}

impl From<StopIdleRule> for RuleKind {
    fn from(rule: StopIdleRule) -> Self {
        RuleKind::StopIdle(rule)
    }
}

impl From<DownsizeRule> for RuleKind {
    fn from(rule: DownsizeRule) -> Self {
        RuleKind::Downsize(rule)
    }
}

/// Render a threshold with at least one fractional digit (`5.0`, `12.5`)
pub(crate) fn format_threshold(value: Decimal) -> String {
    let value = value.normalize();
    if value.scale() == 0 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}
