//! Core data models for cost optimization

use rust_decimal::{Decimal, RoundingStrategy};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Placeholder for optional descriptive fields absent from the input
pub const UNKNOWN: &str = "unknown";

/// One input or output record: field name to text, in column order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    fields: Vec<(String, String)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of a field, if the row has it
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Overwrite a field in place, or append it if the row lacks it
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some((_, v)) => *v = value,
            None => self.fields.push((key, value)),
        }
    }

    /// Field names in column order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = Row::new();
        for (k, v) in iter {
            row.set(k, v);
        }
        row
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (k, v) in &self.fields {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Why a row could not become a [`Resource`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResourceError {
    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("field `{field}` is not a number: {value:?}")]
    InvalidNumber { field: &'static str, value: String },

    #[error("cost_per_month must not be negative: {0}")]
    NegativeCost(Decimal),

    #[error("provider must not be blank")]
    BlankProvider,
}

/// A billable cloud resource parsed from one input row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub provider: String,
    pub region: String,
    pub resource_type: String,
    pub sku: String,
    pub cost_per_month: Decimal,
    pub usage_percent: Decimal,
}

impl Resource {
    /// Build a resource from a row
    ///
    /// `provider`, `cost_per_month` and `usage_percent` are required.
    /// `usage_percent` is not range-checked.
    pub fn from_row(row: &Row) -> Result<Self, ResourceError> {
        let provider = row
            .get("provider")
            .ok_or(ResourceError::MissingField("provider"))?
            .trim();
        if provider.is_empty() {
            return Err(ResourceError::BlankProvider);
        }

        let cost_per_month = parse_decimal("cost_per_month", row.get("cost_per_month"))?;
        if cost_per_month < Decimal::ZERO {
            return Err(ResourceError::NegativeCost(cost_per_month));
        }
        let usage_percent = parse_decimal("usage_percent", row.get("usage_percent"))?;

        Ok(Self {
            provider: provider.to_string(),
            region: text_or_unknown(row.get("region")),
            resource_type: text_or_unknown(row.get("resource_type")),
            sku: text_or_unknown(row.get("sku")),
            cost_per_month,
            usage_percent,
        })
    }
}

fn text_or_unknown(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => UNKNOWN.to_string(),
    }
}

/// Parse a decimal field, accepting plain and scientific notation
pub(crate) fn parse_decimal(
    field: &'static str,
    raw: Option<&str>,
) -> Result<Decimal, ResourceError> {
    let raw = raw.ok_or(ResourceError::MissingField(field))?;
    let trimmed = raw.trim();
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| ResourceError::InvalidNumber {
            field,
            value: raw.to_string(),
        })
}

/// Round a currency amount to cents
pub fn round_currency(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Render an amount for the report: padded to cents, never truncated
///
/// Amounts with more than two decimals (a Keep row echoing a sub-cent cost)
/// are written exactly as held.
pub fn format_amount(amount: Decimal) -> String {
    let amount = amount.normalize();
    if amount.scale() > 2 {
        amount.to_string()
    } else {
        format!("{:.2}", amount)
    }
}

/// Recommended action for a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Action {
    Stop,
    Downsize,
    Keep,
}

impl Action {
    /// All actions, strongest first
    pub const ALL: [Action; 3] = [Action::Stop, Action::Downsize, Action::Keep];

    pub fn as_str(self) -> &'static str {
        match self {
            Action::Stop => "Stop",
            Action::Downsize => "Downsize",
            Action::Keep => "Keep",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decision produced for exactly one resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub rule_id: String,
    pub action: Action,
    pub optimized_cost: Decimal,
    pub savings: Decimal,
    pub reason: String,
}

impl Recommendation {
    /// Output columns appended to every optimized row
    pub const COLUMNS: [&'static str; 5] =
        ["rule_id", "action", "optimized_cost", "savings", "reason"];

    /// Write this recommendation's fields into a row
    pub fn apply_to(&self, row: &mut Row) {
        row.set("rule_id", self.rule_id.as_str());
        row.set("action", self.action.as_str());
        row.set("optimized_cost", format_amount(self.optimized_cost));
        row.set("savings", format_amount(self.savings));
        row.set("reason", self.reason.as_str());
    }
}
