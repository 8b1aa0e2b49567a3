use crate::greeks::aggregator::PortfolioGreeks;
use crate::insight::rules::{InsightCategory, InsightRule, RuleDefinition, Severity, RULES};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A machine-generated risk or opportunity finding.
///
/// This is the deterministic output of rule evaluation. Identifiers and
/// timestamps live on [`InsightRecord`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Insight {
    pub rule: InsightRule,
    pub category: InsightCategory,
    pub severity: Severity,
    pub title: String,
    pub message: String,
    /// Fixed per rule, in `[0, 1]`.
    pub confidence_score: f64,
    pub actionable: bool,
}

impl Insight {
    fn from_rule(definition: &RuleDefinition, greeks: &PortfolioGreeks, position_count: usize) -> Self {
        Self {
            rule: definition.rule,
            category: definition.category,
            severity: definition.severity,
            title: definition.title.to_string(),
            message: (definition.message)(greeks, position_count),
            confidence_score: definition.confidence,
            actionable: definition.actionable,
        }
    }

    /// Attach a fresh random id and the current time.
    pub fn stamp(self) -> InsightRecord {
        InsightRecord::with_metadata(self, Uuid::new_v4(), Utc::now())
    }
}

/// An [`Insight`] plus its non-semantic metadata.
///
/// Compare records through [`InsightRecord::insight`]; the id and timestamp
/// differ on every run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightRecord {
    pub id: Uuid,
    pub generated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub insight: Insight,
}

impl InsightRecord {
    /// Build a record with explicit metadata (useful for testing / replay).
    pub fn with_metadata(insight: Insight, id: Uuid, generated_at: DateTime<Utc>) -> Self {
        Self {
            id,
            generated_at,
            insight,
        }
    }
}

/// Evaluate the rule table against aggregated Greeks.
///
/// Output follows rule order, not severity. The always-on signal rule
/// guarantees at least one insight.
pub fn generate_insights(greeks: &PortfolioGreeks, position_count: usize) -> Vec<Insight> {
    RULES
        .iter()
        .filter(|definition| (definition.fires)(greeks, position_count))
        .map(|definition| Insight::from_rule(definition, greeks, position_count))
        .collect()
}
