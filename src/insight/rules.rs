//! The fixed, ordered insight rule set.
//!
//! Rules are evaluated in table order and each one independently. Thresholds
//! and confidence scores are properties of the rule, not computed values.

use crate::greeks::aggregator::PortfolioGreeks;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const EMERGENT_INDEX_LIMIT: f64 = 10.0;
pub const DELTA_LIMIT: f64 = 500.0;
pub const GAMMA_FLOOR: f64 = -50.0;
pub const VEGA_OPPORTUNITY: f64 = 100.0;
pub const THETA_FLOOR: f64 = -50.0;
pub const POSITION_COUNT_LIMIT: usize = 10;

/// Identifies which rule produced an insight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InsightRule {
    CompositeAnomaly,
    DirectionalExposure,
    NegativeConvexity,
    VolatilityOpportunity,
    AlphaSignal,
    BookComplexity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InsightCategory {
    Composite,
    Risk,
    Opportunity,
    AlphaSignal,
    Compliance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl fmt::Display for InsightCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        };
        f.write_str(label)
    }
}

/// One row of the rule table.
#[derive(Debug, Clone, Copy)]
pub struct RuleDefinition {
    pub rule: InsightRule,
    pub category: InsightCategory,
    pub severity: Severity,
    pub confidence: f64,
    pub actionable: bool,
    pub title: &'static str,
    pub fires: fn(&PortfolioGreeks, usize) -> bool,
    pub message: fn(&PortfolioGreeks, usize) -> String,
}

fn composite_anomaly(greeks: &PortfolioGreeks, _: usize) -> bool {
    greeks.emergent_index.abs() > EMERGENT_INDEX_LIMIT
}

fn directional_exposure(greeks: &PortfolioGreeks, _: usize) -> bool {
    greeks.delta.abs() > DELTA_LIMIT
}

fn negative_convexity(greeks: &PortfolioGreeks, _: usize) -> bool {
    greeks.gamma < GAMMA_FLOOR
}

fn volatility_opportunity(greeks: &PortfolioGreeks, _: usize) -> bool {
    greeks.vega > VEGA_OPPORTUNITY && greeks.theta > THETA_FLOOR
}

fn always(_: &PortfolioGreeks, _: usize) -> bool {
    true
}

fn book_complexity(_: &PortfolioGreeks, position_count: usize) -> bool {
    position_count > POSITION_COUNT_LIMIT
}

fn composite_anomaly_message(greeks: &PortfolioGreeks, _: usize) -> String {
    format!(
        "Emergent index at {:.2} is outside the +/-{} band; delta, vega and gamma are interacting non-linearly.",
        greeks.emergent_index, EMERGENT_INDEX_LIMIT
    )
}

fn directional_exposure_message(greeks: &PortfolioGreeks, _: usize) -> String {
    format!(
        "Net delta of {:.2} exceeds {}; consider hedging with futures to reduce directional risk.",
        greeks.delta, DELTA_LIMIT
    )
}

fn negative_convexity_message(greeks: &PortfolioGreeks, _: usize) -> String {
    format!(
        "Gamma of {:.2} is below {}; large moves in either direction will accelerate losses.",
        greeks.gamma, GAMMA_FLOOR
    )
}

fn volatility_opportunity_message(greeks: &PortfolioGreeks, _: usize) -> String {
    format!(
        "Vega of {:.2} with theta of {:.2}: the book is long volatility at a modest carry cost.",
        greeks.vega, greeks.theta
    )
}

fn alpha_signal_message(greeks: &PortfolioGreeks, _: usize) -> String {
    format!(
        "Charm of {:.4} and vanna of {:.4} describe how delta will drift with time and volatility.",
        greeks.charm, greeks.vanna
    )
}

fn book_complexity_message(_: &PortfolioGreeks, position_count: usize) -> String {
    format!(
        "{} open positions exceed the review threshold of {}.",
        position_count, POSITION_COUNT_LIMIT
    )
}

/// Rule table in evaluation order.
pub const RULES: [RuleDefinition; 6] = [
    RuleDefinition {
        rule: InsightRule::CompositeAnomaly,
        category: InsightCategory::Composite,
        severity: Severity::Critical,
        confidence: 0.99,
        actionable: true,
        title: "Composite risk anomaly",
        fires: composite_anomaly,
        message: composite_anomaly_message,
    },
    RuleDefinition {
        rule: InsightRule::DirectionalExposure,
        category: InsightCategory::Risk,
        severity: Severity::High,
        confidence: 0.98,
        actionable: true,
        title: "Large directional exposure",
        fires: directional_exposure,
        message: directional_exposure_message,
    },
    RuleDefinition {
        rule: InsightRule::NegativeConvexity,
        category: InsightCategory::Risk,
        severity: Severity::Critical,
        confidence: 0.95,
        actionable: true,
        title: "Negative convexity",
        fires: negative_convexity,
        message: negative_convexity_message,
    },
    RuleDefinition {
        rule: InsightRule::VolatilityOpportunity,
        category: InsightCategory::Opportunity,
        severity: Severity::Medium,
        confidence: 0.85,
        actionable: true,
        title: "Cheap volatility exposure",
        fires: volatility_opportunity,
        message: volatility_opportunity_message,
    },
    RuleDefinition {
        rule: InsightRule::AlphaSignal,
        category: InsightCategory::AlphaSignal,
        severity: Severity::Medium,
        confidence: 0.78,
        actionable: true,
        title: "Volatility regime signal",
        fires: always,
        message: alpha_signal_message,
    },
    RuleDefinition {
        rule: InsightRule::BookComplexity,
        category: InsightCategory::Compliance,
        severity: Severity::Low,
        confidence: 1.0,
        actionable: false,
        title: "Book complexity review",
        fires: book_complexity,
        message: book_complexity_message,
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    fn greeks() -> PortfolioGreeks {
        PortfolioGreeks::default()
    }

    #[test]
    fn test_table_order_and_confidence() {
        let rules: Vec<InsightRule> = RULES.iter().map(|r| r.rule).collect();
        assert_eq!(
            rules,
            vec![
                InsightRule::CompositeAnomaly,
                InsightRule::DirectionalExposure,
                InsightRule::NegativeConvexity,
                InsightRule::VolatilityOpportunity,
                InsightRule::AlphaSignal,
                InsightRule::BookComplexity,
            ]
        );
        let confidences: Vec<f64> = RULES.iter().map(|r| r.confidence).collect();
        assert_eq!(confidences, vec![0.99, 0.98, 0.95, 0.85, 0.78, 1.0]);
        assert!(!RULES[5].actionable);
    }

    #[test]
    fn test_thresholds_are_strict() {
        let at_limit = PortfolioGreeks {
            emergent_index: -10.0,
            delta: 500.0,
            gamma: -50.0,
            vega: 100.0,
            ..greeks()
        };
        assert!(!composite_anomaly(&at_limit, 0));
        assert!(!directional_exposure(&at_limit, 0));
        assert!(!negative_convexity(&at_limit, 0));
        assert!(!volatility_opportunity(&at_limit, 0));
        assert!(!book_complexity(&at_limit, 10));

        let past_limit = PortfolioGreeks {
            emergent_index: -10.0001,
            delta: -500.0001,
            gamma: -50.0001,
            vega: 100.0001,
            ..greeks()
        };
        assert!(composite_anomaly(&past_limit, 0));
        assert!(directional_exposure(&past_limit, 0));
        assert!(negative_convexity(&past_limit, 0));
        assert!(volatility_opportunity(&past_limit, 0));
        assert!(book_complexity(&past_limit, 11));
    }

    #[test]
    fn test_volatility_opportunity_needs_mild_theta() {
        let bleeding = PortfolioGreeks {
            vega: 150.0,
            theta: -50.0,
            ..greeks()
        };
        assert!(!volatility_opportunity(&bleeding, 0));
    }

    #[test]
    fn test_messages_interpolate_values() {
        let g = PortfolioGreeks {
            delta: 612.5,
            ..greeks()
        };
        let message = (RULES[1].message)(&g, 0);
        assert!(message.contains("612.50"));

        let compliance = (RULES[5].message)(&g, 14);
        assert!(compliance.starts_with("14 open positions"));
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Critical > Severity::High);
        assert!(Severity::Low < Severity::Medium);
        assert_eq!(Severity::High.to_string(), "HIGH");
    }
}
