//! The engine facade: one call from a book to a complete risk snapshot.

use crate::core::error::RiskError;
use crate::core::position::Position;
use crate::greeks::aggregator::{GreeksAggregator, PortfolioGreeks};
use crate::greeks::sensitivity::UnsupportedInstrumentPolicy;
use crate::insight::generator::{generate_insights, Insight, InsightRecord};
use crate::scenario::curve::{CurveParams, ScenarioCurve, ScenarioGenerator};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Engine-wide settings, fixed when the engine is built.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Default sweep used by [`RiskEngine::compute_snapshot`].
    pub curve: CurveParams,
    pub unsupported_instruments: UnsupportedInstrumentPolicy,
}

/// Everything the engine knows about a book at one reference price.
///
/// A fresh value is built on every computation; it has no identity beyond
/// the inputs that produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskSnapshot {
    pub reference_price: f64,
    pub greeks: PortfolioGreeks,
    pub curve: ScenarioCurve,
    pub insights: Vec<InsightRecord>,
}

impl RiskSnapshot {
    /// The insights without their ids and timestamps.
    pub fn findings(&self) -> impl Iterator<Item = &Insight> {
        self.insights.iter().map(|record| &record.insight)
    }

    /// True when both snapshots carry the same numbers and findings.
    ///
    /// Insight metadata is ignored.
    pub fn same_outcome(&self, other: &Self) -> bool {
        self.reference_price == other.reference_price
            && self.greeks == other.greeks
            && self.curve == other.curve
            && self.findings().eq(other.findings())
    }
}

impl fmt::Display for RiskSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Risk Snapshot @ {:.2} ===", self.reference_price)?;
        write!(f, "{}", self.greeks)?;

        writeln!(f, "\n--- Scenario Curve ({} points) ---", self.curve.len())?;
        if let Some(best) = self.curve.max_profit() {
            writeln!(f, "  Max profit: {:>12.2} @ {:.2}", best.pnl, best.underlying_price)?;
        }
        if let Some(worst) = self.curve.max_loss() {
            writeln!(f, "  Max loss:   {:>12.2} @ {:.2}", worst.pnl, worst.underlying_price)?;
        }
        let breakevens: Vec<String> = self
            .curve
            .breakevens()
            .iter()
            .map(|p| format!("{:.2}", p))
            .collect();
        if !breakevens.is_empty() {
            writeln!(f, "  Breakevens: {}", breakevens.join(", "))?;
        }
        writeln!(f, "  Weighted P&L: {:.2}", self.curve.weighted_pnl())?;

        writeln!(f, "\n--- Insights ({}) ---", self.insights.len())?;
        for insight in self.findings() {
            writeln!(
                f,
                "  [{}] {} ({:.0}%): {}",
                insight.severity,
                insight.title,
                insight.confidence_score * 100.0,
                insight.message
            )?;
        }
        Ok(())
    }
}

/// Composes the aggregator, the curve generator and the rule set.
///
/// Holds configuration only, so one engine can serve any number of
/// concurrent callers.
#[derive(Debug, Clone, Copy, Default)]
pub struct RiskEngine {
    config: EngineConfig,
}

impl RiskEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Snapshot with the configured curve parameters.
    pub fn compute_snapshot(
        &self,
        positions: &[Position],
        reference_price: f64,
    ) -> Result<RiskSnapshot, RiskError> {
        self.compute_snapshot_with(positions, reference_price, self.config.curve)
    }

    /// Snapshot with explicit curve parameters.
    ///
    /// Errors from any stage are returned as-is.
    pub fn compute_snapshot_with(
        &self,
        positions: &[Position],
        reference_price: f64,
        params: CurveParams,
    ) -> Result<RiskSnapshot, RiskError> {
        let policy = self.config.unsupported_instruments;
        let greeks = GreeksAggregator::new(policy).aggregate(positions, reference_price)?;
        let curve = ScenarioGenerator::new(policy).generate(positions, reference_price, params)?;
        let insights: Vec<InsightRecord> = generate_insights(&greeks, positions.len())
            .into_iter()
            .map(Insight::stamp)
            .collect();

        debug!(
            "snapshot: {} positions @ {} -> delta {:.4}, gamma {:.4}, {} curve points, {} insights",
            positions.len(),
            reference_price,
            greeks.delta,
            greeks.gamma,
            curve.len(),
            insights.len()
        );

        Ok(RiskSnapshot {
            reference_price,
            greeks,
            curve,
            insights,
        })
    }
}

/// Snapshot with the default configuration.
pub fn compute_snapshot(
    positions: &[Position],
    reference_price: f64,
) -> Result<RiskSnapshot, RiskError> {
    RiskEngine::default().compute_snapshot(positions, reference_price)
}
