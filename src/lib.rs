//! # risk-insight-engine
//!
//! Derivatives risk and insight engine.
//!
//! Given a trading book of option and future positions and a reference
//! price for the underlying, this engine computes aggregated portfolio
//! Greeks, a scenario P&L curve with relative-likelihood weights, and a
//! prioritized set of rule-based insights.
//!
//! The engine is a pure, synchronous computation over borrowed inputs. It
//! holds no global state and performs no I/O.
//!
//! ## Architecture
//!
//! - **core** — Positions, the position book, and the error taxonomy
//! - **greeks** — Instrument model table and Greeks aggregation
//! - **scenario** — Scenario curve generation and likelihood weights
//! - **insight** — Ordered rule table and insight generation
//! - **engine** — Facade composing everything into a `RiskSnapshot`
//! - **simulation** — Random books for stress testing

pub mod core;
pub mod engine;
pub mod greeks;
pub mod insight;
pub mod scenario;
pub mod simulation;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::core::book::PositionBook;
    pub use crate::core::error::{ParameterError, PositionViolation, RiskError};
    pub use crate::core::position::{InstrumentType, Position, PositionId};
    pub use crate::engine::{compute_snapshot, EngineConfig, RiskEngine, RiskSnapshot};
    pub use crate::greeks::aggregator::{aggregate, GreeksAggregator, PortfolioGreeks};
    pub use crate::greeks::sensitivity::UnsupportedInstrumentPolicy;
    pub use crate::insight::generator::{generate_insights, Insight, InsightRecord};
    pub use crate::insight::rules::{InsightCategory, InsightRule, Severity};
    pub use crate::scenario::curve::{generate_curve, CurveParams, ScenarioCurve, ScenarioPoint};
}
