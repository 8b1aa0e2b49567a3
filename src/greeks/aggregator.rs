use crate::core::error::{ensure_reference_price, RiskError};
use crate::core::position::Position;
use crate::greeks::sensitivity::{resolve_model, BaseSensitivities, UnsupportedInstrumentPolicy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::AddAssign;

/// Aggregate sensitivities of a whole book at one reference price.
///
/// All fields are plain sums over positions, so the record can be built in
/// any order. Summation order only affects the last few bits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioGreeks {
    pub delta: f64,
    pub gamma: f64,
    pub theta: f64,
    pub vega: f64,
    pub rho: f64,
    pub vanna: f64,
    pub charm: f64,
    pub vomma: f64,
    pub speed: f64,
    pub zomma: f64,
    pub color: f64,
    /// Composite heuristic combining delta, vega and gamma with a periodic
    /// price term. Not an industry-standard Greek.
    pub emergent_index: f64,
}

impl PortfolioGreeks {
    /// Contribution of one position whose first-order terms are already
    /// scaled by direction and quantity.
    fn from_scaled(scaled: BaseSensitivities, reference_price: f64) -> Self {
        let BaseSensitivities {
            delta,
            gamma,
            theta,
            vega,
            rho,
        } = scaled;
        Self {
            delta,
            gamma,
            theta,
            vega,
            rho,
            vanna: delta * -0.01,
            charm: delta * 0.02,
            vomma: vega * 0.1,
            speed: gamma * 0.1,
            zomma: gamma * vega * 0.01,
            color: gamma * theta * 0.01,
            emergent_index: ((delta * vega).abs() / (gamma.abs() + 0.01))
                * (reference_price / 1000.0).sin(),
        }
    }

    /// True when every field is exactly zero.
    pub fn is_flat(&self) -> bool {
        *self == Self::default()
    }
}

impl AddAssign for PortfolioGreeks {
    fn add_assign(&mut self, rhs: Self) {
        self.delta += rhs.delta;
        self.gamma += rhs.gamma;
        self.theta += rhs.theta;
        self.vega += rhs.vega;
        self.rho += rhs.rho;
        self.vanna += rhs.vanna;
        self.charm += rhs.charm;
        self.vomma += rhs.vomma;
        self.speed += rhs.speed;
        self.zomma += rhs.zomma;
        self.color += rhs.color;
        self.emergent_index += rhs.emergent_index;
    }
}

impl fmt::Display for PortfolioGreeks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Delta:   {:>12.4}    Vanna:  {:>12.4}", self.delta, self.vanna)?;
        writeln!(f, "Gamma:   {:>12.4}    Charm:  {:>12.4}", self.gamma, self.charm)?;
        writeln!(f, "Theta:   {:>12.4}    Vomma:  {:>12.4}", self.theta, self.vomma)?;
        writeln!(f, "Vega:    {:>12.4}    Speed:  {:>12.4}", self.vega, self.speed)?;
        writeln!(f, "Rho:     {:>12.4}    Zomma:  {:>12.4}", self.rho, self.zomma)?;
        writeln!(f, "GEIN:    {:>12.4}    Color:  {:>12.4}", self.emergent_index, self.color)
    }
}

/// Reduces a book and a reference price to one [`PortfolioGreeks`].
#[derive(Debug, Clone, Copy, Default)]
pub struct GreeksAggregator {
    policy: UnsupportedInstrumentPolicy,
}

impl GreeksAggregator {
    pub fn new(policy: UnsupportedInstrumentPolicy) -> Self {
        Self { policy }
    }

    /// Aggregate the sensitivities of `positions` at `reference_price`.
    ///
    /// An empty book yields the all-zero record. Fails on a non-positive
    /// reference price, on the first invalid position, and on instruments
    /// without a model unless the aggregator degrades them to linear.
    pub fn aggregate(
        &self,
        positions: &[Position],
        reference_price: f64,
    ) -> Result<PortfolioGreeks, RiskError> {
        ensure_reference_price(reference_price)?;

        let mut greeks = PortfolioGreeks::default();
        for position in positions {
            position.validate()?;
            let model = resolve_model(position, self.policy)?;
            let scaled = (model.sensitivities)(position, reference_price)
                .scaled(position.signed_quantity());
            greeks += PortfolioGreeks::from_scaled(scaled, reference_price);
        }
        Ok(greeks)
    }
}

/// Aggregate with the default policy, rejecting unsupported instruments.
pub fn aggregate(positions: &[Position], reference_price: f64) -> Result<PortfolioGreeks, RiskError> {
    GreeksAggregator::default().aggregate(positions, reference_price)
}
