//! Per-instrument sensitivity and payoff models.
//!
//! Each supported instrument type has exactly one row in [`MODELS`]. The
//! aggregator and the curve generator look rows up by instrument tag, so
//! supporting a new instrument means adding one row here. Instruments
//! without a row are rejected unless the caller configured
//! [`UnsupportedInstrumentPolicy::TreatAsLinear`].

use crate::core::error::RiskError;
use crate::core::position::{InstrumentType, Position};
use log::warn;
use serde::{Deserialize, Serialize};

/// First-order sensitivities of one unit of an instrument, before direction
/// and quantity are applied.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BaseSensitivities {
    pub delta: f64,
    pub gamma: f64,
    pub theta: f64,
    pub vega: f64,
    pub rho: f64,
}

impl BaseSensitivities {
    /// Scale every term by a signed quantity.
    pub fn scaled(self, signed_quantity: f64) -> Self {
        Self {
            delta: self.delta * signed_quantity,
            gamma: self.gamma * signed_quantity,
            theta: self.theta * signed_quantity,
            vega: self.vega * signed_quantity,
            rho: self.rho * signed_quantity,
        }
    }
}

/// Sensitivity and payoff formulas for one instrument type.
#[derive(Debug, Clone, Copy)]
pub struct InstrumentModel {
    pub instrument: InstrumentType,
    /// Unit sensitivities given the position and the reference price.
    pub sensitivities: fn(&Position, f64) -> BaseSensitivities,
    /// Unit payoff at `price`, given the reference price.
    pub payoff: fn(&Position, f64, f64) -> f64,
    /// Whether the premium is deducted from the payoff.
    pub charges_premium: bool,
}

/// What to do with a position whose instrument type has no model row.
///
/// Chosen once when the engine is built, never per call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnsupportedInstrumentPolicy {
    /// Fail with [`RiskError::UnsupportedInstrument`].
    #[default]
    Reject,
    /// Price the position with the linear (future) model and log a warning.
    TreatAsLinear,
}

fn option_sensitivities(position: &Position, reference_price: f64) -> BaseSensitivities {
    let moneyness = position.moneyness(reference_price);
    let iv = position.implied_volatility_pct();
    BaseSensitivities {
        delta: 0.5 * moneyness,
        gamma: 0.05 / moneyness,
        theta: -0.1 * iv,
        vega: 0.2 * iv.sqrt(),
        rho: 0.05,
    }
}

fn linear_sensitivities(_position: &Position, _reference_price: f64) -> BaseSensitivities {
    BaseSensitivities {
        delta: 1.0,
        rho: 0.01,
        ..BaseSensitivities::default()
    }
}

fn call_payoff(position: &Position, price: f64, _reference_price: f64) -> f64 {
    position
        .strike()
        .map_or(0.0, |strike| (price - strike).max(0.0))
}

fn put_payoff(position: &Position, price: f64, _reference_price: f64) -> f64 {
    position
        .strike()
        .map_or(0.0, |strike| (strike - price).max(0.0))
}

fn linear_payoff(_position: &Position, price: f64, reference_price: f64) -> f64 {
    price - reference_price
}

const LINEAR: InstrumentModel = InstrumentModel {
    instrument: InstrumentType::Future,
    sensitivities: linear_sensitivities,
    payoff: linear_payoff,
    charges_premium: false,
};

/// The model table, keyed by instrument type.
pub static MODELS: [InstrumentModel; 3] = [
    InstrumentModel {
        instrument: InstrumentType::Call,
        sensitivities: option_sensitivities,
        payoff: call_payoff,
        charges_premium: true,
    },
    InstrumentModel {
        instrument: InstrumentType::Put,
        sensitivities: option_sensitivities,
        payoff: put_payoff,
        charges_premium: true,
    },
    LINEAR,
];

static LINEAR_FALLBACK: InstrumentModel = LINEAR;

/// Look up the model row for an instrument type.
pub fn model_for(instrument: InstrumentType) -> Option<&'static InstrumentModel> {
    MODELS.iter().find(|m| m.instrument == instrument)
}

/// Resolve the model used for a position under the given policy.
pub fn resolve_model(
    position: &Position,
    policy: UnsupportedInstrumentPolicy,
) -> Result<&'static InstrumentModel, RiskError> {
    if let Some(model) = model_for(position.instrument_type()) {
        return Ok(model);
    }
    match policy {
        UnsupportedInstrumentPolicy::Reject => Err(RiskError::UnsupportedInstrument {
            id: position.id().clone(),
            instrument: position.instrument_type(),
        }),
        UnsupportedInstrumentPolicy::TreatAsLinear => {
            warn!(
                "position '{}' ({}) has no model, treating it as linear",
                position.id(),
                position.instrument_type()
            );
            Ok(&LINEAR_FALLBACK)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_every_supported_type_has_one_row() {
        for kind in [InstrumentType::Call, InstrumentType::Put, InstrumentType::Future] {
            let rows = MODELS.iter().filter(|m| m.instrument == kind).count();
            assert_eq!(rows, 1, "{} must have exactly one model row", kind);
        }
        assert!(model_for(InstrumentType::Swap).is_none());
        assert!(model_for(InstrumentType::StructuredProduct).is_none());
    }

    #[test]
    fn test_option_sensitivities_at_the_money() {
        let call = Position::call("C", 4500.0, 100.0, 1.0, true, 16.0).unwrap();
        let model = model_for(InstrumentType::Call).unwrap();
        let base = (model.sensitivities)(&call, 4500.0);
        assert_relative_eq!(base.delta, 0.5);
        assert_relative_eq!(base.gamma, 0.05);
        assert_relative_eq!(base.theta, -1.6);
        assert_relative_eq!(base.vega, 0.8);
        assert_relative_eq!(base.rho, 0.05);
    }

    #[test]
    fn test_put_shares_option_sensitivities() {
        let put = Position::put("P", 5000.0, 10.0, 1.0, true, 9.0).unwrap();
        let base = (model_for(InstrumentType::Put).unwrap().sensitivities)(&put, 4000.0);
        assert_relative_eq!(base.delta, 0.4);
        assert_relative_eq!(base.gamma, 0.0625);
    }

    #[test]
    fn test_future_sensitivities() {
        let fut = Position::future("F", 1.0, true).unwrap();
        let base = (LINEAR.sensitivities)(&fut, 4500.0);
        assert_eq!(
            base,
            BaseSensitivities {
                delta: 1.0,
                gamma: 0.0,
                theta: 0.0,
                vega: 0.0,
                rho: 0.01,
            }
        );
    }

    #[test]
    fn test_payoffs() {
        let call = Position::call("C", 100.0, 5.0, 1.0, true, 10.0).unwrap();
        let put = Position::put("P", 100.0, 5.0, 1.0, true, 10.0).unwrap();
        let fut = Position::future("F", 1.0, true).unwrap();

        assert_eq!(call_payoff(&call, 120.0, 100.0), 20.0);
        assert_eq!(call_payoff(&call, 80.0, 100.0), 0.0);
        assert_eq!(put_payoff(&put, 80.0, 100.0), 20.0);
        assert_eq!(put_payoff(&put, 120.0, 100.0), 0.0);
        assert_eq!(linear_payoff(&fut, 90.0, 100.0), -10.0);
    }

    #[test]
    fn test_scaled() {
        let base = BaseSensitivities {
            delta: 0.5,
            gamma: 0.05,
            theta: -1.5,
            vega: 0.8,
            rho: 0.05,
        };
        let scaled = base.scaled(-10.0);
        assert_relative_eq!(scaled.delta, -5.0);
        assert_relative_eq!(scaled.theta, 15.0);
        assert_relative_eq!(scaled.rho, -0.5);
    }

    #[test]
    fn test_resolve_model_policy() {
        let swap = Position::new("S", InstrumentType::Swap, None, 0.0, 1.0, true, 0.0).unwrap();

        let rejected = resolve_model(&swap, UnsupportedInstrumentPolicy::Reject);
        assert!(matches!(
            rejected,
            Err(RiskError::UnsupportedInstrument {
                instrument: InstrumentType::Swap,
                ..
            })
        ));

        let linear = resolve_model(&swap, UnsupportedInstrumentPolicy::TreatAsLinear).unwrap();
        assert_eq!(linear.instrument, InstrumentType::Future);
        assert!(!linear.charges_premium);
    }
}
