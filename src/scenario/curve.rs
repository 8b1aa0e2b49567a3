use crate::core::error::{ensure_reference_price, ParameterError, RiskError};
use crate::core::position::Position;
use crate::greeks::sensitivity::{resolve_model, InstrumentModel, UnsupportedInstrumentPolicy};
use crate::scenario::density::relative_likelihood;
use serde::{Deserialize, Serialize};

/// Sweep parameters for the scenario curve, in underlying price units.
///
/// Offsets run from `-range` to `+range` in increments of `step`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurveParams {
    pub range: u32,
    pub step: u32,
}

impl Default for CurveParams {
    fn default() -> Self {
        Self {
            range: 150,
            step: 5,
        }
    }
}

impl CurveParams {
    pub fn new(range: u32, step: u32) -> Result<Self, ParameterError> {
        let params = Self { range, step };
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<(), ParameterError> {
        if self.range == 0 {
            return Err(ParameterError::NonPositiveRange);
        }
        if self.step == 0 {
            return Err(ParameterError::NonPositiveStep);
        }
        if self.step > self.range {
            return Err(ParameterError::StepExceedsRange {
                range: self.range,
                step: self.step,
            });
        }
        Ok(())
    }

    /// Sampled offsets from the reference price, ascending.
    pub fn offsets(&self) -> impl Iterator<Item = i64> {
        let range = i64::from(self.range);
        (-range..=range).step_by(self.step as usize)
    }

    /// Number of points a curve with these parameters holds.
    pub fn point_count(&self) -> usize {
        (2 * u64::from(self.range) / u64::from(self.step)) as usize + 1
    }
}

/// One sampled scenario: the book's P&L if the underlying moved to
/// `underlying_price`, with its relative likelihood.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioPoint {
    pub underlying_price: f64,
    /// Rounded to cents.
    pub pnl: f64,
    /// Unnormalized density weight in `[0, 1]`.
    pub probability: f64,
}

/// A fully materialized P&L curve ordered by ascending price.
///
/// Holds no cursor state and can be iterated any number of times.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScenarioCurve {
    points: Vec<ScenarioPoint>,
}

impl ScenarioCurve {
    pub fn points(&self) -> &[ScenarioPoint] {
        &self.points
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ScenarioPoint> {
        self.points.iter()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The sampled point at exactly `price`, if the grid contains it.
    pub fn point_at_price(&self, price: f64) -> Option<&ScenarioPoint> {
        self.points.iter().find(|p| p.underlying_price == price)
    }

    /// Point with the highest P&L. Ties resolve to the lowest price.
    pub fn max_profit(&self) -> Option<&ScenarioPoint> {
        self.points
            .iter()
            .reduce(|best, p| if p.pnl > best.pnl { p } else { best })
    }

    /// Point with the lowest P&L. Ties resolve to the lowest price.
    pub fn max_loss(&self) -> Option<&ScenarioPoint> {
        self.points
            .iter()
            .reduce(|worst, p| if p.pnl < worst.pnl { p } else { worst })
    }

    /// Point carrying the largest likelihood weight.
    pub fn most_likely(&self) -> Option<&ScenarioPoint> {
        self.points
            .iter()
            .reduce(|best, p| if p.probability > best.probability { p } else { best })
    }

    /// Prices at which P&L reaches zero coming from a non-zero value.
    ///
    /// Sign changes between two samples are located by linear interpolation.
    pub fn breakevens(&self) -> Vec<f64> {
        self.points
            .windows(2)
            .filter_map(|pair| {
                let (a, b) = (pair[0], pair[1]);
                if a.pnl == 0.0 {
                    None
                } else if b.pnl == 0.0 {
                    Some(b.underlying_price)
                } else if a.pnl.signum() != b.pnl.signum() {
                    let t = a.pnl / (a.pnl - b.pnl);
                    Some(a.underlying_price + t * (b.underlying_price - a.underlying_price))
                } else {
                    None
                }
            })
            .collect()
    }

    /// Weights rescaled to sum to one over the sampled grid.
    ///
    /// The `probability` field itself stays unnormalized; this is for
    /// callers that want a discrete distribution.
    pub fn normalized_weights(&self) -> Vec<f64> {
        let total: f64 = self.points.iter().map(|p| p.probability).sum();
        if total <= 0.0 {
            return vec![0.0; self.points.len()];
        }
        self.points.iter().map(|p| p.probability / total).collect()
    }

    /// P&L averaged with the normalized weights.
    pub fn weighted_pnl(&self) -> f64 {
        self.points
            .iter()
            .zip(self.normalized_weights())
            .fold(0.0, |acc, (p, w)| acc + p.pnl * w)
    }
}

impl<'a> IntoIterator for &'a ScenarioCurve {
    type Item = &'a ScenarioPoint;
    type IntoIter = std::slice::Iter<'a, ScenarioPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

/// Sweeps the underlying price around a reference and values the book.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScenarioGenerator {
    policy: UnsupportedInstrumentPolicy,
}

impl ScenarioGenerator {
    pub fn new(policy: UnsupportedInstrumentPolicy) -> Self {
        Self { policy }
    }

    /// Build the P&L curve for `positions` around `reference_price`.
    ///
    /// Parameters are checked before positions; positions are checked in
    /// book order and the first failure is returned.
    pub fn generate(
        &self,
        positions: &[Position],
        reference_price: f64,
        params: CurveParams,
    ) -> Result<ScenarioCurve, RiskError> {
        ensure_reference_price(reference_price)?;
        params.validate()?;

        let priced = positions
            .iter()
            .map(|p| -> Result<_, RiskError> {
                p.validate()?;
                Ok((p, resolve_model(p, self.policy)?))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let points = params
            .offsets()
            .map(|offset| {
                let price = reference_price + offset as f64;
                let pnl = priced.iter().fold(0.0, |acc, (position, model)| {
                    acc + position_pnl(position, model, price, reference_price)
                });
                ScenarioPoint {
                    underlying_price: price,
                    pnl: round_cents(pnl),
                    probability: relative_likelihood(offset as f64),
                }
            })
            .collect();

        Ok(ScenarioCurve { points })
    }
}

/// Build a curve with the default policy, rejecting unsupported instruments.
pub fn generate_curve(
    positions: &[Position],
    reference_price: f64,
    params: CurveParams,
) -> Result<ScenarioCurve, RiskError> {
    ScenarioGenerator::default().generate(positions, reference_price, params)
}

fn position_pnl(
    position: &Position,
    model: &InstrumentModel,
    price: f64,
    reference_price: f64,
) -> f64 {
    let premium = if model.charges_premium {
        position.premium()
    } else {
        0.0
    };
    let payoff = (model.payoff)(position, price, reference_price);
    (payoff - premium) * position.quantity() * position.direction_sign()
}

/// Round to cents. Negative zero collapses to `0.0`.
fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0 + 0.0
}
