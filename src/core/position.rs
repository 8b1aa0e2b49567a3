use crate::core::error::{PositionViolation, RiskError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Caller-assigned identifier of a position.
///
/// The engine treats it as opaque and only echoes it back in errors.
///
/// # Examples
///
/// ```
/// use risk_insight_engine::core::position::PositionId;
///
/// let a = PositionId::new("ES-C-4500");
/// let b = PositionId::new("ES-P-4400");
/// assert_ne!(a, b);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PositionId(String);

impl PositionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PositionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PositionId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for PositionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Kind of instrument a position holds.
///
/// `Swap` and `StructuredProduct` are part of the data model but have no
/// sensitivity or payoff model; see [`crate::greeks::sensitivity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum InstrumentType {
    Call,
    Put,
    Future,
    Swap,
    StructuredProduct,
}

impl InstrumentType {
    /// Options are the only instruments that must carry a strike.
    pub fn is_option(self) -> bool {
        matches!(self, Self::Call | Self::Put)
    }
}

impl fmt::Display for InstrumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Call => "Call",
            Self::Put => "Put",
            Self::Future => "Future",
            Self::Swap => "Swap",
            Self::StructuredProduct => "StructuredProduct",
        };
        f.pad(name)
    }
}

/// A single derivative or linear exposure in a trading book.
///
/// Positions are immutable once built. The engine reads them and never
/// mutates the caller's book.
///
/// # Examples
///
/// ```
/// use risk_insight_engine::core::position::Position;
///
/// let call = Position::call("ES-C-4500", 4500.0, 100.0, 10.0, true, 15.0).unwrap();
/// assert_eq!(call.strike(), Some(4500.0));
/// assert_eq!(call.direction_sign(), 1.0);
///
/// assert!(Position::call("bad", 4500.0, 100.0, 0.0, true, 15.0).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    id: PositionId,
    instrument_type: InstrumentType,
    /// Absent for futures.
    #[serde(default)]
    underlying_strike: Option<f64>,
    /// Per-unit price paid or received. Required for everything but futures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    premium: Option<f64>,
    quantity: f64,
    is_long: bool,
    /// Percentage points, so `15.0` means 15%.
    #[serde(default)]
    implied_volatility_pct: f64,
}

impl Position {
    /// Build and validate a position of any instrument type.
    pub fn new(
        id: impl Into<PositionId>,
        instrument_type: InstrumentType,
        underlying_strike: Option<f64>,
        premium: f64,
        quantity: f64,
        is_long: bool,
        implied_volatility_pct: f64,
    ) -> Result<Self, RiskError> {
        let position = Self {
            id: id.into(),
            instrument_type,
            underlying_strike,
            premium: Some(premium),
            quantity,
            is_long,
            implied_volatility_pct,
        };
        position.validate()?;
        Ok(position)
    }

    pub fn call(
        id: impl Into<PositionId>,
        strike: f64,
        premium: f64,
        quantity: f64,
        is_long: bool,
        implied_volatility_pct: f64,
    ) -> Result<Self, RiskError> {
        Self::new(
            id,
            InstrumentType::Call,
            Some(strike),
            premium,
            quantity,
            is_long,
            implied_volatility_pct,
        )
    }

    pub fn put(
        id: impl Into<PositionId>,
        strike: f64,
        premium: f64,
        quantity: f64,
        is_long: bool,
        implied_volatility_pct: f64,
    ) -> Result<Self, RiskError> {
        Self::new(
            id,
            InstrumentType::Put,
            Some(strike),
            premium,
            quantity,
            is_long,
            implied_volatility_pct,
        )
    }

    pub fn future(
        id: impl Into<PositionId>,
        quantity: f64,
        is_long: bool,
    ) -> Result<Self, RiskError> {
        Self::new(id, InstrumentType::Future, None, 0.0, quantity, is_long, 0.0)
    }

    /// Check the data model invariants.
    ///
    /// Deserialized positions bypass the constructors, so the engine calls
    /// this again on every position it receives.
    pub fn validate(&self) -> Result<(), RiskError> {
        self.violation().map_or(Ok(()), |reason| {
            Err(RiskError::InvalidPosition {
                id: self.id.clone(),
                reason,
            })
        })
    }

    /// The first invariant this position breaks, if any.
    pub fn violation(&self) -> Option<PositionViolation> {
        if !self.quantity.is_finite() {
            return Some(PositionViolation::NonFiniteValue("quantity"));
        }
        if self.quantity <= 0.0 {
            return Some(PositionViolation::NonPositiveQuantity);
        }
        if !self.implied_volatility_pct.is_finite() {
            return Some(PositionViolation::NonFiniteValue("impliedVolatilityPct"));
        }
        if self.implied_volatility_pct < 0.0 {
            return Some(PositionViolation::NegativeVolatility);
        }

        match (self.instrument_type, self.underlying_strike) {
            (kind, None) if kind.is_option() => return Some(PositionViolation::MissingStrike),
            (InstrumentType::Future, Some(_)) => return Some(PositionViolation::UnexpectedStrike),
            (_, Some(strike)) if !strike.is_finite() => {
                return Some(PositionViolation::NonFiniteValue("underlyingStrike"))
            }
            (_, Some(strike)) if strike <= 0.0 => {
                return Some(PositionViolation::NonPositiveStrike)
            }
            _ => {}
        }

        if self.instrument_type != InstrumentType::Future {
            match self.premium {
                None => return Some(PositionViolation::MissingPremium),
                Some(premium) if !premium.is_finite() => {
                    return Some(PositionViolation::NonFiniteValue("premium"))
                }
                Some(premium) if premium < 0.0 => return Some(PositionViolation::NegativePremium),
                Some(_) => {}
            }
        }
        None
    }

    /// `+1` for long positions, `-1` for short ones.
    pub fn direction_sign(&self) -> f64 {
        if self.is_long {
            1.0
        } else {
            -1.0
        }
    }

    /// Quantity with the direction applied.
    pub fn signed_quantity(&self) -> f64 {
        self.direction_sign() * self.quantity
    }

    /// Reference price over strike, or `1` when there is no strike.
    pub fn moneyness(&self, reference_price: f64) -> f64 {
        self.underlying_strike
            .map_or(1.0, |strike| reference_price / strike)
    }

    // --- Accessors ---

    pub fn id(&self) -> &PositionId {
        &self.id
    }

    pub fn instrument_type(&self) -> InstrumentType {
        self.instrument_type
    }

    pub fn strike(&self) -> Option<f64> {
        self.underlying_strike
    }

    /// Premium per unit, `0` when none was given.
    pub fn premium(&self) -> f64 {
        self.premium.unwrap_or(0.0)
    }

    pub fn quantity(&self) -> f64 {
        self.quantity
    }

    pub fn is_long(&self) -> bool {
        self.is_long
    }

    pub fn implied_volatility_pct(&self) -> f64 {
        self.implied_volatility_pct
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_call_creation() {
        let call = Position::call("C1", 4500.0, 100.0, 10.0, true, 15.0).unwrap();
        assert_eq!(call.id().as_str(), "C1");
        assert_eq!(call.instrument_type(), InstrumentType::Call);
        assert_eq!(call.strike(), Some(4500.0));
        assert_eq!(call.signed_quantity(), 10.0);
    }

    #[test]
    fn test_short_direction() {
        let put = Position::put("P1", 4400.0, 50.0, 3.0, false, 20.0).unwrap();
        assert_eq!(put.direction_sign(), -1.0);
        assert_eq!(put.signed_quantity(), -3.0);
    }

    #[test]
    fn test_future_has_no_strike() {
        let fut = Position::future("F1", 2.0, true).unwrap();
        assert_eq!(fut.strike(), None);
        assert_eq!(fut.moneyness(4500.0), 1.0);
    }

    #[test]
    fn test_option_requires_strike() {
        let err = Position::new("C2", InstrumentType::Call, None, 10.0, 1.0, true, 15.0)
            .unwrap_err();
        assert_eq!(
            err,
            RiskError::InvalidPosition {
                id: PositionId::new("C2"),
                reason: PositionViolation::MissingStrike,
            }
        );
    }

    #[test]
    fn test_future_rejects_strike() {
        let result = Position::new("F2", InstrumentType::Future, Some(4500.0), 0.0, 1.0, true, 0.0);
        assert!(matches!(
            result,
            Err(RiskError::InvalidPosition {
                reason: PositionViolation::UnexpectedStrike,
                ..
            })
        ));
    }

    #[test]
    fn test_non_positive_quantity() {
        for qty in [0.0, -5.0] {
            let result = Position::future("F3", qty, true);
            assert!(matches!(
                result,
                Err(RiskError::InvalidPosition {
                    reason: PositionViolation::NonPositiveQuantity,
                    ..
                })
            ));
        }
    }

    #[test]
    fn test_non_finite_fields() {
        let nan_qty = Position::future("F4", f64::NAN, true);
        assert!(nan_qty.is_err());

        let inf_strike = Position::call("C3", f64::INFINITY, 1.0, 1.0, true, 10.0);
        assert!(matches!(
            inf_strike,
            Err(RiskError::InvalidPosition {
                reason: PositionViolation::NonFiniteValue("underlyingStrike"),
                ..
            })
        ));
    }

    #[test]
    fn test_negative_volatility_and_premium() {
        assert!(Position::call("C4", 100.0, 1.0, 1.0, true, -1.0).is_err());
        assert!(Position::put("P2", 100.0, -1.0, 1.0, true, 10.0).is_err());
    }

    #[test]
    fn test_moneyness() {
        let call = Position::call("C5", 4000.0, 10.0, 1.0, true, 15.0).unwrap();
        assert_eq!(call.moneyness(5000.0), 1.25);
    }

    #[test]
    fn test_deserialize_camel_case() {
        let json = r#"{
            "id": "ES-C-4500",
            "instrumentType": "Call",
            "underlyingStrike": 4500.0,
            "premium": 100.0,
            "quantity": 10.0,
            "isLong": true,
            "impliedVolatilityPct": 15.0
        }"#;
        let position: Position = serde_json::from_str(json).unwrap();
        assert!(position.validate().is_ok());
        assert_eq!(position.implied_volatility_pct(), 15.0);

        let future: Position = serde_json::from_str(
            r#"{"id": "F", "instrumentType": "Future", "quantity": 1.0, "isLong": false}"#,
        )
        .unwrap();
        assert!(future.validate().is_ok());
        assert!(!future.is_long());
        assert_eq!(future.premium(), 0.0);
    }

    #[test]
    fn test_deserialized_option_requires_premium() {
        let put: Position = serde_json::from_str(
            r#"{"id": "P-4400", "instrumentType": "Put", "underlyingStrike": 4400.0,
                "quantity": 2.0, "isLong": true, "impliedVolatilityPct": 18.0}"#,
        )
        .unwrap();
        assert_eq!(put.violation(), Some(PositionViolation::MissingPremium));
        assert_eq!(
            put.validate(),
            Err(RiskError::InvalidPosition {
                id: PositionId::new("P-4400"),
                reason: PositionViolation::MissingPremium,
            })
        );
    }
}
