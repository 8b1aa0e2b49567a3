use crate::core::position::{InstrumentType, PositionId};
use std::fmt;
use thiserror::Error;

/// Errors raised by the risk engine.
///
/// Every error is returned synchronously to the immediate caller. The
/// computation is pure, so retrying with the same input yields the same error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RiskError {
    #[error("invalid position '{id}': {reason}")]
    InvalidPosition {
        id: PositionId,
        reason: PositionViolation,
    },
    #[error("unsupported instrument type {instrument} on position '{id}'")]
    UnsupportedInstrument {
        id: PositionId,
        instrument: InstrumentType,
    },
    #[error("invalid parameter: {0}")]
    InvalidParameter(#[from] ParameterError),
}

/// The way a single position breaks the data model invariants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionViolation {
    MissingStrike,
    UnexpectedStrike,
    NonPositiveStrike,
    NonPositiveQuantity,
    MissingPremium,
    NegativePremium,
    NegativeVolatility,
    NonFiniteValue(&'static str),
}

impl fmt::Display for PositionViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingStrike => write!(f, "options require a strike"),
            Self::UnexpectedStrike => write!(f, "futures must not carry a strike"),
            Self::NonPositiveStrike => write!(f, "strike must be positive"),
            Self::NonPositiveQuantity => write!(f, "quantity must be positive"),
            Self::MissingPremium => write!(f, "premium is required for non-future instruments"),
            Self::NegativePremium => write!(f, "premium must not be negative"),
            Self::NegativeVolatility => write!(f, "implied volatility must not be negative"),
            Self::NonFiniteValue(field) => write!(f, "{} must be a finite number", field),
        }
    }
}

/// Errors in the call arguments rather than in the book itself.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ParameterError {
    #[error("reference price must be positive and finite, got {0}")]
    NonPositiveReferencePrice(f64),
    #[error("curve range must be positive")]
    NonPositiveRange,
    #[error("curve step must be positive")]
    NonPositiveStep,
    #[error("curve step {step} exceeds range {range}")]
    StepExceedsRange { range: u32, step: u32 },
}

/// Check that a reference price can be divided by and swept around.
pub fn ensure_reference_price(reference_price: f64) -> Result<(), ParameterError> {
    if reference_price.is_finite() && reference_price > 0.0 {
        Ok(())
    } else {
        Err(ParameterError::NonPositiveReferencePrice(reference_price))
    }
}
