use crate::core::error::RiskError;
use crate::core::position::{InstrumentType, Position};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An ordered collection of positions owned by the caller.
///
/// The engine borrows the positions and never mutates them. Order is
/// preserved because it fixes the floating-point summation order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PositionBook {
    positions: Vec<Position>,
}

impl PositionBook {
    pub fn new() -> Self {
        Self {
            positions: Vec::new(),
        }
    }

    pub fn add(&mut self, position: Position) {
        self.positions.push(position);
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn long_count(&self) -> usize {
        self.positions.iter().filter(|p| p.is_long()).count()
    }

    pub fn short_count(&self) -> usize {
        self.positions.iter().filter(|p| !p.is_long()).count()
    }

    /// Number of positions per instrument type.
    pub fn count_by_instrument(&self) -> BTreeMap<InstrumentType, usize> {
        let mut counts = BTreeMap::new();
        for position in &self.positions {
            *counts.entry(position.instrument_type()).or_insert(0) += 1;
        }
        counts
    }

    /// Every position that breaks a data model invariant, in book order.
    ///
    /// The engine stops at the first of these; this lists all of them.
    pub fn violations(&self) -> Vec<RiskError> {
        self.positions
            .iter()
            .filter_map(|p| p.validate().err())
            .collect()
    }
}

impl FromIterator<Position> for PositionBook {
    fn from_iter<T: IntoIterator<Item = Position>>(iter: T) -> Self {
        Self {
            positions: iter.into_iter().collect(),
        }
    }
}

impl AsRef<[Position]> for PositionBook {
    fn as_ref(&self) -> &[Position] {
        &self.positions
    }
}
