//! Random trading books for stress tests and benchmarks.

use crate::core::book::PositionBook;
use crate::core::position::{InstrumentType, Position};
use rand::Rng;

/// Configuration for generating a random book.
#[derive(Debug, Clone)]
pub struct BookConfig {
    /// Number of positions in the book.
    pub position_count: usize,
    /// Reference price that strikes are scattered around.
    pub reference_price: f64,
    /// Maximum distance of a strike from the reference price.
    pub strike_spread: f64,
    /// Instrument types to draw from.
    pub instruments: Vec<InstrumentType>,
    pub min_quantity: f64,
    pub max_quantity: f64,
    /// Implied volatility range in percentage points.
    pub min_volatility_pct: f64,
    pub max_volatility_pct: f64,
}

impl Default for BookConfig {
    fn default() -> Self {
        Self {
            position_count: 10,
            reference_price: 4500.0,
            strike_spread: 300.0,
            instruments: vec![
                InstrumentType::Call,
                InstrumentType::Put,
                InstrumentType::Future,
            ],
            min_quantity: 1.0,
            max_quantity: 50.0,
            min_volatility_pct: 8.0,
            max_volatility_pct: 45.0,
        }
    }
}

/// Generate a random book of valid positions.
///
/// Unsupported instrument types in the config are generated too, so the
/// result can exercise the engine's rejection path.
pub fn generate_random_book(config: &BookConfig) -> PositionBook {
    let mut rng = rand::thread_rng();
    let mut book = PositionBook::new();
    if config.instruments.is_empty() {
        return book;
    }

    for i in 0..config.position_count {
        let instrument = config.instruments[rng.gen_range(0..config.instruments.len())];
        let quantity = rng.gen_range(config.min_quantity..=config.max_quantity).round().max(1.0);
        let is_long = rng.gen_bool(0.5);
        let id = format!("POS-{:04}", i);

        let (strike, premium, volatility) = if instrument == InstrumentType::Future {
            (None, 0.0, 0.0)
        } else {
            let offset = rng.gen_range(-config.strike_spread..=config.strike_spread);
            let strike = (config.reference_price + offset).round().max(1.0);
            let volatility = rng.gen_range(config.min_volatility_pct..=config.max_volatility_pct);
            // Rough time value plus any intrinsic value.
            let intrinsic = match instrument {
                InstrumentType::Call => (config.reference_price - strike).max(0.0),
                InstrumentType::Put => (strike - config.reference_price).max(0.0),
                _ => 0.0,
            };
            let premium = (intrinsic + config.reference_price * volatility / 1000.0).round();
            (Some(strike), premium, volatility)
        };

        match Position::new(id, instrument, strike, premium, quantity, is_long, volatility) {
            Ok(position) => book.add(position),
            Err(e) => log::debug!("skipping generated position: {}", e),
        }
    }

    book
}
