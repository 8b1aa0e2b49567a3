//! Relative-likelihood weights for scenario points.
//!
//! The weight is the standard normal density evaluated at the offset
//! expressed in standard deviations. It is NOT normalized over the sampled
//! grid: the weights of a curve do not sum to 1 and must be read as
//! relative likelihoods only.

use std::f64::consts::PI;

/// Assumed one-sigma move of the underlying, in price units.
pub const STD_DEV: f64 = 50.0;

/// Density weight for a price `offset` away from the reference price.
///
/// Peaks at `1 / sqrt(2 * pi)` for a zero offset and is symmetric in the
/// sign of the offset.
pub fn relative_likelihood(offset: f64) -> f64 {
    let z = offset / STD_DEV;
    (1.0 / (2.0 * PI).sqrt()) * (-0.5 * z * z).exp()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_peak_at_zero() {
        assert_relative_eq!(relative_likelihood(0.0), 0.398_942_280_401_432_7, epsilon = 1e-15);
    }

    #[test]
    fn test_symmetric() {
        for offset in [5.0, 50.0, 73.0, 150.0] {
            assert_eq!(relative_likelihood(offset), relative_likelihood(-offset));
        }
    }

    #[test]
    fn test_one_sigma() {
        let expected = 0.398_942_280_401_432_7 * (-0.5f64).exp();
        assert_relative_eq!(relative_likelihood(STD_DEV), expected, epsilon = 1e-15);
    }

    #[test]
    fn test_decreases_away_from_center() {
        let mut previous = relative_likelihood(0.0);
        for step in 1..=30 {
            let current = relative_likelihood(step as f64 * 5.0);
            assert!(current < previous);
            previous = current;
        }
    }
}
