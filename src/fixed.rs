//! Fixed-point encoding of secret numbers.
//!
//! The numeric precision is an explicit value passed to the engine when a computation starts,
//! there is no process-wide setting.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::Error;

/// The largest supported number of fractional bits.
pub const MAX_FRACTIONAL_BITS: u32 = 40;

/// How the low bits of a double-width product or quotient are discarded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rounding {
    /// Round to the nearest representable value (ties away from negative infinity).
    #[default]
    Nearest,
    /// Probabilistic truncation: round up with probability proportional to the discarded part.
    Probabilistic,
}

/// The fixed-point format used for all secret numbers of a computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixedPointConfig {
    /// Number of bits after the binary point.
    pub fractional_bits: u32,
    /// Rounding applied after multiplication and division.
    pub rounding: Rounding,
}

impl Default for FixedPointConfig {
    fn default() -> Self {
        Self {
            fractional_bits: 24,
            rounding: Rounding::Nearest,
        }
    }
}

impl FixedPointConfig {
    /// Checks that the configuration can be used by the engine.
    pub fn validate(&self) -> Result<(), Error> {
        if self.fractional_bits == 0 || self.fractional_bits > MAX_FRACTIONAL_BITS {
            return Err(Error::InvalidConfig(format!(
                "fractional bits must be between 1 and {MAX_FRACTIONAL_BITS}, found {}",
                self.fractional_bits
            )));
        }
        Ok(())
    }

    /// The encoding of `1.0`.
    pub fn one(&self) -> i64 {
        1 << self.fractional_bits
    }

    fn scale(&self) -> f64 {
        self.one() as f64
    }

    /// Encodes a private input, rejecting values that do not fit.
    pub fn encode(&self, value: f64) -> Result<i64, Error> {
        let scaled = (value * self.scale()).round();
        // 2^62 leaves one bit of headroom for sums of two encoded values
        if !scaled.is_finite() || scaled.abs() >= (1u64 << 62) as f64 {
            return Err(Error::ValueOutOfRange {
                value,
                fractional_bits: self.fractional_bits,
            });
        }
        Ok(scaled as i64)
    }

    /// Encodes a value computed inside the circuit, saturating instead of failing.
    ///
    /// `NaN` is encoded as zero.
    pub fn encode_saturating(&self, value: f64) -> i64 {
        (value * self.scale()).round() as i64
    }

    /// Decodes a fixed-point number.
    pub fn decode(&self, encoded: i64) -> f64 {
        encoded as f64 / self.scale()
    }

    /// The largest magnitude of a product or quotient before it saturates.
    pub fn max_magnitude(&self) -> f64 {
        self.decode(i64::MAX)
    }

    /// Multiplies two encoded numbers, saturating beyond [`Self::max_magnitude`].
    pub fn mul(&self, a: i64, b: i64, rng: &mut impl Rng) -> i64 {
        self.truncate(a as i128 * b as i128, rng)
    }

    /// Divides two encoded numbers, saturating beyond [`Self::max_magnitude`]. Division by zero
    /// yields zero instead of faulting.
    pub fn div(&self, a: i64, b: i64) -> i64 {
        if b == 0 {
            return 0;
        }
        let num = (a as i128) << self.fractional_bits;
        let den = b as i128;
        let mut quotient = num / den;
        let remainder = num % den;
        if 2 * remainder.abs() >= den.abs() {
            quotient += if (num < 0) == (den < 0) { 1 } else { -1 };
        }
        saturate(quotient)
    }

    fn truncate(&self, wide: i128, rng: &mut impl Rng) -> i64 {
        let f = self.fractional_bits;
        let offset = match self.rounding {
            Rounding::Nearest => 1i128 << (f - 1),
            Rounding::Probabilistic => rng.random_range(0..(1i128 << f)),
        };
        saturate((wide + offset) >> f)
    }
}

fn saturate(wide: i128) -> i64 {
    wide.clamp(i64::MIN.into(), i64::MAX.into()) as i64
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    use super::*;

    #[test]
    fn encode_decode_exact_for_dyadic_values() -> Result<(), Error> {
        let config = FixedPointConfig::default();
        for x in [0.0, 1.0, -1.0, 170.5, -123.25, 999.0] {
            assert_eq!(config.decode(config.encode(x)?), x);
        }
        Ok(())
    }

    #[test]
    fn rejects_unrepresentable_inputs() {
        let config = FixedPointConfig::default();
        assert!(config.encode(f64::NAN).is_err());
        assert!(config.encode(f64::INFINITY).is_err());
        assert!(config.encode(1e30).is_err());
    }

    #[test]
    fn validates_fractional_bits() {
        let mut config = FixedPointConfig::default();
        assert!(config.validate().is_ok());
        config.fractional_bits = 0;
        assert!(config.validate().is_err());
        config.fractional_bits = MAX_FRACTIONAL_BITS + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn nearest_rounding_mul_and_div() -> Result<(), Error> {
        let config = FixedPointConfig::default();
        let mut rng = ChaCha20Rng::seed_from_u64(0);
        let a = config.encode(1.5)?;
        let b = config.encode(-4.0)?;
        assert_eq!(config.decode(config.mul(a, b, &mut rng)), -6.0);
        assert_eq!(config.decode(config.div(b, config.encode(2.0)?)), -2.0);
        let third = config.decode(config.div(config.encode(1.0)?, config.encode(3.0)?));
        assert!((third - 1.0 / 3.0).abs() <= 1.0 / config.one() as f64);
        assert_eq!(config.div(a, 0), 0);
        Ok(())
    }

    #[test]
    fn overflowing_results_saturate() -> Result<(), Error> {
        let config = FixedPointConfig::default();
        let mut rng = ChaCha20Rng::seed_from_u64(0);
        let big = config.encode(1e6)?;
        let negative = config.encode(-1e6)?;
        assert_eq!(config.mul(big, big, &mut rng), i64::MAX);
        assert_eq!(config.mul(big, negative, &mut rng), i64::MIN);
        assert_eq!(config.div(big, 1), i64::MAX);
        assert_eq!(config.div(big, -1), i64::MIN);
        assert!(config.max_magnitude() > 5e11);

        let largest_exact = config.encode(7e5)?;
        let product = config.decode(config.mul(largest_exact, largest_exact, &mut rng));
        assert_eq!(product, 4.9e11);
        Ok(())
    }

    #[test]
    fn probabilistic_rounding_stays_within_one_ulp() -> Result<(), Error> {
        let config = FixedPointConfig {
            fractional_bits: 8,
            rounding: Rounding::Probabilistic,
        };
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        let a = config.encode(0.3)?;
        let b = config.encode(0.7)?;
        let exact = config.decode(a) * config.decode(b);
        for _ in 0..100 {
            let product = config.decode(config.mul(a, b, &mut rng));
            assert!((product - exact).abs() <= 1.0 / config.one() as f64);
        }
        Ok(())
    }
}
