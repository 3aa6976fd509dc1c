//! Fixed-point codec for canonical numeric values.
//!
//! Every number that takes part in a canonical ring tag (and therefore in a
//! cache key) is stored as a `Fixed`. Floating values are never serialized
//! directly, so two logically-equal chains compare bit-exactly.
//!
//! ## Encoding
//!
//! - Scale: [`Fixed::SCALE`] (six decimal places)
//! - Rounding: round-half-to-even on encode
//! - Decode: plain division by the scale
//!
//! `decode(encode(x))` is not always `x`, but re-encoding a decoded value
//! always yields the same integer, so round trips are stable.
//!
//! ```
//! use rust_spell::core::Fixed;
//!
//! let fixed = Fixed::from_f64(1.5);
//! assert_eq!(fixed.raw(), 1_500_000);
//! assert_eq!(fixed.to_f64(), 1.5);
//! assert_eq!(Fixed::from_f64(fixed.to_f64()), fixed);
//! ```

use serde::{Deserialize, Serialize};

/// A decimal value encoded as a scaled integer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fixed(pub i64);

impl Fixed {
    /// Number of integer units per 1.0.
    pub const SCALE: i64 = 1_000_000;

    /// Zero.
    pub const ZERO: Fixed = Fixed(0);

    /// One.
    pub const ONE: Fixed = Fixed(Self::SCALE);

    /// Wrap an already-encoded integer.
    #[must_use]
    pub const fn from_raw(raw: i64) -> Self {
        Self(raw)
    }

    /// Get the encoded integer.
    #[must_use]
    pub const fn raw(self) -> i64 {
        self.0
    }

    /// Encode a floating value.
    ///
    /// NaN encodes to zero; values outside the representable range saturate.
    #[must_use]
    pub fn from_f64(value: f64) -> Self {
        if value.is_nan() {
            return Self::ZERO;
        }
        Self(round_scaled(value * Self::SCALE as f64))
    }

    /// Decode to a floating value.
    #[must_use]
    pub fn to_f64(self) -> f64 {
        self.0 as f64 / Self::SCALE as f64
    }

    /// Encode then decode, producing the canonical floating view of `value`.
    #[must_use]
    pub fn normalize(value: f64) -> f64 {
        Self::from_f64(value).to_f64()
    }
}

// `as` saturates at the i64 bounds.
fn round_scaled(scaled: f64) -> i64 {
    scaled.round_ties_even() as i64
}

impl From<f64> for Fixed {
    fn from(value: f64) -> Self {
        Self::from_f64(value)
    }
}

impl From<Fixed> for f64 {
    fn from(value: Fixed) -> Self {
        value.to_f64()
    }
}

impl std::fmt::Display for Fixed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_f64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_decode() {
        assert_eq!(Fixed::from_f64(0.0), Fixed::ZERO);
        assert_eq!(Fixed::from_f64(1.0), Fixed::ONE);
        assert_eq!(Fixed::from_f64(-2.25).raw(), -2_250_000);
        assert_eq!(Fixed::from_raw(3_500_000).to_f64(), 3.5);
    }

    #[test]
    fn test_round_half_to_even() {
        assert_eq!(round_scaled(0.5), 0);
        assert_eq!(round_scaled(1.5), 2);
        assert_eq!(round_scaled(2.5), 2);
        assert_eq!(round_scaled(-2.5), -2);
        assert_eq!(round_scaled(2.5000001), 3);
    }

    #[test]
    fn test_sub_resolution_values_collapse() {
        assert_eq!(Fixed::from_f64(0.1234564), Fixed::from_f64(0.1234558));
    }

    #[test]
    fn test_non_finite() {
        assert_eq!(Fixed::from_f64(f64::NAN), Fixed::ZERO);
        assert_eq!(Fixed::from_f64(f64::INFINITY).raw(), i64::MAX);
        assert_eq!(Fixed::from_f64(f64::NEG_INFINITY).raw(), i64::MIN);
    }

    #[test]
    fn test_normalize_is_stable() {
        for value in [0.1, 1.0 / 3.0, 2.675, -7.0000004, 12345.678901] {
            let once = Fixed::normalize(value);
            let twice = Fixed::normalize(once);
            assert_eq!(once, twice, "value {value}");
        }
    }

    #[test]
    fn test_serializes_as_integer() {
        let json = serde_json::to_string(&Fixed::from_f64(2.5)).unwrap();
        assert_eq!(json, "2500000");
        let back: Fixed = serde_json::from_str(&json).unwrap();
        assert_eq!(back.to_f64(), 2.5);
    }
}
