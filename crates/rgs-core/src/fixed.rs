//! Fixed-point decimal arithmetic
//!
//! All money and multiplier math in the engine runs through [`Fixed`], an
//! i64 scaled by 10^6. Floats are display-only; they never feed back into a
//! calculation. Multiplication and division rescale through a widening i128
//! intermediate so large stake × multiplier products cannot truncate.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Implicit decimal scale: six fractional digits.
const SCALE: i64 = 1_000_000;

/// Fixed-point decimal with six fractional digits.
///
/// The internal representation is the value multiplied by 10^6. Every
/// operation preserves that scale exactly; there is no float path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Fixed(i64);

impl Fixed {
    pub const ZERO: Fixed = Fixed(0);
    pub const ONE: Fixed = Fixed(SCALE);

    /// Build from a whole number.
    pub const fn from_int(v: i64) -> Self {
        Fixed(v * SCALE)
    }

    /// Build from a raw scaled value (v × 10^6 units).
    pub const fn from_raw(raw: i64) -> Self {
        Fixed(raw)
    }

    /// The raw scaled value.
    pub const fn raw(self) -> i64 {
        self.0
    }

    /// Truncate to a whole number (toward zero).
    pub const fn as_int(self) -> i64 {
        self.0 / SCALE
    }

    /// Display-only float conversion. Never feed the result back into a
    /// calculation.
    pub fn to_f64(self) -> f64 {
        self.0 as f64 / SCALE as f64
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub const fn abs(self) -> Self {
        Fixed(self.0.abs())
    }

    /// `a × b`, rescaled through an i128 intermediate.
    pub fn mul(self, rhs: Fixed) -> Fixed {
        Fixed(((self.0 as i128 * rhs.0 as i128) / SCALE as i128) as i64)
    }

    /// `a ÷ b`, rescaled through an i128 intermediate. `None` when `rhs`
    /// is zero; a zero divisor is a configuration bug, not a player error.
    pub fn checked_div(self, rhs: Fixed) -> Option<Fixed> {
        if rhs.0 == 0 {
            return None;
        }
        Some(Fixed(((self.0 as i128 * SCALE as i128) / rhs.0 as i128) as i64))
    }

    /// Divide by a whole number, truncating.
    pub fn div_int(self, n: i64) -> Option<Fixed> {
        if n == 0 {
            return None;
        }
        Some(Fixed(self.0 / n))
    }

    /// Divide by a whole number, rounding away from zero. Used for prices
    /// that must not undercut the exact expected value.
    pub fn div_int_ceil(self, n: i64) -> Option<Fixed> {
        if n == 0 {
            return None;
        }
        let q = self.0 / n;
        let r = self.0 % n;
        if r != 0 && (r < 0) == (n < 0) {
            Some(Fixed(q + 1))
        } else {
            Some(Fixed(q))
        }
    }

    /// Repeated multiplication; `pow(0)` is 1.
    pub fn pow(self, n: u32) -> Fixed {
        let mut acc = Fixed::ONE;
        for _ in 0..n {
            acc = acc.mul(self);
        }
        acc
    }

    pub fn min(self, rhs: Fixed) -> Fixed {
        Fixed(self.0.min(rhs.0))
    }

    pub fn max(self, rhs: Fixed) -> Fixed {
        Fixed(self.0.max(rhs.0))
    }

    /// Canonical full-precision decimal string, trailing zeros trimmed.
    /// Always round-trips exactly through [`FromStr`].
    fn to_canonical_string(self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let int = abs / SCALE as u64;
        let frac = abs % SCALE as u64;
        if frac == 0 {
            format!("{sign}{int}")
        } else {
            let frac = format!("{frac:06}");
            format!("{sign}{int}.{}", frac.trim_end_matches('0'))
        }
    }
}

impl Add for Fixed {
    type Output = Fixed;
    fn add(self, rhs: Fixed) -> Fixed {
        Fixed(self.0 + rhs.0)
    }
}

impl AddAssign for Fixed {
    fn add_assign(&mut self, rhs: Fixed) {
        self.0 += rhs.0;
    }
}

impl Sub for Fixed {
    type Output = Fixed;
    fn sub(self, rhs: Fixed) -> Fixed {
        Fixed(self.0 - rhs.0)
    }
}

impl SubAssign for Fixed {
    fn sub_assign(&mut self, rhs: Fixed) {
        self.0 -= rhs.0;
    }
}

impl Neg for Fixed {
    type Output = Fixed;
    fn neg(self) -> Fixed {
        Fixed(-self.0)
    }
}

impl Sum for Fixed {
    fn sum<I: Iterator<Item = Fixed>>(iter: I) -> Fixed {
        iter.fold(Fixed::ZERO, |a, b| a + b)
    }
}

impl From<i64> for Fixed {
    fn from(v: i64) -> Self {
        Fixed::from_int(v)
    }
}

/// Display shows exactly three decimal digits, the regulatory reporting
/// format. Use serde or [`FromStr`] round-trips for full precision.
impl fmt::Display for Fixed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:03}", abs / SCALE as u64, (abs % SCALE as u64) / 1_000)
    }
}

/// Error parsing a decimal literal into [`Fixed`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid fixed-point literal: {0}")]
pub struct ParseFixedError(String);

impl FromStr for Fixed {
    type Err = ParseFixedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseFixedError(s.to_string());
        let (neg, body) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };
        let (int_part, frac_part) = match body.split_once('.') {
            Some((i, f)) => (i, f),
            None => (body, ""),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(err());
        }
        if frac_part.len() > 6 {
            return Err(err());
        }
        let int: i64 = if int_part.is_empty() {
            0
        } else {
            int_part.parse().map_err(|_| err())?
        };
        let mut frac: i64 = 0;
        if !frac_part.is_empty() {
            let digits: i64 = frac_part.parse().map_err(|_| err())?;
            frac = digits * 10i64.pow(6 - frac_part.len() as u32);
        }
        let raw = int * SCALE + frac;
        Ok(Fixed(if neg { -raw } else { raw }))
    }
}

impl Serialize for Fixed {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_canonical_string())
    }
}

struct FixedVisitor;

impl Visitor<'_> for FixedVisitor {
    type Value = Fixed;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a decimal number or string")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Fixed, E> {
        Ok(Fixed::from_int(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Fixed, E> {
        Ok(Fixed::from_int(v as i64))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Fixed, E> {
        // Config-input convenience only; the canonical wire form is the
        // string produced by Serialize.
        Ok(Fixed::from_raw((v * SCALE as f64).round() as i64))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Fixed, E> {
        v.parse().map_err(de::Error::custom)
    }
}

impl<'de> Deserialize<'de> for Fixed {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Fixed, D::Error> {
        deserializer.deserialize_any(FixedVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_round_trip() {
        for v in [-3, 0, 1, 42, 1_000_000] {
            assert_eq!(Fixed::from_int(v).as_int(), v);
        }
    }

    #[test]
    fn test_mul_rescales() {
        let half = Fixed::from_raw(500_000);
        assert_eq!(Fixed::from_int(10).mul(half), Fixed::from_int(5));
        assert_eq!(half.mul(half), Fixed::from_raw(250_000));
    }

    #[test]
    fn test_mul_div_inverse() {
        let a = Fixed::from_int(1234);
        let b = Fixed::from_raw(2_500_000);
        assert_eq!(a.mul(b).checked_div(b), Some(a));
    }

    #[test]
    fn test_mul_widening_no_truncation() {
        // stake 1,000,000.000000 × multiplier 500,000 would overflow a
        // 64-bit intermediate; the i128 path must survive it.
        let stake = Fixed::from_int(1_000_000);
        let mult = Fixed::from_int(500_000);
        assert_eq!(stake.mul(mult), Fixed::from_int(500_000_000_000));
    }

    #[test]
    fn test_div_by_zero() {
        assert_eq!(Fixed::ONE.checked_div(Fixed::ZERO), None);
        assert_eq!(Fixed::ONE.div_int(0), None);
    }

    #[test]
    fn test_div_int_ceil() {
        let v = Fixed::from_raw(10);
        assert_eq!(v.div_int_ceil(3), Some(Fixed::from_raw(4)));
        assert_eq!(Fixed::from_raw(9).div_int_ceil(3), Some(Fixed::from_raw(3)));
    }

    #[test]
    fn test_pow() {
        let two = Fixed::from_int(2);
        assert_eq!(two.pow(0), Fixed::ONE);
        assert_eq!(two.pow(10), Fixed::from_int(1024));
        let half = Fixed::from_raw(500_000);
        assert_eq!(half.pow(2), Fixed::from_raw(250_000));
    }

    #[test]
    fn test_display_three_digits() {
        assert_eq!(Fixed::from_int(5).to_string(), "5.000");
        assert_eq!(Fixed::from_raw(1_500_000).to_string(), "1.500");
        assert_eq!(Fixed::from_raw(-2_345_678).to_string(), "-2.345");
    }

    #[test]
    fn test_parse() {
        assert_eq!("10".parse::<Fixed>().unwrap(), Fixed::from_int(10));
        assert_eq!("2.5".parse::<Fixed>().unwrap(), Fixed::from_raw(2_500_000));
        assert_eq!("-0.000001".parse::<Fixed>().unwrap(), Fixed::from_raw(-1));
        assert!("1.2345678".parse::<Fixed>().is_err());
        assert!("abc".parse::<Fixed>().is_err());
    }

    #[test]
    fn test_canonical_string_round_trip() {
        for raw in [0, 1, -1, 2_500_000, 123_456_789, -42_000_000] {
            let v = Fixed::from_raw(raw);
            let s = v.to_canonical_string();
            assert_eq!(s.parse::<Fixed>().unwrap(), v, "via {s}");
        }
    }
}
