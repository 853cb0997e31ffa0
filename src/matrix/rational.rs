//! Exact rational scalar
//!
//! Thin newtype over `BigRational` so that entries are always reduced, keep a
//! positive denominator and can never overflow or round. It also carries the
//! textual forms the rest of the crate needs: `p/q` for display and JSON, and
//! the decimal/fraction cell syntax accepted from input.

use crate::error::{ReduceError, Result};
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};
use std::str::FromStr;

/// An exact fraction, always in lowest terms with a positive denominator
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Rational(BigRational);

impl Rational {
    pub fn zero() -> Self {
        Self(BigRational::zero())
    }

    pub fn one() -> Self {
        Self(BigRational::one())
    }

    pub fn from_integer(n: i64) -> Self {
        Self(BigRational::from_integer(BigInt::from(n)))
    }

    /// Build `numer / denom`, reducing to lowest terms
    ///
    /// Panics if `denom` is zero.
    pub fn new(numer: i64, denom: i64) -> Self {
        assert!(denom != 0, "contract violation: rational with zero denominator");
        Self(BigRational::new(BigInt::from(numer), BigInt::from(denom)))
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_one(&self) -> bool {
        self.0.is_one()
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_negative()
    }

    pub fn is_integer(&self) -> bool {
        self.0.is_integer()
    }

    pub fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// Multiplicative inverse
    ///
    /// Panics on zero: callers only invert values already proven nonzero.
    pub fn recip(&self) -> Self {
        assert!(!self.is_zero(), "contract violation: reciprocal of zero");
        Self(self.0.recip())
    }

    pub fn numer(&self) -> &BigInt {
        self.0.numer()
    }

    pub fn denom(&self) -> &BigInt {
        self.0.denom()
    }

    /// Nearest `f64`, lossy
    pub fn to_f64(&self) -> f64 {
        self.0.to_f64().unwrap_or(f64::NAN)
    }

    pub fn as_big(&self) -> &BigRational {
        &self.0
    }
}

impl Default for Rational {
    fn default() -> Self {
        Self::zero()
    }
}

impl From<i64> for Rational {
    fn from(n: i64) -> Self {
        Self::from_integer(n)
    }
}

impl From<BigRational> for Rational {
    fn from(r: BigRational) -> Self {
        Self(r)
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = if self.is_integer() {
            self.numer().to_string()
        } else {
            format!("{}/{}", self.numer(), self.denom())
        };
        f.pad(&text)
    }
}

fn parse_error(input: &str, reason: &str) -> ReduceError {
    ReduceError::ParseRational {
        input: input.to_string(),
        reason: reason.to_string(),
    }
}

/// Strip an optional sign, returning (negative, rest)
fn split_sign(s: &str) -> (bool, &str) {
    if let Some(rest) = s.strip_prefix('-') {
        (true, rest)
    } else if let Some(rest) = s.strip_prefix('+') {
        (false, rest)
    } else {
        (false, s)
    }
}

fn parse_digits(input: &str, digits: &str) -> Result<BigInt> {
    if digits.is_empty() {
        return Ok(BigInt::zero());
    }
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(parse_error(input, "unexpected character"));
    }
    BigInt::parse_bytes(digits.as_bytes(), 10).ok_or_else(|| parse_error(input, "invalid digits"))
}

fn parse_signed_integer(input: &str, s: &str) -> Result<BigInt> {
    let (negative, digits) = split_sign(s.trim());
    if digits.is_empty() {
        return Err(parse_error(input, "missing digits"));
    }
    let value = parse_digits(input, digits)?;
    Ok(if negative { -value } else { value })
}

impl FromStr for Rational {
    type Err = ReduceError;

    /// Accepts `7`, `-7`, `+7`, decimals such as `-1.25`, `.5` or `3.`, and
    /// fractions `p/q`. Decimals are converted exactly (`0.1` is `1/10`).
    fn from_str(s: &str) -> Result<Self> {
        let input = s.trim();
        if input.is_empty() {
            return Err(parse_error(s, "empty input"));
        }

        if let Some((numer, denom)) = input.split_once('/') {
            let numer = parse_signed_integer(input, numer)?;
            let denom = parse_signed_integer(input, denom)?;
            if denom.is_zero() {
                return Err(parse_error(input, "zero denominator"));
            }
            return Ok(Self(BigRational::new(numer, denom)));
        }

        let (negative, body) = split_sign(input);
        let (whole, frac) = body.split_once('.').unwrap_or((body, ""));
        if whole.is_empty() && frac.is_empty() {
            return Err(parse_error(input, "missing digits"));
        }
        let whole = parse_digits(input, whole)?;
        let frac_value = parse_digits(input, frac)?;
        let scale = num_traits::pow(BigInt::from(10u32), frac.len());
        let numer = whole * &scale + frac_value;
        let numer = if negative { -numer } else { numer };
        Ok(Self(BigRational::new(numer, scale)))
    }
}

impl Serialize for Rational {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

struct RationalVisitor;

impl<'de> Visitor<'de> for RationalVisitor {
    type Value = Rational;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an integer, a decimal, or a string such as \"3/4\"")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<Rational, E> {
        Ok(Rational::from_integer(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Rational, E> {
        Ok(Rational(BigRational::from_integer(BigInt::from(v))))
    }

    // The shortest round-trip decimal is taken as the intended value, so
    // `0.1` reads as 1/10 rather than the nearest binary fraction.
    fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<Rational, E> {
        if !v.is_finite() {
            return Err(E::custom("non-finite number"));
        }
        v.to_string().parse().map_err(E::custom)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Rational, E> {
        v.parse().map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for Rational {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_any(RationalVisitor)
    }
}

macro_rules! forward_binop {
    ($trait:ident, $method:ident) => {
        impl $trait<&Rational> for &Rational {
            type Output = Rational;
            fn $method(self, rhs: &Rational) -> Rational {
                Rational((&self.0).$method(&rhs.0))
            }
        }

        impl $trait for Rational {
            type Output = Rational;
            fn $method(self, rhs: Rational) -> Rational {
                Rational(self.0.$method(rhs.0))
            }
        }
    };
}

forward_binop!(Add, add);
forward_binop!(Sub, sub);
forward_binop!(Mul, mul);

impl Div<&Rational> for &Rational {
    type Output = Rational;
    fn div(self, rhs: &Rational) -> Rational {
        assert!(!rhs.is_zero(), "contract violation: division by zero");
        Rational(&self.0 / &rhs.0)
    }
}

impl Div for Rational {
    type Output = Rational;
    fn div(self, rhs: Rational) -> Rational {
        &self / &rhs
    }
}

impl Neg for Rational {
    type Output = Rational;
    fn neg(self) -> Rational {
        Rational(-self.0)
    }
}

impl Neg for &Rational {
    type Output = Rational;
    fn neg(self) -> Rational {
        Rational(-&self.0)
    }
}
