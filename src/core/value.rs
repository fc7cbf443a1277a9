//! Numeric domain of the interpreter.
//!
//! A value is an integer unless an operation forces it elsewhere: real
//! division yields a [`Value::Real`], or an exact [`Value::Ratio`] when exact
//! fractions are enabled. Integer arithmetic never wraps; on `i64` overflow
//! the result is carried as a real instead.

use std::cmp::Ordering;
use std::fmt;

use num_rational::Rational64;
use num_traits::{CheckedAdd, CheckedDiv, CheckedMul, CheckedSub, Zero};

/// A numeric stack or cell value.
#[derive(Debug, Clone, Copy)]
pub enum Value {
    Int(i64),
    Real(f64),
    Ratio(Rational64),
}

/// Operands promoted to a common representation.
enum Operands {
    Ints(i64, i64),
    Ratios(Rational64, Rational64),
    Reals(f64, f64),
}

impl Value {
    pub const ZERO: Value = Value::Int(0);
    pub const ONE: Value = Value::Int(1);
    /// Pushed by `i` once the input queue is exhausted.
    pub const END_OF_INPUT: Value = Value::Int(-1);

    /// Boolean result as `1` or `0`.
    pub fn from_bool(b: bool) -> Self {
        Value::Int(i64::from(b))
    }

    /// Collapse to an integer when the value is numerically exact.
    ///
    /// Reals without a fractional part (and within `i64` range) and ratios
    /// with a unit denominator become [`Value::Int`].
    pub fn normalize(self) -> Self {
        match self {
            Value::Real(r) if r.is_finite() && r.fract() == 0.0 && fits_i64(r) => {
                Value::Int(r as i64)
            }
            Value::Ratio(q) if q.is_integer() => Value::Int(q.to_integer()),
            other => other,
        }
    }

    /// Lossy conversion to a float.
    pub fn to_f64(self) -> f64 {
        match self {
            Value::Int(i) => i as f64,
            Value::Real(r) => r,
            Value::Ratio(q) => ratio_to_f64(q),
        }
    }

    pub fn is_zero(&self) -> bool {
        match *self {
            Value::Int(i) => i == 0,
            Value::Real(r) => r == 0.0,
            Value::Ratio(q) => q.is_zero(),
        }
    }

    pub fn is_integer(&self) -> bool {
        matches!(self.normalize(), Value::Int(_))
    }

    fn promote(self, rhs: Value) -> Operands {
        match (self, rhs) {
            (Value::Int(a), Value::Int(b)) => Operands::Ints(a, b),
            (Value::Real(_), _) | (_, Value::Real(_)) => Operands::Reals(self.to_f64(), rhs.to_f64()),
            (Value::Int(a), Value::Ratio(b)) => Operands::Ratios(Rational64::from_integer(a), b),
            (Value::Ratio(a), Value::Int(b)) => Operands::Ratios(a, Rational64::from_integer(b)),
            (Value::Ratio(a), Value::Ratio(b)) => Operands::Ratios(a, b),
        }
    }

    pub fn add(self, rhs: Value) -> Value {
        match self.promote(rhs) {
            Operands::Ints(a, b) => a.checked_add(b).map(Value::Int)
                .unwrap_or_else(|| Value::Real(a as f64 + b as f64)),
            Operands::Ratios(a, b) => a.checked_add(&b).map(Value::Ratio)
                .unwrap_or_else(|| Value::Real(ratio_to_f64(a) + ratio_to_f64(b))),
            Operands::Reals(a, b) => Value::Real(a + b),
        }
        .normalize()
    }

    pub fn sub(self, rhs: Value) -> Value {
        match self.promote(rhs) {
            Operands::Ints(a, b) => a.checked_sub(b).map(Value::Int)
                .unwrap_or_else(|| Value::Real(a as f64 - b as f64)),
            Operands::Ratios(a, b) => a.checked_sub(&b).map(Value::Ratio)
                .unwrap_or_else(|| Value::Real(ratio_to_f64(a) - ratio_to_f64(b))),
            Operands::Reals(a, b) => Value::Real(a - b),
        }
        .normalize()
    }

    pub fn mul(self, rhs: Value) -> Value {
        match self.promote(rhs) {
            Operands::Ints(a, b) => a.checked_mul(b).map(Value::Int)
                .unwrap_or_else(|| Value::Real(a as f64 * b as f64)),
            Operands::Ratios(a, b) => a.checked_mul(&b).map(Value::Ratio)
                .unwrap_or_else(|| Value::Real(ratio_to_f64(a) * ratio_to_f64(b))),
            Operands::Reals(a, b) => Value::Real(a * b),
        }
        .normalize()
    }

    /// Division. Returns `None` when the divisor is zero.
    ///
    /// Two integers divide to a real, or to an exact ratio when `exact` is set.
    pub fn div(self, rhs: Value, exact: bool) -> Option<Value> {
        if rhs.is_zero() {
            return None;
        }
        let quotient = match self.promote(rhs) {
            Operands::Ints(a, b) if exact => Rational64::from_integer(a)
                .checked_div(&Rational64::from_integer(b))
                .map(Value::Ratio)
                .unwrap_or_else(|| Value::Real(a as f64 / b as f64)),
            Operands::Ints(a, b) => Value::Real(a as f64 / b as f64),
            Operands::Ratios(a, b) => a.checked_div(&b).map(Value::Ratio)
                .unwrap_or_else(|| Value::Real(ratio_to_f64(a) / ratio_to_f64(b))),
            Operands::Reals(a, b) => Value::Real(a / b),
        };
        Some(quotient.normalize())
    }

    /// Floored modulo: the result takes the sign of the divisor.
    /// Returns `None` when the divisor is zero.
    pub fn rem(self, rhs: Value) -> Option<Value> {
        if rhs.is_zero() {
            return None;
        }
        let remainder = match self.promote(rhs) {
            Operands::Ints(a, b) => {
                let r = a.wrapping_rem(b);
                Value::Int(if r != 0 && (r < 0) != (b < 0) { r + b } else { r })
            }
            Operands::Ratios(a, b) => ratio_rem(a, b).map(Value::Ratio)
                .unwrap_or_else(|| Value::Real(float_rem(ratio_to_f64(a), ratio_to_f64(b)))),
            Operands::Reals(a, b) => Value::Real(float_rem(a, b)),
        };
        Some(remainder.normalize())
    }

    /// Numeric comparison across representations. `None` only involves NaN.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match self.promote(*other) {
            Operands::Ints(a, b) => Some(a.cmp(&b)),
            Operands::Ratios(a, b) => Some(a.cmp(&b)),
            Operands::Reals(a, b) => a.partial_cmp(&b),
        }
    }
}

fn fits_i64(r: f64) -> bool {
    // i64::MAX as f64 rounds up to 2^63, which is itself out of range.
    r >= i64::MIN as f64 && r < i64::MAX as f64
}

fn ratio_to_f64(q: Rational64) -> f64 {
    *q.numer() as f64 / *q.denom() as f64
}

fn ratio_rem(a: Rational64, b: Rational64) -> Option<Rational64> {
    let quotient = a.checked_div(&b)?.floor();
    a.checked_sub(&b.checked_mul(&quotient)?)
}

fn float_rem(a: f64, b: f64) -> f64 {
    let r = a % b;
    if r != 0.0 && (r < 0.0) != (b < 0.0) {
        r + b
    } else {
        r
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::ZERO
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.compare(other) == Some(Ordering::Equal)
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.compare(other)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{}", i),
            Value::Real(r) => write_real(f, *r),
            Value::Ratio(q) => write!(f, "{}/{}", q.numer(), q.denom()),
        }
    }
}

/// Shortest round-trip digits, in exponent form (`1e-07`, `1.5e+22`)
/// outside `1e-4 <= |r| < 1e16`. Integral values keep a `.0`.
fn write_real(f: &mut fmt::Formatter<'_>, r: f64) -> fmt::Result {
    if r.is_nan() {
        return f.write_str("nan");
    }
    if r.is_infinite() {
        return f.write_str(if r > 0.0 { "inf" } else { "-inf" });
    }
    let scientific = format!("{:e}", r);
    let Some((mantissa, exp)) = scientific.split_once('e') else {
        return f.write_str(&scientific);
    };
    let exp: i32 = exp.parse().unwrap_or(0);
    if r != 0.0 && !(-4..16).contains(&exp) {
        let sign = if exp < 0 { '-' } else { '+' };
        write!(f, "{}e{}{:02}", mantissa, sign, exp.unsigned_abs())
    } else if r.fract() == 0.0 {
        write!(f, "{:.1}", r)
    } else {
        write!(f, "{}", r)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(r: f64) -> Self {
        Value::Real(r).normalize()
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::from_bool(b)
    }
}

impl From<char> for Value {
    fn from(c: char) -> Self {
        Value::Int(c as i64)
    }
}

impl From<Rational64> for Value {
    fn from(q: Rational64) -> Self {
        Value::Ratio(q).normalize()
    }
}
