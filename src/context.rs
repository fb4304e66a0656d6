// Copyright Materialize, Inc. All rights reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository, or online at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::cell::RefCell;
use std::cmp::Ordering;

use crate::arith;
use crate::bignum::{BigNum, MAX_PRECISION};
use crate::cache::{Constants, Pool, Scratch};
use crate::error::{Error, InvalidPrecisionError, ParseBigNumError};
use crate::format;
use crate::transcend;

/// The precision used by a [`Context`] constructed via `Default`.
pub const DEFAULT_PRECISION: u16 = 32;

/// A context for performing operations on [`BigNum`]s.
///
/// Contexts serve two purposes:
///
///   * They configure the precision at which parsed values and computed
///     constants are produced.
///
///   * They own the working storage that multi-step computations need: a
///     pool of temporary registers, reused across operations, and lazily
///     computed cached constants (π, e, ln 2, ln 10).
///
/// Operations on values go through a context: `cx.add(&a, &b)`,
/// `cx.sin(&x)`, and so on. Arithmetic results carry the precision of
/// the wider operand; transcendental results carry their operand's
/// precision. Operations return `Err` for conditions like division by
/// zero or domain violations; the operator sugar on `BigNum` itself maps
/// those errors to NaN instead.
#[derive(Debug)]
pub struct Context {
    precision: u16,
    pub(crate) pool: RefCell<Pool>,
    pub(crate) consts: RefCell<Constants>,
}

impl Default for Context {
    fn default() -> Context {
        Context {
            precision: DEFAULT_PRECISION,
            pool: RefCell::new(Pool::default()),
            consts: RefCell::new(Constants::default()),
        }
    }
}

impl Context {
    /// Constructs a context with the given precision for arithmetic
    /// results, parsed values, and constants.
    pub fn with_precision(precision: u16) -> Result<Context, InvalidPrecisionError> {
        if precision < 1 || precision > MAX_PRECISION {
            return Err(InvalidPrecisionError);
        }
        Ok(Context {
            precision,
            ..Default::default()
        })
    }

    /// Returns the context's precision.
    pub fn precision(&self) -> u16 {
        self.precision
    }

    pub(crate) fn scratch(&self, prec: u16) -> Result<Scratch, Error> {
        Scratch::acquire(&self.pool, prec)
    }

    // The context's precision is a floor for arithmetic results; wider
    // operands widen the result past it.
    fn result_precision(&self, a: &BigNum, b: &BigNum) -> u16 {
        self.precision.max(a.precision()).max(b.precision())
    }

    // -----------------------------------------------------------------------
    // Parsing

    /// Parses a decimal numeric string.
    ///
    /// The result's precision is inferred from the string: one digit per
    /// significant digit in the input, with a minimum of one.
    pub fn parse<S>(&self, s: S) -> Result<BigNum, ParseBigNumError>
    where
        S: AsRef<str>,
    {
        format::parse_decimal(s.as_ref(), None)
    }

    /// Parses a decimal numeric string into a value of the given precision.
    pub fn parse_with_precision<S>(
        &self,
        s: S,
        precision: u16,
    ) -> Result<BigNum, ParseBigNumError>
    where
        S: AsRef<str>,
    {
        format::parse_decimal(s.as_ref(), Some(precision))
    }

    /// Parses an integer string in the given radix, 2 through 36.
    ///
    /// With `radix` of `None` the radix is inferred from the prefix:
    /// `0x` for hexadecimal, a leading `0` for octal, and decimal
    /// otherwise. Decimal strings may carry a fractional part and an
    /// exponent; other radices are whole numbers only.
    pub fn parse_radix<S>(&self, s: S, radix: Option<u32>) -> Result<BigNum, ParseBigNumError>
    where
        S: AsRef<str>,
    {
        format::parse_radix(s.as_ref(), radix)
    }

    /// Returns a copy of `x` carried at the given precision.
    ///
    /// Widening pads with zero digits; narrowing rounds half to even at
    /// the new final digit. NaNs and infinities keep their payload.
    pub fn with_digits(&self, x: &BigNum, precision: u16) -> Result<BigNum, InvalidPrecisionError> {
        if precision < 1 || precision > MAX_PRECISION {
            return Err(InvalidPrecisionError);
        }
        let mut dst = BigNum::with_prec(precision);
        dst.copy_from(x, true);
        Ok(dst)
    }

    // -----------------------------------------------------------------------
    // Basic arithmetic

    /// Adds `a` and `b`.
    pub fn add(&self, a: &BigNum, b: &BigNum) -> Result<BigNum, Error> {
        let prec = self.result_precision(a, b);
        if a.is_nan() || b.is_nan() {
            return Ok(BigNum::nan(prec));
        }
        match (a.is_infinite(), b.is_infinite()) {
            (true, true) => {
                // infinities of opposite signs cancel to nothing definite
                if a.is_negative() == b.is_negative() {
                    Ok(BigNum::infinity(a.is_negative()))
                } else {
                    Ok(BigNum::nan(prec))
                }
            }
            (true, false) => Ok(BigNum::infinity(a.is_negative())),
            (false, true) => Ok(BigNum::infinity(b.is_negative())),
            (false, false) => {
                let mut dst = BigNum::with_prec(prec);
                arith::sum_into(&mut dst, a, b)?;
                Ok(dst)
            }
        }
    }

    /// Subtracts `b` from `a`.
    pub fn sub(&self, a: &BigNum, b: &BigNum) -> Result<BigNum, Error> {
        let prec = self.result_precision(a, b);
        if a.is_nan() || b.is_nan() {
            return Ok(BigNum::nan(prec));
        }
        match (a.is_infinite(), b.is_infinite()) {
            (true, true) => {
                if a.is_negative() == b.is_negative() {
                    Ok(BigNum::nan(prec))
                } else {
                    Ok(BigNum::infinity(a.is_negative()))
                }
            }
            (true, false) => Ok(BigNum::infinity(a.is_negative())),
            (false, true) => Ok(BigNum::infinity(!b.is_negative())),
            (false, false) => {
                let mut dst = BigNum::with_prec(prec);
                arith::diff_into(&mut dst, a, b)?;
                Ok(dst)
            }
        }
    }

    /// Multiplies `a` and `b`.
    pub fn mul(&self, a: &BigNum, b: &BigNum) -> Result<BigNum, Error> {
        let prec = self.result_precision(a, b);
        if a.is_nan() || b.is_nan() {
            return Ok(BigNum::nan(prec));
        }
        if a.is_infinite() || b.is_infinite() {
            // infinity times zero is indeterminate
            if a.is_zero() || b.is_zero() {
                return Ok(BigNum::nan(prec));
            }
            return Ok(BigNum::infinity(a.is_negative() != b.is_negative()));
        }
        let mut dst = BigNum::with_prec(prec);
        arith::prod_into(&mut dst, a, b)?;
        Ok(dst)
    }

    /// Divides `a` by `b`, rounding the quotient to the result precision.
    pub fn div(&self, a: &BigNum, b: &BigNum) -> Result<BigNum, Error> {
        let prec = self.result_precision(a, b);
        if a.is_nan() || b.is_nan() {
            return Ok(BigNum::nan(prec));
        }
        if b.is_finite() && b.is_zero() {
            return Err(Error::DivideByZero);
        }
        match (a.is_infinite(), b.is_infinite()) {
            (true, true) => Ok(BigNum::nan(prec)),
            (true, false) => Ok(BigNum::infinity(a.is_negative() != b.is_negative())),
            (false, true) => Ok(BigNum::with_prec(prec)),
            (false, false) => {
                let mut dst = BigNum::with_prec(prec);
                arith::quotient_into(self, &mut dst, None, a, b)?;
                Ok(dst)
            }
        }
    }

    /// Divides `a` by `b`, returning the integer quotient and the
    /// remainder.
    ///
    /// The results satisfy `quotient × b + remainder == a` exactly; the
    /// remainder carries the sign of the dividend.
    pub fn div_rem(&self, a: &BigNum, b: &BigNum) -> Result<(BigNum, BigNum), Error> {
        let prec = self.result_precision(a, b);
        if a.is_nan() || b.is_nan() {
            return Ok((BigNum::nan(prec), BigNum::nan(prec)));
        }
        if b.is_finite() && b.is_zero() {
            return Err(Error::DivideByZero);
        }
        if a.is_infinite() {
            return Ok((BigNum::nan(prec), BigNum::nan(prec)));
        }
        if b.is_infinite() {
            // the divisor exceeds any finite dividend
            let mut rem = BigNum::with_prec(prec);
            rem.copy_from(a, true);
            return Ok((BigNum::with_prec(prec), rem));
        }
        let mut quo = BigNum::with_prec(prec);
        let mut rem = BigNum::with_prec(prec);
        arith::quotient_into(self, &mut quo, Some(&mut rem), a, b)?;
        Ok((quo, rem))
    }

    /// Computes the remainder of dividing `a` by `b`.
    pub fn rem(&self, a: &BigNum, b: &BigNum) -> Result<BigNum, Error> {
        Ok(self.div_rem(a, b)?.1)
    }

    // -----------------------------------------------------------------------
    // Comparison

    /// Compares `a` and `b` numerically.
    ///
    /// Values of different precisions compare by value, so `1.0` equals
    /// `1.000`. NaN compares to nothing, including itself; infinities
    /// order by sign around all finite values.
    pub fn cmp(&self, a: &BigNum, b: &BigNum) -> Result<Ordering, Error> {
        arith::compare(a, b)
    }

    /// Reports whether `a` equals `b` after rounding the more precise
    /// operand to the precision of the less precise one.
    pub fn eq_round(&self, a: &BigNum, b: &BigNum) -> bool {
        arith::eq_round(a, b)
    }

    // -----------------------------------------------------------------------
    // Sign and integer adjustments

    /// Negates `x`. Negating zero leaves it zero.
    pub fn neg(&self, x: &BigNum) -> BigNum {
        let mut out = x.clone();
        out.negate();
        out
    }

    /// Returns the absolute value of `x`.
    pub fn abs(&self, x: &BigNum) -> BigNum {
        let mut out = x.clone();
        if !out.is_nan() {
            out.set_negative(false);
        }
        out
    }

    /// Returns `x` with the sign of `sign_of`.
    pub fn copy_sign(&self, x: &BigNum, sign_of: &BigNum) -> BigNum {
        let mut out = x.clone();
        out.set_negative(sign_of.is_negative());
        // zero never carries a sign
        if out.is_finite() {
            out.normalize();
        }
        out
    }

    /// Returns the fractional part of `x`, with the whole part removed and
    /// no rounding.
    pub fn frac(&self, x: &BigNum) -> BigNum {
        let mut out = x.clone();
        if !out.is_finite() {
            return out;
        }
        let exp = i32::from(out.exponent());
        for idx in 0..out.precision() as usize {
            if (idx as i32) < exp {
                out.set_digit(idx, 0);
            }
        }
        out.normalize();
        out
    }

    /// Returns the whole part of `x`, truncating toward zero with no
    /// rounding.
    pub fn whole(&self, x: &BigNum) -> BigNum {
        let mut out = x.clone();
        if !out.is_finite() {
            return out;
        }
        let exp = i32::from(out.exponent());
        if exp <= 0 {
            out.set_zero();
        } else {
            for idx in 0..out.precision() as usize {
                if idx as i32 >= exp {
                    out.set_digit(idx, 0);
                }
            }
            out.normalize();
        }
        out
    }

    /// Returns the least integer greater than or equal to `x`.
    pub fn ceil(&self, x: &BigNum) -> BigNum {
        let mut out = x.clone();
        if !out.is_finite() {
            return out;
        }
        let frac_zero = out.is_frac_zero();
        let exp = i32::from(out.exponent());
        if exp <= 0 {
            if out.is_negative() || frac_zero {
                out.set_zero();
            } else {
                out.copy_from(&BigNum::from(1u8), false);
            }
        } else {
            for idx in 0..out.precision() as usize {
                if idx as i32 >= exp {
                    out.set_digit(idx, 0);
                }
            }
            if !frac_zero && !out.is_negative() {
                out.increment_abs();
            }
            out.normalize();
        }
        out
    }

    /// Returns the greatest integer less than or equal to `x`.
    pub fn floor(&self, x: &BigNum) -> BigNum {
        let mut out = x.clone();
        if !out.is_finite() {
            return out;
        }
        let frac_zero = out.is_frac_zero();
        let exp = i32::from(out.exponent());
        if exp <= 0 {
            if !out.is_negative() || frac_zero {
                out.set_zero();
            } else {
                out.copy_from(&BigNum::from(1u8), false);
                out.set_negative(true);
            }
        } else {
            for idx in 0..out.precision() as usize {
                if idx as i32 >= exp {
                    out.set_digit(idx, 0);
                }
            }
            if !frac_zero && out.is_negative() {
                out.increment_abs();
            }
            out.normalize();
        }
        out
    }

    /// Rounds `x` to `places` digits after the decimal point, rounding
    /// half away from zero. Negative `places` round to the left of the
    /// point.
    pub fn round_to_places(&self, x: &BigNum, places: i32) -> Result<BigNum, Error> {
        let mut out = x.clone();
        if !out.is_finite() {
            return Ok(out);
        }
        let prec = out.precision() as usize;
        let mut exp = i32::from(out.exponent());

        // the first dropped digit sits at index places + exp
        let post_idx = places + exp;
        if post_idx < 0 {
            // everything rounds away
            out.set_zero();
        } else if post_idx >= prec as i32 {
            // the boundary is past the represented digits; nothing to do
        } else {
            let post_idx = post_idx as usize;
            let round_up = out.digit(post_idx) >= 5;
            for idx in post_idx..prec {
                out.set_digit(idx, 0);
            }
            if round_up {
                let mut carry = true;
                let mut idx = post_idx;
                while idx != 0 {
                    idx -= 1;
                    if out.digit(idx) == 9 {
                        out.set_digit(idx, 0);
                    } else {
                        out.set_digit(idx, out.digit(idx) + 1);
                        carry = false;
                        break;
                    }
                }
                if carry {
                    out.shift_right(1);
                    exp += 1;
                    out.store_exp(exp)?;
                    out.set_digit(0, 1);
                }
            }
            out.normalize();
        }
        Ok(out)
    }

    /// Scales `x` by a power of ten, adjusting the exponent without
    /// touching the digits.
    pub fn scale_by(&self, x: &BigNum, scale: i32) -> Result<BigNum, Error> {
        let mut out = x.clone();
        if !out.is_finite() || out.is_zero() {
            return Ok(out);
        }
        out.store_exp(i32::from(out.exponent()) + scale)?;
        Ok(out)
    }

    // -----------------------------------------------------------------------
    // Exponential and logarithmic functions

    /// Computes the square root of `x`.
    pub fn sqrt(&self, x: &BigNum) -> Result<BigNum, Error> {
        if x.is_nan() {
            return Ok(BigNum::nan(x.precision()));
        }
        if x.is_infinite() {
            if x.is_negative() {
                return Err(Error::Domain);
            }
            return Ok(BigNum::infinity(false));
        }
        let mut dst = BigNum::with_prec(x.precision());
        transcend::sqrt_into(self, &mut dst, x)?;
        Ok(dst)
    }

    /// Computes the natural logarithm of `x`.
    pub fn ln(&self, x: &BigNum) -> Result<BigNum, Error> {
        if x.is_nan() {
            return Ok(BigNum::nan(x.precision()));
        }
        if x.is_infinite() {
            if x.is_negative() {
                return Err(Error::Domain);
            }
            return Ok(BigNum::infinity(false));
        }
        let mut dst = BigNum::with_prec(x.precision());
        transcend::ln_into(self, &mut dst, x)?;
        Ok(dst)
    }

    /// Computes e raised to the power `x`.
    pub fn exp(&self, x: &BigNum) -> Result<BigNum, Error> {
        if x.is_nan() {
            return Ok(BigNum::nan(x.precision()));
        }
        if x.is_infinite() {
            return Ok(if x.is_negative() {
                BigNum::with_prec(x.precision())
            } else {
                BigNum::infinity(false)
            });
        }
        let mut dst = BigNum::with_prec(x.precision());
        transcend::exp_into(self, &mut dst, x)?;
        Ok(dst)
    }

    /// Computes the base-10 logarithm of `x`.
    pub fn log10(&self, x: &BigNum) -> Result<BigNum, Error> {
        if x.is_nan() {
            return Ok(BigNum::nan(x.precision()));
        }
        if x.is_infinite() {
            if x.is_negative() {
                return Err(Error::Domain);
            }
            return Ok(BigNum::infinity(false));
        }
        let mut dst = BigNum::with_prec(x.precision());
        transcend::log10_into(self, &mut dst, x)?;
        Ok(dst)
    }

    /// Computes `x` raised to the power `y`.
    ///
    /// A negative base requires an integer exponent; `0^0` and
    /// non-integer powers of negative bases are domain errors.
    pub fn pow(&self, x: &BigNum, y: &BigNum) -> Result<BigNum, Error> {
        let prec = x.precision().max(y.precision());
        if x.is_nan() || y.is_nan() || x.is_infinite() || y.is_infinite() {
            return Ok(BigNum::nan(prec));
        }
        let mut dst = BigNum::with_prec(prec);
        transcend::pow_into(self, &mut dst, x, y)?;
        Ok(dst)
    }

    // -----------------------------------------------------------------------
    // Trigonometric functions

    /// Computes the sine of `x` (in radians).
    pub fn sin(&self, x: &BigNum) -> Result<BigNum, Error> {
        if !x.is_finite() {
            return Ok(BigNum::nan(x.precision()));
        }
        let mut dst = BigNum::with_prec(x.precision());
        transcend::sin_into(self, &mut dst, x)?;
        Ok(dst)
    }

    /// Computes the cosine of `x` (in radians).
    pub fn cos(&self, x: &BigNum) -> Result<BigNum, Error> {
        if !x.is_finite() {
            return Ok(BigNum::nan(x.precision()));
        }
        let mut dst = BigNum::with_prec(x.precision());
        transcend::cos_into(self, &mut dst, x)?;
        Ok(dst)
    }

    /// Computes the tangent of `x` (in radians).
    pub fn tan(&self, x: &BigNum) -> Result<BigNum, Error> {
        if !x.is_finite() {
            return Ok(BigNum::nan(x.precision()));
        }
        let mut dst = BigNum::with_prec(x.precision());
        transcend::tan_into(self, &mut dst, x)?;
        Ok(dst)
    }

    /// Computes the arcsine of `x`, for `x` in [-1, 1].
    pub fn asin(&self, x: &BigNum) -> Result<BigNum, Error> {
        if x.is_nan() {
            return Ok(BigNum::nan(x.precision()));
        }
        if x.is_infinite() {
            return Err(Error::Domain);
        }
        let mut dst = BigNum::with_prec(x.precision());
        transcend::asincos_into(self, &mut dst, x, false)?;
        Ok(dst)
    }

    /// Computes the arccosine of `x`, for `x` in [-1, 1].
    pub fn acos(&self, x: &BigNum) -> Result<BigNum, Error> {
        if x.is_nan() {
            return Ok(BigNum::nan(x.precision()));
        }
        if x.is_infinite() {
            return Err(Error::Domain);
        }
        let mut dst = BigNum::with_prec(x.precision());
        transcend::asincos_into(self, &mut dst, x, true)?;
        Ok(dst)
    }

    /// Computes the arctangent of `x`.
    pub fn atan(&self, x: &BigNum) -> Result<BigNum, Error> {
        if x.is_nan() {
            return Ok(BigNum::nan(x.precision()));
        }
        if x.is_infinite() {
            // the function's asymptotes, at the context's precision
            let pi = transcend::const_pi(self, self.precision)?;
            let mut out = BigNum::with_prec(self.precision);
            out.copy_from(&pi, true);
            arith::div_by_u64(&mut out, 2, None)?;
            out.set_negative(x.is_negative());
            return Ok(out);
        }
        let mut dst = BigNum::with_prec(x.precision());
        transcend::atan_into(self, &mut dst, x)?;
        Ok(dst)
    }

    // -----------------------------------------------------------------------
    // Hyperbolic functions

    /// Computes the hyperbolic sine of `x`.
    pub fn sinh(&self, x: &BigNum) -> Result<BigNum, Error> {
        if x.is_nan() {
            return Ok(BigNum::nan(x.precision()));
        }
        if x.is_infinite() {
            return Ok(BigNum::infinity(x.is_negative()));
        }
        let mut dst = BigNum::with_prec(x.precision());
        transcend::sinhcosh_into(self, &mut dst, x, false, false)?;
        Ok(dst)
    }

    /// Computes the hyperbolic cosine of `x`.
    pub fn cosh(&self, x: &BigNum) -> Result<BigNum, Error> {
        if x.is_nan() {
            return Ok(BigNum::nan(x.precision()));
        }
        if x.is_infinite() {
            return Ok(BigNum::infinity(false));
        }
        let mut dst = BigNum::with_prec(x.precision());
        transcend::sinhcosh_into(self, &mut dst, x, true, false)?;
        Ok(dst)
    }

    /// Computes the hyperbolic tangent of `x`.
    pub fn tanh(&self, x: &BigNum) -> Result<BigNum, Error> {
        if x.is_nan() {
            return Ok(BigNum::nan(x.precision()));
        }
        if x.is_infinite() {
            let mut out = BigNum::with_prec(x.precision());
            out.copy_from(&BigNum::from(1u8), false);
            out.set_negative(x.is_negative());
            return Ok(out);
        }
        let mut dst = BigNum::with_prec(x.precision());
        transcend::sinhcosh_into(self, &mut dst, x, false, true)?;
        Ok(dst)
    }

    // -----------------------------------------------------------------------
    // Angle conversions

    /// Converts `x` from degrees to radians.
    pub fn deg2rad(&self, x: &BigNum) -> Result<BigNum, Error> {
        if !x.is_finite() {
            return Ok(x.clone());
        }
        let mut dst = BigNum::with_prec(x.precision());
        transcend::deg2rad_into(self, &mut dst, x)?;
        Ok(dst)
    }

    /// Converts `x` from radians to degrees.
    pub fn rad2deg(&self, x: &BigNum) -> Result<BigNum, Error> {
        if !x.is_finite() {
            return Ok(x.clone());
        }
        let mut dst = BigNum::with_prec(x.precision());
        transcend::rad2deg_into(self, &mut dst, x)?;
        Ok(dst)
    }

    // -----------------------------------------------------------------------
    // Constants

    /// Returns π at the context's precision.
    pub fn pi(&self) -> Result<BigNum, Error> {
        self.rounded_const(transcend::const_pi(self, self.precision)?)
    }

    /// Returns e, the base of the natural logarithm, at the context's
    /// precision.
    pub fn e(&self) -> Result<BigNum, Error> {
        self.rounded_const(transcend::const_e(self, self.precision)?)
    }

    /// Returns ln(2) at the context's precision.
    pub fn ln2(&self) -> Result<BigNum, Error> {
        self.rounded_const(transcend::const_ln2(self, self.precision)?)
    }

    /// Returns ln(10) at the context's precision.
    pub fn ln10(&self) -> Result<BigNum, Error> {
        self.rounded_const(transcend::const_ln10(self, self.precision)?)
    }

    fn rounded_const(&self, val: BigNum) -> Result<BigNum, Error> {
        let mut out = BigNum::with_prec(self.precision);
        out.copy_from(&val, true);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(s: &str) -> BigNum {
        s.parse().unwrap()
    }

    #[test]
    fn special_value_arithmetic() {
        let cx = Context::default();
        let inf = BigNum::infinity(false);
        let ninf = BigNum::infinity(true);
        let nan = BigNum::nan(4);

        assert!(cx.add(&nan, &n("1")).unwrap().is_nan());
        assert!(cx.add(&inf, &ninf).unwrap().is_nan());
        assert_eq!(cx.add(&inf, &n("5")).unwrap(), inf);
        assert!(cx.sub(&inf, &inf).unwrap().is_nan());
        assert_eq!(cx.sub(&n("5"), &inf).unwrap(), ninf);
        assert!(cx.mul(&inf, &n("0")).unwrap().is_nan());
        assert_eq!(cx.mul(&inf, &n("-2")).unwrap(), ninf);
        assert_eq!(cx.mul(&ninf, &ninf).unwrap(), inf);
        assert!(cx.div(&n("1"), &inf).unwrap().is_zero());
        assert!(cx.div(&inf, &inf).unwrap().is_nan());
        assert_eq!(cx.div(&inf, &n("0")).unwrap_err(), Error::DivideByZero);
    }

    #[test]
    fn precision_of_results() {
        // the context precision is a floor for arithmetic results
        let cx = Context::with_precision(10).unwrap();
        let q = cx.div(&n("1"), &n("3")).unwrap();
        assert_eq!(q.precision(), 10);
        assert_eq!(q.to_string(), "0.3333333333");
        let sum = cx.add(&n("1"), &n("2")).unwrap();
        assert_eq!(sum.precision(), 10);

        // wider operands widen the result past the floor
        let cx = Context::with_precision(4).unwrap();
        let sum = cx.add(&n("1.2345"), &n("2")).unwrap();
        assert_eq!(sum.precision(), 5);
        let prod = cx.mul(&n("1.5"), &n("2.000000")).unwrap();
        assert_eq!(prod.precision(), 7);

        // the default context gives the operators a 32-digit working size
        let cx = Context::default();
        assert_eq!(cx.mul(&n("12"), &n("12")).unwrap().to_string(), "144");
        assert_eq!(cx.sub(&n("10"), &n("0.5")).unwrap().to_string(), "9.5");
    }

    #[test]
    fn with_digits_resizes_and_rounds() {
        let cx = Context::default();
        let pi = cx.parse_with_precision("3.141592653589793", 16).unwrap();

        let narrow = cx.with_digits(&pi, 5).unwrap();
        assert_eq!(narrow.precision(), 5);
        assert_eq!(narrow.to_string(), "3.1416");

        let wide = cx.with_digits(&pi, 24).unwrap();
        assert_eq!(wide.precision(), 24);
        assert_eq!(wide, pi);

        // narrowing rounds half to even at the final digit
        assert_eq!(cx.with_digits(&n("2.25"), 2).unwrap().to_string(), "2.2");
        assert_eq!(cx.with_digits(&n("2.35"), 2).unwrap().to_string(), "2.4");

        assert!(cx.with_digits(&BigNum::nan(8), 4).unwrap().is_nan());
        assert!(cx
            .with_digits(&BigNum::infinity(true), 4)
            .unwrap()
            .is_negative());
        assert!(cx.with_digits(&pi, 0).is_err());
    }

    #[test]
    fn whole_and_frac() {
        let cx = Context::default();
        assert_eq!(cx.whole(&n("3.75")), n("3"));
        assert_eq!(cx.frac(&n("3.75")), n("0.75"));
        assert_eq!(cx.whole(&n("-3.75")), n("-3"));
        assert_eq!(cx.frac(&n("-3.75")), n("-0.75"));
        assert_eq!(cx.whole(&n("0.25")), n("0"));
        assert_eq!(cx.frac(&n("42")), n("0"));
    }

    #[test]
    fn ceil_and_floor() {
        let cx = Context::default();
        assert_eq!(cx.ceil(&n("1.2")), n("2"));
        assert_eq!(cx.ceil(&n("-1.2")), n("-1"));
        assert_eq!(cx.ceil(&n("0.5")), n("1"));
        assert_eq!(cx.ceil(&n("-0.5")), n("0"));
        assert_eq!(cx.ceil(&n("3")), n("3"));
        assert_eq!(cx.floor(&n("1.8")), n("1"));
        assert_eq!(cx.floor(&n("-1.2")), n("-2"));
        assert_eq!(cx.floor(&n("0.5")), n("0"));
        assert_eq!(cx.floor(&n("-0.5")), n("-1"));
        assert_eq!(cx.floor(&n("-3")), n("-3"));
    }

    #[test]
    fn round_to_places() {
        let cx = Context::default();
        assert_eq!(cx.round_to_places(&n("3.14159"), 2).unwrap(), n("3.14"));
        assert_eq!(cx.round_to_places(&n("3.14559"), 2).unwrap(), n("3.15"));
        assert_eq!(cx.round_to_places(&n("2.5"), 0).unwrap(), n("3"));
        assert_eq!(cx.round_to_places(&n("-2.5"), 0).unwrap(), n("-3"));
        assert_eq!(cx.round_to_places(&n("1234"), -2).unwrap(), n("1200"));
        assert_eq!(cx.round_to_places(&n("9.99"), 1).unwrap(), n("10"));
        assert_eq!(cx.round_to_places(&n("0.004"), 1).unwrap(), n("0"));
    }

    #[test]
    fn scale_and_sign_ops() {
        let cx = Context::default();
        assert_eq!(cx.scale_by(&n("1.5"), 2).unwrap(), n("150"));
        assert_eq!(cx.scale_by(&n("25"), -3).unwrap(), n("0.025"));
        assert_eq!(cx.neg(&n("4")), n("-4"));
        assert_eq!(cx.neg(&n("0")), n("0"));
        assert_eq!(cx.abs(&n("-4.5")), n("4.5"));
        assert_eq!(cx.copy_sign(&n("3"), &n("-1")), n("-3"));
        assert_eq!(cx.copy_sign(&n("-3"), &n("1")), n("3"));
        assert_eq!(cx.copy_sign(&n("0"), &n("-1")), n("0"));
    }

    #[test]
    fn atan_of_infinity_is_half_pi() {
        let cx = Context::default();
        let r = cx.atan(&BigNum::infinity(false)).unwrap();
        assert_eq!(r.to_string(), "1.5707963267948966192313216916398");
        let r = cx.atan(&BigNum::infinity(true)).unwrap();
        assert!(r.is_negative());
    }

    #[test]
    fn parse_respects_precision() {
        let cx = Context::default();
        assert_eq!(cx.parse("3.14159").unwrap().precision(), 6);
        let v = cx.parse_with_precision("3.14159", 3).unwrap();
        assert_eq!(v.to_string(), "3.14");
        assert!(cx.parse("bogus").is_err());
    }
}
