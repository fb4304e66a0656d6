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

//! Digit-serial arithmetic kernels.
//!
//! The kernels operate on ordinary numbers only; special values (NaN,
//! infinity) are dispatched by [`Context`](crate::context::Context) before
//! the kernels run. Operands are addressed by *position*: the digit at
//! position `p` has place value `10^p`, so a value with exponent `e` and
//! precision `P` spans positions `e - P` through `e - 1`.

use std::cmp::Ordering;
use std::mem;

use crate::bignum::BigNum;
use crate::context::Context;
use crate::error::Error;

/// Compares two values, failing when either operand is a NaN. Infinities
/// order by sign, with equal-signed infinities comparing equal.
pub(crate) fn compare(a: &BigNum, b: &BigNum) -> Result<Ordering, Error> {
    if a.is_nan() || b.is_nan() {
        return Err(Error::InvalidComparison);
    }
    match (a.is_infinite(), b.is_infinite()) {
        (true, true) => return Ok(a.signum().cmp(&b.signum())),
        (true, false) => return Ok(if a.is_negative() {
            Ordering::Less
        } else {
            Ordering::Greater
        }),
        (false, true) => return Ok(if b.is_negative() {
            Ordering::Greater
        } else {
            Ordering::Less
        }),
        (false, false) => {}
    }
    match (a.is_negative(), b.is_negative()) {
        (false, true) => Ok(Ordering::Greater),
        (true, false) => Ok(Ordering::Less),
        (false, false) => Ok(a.compare_abs(b)),
        (true, true) => Ok(a.compare_abs(b).reverse()),
    }
}

/// Equality after rounding the more precise operand to the less precise
/// operand's precision.
pub(crate) fn eq_round(a: &BigNum, b: &BigNum) -> bool {
    if a.prec == b.prec || !a.is_finite() || !b.is_finite() {
        return a.eq_exact(b);
    }
    let (longer, shorter) = if a.prec > b.prec { (a, b) } else { (b, a) };
    let mut tmp = BigNum::with_prec(shorter.prec);
    tmp.copy_from(longer, true);
    tmp.normalize();
    tmp.eq_exact(shorter)
}

/// Computes `a + b` into `dst`, honoring the operand signs.
pub(crate) fn sum_into(dst: &mut BigNum, a: &BigNum, b: &BigNum) -> Result<(), Error> {
    if a.is_negative() == b.is_negative() {
        // same sign: the sum carries the shared sign and the magnitude is
        // the sum of magnitudes
        abs_sum_into(dst, a, b)?;
        if !dst.is_zero() {
            dst.set_negative(a.is_negative());
        }
    } else if a.is_negative() {
        abs_diff_into(dst, b, a)?;
    } else {
        abs_diff_into(dst, a, b)?;
    }
    Ok(())
}

/// Computes `a - b` into `dst`, honoring the operand signs.
pub(crate) fn diff_into(dst: &mut BigNum, a: &BigNum, b: &BigNum) -> Result<(), Error> {
    if a.is_negative() == b.is_negative() {
        abs_diff_into(dst, a, b)?;
        // for two negatives the magnitude difference has the opposite sign
        if a.is_negative() {
            dst.negate();
        }
    } else {
        abs_sum_into(dst, a, b)?;
        if !dst.is_zero() {
            dst.set_negative(a.is_negative());
        }
    }
    Ok(())
}

/// Computes `|a| + |b|` into `dst`.
pub(crate) fn abs_sum_into(dst: &mut BigNum, a: &BigNum, b: &BigNum) -> Result<(), Error> {
    if a.is_zero() {
        dst.copy_from(b, true);
        return Ok(());
    } else if b.is_zero() {
        dst.copy_from(a, true);
        return Ok(());
    }

    let exp1 = i32::from(a.exp);
    let exp2 = i32::from(b.exp);
    let prec1 = i32::from(a.prec);
    let prec2 = i32::from(b.prec);
    let prec3 = i32::from(dst.prec);

    // the larger exponent wins; least significant digits drop off the end
    let mut new_exp = exp1.max(exp2);

    let (hi1, lo1) = (exp1 - 1, exp1 - prec1);
    let (hi2, lo2) = (exp2 - 1, exp2 - prec2);
    let (hi3, lo3) = (new_exp - 1, new_exp - prec3);

    // If one operand supplies a digit one position past the end of the
    // result, remember it for rounding. The result is at least as precise
    // as the wider operand, so at most one operand can be truncated.
    let mut trail_dig = 0u8;
    let mut trail_val = false;
    if lo3 - 1 >= lo1 && lo3 - 1 <= hi1 {
        trail_dig = a.digit((exp1 - (lo3 - 1) - 1) as usize);
        trail_val = a.any_digits_from((exp1 - (lo3 - 1)) as usize);
    } else if lo3 - 1 >= lo2 && lo3 - 1 <= hi2 {
        trail_dig = b.digit((exp2 - (lo3 - 1) - 1) as usize);
        trail_val = b.any_digits_from((exp2 - (lo3 - 1)) as usize);
    }

    let mut carry = 0u8;
    for pos in lo3..=hi3 {
        let mut acc = carry;
        if pos >= lo1 && pos <= hi1 {
            acc += a.digit((exp1 - pos - 1) as usize);
        }
        if pos >= lo2 && pos <= hi2 {
            acc += b.digit((exp2 - pos - 1) as usize);
        }
        if acc > 9 {
            acc -= 10;
            carry = 1;
        } else {
            carry = 0;
        }
        dst.set_digit((new_exp - pos - 1) as usize, acc);
    }

    // a final carry shifts the whole number down a place
    if carry != 0 {
        trail_val |= trail_dig != 0;
        trail_dig = dst.digit(prec3 as usize - 1);
        dst.shift_right(1);
        new_exp += 1;
        dst.set_digit(0, 1);
    }

    dst.set_negative(false);
    dst.store_exp(new_exp)?;
    dst.round_for_dropped(trail_dig, trail_val);
    dst.normalize();
    Ok(())
}

/// Computes `|a| - |b|` into `dst`; the result is negative when `|b| > |a|`.
pub(crate) fn abs_diff_into(dst: &mut BigNum, a: &BigNum, b: &BigNum) -> Result<(), Error> {
    if b.is_zero() {
        dst.copy_from(a, true);
        return Ok(());
    } else if a.is_zero() {
        dst.copy_from(b, true);
        dst.set_negative(true);
        return Ok(());
    }

    // subtract the smaller magnitude from the larger
    let mut result_neg = false;
    let (a, b) = if a.compare_abs(b) == Ordering::Less {
        result_neg = true;
        (b, a)
    } else {
        (a, b)
    };

    let exp1 = i32::from(a.exp);
    let exp2 = i32::from(b.exp);
    let prec1 = i32::from(a.prec);
    let prec2 = i32::from(b.prec);
    let prec3 = i32::from(dst.prec);
    let max_exp = exp1.max(exp2);

    let (hi1, lo1) = (exp1 - 1, exp1 - prec1);
    let (hi2, lo2) = (exp2 - 1, exp2 - prec2);
    let (hi3, lo3) = (max_exp - 1, max_exp - prec3);

    // Borrow lookahead for digits dropped from the subtrahend: if the
    // dropped portion exceeds half a unit in the last kept place, borrow
    // into the subtraction so the truncated result rounds correctly. Only
    // the subtrahend can be truncated, since the minuend has the larger
    // magnitude.
    let mut borrow = 0i8;
    if lo3 - 1 >= lo2 && lo3 - 1 <= hi2 {
        let idx = (exp2 - (lo3 - 1) - 1) as usize;
        if b.digit(idx) >= 6 {
            borrow = 1;
        } else if b.digit(idx) == 5 && b.any_digits_from(idx + 1) {
            borrow = 1;
        }
    }

    for pos in lo3..=hi3 {
        let mut acc = 0i8;
        if pos >= lo1 && pos <= hi1 {
            acc = a.digit((exp1 - pos - 1) as usize) as i8;
        }
        if pos >= lo2 && pos <= hi2 {
            acc -= b.digit((exp2 - pos - 1) as usize) as i8;
        }
        acc -= borrow;
        if acc < 0 {
            acc += 10;
            borrow = 1;
        } else {
            borrow = 0;
        }
        dst.set_digit((max_exp - pos - 1) as usize, acc as u8);
    }

    dst.set_negative(result_neg);
    dst.store_exp(max_exp)?;
    dst.normalize();
    Ok(())
}

/// Computes `a × b` into `dst` by long multiplication, accumulating one
/// digit of `b` at a time. `dst` must be at least as precise as `a`.
pub(crate) fn prod_into(dst: &mut BigNum, a: &BigNum, b: &BigNum) -> Result<(), Error> {
    let prec1 = a.prec as usize;
    let prec2 = b.prec as usize;
    let new_prec = dst.prec as usize;
    debug_assert!(new_prec >= prec1);

    for i in 0..new_prec {
        dst.set_digit(i, 0);
    }

    // Write each round's output where the top number ends, and treat the
    // bottom number as a whole number by folding its scale into the
    // exponent.
    let start_idx = prec1;
    let mut out_exp = i32::from(a.exp) + i32::from(b.exp) - prec2 as i32;

    let mut trail_dig = 0u8;
    let mut trail_val = false;

    for idx2 in (0..prec2).rev() {
        let mut carry = 0u32;
        let ext2_dig = u32::from(b.digit(idx2));

        if ext2_dig != 0 {
            let mut out_idx = start_idx;
            for idx1 in (0..prec1).rev() {
                out_idx -= 1;
                let dig =
                    u32::from(a.digit(idx1)) * ext2_dig + carry + u32::from(dst.digit(out_idx));
                carry = dig / 10;
                dst.set_digit(out_idx, (dig % 10) as u8);
            }
        }

        // shift the accumulator for the next round, unless this was the
        // last round and there's no carry to absorb
        if idx2 != 0 || carry != 0 {
            trail_val |= trail_dig != 0;
            trail_dig = dst.digit(new_prec - 1);
            dst.shift_right(1);
            out_exp += 1;
            dst.set_digit(0, (carry % 10) as u8);
        }
    }

    if out_exp < i32::from(i16::MIN) {
        dst.set_zero();
        return Ok(());
    }
    dst.store_exp(out_exp)?;
    dst.set_negative(a.is_negative() != b.is_negative());
    dst.round_for_dropped(trail_dig, trail_val);
    dst.normalize();
    Ok(())
}

/// Computes `a ÷ b` into `quo` by schoolbook trial subtraction, guessing
/// each digit from three-digit approximations of the running remainder and
/// divisor. With `rem_out` supplied, the quotient stops unrounded at the
/// units digit and the remainder satisfies `quo × b + rem = a` exactly.
pub(crate) fn quotient_into(
    cx: &Context,
    quo: &mut BigNum,
    mut rem_out: Option<&mut BigNum>,
    a: &BigNum,
    b: &BigNum,
) -> Result<(), Error> {
    if b.is_zero() {
        return Err(Error::DivideByZero);
    }
    if a.is_zero() {
        quo.set_zero();
        if let Some(r) = rem_out {
            r.set_zero();
        }
        return Ok(());
    }

    let quo_prec = quo.prec as usize;
    let dvs_prec = b.prec as usize;

    // The running remainder needs enough precision for exact differences:
    // the wider of the operands, plus two digits of slack for relative
    // shifting, and no less than three so the digit estimate can always
    // read three leading digits.
    let rem_prec = a.prec.max(b.prec).saturating_add(2).max(3);

    let mut rem1 = cx.scratch(rem_prec)?;
    let mut rem2 = cx.scratch(rem_prec)?;
    let mut dvs2 = cx.scratch(rem_prec)?;
    let mut dvs = cx.scratch(b.prec)?;

    // the dividend is the initial running remainder; the divisor is scaled
    // to the dividend's exponent, with the scale factor absorbed into the
    // quotient's exponent
    rem1.copy_from(a, true);
    dvs.copy_from(b, true);
    let mut quo_exp = i32::from(a.exp) - i32::from(b.exp) + 1;
    dvs.exp = a.exp;

    let mut zero_remainder = false;
    let mut lead_dig_set = false;

    // an entirely fractional quotient in remainder mode means the dividend
    // is the remainder and the quotient is zero
    if rem_out.is_some() && quo_exp <= 0 {
        if let Some(r) = rem_out {
            r.copy_from(&rem1, true);
        }
        quo.set_zero();
        return Ok(());
    }

    let mut quo_idx = 0usize;
    loop {
        let mut acc: u32 = 0;

        // approximate the next digit from the leading three digits of the
        // remainder (rounded down) and divisor (rounded up)
        let mut rem_approx = i64::from(rem1.digit(0)) * 100
            + i64::from(rem1.digit(1)) * 10
            + i64::from(rem1.digit(2));
        let mut dvs_approx = i64::from(dvs.digit(0)) * 100 + 1;
        if dvs_prec >= 2 {
            dvs_approx += i64::from(dvs.digit(1)) * 10;
        }
        if dvs_prec >= 3 {
            dvs_approx += i64::from(dvs.digit(2));
        }

        let exp_diff = i32::from(rem1.exp) - i32::from(dvs.exp);
        if exp_diff > 0 {
            for _ in 0..exp_diff {
                rem_approx *= 10;
            }
        } else if exp_diff <= -3 {
            // the divisor dwarfs the remainder; the digit is zero
            dvs_approx = 1000;
        } else {
            for _ in 0..-exp_diff {
                dvs_approx *= 10;
            }
        }

        let dig_approx = (rem_approx / dvs_approx) as u32;

        // deduct digit × divisor in one step when the digit estimate is
        // worth the cost of the long multiplication
        if dig_approx > 2 {
            acc = dig_approx;
            dvs2.copy_from(&dvs, false);
            mul_by_u32(&mut dvs2, dig_approx)?;
            abs_diff_into(&mut rem2, &rem1, &dvs2)?;
            if rem2.is_zero() {
                zero_remainder = true;
                break;
            }
            mem::swap(&mut *rem1, &mut *rem2);
        }

        // finish with repeated subtraction
        loop {
            match rem1.compare_abs(&dvs) {
                Ordering::Less => break,
                Ordering::Equal => {
                    zero_remainder = true;
                    acc += 1;
                    break;
                }
                Ordering::Greater => {}
            }
            abs_diff_into(&mut rem2, &rem1, &dvs)?;
            mem::swap(&mut *rem1, &mut *rem2);
            acc += 1;
        }

        if quo_idx < quo_prec {
            quo.set_digit(quo_idx, acc as u8);
        } else {
            // the extra digit was computed for rounding only
            quo.store_exp(quo_exp)?;
            quo.round_for_dropped(acc as u8, !zero_remainder);
            break;
        }

        if acc != 0 {
            lead_dig_set = true;
        }

        // leading zeros shrink the exponent instead of consuming digits
        if lead_dig_set {
            quo_idx += 1;
        } else {
            quo_exp -= 1;
        }

        // stop on an exact result, or in remainder mode once the quotient
        // reaches its units digit (integer quotient) or full precision
        // (unrounded quotient)
        if zero_remainder
            || (rem_out.is_some() && (quo_idx as i32 == quo_exp || quo_idx == quo_prec))
        {
            while quo_idx < quo_prec {
                quo.set_digit(quo_idx, 0);
                quo_idx += 1;
            }
            quo.store_exp(quo_exp)?;
            break;
        }

        // divide the divisor by ten for the next digit
        let next_exp = i32::from(dvs.exp) - 1;
        if next_exp < i32::from(i16::MIN) {
            // the divisor can't scale any further; treat the rest of the
            // quotient as zeros
            while quo_idx < quo_prec {
                quo.set_digit(quo_idx, 0);
                quo_idx += 1;
            }
            quo.store_exp(quo_exp)?;
            break;
        }
        dvs.exp = next_exp as i16;
    }

    if let Some(r) = rem_out {
        if zero_remainder {
            r.set_zero();
        } else {
            r.copy_from(&rem1, true);
            r.set_negative(a.is_negative());
            r.normalize();
        }
    }

    quo.set_negative(a.is_negative() != b.is_negative());
    quo.normalize();
    Ok(())
}

/// Multiplies in place by a small integer factor.
pub(crate) fn mul_by_u32(x: &mut BigNum, val: u32) -> Result<(), Error> {
    let prec = x.prec as usize;
    let val = u64::from(val);
    let mut carry = 0u64;
    for idx in (0..prec).rev() {
        let prod = val * u64::from(x.digit(idx)) + carry;
        x.set_digit(idx, (prod % 10) as u8);
        carry = prod / 10;
    }

    // shift in any leftover carry digits, dropping low digits for rounding
    let mut exp = i32::from(x.exp);
    let mut dropped_dig = 0u8;
    let mut dropped_val = false;
    while carry != 0 {
        dropped_val |= dropped_dig != 0;
        dropped_dig = x.digit(prec - 1);
        x.shift_right(1);
        exp += 1;
        x.set_digit(0, (carry % 10) as u8);
        carry /= 10;
    }

    x.store_exp(exp)?;
    x.round_for_dropped(dropped_dig, dropped_val);
    x.normalize();
    Ok(())
}

/// Divides in place by an integer divisor.
///
/// With `rem` supplied, computes the integer quotient and passes back the
/// integer remainder; otherwise computes the full-precision quotient,
/// rounded half to even. `val` must not exceed `u64::MAX / 10`.
pub(crate) fn div_by_u64(x: &mut BigNum, val: u64, mut rem: Option<&mut u64>) -> Result<(), Error> {
    debug_assert!(val > 0 && val <= u64::MAX / 10);
    let prec = x.prec as usize;
    let mut exp = i32::from(x.exp);

    // an entirely fractional dividend divides to zero with zero remainder
    if rem.is_some() && exp <= 0 {
        if let Some(r) = rem.as_deref_mut() {
            *r = 0;
        }
        x.set_zero();
        return Ok(());
    }

    let mut r = 0u64;
    let mut sig = false;
    let mut in_idx = 0usize;
    let mut out_idx = 0usize;
    let mut zeroed = false;
    while out_idx < prec {
        r = r * 10 + if in_idx < prec { u64::from(x.digit(in_idx)) } else { 0 };
        let quo = r / val;
        r %= val;

        if quo != 0 {
            sig = true;
        }
        if sig {
            x.set_digit(out_idx, quo as u8);
            out_idx += 1;
            // integer division stops at the decimal point
            if rem.is_some() && out_idx as i32 == exp {
                break;
            }
        } else {
            // an implied leading zero; absorb it into the exponent
            exp -= 1;
            if rem.is_some() && exp == 0 {
                break;
            }
        }

        in_idx += 1;
        if r == 0 && in_idx >= prec {
            if !sig {
                x.set_zero();
                zeroed = true;
            }
            break;
        }
    }

    if !zeroed {
        while out_idx < prec {
            x.set_digit(out_idx, 0);
            out_idx += 1;
        }
        if exp < i32::from(i16::MIN) {
            x.set_zero();
            zeroed = true;
        } else {
            x.store_exp(exp)?;
        }
    }

    if let Some(r_out) = rem {
        *r_out = r;
    } else if !zeroed {
        // the dropped digits are 5000... or more iff remainder × 2 ≥ val
        if r * 2 > val || (r * 2 == val && x.digit(prec - 1) % 2 == 1) {
            x.round_up_abs(prec);
        }
    }
    x.normalize();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Context;

    fn n(s: &str) -> BigNum {
        s.parse().unwrap()
    }

    #[test]
    fn addition() {
        let cx = Context::default();
        assert_eq!(cx.add(&n("1.5"), &n("2.25")).unwrap(), n("3.75"));
        assert_eq!(cx.add(&n("-1.5"), &n("2.5")).unwrap(), n("1"));
        assert_eq!(cx.add(&n("1.5"), &n("-2.5")).unwrap(), n("-1"));
        assert_eq!(cx.add(&n("0"), &n("-7")).unwrap(), n("-7"));
        assert_eq!(cx.add(&n("99.9"), &n("0.1")).unwrap(), n("100"));
        assert_eq!(cx.add(&n("-3"), &n("3")).unwrap(), n("0"));
    }

    #[test]
    fn addition_is_bit_exact_commutative() {
        let cx = Context::default();
        let cases = [
            ("1.5", "2.25"),
            ("123456789", "0.000000001"),
            ("-42", "41.999"),
            ("9.9999", "0.0001"),
            ("0.1", "0.2"),
        ];
        for (a, b) in &cases {
            let x = cx.add(&n(a), &n(b)).unwrap();
            let y = cx.add(&n(b), &n(a)).unwrap();
            assert_eq!(x.to_bytes(), y.to_bytes(), "{} + {}", a, b);
        }
    }

    #[test]
    fn subtraction() {
        let cx = Context::default();
        assert_eq!(cx.sub(&n("10"), &n("0.5")).unwrap(), n("9.5"));
        assert_eq!(cx.sub(&n("0.5"), &n("10")).unwrap(), n("-9.5"));
        assert_eq!(cx.sub(&n("-2"), &n("-2")).unwrap(), n("0"));
        assert_eq!(cx.sub(&n("-1"), &n("2.5")).unwrap(), n("-3.5"));
        assert_eq!(cx.sub(&n("100"), &n("99.999")).unwrap(), n("0.001"));
    }

    #[test]
    fn multiplication() {
        let cx = Context::default();
        assert_eq!(cx.mul(&n("12"), &n("12")).unwrap(), n("144"));
        assert_eq!(cx.mul(&n("-0.5"), &n("0.5")).unwrap(), n("-0.25"));
        assert_eq!(cx.mul(&n("0"), &n("12345")).unwrap(), n("0"));
        assert_eq!(
            cx.mul(&n("123456789"), &n("987654321")).unwrap(),
            n("121932631112635269")
        );
        assert_eq!(cx.mul(&n("0.001"), &n("0.002")).unwrap(), n("0.000002"));
    }

    #[test]
    fn division() {
        let cx = Context::default();
        assert_eq!(cx.div(&n("1.00"), &n("8")).unwrap(), n("0.125"));
        assert_eq!(cx.div(&n("144"), &n("-12")).unwrap(), n("-12"));
        assert_eq!(cx.div(&n("1"), &n("1")).unwrap(), n("1"));
        assert_eq!(cx.div(&n("0"), &n("5")).unwrap(), n("0"));
        assert_eq!(cx.div(&n("2"), &n("0")).unwrap_err(), Error::DivideByZero);
    }

    #[test]
    fn division_repeating() {
        let cx = Context::with_precision(10).unwrap();
        let q = cx.div(&n("1"), &n("3")).unwrap();
        assert_eq!(q.to_string(), "0.3333333333");
        let q = cx.div(&n("2"), &n("3")).unwrap();
        assert_eq!(q.to_string(), "0.6666666667");
    }

    #[test]
    fn divmod_identity() {
        let cx = Context::default();
        let cases = [("17", "5"), ("-17", "5"), ("17", "-5"), ("10.5", "0.25"), ("1", "7")];
        for (a, b) in &cases {
            let (q, r) = cx.div_rem(&n(a), &n(b)).unwrap();
            assert!(q.is_integer(), "{} / {} -> {}", a, b, q);
            let back = cx.add(&cx.mul(&q, &n(b)).unwrap(), &r).unwrap();
            assert_eq!(back, n(a), "{} divmod {}", a, b);
        }
    }

    #[test]
    fn divmod_basic() {
        let cx = Context::default();
        let (q, r) = cx.div_rem(&n("17"), &n("5")).unwrap();
        assert_eq!(q, n("3"));
        assert_eq!(r, n("2"));
        let (q, r) = cx.div_rem(&n("0.5"), &n("5")).unwrap();
        assert_eq!(q, n("0"));
        assert_eq!(r, n("0.5"));
        let (q, r) = cx.div_rem(&n("-17"), &n("5")).unwrap();
        assert_eq!(q, n("-3"));
        assert_eq!(r, n("-2"));
    }

    #[test]
    fn small_factor_helpers() {
        let cx = Context::default();
        let mut x = n("12.5");
        mul_by_u32(&mut x, 8).unwrap();
        assert_eq!(x, n("100"));

        // in-place division rounds at the value's own precision
        let mut x = cx.parse_with_precision("1", 8).unwrap();
        div_by_u64(&mut x, 8, None).unwrap();
        assert_eq!(x, n("0.125"));

        let mut x = n("1000");
        let mut r = 0u64;
        div_by_u64(&mut x, 128, Some(&mut r)).unwrap();
        assert_eq!(x, n("7"));
        assert_eq!(r, 104);
    }

    #[test]
    fn compare_and_eq_round() {
        assert_eq!(compare(&n("2"), &n("3")).unwrap(), Ordering::Less);
        assert_eq!(compare(&n("-2"), &n("-3")).unwrap(), Ordering::Greater);
        assert_eq!(compare(&n("1.00"), &n("1")).unwrap(), Ordering::Equal);
        assert!(compare(&BigNum::nan(4), &n("1")).is_err());
        assert!(eq_round(&n("1.23456"), &n("1.23")));
        assert!(!eq_round(&n("1.24456"), &n("1.23")));
        assert!(eq_round(&n("1.5"), &n("1.5000")));
    }

    #[test]
    fn rounding_at_precision_boundary() {
        // 2/3 at 4 digits rounds the dropped 6 up
        let cx = Context::with_precision(4).unwrap();
        assert_eq!(cx.div(&n("2"), &n("3")).unwrap().to_string(), "0.6667");
        // additions that drop digits round half to even
        let sum = cx.add(&n("1000"), &n("0.05")).unwrap();
        assert_eq!(sum.to_string(), "1000");
    }
}
