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

//! The arbitrary-precision decimal type and its digit-level primitives.

use std::cmp::Ordering;
use std::fmt;
use std::iter::{Product, Sum};
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Rem, RemAssign, Sub, SubAssign};
use std::str::FromStr;

use static_assertions::const_assert;

use crate::context::Context;
use crate::error::{Error, InvalidBytesError, InvalidPrecisionError, ParseBigNumError};
use crate::format::{self, FormatOptions};

/// Sign bit: set if the value is negative.
pub(crate) const FLAG_NEG: u8 = 0x01;
/// Mask for the type tag bits.
pub(crate) const TYPE_MASK: u8 = 0x06;
/// Type tag for an ordinary number.
pub(crate) const TYPE_NUM: u8 = 0x00;
/// Type tag for a NaN.
pub(crate) const TYPE_NAN: u8 = 0x02;
/// Type tag for an infinity.
pub(crate) const TYPE_INF: u8 = 0x04;
/// Set if the value is exactly zero.
pub(crate) const FLAG_ZERO: u8 = 0x08;

/// Header bytes (precision, exponent, flags) preceding the packed digits in
/// the serialized representation.
const HEADER_LEN: usize = 5;

// The serialized header is two bytes of precision, two bytes of exponent, and
// one byte of flags.
const_assert!(HEADER_LEN == 2 + 2 + 1);

/// The maximum number of significant digits a [`BigNum`] can carry.
pub const MAX_PRECISION: u16 = u16::MAX;

/// An arbitrary-precision signed decimal floating-point number.
///
/// A `BigNum` stores between 1 and 65,535 significant decimal digits. The
/// precision is fixed when the value is created and never changes in place;
/// operations that need a different precision produce a new value.
///
/// The value represented is
///
/// ```text
/// (-1)^sign × 0.d₁d₂…dₚ × 10^exponent
/// ```
///
/// where `d₁…dₚ` are the stored digits, most significant first, with an
/// implied decimal point before the first digit. Non-zero values are kept
/// normalized: the leading digit is non-zero. Zero is canonicalized to a
/// positive value with exponent 1 and an all-zero mantissa.
///
/// `BigNum` also represents two special values, NaN and signed infinity. NaN
/// does not compare equal to anything, including itself, and cannot be
/// ordered.
///
/// Most operations beyond basic arithmetic live on [`Context`], which supplies
/// the scratch registers and cached constants that the transcendental
/// functions require.
#[derive(Clone)]
pub struct BigNum {
    pub(crate) prec: u16,
    pub(crate) exp: i16,
    pub(crate) flags: u8,
    /// Packed BCD digits, two per byte, high nibble first. Nibbles beyond
    /// `prec` are always zero.
    pub(crate) mant: Vec<u8>,
}

fn mant_len(prec: u16) -> usize {
    (prec as usize + 1) / 2
}

impl BigNum {
    /// Constructs a zero value with the given precision.
    ///
    /// Returns an error if `prec` is zero; valid precisions are 1 through
    /// [`MAX_PRECISION`].
    pub fn new(prec: u16) -> Result<BigNum, InvalidPrecisionError> {
        if prec == 0 {
            return Err(InvalidPrecisionError);
        }
        Ok(BigNum::with_prec(prec))
    }

    /// Constructs a zero value, assuming `prec` is non-zero.
    pub(crate) fn with_prec(prec: u16) -> BigNum {
        debug_assert!(prec > 0);
        BigNum {
            prec,
            exp: 1,
            flags: FLAG_ZERO,
            mant: vec![0; mant_len(prec)],
        }
    }

    /// Constructs a NaN with the given precision.
    pub fn nan(prec: u16) -> BigNum {
        let mut n = BigNum::with_prec(prec.max(1));
        n.flags = TYPE_NAN;
        n.exp = 0;
        n
    }

    /// Constructs an infinity with the given sign.
    pub fn infinity(negative: bool) -> BigNum {
        let mut n = BigNum::with_prec(1);
        n.flags = TYPE_INF | if negative { FLAG_NEG } else { 0 };
        n.exp = 0;
        n
    }

    /// Reports the number of significant digits this value can store.
    pub fn precision(&self) -> u16 {
        self.prec
    }

    /// Reports the base-10 exponent.
    ///
    /// The mantissa has an implied decimal point before its first digit, so
    /// for example `25` has exponent 2 and `0.025` has exponent -1. The
    /// exponent of a NaN or infinity is meaningless.
    pub fn exponent(&self) -> i16 {
        self.exp
    }

    /// Reports whether this value is exactly zero.
    pub fn is_zero(&self) -> bool {
        self.flags & FLAG_ZERO != 0
    }

    /// Reports whether this value is a NaN.
    pub fn is_nan(&self) -> bool {
        self.flags & TYPE_MASK == TYPE_NAN
    }

    /// Reports whether this value is a positive or negative infinity.
    pub fn is_infinite(&self) -> bool {
        self.flags & TYPE_MASK == TYPE_INF
    }

    /// Reports whether this value is an ordinary number, i.e. neither NaN nor
    /// infinite.
    pub fn is_finite(&self) -> bool {
        self.flags & TYPE_MASK == TYPE_NUM
    }

    /// Reports whether the sign bit is set.
    ///
    /// Zeros and NaNs are never negative.
    pub fn is_negative(&self) -> bool {
        self.flags & FLAG_NEG != 0
    }

    /// Reports whether this value has no fractional part.
    ///
    /// NaNs and infinities are not integers.
    pub fn is_integer(&self) -> bool {
        self.is_finite() && self.is_frac_zero()
    }

    /// Returns -1, 0, or 1 according to the sign of this value.
    ///
    /// Zeros and NaNs report 0; infinities report their sign.
    pub fn signum(&self) -> i32 {
        if self.is_nan() || self.is_zero() {
            0
        } else if self.is_negative() {
            -1
        } else {
            1
        }
    }

    /// Serializes this value to its portable byte representation.
    ///
    /// The layout is a two-byte little-endian precision, a two-byte
    /// little-endian signed exponent, one byte of flags, and `ceil(prec / 2)`
    /// bytes of packed BCD digits, high nibble first.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(HEADER_LEN + self.mant.len());
        buf.extend_from_slice(&self.prec.to_le_bytes());
        buf.extend_from_slice(&self.exp.to_le_bytes());
        buf.push(self.flags);
        buf.extend_from_slice(&self.mant);
        buf
    }

    /// Deserializes a value from the representation produced by
    /// [`BigNum::to_bytes`].
    pub fn from_bytes(buf: &[u8]) -> Result<BigNum, InvalidBytesError> {
        if buf.len() < HEADER_LEN {
            return Err(InvalidBytesError);
        }
        let prec = u16::from_le_bytes([buf[0], buf[1]]);
        let exp = i16::from_le_bytes([buf[2], buf[3]]);
        let flags = buf[4];
        if prec == 0
            || buf.len() != HEADER_LEN + mant_len(prec)
            || flags & !(FLAG_NEG | TYPE_MASK | FLAG_ZERO) != 0
            || flags & TYPE_MASK == TYPE_MASK
        {
            return Err(InvalidBytesError);
        }
        let mut n = BigNum {
            prec,
            exp,
            flags,
            mant: buf[HEADER_LEN..].to_vec(),
        };
        for i in 0..prec as usize {
            if n.digit(i) > 9 {
                return Err(InvalidBytesError);
            }
        }
        n.clear_pad();
        Ok(n)
    }

    /// Resets this value to zero at a new precision, reusing the digit buffer
    /// where possible.
    pub(crate) fn reset(&mut self, prec: u16) {
        debug_assert!(prec > 0);
        self.prec = prec;
        self.mant.clear();
        self.mant.resize(mant_len(prec), 0);
        self.exp = 1;
        self.flags = FLAG_ZERO;
    }

    /// Gets the digit at `idx`, most significant first.
    pub(crate) fn digit(&self, idx: usize) -> u8 {
        let b = self.mant[idx / 2];
        if idx % 2 == 0 {
            b >> 4
        } else {
            b & 0x0f
        }
    }

    /// Sets the digit at `idx`.
    pub(crate) fn set_digit(&mut self, idx: usize, dig: u8) {
        debug_assert!(dig <= 9);
        let b = &mut self.mant[idx / 2];
        if idx % 2 == 0 {
            *b = (*b & 0x0f) | (dig << 4);
        } else {
            *b = (*b & 0xf0) | dig;
        }
    }

    /// Zeroes the unused low nibble of the final mantissa byte when the
    /// precision is odd.
    fn clear_pad(&mut self) {
        if self.prec % 2 == 1 {
            if let Some(last) = self.mant.last_mut() {
                *last &= 0xf0;
            }
        }
    }

    pub(crate) fn set_negative(&mut self, neg: bool) {
        if neg {
            self.flags |= FLAG_NEG;
        } else {
            self.flags &= !FLAG_NEG;
        }
    }

    /// Flips the sign, except on zeros, which stay positive.
    pub(crate) fn negate(&mut self) {
        if !self.is_zero() {
            let neg = !self.is_negative();
            self.set_negative(neg);
        }
    }

    /// Sets this value to canonical zero: positive, exponent 1, all digits
    /// zero.
    pub(crate) fn set_zero(&mut self) {
        self.exp = 1;
        self.flags = FLAG_ZERO;
        for b in &mut self.mant {
            *b = 0;
        }
    }

    /// Stores an exponent computed at wider range, signaling overflow when it
    /// exceeds the representable maximum and flushing to zero when it falls
    /// below the representable minimum.
    pub(crate) fn store_exp(&mut self, exp: i32) -> Result<(), Error> {
        if exp > i32::from(i16::MAX) {
            Err(Error::Overflow)
        } else if exp < i32::from(i16::MIN) {
            self.set_zero();
            Ok(())
        } else {
            self.exp = exp as i16;
            Ok(())
        }
    }

    /// Shifts the digits toward the least significant end, vacating `shift`
    /// zeros at the most significant end.
    pub(crate) fn shift_right(&mut self, shift: usize) {
        let prec = self.prec as usize;
        if shift >= prec {
            for b in &mut self.mant {
                *b = 0;
            }
            return;
        }
        if shift % 2 == 0 {
            let sb = shift / 2;
            let len = self.mant.len();
            self.mant.copy_within(0..len - sb, sb);
            for b in &mut self.mant[..sb] {
                *b = 0;
            }
            self.clear_pad();
        } else {
            for i in (shift..prec).rev() {
                let d = self.digit(i - shift);
                self.set_digit(i, d);
            }
            for i in 0..shift {
                self.set_digit(i, 0);
            }
        }
    }

    /// Shifts the digits toward the most significant end, vacating `shift`
    /// zeros at the least significant end.
    pub(crate) fn shift_left(&mut self, shift: usize) {
        let prec = self.prec as usize;
        if shift == 0 {
            return;
        }
        if shift >= prec {
            for b in &mut self.mant {
                *b = 0;
            }
            return;
        }
        if shift % 2 == 0 {
            let sb = shift / 2;
            self.mant.copy_within(sb.., 0);
            let len = self.mant.len();
            for b in &mut self.mant[len - sb..] {
                *b = 0;
            }
        } else {
            for i in 0..prec - shift {
                let d = self.digit(i + shift);
                self.set_digit(i, d);
            }
        }
        // the vacated positions, plus the pad nibble, must be zeroed
        for i in prec - shift..prec {
            self.set_digit(i, 0);
        }
        self.clear_pad();
    }

    /// Normalizes in place: strips leading zero digits, adjusting the
    /// exponent to compensate, and canonicalizes zero. NaNs and infinities
    /// are left untouched.
    pub(crate) fn normalize(&mut self) {
        if !self.is_finite() {
            return;
        }
        let prec = self.prec as usize;
        let mut idx = 0;
        while idx < prec && self.digit(idx) == 0 {
            idx += 1;
        }
        // all zeros, or an exponent adjustment that would underflow, flushes
        // to zero
        if idx == prec || i32::from(self.exp) - (idx as i32) < i32::from(i16::MIN) {
            self.set_zero();
            return;
        }
        self.flags &= !FLAG_ZERO;
        if idx > 0 {
            self.shift_left(idx);
            self.exp -= idx as i16;
        }
    }

    /// Adds 1 to the absolute value, ignoring any fractional digits below the
    /// units place.
    pub(crate) fn increment_abs(&mut self) {
        let prec = self.prec as usize;
        let exp = i32::from(self.exp);
        // index just past the units digit
        let idx = if exp <= 0 { 0 } else { exp as usize };
        if idx > prec {
            // the units digit is beyond our precision; adding 1 is a no-op
            return;
        }
        let mut carry = true;
        let mut i = idx;
        while i > 0 {
            i -= 1;
            let d = self.digit(i);
            if d == 9 {
                self.set_digit(i, 0);
            } else {
                self.set_digit(i, d + 1);
                carry = false;
                break;
            }
        }
        if carry {
            // carried past the most significant digit: the result is 1
            // followed by zeros one place further left
            while self.exp < 0 {
                self.shift_right(1);
                self.exp += 1;
            }
            self.shift_right(1);
            self.exp += 1;
            self.set_digit(0, 1);
        }
        self.flags &= !FLAG_ZERO;
    }

    /// Reports whether every digit at or below the units place is zero.
    pub(crate) fn is_frac_zero(&self) -> bool {
        let prec = self.prec as usize;
        let exp = i32::from(self.exp);
        let mut idx = if exp <= 0 { 0 } else { exp as usize };
        while idx < prec {
            if self.digit(idx) != 0 {
                return false;
            }
            idx += 1;
        }
        true
    }

    /// Reports whether any digit from `from` to the least significant is
    /// non-zero.
    pub(crate) fn any_digits_from(&self, from: usize) -> bool {
        (from..self.prec as usize).any(|i| self.digit(i) != 0)
    }

    /// Determines the rounding direction for truncation to `digits` digits:
    /// true to round the magnitude up, false to round it down. Ties go to the
    /// nearest even last kept digit.
    pub(crate) fn round_dir(&self, digits: i32) -> bool {
        let prec = self.prec as usize;
        if digits >= prec as i32 {
            return false;
        }
        let digits = digits.max(0) as usize;
        let first_dropped = self.digit(digits);
        if first_dropped > 5 {
            true
        } else if first_dropped < 5 {
            false
        } else if self.any_digits_from(digits + 1) {
            true
        } else {
            // exact tie: round to even
            let last_kept = if digits == 0 { 0 } else { self.digit(digits - 1) };
            last_kept % 2 == 1
        }
    }

    /// Adds 1 to the least significant kept digit, carrying leftward. An
    /// all-nines carry-out shifts right and bumps the exponent.
    pub(crate) fn round_up_abs(&mut self, keep_digits: usize) {
        let mut carry = true;
        let mut i = keep_digits;
        while i > 0 {
            i -= 1;
            let d = self.digit(i);
            if d == 9 {
                self.set_digit(i, 0);
            } else {
                self.set_digit(i, d + 1);
                carry = false;
                break;
            }
        }
        if carry {
            self.shift_right(1);
            self.exp += 1;
            self.set_digit(0, 1);
        }
        self.flags &= !FLAG_ZERO;
    }

    /// Rounds in place to `digits` significant digits, half to even. Digits
    /// beyond the kept portion become zero.
    pub(crate) fn round_to(&mut self, digits: i32) {
        let prec = self.prec as usize;
        if digits >= prec as i32 {
            return;
        }
        let dir = self.round_dir(digits);
        let digits = digits.max(0) as usize;
        for i in digits..prec {
            self.set_digit(i, 0);
        }
        if dir {
            self.round_up_abs(digits);
        }
    }

    /// Rounds in place to the nearest integer.
    pub(crate) fn round_to_int(&mut self) {
        let exp = i32::from(self.exp);
        self.round_to(exp);
    }

    /// Applies the rounding decision for digits dropped during a calculation.
    /// `trail_dig` is the first dropped digit and `trail_val` reports whether
    /// any further dropped digit was non-zero.
    pub(crate) fn round_for_dropped(&mut self, trail_dig: u8, trail_val: bool) {
        let prec = self.prec as usize;
        if trail_dig > 5
            || (trail_dig == 5 && trail_val)
            || (trail_dig == 5 && !trail_val && self.digit(prec - 1) % 2 == 1)
        {
            self.round_up_abs(prec);
        }
    }

    /// Copies `src` into this value, which may have a different precision.
    /// Growing extends with zeros; shrinking truncates, or rounds half to
    /// even when `round` is set.
    pub(crate) fn copy_from(&mut self, src: &BigNum, round: bool) {
        let dst_prec = self.prec as usize;
        let src_prec = src.prec as usize;
        self.exp = src.exp;
        self.flags = src.flags;
        if dst_prec >= src_prec {
            let nb = mant_len(src.prec);
            self.mant[..nb].copy_from_slice(&src.mant[..nb]);
            for b in &mut self.mant[nb..] {
                *b = 0;
            }
        } else {
            let nb = mant_len(self.prec);
            self.mant[..nb].copy_from_slice(&src.mant[..nb]);
            self.clear_pad();
            if round && src.round_dir(dst_prec as i32) {
                self.round_up_abs(dst_prec);
            }
        }
    }

    /// Compares the magnitudes of two ordinary numbers, relying on both being
    /// normalized.
    pub(crate) fn compare_abs(&self, other: &BigNum) -> Ordering {
        match (self.is_zero(), other.is_zero()) {
            (true, true) => return Ordering::Equal,
            (true, false) => return Ordering::Less,
            (false, true) => return Ordering::Greater,
            (false, false) => {}
        }
        if self.exp != other.exp {
            return self.exp.cmp(&other.exp);
        }
        let p1 = self.prec as usize;
        let p2 = other.prec as usize;
        let common = p1.min(p2);
        for i in 0..common {
            match self.digit(i).cmp(&other.digit(i)) {
                Ordering::Equal => {}
                ord => return ord,
            }
        }
        // equal over the common digits; the longer value is greater only if
        // it has a non-zero digit past the end of the shorter one
        if p1 > p2 && self.any_digits_from(common) {
            Ordering::Greater
        } else if p2 > p1 && other.any_digits_from(common) {
            Ordering::Less
        } else {
            Ordering::Equal
        }
    }

    /// Exact equality: equal values of different precision are equal when the
    /// longer value's extra digits are all zero. NaNs are never equal;
    /// infinities are equal when their signs match.
    pub(crate) fn eq_exact(&self, other: &BigNum) -> bool {
        if self.is_nan() || other.is_nan() {
            return false;
        }
        if self.is_infinite() || other.is_infinite() {
            return self.is_infinite()
                && other.is_infinite()
                && self.is_negative() == other.is_negative();
        }
        if self.is_zero() || other.is_zero() {
            return self.is_zero() && other.is_zero();
        }
        if self.is_negative() != other.is_negative() || self.exp != other.exp {
            return false;
        }
        self.compare_abs(other) == Ordering::Equal
    }

    /// Stores an unsigned integer value.
    pub(crate) fn set_u64(&mut self, mut val: u64) {
        self.set_zero();
        self.flags = 0;
        let mut exp: i16 = 0;
        while val != 0 {
            self.shift_right(1);
            self.set_digit(0, (val % 10) as u8);
            exp += 1;
            val /= 10;
        }
        self.exp = exp;
        self.normalize();
    }

    /// Stores a signed integer value.
    pub(crate) fn set_i64(&mut self, val: i64) {
        self.set_u64(val.unsigned_abs());
        if val < 0 {
            self.negate();
        }
    }

    /// Stores a double value at the receiver's precision.
    ///
    /// The double is rendered through Rust's shortest round-trip decimal
    /// conversion, so exactly-representable values like `0.25` come
    /// through exactly rather than accumulating binary residue digit by
    /// digit.
    pub(crate) fn set_f64(&mut self, val: f64) {
        if val.is_nan() {
            self.set_zero();
            self.flags = TYPE_NAN;
            self.exp = 0;
            return;
        }
        if val.is_infinite() {
            self.set_zero();
            self.flags = TYPE_INF | if val < 0.0 { FLAG_NEG } else { 0 };
            self.exp = 0;
            return;
        }
        match format::parse_decimal(&format!("{:e}", val), Some(self.prec)) {
            Ok(parsed) => *self = parsed,
            // the rendering of a finite double always parses
            Err(_) => self.set_zero(),
        }
    }

    /// Converts to the nearest double.
    ///
    /// Fails for NaNs and infinities, and for magnitudes beyond the range of
    /// an `f64`.
    pub fn to_f64(&self) -> Result<f64, Error> {
        if !self.is_finite() {
            return Err(Error::Conversion);
        }
        if self.is_zero() {
            return Ok(0.0);
        }
        // the decimal rendering parses to the nearest double exactly, where
        // summing digit-by-digit powers of ten would drift by several ULPs
        let out: f64 = self
            .to_string()
            .parse()
            .map_err(|_| Error::Conversion)?;
        if !out.is_finite() {
            return Err(Error::Overflow);
        }
        Ok(out)
    }

    /// Builds a value from an unsigned integer with precision equal to the
    /// number of significant digits.
    pub(crate) fn from_u64_trim(val: u64) -> BigNum {
        let mut tmp = BigNum::with_prec(20);
        tmp.set_u64(val);
        // zeros after the decimal point aren't significant for an integer
        let digits = tmp.exp.max(1) as u16;
        let mut out = BigNum::with_prec(digits);
        out.copy_from(&tmp, false);
        out
    }

    pub(crate) fn from_i64_trim(val: i64) -> BigNum {
        let mut out = BigNum::from_u64_trim(val.unsigned_abs());
        if val < 0 {
            out.negate();
        }
        out
    }
}

impl Default for BigNum {
    fn default() -> BigNum {
        BigNum::with_prec(1)
    }
}

impl fmt::Debug for BigNum {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for BigNum {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&format::to_formatted_string(self, &FormatOptions::default()))
    }
}

impl FromStr for BigNum {
    type Err = ParseBigNumError;

    fn from_str(s: &str) -> Result<BigNum, ParseBigNumError> {
        format::parse_decimal(s, None)
    }
}

impl PartialEq for BigNum {
    fn eq(&self, other: &BigNum) -> bool {
        self.eq_exact(other)
    }
}

impl PartialOrd for BigNum {
    fn partial_cmp(&self, other: &BigNum) -> Option<Ordering> {
        crate::arith::compare(self, other).ok()
    }
}

impl Neg for BigNum {
    type Output = BigNum;

    fn neg(mut self) -> BigNum {
        self.negate();
        self
    }
}

impl Neg for &BigNum {
    type Output = BigNum;

    fn neg(self) -> BigNum {
        let mut n = self.clone();
        n.negate();
        n
    }
}

impl Sum for BigNum {
    fn sum<I>(iter: I) -> BigNum
    where
        I: Iterator<Item = BigNum>,
    {
        iter.fold(BigNum::with_prec(1), Add::add)
    }
}

impl<'a> Sum<&'a BigNum> for BigNum {
    fn sum<I>(iter: I) -> BigNum
    where
        I: Iterator<Item = &'a BigNum>,
    {
        iter.fold(BigNum::with_prec(1), Add::add)
    }
}

impl Product for BigNum {
    fn product<I>(iter: I) -> BigNum
    where
        I: Iterator<Item = BigNum>,
    {
        iter.fold(BigNum::from(1u8), Mul::mul)
    }
}

impl<'a> Product<&'a BigNum> for BigNum {
    fn product<I>(iter: I) -> BigNum
    where
        I: Iterator<Item = &'a BigNum>,
    {
        iter.fold(BigNum::from(1u8), Mul::mul)
    }
}

macro_rules! binop {
    ($trait:ident, $method:ident, $assign_trait:ident, $assign_method:ident) => {
        impl $trait for BigNum {
            type Output = BigNum;

            /// Computes the operation with a default [`Context`], so the
            /// result carries at least the default precision. Errors produce
            /// a NaN; use the [`Context`] methods to observe them.
            fn $method(self, rhs: BigNum) -> BigNum {
                $trait::$method(&self, &rhs)
            }
        }

        impl $trait<&BigNum> for BigNum {
            type Output = BigNum;

            fn $method(self, rhs: &BigNum) -> BigNum {
                $trait::$method(&self, rhs)
            }
        }

        impl $trait<BigNum> for &BigNum {
            type Output = BigNum;

            fn $method(self, rhs: BigNum) -> BigNum {
                $trait::$method(self, &rhs)
            }
        }

        impl $trait<&BigNum> for &BigNum {
            type Output = BigNum;

            fn $method(self, rhs: &BigNum) -> BigNum {
                let cx = Context::default();
                cx.$method(self, rhs)
                    .unwrap_or_else(|_| BigNum::nan(self.prec.max(rhs.prec)))
            }
        }

        impl $assign_trait for BigNum {
            fn $assign_method(&mut self, rhs: BigNum) {
                *self = $trait::$method(&*self, &rhs);
            }
        }

        impl $assign_trait<&BigNum> for BigNum {
            fn $assign_method(&mut self, rhs: &BigNum) {
                *self = $trait::$method(&*self, rhs);
            }
        }
    };
}

binop!(Add, add, AddAssign, add_assign);
binop!(Sub, sub, SubAssign, sub_assign);
binop!(Mul, mul, MulAssign, mul_assign);
binop!(Div, div, DivAssign, div_assign);
binop!(Rem, rem, RemAssign, rem_assign);

macro_rules! from_unsigned {
    ($($t:ty),*) => {
        $(
            impl From<$t> for BigNum {
                fn from(n: $t) -> BigNum {
                    BigNum::from_u64_trim(u64::from(n))
                }
            }
        )*
    };
}

macro_rules! from_signed {
    ($($t:ty),*) => {
        $(
            impl From<$t> for BigNum {
                fn from(n: $t) -> BigNum {
                    BigNum::from_i64_trim(i64::from(n))
                }
            }
        )*
    };
}

from_unsigned!(u8, u16, u32, u64);
from_signed!(i8, i16, i32, i64);

impl From<f64> for BigNum {
    /// Converts a double to a 17-digit value, enough to capture a double's
    /// full decimal precision.
    fn from(n: f64) -> BigNum {
        let mut out = BigNum::with_prec(17);
        out.set_f64(n);
        out
    }
}

impl From<f32> for BigNum {
    fn from(n: f32) -> BigNum {
        let mut out = BigNum::with_prec(9);
        out.set_f64(f64::from(n));
        out
    }
}

#[cfg(feature = "serde")]
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
impl serde::Serialize for BigNum {
    /// Serializes the value as its display string. The string form captures
    /// the value's significant digits, so deserializing it recovers an equal
    /// value, though possibly at a different stored precision.
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
impl<'de> serde::Deserialize<'de> for BigNum {
    fn deserialize<D>(deserializer: D) -> Result<BigNum, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct BigNumVisitor;

        impl<'de> serde::de::Visitor<'de> for BigNumVisitor {
            type Value = BigNum;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a decimal number string")
            }

            fn visit_str<E>(self, s: &str) -> Result<BigNum, E>
            where
                E: serde::de::Error,
            {
                BigNum::from_str(s).map_err(E::custom)
            }
        }

        deserializer.deserialize_str(BigNumVisitor)
    }
}

#[cfg(feature = "num-traits")]
#[cfg_attr(docsrs, doc(cfg(feature = "num-traits")))]
impl num_traits::Zero for BigNum {
    fn zero() -> BigNum {
        BigNum::with_prec(1)
    }

    fn is_zero(&self) -> bool {
        BigNum::is_zero(self)
    }
}

#[cfg(feature = "num-traits")]
#[cfg_attr(docsrs, doc(cfg(feature = "num-traits")))]
impl num_traits::One for BigNum {
    fn one() -> BigNum {
        BigNum::from(1u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(s: &str) -> BigNum {
        s.parse().unwrap()
    }

    #[test]
    fn digit_packing() {
        let mut x = BigNum::with_prec(5);
        for (i, d) in [1u8, 2, 3, 4, 5].iter().enumerate() {
            x.set_digit(i, *d);
        }
        assert_eq!(x.mant, vec![0x12, 0x34, 0x50]);
        assert_eq!(x.digit(0), 1);
        assert_eq!(x.digit(4), 5);
    }

    #[test]
    fn shifts_preserve_pad_nibble() {
        let mut x = BigNum::with_prec(5);
        for i in 0..5 {
            x.set_digit(i, 9);
        }
        x.shift_right(2);
        assert_eq!(x.mant, vec![0x00, 0x99, 0x90]);
        x.shift_left(2);
        assert_eq!(x.mant, vec![0x99, 0x90, 0x00]);
    }

    #[test]
    fn normalize_strips_leading_zeros() {
        let mut x = BigNum::with_prec(4);
        x.flags = 0;
        x.exp = 3;
        x.set_digit(2, 7);
        x.normalize();
        assert_eq!(x.exp, 1);
        assert_eq!(x.digit(0), 7);
        assert!(!x.is_zero());
        // normalizing again changes nothing
        let before = x.to_bytes();
        x.normalize();
        assert_eq!(x.to_bytes(), before);
    }

    #[test]
    fn normalize_canonicalizes_zero() {
        let mut x = BigNum::with_prec(4);
        x.flags = FLAG_NEG;
        x.exp = -7;
        x.normalize();
        assert!(x.is_zero());
        assert!(!x.is_negative());
        assert_eq!(x.exp, 1);
    }

    #[test]
    fn round_half_to_even() {
        let mut x = n("2.345");
        x.round_to(3);
        x.normalize();
        assert_eq!(x.to_string(), "2.34");
        let mut y = n("2.355");
        y.round_to(3);
        y.normalize();
        assert_eq!(y.to_string(), "2.36");
    }

    #[test]
    fn round_up_carries_through_nines() {
        let mut x = n("9.9999");
        x.round_to(2);
        x.normalize();
        assert_eq!(x.to_string(), "10");
    }

    #[test]
    fn increment_abs_basic() {
        let mut x = n("41");
        x.increment_abs();
        assert_eq!(x.to_string(), "42");
        let mut y = n("0.50");
        y.increment_abs();
        y.normalize();
        assert_eq!(y.to_string(), "1.5");
        let mut z = n("99");
        z.increment_abs();
        z.normalize();
        assert_eq!(z.to_string(), "100");
    }

    #[test]
    fn bytes_round_trip() {
        for s in &["0", "1", "-123.456", "0.00001", "98765432109876543210"] {
            let x = n(s);
            let buf = x.to_bytes();
            let y = BigNum::from_bytes(&buf).unwrap();
            assert_eq!(x, y, "{}", s);
            assert_eq!(x.precision(), y.precision());
            assert_eq!(x.exponent(), y.exponent());
        }
    }

    #[test]
    fn bytes_layout() {
        // 25 = 0.25 × 10²
        let x = n("25");
        assert_eq!(x.to_bytes(), vec![2, 0, 2, 0, 0, 0x25]);
        let y = n("-0.025");
        assert_eq!(y.to_bytes(), vec![2, 0, 0xff, 0xff, 0x01, 0x25]);
    }

    #[test]
    fn bytes_rejects_garbage() {
        assert!(BigNum::from_bytes(&[]).is_err());
        // zero precision
        assert!(BigNum::from_bytes(&[0, 0, 1, 0, 0]).is_err());
        // length mismatch
        assert!(BigNum::from_bytes(&[2, 0, 1, 0, 0]).is_err());
        // non-BCD digit
        assert!(BigNum::from_bytes(&[2, 0, 1, 0, 0, 0xab]).is_err());
        // invalid type tag
        assert!(BigNum::from_bytes(&[2, 0, 1, 0, 0x06, 0x12]).is_err());
    }

    #[test]
    fn exact_equality_across_precisions() {
        assert_eq!(n("1.0"), n("1.00"));
        assert_ne!(n("1.0"), n("1.01"));
        assert_eq!(n("0"), n("0.000"));
        let nan = BigNum::nan(8);
        assert_ne!(nan, nan.clone());
        assert_eq!(BigNum::infinity(false), BigNum::infinity(false));
        assert_ne!(BigNum::infinity(false), BigNum::infinity(true));
    }

    #[test]
    fn ordering() {
        assert!(n("1.5") < n("2"));
        assert!(n("-3") < n("-2"));
        assert!(n("-1") < n("0.5"));
        assert!(n("0.001") > n("0.0009"));
        assert_eq!(n("2").partial_cmp(&BigNum::nan(4)), None);
        assert!(BigNum::infinity(true) < n("-999999"));
        assert!(BigNum::infinity(false) > n("999999"));
    }

    #[test]
    fn integer_conversions() {
        assert_eq!(BigNum::from(0u8).to_string(), "0");
        assert_eq!(BigNum::from(12345u32).to_string(), "12345");
        assert_eq!(BigNum::from(-987i64).to_string(), "-987");
        assert_eq!(BigNum::from(12345u32).precision(), 5);
        assert_eq!(BigNum::from(i64::MIN).to_string(), "-9223372036854775808");
    }

    #[test]
    fn float_conversions() {
        assert_eq!(BigNum::from(0.25f64).to_string(), "0.25");
        assert_eq!(BigNum::from(0.1f64).to_string(), "0.1");
        assert_eq!(BigNum::from(-1.5f64).to_string(), "-1.5");
        assert_eq!(BigNum::from(1e100f64).to_f64().unwrap(), 1e100);
        assert!(BigNum::from(f64::NAN).is_nan());
        assert!(BigNum::from(f64::INFINITY).is_infinite());
        assert_eq!(n("0.25").to_f64().unwrap(), 0.25);
        assert_eq!(n("-12345.5").to_f64().unwrap(), -12345.5);
        assert!(BigNum::nan(4).to_f64().is_err());
    }

    #[test]
    fn signum_and_predicates() {
        assert_eq!(n("-2.5").signum(), -1);
        assert_eq!(n("0").signum(), 0);
        assert_eq!(n("17").signum(), 1);
        assert!(n("42").is_integer());
        assert!(!n("42.5").is_integer());
        assert!(n("41000").is_integer());
    }

    #[test]
    fn operator_sugar() {
        assert_eq!(n("1.5") + n("2.5"), n("4"));
        assert_eq!(n("10") - n("0.5"), n("9.5"));
        assert_eq!(n("1.5") * n("4"), n("6"));
        assert_eq!(n("1") / n("8"), n("0.125"));
        assert_eq!(-n("3"), n("-3"));
        // errors surface as NaN through the sugar
        assert!((n("1") / n("0")).is_nan());
        let mut x = n("1");
        x += n("2");
        assert_eq!(x, n("3"));
    }
}
