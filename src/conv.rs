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

//! Conversions between decimal values and machine and interchange formats.
//!
//! Three binary interchange formats are supported, in addition to the
//! plain machine-integer conversions:
//!
//!   * IEEE 754 binary floating point, in the 16-, 32-, 64-, and 128-bit
//!     widths, as little-endian byte strings.
//!
//!   * BER compressed integers: base-128 digits, most significant first,
//!     with the high bit set on every byte but the last.
//!
//!   * A portable 64-bit integer format: little-endian two's complement.
//!
//! The engine has no binary exponent primitive, so the IEEE conversions
//! go through the decimal transcendental kernels: the binary exponent of
//! a value is found by computing `ln(x)/ln(2)` and flooring it, and
//! mantissa bits are then extracted one at a time by doubling and
//! subtracting.

use std::cmp::Ordering;
use std::convert::TryFrom;
use std::mem;

use paste::paste;

use crate::arith;
use crate::bignum::BigNum;
use crate::context::Context;
use crate::error::{Error, TryFromBigNumError};
use crate::transcend;

/// Field widths of the supported IEEE 754 binary formats.
fn ieee754_layout(bits: u32) -> Result<(u32, u32), Error> {
    match bits {
        16 => Ok((5, 10)),
        32 => Ok((8, 23)),
        64 => Ok((11, 52)),
        128 => Ok((15, 112)),
        _ => Err(Error::Conversion),
    }
}

/// Decimal digits carried by a decoded IEEE 754 value, enough in each
/// width for distinct bit patterns to decode to distinct decimals.
fn ieee754_decimal_digits(bits: u32) -> u16 {
    match bits {
        16 => 5,
        32 => 9,
        64 => 17,
        _ => 36,
    }
}

impl BigNum {
    fn int_magnitude(&self) -> Result<u64, TryFromBigNumError> {
        if !self.is_finite() {
            return Err(TryFromBigNumError);
        }
        let exp = i32::from(self.exponent());
        if exp < 0 {
            // the first significant digit is beyond the rounding position
            return Ok(0);
        }
        let round_inc = u64::from(self.round_dir(exp));
        let prec = self.precision() as i32;
        let stop_idx = exp.max(0).min(prec) as usize;

        let mut acc: u64 = 0;
        for idx in 0..stop_idx {
            acc = acc
                .checked_mul(10)
                .and_then(|acc| acc.checked_add(u64::from(self.digit(idx))))
                .ok_or(TryFromBigNumError)?;
        }
        // trailing zeros when the exponent outruns the stored digits
        for _ in stop_idx..exp.max(0) as usize {
            acc = acc.checked_mul(10).ok_or(TryFromBigNumError)?;
        }
        acc.checked_add(round_inc).ok_or(TryFromBigNumError)
    }

    fn to_int<T>(&self) -> Result<T, TryFromBigNumError>
    where
        T: TryFrom<i128>,
    {
        let m = i128::from(self.int_magnitude()?);
        let v = if self.is_negative() { -m } else { m };
        T::try_from(v).map_err(|_| TryFromBigNumError)
    }

    /// Converts the value to a BER compressed integer.
    ///
    /// The value is rounded to the nearest whole number first. Errors on
    /// a negative, NaN, or infinite value, since the format is unsigned.
    pub fn to_ber(&self) -> Result<Vec<u8>, Error> {
        if !self.is_finite() || self.is_negative() {
            return Err(Error::Conversion);
        }

        let mut tmp = BigNum::with_prec(self.precision());
        tmp.copy_from(self, true);
        tmp.round_to_int();

        // base-128 digits, least significant first
        let mut out = Vec::new();
        while !tmp.is_zero() {
            let mut rem = 0;
            arith::div_by_u64(&mut tmp, 128, Some(&mut rem))?;
            out.push(rem as u8);
        }
        if out.is_empty() {
            out.push(0);
        }
        out.reverse();
        let last = out.len() - 1;
        for byte in &mut out[..last] {
            *byte |= 0x80;
        }
        Ok(out)
    }

    /// Decodes a BER compressed integer.
    ///
    /// The result's precision covers the full magnitude the encoding can
    /// carry: seven bits, or `7·log10(2)` decimal digits, per byte.
    pub fn from_ber(buf: &[u8]) -> Result<BigNum, Error> {
        let (&last, rest) = buf.split_last().ok_or(Error::Conversion)?;
        if last & 0x80 != 0 || rest.iter().any(|&b| b & 0x80 == 0) {
            return Err(Error::Conversion);
        }

        let prec = ((buf.len() * 7) as f64 * 0.30103 + 1.0).ceil() as u16;
        let mut t1 = BigNum::with_prec(prec.max(1));
        t1.flags = 0;
        let mut t2 = BigNum::with_prec(prec.max(1));
        for &byte in buf {
            arith::mul_by_u32(&mut t1, 128)?;
            arith::abs_sum_into(&mut t2, &t1, &BigNum::from(byte & 0x7f))?;
            mem::swap(&mut t1, &mut t2);
        }
        t1.normalize();
        Ok(t1)
    }

    /// Converts the value to the portable 64-bit integer format:
    /// little-endian, two's complement when `signed`.
    ///
    /// The value is rounded to the nearest whole number first. Errors
    /// when the result does not fit, or on an unsigned conversion of a
    /// negative value.
    pub fn to_int64_bytes(&self, signed: bool) -> Result<[u8; 8], Error> {
        if !self.is_finite() {
            return Err(Error::Conversion);
        }
        // anything beyond 20 digits is out of 64-bit range regardless
        if self.exponent() > 20 {
            return Err(Error::Overflow);
        }

        // a low-precision value can still carry a 20-digit magnitude, so the
        // working copy is always sized for the full 64-bit range
        let mut tmp = BigNum::with_prec(20);
        tmp.copy_from(self, true);
        tmp.round_to_int();

        // split into 32-bit words by dividing off the low word
        let mut lo = 0;
        arith::div_by_u64(&mut tmp, 1 << 32, Some(&mut lo))?;
        let hi = tmp.int_magnitude().map_err(|_| Error::Overflow)?;
        if hi > u64::from(u32::MAX) {
            return Err(Error::Overflow);
        }

        let mut buf = [0; 8];
        buf[..4].copy_from_slice(&(lo as u32).to_le_bytes());
        buf[4..].copy_from_slice(&(hi as u32).to_le_bytes());

        if self.is_negative() {
            if !signed {
                return Err(Error::Overflow);
            }
            twos_complement(&mut buf);
            if buf[7] & 0x80 == 0 {
                return Err(Error::Overflow);
            }
        } else if signed && buf[7] & 0x80 != 0 {
            return Err(Error::Overflow);
        }
        Ok(buf)
    }

    /// Decodes the portable 64-bit integer format.
    pub fn from_int64_bytes(buf: [u8; 8], signed: bool) -> BigNum {
        if signed {
            BigNum::from(i64::from_le_bytes(buf))
        } else {
            BigNum::from(u64::from_le_bytes(buf))
        }
    }
}

fn twos_complement(buf: &mut [u8; 8]) {
    let mut carry = true;
    for byte in buf.iter_mut() {
        *byte = (!*byte).wrapping_add(carry as u8);
        carry = carry && *byte == 0;
    }
}

macro_rules! to_int_fns {
    ($($t:ty),*) => {
        $(
            paste! {
                impl BigNum {
                    #[doc = "Converts the value to `" $t "`, rounding the"]
                    #[doc = "fraction to the nearest whole number."]
                    #[doc = ""]
                    #[doc = "Errors when the rounded value is out of range"]
                    #[doc = "or is NaN or infinite."]
                    pub fn [<to_ $t>](&self) -> Result<$t, TryFromBigNumError> {
                        self.to_int()
                    }
                }

                impl TryFrom<&BigNum> for $t {
                    type Error = TryFromBigNumError;

                    fn try_from(n: &BigNum) -> Result<$t, TryFromBigNumError> {
                        n.[<to_ $t>]()
                    }
                }

                impl TryFrom<BigNum> for $t {
                    type Error = TryFromBigNumError;

                    fn try_from(n: BigNum) -> Result<$t, TryFromBigNumError> {
                        n.[<to_ $t>]()
                    }
                }
            }
        )*
    };
}

to_int_fns!(i32, u32, i64, u64);

/// Computes 2^n at the given precision, via `exp(n·ln 2)`.
fn pow2(cx: &Context, prec: u16, n: i32) -> Result<BigNum, Error> {
    let mut dst = BigNum::with_prec(prec);
    if n == 0 {
        dst.copy_from(&BigNum::from(1u8), false);
        return Ok(dst);
    }
    let ln2 = transcend::const_ln2(cx, prec)?;
    let mut t = BigNum::with_prec(prec);
    arith::prod_into(&mut t, &BigNum::from(n), &ln2)?;
    transcend::exp_into(cx, &mut dst, &t)?;
    Ok(dst)
}

impl Context {
    /// Encodes `x` in the IEEE 754 binary format of the given width (16,
    /// 32, 64, or 128 bits), as little-endian bytes.
    ///
    /// Rounding to the nearest representable value is round-half-to-even
    /// at the final mantissa bit. Values beyond the format's range encode
    /// as infinities; values below its smallest subnormal encode as zero.
    pub fn encode_ieee754(&self, x: &BigNum, bits: u32) -> Result<Vec<u8>, Error> {
        let (exp_bits, mant_bits) = ieee754_layout(bits)?;
        let bias = (1i32 << (exp_bits - 1)) - 1;
        let emin = 1 - bias;
        let sign = x.is_negative();

        let inf_pattern = |sign: bool| {
            let expf = ((1u128 << exp_bits) - 1) << mant_bits;
            pack_bits(expf, sign, bits)
        };

        if x.is_nan() {
            // a quiet NaN: exponent all ones, top mantissa bit set
            let expf = ((1u128 << exp_bits) - 1) << mant_bits;
            let mant = 1u128 << (mant_bits - 1);
            return Ok(pack_bits(expf | mant, false, bits));
        }
        if x.is_infinite() {
            return Ok(inf_pattern(sign));
        }
        if x.is_zero() {
            return Ok(pack_bits(0, sign, bits));
        }

        // The bit peel doubles any error in the scaled mantissa up to
        // 2^mant_bits times, so the working precision has to cover the
        // full mantissa width on top of the input's own digits before
        // the final round bit can be trusted.
        let wp = (mant_bits as u16 + 16).max(x.precision().saturating_add(2));
        let one = BigNum::from(1u8);
        let two = BigNum::from(2u8);

        let mut abs = BigNum::with_prec(wp);
        abs.copy_from(x, true);
        abs.set_negative(false);

        // binary exponent: floor(ln|x| / ln 2)
        let mut ln_x = BigNum::with_prec(wp);
        transcend::ln_into(self, &mut ln_x, &abs)?;
        let ln2 = transcend::const_ln2(self, wp)?;
        let mut l2 = BigNum::with_prec(wp);
        arith::quotient_into(self, &mut l2, None, &ln_x, &ln2)?;
        let mut e = self.floor(&l2).to_i32().map_err(|_| Error::Overflow)?;

        // scale into [1, 2), correcting for log rounding error
        let mut m = BigNum::with_prec(wp);
        arith::quotient_into(self, &mut m, None, &abs, &pow2(self, wp, e)?)?;
        while arith::compare(&m, &two)? != Ordering::Less {
            arith::div_by_u64(&mut m, 2, None)?;
            e += 1;
        }
        while arith::compare(&m, &one)? == Ordering::Less {
            arith::mul_by_u32(&mut m, 2)?;
            e -= 1;
        }

        if e > bias {
            return Ok(inf_pattern(sign));
        }

        // below the normal range the leading bit is no longer implied
        let mut implied = true;
        if e < emin {
            let shift = emin - e;
            if shift > mant_bits as i32 + 1 {
                return Ok(pack_bits(0, sign, bits));
            }
            let mut t = BigNum::with_prec(wp);
            arith::quotient_into(self, &mut t, None, &m, &pow2(self, wp, shift)?)?;
            m = t;
            implied = false;
            e = emin;
        }

        let mut r = m;
        if implied {
            let mut t = BigNum::with_prec(wp);
            arith::diff_into(&mut t, &r, &one)?;
            r = t;
        }

        // peel off mantissa bits by doubling and subtracting
        let mut mant: u128 = 0;
        let mut t = BigNum::with_prec(wp);
        for _ in 0..mant_bits {
            arith::mul_by_u32(&mut r, 2)?;
            mant <<= 1;
            if arith::compare(&r, &one)? != Ordering::Less {
                mant |= 1;
                arith::diff_into(&mut t, &r, &one)?;
                mem::swap(&mut r, &mut t);
            }
        }

        // round to nearest, ties to even
        arith::mul_by_u32(&mut r, 2)?;
        let round_up = match arith::compare(&r, &one)? {
            Ordering::Greater => true,
            Ordering::Equal => mant & 1 == 1,
            Ordering::Less => false,
        };
        if round_up {
            mant += 1;
            if mant >> mant_bits != 0 {
                mant = 0;
                if implied {
                    e += 1;
                    if e > bias {
                        return Ok(inf_pattern(sign));
                    }
                } else {
                    // a subnormal rounded up into the smallest normal
                    implied = true;
                }
            }
        }

        let expf = if implied {
            ((e + bias) as u128) << mant_bits
        } else {
            0
        };
        Ok(pack_bits(expf | mant, sign, bits))
    }

    /// Decodes a little-endian IEEE 754 binary value of 16, 32, 64, or
    /// 128 bits, producing a decimal wide enough that distinct bit
    /// patterns stay distinct.
    pub fn decode_ieee754(&self, buf: &[u8]) -> Result<BigNum, Error> {
        let bits = buf.len() as u32 * 8;
        let (exp_bits, mant_bits) = ieee754_layout(bits)?;
        let bias = (1i32 << (exp_bits - 1)) - 1;
        let prec = ieee754_decimal_digits(bits);

        let mut v: u128 = 0;
        for &byte in buf.iter().rev() {
            v = v << 8 | u128::from(byte);
        }
        let sign = v >> (bits - 1) & 1 == 1;
        let expf = (v >> mant_bits) & ((1 << exp_bits) - 1);
        let mut mant = v & ((1u128 << mant_bits) - 1);

        if expf == (1 << exp_bits) - 1 {
            return Ok(if mant == 0 {
                BigNum::infinity(sign)
            } else {
                BigNum::nan(prec)
            });
        }
        if expf == 0 && mant == 0 {
            return Ok(BigNum::with_prec(prec));
        }

        let e = if expf == 0 {
            1 - bias
        } else {
            mant |= 1 << mant_bits;
            expf as i32 - bias
        };

        // value = mant × 2^(e - mant_bits)
        let wp = prec + 10;
        let mut acc = BigNum::with_prec(wp);
        acc.flags = 0;
        let mut t = BigNum::with_prec(wp);
        let nbytes = (mant_bits as usize + 8) / 8;
        for i in (0..nbytes).rev() {
            let byte = (mant >> (i * 8)) as u8;
            arith::mul_by_u32(&mut acc, 256)?;
            arith::abs_sum_into(&mut t, &acc, &BigNum::from(byte))?;
            mem::swap(&mut acc, &mut t);
        }
        acc.normalize();

        let mut scaled = BigNum::with_prec(wp);
        arith::prod_into(&mut scaled, &acc, &pow2(self, wp, e - mant_bits as i32)?)?;
        scaled.set_negative(sign);

        let mut out = BigNum::with_prec(prec);
        out.copy_from(&scaled, true);
        Ok(out)
    }
}

fn pack_bits(v: u128, sign: bool, bits: u32) -> Vec<u8> {
    let v = v | (u128::from(sign) << (bits - 1));
    v.to_le_bytes()[..bits as usize / 8].to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(s: &str) -> BigNum {
        s.parse().unwrap()
    }

    #[test]
    fn integer_conversions() {
        assert_eq!(n("42").to_i32().unwrap(), 42);
        assert_eq!(n("-42").to_i32().unwrap(), -42);
        assert_eq!(n("2.5").to_i32().unwrap(), 2);
        assert_eq!(n("3.5").to_i32().unwrap(), 4);
        assert_eq!(n("-2.5").to_i32().unwrap(), -2);
        assert_eq!(n("0.4").to_i32().unwrap(), 0);
        assert_eq!(n("2147483647").to_i32().unwrap(), i32::MAX);
        assert_eq!(n("-2147483648").to_i32().unwrap(), i32::MIN);
        assert!(n("2147483648").to_i32().is_err());
        assert!(n("1e40").to_i32().is_err());
        assert!(n("-1").to_u32().unwrap_err() == TryFromBigNumError);
        assert_eq!(n("4294967295").to_u32().unwrap(), u32::MAX);
        assert_eq!(
            n("9223372036854775807").to_i64().unwrap(),
            i64::MAX
        );
        assert_eq!(
            n("18446744073709551615").to_u64().unwrap(),
            u64::MAX
        );
        assert!(n("18446744073709551616").to_u64().is_err());
        assert!(BigNum::nan(4).to_i32().is_err());
        assert!(BigNum::infinity(false).to_i64().is_err());
        assert_eq!(i32::try_from(n("7")).unwrap(), 7);
    }

    #[test]
    fn ber_round_trips() {
        for s in &["0", "1", "127", "128", "300", "16384", "123456789012345678901234567890"] {
            let v = n(s);
            let enc = v.to_ber().unwrap();
            assert_eq!(BigNum::from_ber(&enc).unwrap(), v, "{}", s);
        }
        assert_eq!(n("0").to_ber().unwrap(), vec![0]);
        assert_eq!(n("127").to_ber().unwrap(), vec![0x7f]);
        assert_eq!(n("128").to_ber().unwrap(), vec![0x81, 0x00]);
        assert_eq!(n("300").to_ber().unwrap(), vec![0x82, 0x2c]);
        assert!(n("-1").to_ber().is_err());
        assert!(BigNum::from_ber(&[]).is_err());
        assert!(BigNum::from_ber(&[0x81]).is_err());
    }

    #[test]
    fn portable_int64_round_trips() {
        for s in &["0", "1", "-1", "42", "-123456789", "9223372036854775807"] {
            let v = n(s);
            let buf = v.to_int64_bytes(true).unwrap();
            assert_eq!(BigNum::from_int64_bytes(buf, true), v, "{}", s);
        }
        let buf = n("-9223372036854775808").to_int64_bytes(true).unwrap();
        assert_eq!(BigNum::from_int64_bytes(buf, true), n("-9223372036854775808"));
        assert!(n("9223372036854775808").to_int64_bytes(true).is_err());
        assert!(n("-1").to_int64_bytes(false).is_err());
        let buf = n("18446744073709551615").to_int64_bytes(false).unwrap();
        assert_eq!(buf, [0xff; 8]);
    }

    #[test]
    fn portable_int64_of_low_precision_magnitude() {
        // one stored digit, fifteen digits of magnitude
        let v = n("1e15");
        assert_eq!(v.precision(), 1);
        let buf = v.to_int64_bytes(true).unwrap();
        assert_eq!(buf, 1_000_000_000_000_000i64.to_le_bytes());
        assert_eq!(BigNum::from_int64_bytes(buf, true), v);
    }

    #[test]
    fn ieee754_matches_native_doubles() {
        let cx = Context::default();
        for &f in &[0.5f64, 1.5, -2.25, 100.0, 0.1, -1234.5678, 1e100, 5e-300] {
            let enc = cx.encode_ieee754(&BigNum::from(f), 64).unwrap();
            assert_eq!(enc, f.to_bits().to_le_bytes().to_vec(), "{}", f);
        }
    }

    #[test]
    fn ieee754_round_trips() {
        let cx = Context::default();
        for s in &["0.5", "-42", "3.25", "0.1"] {
            let v = n(s);
            let enc = cx.encode_ieee754(&v, 64).unwrap();
            let dec = cx.decode_ieee754(&enc).unwrap();
            assert_eq!(cx.encode_ieee754(&dec, 64).unwrap(), enc, "{}", s);
        }
    }

    #[test]
    fn ieee754_special_values() {
        let cx = Context::default();
        let enc = cx.encode_ieee754(&BigNum::infinity(false), 64).unwrap();
        assert_eq!(enc, f64::INFINITY.to_bits().to_le_bytes().to_vec());
        let enc = cx.encode_ieee754(&BigNum::infinity(true), 32).unwrap();
        assert_eq!(enc, f32::NEG_INFINITY.to_bits().to_le_bytes().to_vec());
        let enc = cx.encode_ieee754(&BigNum::nan(8), 64).unwrap();
        assert!(cx.decode_ieee754(&enc).unwrap().is_nan());
        let enc = cx.encode_ieee754(&n("0"), 16).unwrap();
        assert_eq!(enc, vec![0, 0]);
        assert!(cx.decode_ieee754(&enc).unwrap().is_zero());
        // overflow and underflow clamp to infinity and zero
        let enc = cx.encode_ieee754(&n("1e500"), 64).unwrap();
        assert_eq!(enc, f64::INFINITY.to_bits().to_le_bytes().to_vec());
        let enc = cx.encode_ieee754(&n("1e-500"), 64).unwrap();
        assert_eq!(enc, vec![0; 8]);
    }

    #[test]
    fn ieee754_half_and_quad_widths() {
        let cx = Context::default();
        // 1.5 in binary16: sign 0, exponent 0, mantissa .1 -> 0x3e00
        let enc = cx.encode_ieee754(&n("1.5"), 16).unwrap();
        assert_eq!(enc, vec![0x00, 0x3e]);
        let dec = cx.decode_ieee754(&enc).unwrap();
        assert_eq!(dec, n("1.5"));
        // 1.0 in binary128: biased exponent 0x3fff, zero mantissa
        let enc = cx.encode_ieee754(&n("1"), 128).unwrap();
        let mut expect = vec![0u8; 16];
        expect[14] = 0xff;
        expect[15] = 0x3f;
        assert_eq!(enc, expect);
        assert_eq!(cx.decode_ieee754(&enc).unwrap(), n("1"));
    }

    #[test]
    fn ieee754_subnormals() {
        let cx = Context::default();
        let tiny = BigNum::from((2f64).powi(-130));
        let enc = cx.encode_ieee754(&tiny, 32).unwrap();
        assert_eq!(
            enc,
            ((2f32).powi(-130)).to_bits().to_le_bytes().to_vec()
        );
        let dec = cx.decode_ieee754(&enc).unwrap();
        assert_eq!(cx.encode_ieee754(&dec, 32).unwrap(), enc);
    }

    #[test]
    fn ieee754_rejects_bad_widths() {
        let cx = Context::default();
        assert!(cx.encode_ieee754(&n("1"), 24).is_err());
        assert!(cx.decode_ieee754(&[0; 3]).is_err());
    }
}
