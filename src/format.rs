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

//! String parsing and formatting.
//!
//! Parsing accepts decimal strings in fixed or exponential notation, plus
//! whole-number strings in any radix from 2 to 36, with the radix
//! optionally inferred from a `0x` or leading-zero prefix. Formatting is
//! driven by [`FormatOptions`], which controls notation, digit budgets,
//! grouping, padding, and sign display.

use std::mem;

use crate::arith;
use crate::bignum::BigNum;
use crate::error::{Error, ParseBigNumError};

/// Options controlling the string rendering of a [`BigNum`].
///
/// The default options produce the notation used by `BigNum`'s `Display`
/// implementation: fixed-point with a leading zero for pure fractions, no
/// digit limit, and trailing zeros trimmed, switching to scientific
/// notation only when a digit cap forces it.
///
/// ```
/// use bignum::{BigNum, FormatOptions};
///
/// let n: BigNum = "1234.5".parse().unwrap();
/// let opts = FormatOptions::default().commas(true).frac_digits(2);
/// assert_eq!(n.format(&opts), "1,234.50");
/// ```
#[derive(Debug, Clone, Default)]
pub struct FormatOptions {
    max_digits: Option<u16>,
    whole_places: Option<u16>,
    frac_digits: Option<u16>,
    exp_digits: Option<u16>,
    scientific: bool,
    exp_sign: bool,
    exp_caps: bool,
    compact: bool,
    max_sig: bool,
    trailing_zeros: bool,
    pos_sign: bool,
    pos_space: bool,
    no_lead_zero: bool,
    always_point: bool,
    commas: bool,
    euro: bool,
    lead_fill: Option<String>,
}

impl FormatOptions {
    /// Limits the output to at most `max` digits, switching to scientific
    /// notation when the whole part alone would not fit.
    pub fn max_digits(mut self, max: u16) -> FormatOptions {
        self.max_digits = Some(max);
        self
    }

    /// Counts the `max_digits` budget in significant digits, so leading
    /// zeros do not consume it.
    pub fn max_significant(mut self, yes: bool) -> FormatOptions {
        self.max_sig = yes;
        self
    }

    /// Pads the whole part to at least `places` digit positions.
    pub fn whole_places(mut self, places: u16) -> FormatOptions {
        self.whole_places = Some(places);
        self
    }

    /// Shows exactly `digits` digits after the decimal point, padding with
    /// zeros or rounding as needed.
    pub fn frac_digits(mut self, digits: u16) -> FormatOptions {
        self.frac_digits = Some(digits);
        self
    }

    /// Pads the exponent to at least `digits` digits.
    pub fn exp_digits(mut self, digits: u16) -> FormatOptions {
        self.exp_digits = Some(digits);
        self
    }

    /// Forces scientific notation.
    pub fn scientific(mut self, yes: bool) -> FormatOptions {
        self.scientific = yes;
        self
    }

    /// Writes a sign before non-negative exponents.
    pub fn exp_sign(mut self, yes: bool) -> FormatOptions {
        self.exp_sign = yes;
        self
    }

    /// Uses `E` rather than `e` to introduce the exponent.
    pub fn exp_caps(mut self, yes: bool) -> FormatOptions {
        self.exp_caps = yes;
        self
    }

    /// Chooses between fixed and scientific notation the way `printf`'s
    /// `%g` does: scientific when the displayed exponent drops below -4
    /// or exceeds the digit budget.
    pub fn compact(mut self, yes: bool) -> FormatOptions {
        self.compact = yes;
        self
    }

    /// Keeps trailing zeros, padding out to the `max_digits` budget.
    pub fn trailing_zeros(mut self, yes: bool) -> FormatOptions {
        self.trailing_zeros = yes;
        self
    }

    /// Writes a `+` before positive values.
    pub fn pos_sign(mut self, yes: bool) -> FormatOptions {
        self.pos_sign = yes;
        self
    }

    /// Writes a space before positive values, aligning them with negative
    /// ones.
    pub fn pos_space(mut self, yes: bool) -> FormatOptions {
        self.pos_space = yes;
        self
    }

    /// Suppresses the zero before the decimal point in pure fractions,
    /// rendering `.5` rather than `0.5`.
    pub fn no_lead_zero(mut self, yes: bool) -> FormatOptions {
        self.no_lead_zero = yes;
        self
    }

    /// Shows the decimal point even when no fractional digits follow it.
    pub fn always_point(mut self, yes: bool) -> FormatOptions {
        self.always_point = yes;
        self
    }

    /// Groups whole-part digits in threes.
    pub fn commas(mut self, yes: bool) -> FormatOptions {
        self.commas = yes;
        self
    }

    /// Uses European punctuation: a comma for the decimal point and
    /// periods for grouping.
    pub fn euro(mut self, yes: bool) -> FormatOptions {
        self.euro = yes;
        self
    }

    /// Fills whole-part padding by cycling through `fill` rather than
    /// using spaces.
    pub fn lead_fill<S>(mut self, fill: S) -> FormatOptions
    where
        S: Into<String>,
    {
        self.lead_fill = Some(fill.into());
        self
    }
}

impl BigNum {
    /// Formats the value according to `opts`.
    ///
    /// NaN renders as `1.#NAN` and infinities as `1.#INF` or `-1.#INF`,
    /// whatever the options.
    pub fn format(&self, opts: &FormatOptions) -> String {
        to_formatted_string(self, opts)
    }

    /// Formats the whole part of the value in the given radix, 2 through
    /// 36, rounding the fractional part to the nearest integer first.
    ///
    /// Digits above 9 render as capital letters. Errors on a NaN or
    /// infinite value or an out-of-range radix.
    pub fn to_radix_string(&self, radix: u32) -> Result<String, Error> {
        if radix < 2 || radix > 36 {
            return Err(Error::Conversion);
        }
        if !self.is_finite() {
            return Err(Error::Conversion);
        }

        let mut tmp = BigNum::with_prec(self.precision());
        tmp.copy_from(self, true);
        tmp.round_to_int();
        let neg = tmp.is_negative();

        let mut digits = Vec::new();
        while !tmp.is_zero() {
            let mut rem = 0;
            arith::div_by_u64(&mut tmp, u64::from(radix), Some(&mut rem))?;
            digits.push(radix_digit(rem as u32));
        }
        if digits.is_empty() {
            digits.push('0');
        }

        let mut out = String::with_capacity(digits.len() + 1);
        if neg {
            out.push('-');
        }
        out.extend(digits.iter().rev());
        Ok(out)
    }
}

fn radix_digit(d: u32) -> char {
    debug_assert!(d < 36);
    match d {
        0..=9 => (b'0' + d as u8) as char,
        _ => (b'A' + (d - 10) as u8) as char,
    }
}

// ---------------------------------------------------------------------------
// Formatting

pub(crate) fn to_formatted_string(val: &BigNum, opts: &FormatOptions) -> String {
    if val.is_nan() {
        return "1.#NAN".into();
    }
    if val.is_infinite() {
        return if val.is_negative() {
            "-1.#INF".into()
        } else {
            "1.#INF".into()
        };
    }

    let md = opts.max_digits.map(i32::from);
    let fd = opts.frac_digits.map(i32::from);
    let wp = opts.whole_places.map(i32::from);
    let lead_zero = !opts.no_lead_zero;
    let decpt_char = if opts.euro { ',' } else { '.' };
    let comma_char = if opts.euro { '.' } else { ',' };
    let plus_sign = if opts.pos_space {
        Some(' ')
    } else if opts.pos_sign {
        Some('+')
    } else {
        None
    };

    let exp = i32::from(val.exponent());

    // decide up front whether fixed notation can work at all
    let mut always_exp = opts.scientific;
    if let Some(md) = md {
        // too many whole digits, or too many leading fractional zeros to
        // reach a significant digit within the budget
        if exp > md {
            always_exp = true;
        }
        if exp < 0 && (-exp > md || fd.map_or(false, |fd| -exp > fd)) {
            always_exp = true;
        }
    }
    if opts.compact && (exp < -3 || md.map_or(false, |md| exp - 1 > md)) {
        always_exp = true;
    }

    // round to the number of digits we can actually show
    let prec = match md {
        Some(md) if (md as u16) < val.precision() && md >= 1 => md as u16,
        _ => val.precision(),
    };
    let mut tmp = BigNum::with_prec(prec);
    tmp.copy_from(val, true);
    let prec = prec as i32;

    // Each pass either completes the format or discovers partway through
    // that the layout has to change (a switch to scientific notation, or a
    // rounding carry that adds a digit) and starts over.
    loop {
        let exp = i32::from(tmp.exponent());
        let mut out: Vec<char> = Vec::new();
        let mut all_out_cnt = 0;
        let mut sig_out_cnt = 0;

        let dig_before_pt = if always_exp {
            1
        } else if exp > 0 {
            exp
        } else {
            0
        };

        if md.map_or(false, |md| dig_before_pt > md) {
            always_exp = true;
            continue;
        }

        let mut dig_after_pt = if let Some(md) = md {
            md - dig_before_pt
        } else if let Some(fd) = fd {
            fd
        } else if !always_exp && exp < 0 {
            // unlimited digits: every leading zero plus the full mantissa
            -exp + prec
        } else if prec > dig_before_pt {
            prec - dig_before_pt
        } else {
            0
        };

        // pad the unused whole places
        if !always_exp && wp.map_or(false, |wp| dig_before_pt < wp) {
            let wp = wp.unwrap_or(0);
            let mut cnt = wp - dig_before_pt;
            if dig_before_pt == 0 && lead_zero {
                cnt -= 1;
            }
            if opts.commas {
                for idx in dig_before_pt..wp {
                    if idx % 3 == 0 {
                        cnt += 1;
                    }
                }
            }
            match &opts.lead_fill {
                Some(fill) if !fill.is_empty() => {
                    let mut chars = fill.chars().cycle();
                    for _ in 0..cnt.max(0) {
                        if let Some(ch) = chars.next() {
                            out.push(ch);
                        }
                    }
                }
                _ => {
                    for _ in 0..cnt.max(0) {
                        out.push(' ');
                    }
                }
            }
        }

        if tmp.is_negative() {
            out.push('-');
        } else if let Some(sign) = plus_sign {
            out.push(sign);
        }

        if dig_before_pt == 0 && lead_zero {
            out.push('0');
            // the leading zero comes out of an absolute digit budget
            if md.is_some() && !opts.max_sig {
                dig_after_pt -= 1;
            }
            all_out_cnt += 1;
        }

        // If the total-digit budget can't accommodate the requested
        // fractional digits, scientific notation frees up room, but only
        // when more than one whole digit is competing for it.
        if md.is_some()
            && !always_exp
            && fd.map_or(false, |fd| dig_after_pt < fd)
            && dig_before_pt > 1
        {
            always_exp = true;
            continue;
        }

        // whole-part digits, with zero fill past the stored precision
        let mut idx = 0;
        while idx < dig_before_pt {
            if idx != 0 && opts.commas && !always_exp && (dig_before_pt - idx) % 3 == 0 {
                out.push(comma_char);
            }
            let dig = if idx < prec {
                tmp.digit(idx as usize)
            } else {
                0
            };
            out.push((b'0' + dig) as char);
            all_out_cnt += 1;
            if dig != 0 || sig_out_cnt != 0 {
                sig_out_cnt += 1;
            }
            idx += 1;
        }

        let mut show_pt = if opts.always_point {
            true
        } else {
            // with no fractional request we tentatively show the point and
            // trim it back out if only zeros follow
            fd != Some(0)
        };

        if show_pt {
            // last position worth keeping when trailing zeros get trimmed
            let mut last_non_zero = out.len();
            out.push(decpt_char);
            if opts.always_point {
                last_non_zero = out.len();
            }

            let frac_lim = match fd {
                Some(fd) => fd.min(dig_after_pt),
                None => dig_after_pt,
            };
            let mut frac_len = 0;

            // zeros between the point and the first stored digit
            if idx == 0 && exp < 0 {
                let mut cnt = exp;
                while cnt != 0 && frac_len < frac_lim {
                    out.push('0');
                    if !opts.max_sig {
                        frac_len += 1;
                    }
                    all_out_cnt += 1;
                    cnt += 1;
                }
            }

            while idx < prec && frac_len < frac_lim {
                let dig = tmp.digit(idx as usize);
                out.push((b'0' + dig) as char);
                if dig != 0 {
                    last_non_zero = out.len();
                }
                all_out_cnt += 1;
                if dig != 0 || sig_out_cnt != 0 {
                    sig_out_cnt += 1;
                }
                idx += 1;
                frac_len += 1;
            }

            // pad out the digit budget if trailing zeros were requested
            if opts.trailing_zeros {
                if let Some(md) = md {
                    let mut i = if opts.max_sig { sig_out_cnt } else { all_out_cnt };
                    while i < md {
                        out.push('0');
                        i += 1;
                    }
                }
            }

            if fd.is_some() {
                while frac_len < frac_lim {
                    out.push('0');
                    frac_len += 1;
                }
            } else if !opts.trailing_zeros {
                if last_non_zero < out.len() && out[last_non_zero] == decpt_char {
                    show_pt = false;
                }
                // a trailing zero that's about to round up to 1 is
                // significant after all
                if out.len() > last_non_zero && tmp.round_dir(idx) {
                    last_non_zero = out.len();
                }
                out.truncate(last_non_zero);
                if !out.iter().any(|ch| ch.is_ascii_digit()) {
                    if out.last() == Some(&decpt_char) {
                        let pt = out.len() - 1;
                        out[pt] = '0';
                        out.push(decpt_char);
                    } else {
                        out.push('0');
                    }
                }
            }
        }

        // round the last displayed digit up if the dropped tail calls for it
        if tmp.round_dir(idx) {
            let mut need_carry = true;
            let mut found_pt = false;
            let mut dig_cnt = 0;
            let mut rp = out.len();
            while rp != 0 {
                rp -= 1;
                let ch = out[rp];
                if ch.is_ascii_digit() {
                    dig_cnt += 1;
                    if ch == '9' {
                        out[rp] = '0';
                        if show_pt && !found_pt && fd.is_none() {
                            out.remove(rp);
                            dig_cnt -= 1;
                        }
                    } else {
                        out[rp] = (ch as u8 + 1) as char;
                        need_carry = false;
                        break;
                    }
                } else if ch == decpt_char {
                    found_pt = true;
                }
            }

            // all nines: bump the number itself and lay it out again,
            // since the extra digit can change everything
            if need_carry {
                tmp.set_digit(idx.max(0) as usize, 0);
                tmp.round_up_abs(idx.max(0) as usize);
                if md.map_or(false, |md| dig_cnt + 1 > md) {
                    always_exp = true;
                }
                continue;
            }
        }

        if always_exp {
            out.push(if opts.exp_caps { 'E' } else { 'e' });
            let mut disp_exp = exp - 1;
            if disp_exp < 0 {
                out.push('-');
                disp_exp = -disp_exp;
            } else if opts.exp_sign {
                out.push('+');
            }
            if disp_exp == 0 && opts.exp_digits.is_none() {
                out.push('0');
            } else {
                let digits = disp_exp.to_string();
                if let Some(ed) = opts.exp_digits {
                    for _ in digits.len()..ed as usize {
                        out.push('0');
                    }
                }
                out.extend(digits.chars());
            }
        }

        return out.into_iter().collect();
    }
}

// ---------------------------------------------------------------------------
// Parsing

pub(crate) fn parse_decimal(
    s: &str,
    precision: Option<u16>,
) -> Result<BigNum, ParseBigNumError> {
    let prec = match precision {
        Some(p) if p >= 1 => p,
        Some(_) => return Err(ParseBigNumError),
        None => decimal_precision(s)?,
    };

    let mut out = BigNum::with_prec(prec);
    out.flags = 0;
    let mut exp: i32 = 0;

    let mut chars = s.chars().peekable();
    skip_spaces(&mut chars);
    let neg = match chars.peek() {
        Some('+') => {
            chars.next();
            false
        }
        Some('-') => {
            chars.next();
            true
        }
        _ => false,
    };
    out.set_negative(neg);
    skip_spaces(&mut chars);

    let mut significant = false;
    let mut any_digits = false;
    let mut pt = false;
    let mut idx = 0;
    while let Some(&ch) = chars.peek() {
        if let Some(d) = ch.to_digit(10) {
            any_digits = true;
            if ch != '0' {
                significant = true;
            }
            if significant {
                if idx < prec as usize {
                    out.set_digit(idx, d as u8);
                    idx += 1;
                }
                // every pre-point digit is another power of ten, stored
                // or not
                if !pt {
                    exp += 1;
                }
            } else if pt {
                // a leading zero after the point shifts us down a place
                exp -= 1;
            }
            chars.next();
        } else if ch == '.' && !pt {
            pt = true;
            chars.next();
        } else if ch == 'e' || ch == 'E' {
            chars.next();
            let exp_neg = match chars.peek() {
                Some('+') => {
                    chars.next();
                    false
                }
                Some('-') => {
                    chars.next();
                    true
                }
                _ => false,
            };
            let mut acc: i32 = 0;
            let mut exp_digits = false;
            while let Some(d) = chars.peek().and_then(|ch| ch.to_digit(10)) {
                acc = acc.checked_mul(10).ok_or(ParseBigNumError)?;
                acc = acc.checked_add(d as i32).ok_or(ParseBigNumError)?;
                exp_digits = true;
                chars.next();
            }
            if !exp_digits {
                return Err(ParseBigNumError);
            }
            exp += if exp_neg { -acc } else { acc };
            break;
        } else {
            break;
        }
    }

    skip_spaces(&mut chars);
    if !any_digits || chars.next().is_some() {
        return Err(ParseBigNumError);
    }

    out.store_exp(exp).map_err(|_| ParseBigNumError)?;
    out.normalize();
    Ok(out)
}

pub(crate) fn parse_radix(s: &str, radix: Option<u32>) -> Result<BigNum, ParseBigNumError> {
    let (radix, inferred) = match radix {
        Some(r) if r >= 2 && r <= 36 => (r, false),
        Some(_) => return Err(ParseBigNumError),
        None => (infer_radix(s), true),
    };
    if radix == 10 {
        return parse_decimal(s, None);
    }

    let prec = radix_precision(s, radix, inferred)?;
    let mut t1 = BigNum::with_prec(prec);
    t1.flags = 0;
    let mut t2 = BigNum::with_prec(prec);

    let mut chars = s.chars().peekable();
    skip_spaces(&mut chars);
    let neg = match chars.peek() {
        Some('+') => {
            chars.next();
            false
        }
        Some('-') => {
            chars.next();
            true
        }
        _ => false,
    };
    skip_spaces(&mut chars);
    skip_hex_prefix(&mut chars, radix, inferred);

    let map_err = |_: Error| ParseBigNumError;

    let mut significant = false;
    let mut any_digits = false;
    while let Some(&ch) = chars.peek() {
        let d = match ch.to_digit(36) {
            Some(d) if d < radix => d,
            _ => break,
        };
        any_digits = true;
        if ch != '0' {
            significant = true;
        }
        if significant {
            // shift the accumulator up a place and mix in the digit
            let dreg = BigNum::from(d as u8);
            arith::mul_by_u32(&mut t1, radix).map_err(map_err)?;
            arith::abs_sum_into(&mut t2, &t1, &dreg).map_err(map_err)?;
            mem::swap(&mut t1, &mut t2);
        }
        chars.next();
    }

    skip_spaces(&mut chars);
    if !any_digits || chars.next().is_some() {
        return Err(ParseBigNumError);
    }

    t1.set_negative(neg);
    t1.normalize();
    Ok(t1)
}

/// Infers the radix of a numeric string: `0x` means hex; a bare leading
/// zero with no decimal point, exponent marker, or digit 8 or 9 means
/// octal; anything else is decimal.
fn infer_radix(s: &str) -> u32 {
    let mut chars = s.chars().peekable();
    skip_spaces(&mut chars);
    if let Some('+') | Some('-') = chars.peek() {
        chars.next();
    }
    skip_spaces(&mut chars);
    if chars.peek() != Some(&'0') {
        return 10;
    }
    chars.next();
    if let Some('x') | Some('X') = chars.peek() {
        return 16;
    }
    for ch in chars {
        match ch {
            '0'..='7' => continue,
            '.' | 'e' | 'E' | '8' | '9' => return 10,
            _ => break,
        }
    }
    8
}

fn skip_spaces(chars: &mut std::iter::Peekable<std::str::Chars>) {
    while let Some(ch) = chars.peek() {
        if ch.is_whitespace() {
            chars.next();
        } else {
            break;
        }
    }
}

fn skip_hex_prefix(
    chars: &mut std::iter::Peekable<std::str::Chars>,
    radix: u32,
    inferred: bool,
) {
    if radix == 16 && inferred {
        let mut probe = chars.clone();
        if probe.next() == Some('0') {
            if let Some('x') | Some('X') = probe.next() {
                chars.next();
                chars.next();
            }
        }
    }
}

/// Counts the decimal precision needed to hold a decimal string exactly:
/// one digit per significant digit, or, for a zero like `0.0000000`, one
/// per written digit.
fn decimal_precision(s: &str) -> Result<u16, ParseBigNumError> {
    let mut chars = s.chars().peekable();
    skip_spaces(&mut chars);
    if let Some('+') | Some('-') = chars.peek() {
        chars.next();
    }
    skip_spaces(&mut chars);

    let mut significant = false;
    let mut prec: usize = 0;
    let mut digcnt: usize = 0;
    let mut pt = false;
    for ch in chars {
        if ch.is_ascii_digit() {
            if ch != '0' {
                significant = true;
            }
            if significant {
                prec += 1;
            }
            digcnt += 1;
        } else if ch == '.' && !pt {
            pt = true;
        } else {
            break;
        }
    }

    if prec == 0 {
        prec = digcnt;
    }
    to_u16(prec.max(1))
}

/// Counts the decimal precision needed to hold a whole number written
/// with `digits` digits of the given radix, via the digit-count change of
/// base: N base-R digits need `N·log10(R)` decimal digits.
fn radix_precision(s: &str, radix: u32, inferred: bool) -> Result<u16, ParseBigNumError> {
    let mut chars = s.chars().peekable();
    skip_spaces(&mut chars);
    if let Some('+') | Some('-') = chars.peek() {
        chars.next();
    }
    skip_spaces(&mut chars);
    skip_hex_prefix(&mut chars, radix, inferred);

    let mut significant = false;
    let mut digits: usize = 0;
    for ch in chars {
        match ch.to_digit(36) {
            Some(d) if d < radix => (),
            _ => break,
        }
        if ch != '0' {
            significant = true;
        }
        if significant {
            digits += 1;
        }
    }

    let prec = (digits as f64 * f64::from(radix).log10()).ceil() as usize;
    to_u16(prec.max(1))
}

fn to_u16(n: usize) -> Result<u16, ParseBigNumError> {
    use std::convert::TryFrom;
    u16::try_from(n).map_err(|_| ParseBigNumError)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Context;

    fn n(s: &str) -> BigNum {
        s.parse().unwrap()
    }

    #[test]
    fn display_round_trips() {
        for s in &[
            "0",
            "1",
            "-1",
            "3.14159",
            "-3.14159",
            "0.001",
            "-0.001",
            "123456789",
            "1200",
            "0.000000000000001",
            "12345678901234567890123456789",
        ] {
            let v = n(s);
            assert_eq!(v.to_string(), *s);
            assert_eq!(n(&v.to_string()), v);
        }
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!("".parse::<BigNum>().is_err());
        assert!("abc".parse::<BigNum>().is_err());
        assert!("1.5x".parse::<BigNum>().is_err());
        assert!("--1".parse::<BigNum>().is_err());
        assert!("1e".parse::<BigNum>().is_err());
        assert!("1e999999999999".parse::<BigNum>().is_err());
    }

    #[test]
    fn parse_accepts_exponents_and_spaces() {
        assert_eq!(n("1.5e3"), n("1500"));
        assert_eq!(n("1.5E+3"), n("1500"));
        assert_eq!(n("1500e-3"), n("1.5"));
        assert_eq!(n("  -2.5  "), n("-2.5"));
        assert_eq!(n("+7"), n("7"));
        assert_eq!(n("0.0000000").precision(), 8);
    }

    #[test]
    fn parse_skips_leading_zeros_without_precision() {
        let v = n("0.00123");
        assert_eq!(v.precision(), 3);
        assert_eq!(v.exponent(), -2);
        assert_eq!(n("007").precision(), 1);
    }

    #[test]
    fn frac_digit_formatting() {
        let opts = FormatOptions::default().frac_digits(2);
        assert_eq!(n("2.345").format(&opts), "2.34");
        assert_eq!(n("2.355").format(&opts), "2.36");
        assert_eq!(n("1").format(&opts), "1.00");
        assert_eq!(n("-0.5").format(&opts), "-0.50");
        let opts = FormatOptions::default().frac_digits(0);
        assert_eq!(n("2.5").format(&opts), "2");
        assert_eq!(n("3.5").format(&opts), "4");
    }

    #[test]
    fn comma_grouping() {
        let opts = FormatOptions::default().commas(true);
        assert_eq!(n("1234567.5").format(&opts), "1,234,567.5");
        assert_eq!(n("123").format(&opts), "123");
        assert_eq!(n("-1234").format(&opts), "-1,234");
        let opts = FormatOptions::default().commas(true).euro(true);
        assert_eq!(n("1234567.5").format(&opts), "1.234.567,5");
    }

    #[test]
    fn scientific_notation() {
        let opts = FormatOptions::default().scientific(true);
        assert_eq!(n("1234").format(&opts), "1.234e3");
        assert_eq!(n("0.05").format(&opts), "5e-2");
        assert_eq!(n("1").format(&opts), "1e0");
        let opts = FormatOptions::default().scientific(true).exp_sign(true).exp_caps(true);
        assert_eq!(n("1234").format(&opts), "1.234E+3");
        let opts = FormatOptions::default().scientific(true).exp_digits(3);
        assert_eq!(n("1234").format(&opts), "1.234e003");
    }

    #[test]
    fn scientific_fallback_on_digit_cap() {
        let opts = FormatOptions::default().max_digits(3);
        assert_eq!(n("123456").format(&opts), "1.23e5");
        assert_eq!(n("0.00001234").format(&opts), "1.23e-5");
        assert_eq!(n("123").format(&opts), "123");
    }

    #[test]
    fn rounding_carry_restarts_format() {
        let opts = FormatOptions::default().frac_digits(0);
        assert_eq!(n("99.6").format(&opts), "100");
        let opts = FormatOptions::default().frac_digits(1);
        assert_eq!(n("9.99").format(&opts), "10.0");
        let opts = FormatOptions::default().max_digits(2);
        assert_eq!(n("99.6").format(&opts), "1e2");
    }

    #[test]
    fn whole_place_padding() {
        let opts = FormatOptions::default().whole_places(5);
        assert_eq!(n("42").format(&opts), "   42");
        let opts = FormatOptions::default().whole_places(5).lead_fill("*");
        assert_eq!(n("42").format(&opts), "***42");
        let opts = FormatOptions::default().whole_places(4).lead_fill("ab");
        assert_eq!(n("42").format(&opts), "ab42");
    }

    #[test]
    fn sign_and_point_policies() {
        let opts = FormatOptions::default().pos_sign(true);
        assert_eq!(n("5").format(&opts), "+5");
        let opts = FormatOptions::default().pos_space(true);
        assert_eq!(n("5").format(&opts), " 5");
        let opts = FormatOptions::default().always_point(true);
        assert_eq!(n("5").format(&opts), "5.");
        let opts = FormatOptions::default().no_lead_zero(true);
        assert_eq!(n("0.5").format(&opts), ".5");
    }

    #[test]
    fn special_value_formatting() {
        assert_eq!(BigNum::nan(8).to_string(), "1.#NAN");
        assert_eq!(BigNum::infinity(false).to_string(), "1.#INF");
        assert_eq!(BigNum::infinity(true).to_string(), "-1.#INF");
    }

    #[test]
    fn zero_never_shows_a_sign() {
        let cx = Context::default();
        let z = cx.sub(&n("0"), &n("0")).unwrap();
        assert!(z.is_zero());
        assert_eq!(z.to_string(), "0");
        assert_eq!((-n("0")).to_string(), "0");
    }

    #[test]
    fn radix_inference() {
        let cx = Context::default();
        assert_eq!(cx.parse_radix("0x1F", None).unwrap(), n("31"));
        assert_eq!(cx.parse_radix("017", None).unwrap(), n("15"));
        assert_eq!(cx.parse_radix("017.5", None).unwrap(), n("17.5"));
        assert_eq!(cx.parse_radix("090", None).unwrap(), n("90"));
        assert_eq!(cx.parse_radix("42", None).unwrap(), n("42"));
    }

    #[test]
    fn explicit_radix_parsing() {
        let cx = Context::default();
        assert_eq!(cx.parse_radix("ff", Some(16)).unwrap(), n("255"));
        assert_eq!(cx.parse_radix("-101", Some(2)).unwrap(), n("-5"));
        assert_eq!(cx.parse_radix("zz", Some(36)).unwrap(), n("1295"));
        assert!(cx.parse_radix("12", Some(1)).is_err());
        assert!(cx.parse_radix("19", Some(8)).is_err());
    }

    #[test]
    fn radix_formatting() {
        assert_eq!(n("255").to_radix_string(16).unwrap(), "FF");
        assert_eq!(n("-5").to_radix_string(2).unwrap(), "-101");
        assert_eq!(n("0").to_radix_string(16).unwrap(), "0");
        assert_eq!(n("7.6").to_radix_string(8).unwrap(), "10");
        assert!(n("1").to_radix_string(37).is_err());
        assert!(BigNum::nan(4).to_radix_string(16).is_err());
    }
}
