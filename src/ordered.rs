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

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::iter::{Product, Sum};
use std::ops::{
    Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Rem, RemAssign, Sub, SubAssign,
};
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::arith;
use crate::bignum::BigNum;
use crate::error::ParseBigNumError;

/// A wrapper for a [`BigNum`] that provides implementations of [`Ord`]
/// and [`Hash`].
///
/// Like the [`OrderedFloat`] type provided by the [`ordered_float`]
/// crate, but for arbitrary-precision decimals.
///
/// NaN is treated as equal to itself and greater than all non-NaN
/// values; all other values compare numerically. Values that are
/// numerically equal at different precisions, like `1.2` and `1.20`,
/// are equal and hash identically.
///
/// [`OrderedFloat`]: https://docs.rs/ordered-float/2.0.1/ordered_float/struct.OrderedFloat.html
/// [`ordered_float`]: https://crates.io/crates/ordered-float
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct OrderedBigNum(pub BigNum);

impl OrderedBigNum {
    /// Consumes the wrapper, returning the value within.
    pub fn into_inner(self) -> BigNum {
        self.0
    }
}

impl fmt::Display for OrderedBigNum {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl PartialOrd for OrderedBigNum {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for OrderedBigNum {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OrderedBigNum {}

impl Ord for OrderedBigNum {
    fn cmp(&self, other: &Self) -> Ordering {
        match arith::compare(&self.0, &other.0) {
            Ok(ordering) => ordering,
            Err(_) => {
                // at least one NaN; NaN sorts above everything
                if self.0.is_nan() {
                    if other.0.is_nan() {
                        Ordering::Equal
                    } else {
                        Ordering::Greater
                    }
                } else {
                    Ordering::Less
                }
            }
        }
    }
}

impl Hash for OrderedBigNum {
    fn hash<H>(&self, state: &mut H)
    where
        H: Hasher,
    {
        let v = &self.0;
        if v.is_nan() {
            state.write_u8(2);
            return;
        }
        if v.is_infinite() {
            state.write_u8(if v.is_negative() { 3 } else { 4 });
            return;
        }
        if v.is_zero() {
            state.write_u8(0);
            return;
        }
        // equal values of different precisions must hash alike, so hash
        // the digit string only up to its last non-zero digit
        state.write_u8(1);
        v.is_negative().hash(state);
        v.exponent().hash(state);
        let mut last = 0;
        for idx in 0..v.precision() as usize {
            if v.digit(idx) != 0 {
                last = idx + 1;
            }
        }
        for idx in 0..last {
            v.digit(idx).hash(state);
        }
    }
}

impl FromStr for OrderedBigNum {
    type Err = ParseBigNumError;

    fn from_str(s: &str) -> Result<OrderedBigNum, ParseBigNumError> {
        Ok(OrderedBigNum(BigNum::from_str(s)?))
    }
}

impl From<BigNum> for OrderedBigNum {
    fn from(n: BigNum) -> OrderedBigNum {
        OrderedBigNum(n)
    }
}

impl From<i32> for OrderedBigNum {
    fn from(n: i32) -> OrderedBigNum {
        OrderedBigNum(BigNum::from(n))
    }
}

impl From<u32> for OrderedBigNum {
    fn from(n: u32) -> OrderedBigNum {
        OrderedBigNum(BigNum::from(n))
    }
}

macro_rules! forward_binop {
    ($trt:ident, $meth:ident, $assign_trt:ident, $assign_meth:ident, $op:tt) => {
        impl $trt for OrderedBigNum {
            type Output = Self;

            fn $meth(self, other: OrderedBigNum) -> Self {
                OrderedBigNum(self.0 $op other.0)
            }
        }

        impl $trt<BigNum> for OrderedBigNum {
            type Output = Self;

            fn $meth(self, other: BigNum) -> Self {
                OrderedBigNum(self.0 $op other)
            }
        }

        impl $trt<OrderedBigNum> for BigNum {
            type Output = Self;

            fn $meth(self, other: OrderedBigNum) -> Self {
                self $op other.0
            }
        }

        impl $assign_trt for OrderedBigNum {
            fn $assign_meth(&mut self, other: Self) {
                let lhs = std::mem::take(&mut self.0);
                self.0 = lhs $op other.0;
            }
        }
    };
}

forward_binop!(Add, add, AddAssign, add_assign, +);
forward_binop!(Sub, sub, SubAssign, sub_assign, -);
forward_binop!(Mul, mul, MulAssign, mul_assign, *);
forward_binop!(Div, div, DivAssign, div_assign, /);
forward_binop!(Rem, rem, RemAssign, rem_assign, %);

impl Neg for OrderedBigNum {
    type Output = Self;

    fn neg(self) -> Self {
        OrderedBigNum(-self.0)
    }
}

impl Sum for OrderedBigNum {
    fn sum<I>(iter: I) -> Self
    where
        I: Iterator<Item = OrderedBigNum>,
    {
        OrderedBigNum(iter.map(|v| v.0).sum())
    }
}

impl Product for OrderedBigNum {
    fn product<I>(iter: I) -> Self
    where
        I: Iterator<Item = OrderedBigNum>,
    {
        OrderedBigNum(iter.map(|v| v.0).product())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::hash_map::DefaultHasher;

    use super::*;

    fn n(s: &str) -> OrderedBigNum {
        s.parse().unwrap()
    }

    fn hash(v: &OrderedBigNum) -> u64 {
        let mut h = DefaultHasher::new();
        v.hash(&mut h);
        h.finish()
    }

    #[test]
    fn total_order() {
        let nan = OrderedBigNum(BigNum::nan(4));
        let inf = OrderedBigNum(BigNum::infinity(false));
        let ninf = OrderedBigNum(BigNum::infinity(true));
        let mut vals = vec![nan.clone(), n("1"), ninf, n("-3.5"), inf, n("0")];
        vals.sort();
        let shown: Vec<_> = vals.iter().map(|v| v.to_string()).collect();
        assert_eq!(
            shown,
            vec!["-1.#INF", "-3.5", "0", "1", "1.#INF", "1.#NAN"]
        );
        assert_eq!(nan.cmp(&nan), Ordering::Equal);
    }

    #[test]
    fn equal_values_hash_alike() {
        assert_eq!(n("1.2"), n("1.20"));
        assert_eq!(hash(&n("1.2")), hash(&n("1.20")));
        assert_eq!(hash(&n("0")), hash(&n("0.000")));
        assert_ne!(hash(&n("1.2")), hash(&n("1.21")));
        let nan = OrderedBigNum(BigNum::nan(4));
        assert_eq!(nan, nan.clone());
        assert_eq!(hash(&nan), hash(&OrderedBigNum(BigNum::nan(9))));
    }

    #[test]
    fn arithmetic_passthrough() {
        assert_eq!(n("2") + n("3"), n("5"));
        assert_eq!(n("2") * n("3.5"), n("7"));
        let mut v = n("10");
        v -= n("4");
        assert_eq!(v, n("6"));
        let total: OrderedBigNum = vec![n("1"), n("2"), n("3")].into_iter().sum();
        assert_eq!(total, n("6"));
    }
}
