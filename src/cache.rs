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

//! Temporary-register pooling and cached constants.

use std::cell::RefCell;
use std::mem;
use std::ops::{Deref, DerefMut};

use crate::bignum::BigNum;
use crate::error::Error;

/// The maximum number of registers a pool hands out at once. The deepest
/// computations (the trigonometric ladders) use nine registers plus the
/// constant recomputations they may trigger, so this leaves ample headroom.
const MAX_REGS: usize = 32;

/// A pool of reusable temporary registers.
///
/// Intermediate results in multi-step computations need scratch storage at
/// varying precisions. Rather than allocating fresh buffers at every step,
/// the pool retains released registers and reuses them, growing a register
/// in place when a later acquisition needs more precision.
#[derive(Debug, Default)]
pub(crate) struct Pool {
    free: Vec<BigNum>,
    outstanding: usize,
}

impl Pool {
    pub(crate) fn acquire(&mut self, prec: u16) -> Result<BigNum, Error> {
        if self.outstanding >= MAX_REGS {
            return Err(Error::OutOfRegisters);
        }
        self.outstanding += 1;
        match self.free.pop() {
            Some(mut reg) => {
                reg.reset(prec);
                Ok(reg)
            }
            None => Ok(BigNum::with_prec(prec)),
        }
    }

    pub(crate) fn release(&mut self, reg: BigNum) {
        debug_assert!(self.outstanding > 0);
        self.outstanding -= 1;
        self.free.push(reg);
    }
}

/// A pooled register, returned to its pool on drop.
#[derive(Debug)]
pub(crate) struct Scratch<'a> {
    pool: &'a RefCell<Pool>,
    val: BigNum,
}

impl<'a> Scratch<'a> {
    pub(crate) fn acquire(pool: &'a RefCell<Pool>, prec: u16) -> Result<Scratch<'a>, Error> {
        let val = pool.borrow_mut().acquire(prec)?;
        Ok(Scratch { pool, val })
    }
}

impl Deref for Scratch<'_> {
    type Target = BigNum;

    fn deref(&self) -> &BigNum {
        &self.val
    }
}

impl DerefMut for Scratch<'_> {
    fn deref_mut(&mut self) -> &mut BigNum {
        &mut self.val
    }
}

impl Drop for Scratch<'_> {
    fn drop(&mut self) {
        self.pool.borrow_mut().release(mem::take(&mut self.val));
    }
}

/// Lazily computed mathematical constants.
///
/// Each constant is computed at a precision rounded up to the next multiple
/// of eight beyond the requested precision, so nearby requests are served
/// from the cache by rounding down rather than recomputing the series.
#[derive(Debug, Default)]
pub(crate) struct Constants {
    pi: Option<BigNum>,
    e: Option<BigNum>,
    ln2: Option<BigNum>,
    ln10: Option<BigNum>,
}

/// The precision at which to cache a constant requested at `prec`.
pub(crate) fn cache_prec(prec: u16) -> u16 {
    prec.saturating_add(7) & !7
}

macro_rules! constant_accessors {
    ($(($get:ident, $put:ident)),*) => {
        impl Constants {
            $(
                /// Returns the cached constant if it holds at least `prec`
                /// digits.
                pub(crate) fn $get(&self, prec: u16) -> Option<&BigNum> {
                    self.$get.as_ref().filter(|v| v.precision() >= prec)
                }

                pub(crate) fn $put(&mut self, val: BigNum) {
                    self.$get = Some(val);
                }
            )*
        }
    };
}

constant_accessors![(pi, put_pi), (e, put_e), (ln2, put_ln2), (ln10, put_ln10)];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_reuses_registers() {
        let pool = RefCell::new(Pool::default());
        {
            let mut a = Scratch::acquire(&pool, 8).unwrap();
            a.set_u64(42);
        }
        // the released register comes back zeroed
        let b = Scratch::acquire(&pool, 8).unwrap();
        assert!(b.is_zero());
        assert_eq!(b.precision(), 8);
        assert_eq!(pool.borrow().free.len(), 0);
        drop(b);
        assert_eq!(pool.borrow().free.len(), 1);
    }

    #[test]
    fn pool_limits_outstanding_registers() {
        let pool = RefCell::new(Pool::default());
        let regs: Vec<_> = (0..MAX_REGS)
            .map(|_| Scratch::acquire(&pool, 4).unwrap())
            .collect();
        assert_eq!(
            Scratch::acquire(&pool, 4).unwrap_err(),
            Error::OutOfRegisters
        );
        drop(regs);
        assert!(Scratch::acquire(&pool, 4).is_ok());
    }

    #[test]
    fn cache_precision_rounds_up_to_eight() {
        assert_eq!(cache_prec(1), 8);
        assert_eq!(cache_prec(8), 8);
        assert_eq!(cache_prec(9), 16);
        assert_eq!(cache_prec(32), 32);
    }
}
