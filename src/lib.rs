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

//! bignum is an arbitrary-precision decimal arithmetic library for Rust.
//!
//! # Introduction
//!
//! Binary floating-point numbers can only approximate common decimal numbers.
//! The value 0.1, for example, would need an infinitely recurring binary
//! fraction, and so doubles silently round it. A decimal number system
//! represents 0.1 exactly, as one tenth (that is, 10<sup>-1</sup>), which
//! makes it the right tool whenever results must match what a person would
//! calculate by hand.
//!
//! bignum stores numbers as a sign, a decimal exponent, and a sequence of
//! between 1 and 65,535 significant decimal digits, packed two to a byte.
//! The represented value is
//!
//! ```text
//! (-1)^sign × 0.d₁d₂…dₚ × 10^exponent
//! ```
//!
//! with the radix point sitting before the first digit. Precision is chosen
//! per value rather than per type, so a schedule of 8-digit monetary amounts
//! and a 1000-digit computation of π can coexist in the same program.
//! Inexact operations round to nearest, ties to even.
//!
//! # Details
//!
//! The main types exposed by this library are as follows:
//!
//!  * [`BigNum`], the number itself. It carries its own precision and may
//!    also be a NaN or a signed infinity. `BigNum` implements the standard
//!    arithmetic operator traits for convenience.
//!
//!  * [`Context`], which hosts the fallible forms of every operation along
//!    with the transcendental functions (logarithms, exponentials,
//!    trigonometry) and the cached constants π, *e*, ln 2, and ln 10. A
//!    context fixes the precision used for constants and holds the register
//!    pool that keeps intermediate allocations off the heap's hot path.
//!
//!  * [`FormatOptions`], a builder describing how to render a value:
//!    digit caps, scientific notation, group separators, field padding,
//!    and the rest.
//!
//!  * [`OrderedBigNum`], a wrapper providing the total order and hashing
//!    that `BigNum` itself (which has a NaN) cannot.
//!
//! Values additionally convert to and from primitive integers, IEEE 754
//! binary floating-point bit patterns of any standard width, BER-compressed
//! unsigned integers, and a portable little-endian 64-bit form; see the
//! conversion methods on [`BigNum`] and [`Context`].
//!
//! # Examples
//!
//! The following example demonstrates the basic usage of the library:
//!
//! ```
//! # use std::error::Error;
//! use bignum::BigNum;
//!
//! let x: BigNum = ".1".parse()?;
//! let y: BigNum = ".2".parse()?;
//! let z: BigNum = ".3".parse()?;
//!
//! assert_eq!(x.clone() + y.clone(), z);
//! assert_eq!((x + y + z).to_string(), "0.6");
//!
//! # Ok::<_, Box<dyn Error>>(())
//! ```
//!
//! Operations that need explicit error handling or higher precision go
//! through a [`Context`]:
//!
//! ```
//! # use std::error::Error;
//! use bignum::Context;
//!
//! let cx = Context::with_precision(50)?;
//! let two = cx.parse_with_precision("2", 50)?;
//! let root = cx.sqrt(&two)?;
//! assert_eq!(
//!     root.to_string(),
//!     "1.4142135623730950488016887242096980785696718753769",
//! );
//!
//! # Ok::<_, Box<dyn Error>>(())
//! ```

#![deny(missing_debug_implementations, missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod arith;
mod bignum;
mod cache;
mod context;
mod conv;
mod error;
mod format;
mod macros;
mod ordered;
mod transcend;

pub use bignum::{BigNum, MAX_PRECISION};
pub use context::{Context, DEFAULT_PRECISION};
pub use error::{
    Error, InvalidBytesError, InvalidPrecisionError, ParseBigNumError, TryFromBigNumError,
};
pub use format::FormatOptions;
pub use ordered::OrderedBigNum;
