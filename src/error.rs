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

use std::error;
use std::fmt;

/// An error produced by an arithmetic operation.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Error {
    /// Division by zero.
    DivideByZero,
    /// The argument lies outside the domain of the function, e.g. the
    /// square root of a negative number.
    Domain,
    /// The result's exponent exceeds the representable range.
    Overflow,
    /// The operands cannot be compared, e.g. ordering a NaN.
    InvalidComparison,
    /// The operation ran out of scratch registers.
    OutOfRegisters,
    /// The value cannot be converted to the requested representation.
    Conversion,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::DivideByZero => f.write_str("division by zero"),
            Error::Domain => f.write_str("argument outside of function domain"),
            Error::Overflow => f.write_str("exponent overflow"),
            Error::InvalidComparison => f.write_str("values cannot be compared"),
            Error::OutOfRegisters => f.write_str("out of temporary registers"),
            Error::Conversion => f.write_str("value cannot be converted to target representation"),
        }
    }
}

impl error::Error for Error {}

/// An error indicating that a string is not a valid number.
#[derive(Debug, Eq, PartialEq)]
pub struct ParseBigNumError;

impl fmt::Display for ParseBigNumError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("invalid number syntax")
    }
}

impl error::Error for ParseBigNumError {}

/// An error indicating that a precision is not valid.
///
/// Precisions must be between 1 and 65,535 digits, inclusive.
#[derive(Debug, Eq, PartialEq)]
pub struct InvalidPrecisionError;

impl fmt::Display for InvalidPrecisionError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("invalid precision")
    }
}

impl error::Error for InvalidPrecisionError {}

/// An error indicating that a byte buffer does not hold a valid serialized
/// number.
#[derive(Debug, Eq, PartialEq)]
pub struct InvalidBytesError;

impl fmt::Display for InvalidBytesError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("byte buffer does not hold a valid number")
    }
}

impl error::Error for InvalidBytesError {}

/// An error indicating that a value cannot be cast to a primitive type.
///
/// Causes for this failure include calling cast functions on values:
/// - Representing infinity or NaN
/// - Whose integer part doesn't fit into the target type.
#[derive(Debug, Eq, PartialEq)]
pub struct TryFromBigNumError;

impl fmt::Display for TryFromBigNumError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("number cannot be expressed in target primitive type")
    }
}

impl error::Error for TryFromBigNumError {}
