#[macro_export]
/// A macro to construct a [`BigNum`] from a literal.
/// Converts the input tokens to a string, and then parses the string into a [`BigNum`].
/// Panics if the provided input is not a valid [`BigNum`] literal.
///
/// The literal's text is preserved exactly, so trailing zeros count toward
/// the value's precision.
///
/// [`BigNum`]: crate::BigNum
///
/// # Examples:
/// ```
/// use bignum::bignum;
///
/// assert!(bignum!(1.753).to_string() == "1.753");
/// assert!(bignum!(0.500).precision() == 3);
/// ```
macro_rules! bignum {
    ($l:expr) => {
        <$crate::BigNum as ::std::str::FromStr>::from_str(stringify!($l))
            .unwrap_or_else(|e| panic!("{}", e.to_string()))
    };
}

#[cfg(test)]
mod tests {
    use crate::BigNum;

    #[test]
    fn literal_forms() {
        assert_eq!(bignum!(42), BigNum::from(42u32));
        assert_eq!(bignum!(-1.25).to_string(), "-1.25");
        assert_eq!(bignum!(1e10).to_string(), "10000000000");
        assert_eq!(bignum!(3.14159).precision(), 6);
    }
}
