//! Parsing of human readable amounts.

use crate::error::Error;

/// Shannons in one CKB.
pub const ONE_CKB: u64 = 100_000_000;
const CKB_DECIMALS: usize = 8;

/// Parses a decimal CKB amount such as `"61"` or `"1024.5"` into shannons.
///
/// At most 8 fractional digits are accepted; no sign, exponent or separator.
pub fn parse_capacity(input: &str) -> Result<u64, Error> {
    let invalid = || Error::InvalidAmount(format!("{input:?} is not a CKB amount"));
    let (whole, fraction) = match input.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (input, ""),
    };
    if whole.is_empty()
        || !whole.bytes().all(|b| b.is_ascii_digit())
        || !fraction.bytes().all(|b| b.is_ascii_digit())
        || (input.contains('.') && fraction.is_empty())
    {
        return Err(invalid());
    }
    if fraction.len() > CKB_DECIMALS {
        return Err(Error::InvalidAmount(format!(
            "{input:?} has more than {CKB_DECIMALS} decimal places"
        )));
    }
    let whole: u64 = whole.parse().map_err(|_| invalid())?;
    let fraction: u64 = if fraction.is_empty() {
        0
    } else {
        let padded = format!("{fraction:0<CKB_DECIMALS$}");
        padded.parse().map_err(|_| invalid())?
    };
    whole
        .checked_mul(ONE_CKB)
        .and_then(|shannons| shannons.checked_add(fraction))
        .ok_or_else(|| Error::InvalidAmount(format!("{input:?} overflows u64 shannons")))
}

/// Parses a decimal integer token amount.
pub fn parse_udt_amount(input: &str) -> Result<u128, Error> {
    if input.is_empty() || !input.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::InvalidAmount(format!(
            "{input:?} is not a token amount"
        )));
    }
    input
        .parse()
        .map_err(|_| Error::InvalidAmount(format!("{input:?} overflows u128")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_whole_and_fractional_capacity() {
        assert_eq!(parse_capacity("0").unwrap(), 0);
        assert_eq!(parse_capacity("61").unwrap(), 61 * ONE_CKB);
        assert_eq!(parse_capacity("1024.5").unwrap(), 102_450_000_000);
        assert_eq!(parse_capacity("0.00000001").unwrap(), 1);
        assert_eq!(parse_capacity("007.10").unwrap(), 710_000_000);
    }

    #[test]
    fn reject_malformed_capacity() {
        for input in ["", ".5", "1.", "-1", "1e8", "1,000", " 1", "1.000000001", "abc"] {
            assert!(
                matches!(parse_capacity(input), Err(Error::InvalidAmount(_))),
                "{input:?} should be rejected"
            );
        }
        assert!(parse_capacity("184467440738").is_err());
    }

    #[test]
    fn parse_token_amount() {
        assert_eq!(
            parse_udt_amount("340282366920938463463374607431768211455").unwrap(),
            u128::MAX
        );
        assert!(parse_udt_amount("340282366920938463463374607431768211456").is_err());
        assert!(parse_udt_amount("1.5").is_err());
        assert!(parse_udt_amount("").is_err());
    }
}
