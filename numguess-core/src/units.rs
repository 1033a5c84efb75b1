//! Conversions between form text and on-chain integers.

use crate::error::{NumguessError, Result};
use alloy::primitives::utils::{format_ether, parse_ether};
use alloy::primitives::U256;

/// Parse a decimal ETH amount ("0.01") into wei.
pub fn parse_eth(field: &str, input: &str) -> Result<U256> {
    let trimmed = require_present(field, input)?;
    if trimmed.starts_with('-') {
        return Err(NumguessError::InvalidAmount(format!(
            "{}: negative amounts are not allowed",
            field
        )));
    }

    parse_ether(trimmed)
        .map_err(|e| NumguessError::InvalidAmount(format!("{}: '{}' ({})", field, trimmed, e)))
}

/// Parse a non-negative integer such as a guess or hidden number.
pub fn parse_number(field: &str, input: &str) -> Result<U256> {
    let trimmed = require_present(field, input)?;
    U256::from_str_radix(trimmed, 10)
        .map_err(|e| NumguessError::InvalidNumber(format!("{}: '{}' ({})", field, trimmed, e)))
}

/// Render wei as ETH without trailing zeros ("1.5", "0", "12").
pub fn format_eth(wei: U256) -> String {
    let full = format_ether(wei);
    match full.split_once('.') {
        Some((whole, frac)) => {
            let frac = frac.trim_end_matches('0');
            if frac.is_empty() {
                whole.to_string()
            } else {
                format!("{}.{}", whole, frac)
            }
        }
        None => full,
    }
}

pub(crate) fn require_present<'a>(field: &str, input: &'a str) -> Result<&'a str> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(NumguessError::missing(field));
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eth(n: u64) -> U256 {
        U256::from(n) * U256::from(10u64).pow(U256::from(18u64))
    }

    #[test]
    fn test_parse_eth() {
        assert_eq!(parse_eth("stake", "1").unwrap(), eth(1));
        assert_eq!(
            parse_eth("stake", " 0.01 ").unwrap(),
            U256::from(10_000_000_000_000_000u64)
        );
        assert!(matches!(
            parse_eth("stake", "  "),
            Err(NumguessError::MissingInput(_))
        ));
        assert!(matches!(
            parse_eth("stake", "abc"),
            Err(NumguessError::InvalidAmount(_))
        ));
        assert!(matches!(
            parse_eth("stake", "-1"),
            Err(NumguessError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("guess", "7").unwrap(), U256::from(7u64));
        assert!(matches!(
            parse_number("guess", ""),
            Err(NumguessError::MissingInput(_))
        ));
        assert!(matches!(
            parse_number("guess", "7.5"),
            Err(NumguessError::InvalidNumber(_))
        ));
    }

    #[test]
    fn test_format_eth() {
        assert_eq!(format_eth(eth(10)), "10");
        assert_eq!(format_eth(U256::ZERO), "0");
        assert_eq!(format_eth(eth(3) / U256::from(2u64)), "1.5");
    }
}
