/*
 * Conversions between user-entered decimal strings and token base units
 */

use ethers::types::{I256, U256};
use num_bigint::BigUint;
use num_traits::Zero;
use crate::models::{NvoError, Result};

/// Scales a decimal string by `10^decimals`, dropping digits finer than one base unit.
///
/// Surrounding whitespace and a leading `+` are accepted, as are `"1."` and `".5"`.
/// Negative values, exponents and anything that does not fit a `uint256` are rejected.
pub fn encode_amount(input: &str, decimals: u8) -> Result<U256> {
    let trimmed = input.trim();
    if trimmed.starts_with('-') {
        return Err(NvoError::InvalidAmount(format!(
            "negative amounts are not accepted: {trimmed}"
        )));
    }
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);

    let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));
    if whole.is_empty() && fraction.is_empty() {
        return Err(NvoError::InvalidAmount(format!("not a decimal number: {input:?}")));
    }
    if !is_digits(whole) || !is_digits(fraction) {
        return Err(NvoError::InvalidAmount(format!("not a decimal number: {input:?}")));
    }

    let scale = usize::from(decimals);
    let kept = &fraction[..fraction.len().min(scale)];

    let mut digits = String::with_capacity(whole.len() + scale);
    digits.push_str(whole);
    digits.push_str(kept);
    digits.extend(std::iter::repeat('0').take(scale - kept.len()));

    let value = if digits.is_empty() {
        BigUint::zero()
    } else {
        BigUint::parse_bytes(digits.as_bytes(), 10)
            .ok_or_else(|| NvoError::InvalidAmount(format!("not a decimal number: {input:?}")))?
    };

    to_u256(&value).ok_or_else(|| {
        NvoError::InvalidAmount(format!("{trimmed} with {decimals} decimals overflows uint256"))
    })
}

/// Renders base units as a decimal string with trailing fractional zeros removed.
#[must_use]
pub fn decode_amount(raw: U256, decimals: u8) -> String {
    format_digits(&raw.to_string(), decimals)
}

#[must_use]
pub fn decode_signed_amount(raw: I256, decimals: u8) -> String {
    let magnitude = decode_amount(raw.unsigned_abs(), decimals);
    if raw.is_negative() {
        format!("-{magnitude}")
    } else {
        magnitude
    }
}

fn is_digits(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_digit())
}

fn to_u256(value: &BigUint) -> Option<U256> {
    if value.bits() > 256 {
        return None;
    }
    Some(U256::from_big_endian(&value.to_bytes_be()))
}

fn format_digits(digits: &str, decimals: u8) -> String {
    let scale = usize::from(decimals);
    if scale == 0 {
        return digits.to_string();
    }

    let padded = if digits.len() <= scale {
        format!("{}{digits}", "0".repeat(scale + 1 - digits.len()))
    } else {
        digits.to_string()
    };

    let (whole, fraction) = padded.split_at(padded.len() - scale);
    let fraction = fraction.trim_end_matches('0');
    if fraction.is_empty() {
        whole.to_string()
    } else {
        format!("{whole}.{fraction}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ONE_AND_HALF: u128 = 1_500_000_000_000_000_000;

    #[test]
    fn encodes_fractional_amount() {
        assert_eq!(encode_amount("1.5", 18).unwrap(), U256::from(ONE_AND_HALF));
        assert_eq!(encode_amount("  1.5\n", 18).unwrap(), U256::from(ONE_AND_HALF));
        assert_eq!(encode_amount("+1.5", 18).unwrap(), U256::from(ONE_AND_HALF));
    }

    #[test]
    fn encodes_zero_and_partial_forms() {
        assert_eq!(encode_amount("0", 18).unwrap(), U256::zero());
        assert_eq!(encode_amount("0.0", 18).unwrap(), U256::zero());
        assert_eq!(encode_amount(".5", 18).unwrap(), U256::from(500_000_000_000_000_000u128));
        assert_eq!(encode_amount("2.", 6).unwrap(), U256::from(2_000_000u64));
        assert_eq!(encode_amount("42", 0).unwrap(), U256::from(42u64));
        assert_eq!(encode_amount(".9", 0).unwrap(), U256::zero());
    }

    #[test]
    fn rounds_down_below_unit_precision() {
        assert_eq!(encode_amount("0.0000000000000000019", 18).unwrap(), U256::one());
        assert_eq!(encode_amount("1.2345678", 6).unwrap(), U256::from(1_234_567u64));
    }

    #[test]
    fn rejects_negative_amounts() {
        let err = encode_amount("-1", 18).unwrap_err();
        assert!(matches!(err, NvoError::InvalidAmount(_)));
        assert!(matches!(encode_amount(" -0.5", 18), Err(NvoError::InvalidAmount(_))));
    }

    #[test]
    fn rejects_malformed_input() {
        for input in ["", "   ", ".", "abc", "1e18", "1.2.3", "1,5", "0x10", "1 000", "--1"] {
            assert!(
                matches!(encode_amount(input, 18), Err(NvoError::InvalidAmount(_))),
                "{input:?} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_uint256_overflow() {
        let max = U256::MAX.to_string();
        assert_eq!(encode_amount(&max, 0).unwrap(), U256::MAX);
        assert!(matches!(encode_amount(&max, 1), Err(NvoError::InvalidAmount(_))));
    }

    #[test]
    fn decodes_with_trailing_zeros_removed() {
        assert_eq!(decode_amount(U256::from(ONE_AND_HALF), 18), "1.5");
        assert_eq!(decode_amount(U256::exp10(18), 18), "1");
        assert_eq!(decode_amount(U256::zero(), 18), "0");
        assert_eq!(decode_amount(U256::one(), 18), "0.000000000000000001");
        assert_eq!(decode_amount(U256::from(1234u64), 0), "1234");
    }

    #[test]
    fn decodes_signed_values() {
        assert_eq!(decode_signed_amount(I256::from(-5), 0), "-5");
        assert_eq!(decode_signed_amount(I256::from_raw(U256::from(ONE_AND_HALF)), 18), "1.5");
        assert_eq!(decode_signed_amount(-I256::from_raw(U256::from(ONE_AND_HALF)), 18), "-1.5");
        assert_eq!(decode_signed_amount(I256::zero(), 18), "0");
    }

    #[test]
    fn canonical_strings_round_trip() {
        for input in ["0", "1", "1.5", "0.000000000000000001", "123456789.987654321", "1000000"] {
            let raw = encode_amount(input, 18).unwrap();
            assert_eq!(decode_amount(raw, 18), input);
        }
    }
}
