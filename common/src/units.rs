//! Hex and fixed-decimal number conversions.
//!
//! Conversions are exact: `from_hex(to_hex(v)) == v` and
//! `parse_units(format_units(v, d), d) == v` for every representable value.
//! Fractional digits beyond the requested width are truncated, never
//! rounded.

use crate::error::ValidationError;

/// Renders `value` as minimal lowercase hex with a `0x` prefix.
pub fn to_hex(value: u128) -> String {
    format!("{:#x}", value)
}

/// Parses a hex string into a `u128`. The `0x` prefix is optional and both
/// digit cases are accepted.
pub fn from_hex(s: &str) -> Result<u128, ValidationError> {
    let body = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")).unwrap_or(s);
    if body.is_empty() {
        return Err(ValidationError::InvalidNumber(format!(
            "invalid hex number: {:?}",
            s
        )));
    }
    u128::from_str_radix(body, 16)
        .map_err(|_| ValidationError::InvalidNumber(format!("invalid hex number: {:?}", s)))
}

/// Formats an integer amount as a decimal string with exactly `decimals`
/// fractional digits.
pub fn format_units(value: u128, decimals: u32) -> String {
    let digits = value.to_string();
    let width = decimals as usize;
    if width == 0 {
        return digits;
    }
    if digits.len() <= width {
        format!("0.{}{}", "0".repeat(width - digits.len()), digits)
    } else {
        let (integer, fraction) = digits.split_at(digits.len() - width);
        format!("{}.{}", integer, fraction)
    }
}

/// Parses a decimal string into an integer amount with `decimals` implied
/// fractional digits. Fractional digits beyond `decimals` are truncated.
pub fn parse_units(s: &str, decimals: u32) -> Result<u128, ValidationError> {
    let (integer, fraction) = match s.split_once('.') {
        Some((i, f)) => (i, f),
        None => (s, ""),
    };
    if integer.is_empty() && fraction.is_empty() {
        return Err(ValidationError::InvalidNumber(format!(
            "invalid decimal number: {:?}",
            s
        )));
    }
    if !integer.bytes().all(|b| b.is_ascii_digit()) || !fraction.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(ValidationError::InvalidNumber(format!(
            "invalid decimal number: {:?}",
            s
        )));
    }

    let width = decimals as usize;
    let mut fraction = fraction.to_string();
    fraction.truncate(width);
    while fraction.len() < width {
        fraction.push('0');
    }

    let combined = format!("{}{}", integer, fraction);
    if combined.is_empty() {
        return Ok(0);
    }
    combined
        .parse::<u128>()
        .map_err(|_| ValidationError::Overflow(format!("amount too large: {:?}", s)))
}
