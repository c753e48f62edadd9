//! # Fixed-Point Amounts
//!
//! Decimal user input <-> on-chain integers.

use crate::domain::{TxError, U256};

/// Decimals of the native currency.
pub const ETHER_DECIMALS: usize = 18;

/// Parse a decimal string into an integer scaled by `10^decimals`.
///
/// Blank input is zero. Signs, exponents, separators, and more fractional
/// digits than `decimals` are rejected.
pub fn parse_units(input: &str, decimals: usize) -> Result<U256, TxError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(U256::zero());
    }

    let (whole, fraction) = match trimmed.split_once('.') {
        Some((w, f)) => (w, f),
        None => (trimmed, ""),
    };

    if whole.is_empty() && fraction.is_empty() {
        return Err(TxError::InvalidAmount(input.to_string()));
    }
    if !whole.bytes().all(|b| b.is_ascii_digit()) || !fraction.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(TxError::InvalidAmount(input.to_string()));
    }
    if fraction.len() > decimals {
        return Err(TxError::InvalidAmount(format!(
            "{input}: more than {decimals} decimal places"
        )));
    }

    let mut digits = String::with_capacity(whole.len() + decimals);
    digits.push_str(whole);
    digits.push_str(fraction);
    digits.extend(std::iter::repeat('0').take(decimals - fraction.len()));

    let digits = digits.trim_start_matches('0');
    if digits.is_empty() {
        return Ok(U256::zero());
    }
    U256::from_dec_str(digits)
        .map_err(|_| TxError::InvalidAmount(format!("{input}: exceeds uint256")))
}

/// Parse an ether amount (18 decimals).
pub fn parse_ether(input: &str) -> Result<U256, TxError> {
    parse_units(input, ETHER_DECIMALS)
}

/// Render a scaled integer as a decimal string without trailing zeros.
///
/// `decimals` past 77 has no `10^decimals` in uint256 and is rejected.
pub fn format_units(value: U256, decimals: usize) -> Result<String, TxError> {
    let scale = U256::from(10u8)
        .checked_pow(U256::from(decimals))
        .ok_or_else(|| TxError::InvalidAmount(format!("10^{decimals} exceeds uint256")))?;
    let whole = value / scale;
    let fraction = value % scale;

    if fraction.is_zero() {
        return Ok(whole.to_string());
    }

    let fraction = format!("{:0>width$}", fraction.to_string(), width = decimals);
    Ok(format!("{}.{}", whole, fraction.trim_end_matches('0')))
}

/// Render wei as ether.
pub fn format_ether(value: U256) -> Result<String, TxError> {
    format_units(value, ETHER_DECIMALS)
}
