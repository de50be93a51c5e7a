//! Decoding of simulation return buffers and decimal scaling of base-unit amounts.

use num_bigint::BigUint;
use num_traits::Zero;
use serde::de::DeserializeOwned;

use crate::errors::PtbError;

/// Largest decimal count a coin may declare. Higher values are rejected rather than
/// silently rendered.
pub const MAX_DECIMALS: u8 = 38;

fn decode_fixed<T: DeserializeOwned>(
    operation: &'static str,
    bytes: &[u8],
    type_tag: Option<&str>,
    expected_tag: &str,
) -> Result<T, PtbError> {
    if let Some(tag) = type_tag {
        if tag != expected_tag {
            return Err(PtbError::decode(
                operation,
                format!("expected a {expected_tag} return value, got {tag}"),
            ));
        }
    }
    let width = std::mem::size_of::<T>();
    if bytes.len() != width {
        return Err(PtbError::decode(
            operation,
            format!("expected {width} bytes for {expected_tag}, got {}", bytes.len()),
        ));
    }
    bcs::from_bytes(bytes).map_err(|e| PtbError::decode(operation, e.to_string()))
}

/// Decodes a little endian `u64`, as returned for balances and amounts.
pub fn decode_u64(operation: &'static str, bytes: &[u8], type_tag: Option<&str>) -> Result<u64, PtbError> {
    decode_fixed(operation, bytes, type_tag, "u64")
}

/// Decodes a little endian `u128`, as returned for price vouchers.
pub fn decode_u128(
    operation: &'static str,
    bytes: &[u8],
    type_tag: Option<&str>,
) -> Result<u128, PtbError> {
    decode_fixed(operation, bytes, type_tag, "u128")
}

/// Renders `raw / 10^decimals` as an exact decimal string with trailing zeros removed.
pub fn scale_amount(
    operation: &'static str,
    raw: impl Into<BigUint>,
    decimals: u8,
) -> Result<String, PtbError> {
    if decimals > MAX_DECIMALS {
        return Err(PtbError::validation(
            operation,
            format!("decimal {decimals} exceeds the supported maximum of {MAX_DECIMALS}"),
        ));
    }
    let raw = raw.into();
    if decimals == 0 {
        return Ok(raw.to_string());
    }
    let divisor = BigUint::from(10u8).pow(u32::from(decimals));
    let integer = &raw / &divisor;
    let fraction = &raw % &divisor;
    if fraction.is_zero() {
        return Ok(integer.to_string());
    }
    let fraction = format!("{:0>width$}", fraction.to_string(), width = decimals as usize);
    Ok(format!("{integer}.{}", fraction.trim_end_matches('0')))
}
