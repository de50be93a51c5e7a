//! Up-front parameter checks. Everything here runs before a call is appended.

use std::str::FromStr;

use nemo_common::{
    models::coin::{CoinConfig, ConfigField},
    Address, ObjectId,
};

use crate::errors::PtbError;

/// Returns a required identifier field, failing with a named-field error when blank.
pub fn require<'a>(
    operation: &'static str,
    config: &'a CoinConfig,
    field: ConfigField,
) -> Result<&'a str, PtbError> {
    config.value(field).ok_or_else(|| {
        PtbError::validation(
            operation,
            format!("missing required field `{field}` for {} market", config.provider),
        )
    })
}

/// Like [`require`] but also parses the value as an object id.
pub fn require_id(
    operation: &'static str,
    config: &CoinConfig,
    field: ConfigField,
) -> Result<ObjectId, PtbError> {
    let literal = require(operation, config, field)?;
    ObjectId::from_str(literal).map_err(|e| {
        PtbError::validation(operation, format!("field `{field}` is not an object id: {e}"))
    })
}

pub fn parse_address(operation: &'static str, name: &str, value: &str) -> Result<Address, PtbError> {
    if value.trim().is_empty() {
        return Err(PtbError::validation(operation, format!("`{name}` is required")));
    }
    Address::from_str(value)
        .map_err(|e| PtbError::validation(operation, format!("`{name}` is not a valid address: {e}")))
}

/// Parses a base-unit amount carried as a decimal string.
pub fn parse_amount(operation: &'static str, name: &str, value: &str) -> Result<u64, PtbError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(PtbError::validation(operation, format!("`{name}` is required")));
    }
    trimmed.parse::<u64>().map_err(|_| {
        PtbError::validation(
            operation,
            format!("`{name}` must be a base-unit integer, got {value:?}"),
        )
    })
}

/// [`parse_amount`] that additionally rejects zero.
pub fn parse_positive_amount(
    operation: &'static str,
    name: &str,
    value: &str,
) -> Result<u64, PtbError> {
    match parse_amount(operation, name, value)? {
        0 => Err(PtbError::validation(operation, format!("`{name}` must be greater than zero"))),
        amount => Ok(amount),
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::testing::coin_config;

    #[rstest]
    #[case("1000", Ok(1000))]
    #[case(" 42 ", Ok(42))]
    #[case("", Err(()))]
    #[case("-1", Err(()))]
    #[case("1.5", Err(()))]
    #[case("18446744073709551616", Err(()))]
    fn test_parse_amount(#[case] input: &str, #[case] expected: Result<u64, ()>) {
        assert_eq!(parse_amount("test", "amount", input).map_err(|_| ()), expected);
    }

    #[test]
    fn test_parse_positive_amount_rejects_zero() {
        let err = parse_positive_amount("mint", "amount", "0").unwrap_err();
        assert_eq!(err.to_string(), "mint: `amount` must be greater than zero");
    }

    #[test]
    fn test_require_names_missing_field() {
        let mut config = coin_config(nemo_common::models::coin::Provider::Scallop);
        config.provider_market = None;

        let err = require("price_voucher", &config, ConfigField::ProviderMarket).unwrap_err();

        assert_eq!(
            err.to_string(),
            "price_voucher: missing required field `providerMarket` for Scallop market"
        );
    }
}
