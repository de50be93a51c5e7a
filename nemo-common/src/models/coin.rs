use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

use crate::models::TypeTag;

/// The external staking or vault protocol whose contracts mint and burn a market's
/// wrapped yield-bearing coin.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display, EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum Provider {
    Scallop,
    Strater,
    Aftermath,
    SpringSui,
    Volo,
    Haedal,
    AlphaFi,
    Mstable,
    Winter,
    Kai,
}

/// Identifier fields of a [`CoinConfig`] that some operation may require.
///
/// Displays as the camelCase key used by the API so validation errors name the field
/// the caller actually has to fill in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "camelCase")]
pub enum ConfigField {
    ContractId,
    Version,
    PyStateId,
    SyCoinType,
    YieldFactoryConfigId,
    MarketStateId,
    MarketFactoryConfigId,
    CoinType,
    UnderlyingCoinType,
    PriceOracleConfigId,
    OraclePackageId,
    OracleTicket,
    SyStateId,
    ProviderVersion,
    ProviderMarket,
}

/// Static per-market configuration, as served by the Nemo API.
///
/// Which identifiers are mandatory depends on the provider and on the operation, so
/// every identifier is optional at the type level and validated where it is consumed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinConfig {
    /// Package of the Nemo protocol contracts.
    #[serde(default)]
    pub contract_id: String,
    /// Shared version object of the Nemo protocol.
    #[serde(default)]
    pub version: String,
    /// Principal/yield state of the market.
    #[serde(default)]
    pub py_state_id: String,
    #[serde(default)]
    pub sy_coin_type: TypeTag,
    #[serde(default)]
    pub yield_factory_config_id: String,
    #[serde(default)]
    pub market_state_id: String,
    #[serde(default)]
    pub market_factory_config_id: String,
    /// The wrapped yield-bearing coin minted by the provider.
    #[serde(default)]
    pub coin_type: TypeTag,
    /// The coin the provider accepts on mint and returns on burn.
    #[serde(default)]
    pub underlying_coin_type: TypeTag,
    pub decimal: u8,
    pub provider: Provider,
    #[serde(default)]
    pub price_oracle_config_id: String,
    #[serde(default)]
    pub oracle_package_id: String,
    #[serde(default)]
    pub oracle_ticket: String,
    #[serde(default)]
    pub sy_state_id: String,
    #[serde(default)]
    pub provider_version: Option<String>,
    #[serde(default)]
    pub provider_market: Option<String>,
    /// Market maturity, unix milliseconds.
    #[serde(default)]
    pub maturity: u64,
}

impl CoinConfig {
    /// Returns the value of an identifier field, treating blank strings as absent.
    pub fn value(&self, field: ConfigField) -> Option<&str> {
        let raw = match field {
            ConfigField::ContractId => Some(&self.contract_id),
            ConfigField::Version => Some(&self.version),
            ConfigField::PyStateId => Some(&self.py_state_id),
            ConfigField::SyCoinType => Some(&self.sy_coin_type),
            ConfigField::YieldFactoryConfigId => Some(&self.yield_factory_config_id),
            ConfigField::MarketStateId => Some(&self.market_state_id),
            ConfigField::MarketFactoryConfigId => Some(&self.market_factory_config_id),
            ConfigField::CoinType => Some(&self.coin_type),
            ConfigField::UnderlyingCoinType => Some(&self.underlying_coin_type),
            ConfigField::PriceOracleConfigId => Some(&self.price_oracle_config_id),
            ConfigField::OraclePackageId => Some(&self.oracle_package_id),
            ConfigField::OracleTicket => Some(&self.oracle_ticket),
            ConfigField::SyStateId => Some(&self.sy_state_id),
            ConfigField::ProviderVersion => self.provider_version.as_ref(),
            ConfigField::ProviderMarket => self.provider_market.as_ref(),
        };
        raw.map(|value| value.trim())
            .filter(|value| !value.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    const CONFIG_JSON: &str = r#"{
        "contractId": "0xabc",
        "version": "0xdef",
        "coinType": "0x83556891f4a0f233ce7b05cfe7f957d4020492a34f5405b2cb9377d060bef4bf::spring_sui::SPRING_SUI",
        "underlyingCoinType": "0x2::sui::SUI",
        "decimal": 9,
        "provider": "SpringSui",
        "providerMarket": "  "
    }"#;

    #[test]
    fn test_deserialize_partial_config() {
        let config: CoinConfig = serde_json::from_str(CONFIG_JSON).unwrap();

        assert_eq!(config.provider, Provider::SpringSui);
        assert_eq!(config.value(ConfigField::ContractId), Some("0xabc"));
        assert_eq!(config.value(ConfigField::PyStateId), None);
        assert_eq!(config.value(ConfigField::ProviderMarket), None);
        assert_eq!(config.value(ConfigField::ProviderVersion), None);
    }

    #[rstest]
    #[case("Scallop", Provider::Scallop)]
    #[case("springsui", Provider::SpringSui)]
    #[case("ALPHAFI", Provider::AlphaFi)]
    fn test_provider_from_str(#[case] literal: &str, #[case] expected: Provider) {
        assert_eq!(Provider::from_str(literal).unwrap(), expected);
    }

    #[test]
    fn test_config_field_display_matches_api_keys() {
        assert_eq!(ConfigField::UnderlyingCoinType.to_string(), "underlyingCoinType");
        assert_eq!(ConfigField::PyStateId.to_string(), "pyStateId");
    }
}
