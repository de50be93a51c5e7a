//! Fixtures shared by unit tests.

use nemo_common::models::coin::{CoinConfig, Provider};

use crate::{deployment::Deployment, framework::SUI_COIN_TYPE};

pub(crate) const CONTRACT: &str = "0x3f4e9d2c1b0a99887766554433221100ffeeddccbbaa00112233445566778899";
pub(crate) const SUI: &str = SUI_COIN_TYPE;

const DEPLOYMENT_YAML: &str = include_str!("../fixtures/deployment.yaml");

pub(crate) fn test_deployment() -> Deployment {
    Deployment::from_yaml_str(DEPLOYMENT_YAML).expect("fixture deployment parses")
}

/// Coin types of a market registered in the fixture deployment, as `(wrapped, underlying)`.
fn coin_types(provider: Provider) -> (&'static str, &'static str) {
    match provider {
        Provider::Scallop => (
            "0xaafc4f740de0dd0dde642a31148fb94517087052f19afb0f7bed1dc41a50c77b::scallop_sui::SCALLOP_SUI",
            SUI,
        ),
        Provider::Strater => (
            "0xd01d27939064d79e4ae1179cd11cfeeff23943f32b1a842ea1a1e15a0045d77d::st_sbuck::ST_SBUCK",
            "0xce7ff77a83ea0cb6fd39bd8748e2ec89a3f41e8efdc3f4eb123e0ca37b184db2::buck::BUCK",
        ),
        Provider::Aftermath => (
            "0xf325ce1300e8dac124071d3152c5c5ee6174914f8bc2161e88329cf579246efc::afsui::AFSUI",
            SUI,
        ),
        Provider::SpringSui => (
            "0x83556891f4a0f233ce7b05cfe7f957d4020492a34f5405b2cb9377d060bef4bf::spring_sui::SPRING_SUI",
            SUI,
        ),
        Provider::Volo => (
            "0x549e8b69270defbfafd4f94e17ec44cdbdd99820b33bda2278dea3b9a32d3f55::cert::CERT",
            SUI,
        ),
        Provider::Haedal => (
            "0xbde4ba4c2e274a60ce15c1cfff9e5c42e41654ac8b6d906a57efa4bd3c29f47d::hasui::HASUI",
            SUI,
        ),
        Provider::AlphaFi => (
            "0xd1b72982e40348d069bb1ff701e634c117bb5f741f44dff91e472d3b01461e55::stsui::STSUI",
            SUI,
        ),
        Provider::Mstable => (
            "0xd1a91b46bd6d966b62686263609074ad16cfdffc63c31a4775870a2d54d20c6b::mbtc::MBTC",
            "0xaafb102dd0902f5055cadecd687fb5b71ca82ef0e0285d90afde828ec58ca96b::btc::BTC",
        ),
        Provider::Winter => (
            "0xb1b0650a8862e30e3f604fd6c5838bc25464b8d3d827fbd58af7cb9685b832bf::wwal::WWAL",
            "0x356a26eb9e012a68958082340d4c4116e7f55615cf27affcff209cf0ae544f59::wal::WAL",
        ),
        Provider::Kai => (
            "0xb8dc843a816b51992ee10d2ddc6d28aab4f0a1d651cd7289a7897902eb631613::ywal::YWAL",
            "0x356a26eb9e012a68958082340d4c4116e7f55615cf27affcff209cf0ae544f59::wal::WAL",
        ),
    }
}

/// A fully populated market config for `provider`.
pub(crate) fn coin_config(provider: Provider) -> CoinConfig {
    let (coin_type, underlying) = coin_types(provider);
    CoinConfig {
        contract_id: CONTRACT.to_string(),
        version: "0x101".to_string(),
        py_state_id: "0x102".to_string(),
        sy_coin_type: format!("{CONTRACT}::sy::SY"),
        yield_factory_config_id: "0x103".to_string(),
        market_state_id: "0x104".to_string(),
        market_factory_config_id: "0x105".to_string(),
        coin_type: coin_type.to_string(),
        underlying_coin_type: underlying.to_string(),
        decimal: 9,
        provider,
        price_oracle_config_id: "0x106".to_string(),
        oracle_package_id: "0x107".to_string(),
        oracle_ticket: "0x108".to_string(),
        sy_state_id: "0x109".to_string(),
        provider_version: Some("0x10a".to_string()),
        provider_market: Some("0x10b".to_string()),
        maturity: 1_767_225_600_000,
    }
}
