//! Price voucher resolution.
//!
//! A voucher is the oracle's statement of a market coin's current exchange rate. The
//! shape of the oracle call depends first on the provider (SpringSui and Winter keep
//! per-token registries), then on the exact coin type, and falls back to the generic
//! external oracle for anything else.

use nemo_common::{
    models::{
        coin::{CoinConfig, ConfigField, Provider},
        descriptor::CallDescriptor,
        ptb::{Argument, CallSequence},
    },
    ObjectId,
};
use tracing::{debug, instrument};

use crate::{
    builder::{CallSequenceExt, MoveTarget},
    deployment::{CoinOracle, Deployment},
    errors::PtbError,
    framework::CLOCK,
    providers::lookup,
    validate::{require, require_id},
};

pub const PRICE_VOUCHER: &str = "price_voucher";

/// Handle to a freshly built voucher, plus the call that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceVoucher {
    pub argument: Argument,
    pub descriptor: CallDescriptor,
}

/// One oracle call: where it lives, which objects it reads besides the common ones, and
/// which coin type is priced.
struct VoucherShape<'c> {
    module: &'static str,
    function: &'static str,
    objects: Vec<(&'static str, ObjectId)>,
    priced_type: &'c str,
}

impl<'c> VoucherShape<'c> {
    fn new(module: &'static str, function: &'static str, priced_type: &'c str) -> Self {
        Self { module, function, objects: Vec::new(), priced_type }
    }

    fn with(mut self, name: &'static str, id: ObjectId) -> Self {
        self.objects.push((name, id));
        self
    }
}

fn select_shape<'c>(
    deployment: &Deployment,
    config: &'c CoinConfig,
) -> Result<VoucherShape<'c>, PtbError> {
    let coin_type = require(PRICE_VOUCHER, config, ConfigField::CoinType)?;

    match config.provider {
        Provider::SpringSui => {
            let lst_info = *lookup(
                PRICE_VOUCHER,
                Provider::SpringSui,
                &deployment.spring_sui.lst_infos,
                coin_type,
            )?;
            return Ok(VoucherShape::new("spring", "get_price_voucher_from_spring", coin_type)
                .with("lst_info", lst_info));
        }
        Provider::Winter => {
            let lst = lookup(PRICE_VOUCHER, Provider::Winter, &deployment.winter.lsts, coin_type)?;
            return Ok(VoucherShape::new("winter", "get_price_voucher_from_blizzard", coin_type)
                .with("staking", lst.staking)
                .with("walrus_staking", deployment.winter.walrus_staking));
        }
        _ => {}
    }

    let shape = match deployment.oracle.coins.get(coin_type) {
        Some(CoinOracle::Haedal { staking }) => {
            VoucherShape::new("haedal", "get_price_voucher_from_hasui", coin_type).with("staking", *staking)
        }
        Some(CoinOracle::HaedalWal { staking }) => {
            VoucherShape::new("haedal", "get_price_voucher_from_hawal", coin_type).with("staking", *staking)
        }
        Some(CoinOracle::Volo { stake_pool, metadata }) => {
            VoucherShape::new("volo", "get_price_voucher_from_volo", coin_type)
                .with("stake_pool", *stake_pool)
                .with("metadata", *metadata)
        }
        Some(CoinOracle::Aftermath { staked_sui_vault, safe }) => {
            VoucherShape::new("aftermath", "get_price_voucher_from_aftermath", coin_type)
                .with("staked_sui_vault", *staked_sui_vault)
                .with("safe", *safe)
        }
        Some(CoinOracle::Strater { vault }) => {
            VoucherShape::new("buck", "get_price_voucher_from_strater", coin_type)
                .with("vault", *vault)
                .with("clock", CLOCK)
        }
        Some(CoinOracle::AlphaFi { lst_info }) => {
            VoucherShape::new("alphafi", "get_price_voucher_from_alphafi", coin_type)
                .with("lst_info", *lst_info)
        }
        Some(CoinOracle::Mstable { vault }) => {
            VoucherShape::new("mstable", "get_price_voucher_from_mstable", coin_type).with("vault", *vault)
        }
        Some(CoinOracle::Kai { vault }) => {
            VoucherShape::new("kai", "get_price_voucher_from_kai", coin_type).with("vault", *vault)
        }
        Some(CoinOracle::ScallopMarketCoin { version, market }) => {
            VoucherShape::new("scallop", "get_price_voucher_from_market_coin", coin_type)
                .with("version", *version)
                .with("market", *market)
                .with("clock", CLOCK)
        }
        Some(CoinOracle::FixedRate) => {
            VoucherShape::new("fixed_rate", "get_price_voucher_from_fixed_rate", coin_type)
        }
        None => {
            let underlying = require(PRICE_VOUCHER, config, ConfigField::UnderlyingCoinType)?;
            let version = require_id(PRICE_VOUCHER, config, ConfigField::ProviderVersion)?;
            let market = require_id(PRICE_VOUCHER, config, ConfigField::ProviderMarket)?;
            VoucherShape::new("oracle", "get_price_voucher_from_x_oracle", underlying)
                .with("provider_version", version)
                .with("provider_market", market)
                .with("clock", CLOCK)
        }
    };
    Ok(shape)
}

/// Appends the one oracle call producing a price voucher for the market's coin.
#[instrument(skip_all, fields(provider = %config.provider, coin_type = %config.coin_type))]
pub fn resolve_price_voucher(
    deployment: &Deployment,
    seq: &mut CallSequence,
    config: &CoinConfig,
) -> Result<PriceVoucher, PtbError> {
    let shape = select_shape(deployment, config)?;
    let package = require_id(PRICE_VOUCHER, config, ConfigField::OraclePackageId)?;
    let oracle_config = require_id(PRICE_VOUCHER, config, ConfigField::PriceOracleConfigId)?;
    let ticket = require_id(PRICE_VOUCHER, config, ConfigField::OracleTicket)?;
    let sy_state = require_id(PRICE_VOUCHER, config, ConfigField::SyStateId)?;
    let sy_type = require(PRICE_VOUCHER, config, ConfigField::SyCoinType)?;

    let mut call = seq
        .move_call(
            MoveTarget::new(package, shape.module, shape.function),
            vec![sy_type.to_string(), shape.priced_type.to_string()],
        )
        .shared_ref("price_oracle_config", oracle_config)
        .object("price_ticket", ticket);
    for (name, id) in shape.objects {
        call = call.shared_ref(name, id);
    }
    let (handle, descriptor) = call
        .shared_ref("sy_state", sy_state)
        .finish_with_descriptor();
    debug!(call = %descriptor.target, "Built price voucher call");
    Ok(PriceVoucher { argument: handle.result(), descriptor })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;
    use crate::testing::{coin_config, test_deployment};

    #[rstest]
    #[case::spring_sui(Provider::SpringSui, "spring::get_price_voucher_from_spring")]
    #[case::winter(Provider::Winter, "winter::get_price_voucher_from_blizzard")]
    #[case::haedal(Provider::Haedal, "haedal::get_price_voucher_from_hasui")]
    #[case::volo(Provider::Volo, "volo::get_price_voucher_from_volo")]
    #[case::aftermath(Provider::Aftermath, "aftermath::get_price_voucher_from_aftermath")]
    #[case::strater(Provider::Strater, "buck::get_price_voucher_from_strater")]
    #[case::alpha_fi(Provider::AlphaFi, "alphafi::get_price_voucher_from_alphafi")]
    #[case::mstable(Provider::Mstable, "mstable::get_price_voucher_from_mstable")]
    #[case::kai(Provider::Kai, "kai::get_price_voucher_from_kai")]
    #[case::scallop_falls_back(Provider::Scallop, "oracle::get_price_voucher_from_x_oracle")]
    fn test_each_market_builds_exactly_one_oracle_call(
        #[case] provider: Provider,
        #[case] function: &str,
    ) {
        let deployment = test_deployment();
        let config = coin_config(provider);
        let mut seq = CallSequence::new();

        let voucher = resolve_price_voucher(&deployment, &mut seq, &config).unwrap();

        assert_eq!(seq.len(), 1);
        assert_eq!(voucher.argument, Argument::Result(0));
        assert_eq!(
            voucher.descriptor.target,
            format!("{}::{function}", ObjectId::from_low_u64(0x107))
        );
        assert_eq!(voucher.descriptor.type_arguments[0], config.sy_coin_type);
        assert!(seq.validate_references().is_ok());
    }

    #[test]
    fn test_fallback_prices_underlying_coin() {
        let deployment = test_deployment();
        let config = coin_config(Provider::Scallop);
        let mut seq = CallSequence::new();

        let voucher = resolve_price_voucher(&deployment, &mut seq, &config).unwrap();

        assert_eq!(voucher.descriptor.type_arguments[1], config.underlying_coin_type);
        assert_eq!(
            voucher.descriptor.argument("provider_market"),
            Some(ObjectId::from_low_u64(0x10b).to_string().as_str())
        );
    }

    #[rstest]
    #[case::version("providerVersion")]
    #[case::market("providerMarket")]
    #[case::underlying("underlyingCoinType")]
    fn test_fallback_requires_provider_fields(#[case] field: &str) {
        let deployment = test_deployment();
        let mut config = coin_config(Provider::Scallop);
        match field {
            "providerVersion" => config.provider_version = None,
            "providerMarket" => config.provider_market = Some(String::new()),
            _ => config.underlying_coin_type = String::new(),
        }
        let mut seq = CallSequence::new();

        let err = resolve_price_voucher(&deployment, &mut seq, &config).unwrap_err();

        assert!(matches!(err, PtbError::Validation { .. }));
        assert!(err.to_string().contains(field), "{err}");
        assert!(seq.is_empty());
    }

    #[rstest]
    #[case::spring_sui(Provider::SpringSui)]
    #[case::winter(Provider::Winter)]
    fn test_registry_branches_reject_unknown_coins(#[case] provider: Provider) {
        let deployment = test_deployment();
        let mut config = coin_config(provider);
        config.coin_type = "0xfeed::lst::LST".to_string();
        let mut seq = CallSequence::new();

        let err = resolve_price_voucher(&deployment, &mut seq, &config).unwrap_err();

        assert!(matches!(err, PtbError::ProtocolUnsupported { .. }));
        assert!(err.to_string().contains("0xfeed::lst::LST"));
        assert!(seq.is_empty());
    }

    #[test]
    fn test_haedal_wal_has_its_own_shape() {
        let deployment = test_deployment();
        let mut config = coin_config(Provider::Haedal);
        config.coin_type = deployment
            .haedal
            .wal
            .as_ref()
            .unwrap()
            .coin_type
            .clone();
        let mut seq = CallSequence::new();

        let voucher = resolve_price_voucher(&deployment, &mut seq, &config).unwrap();

        assert!(voucher
            .descriptor
            .target
            .ends_with("haedal::get_price_voucher_from_hawal"));
    }
}
