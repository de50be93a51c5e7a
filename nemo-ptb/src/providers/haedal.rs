//! Haedal issues two tokens: haSUI (SUI staking) and haWAL (WAL staking). Only haSUI can
//! be unstaked within a single transaction.

use async_trait::async_trait;
use nemo_common::models::{
    coin::{CoinConfig, Provider},
    normalize_type_tag,
    ptb::{Argument, CallSequence},
};

use super::{wrapped_type, ProviderStrategy, StrategyContext, BURN, MINT};
use crate::{
    builder::{CallSequenceExt, MoveTarget},
    deployment::{HaedalDeployment, HaedalWalDeployment},
    errors::PtbError,
    framework::SUI_SYSTEM_STATE,
};

pub(super) struct Haedal;

enum HaedalToken<'d> {
    HaSui,
    HaWal(&'d HaedalWalDeployment),
}

fn token<'d>(
    operation: &'static str,
    haedal: &'d HaedalDeployment,
    coin_type: &str,
) -> Result<HaedalToken<'d>, PtbError> {
    let normalized = normalize_type_tag(coin_type);
    if normalized == normalize_type_tag(&haedal.coin_type) {
        return Ok(HaedalToken::HaSui);
    }
    match &haedal.wal {
        Some(wal) if normalized == normalize_type_tag(&wal.coin_type) => Ok(HaedalToken::HaWal(wal)),
        _ => Err(PtbError::unsupported(
            operation,
            Provider::Haedal,
            coin_type,
            "coin type is not issued by Haedal",
        )),
    }
}

#[async_trait]
impl ProviderStrategy for Haedal {
    fn provider(&self) -> Provider {
        Provider::Haedal
    }

    async fn mint(
        &self,
        ctx: &StrategyContext<'_>,
        seq: &mut CallSequence,
        config: &CoinConfig,
        coin: Argument,
        _amount: u64,
    ) -> Result<Argument, PtbError> {
        let haedal = &ctx.deployment.haedal;
        let call = match token(MINT, haedal, wrapped_type(MINT, config)?)? {
            HaedalToken::HaSui => seq
                .move_call(MoveTarget::new(haedal.package, "staking", "request_stake_coin"), vec![])
                .shared("system_state", SUI_SYSTEM_STATE)
                .shared("staking", haedal.staking)
                .arg("sui", coin)
                .pure(MINT, "validator", &haedal.validator)?
                .finish(),
            HaedalToken::HaWal(wal) => seq
                .move_call(MoveTarget::new(wal.package, "walstaking", "request_stake_coin"), vec![])
                .shared("walrus_staking", wal.walrus_staking)
                .shared("staking", wal.staking)
                .arg("wal", coin)
                .pure(MINT, "validator", &wal.validator)?
                .finish(),
        };
        Ok(call.result())
    }

    async fn burn(
        &self,
        ctx: &StrategyContext<'_>,
        seq: &mut CallSequence,
        config: &CoinConfig,
        wrapped: Argument,
    ) -> Result<Argument, PtbError> {
        let haedal = &ctx.deployment.haedal;
        let coin_type = wrapped_type(BURN, config)?;
        match token(BURN, haedal, coin_type)? {
            HaedalToken::HaSui => {
                let call = seq
                    .move_call(
                        MoveTarget::new(haedal.package, "staking", "request_unstake_instant_coin"),
                        vec![],
                    )
                    .shared("system_state", SUI_SYSTEM_STATE)
                    .shared("staking", haedal.staking)
                    .arg("hasui", wrapped)
                    .finish();
                Ok(call.result())
            }
            HaedalToken::HaWal(_) => Err(PtbError::unsupported(
                BURN,
                Provider::Haedal,
                coin_type,
                "haWAL withdrawals settle after the unbonding epoch and cannot be burned instantly",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{coin_config, test_deployment};

    #[tokio::test]
    async fn test_hawal_mints_but_refuses_burn() {
        let deployment = test_deployment();
        let ctx = StrategyContext::new(&deployment);
        let mut config = coin_config(Provider::Haedal);
        config.coin_type = deployment
            .haedal
            .wal
            .as_ref()
            .unwrap()
            .coin_type
            .clone();
        let mut seq = CallSequence::new();

        let minted = Haedal
            .mint(&ctx, &mut seq, &config, Argument::GasCoin, 1)
            .await
            .unwrap();
        assert!(seq.descriptors()[0]
            .target
            .ends_with("::walstaking::request_stake_coin"));

        let before = seq.len();
        let err = Haedal
            .burn(&ctx, &mut seq, &config, minted)
            .await
            .unwrap_err();

        assert!(matches!(err, PtbError::ProtocolUnsupported { provider: Provider::Haedal, .. }));
        assert!(err.to_string().contains("hawal::HAWAL"));
        assert_eq!(seq.len(), before);
    }
}
