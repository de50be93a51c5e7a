use async_trait::async_trait;
use nemo_common::models::{
    coin::{CoinConfig, Provider},
    ptb::{Argument, CallSequence},
};

use super::{issued_type, ProviderStrategy, StrategyContext, BURN, MINT};
use crate::{
    builder::{CallSequenceExt, MoveTarget},
    errors::PtbError,
    framework::SUI_SYSTEM_STATE,
};

/// Aftermath afSUI. Burns go through the atomic unstake path, which settles in the same
/// transaction against the vault's liquidity buffer.
pub(super) struct Aftermath;

#[async_trait]
impl ProviderStrategy for Aftermath {
    fn provider(&self) -> Provider {
        Provider::Aftermath
    }

    async fn mint(
        &self,
        ctx: &StrategyContext<'_>,
        seq: &mut CallSequence,
        config: &CoinConfig,
        coin: Argument,
        _amount: u64,
    ) -> Result<Argument, PtbError> {
        let aftermath = &ctx.deployment.aftermath;
        issued_type(MINT, Provider::Aftermath, config, &aftermath.coin_type)?;
        let call = seq
            .move_call(MoveTarget::new(aftermath.package, "staked_sui_vault", "request_stake"), vec![])
            .shared("staked_sui_vault", aftermath.staked_sui_vault)
            .shared("safe", aftermath.safe)
            .shared("system_state", SUI_SYSTEM_STATE)
            .shared("referral_vault", aftermath.referral_vault)
            .arg("sui", coin)
            .pure(MINT, "validator", &aftermath.validator)?
            .finish();
        Ok(call.result())
    }

    async fn burn(
        &self,
        ctx: &StrategyContext<'_>,
        seq: &mut CallSequence,
        config: &CoinConfig,
        wrapped: Argument,
    ) -> Result<Argument, PtbError> {
        let aftermath = &ctx.deployment.aftermath;
        issued_type(BURN, Provider::Aftermath, config, &aftermath.coin_type)?;
        let call = seq
            .move_call(
                MoveTarget::new(aftermath.package, "staked_sui_vault", "request_unstake_atomic"),
                vec![],
            )
            .shared("staked_sui_vault", aftermath.staked_sui_vault)
            .shared("safe", aftermath.safe)
            .shared("referral_vault", aftermath.referral_vault)
            .shared("treasury", aftermath.treasury)
            .arg("afsui", wrapped)
            .finish();
        Ok(call.result())
    }
}
