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

pub(super) struct Volo;

#[async_trait]
impl ProviderStrategy for Volo {
    fn provider(&self) -> Provider {
        Provider::Volo
    }

    async fn mint(
        &self,
        ctx: &StrategyContext<'_>,
        seq: &mut CallSequence,
        config: &CoinConfig,
        coin: Argument,
        _amount: u64,
    ) -> Result<Argument, PtbError> {
        let volo = &ctx.deployment.volo;
        issued_type(MINT, Provider::Volo, config, &volo.coin_type)?;
        let call = seq
            .move_call(MoveTarget::new(volo.package, "stake_pool", "stake"), vec![])
            .shared("stake_pool", volo.stake_pool)
            .shared("metadata", volo.metadata)
            .shared("system_state", SUI_SYSTEM_STATE)
            .arg("sui", coin)
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
        let volo = &ctx.deployment.volo;
        issued_type(BURN, Provider::Volo, config, &volo.coin_type)?;
        let call = seq
            .move_call(MoveTarget::new(volo.package, "stake_pool", "unstake"), vec![])
            .shared("stake_pool", volo.stake_pool)
            .shared("metadata", volo.metadata)
            .shared("system_state", SUI_SYSTEM_STATE)
            .arg("cert", wrapped)
            .finish();
        Ok(call.result())
    }
}
